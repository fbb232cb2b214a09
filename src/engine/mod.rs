//! Content aggregation, pagination, search and the load-more trigger.
//!
//! ```text
//! ScrollTrigger → Pager → Aggregator → ProviderGateway
//! Debouncer → SearchController → SearchEngine → ProviderGateway
//! ```

pub mod aggregator;
pub mod pager;
pub mod scroll;
pub mod search;

use std::future::Future;
use std::time::Duration;

use crate::app::{DashboardError, Result};
use crate::domain::ContentKind;

pub use aggregator::Aggregator;
pub use pager::{LoadKind, LoadState, LoadTicket, Pager};
pub use scroll::{Observation, ScrollTrigger, Viewport};
pub use search::{Debouncer, SearchController, SearchEngine, SearchTicket};

/// Run a provider call with an upper bound on how long it may take.
pub(crate) async fn bounded<T, F>(kind: ContentKind, after: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(%kind, ?after, "Provider call timed out");
            Err(DashboardError::Timeout { kind, after })
        }
    }
}
