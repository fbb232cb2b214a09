use crate::domain::ContentItem;

/// One aggregated page of the dashboard feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    pub items: Vec<ContentItem>,
    pub has_more: bool,
    pub page: u32,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
