use std::ops::{Deref, DerefMut};

pub const DEFAULT_THRESHOLD: usize = 3;

/// What the list currently shows: the selected row and the row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub selected: usize,
    pub len: usize,
}

impl Viewport {
    pub fn new(selected: usize, len: usize) -> Self {
        Self { selected, len }
    }
}

/// Fires a load-more request when the end of the feed comes into view.
///
/// The sentinel is the last `threshold` rows. It fires on the transition
/// into view only, so holding the selection at the bottom does not produce
/// a stream of requests.
#[derive(Debug)]
pub struct ScrollTrigger {
    threshold: usize,
    attached: bool,
    in_view: bool,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ScrollTrigger {
    /// A threshold of zero is raised to one: the last row is always part
    /// of the sentinel.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            attached: false,
            in_view: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.in_view = false;
    }

    /// Attach for the lifetime of the returned guard.
    pub fn scoped(&mut self) -> Observation<'_> {
        self.attach();
        Observation { trigger: self }
    }

    fn sentinel_visible(&self, viewport: Viewport) -> bool {
        viewport.len == 0 || viewport.selected + self.threshold >= viewport.len
    }

    /// Returns `true` when the caller should request the next page.
    pub fn observe(&mut self, viewport: Viewport, has_more: bool, loading: bool) -> bool {
        if !self.attached {
            return false;
        }
        let visible = self.sentinel_visible(viewport);
        let entered = visible && !self.in_view;
        self.in_view = visible;

        let fire = entered && has_more && !loading;
        if fire {
            tracing::debug!(selected = viewport.selected, len = viewport.len, "Sentinel in view");
        }
        fire
    }
}

/// Keeps a [`ScrollTrigger`] attached until dropped.
pub struct Observation<'a> {
    trigger: &'a mut ScrollTrigger,
}

impl Deref for Observation<'_> {
    type Target = ScrollTrigger;

    fn deref(&self) -> &ScrollTrigger {
        self.trigger
    }
}

impl DerefMut for Observation<'_> {
    fn deref_mut(&mut self) -> &mut ScrollTrigger {
        self.trigger
    }
}

impl Drop for Observation<'_> {
    fn drop(&mut self) {
        self.trigger.detach();
    }
}
