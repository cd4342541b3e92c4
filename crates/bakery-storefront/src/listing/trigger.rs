/// Edge detector for the end-of-list sentinel.
///
/// Scroll observers report visibility continuously; only the transition
/// from hidden to visible counts as a request for more items.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentinelTrigger {
    visible: bool,
}

impl SentinelTrigger {
    /// Records an observation. Returns `true` only on a hidden-to-visible edge.
    pub fn observe(&mut self, visible: bool) -> bool {
        let fired = visible && !self.visible;
        self.visible = visible;
        fired
    }

    /// Forgets the last observation so a sentinel that is still on screen
    /// after the list was cleared fires again.
    pub fn reset(&mut self) {
        self.visible = false;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
