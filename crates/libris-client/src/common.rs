//! Latest-only tracking for one-shot fetches.

use libris_types::RequestEpoch;

/// Tracks the newest in-flight request of one kind; older results are
/// ignored whenever they arrive.
#[derive(Debug, Default)]
pub struct LatestOnly {
    issued: RequestEpoch,
    active: Option<RequestEpoch>,
}

impl LatestOnly {
    /// Starts a new request; every earlier one becomes stale.
    pub fn begin(&mut self) -> RequestEpoch {
        self.issued = self.issued.next();
        self.active = Some(self.issued);
        self.issued
    }

    /// Forgets the active request, so its result will be ignored too.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self, epoch: RequestEpoch) -> bool {
        self.active == Some(epoch)
    }

    /// Finishes the request if it is still the active one.
    pub fn finish_if_active(&mut self, epoch: RequestEpoch) -> bool {
        if self.is_active(epoch) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_finishes() {
        let mut latest = LatestOnly::default();
        let a = latest.begin();
        let b = latest.begin();
        assert!(!latest.finish_if_active(a));
        assert!(latest.finish_if_active(b));
        assert!(!latest.is_active(b));
    }

    #[test]
    fn test_cancel_drops_active() {
        let mut latest = LatestOnly::default();
        let a = latest.begin();
        latest.cancel();
        assert!(!latest.finish_if_active(a));
    }
}
