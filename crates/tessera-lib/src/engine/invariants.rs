//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::cursor::SymbolCursor;

impl SymbolCursor<'_> {
    #[inline]
    pub(super) fn assert_rollback(&self, n: usize) {
        assert!(
            n <= self.position - self.committed,
            "rollback: cannot move back {n} from {} past committed position {}",
            self.position,
            self.committed
        );
    }

    #[inline]
    pub(super) fn assert_rollback_target(&self, target: usize) {
        assert!(
            self.committed <= target && target <= self.position,
            "rollback_to: target {target} outside committed..=position ({}..={})",
            self.committed,
            self.position
        );
    }
}
