//! Cancellation scope shared by one store's in-flight requests

use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Hands out the token for new requests and cancels all outstanding ones.
///
/// After [`CancelScope::cancel_all`] a fresh token is armed, so later calls
/// run normally.
#[derive(Debug, Default)]
pub struct CancelScope {
    current: Mutex<CancellationToken>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to pass to a request starting now
    pub fn token(&self) -> CancellationToken {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancel every request started before this call
    pub fn cancel_all(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_all_cancels_issued_tokens_and_rearms() {
        let scope = CancelScope::new();
        let issued = scope.token();

        scope.cancel_all();

        assert!(issued.is_cancelled());
        assert!(!scope.token().is_cancelled());
    }
}
