//! State Providers
//!
//! The `state` parameter is produced on demand, each time an authorization
//! URL is built, so a non-constant provider yields a fresh value per login.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Default value returned by [`FixedState::default`].
pub const DEFAULT_STATE: &str = "mystate";

/// Produces `state` values for authorization requests.
pub trait StateProvider: Send + Sync {
    /// Produce the state for the next authorization request.
    fn state(&self) -> String;
}

impl<F> StateProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn state(&self) -> String {
        self()
    }
}

/// Always returns the same value.
#[derive(Clone, Debug)]
pub struct FixedState(String);

impl FixedState {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl Default for FixedState {
    fn default() -> Self {
        Self::new(DEFAULT_STATE)
    }
}

impl StateProvider for FixedState {
    fn state(&self) -> String {
        self.0.clone()
    }
}

/// 32 random bytes, base64url encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomState;

impl StateProvider for RandomState {
    fn state(&self) -> String {
        let mut rng = rand::thread_rng();
        let bytes: [u8; 32] = rng.gen();
        base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
    }
}

/// Milliseconds elapsed since the provider was created.
///
/// Values strictly increase across calls even when the clock has not moved.
#[derive(Debug)]
pub struct TimestampState {
    started: Instant,
    last: AtomicU64,
}

impl TimestampState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last: AtomicU64::new(0),
        }
    }
}

impl Default for TimestampState {
    fn default() -> Self {
        Self::new()
    }
}

impl StateProvider for TimestampState {
    fn state(&self) -> String {
        let elapsed = self.started.elapsed().as_millis() as u64;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(elapsed.max(last + 1))
            })
            .unwrap_or_default();
        elapsed.max(previous + 1).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_state() {
        assert_eq!(FixedState::default().state(), DEFAULT_STATE);
        assert_eq!(FixedState::new("s1").state(), "s1");
    }

    #[test]
    fn test_random_state_is_fresh() {
        let provider = RandomState;
        let first = provider.state();
        let second = provider.state();
        assert_eq!(first.len(), 43);
        assert_ne!(first, second);
    }

    #[test]
    fn test_timestamp_state_increases() {
        let provider = TimestampState::new();
        let first: u64 = provider.state().parse().unwrap();
        let second: u64 = provider.state().parse().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_closure_provider() {
        let provider = || "from-closure".to_string();
        assert_eq!(provider.state(), "from-closure");
    }
}
