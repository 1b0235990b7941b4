//! Fixed pre-call delay.

use std::time::Duration;

/// Default delay before each request.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_secs(1);

/// Sleeps a fixed interval before every outbound request.
///
/// Holds no timestamps: each call waits the full delay, and separate
/// client handles never coordinate with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    /// Creates a pacing policy with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay at all.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits the configured delay on the calling task.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_DELAY)
    }
}
