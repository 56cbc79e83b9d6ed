use std::time::Duration;

/// Fixed-delay rate limiter shared by the network-bound stages.
///
/// `ready()` sleeps for the configured delay before every call except the
/// first, so no time is wasted after the final request of a run.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    primed: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn ready(&mut self) {
        if self.primed && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.primed = true;
    }
}
