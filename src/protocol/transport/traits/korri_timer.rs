//! Asynchronous timer abstraction bounding listen windows and pacing
//! multi-packet transmissions.
use embassy_time::Duration;

/// Timer trait; implementations wrap `embassy_time::Timer`, `tokio::time::sleep`, etc.
pub trait KorriTimer {
    /// Asynchronously wait for `duration`.
    fn delay<'a>(&'a mut self, duration: Duration) -> impl core::future::Future<Output = ()> + 'a;

    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a {
        self.delay(Duration::from_millis(millis as u64))
    }
}
