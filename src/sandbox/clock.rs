use std::sync::Mutex;
use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Source of simulated latency.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Waits on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

/// Returns immediately and remembers every requested delay.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    requested: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.requested().iter().sum()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(duration);
        }
    }
}

/// Per-operation latency constants, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyProfile {
    pub http_get_ms: u64,
    pub http_post_ms: u64,
    pub dns_ms: u64,
    pub geo_ms: u64,
    pub ping_per_packet_ms: u64,
    pub identify_ms: u64,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            http_get_ms: 500,
            http_post_ms: 750,
            dns_ms: 300,
            geo_ms: 400,
            ping_per_packet_ms: 200,
            identify_ms: 0,
        }
    }
}

impl LatencyProfile {
    /// Every constant multiplied by `factor`; negative or non-finite factors count as zero.
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 { factor } else { 0.0 };
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Self {
            http_get_ms: scale(self.http_get_ms),
            http_post_ms: scale(self.http_post_ms),
            dns_ms: scale(self.dns_ms),
            geo_ms: scale(self.geo_ms),
            ping_per_packet_ms: scale(self.ping_per_packet_ms),
            identify_ms: scale(self.identify_ms),
        }
    }

    pub fn http_get(&self) -> Duration {
        Duration::from_millis(self.http_get_ms)
    }

    pub fn http_post(&self) -> Duration {
        Duration::from_millis(self.http_post_ms)
    }

    pub fn dns(&self) -> Duration {
        Duration::from_millis(self.dns_ms)
    }

    pub fn geo(&self) -> Duration {
        Duration::from_millis(self.geo_ms)
    }

    pub fn ping(&self, count: u32) -> Duration {
        Duration::from_millis(self.ping_per_packet_ms.saturating_mul(count as u64))
    }

    pub fn identify(&self) -> Duration {
        Duration::from_millis(self.identify_ms)
    }
}
