pub mod clock;
pub mod results;
pub mod tables;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SandboxError};
pub use clock::{Delay, LatencyProfile, NoDelay, RecordingDelay, TokioDelay};
pub use results::{
    DnsResult, GeoResult, HttpMethod, HttpResult, PingResult, ServiceIdentification,
};
pub use tables::{MockTables, PortSignatures, ServiceSignature, SignatureMatcher};

pub const SANDBOX_ORIGIN: &str = "sandbox-demo";

/// Bounds of the fabricated ping latency, in milliseconds (upper bound exclusive).
pub const PING_LATENCY_MS: std::ops::Range<f64> = 10.0..60.0;

/// Async call surface the presentation layer depends on.
///
/// Implementations doing real I/O report failures with the network kinds of
/// `SandboxError`; lookups that find nothing still return sentinel results.
#[async_trait]
pub trait NetworkFacade: Send + Sync {
    async fn http_get(&self, url: &str) -> Result<HttpResult>;
    async fn http_post(&self, url: &str, body: serde_json::Value) -> Result<HttpResult>;
    async fn dns_lookup(&self, domain: &str) -> Result<DnsResult>;
    async fn geo_lookup(&self, address: &str) -> Result<GeoResult>;
    async fn ping_test(&self, host: &str, count: u32) -> Result<PingResult>;
    async fn identify_service(&self, port: u16, banner: &str) -> Result<ServiceIdentification>;
}

/// Canned stand-in for the networking API. Performs no I/O.
#[derive(Clone)]
pub struct MockNetworkFacade {
    tables: Arc<MockTables>,
    latency: LatencyProfile,
    delay: Arc<dyn Delay>,
}

impl Default for MockNetworkFacade {
    fn default() -> Self {
        Self::new(MockTables::default(), LatencyProfile::default(), Arc::new(TokioDelay))
    }
}

impl MockNetworkFacade {
    pub fn new(tables: MockTables, latency: LatencyProfile, delay: Arc<dyn Delay>) -> Self {
        Self {
            tables: Arc::new(tables),
            latency,
            delay,
        }
    }

    /// Built-in tables with no waiting at all.
    pub fn instant() -> Self {
        Self::new(MockTables::default(), LatencyProfile::default(), Arc::new(NoDelay))
    }

    pub fn tables(&self) -> &MockTables {
        &self.tables
    }

    pub fn latency(&self) -> &LatencyProfile {
        &self.latency
    }

    fn json_headers() -> BTreeMap<String, String> {
        BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())])
    }

    pub async fn http_get(&self, url: &str) -> HttpResult {
        debug!(url, delay_ms = self.latency.http_get_ms, "http.get");
        self.delay.sleep(self.latency.http_get()).await;
        HttpResult {
            status: 200,
            url: url.to_string(),
            method: HttpMethod::Get,
            payload: None,
            headers: Self::json_headers(),
            origin: Some(SANDBOX_ORIGIN.to_string()),
        }
    }

    pub async fn http_post(&self, url: &str, body: serde_json::Value) -> HttpResult {
        debug!(url, delay_ms = self.latency.http_post_ms, "http.post");
        self.delay.sleep(self.latency.http_post()).await;
        HttpResult {
            status: 200,
            url: url.to_string(),
            method: HttpMethod::Post,
            payload: Some(body),
            headers: Self::json_headers(),
            origin: None,
        }
    }

    pub async fn dns_lookup(&self, domain: &str) -> DnsResult {
        debug!(domain, delay_ms = self.latency.dns_ms, "dns.lookup");
        self.delay.sleep(self.latency.dns()).await;
        let address = self.tables.resolve(domain).unwrap_or_else(|| {
            debug!(domain, fallback = %self.tables.dns_fallback, "domain not in table");
            self.tables.dns_fallback
        });
        DnsResult {
            domain: domain.to_string(),
            address,
        }
    }

    pub async fn geo_lookup(&self, address: &str) -> GeoResult {
        debug!(address, delay_ms = self.latency.geo_ms, "geo.lookup");
        self.delay.sleep(self.latency.geo()).await;
        self.tables.locate(address).cloned().unwrap_or_else(GeoResult::unknown)
    }

    /// Every packet "arrives"; only the average latency varies between calls.
    pub async fn ping_test(&self, host: &str, count: u32) -> PingResult {
        let wait = self.latency.ping(count);
        debug!(host, count, delay_ms = wait.as_millis() as u64, "ping.test");
        self.delay.sleep(wait).await;
        let average_latency_ms = rand::thread_rng().gen_range(PING_LATENCY_MS);
        PingResult {
            host: host.to_string(),
            packets_sent: count,
            packets_received: count,
            packet_loss_percent: 0.0,
            average_latency_ms,
        }
    }

    /// First signature for `port`, in declared order, contained in `banner`.
    pub fn identify_service(&self, port: u16, banner: &str) -> ServiceIdentification {
        let matched = self.tables
            .signatures_for(port)
            .and_then(|entry| entry.first_match(banner));

        match matched {
            Some(signature) => {
                debug!(port, signature = signature.matcher.signature(), label = %signature.label, "service identified");
                ServiceIdentification {
                    port,
                    matched_signature: Some(signature.matcher.signature().to_string()),
                    label: signature.label.clone(),
                }
            }
            None => {
                debug!(port, "no signature matched");
                ServiceIdentification::unknown(port)
            }
        }
    }
}

#[async_trait]
impl NetworkFacade for MockNetworkFacade {
    async fn http_get(&self, url: &str) -> Result<HttpResult> {
        Ok(MockNetworkFacade::http_get(self, url).await)
    }

    async fn http_post(&self, url: &str, body: serde_json::Value) -> Result<HttpResult> {
        Ok(MockNetworkFacade::http_post(self, url, body).await)
    }

    async fn dns_lookup(&self, domain: &str) -> Result<DnsResult> {
        Ok(MockNetworkFacade::dns_lookup(self, domain).await)
    }

    async fn geo_lookup(&self, address: &str) -> Result<GeoResult> {
        Ok(MockNetworkFacade::geo_lookup(self, address).await)
    }

    async fn ping_test(&self, host: &str, count: u32) -> Result<PingResult> {
        if count == 0 {
            return Err(SandboxError::InvalidInput("ping count must be at least 1".to_string()));
        }
        Ok(MockNetworkFacade::ping_test(self, host, count).await)
    }

    async fn identify_service(&self, port: u16, banner: &str) -> Result<ServiceIdentification> {
        self.delay.sleep(self.latency.identify()).await;
        Ok(MockNetworkFacade::identify_service(self, port, banner))
    }
}

/// Race `call` against an optional deadline.
pub async fn with_deadline<T, F>(operation: &'static str, deadline: Option<Duration>, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(after) => tokio::time::timeout(after, call)
            .await
            .map_err(|_| SandboxError::Timeout { operation, after })?,
        None => call.await,
    }
}

/// Wraps a facade so every call gives up after `deadline`.
pub struct DeadlineFacade<F> {
    inner: F,
    deadline: Option<Duration>,
}

impl<F: NetworkFacade> DeadlineFacade<F> {
    pub fn new(inner: F, deadline: Option<Duration>) -> Self {
        Self { inner, deadline }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: NetworkFacade> NetworkFacade for DeadlineFacade<F> {
    async fn http_get(&self, url: &str) -> Result<HttpResult> {
        with_deadline("http.get", self.deadline, self.inner.http_get(url)).await
    }

    async fn http_post(&self, url: &str, body: serde_json::Value) -> Result<HttpResult> {
        with_deadline("http.post", self.deadline, self.inner.http_post(url, body)).await
    }

    async fn dns_lookup(&self, domain: &str) -> Result<DnsResult> {
        with_deadline("dns.lookup", self.deadline, self.inner.dns_lookup(domain)).await
    }

    async fn geo_lookup(&self, address: &str) -> Result<GeoResult> {
        with_deadline("geo.lookup", self.deadline, self.inner.geo_lookup(address)).await
    }

    async fn ping_test(&self, host: &str, count: u32) -> Result<PingResult> {
        with_deadline("ping.test", self.deadline, self.inner.ping_test(host, count)).await
    }

    async fn identify_service(&self, port: u16, banner: &str) -> Result<ServiceIdentification> {
        with_deadline("discovery.identify", self.deadline, self.inner.identify_service(port, banner)).await
    }
}
