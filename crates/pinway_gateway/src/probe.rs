//! Gateway liveness probing for diagnostics.
//!
//! Probes are a side channel for debugging unreachable media. They never feed
//! back into resolution order and are never retried.

use crate::GatewayResolver;
use pinway_core::GatewayConfig;
use pinway_error::{GatewayError, GatewayErrorKind, PinwayResult};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Result of probing one gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Position of the gateway in the list
    pub gateway_index: usize,
    /// URL that was probed
    pub url: String,
    /// Whether the gateway answered 2xx within the budget
    pub reachable: bool,
    /// Wall-clock time the probe took
    pub elapsed: Duration,
}

/// Issues bounded `HEAD` requests against gateway URLs.
#[derive(Debug, Clone)]
pub struct GatewayProbe {
    client: Client,
    timeout: Duration,
}

impl GatewayProbe {
    /// Probe with its own HTTP client and the given per-request budget.
    pub fn new(timeout: Duration) -> PinwayResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::new(GatewayErrorKind::ProbeClient(e.to_string())))?;
        Ok(Self::with_client(client, timeout))
    }

    /// Probe sharing an existing HTTP client.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Probe using the configured budget.
    pub fn from_config(config: &GatewayConfig) -> PinwayResult<Self> {
        Self::new(Duration::from_millis(config.probe_timeout_ms))
    }

    /// Per-request budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// True when `url` answers a `HEAD` with 2xx inside the budget.
    ///
    /// Every other outcome (non-2xx, connection failure, timeout, bad URL) is `false`.
    #[instrument(skip(self), fields(timeout_ms = self.timeout.as_millis() as u64))]
    pub async fn check_file(&self, url: &str) -> bool {
        match self.client.head(url).timeout(self.timeout).send().await {
            Ok(response) => {
                let status = response.status();
                debug!(%status, "Probe answered");
                status.is_success()
            }
            Err(e) => {
                debug!(error = %e, timed_out = e.is_timeout(), "Probe failed");
                false
            }
        }
    }

    /// Probe every gateway for one asset, strictly in preference order.
    ///
    /// Returns one report per gateway; an invalid CID yields no reports.
    #[instrument(skip(self, resolver), fields(gateways = resolver.gateways().len()))]
    pub async fn probe_all(
        &self,
        resolver: &GatewayResolver,
        cid: &str,
        subpath: Option<&str>,
    ) -> Vec<ProbeReport> {
        let mut reports = Vec::with_capacity(resolver.gateways().len());
        for gateway_index in 0..resolver.gateways().len() {
            let Ok(url) = resolver.try_resolve_url(cid, subpath, gateway_index) else {
                break;
            };
            let started = Instant::now();
            let reachable = self.check_file(&url).await;
            reports.push(ProbeReport {
                gateway_index,
                url,
                reachable,
                elapsed: started.elapsed(),
            });
        }
        reports
    }
}
