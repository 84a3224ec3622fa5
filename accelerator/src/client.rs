use crate::{
    block::{is_accelerated_block, MinedBlock},
    config::AcceleratorConfig,
    error::{Error, Result},
    model::{Acceleration, AccelerationHistory},
    outcome::FetchOutcome,
};
use mempool_core::{time::Stopwatch, trace, warn};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

pub const ACCELERATIONS_PATH: &str = "/accelerator/accelerations";
pub const ACCELERATION_HISTORY_PATH: &str = "/accelerator/accelerations/history";

/// Fetches slower than this (in milliseconds) get reported by the stopwatch
const SLOW_FETCH_THRESHOLD: u64 = 2000;

#[derive(Debug, Default, Serialize)]
struct HistoryQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

impl HistoryQuery<'_> {
    fn is_empty(&self) -> bool {
        self.page.is_none() && self.status.is_none()
    }
}

/// Read-only client of the accelerator endpoints of the mempool services backend.
///
/// Fetch failures never reach the caller: they are logged as warnings and reported as
/// [`FetchOutcome::Unavailable`]. The client holds no mutable state and can be shared freely.
#[derive(Clone, Debug)]
pub struct AccelerationClient {
    config: AcceleratorConfig,
    http: Client,
}

impl AccelerationClient {
    pub fn new(config: AcceleratorConfig) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { config, http })
    }

    /// Client bypassing any system proxy, so tests can reach local stub servers
    #[cfg(test)]
    pub(crate) fn without_proxy(config: AcceleratorConfig) -> Self {
        Self { config, http: Client::builder().no_proxy().build().unwrap() }
    }

    pub fn config(&self) -> &AcceleratorConfig {
        &self.config
    }

    /// Fetches the currently active accelerations, in upstream order
    pub async fn fetch_accelerations(&self) -> FetchOutcome<Acceleration> {
        if !self.config.enabled {
            return FetchOutcome::Disabled;
        }
        let _sw = Stopwatch::<SLOW_FETCH_THRESHOLD>::with_threshold("fetch-accelerations");
        let request = self.http.get(self.config.endpoint(ACCELERATIONS_PATH));
        match self.get_json(request).await {
            Ok(accelerations) => {
                trace!("Fetched {} current accelerations", accelerations.len());
                FetchOutcome::Fetched(accelerations)
            }
            Err(err) => {
                warn!("Failed to fetch current accelerations from the mempool services backend: {}", err);
                FetchOutcome::Unavailable
            }
        }
    }

    /// Fetches a page of the acceleration history, optionally filtered by status.
    ///
    /// Both parameters are forwarded verbatim and omitted from the query when `None`.
    pub async fn fetch_acceleration_history(&self, page: Option<u32>, status: Option<&str>) -> FetchOutcome<AccelerationHistory> {
        if !self.config.enabled {
            return FetchOutcome::Disabled;
        }
        let _sw = Stopwatch::<SLOW_FETCH_THRESHOLD>::with_threshold("fetch-acceleration-history");
        let query = HistoryQuery { page, status };
        let mut request = self.http.get(self.config.endpoint(ACCELERATION_HISTORY_PATH));
        if !query.is_empty() {
            request = request.query(&query);
        }
        match self.get_json(request).await {
            Ok(history) => {
                trace!("Fetched {} acceleration history records (page: {:?}, status: {:?})", history.len(), page, status);
                FetchOutcome::Fetched(history)
            }
            Err(err) => {
                warn!("Failed to fetch acceleration history from the mempool services backend: {}", err);
                FetchOutcome::Unavailable
            }
        }
    }

    /// Returns true if `block` was mined by a pool credited with any of `accelerations`
    pub fn is_accelerated_block<B: MinedBlock + ?Sized>(&self, block: &B, accelerations: &[Acceleration]) -> bool {
        is_accelerated_block(block, accelerations)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let timeout = self.config.timeout();
        let response = request
            .timeout(timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| Error::from_transport(err, timeout))?;
        let body = response.bytes().await.map_err(|err| Error::from_transport(err, timeout))?;
        Ok(serde_json::from_slice(&body)?)
    }
}
