//! Inventory API client.
//!
//! One [`InventoryClient`] is constructed per invocation and passed down
//! explicitly; there is no ambient singleton. Construction performs a
//! pre-flight status call so that an unreachable endpoint or rejected
//! credential fails the run before any scan work starts.
//!
//! Endpoints used:
//!
//! ```text
//! GET   /api/status/                          pre-flight
//! GET   /api/ipam/ip-ranges/?limit=&offset=   one page, server-side window
//! PATCH /api/ipam/ip-ranges/<id>/             flip mark_populated
//! ```

use std::sync::Arc;

use serde::Deserialize;

use rangemark_core::{Config, IpRange, PageWindow, RecordId};

use crate::error::{status_and_detail, ClientError};
use crate::retry::RetryPolicy;
use crate::tls;

/// Blocking client for the inventory API, scoped to one invocation.
#[derive(Debug)]
pub struct InventoryClient {
    agent: ureq::Agent,
    base_url: String,
    auth_header: String,
    retry: RetryPolicy,
}

/// The server's paginated list envelope. `next`/`previous` cursor URLs are
/// ignored: pagination is caller-driven through the page window.
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    count: u64,
    #[serde(default)]
    results: Vec<IpRange>,
}

impl InventoryClient {
    /// Build an agent from the configuration and verify the endpoint with a
    /// pre-flight status call.
    ///
    /// Fails with [`ClientError::TrustAnchor`] when the configured CA bundle
    /// cannot be loaded and [`ClientError::Connection`] when the endpoint is
    /// unreachable or the credential is rejected.
    pub fn connect(config: &Config) -> Result<Self, ClientError> {
        let mut builder = ureq::AgentBuilder::new().timeout(config.timeout);
        if let Some(path) = &config.ca_cert {
            builder = builder.tls_config(Arc::new(tls::client_config_with_anchor(path)?));
        }

        let client = Self {
            agent: builder.build(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth_header: format!("Token {}", config.token),
            retry: RetryPolicy::new(config.retries),
        };
        client.preflight()?;
        Ok(client)
    }

    /// The endpoint this client talks to, without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn preflight(&self) -> Result<(), ClientError> {
        let url = format!("{}/api/status/", self.base_url);
        self.get(&url).call().map_err(|err| {
            let (status, detail) = status_and_detail(err);
            let detail = match status {
                Some(401) | Some(403) => format!("credential rejected ({detail})"),
                _ => detail,
            };
            ClientError::Connection {
                endpoint: self.base_url.clone(),
                detail,
            }
        })?;
        tracing::debug!("pre-flight against {} succeeded", self.base_url);
        Ok(())
    }

    /// Fetch one page of IP range records. The server applies the window;
    /// exactly one request is issued per call (plus opt-in retries).
    pub fn fetch_ip_ranges(&self, window: PageWindow) -> Result<Vec<IpRange>, ClientError> {
        let url = format!("{}/api/ipam/ip-ranges/", self.base_url);
        let response = self.retry.run(|| {
            self.get(&url)
                .query("limit", &window.limit.to_string())
                .query("offset", &window.offset.to_string())
                .call()
                .map_err(|err| {
                    let (status, detail) = status_and_detail(err);
                    ClientError::Fetch {
                        endpoint: self.base_url.clone(),
                        status,
                        detail,
                    }
                })
        })?;

        let envelope: ListEnvelope =
            response.into_json().map_err(|err| ClientError::Decode {
                endpoint: self.base_url.clone(),
                detail: err.to_string(),
            })?;
        tracing::debug!(
            "fetched {} of {} ip-range record(s) (limit={}, offset={})",
            envelope.results.len(),
            envelope.count,
            window.limit,
            window.offset
        );
        Ok(envelope.results)
    }

    /// Set `mark_populated = true` on one record.
    ///
    /// Safe to repeat: patching an already-populated record is a no-op on the
    /// server side.
    pub fn mark_populated(&self, id: RecordId) -> Result<(), ClientError> {
        let url = format!("{}/api/ipam/ip-ranges/{id}/", self.base_url);
        self.retry.run(|| {
            self.agent
                .request("PATCH", &url)
                .set("Authorization", &self.auth_header)
                .set("Accept", "application/json")
                .send_json(serde_json::json!({ "mark_populated": true }))
                .map_err(|err| {
                    let (status, detail) = status_and_detail(err);
                    ClientError::Patch { id, status, detail }
                })
        })?;
        tracing::debug!("patched ip-range {id}");
        Ok(())
    }

    fn get(&self, url: &str) -> ureq::Request {
        self.agent
            .get(url)
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
    }
}
