//! HTTP transport adapter
//!
//! Implements one delivery attempt against one candidate endpoint and maps
//! the result onto the port's tagged [`SendOutcome`]:
//!
//! - connect/DNS failure or an elapsed timeout → `Unreachable`
//! - non-2xx status → `Rejected` with the status line
//! - 2xx whose JSON envelope carries `success: false` → `Rejected` (the
//!   sink's application-level failure signal)
//! - any other 2xx → `Delivered` with the parsed body as receipt
//!
//! The payload travels as the JSON serialization of [`Payload`]; the local
//! entry id is not part of the payload and never reaches the wire.

use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use outbox_core::domain::newtypes::EndpointUrl;
use outbox_core::domain::submission::Payload;
use outbox_core::ports::transport::{ITransport, RemoteReceipt, SendOutcome};

/// Reqwest-based implementation of the transport port
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose every attempt is bounded by `timeout`
    ///
    /// The timeout covers the whole attempt (connect, write, response read)
    /// so an unreachable endpoint cannot stall the candidate loop.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Render a reqwest failure into a display reason
    fn describe(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "attempt timed out".to_string()
        } else if error.is_connect() {
            format!("connect failed: {error}")
        } else {
            error.to_string()
        }
    }
}

#[async_trait::async_trait]
impl ITransport for HttpTransport {
    async fn send(&self, endpoint: &EndpointUrl, payload: &Payload) -> SendOutcome {
        debug!(endpoint = %endpoint, fields = payload.len(), "posting submission");

        let response = match self
            .client
            .post(endpoint.as_url().clone())
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return SendOutcome::Unreachable {
                    reason: Self::describe(&e),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return SendOutcome::Rejected {
                reason: status.to_string(),
            };
        }

        // 2xx. The sink may still signal application-level failure inside
        // its JSON envelope ({"success": false, "message": ...}).
        match response.json::<Value>().await {
            Ok(body) => {
                if body.get("success").and_then(Value::as_bool) == Some(false) {
                    let reason = body
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("endpoint reported failure")
                        .to_string();
                    SendOutcome::Rejected { reason }
                } else {
                    SendOutcome::Delivered {
                        receipt: RemoteReceipt { body },
                    }
                }
            }
            // A 2xx without a JSON body still counts as a success indication.
            Err(_) => SendOutcome::Delivered {
                receipt: RemoteReceipt::empty(),
            },
        }
    }

    async fn list_remote(&self, endpoint: &EndpointUrl) -> anyhow::Result<Vec<Value>> {
        let response = self
            .client
            .get(endpoint.as_url().clone())
            .send()
            .await
            .context("listing request failed")?
            .error_for_status()
            .context("listing request rejected")?;

        let body: Value = response
            .json()
            .await
            .context("listing body is not valid JSON")?;

        // Accept a bare array or the sink's {"submissions": [...]} envelope.
        match body {
            Value::Array(items) => Ok(items),
            Value::Object(mut map) => match map.remove("submissions") {
                Some(Value::Array(items)) => Ok(items),
                _ => anyhow::bail!("unrecognized listing shape"),
            },
            _ => anyhow::bail!("unrecognized listing shape"),
        }
    }
}
