//! W3C WebDriver / Appium HTTP client.
//!
//! Speaks the minimal subset of the wire protocol the orchestrator needs:
//! session create/delete, action delivery, window rect, and element
//! find-and-click. Capability contents are passed through verbatim from
//! [`DriverConfig`]; mobgrab does not validate the schema.

use std::time::Duration;

use async_trait::async_trait;
use mobgrab_common::config::DriverConfig;
use mobgrab_common::error::{MobgrabError, MobgrabResult};

use crate::session::{AutomationSession, WindowSize};

/// Key under which the W3C protocol nests an element id.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Poll interval while waiting for an element to appear.
const FIND_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A live WebDriver session against an Appium-style automation server.
pub struct WebDriverSession {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WebDriverSession {
    /// Open a new session, negotiating the configured capabilities.
    pub async fn open(config: &DriverConfig) -> MobgrabResult<Self> {
        let http = reqwest::Client::new();
        let base_url = config.server_url.trim_end_matches('/').to_string();
        let body = serde_json::json!({
            "capabilities": { "alwaysMatch": config.capabilities() }
        });

        tracing::info!(server = %base_url, device = %config.device_name, "Opening automation session");

        let response = http
            .post(format!("{base_url}/session"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                MobgrabError::session(format!("failed to reach automation server: {e}"))
            })?;
        let value = unpack(response).await?;

        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| MobgrabError::session(format!("no sessionId in response: {value}")))?
            .to_string();

        tracing::info!(session_id = %session_id, "Session opened");

        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    /// The negotiated session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{}/session/{}", self.base_url, self.session_id)
        } else {
            format!("{}/session/{}/{}", self.base_url, self.session_id, suffix)
        }
    }

    async fn post(&self, suffix: &str, body: serde_json::Value) -> MobgrabResult<serde_json::Value> {
        let response = self
            .http
            .post(self.url(suffix))
            .json(&body)
            .send()
            .await
            .map_err(|e| MobgrabError::session(format!("request to '{suffix}' failed: {e}")))?;
        unpack(response).await
    }

    async fn get(&self, suffix: &str) -> MobgrabResult<serde_json::Value> {
        let response = self
            .http
            .get(self.url(suffix))
            .send()
            .await
            .map_err(|e| MobgrabError::session(format!("request to '{suffix}' failed: {e}")))?;
        unpack(response).await
    }

    async fn delete(&self, suffix: &str) -> MobgrabResult<serde_json::Value> {
        let response = self
            .http
            .delete(self.url(suffix))
            .send()
            .await
            .map_err(|e| MobgrabError::session(format!("delete of '{suffix}' failed: {e}")))?;
        unpack(response).await
    }

    /// Find one element by xpath selector. Returns the opaque element id.
    async fn find_element(&self, selector: &str) -> MobgrabResult<String> {
        let value = self
            .post(
                "element",
                serde_json::json!({ "using": "xpath", "value": selector }),
            )
            .await?;
        value[ELEMENT_KEY]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MobgrabError::session(format!("no element id in response: {value}")))
    }
}

#[async_trait]
impl AutomationSession for WebDriverSession {
    async fn perform_actions(&self, actions: serde_json::Value) -> MobgrabResult<()> {
        self.post("actions", actions).await?;
        Ok(())
    }

    async fn release_actions(&self) -> MobgrabResult<()> {
        self.delete("actions").await?;
        Ok(())
    }

    async fn window_size(&self) -> MobgrabResult<WindowSize> {
        let value = self.get("window/rect").await?;
        let width = value["width"].as_f64();
        let height = value["height"].as_f64();
        match (width, height) {
            (Some(w), Some(h)) if w >= 0.0 && h >= 0.0 => Ok(WindowSize {
                width: w as u32,
                height: h as u32,
            }),
            _ => Err(MobgrabError::session(format!(
                "malformed window rect: {value}"
            ))),
        }
    }

    async fn pause(&self, duration: Duration) -> MobgrabResult<()> {
        // A driver pause is a pure client-side wait; the session stays live.
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn wait_and_click(&self, selector: &str, timeout: Duration) -> MobgrabResult<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        let element_id = loop {
            match self.find_element(selector).await {
                Ok(id) => break id,
                Err(e) if tokio::time::Instant::now() >= deadline => {
                    return Err(MobgrabError::session(format!(
                        "element not found within {timeout:?}: {selector} ({e})"
                    )));
                }
                Err(_) => tokio::time::sleep(FIND_POLL_INTERVAL).await,
            }
        };

        tracing::debug!(selector, element_id = %element_id, "Clicking element");
        self.post(&format!("element/{element_id}/click"), serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn delete_session(&self) -> MobgrabResult<()> {
        tracing::info!(session_id = %self.session_id, "Closing automation session");
        self.delete("").await?;
        Ok(())
    }
}

/// Check the HTTP status and unwrap the `value` envelope of a WebDriver
/// response, mapping protocol errors to `Session` errors with the server's
/// own message attached.
async fn unpack(response: reqwest::Response) -> MobgrabResult<serde_json::Value> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| MobgrabError::session(format!("malformed driver response: {e}")))?;

    if !status.is_success() {
        let message = body["value"]["message"]
            .as_str()
            .unwrap_or("unknown driver error");
        return Err(MobgrabError::session(format!(
            "driver returned {status}: {message}"
        )));
    }

    Ok(body["value"].clone())
}
