use crate::config::EmporiaConfig;
use crate::emporia::models::{AuthResponse, ChartUsage, Device, DevicesResponse, UsageByDevice};
use crate::emporia::scale::Scale;
use crate::error::{AppError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// OAuth client id the Emporia web app authenticates with.
const CLIENT_ID: &str = "EmporiaVueWebApp";
const UNIT: &str = "KWH";

/// Tokens within this margin of expiry are treated as already expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct VueSession {
    access_token: String,
    expires_at: Instant,
}

/// Client for the Emporia Vue cloud holding one shared session per
/// process. Login happens lazily on first use and again once the token
/// nears expiry. A failed login leaves the slot empty so the next
/// request starts a fresh attempt.
#[derive(Clone)]
pub struct VueClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
    password: String,
    session: Arc<RwLock<Option<VueSession>>>,
}

impl VueClient {
    pub fn new(config: &EmporiaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Return the cached access token, logging in when there is none or
    /// the cached one is about to expire.
    pub async fn ensure_session(&self) -> Result<String> {
        {
            let session = self.session.read().await;
            if let Some(ref s) = *session {
                if s.expires_at > Instant::now() {
                    return Ok(s.access_token.clone());
                }
            }
        }

        let mut session = self.session.write().await;
        // Another request may have logged in while we waited for the lock.
        if let Some(ref s) = *session {
            if s.expires_at > Instant::now() {
                return Ok(s.access_token.clone());
            }
        }
        *session = None;

        let url = format!("{}/oauth2/token", self.api_url);
        let body = serde_json::json!({
            "username": self.username,
            "password": self.password,
            "grant_type": "password",
            "client_id": CLIENT_ID,
        });

        let response = self.http.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Auth(format!(
                "login rejected with status {}",
                response.status()
            )));
        }

        let auth: AuthResponse = response.json().await?;
        let lifetime =
            Duration::from_secs(auth.expires_in.saturating_sub(EXPIRY_MARGIN.as_secs()));
        *session = Some(VueSession {
            access_token: auth.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        tracing::info!(
            "Emporia session established, expires in {} sec",
            auth.expires_in
        );
        Ok(auth.access_token)
    }

    /// Fetch the account's device list. Never cached, each call sees the
    /// vendor's current state.
    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let token = self.ensure_session().await?;
        let url = format!("{}/customers/devices", self.api_url);

        tracing::debug!("Fetching Emporia device list");
        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        if !response.status().is_success() {
            return Err(vendor_error("device list", response.status()));
        }

        let devices: DevicesResponse = response.json().await?;
        Ok(devices.devices)
    }

    /// Point-in-time usage for the given devices, one kWh reading per
    /// channel over the bucket containing `instant`.
    pub async fn get_device_list_usage(
        &self,
        device_gids: &[u64],
        instant: DateTime<Utc>,
        scale: Scale,
    ) -> Result<UsageByDevice> {
        let token = self.ensure_session().await?;
        let url = format!("{}/customers/devices/usage", self.api_url);
        let gids = device_gids
            .iter()
            .map(|gid| gid.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let instant_param = instant.to_rfc3339_opts(SecondsFormat::Secs, true);

        tracing::debug!("Fetching instant usage for gids={} scale={}", gids, scale);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("deviceGids", gids.as_str()),
                ("instant", instant_param.as_str()),
                ("scale", scale.as_str()),
                ("unit", UNIT),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(vendor_error("usage", response.status()));
        }

        Ok(response.json().await?)
    }

    /// Bucketed usage series for one channel over `[start, end]`.
    pub async fn get_chart_usage(
        &self,
        device_gid: u64,
        channel_num: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scale: Scale,
    ) -> Result<ChartUsage> {
        let token = self.ensure_session().await?;
        let url = format!("{}/customers/devices/chart", self.api_url);
        let gid = device_gid.to_string();
        let start_param = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end_param = end.to_rfc3339_opts(SecondsFormat::Secs, true);

        tracing::debug!(
            "Fetching chart usage for gid={} channel={} scale={}",
            gid,
            channel_num,
            scale
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("deviceGid", gid.as_str()),
                ("channel", channel_num),
                ("start", start_param.as_str()),
                ("end", end_param.as_str()),
                ("scale", scale.as_str()),
                ("unit", UNIT),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(vendor_error("chart", response.status()));
        }

        Ok(response.json().await?)
    }
}

fn vendor_error(context: &str, status: reqwest::StatusCode) -> AppError {
    AppError::Vendor(format!("{} request returned status {}", context, status))
}
