use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub device_gid: u64,
    pub device_name: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    /// Channel number as reported by the vendor, `"1,2,3"` for the
    /// combined mains.
    pub channel_num: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Instant usage keyed by device gid, then channel number. Readings are
/// kWh accumulated over one bucket of the requested scale; buckets with
/// no data arrive as null.
pub type UsageByDevice = HashMap<u64, DeviceUsage>;

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceUsage {
    pub channels: HashMap<String, ChannelUsage>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChannelUsage {
    pub usage: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartUsage {
    pub usage: Vec<Option<f64>>,
    #[serde(default)]
    pub start_time: Option<String>,
}
