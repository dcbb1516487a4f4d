use crate::emporia::client::VueClient;
use crate::emporia::models::{Device, DeviceUsage};
use crate::emporia::scale::{self, Scale};
use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// Timestamp format accepted on the custom-range endpoint, read as UTC.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Channel number Emporia assigns to the combined mains.
const MAINS_CHANNEL: &str = "1,2,3";

/// Connectivity summary for the health endpoint.
#[derive(Debug, Clone)]
pub struct VueHealth {
    pub connected: bool,
    pub devices_count: Option<usize>,
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct EnergyService {
    client: VueClient,
    device_name: String,
}

impl EnergyService {
    pub fn new(client: VueClient, device_name: String) -> Self {
        Self {
            client,
            device_name,
        }
    }

    /// Connectivity check. Never fails; login or listing problems are
    /// reported in the summary and logged server-side.
    pub async fn health(&self) -> VueHealth {
        if let Err(e) = self.client.ensure_session().await {
            tracing::warn!("Health check could not establish a session: {}", e);
            return VueHealth {
                connected: false,
                devices_count: None,
                message: Some("Not connected to Emporia cloud".to_string()),
            };
        }

        match self.client.get_devices().await {
            Ok(devices) => VueHealth {
                connected: true,
                devices_count: Some(devices.len()),
                message: None,
            },
            Err(e) => {
                tracing::warn!("Health check could not list devices: {}", e);
                VueHealth {
                    connected: true,
                    devices_count: None,
                    message: Some("Device listing unavailable".to_string()),
                }
            }
        }
    }

    /// Current power draw of the configured device in kW: the latest
    /// minute bucket converted from kWh and rounded to three decimals.
    pub async fn live_power(&self) -> Result<f64> {
        let device = self.find_device().await?;
        let usage = self
            .client
            .get_device_list_usage(&[device.device_gid], Utc::now(), Scale::Minute)
            .await?;

        let power = usage
            .get(&device.device_gid)
            .map(|device_usage| instant_power_kw(device_usage, Scale::Minute))
            .unwrap_or(0.0);

        Ok(round3(power))
    }

    /// Usage series between two timestamps on the device's first
    /// channel, normalized per the requested scale. All validation
    /// happens before any vendor call.
    pub async fn custom_range(
        &self,
        start_time: Option<&str>,
        end_time: Option<&str>,
        scale: Option<&str>,
    ) -> Result<Vec<f64>> {
        let (start_raw, end_raw) = match (start_time, end_time) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(AppError::Validation(
                    "start_time and end_time are required".to_string(),
                ))
            }
        };

        let start = parse_timestamp(start_raw)?;
        let end = parse_timestamp(end_raw)?;
        if start > end {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let scale = match scale {
            Some(raw) => raw.parse::<Scale>()?,
            None => Scale::Hour,
        };

        let device = self.find_device().await?;
        let channel = device.channels.first().ok_or_else(|| {
            AppError::Vendor(format!("device '{}' has no channels", self.device_name))
        })?;

        let chart = self
            .client
            .get_chart_usage(device.device_gid, &channel.channel_num, start, end, scale)
            .await?;

        Ok(chart
            .usage
            .into_iter()
            .map(|value| scale::normalize(value, scale))
            .collect())
    }

    /// Instant usage for one scale or all six, keyed by scale name then
    /// channel number, in raw kWh per bucket.
    pub async fn standard_usage(
        &self,
        scale: Option<&str>,
    ) -> Result<BTreeMap<String, BTreeMap<String, f64>>> {
        let scales = match scale {
            Some(raw) => match parse_selection(raw)? {
                ScaleSelection::All => Scale::ALL.to_vec(),
                ScaleSelection::One(scale) => vec![scale],
            },
            None => Scale::ALL.to_vec(),
        };

        let device = self.find_device().await?;

        let mut energy_data = BTreeMap::new();
        for scale in scales {
            let usage = self
                .client
                .get_device_list_usage(&[device.device_gid], Utc::now(), scale)
                .await?;

            let channels: BTreeMap<String, f64> = usage
                .get(&device.device_gid)
                .map(|device_usage| {
                    device_usage
                        .channels
                        .iter()
                        .map(|(num, reading)| (num.clone(), reading.usage.unwrap_or(0.0)))
                        .collect()
                })
                .unwrap_or_default();

            energy_data.insert(scale.as_str().to_string(), channels);
        }

        Ok(energy_data)
    }

    /// Case-sensitive exact match against the vendor's current device
    /// list.
    async fn find_device(&self) -> Result<Device> {
        let devices = self.client.get_devices().await?;
        devices
            .into_iter()
            .find(|device| device.device_name == self.device_name)
            .ok_or_else(|| {
                AppError::DeviceNotFound(format!("Device '{}' not found", self.device_name))
            })
    }
}

enum ScaleSelection {
    All,
    One(Scale),
}

fn parse_selection(raw: &str) -> Result<ScaleSelection> {
    if raw.to_uppercase() == "ALL" {
        return Ok(ScaleSelection::All);
    }
    Ok(ScaleSelection::One(raw.parse()?))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid timestamp '{}', expected format YYYY-MM-DD HH:MM:SS",
                raw
            ))
        })
}

/// Instant usage of one device in kW. The combined-mains channel wins
/// when present, otherwise the per-circuit readings are summed.
fn instant_power_kw(usage: &DeviceUsage, scale: Scale) -> f64 {
    if let Some(mains) = usage.channels.get(MAINS_CHANNEL) {
        return scale::normalize(mains.usage, scale);
    }
    usage
        .channels
        .values()
        .map(|channel| scale::normalize(channel.usage, scale))
        .sum()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
