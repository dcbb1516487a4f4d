use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct CustomRangeRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub scale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StandardQuery {
    pub scale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LiveResponse {
    pub live: f64,
}

#[derive(Debug, Serialize)]
pub struct CustomRangeResponse {
    pub usage: Vec<f64>,
}

/// Usage keyed by scale name, then channel number.
#[derive(Debug, Serialize)]
pub struct StandardResponse {
    pub energy_data: BTreeMap<String, BTreeMap<String, f64>>,
}
