use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Reporting granularity of the Emporia cloud. The vendor returns
/// accumulated kWh per bucket of this width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Scale {
    pub const ALL: [Scale; 6] = [
        Scale::Second,
        Scale::Minute,
        Scale::Hour,
        Scale::Day,
        Scale::Month,
        Scale::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Second => "SECOND",
            Scale::Minute => "MINUTE",
            Scale::Hour => "HOUR",
            Scale::Day => "DAY",
            Scale::Month => "MONTH",
            Scale::Year => "YEAR",
        }
    }

    /// Multiplier converting a kWh-per-bucket reading into kilowatts.
    /// Buckets of an hour and coarser are reported as-is.
    pub fn kw_multiplier(&self) -> f64 {
        match self {
            Scale::Second => 3600.0,
            Scale::Minute => 60.0,
            Scale::Hour | Scale::Day | Scale::Month | Scale::Year => 1.0,
        }
    }
}

impl FromStr for Scale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SECOND" => Ok(Scale::Second),
            "MINUTE" => Ok(Scale::Minute),
            "HOUR" => Ok(Scale::Hour),
            "DAY" => Ok(Scale::Day),
            "MONTH" => Ok(Scale::Month),
            "YEAR" => Ok(Scale::Year),
            _ => Err(AppError::Validation(format!(
                "Invalid scale: {}. Supported: SECOND, MINUTE, HOUR, DAY, MONTH, YEAR",
                s
            ))),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Missing channel readings count as zero before unit conversion.
pub fn normalize(value: Option<f64>, scale: Scale) -> f64 {
    value.unwrap_or(0.0) * scale.kw_multiplier()
}
