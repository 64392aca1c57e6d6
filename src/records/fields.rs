//! Field coercions applied while projecting raw records into table rows.

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Whole floats inside the i64 range. `i64::MAX as f64` rounds up to 2^63,
/// so the upper bound is exclusive.
fn integral_f64(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

impl Numeric {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int(value) => Some(*value),
            Numeric::Float(value) => integral_f64(*value),
            Numeric::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(integral_f64))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Numeric::Int(value) => value.to_string(),
            Numeric::Float(value) => value.to_string(),
            Numeric::Text(text) => format!("{:?}", text),
        }
    }
}

/// Accepts an integer id given either as a JSON number or as a numeric
/// string, e.g. `39` or `"39"`.
pub fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Numeric::deserialize(deserializer)?;
    raw.to_i64()
        .ok_or_else(|| de::Error::custom(format!("{} is not a numeric id", raw.describe())))
}

/// Converts milliseconds since the Unix epoch into a UTC timestamp.
pub fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Numeric::deserialize(deserializer)?;
    raw.to_i64()
        .and_then(DateTime::from_timestamp_millis)
        .map(|ts| ts.naive_utc())
        .ok_or_else(|| {
            de::Error::custom(format!("{} is not a valid epoch timestamp", raw.describe()))
        })
}
