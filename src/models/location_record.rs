use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// One stored fix, with the identity and receipt time the server assigned.
///
/// Deserialization is lenient about `timestamp` and `accuracy` so data files
/// holding client values verbatim (numeric timestamps, string accuracies)
/// still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "lenient_accuracy")]
    pub accuracy: Option<f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: String,
    #[serde(with = "millis")]
    pub received_at: DateTime<Utc>,
}

/// A validated fix that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub timestamp: String,
}

impl NewLocation {
    /// A fix taken now, with no accuracy.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: format_timestamp(Utc::now()),
        }
    }

    /// `received_at` is cut to milliseconds, the precision it is stored with.
    pub fn into_record(self, id: u64, received_at: DateTime<Utc>) -> LocationRecord {
        LocationRecord {
            id,
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.accuracy,
            timestamp: self.timestamp,
            received_at: received_at.trunc_subsecs(3),
        }
    }
}

/// `2024-01-01T00:00:00.000Z`, the shape clients send and expect back.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Epoch milliseconds (fractions truncated) as a formatted timestamp.
pub fn millis_to_timestamp(n: &Number) -> Option<String> {
    n.as_i64()
        .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(format_timestamp)
}

// Numbers and numeric strings; everything else counts as absent.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn lenient_accuracy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(coerce_f64(&Value::deserialize(deserializer)?))
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => millis_to_timestamp(&n)
            .ok_or_else(|| D::Error::custom(format!("timestamp {} is out of range", n))),
        other => Err(D::Error::custom(format!("unsupported timestamp {}", other))),
    }
}

mod millis {
    use super::*;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(*at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}
