use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::error::ValidationError;
use crate::models::location_record::{coerce_f64, format_timestamp, millis_to_timestamp, NewLocation};

/// Body of `POST /api/location`, as loosely typed as clients send it. Only a
/// JSON object deserializes; unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct LocationPayload {
    pub latitude: Option<Value>,
    pub longitude: Option<Value>,
    pub accuracy: Option<Value>,
    pub timestamp: Option<Value>,
}

impl From<Map<String, Value>> for LocationPayload {
    fn from(mut body: Map<String, Value>) -> Self {
        Self {
            latitude: body.remove("latitude"),
            longitude: body.remove("longitude"),
            accuracy: body.remove("accuracy"),
            timestamp: body.remove("timestamp"),
        }
    }
}

impl LocationPayload {
    /// Checks the coordinates and fills the defaults. `now` stands in for a
    /// missing timestamp.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewLocation, ValidationError> {
        let (latitude, longitude) = match (
            self.latitude.as_ref().and_then(coerce_f64),
            self.longitude.as_ref().and_then(coerce_f64),
        ) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ValidationError::MissingCoordinates),
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange);
        }

        let timestamp = match self.timestamp {
            None | Some(Value::Null) => format_timestamp(now),
            Some(Value::String(s)) if s.trim().is_empty() => format_timestamp(now),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => {
                millis_to_timestamp(&n).ok_or(ValidationError::InvalidTimestamp)?
            }
            Some(_) => return Err(ValidationError::InvalidTimestamp),
        };

        Ok(NewLocation {
            latitude,
            longitude,
            accuracy: self.accuracy.as_ref().and_then(coerce_f64),
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(body: Value) -> LocationPayload {
        serde_json::from_value(body).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn accepts_a_full_fix() {
        let fix = payload(json!({
            "latitude": 37.7749,
            "longitude": -122.4194,
            "accuracy": 5,
            "timestamp": "2024-05-01T12:00:00.000Z"
        }))
        .validate(now())
        .unwrap();

        assert_eq!(fix.latitude, 37.7749);
        assert_eq!(fix.longitude, -122.4194);
        assert_eq!(fix.accuracy, Some(5.0));
        assert_eq!(fix.timestamp, "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn defaults_accuracy_and_timestamp() {
        let fix = payload(json!({"latitude": 1.5, "longitude": 2.5}))
            .validate(now())
            .unwrap();

        assert_eq!(fix.accuracy, None);
        assert_eq!(fix.timestamp, "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn coerces_numeric_strings() {
        let fix = payload(json!({"latitude": "-33.86", "longitude": " 151.21 ", "accuracy": "12.5"}))
            .validate(now())
            .unwrap();

        assert_eq!(fix.latitude, -33.86);
        assert_eq!(fix.longitude, 151.21);
        assert_eq!(fix.accuracy, Some(12.5));
    }

    #[test]
    fn zero_is_a_coordinate() {
        let fix = payload(json!({"latitude": 0, "longitude": 0}))
            .validate(now())
            .unwrap();

        assert_eq!((fix.latitude, fix.longitude), (0.0, 0.0));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(payload(json!({"latitude": 90, "longitude": -180})).validate(now()).is_ok());
        assert!(payload(json!({"latitude": -90, "longitude": 180})).validate(now()).is_ok());
    }

    #[test]
    fn missing_or_unusable_coordinates() {
        for body in [
            json!({"longitude": 10}),
            json!({"latitude": 10}),
            json!({"latitude": null, "longitude": 10}),
            json!({"latitude": "north", "longitude": 10}),
            json!({"latitude": true, "longitude": 10}),
            json!({}),
        ] {
            assert_eq!(
                payload(body.clone()).validate(now()),
                Err(ValidationError::MissingCoordinates),
                "{body}"
            );
        }
    }

    #[test]
    fn out_of_range_coordinates() {
        assert_eq!(
            payload(json!({"latitude": 95, "longitude": 0})).validate(now()),
            Err(ValidationError::LatitudeOutOfRange)
        );
        assert_eq!(
            payload(json!({"latitude": 10, "longitude": -180.5})).validate(now()),
            Err(ValidationError::LongitudeOutOfRange)
        );
    }

    #[test]
    fn numeric_timestamp_is_epoch_millis() {
        let fix = payload(json!({"latitude": 1, "longitude": 1, "timestamp": 1_714_564_800_000i64}))
            .validate(now())
            .unwrap();

        assert_eq!(fix.timestamp, "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn rejects_odd_timestamps() {
        assert_eq!(
            payload(json!({"latitude": 1, "longitude": 1, "timestamp": {"at": 3}})).validate(now()),
            Err(ValidationError::InvalidTimestamp)
        );
    }

    #[test]
    fn only_objects_deserialize() {
        assert!(serde_json::from_value::<LocationPayload>(json!([37.7, -122.4, null, null])).is_err());
        assert!(serde_json::from_value::<LocationPayload>(json!("37.7,-122.4")).is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let fix = payload(json!({"latitude": 1, "longitude": 2, "speed": 3}))
            .validate(now())
            .unwrap();

        assert_eq!((fix.latitude, fix.longitude), (1.0, 2.0));
    }

    #[test]
    fn empty_timestamp_means_now() {
        let fix = payload(json!({"latitude": 1, "longitude": 1, "timestamp": ""}))
            .validate(now())
            .unwrap();

        assert_eq!(fix.timestamp, "2023-11-14T22:13:20.000Z");
    }
}
