//! Resolved fan strategy
//!
//! A `Strategy` is the read-only view handed to the fan control loop. It is
//! built from the raw parameter object of one entry in `strategies`.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::constants::strategy as params;
use crate::data::coercion::is_truthy;
use crate::error::{FanctlError, Result};

/// One control point of a speed curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedCurvePoint {
    /// Temperature in degrees Celsius
    #[serde(deserialize_with = "integral_i64")]
    pub temp: i64,
    /// Fan speed in percent
    #[serde(deserialize_with = "integral_u8")]
    pub speed: u8,
}

/// A named fan strategy with defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    #[serde(skip)]
    pub name: String,
    pub fan_speed_update_frequency: u64,
    pub moving_average_interval: u64,
    pub temperature_polling_interval: u64,
    pub speed_curve: Vec<SpeedCurvePoint>,
}

impl Strategy {
    /// Build a strategy from its name and raw parameter object
    ///
    /// Values are expected to have passed schema validation already; only
    /// the defaulting rules are applied here.
    pub fn new(name: impl Into<String>, parameters: &Map<String, Value>) -> Result<Self> {
        let fan_speed_update_frequency = unless_blank(
            parameters.get(params::FAN_SPEED_UPDATE_FREQUENCY),
            params::FAN_SPEED_UPDATE_FREQUENCY,
            params::DEFAULT_FAN_SPEED_UPDATE_FREQUENCY,
        )?;

        let moving_average_interval = unless_blank(
            parameters.get(params::MOVING_AVERAGE_INTERVAL),
            params::MOVING_AVERAGE_INTERVAL,
            params::DEFAULT_MOVING_AVERAGE_INTERVAL,
        )?;

        // Zero is not a usable polling interval, so any falsy value falls back
        let temperature_polling_interval = match parameters.get(params::TEMPERATURE_POLLING_INTERVAL) {
            Some(value) if is_truthy(value) => {
                as_count(value, params::TEMPERATURE_POLLING_INTERVAL)?
            }
            _ => params::DEFAULT_TEMPERATURE_POLLING_INTERVAL,
        };

        let curve = parameters
            .get(params::SPEED_CURVE)
            .ok_or_else(|| FanctlError::MissingField(params::SPEED_CURVE.to_string()))?;
        let speed_curve: Vec<SpeedCurvePoint> = serde_json::from_value(curve.clone())
            .map_err(|e| FanctlError::invalid_config(params::SPEED_CURVE, e.to_string()))?;

        Ok(Self {
            name: name.into(),
            fan_speed_update_frequency,
            moving_average_interval,
            temperature_polling_interval,
            speed_curve,
        })
    }

    /// Canonical object with all four parameters
    pub fn to_value(&self) -> Value {
        // Plain integers and structs cannot fail to serialize
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Interval between fan speed updates
    pub fn fan_speed_update_period(&self) -> Duration {
        Duration::from_secs(self.fan_speed_update_frequency)
    }

    /// Interval between temperature reads
    pub fn temperature_polling_period(&self) -> Duration {
        Duration::from_secs(self.temperature_polling_interval)
    }
}

/// Provided value unless absent, null, or the empty string
fn unless_blank(value: Option<&Value>, field: &str, default: u64) -> Result<u64> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(s)) if s.is_empty() => Ok(default),
        Some(value) => as_count(value, field),
    }
}

fn as_count(value: &Value, field: &str) -> Result<u64> {
    let count = match value {
        Value::Number(n) => integral(n).and_then(|i| u64::try_from(i).ok()),
        _ => None,
    };
    count.ok_or_else(|| {
        FanctlError::invalid_config(field, format!("expected a non-negative integer, got {}", value))
    })
}

/// Whole-number value of a JSON number; `5.0` counts as an integer
fn integral(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn integral_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    integral(&n).ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", n)))
}

fn integral_u8<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    integral(&n)
        .and_then(|i| u8::try_from(i).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer in 0..=255, got {}", n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params_of(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test parameters must be an object"),
        }
    }

    #[test]
    fn test_values_are_taken_as_given() {
        let parameters = params_of(json!({
            "fanSpeedUpdateFrequency": 3,
            "movingAverageInterval": 15,
            "temperaturePollingInterval": 2,
            "speedCurve": [{"temp": 40, "speed": 20}, {"temp": 80, "speed": 100}]
        }));
        let strategy = Strategy::new("agile", &parameters).unwrap();

        assert_eq!(strategy.name, "agile");
        assert_eq!(strategy.fan_speed_update_frequency, 3);
        assert_eq!(strategy.moving_average_interval, 15);
        assert_eq!(strategy.temperature_polling_interval, 2);
        assert_eq!(strategy.speed_curve.len(), 2);
        assert_eq!(strategy.speed_curve[1], SpeedCurvePoint { temp: 80, speed: 100 });
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let parameters = params_of(json!({
            "fanSpeedUpdateFrequency": "",
            "speedCurve": []
        }));
        let strategy = Strategy::new("s", &parameters).unwrap();

        assert_eq!(strategy.fan_speed_update_frequency, 5);
        assert_eq!(strategy.moving_average_interval, 20);
        assert_eq!(strategy.temperature_polling_interval, 1);
    }

    #[test]
    fn test_zero_polling_interval_falls_back() {
        let parameters = params_of(json!({
            "fanSpeedUpdateFrequency": 5,
            "movingAverageInterval": 20,
            "temperaturePollingInterval": 0,
            "speedCurve": []
        }));
        let strategy = Strategy::new("s", &parameters).unwrap();
        assert_eq!(strategy.temperature_polling_interval, 1);
        assert_eq!(strategy.temperature_polling_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_whole_number_floats_are_integers() {
        let parameters = params_of(json!({
            "fanSpeedUpdateFrequency": 5.0,
            "movingAverageInterval": 20.0,
            "temperaturePollingInterval": 2.0,
            "speedCurve": [{"temp": 40.0, "speed": 20.0}, {"temp": -5, "speed": 0}]
        }));
        let strategy = Strategy::new("s", &parameters).unwrap();

        assert_eq!(strategy.fan_speed_update_frequency, 5);
        assert_eq!(strategy.moving_average_interval, 20);
        assert_eq!(strategy.temperature_polling_interval, 2);
        assert_eq!(strategy.speed_curve[0], SpeedCurvePoint { temp: 40, speed: 20 });
        assert_eq!(strategy.speed_curve[1], SpeedCurvePoint { temp: -5, speed: 0 });
    }

    #[test]
    fn test_fractional_values_are_rejected() {
        let parameters = params_of(json!({"fanSpeedUpdateFrequency": 2.5, "speedCurve": []}));
        assert!(matches!(
            Strategy::new("s", &parameters),
            Err(FanctlError::InvalidConfig { .. })
        ));

        let parameters = params_of(json!({"speedCurve": [{"temp": 40.5, "speed": 20}]}));
        assert!(Strategy::new("s", &parameters).is_err());
    }

    #[test]
    fn test_missing_speed_curve_fails() {
        let parameters = params_of(json!({"fanSpeedUpdateFrequency": 5}));
        let err = Strategy::new("s", &parameters).unwrap_err();
        assert!(matches!(err, FanctlError::MissingField(ref f) if f == "speedCurve"));
    }

    #[test]
    fn test_to_value_has_all_four_keys() {
        let parameters = params_of(json!({"speedCurve": [{"temp": 0, "speed": 15}]}));
        let strategy = Strategy::new("s", &parameters).unwrap();

        assert_eq!(
            strategy.to_value(),
            json!({
                "fanSpeedUpdateFrequency": 5,
                "movingAverageInterval": 20,
                "temperaturePollingInterval": 1,
                "speedCurve": [{"temp": 0, "speed": 15}]
            })
        );
    }
}
