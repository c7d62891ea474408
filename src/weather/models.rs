use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder for text fields the provider leaves out
pub const UNKNOWN: &str = "unknown";

// ============================================================================
// Normalized output
// ============================================================================

/// Current conditions for one place, with every field populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherRecord {
    pub location: LocationRecord,
    pub current: CurrentRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationRecord {
    pub name: String,
    pub country: String,
    /// Local time at the location, `null` when the provider omits it
    pub localtime: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub localtime_epoch: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurrentRecord {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: ConditionRecord,
    pub wind_kph: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionRecord {
    pub code: i64,
    pub text: String,
    pub icon: String,
}

// ============================================================================
// Provider payload (current.json)
// Every field is optional: the mapping below decides the defaults.
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct UpstreamPayload {
    pub location: Option<UpstreamLocation>,
    pub current: Option<UpstreamConditions>,
    pub error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpstreamLocation {
    pub name: Option<String>,
    pub country: Option<String>,
    pub localtime: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub localtime_epoch: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpstreamConditions {
    pub temp_c: Option<f64>,
    pub temp_f: Option<f64>,
    pub condition: Option<UpstreamCondition>,
    pub wind_kph: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpstreamCondition {
    pub code: Option<i64>,
    pub text: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamErrorDetail {
    pub code: Option<i64>,
    pub message: Option<String>,
}

/// Provider error code for "No matching location found."
pub const LOCATION_NOT_FOUND_CODE: i64 = 1006;

impl UpstreamPayload {
    pub fn error_code(&self) -> Option<i64> {
        self.error.as_ref().and_then(|e| e.code)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.message.as_deref())
    }

    pub fn is_location_not_found(&self) -> bool {
        self.error_code() == Some(LOCATION_NOT_FOUND_CODE)
    }
}

/// Coordinates used when the provider omits `location.lat` / `location.lon`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateFallback {
    pub lat: f64,
    pub lon: f64,
}

/// Empty strings are treated the same as absent ones
fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl WeatherRecord {
    /// Build a record from the two provider sections, substituting defaults
    pub fn from_upstream(
        location: UpstreamLocation,
        current: UpstreamConditions,
        fallback: CoordinateFallback,
    ) -> Self {
        let condition = current.condition.unwrap_or_default();

        Self {
            location: LocationRecord {
                name: text_or(location.name, UNKNOWN),
                country: text_or(location.country, UNKNOWN),
                localtime: location.localtime.filter(|t| !t.is_empty()),
                lat: location.lat.unwrap_or(fallback.lat),
                lon: location.lon.unwrap_or(fallback.lon),
                localtime_epoch: location.localtime_epoch.unwrap_or(0),
            },
            current: CurrentRecord {
                temp_c: current.temp_c.unwrap_or(0.0),
                temp_f: current.temp_f.unwrap_or(0.0),
                condition: ConditionRecord {
                    code: condition.code.unwrap_or(0),
                    text: text_or(condition.text, UNKNOWN),
                    icon: condition.icon.unwrap_or_default(),
                },
                wind_kph: current.wind_kph.unwrap_or(0.0),
                humidity: current.humidity.unwrap_or(0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_take_every_default() {
        let record = WeatherRecord::from_upstream(
            UpstreamLocation::default(),
            UpstreamConditions::default(),
            CoordinateFallback::default(),
        );

        assert_eq!(record.location.name, UNKNOWN);
        assert_eq!(record.location.country, UNKNOWN);
        assert_eq!(record.location.localtime, None);
        assert_eq!(record.location.lat, 0.0);
        assert_eq!(record.location.lon, 0.0);
        assert_eq!(record.location.localtime_epoch, 0);
        assert_eq!(record.current.temp_c, 0.0);
        assert_eq!(record.current.temp_f, 0.0);
        assert_eq!(record.current.condition.code, 0);
        assert_eq!(record.current.condition.text, UNKNOWN);
        assert_eq!(record.current.condition.icon, "");
        assert_eq!(record.current.wind_kph, 0.0);
        assert_eq!(record.current.humidity, 0.0);
    }

    #[test]
    fn test_missing_coordinates_use_fallback() {
        let record = WeatherRecord::from_upstream(
            UpstreamLocation {
                name: Some("Quito".to_string()),
                ..Default::default()
            },
            UpstreamConditions::default(),
            CoordinateFallback {
                lat: -0.18,
                lon: -78.47,
            },
        );

        assert_eq!(record.location.lat, -0.18);
        assert_eq!(record.location.lon, -78.47);
    }

    #[test]
    fn test_zero_values_are_kept() {
        // 0 is a real reading, not a missing one
        let record = WeatherRecord::from_upstream(
            UpstreamLocation {
                lat: Some(0.0),
                lon: Some(0.0),
                ..Default::default()
            },
            UpstreamConditions {
                temp_c: Some(0.0),
                humidity: Some(0.0),
                ..Default::default()
            },
            CoordinateFallback { lat: 5.0, lon: 5.0 },
        );

        assert_eq!(record.location.lat, 0.0);
        assert_eq!(record.location.lon, 0.0);
        assert_eq!(record.current.temp_c, 0.0);
    }

    #[test]
    fn test_empty_strings_take_defaults() {
        let record = WeatherRecord::from_upstream(
            UpstreamLocation {
                name: Some(String::new()),
                localtime: Some(String::new()),
                ..Default::default()
            },
            UpstreamConditions {
                condition: Some(UpstreamCondition {
                    text: Some(String::new()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            CoordinateFallback::default(),
        );

        assert_eq!(record.location.name, UNKNOWN);
        assert_eq!(record.location.localtime, None);
        assert_eq!(record.current.condition.text, UNKNOWN);
    }

    #[test]
    fn test_payload_detects_location_not_found() {
        let payload: UpstreamPayload = serde_json::from_str(
            r#"{"error":{"code":1006,"message":"No matching location found."}}"#,
        )
        .unwrap();

        assert!(payload.is_location_not_found());
        assert_eq!(payload.error_message(), Some("No matching location found."));
        assert!(payload.location.is_none());
    }

    #[test]
    fn test_null_localtime_serializes_as_null() {
        let record = WeatherRecord::from_upstream(
            UpstreamLocation::default(),
            UpstreamConditions::default(),
            CoordinateFallback::default(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["location"]["localtime"].is_null());
    }
}
