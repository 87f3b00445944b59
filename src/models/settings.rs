//! User settings models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::user_settings;

/// Page orientation for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrintOrientation {
    Portrait,
    Landscape,
}

impl PrintOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "portrait" => Some(Self::Portrait),
            "landscape" => Some(Self::Landscape),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrintOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub max_file_size_mb: i32,
    pub auto_process_files: bool,
    pub auto_print_enabled: bool,
    pub print_orientation: String,
    pub print_copies: i32,
    pub default_station_id: Option<Uuid>,
    pub last_print_check: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<user_settings::Model> for SettingsResponse {
    fn from(m: user_settings::Model) -> Self {
        SettingsResponse {
            max_file_size_mb: m.max_file_size_mb,
            auto_process_files: m.auto_process_files,
            auto_print_enabled: m.auto_print_enabled,
            print_orientation: m.print_orientation,
            print_copies: m.print_copies,
            default_station_id: m.default_station_id,
            last_print_check: m.last_print_check,
            updated_at: m.updated_at,
        }
    }
}

/// Partial settings update; absent fields are left unchanged.
///
/// `default_station_id` is doubly optional: absent = unchanged, null = clear.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub max_file_size_mb: Option<i32>,
    #[serde(default)]
    pub auto_process_files: Option<bool>,
    #[serde(default)]
    pub auto_print_enabled: Option<bool>,
    #[serde(default)]
    pub print_orientation: Option<String>,
    #[serde(default)]
    pub print_copies: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub default_station_id: Option<Option<Uuid>>,
}

/// Distinguish an absent field from an explicit `null`.
fn deserialize_explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::<Uuid>::deserialize(deserializer)?))
}

/// Response after a settings update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateSettingsResponse {
    pub message: String,
    pub settings: SettingsResponse,
}

/// The print settings a consumer needs to execute a claimed job.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrintSettings {
    pub orientation: String,
    pub copies: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_round_trip() {
        assert_eq!(
            PrintOrientation::parse("portrait"),
            Some(PrintOrientation::Portrait)
        );
        assert_eq!(
            PrintOrientation::parse("landscape"),
            Some(PrintOrientation::Landscape)
        );
        assert_eq!(PrintOrientation::parse("diagonal"), None);
    }

    #[test]
    fn test_default_station_absent_vs_null() {
        let absent: UpdateSettingsRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.default_station_id.is_none());

        let null: UpdateSettingsRequest =
            serde_json::from_str(r#"{"default_station_id": null}"#).unwrap();
        assert_eq!(null.default_station_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateSettingsRequest =
            serde_json::from_str(&format!(r#"{{"default_station_id": "{}"}}"#, id)).unwrap();
        assert_eq!(set.default_station_id, Some(Some(id)));
    }
}
