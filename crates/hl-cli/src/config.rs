//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use hl_core::{Hours, LedgerConfig, ReportMarkers};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON file holding the stored attendance days.
    pub state_path: PathBuf,

    /// Directory scanned for `*.ics` holiday calendars.
    pub calendar_dir: PathBuf,

    /// Theoretical hours of a working day.
    pub workday_hours: f64,

    /// Whether today's date always gets a ledger row, even with no punches.
    pub include_today: bool,

    /// Marker strings recognised in timesheet reports.
    pub markers: ReportMarkers,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            state_path: data_dir.join("state.json"),
            calendar_dir: PathBuf::from("."),
            workday_hours: 8.0,
            include_today: true,
            markers: ReportMarkers::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (HL_*)
        figment = figment.merge(Env::prefixed("HL_"));

        figment.extract()
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            workday: Hours::from_f64(self.workday_hours),
        }
    }
}

/// Returns the platform-specific config directory for hl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hl"))
}

/// Returns the platform-specific data directory for hl.
///
/// On Linux: `~/.local/share/hl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("hl"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_hl() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "hl");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_state() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.state_path, data_dir.join("state.json"));
        assert!(config.include_today);
    }

    #[test]
    fn test_default_ledger_config_is_standard_workday() {
        assert_eq!(Config::default().ledger_config(), LedgerConfig::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
workday_hours = 7.5
include_today = false
calendar_dir = "/srv/calendars"

[markers]
holiday = ["Feiertag"]
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.ledger_config().workday, Hours::from_centi(750));
        assert!(!config.include_today);
        assert_eq!(config.calendar_dir, PathBuf::from("/srv/calendars"));
        assert_eq!(config.markers.holiday, ["Feiertag"]);
        // Unset marker lists keep their defaults.
        assert_eq!(config.markers.day_off, ReportMarkers::default().day_off);
    }
}
