//! Persisted user settings (lives in the OS config directory).
//!
//! Every field carries a default so that a partial JSON file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::gesture::EDGE_HANDLE_WIDTH;
use crate::error::StoreError;
use crate::model::timeline::ZoomLevel;

/// The acting user's role on the project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    ProjectManager,
    SiteEngineer,
    Viewer,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::ProjectManager, Role::SiteEngineer, Role::Viewer]
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::ProjectManager => "Project Manager",
            Role::SiteEngineer => "Site Engineer",
            Role::Viewer => "Viewer",
        }
    }

    pub fn can_edit_schedule(self) -> bool {
        !matches!(self, Role::Viewer)
    }
}

/// Pixels per day for each zoom preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayWidths {
    pub month: f32,
    pub week: f32,
    pub day: f32,
}

impl Default for DayWidths {
    fn default() -> Self {
        Self {
            month: ZoomLevel::Month.default_day_width(),
            week: ZoomLevel::Week.default_day_width(),
            day: ZoomLevel::Day.default_day_width(),
        }
    }
}

impl DayWidths {
    /// Width for `zoom`, falling back to the built-in value for non-positive entries.
    pub fn for_zoom(&self, zoom: ZoomLevel) -> f32 {
        let width = match zoom {
            ZoomLevel::Month => self.month,
            ZoomLevel::Week => self.week,
            ZoomLevel::Day => self.day,
        };
        if width.is_finite() && width > 0.0 {
            width
        } else {
            zoom.default_day_width()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub zoom: ZoomLevel,
    pub day_widths: DayWidths,
    /// Resize grip width at each end of a task bar.
    pub edge_handle_width: f32,
    pub role: Role,
    pub last_project: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: ZoomLevel::default(),
            day_widths: DayWidths::default(),
            edge_handle_width: EDGE_HANDLE_WIDTH,
            role: Role::default(),
            last_project: None,
        }
    }
}

impl Settings {
    pub fn day_width(&self) -> f32 {
        self.day_widths.for_zoom(self.zoom)
    }

    /// `settings.json` inside the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "SiteSchedule")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load from the default location. Missing or unreadable files yield defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), "ignoring settings file: {}", e);
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "zoom": "day", "day_widths": { "day": 52.0 } }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.zoom, ZoomLevel::Day);
        assert_eq!(settings.day_width(), 52.0);
        assert_eq!(settings.day_widths.week, 16.0);
        assert_eq!(settings.edge_handle_width, EDGE_HANDLE_WIDTH);
        assert_eq!(settings.role, Role::ProjectManager);
    }

    #[rstest]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            role: Role::Viewer,
            last_project: Some(PathBuf::from("/tmp/depot.site.json")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[rstest]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(StoreError::Json(_))));
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::SiteEngineer, true)]
    #[case(Role::Viewer, false)]
    fn only_viewers_are_read_only(#[case] role: Role, #[case] editable: bool) {
        assert_eq!(role.can_edit_schedule(), editable);
    }

    #[rstest]
    fn non_positive_widths_fall_back() {
        let widths = DayWidths {
            month: 0.0,
            ..Default::default()
        };
        assert_eq!(widths.for_zoom(ZoomLevel::Month), 6.0);
    }
}
