use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::Point2;
use crate::kernel::JoinMode;
use crate::stack::orchestrator::{DEFAULT_GROUP_NAME, DEFAULT_SCALE, DEFAULT_THICKNESS};
use crate::stack::{FailurePolicy, StackSettings};

/// Extension of contour files when none is configured
pub const DEFAULT_EXTENSION: &str = "svg";

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
fn default_thickness() -> f64 {
    DEFAULT_THICKNESS
}
fn default_scale() -> f64 {
    DEFAULT_SCALE
}
fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

/// Settings read from `contour3d.toml`
///
/// Every field is optional in the file; CLI arguments take precedence.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub origin: [f64; 2],
    #[serde(default = "default_group_name")]
    pub group_name: String,
    #[serde(default)]
    pub on_failure: FailurePolicy,
    #[serde(default)]
    pub join_mode: JoinMode,
    #[serde(default)]
    pub report: Option<PathBuf>,
    #[serde(default)]
    pub stop_file: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            extension: default_extension(),
            thickness: default_thickness(),
            scale: default_scale(),
            origin: [0.0, 0.0],
            group_name: default_group_name(),
            on_failure: FailurePolicy::default(),
            join_mode: JoinMode::default(),
            report: None,
            stop_file: None,
            verbose: false,
        }
    }
}

impl FileConfig {
    /// First config file found on the search path, if any parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }
        None
    }

    /// Read an explicitly requested config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Run parameters as configured in the file
    pub fn stack_settings(&self) -> StackSettings {
        StackSettings {
            thickness: self.thickness,
            scale: self.scale,
            origin: Point2::new(self.origin[0], self.origin[1]),
            join_mode: self.join_mode,
            group_name: self.group_name.clone(),
            failure_policy: self.on_failure,
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("contour3d.toml"));
    paths.push(PathBuf::from(".contour3d.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("contour3d").join("config.toml"));
        paths.push(config_dir.join("contour3d.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".contour3d.toml"));
        paths.push(home.join(".config").join("contour3d").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());

        let settings = config.stack_settings();
        assert_eq!(settings.thickness, 0.033);
        assert_eq!(settings.group_name, "Layers");
        assert_eq!(settings.failure_policy, FailurePolicy::Keep);
        assert_eq!(settings.join_mode, JoinMode::Join);
        assert_eq!(settings.origin, Point2::ORIGIN);
    }

    #[test]
    fn test_parse_full_file() {
        let config: FileConfig = toml::from_str(
            r#"
input = "slices"
output = "model.stl"
extension = "json"
thickness = 0.1
scale = 2.0
origin = [1.5, -2.0]
group_name = "Slices"
on_failure = "roll-back"
join_mode = "new-body"
verbose = true
"#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("slices")));
        assert_eq!(config.extension, "json");
        assert!(config.verbose);

        let settings = config.stack_settings();
        assert_eq!(settings.thickness, 0.1);
        assert_eq!(settings.scale, 2.0);
        assert_eq!(settings.origin, Point2::new(1.5, -2.0));
        assert_eq!(settings.group_name, "Slices");
        assert_eq!(settings.failure_policy, FailurePolicy::RollBack);
        assert_eq!(settings.join_mode, JoinMode::NewBody);
    }

    #[test]
    fn test_from_path_reports_bad_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contour3d.toml");
        fs::write(&path, "thickness = \"thin\"").unwrap();

        let err = FileConfig::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(FileConfig::from_path(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_search_paths_start_in_working_directory() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("contour3d.toml"));
        assert_eq!(paths[1], PathBuf::from(".contour3d.toml"));
    }
}
