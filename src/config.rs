//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/postnav/postnav.toml`
//! 3. Local config: `./.postnav.toml` or an explicit `--config` file
//! 4. Environment variables: `POSTNAV_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_MAX_DEPTH;

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".postnav.toml";

/// What to do when the resolved root item is itself flagged hidden.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HiddenRootPolicy {
    /// Keep the root; the hidden filter only applies below it
    #[default]
    Show,
    /// Abort the render
    Fail,
}

impl FromStr for HiddenRootPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "show" => Ok(Self::Show),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown hidden_root policy '{other}' (show|fail)")),
        }
    }
}

impl fmt::Display for HiddenRootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => f.write_str("show"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

/// Options of one navigation render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavOptions {
    /// Root the menu at the current item instead of its top ancestor
    pub only_descendants: bool,
    /// Show every branch, not only the path to the current item
    pub full_tree: bool,
    /// `class` value of the current item's link
    pub current_item_marker: String,
    /// Meta key that hides an item when set to "true"
    pub hidden_filter_key: String,
    /// Behavior for a hidden root
    pub hidden_root: HiddenRootPolicy,
    /// Nesting limit of the assembled tree
    pub max_depth: usize,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            only_descendants: false,
            full_tree: false,
            current_item_marker: "current".into(),
            hidden_filter_key: "hidden".into(),
            hidden_root: HiddenRootPolicy::Show,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Raw nav options for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawNavOptions {
    pub only_descendants: Option<bool>,
    pub full_tree: Option<bool>,
    pub current_item_marker: Option<String>,
    pub hidden_filter_key: Option<String>,
    pub hidden_root: Option<HiddenRootPolicy>,
    pub max_depth: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub site_file: Option<PathBuf>,
    pub nav: RawNavOptions,
}

impl NavOptions {
    /// Overlay wins wherever it specifies a value.
    pub fn merge(&self, overlay: &RawNavOptions) -> Self {
        Self {
            only_descendants: overlay.only_descendants.unwrap_or(self.only_descendants),
            full_tree: overlay.full_tree.unwrap_or(self.full_tree),
            current_item_marker: overlay
                .current_item_marker
                .clone()
                .unwrap_or_else(|| self.current_item_marker.clone()),
            hidden_filter_key: overlay
                .hidden_filter_key
                .clone()
                .unwrap_or_else(|| self.hidden_filter_key.clone()),
            hidden_root: overlay.hidden_root.unwrap_or(self.hidden_root),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
        }
    }

    /// Reject values no render can succeed with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "nav.max_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Unified configuration for postnav.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default site file for the CLI
    pub site_file: Option<PathBuf>,
    /// Navigation defaults
    pub nav: NavOptions,
}

/// Get the XDG config directory for postnav.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "postnav").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("postnav.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand shell variables and tilde in a path string.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(site) = &self.site_file {
            self.site_file = Some(expand_path(site));
        }
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            site_file: overlay
                .site_file
                .clone()
                .or_else(|| self.site_file.clone()),
            nav: self.nav.merge(&overlay.nav),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_file` - Explicit local config file; if `None`, `./.postnav.toml`
    ///   is used when present
    ///
    /// An explicit `local_file` must exist.
    pub fn load(local_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        match local_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                let local_path = local_config_path(Path::new("."));
                if local_path.exists() {
                    let raw = load_raw_settings(&local_path)?;
                    current = current.merge_with(&raw);
                }
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.nav.validate()?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply POSTNAV_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`: `POSTNAV_NAV__FULL_TREE=true`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("POSTNAV")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("site_file") {
            settings.site_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("nav.only_descendants") {
            settings.nav.only_descendants = val;
        }
        if let Ok(val) = config.get_bool("nav.full_tree") {
            settings.nav.full_tree = val;
        }
        if let Ok(val) = config.get_string("nav.current_item_marker") {
            settings.nav.current_item_marker = val;
        }
        if let Ok(val) = config.get_string("nav.hidden_filter_key") {
            settings.nav.hidden_filter_key = val;
        }
        if let Ok(val) = config.get_string("nav.hidden_root") {
            settings.nav.hidden_root = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_int("nav.max_depth") {
            settings.nav.max_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("nav.max_depth must be at least 1, got {val}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# postnav configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/postnav/postnav.toml
#   Local:  ./.postnav.toml  (or --config FILE)
#   Env:    POSTNAV_* environment variables, e.g. POSTNAV_NAV__FULL_TREE=true

# Site file used when --site is not given
# site_file = "~/site/pages.toml"

[nav]
# Root the menu at the current item instead of its top-level ancestor
# only_descendants = false

# Show all branches instead of only the path to the current item
# full_tree = false

# class attribute of the current item's link
# current_item_marker = "current"

# Items whose meta field <key> is "true" are left out
# hidden_filter_key = "hidden"

# Hidden root item: "show" keeps it, "fail" aborts
# hidden_root = "show"

# Maximum nesting depth before the hierarchy is considered malformed
# max_depth = 64
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
