// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! Persistent settings are stored in TOML format through `confy`. The
//! configuration remembers the apt.dat file to read when `--file` is not
//! given, plus output preferences for the commands.

use std::path::{Path, PathBuf};

use apt_dat::{AptDatError, SortKey};
use serde::{Deserialize, Serialize};

/// Name under which `confy` stores the configuration file.
pub const APP_NAME: &str = "xplane-airports";

const CONFIG_NAME: &str = "config";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// apt.dat file to read when no `--file` is passed
    #[serde(default)]
    pub default_apt_dat: Option<PathBuf>,

    /// Sort order applied by `list` when `--sort` is absent
    #[serde(default = "default_sort")]
    pub default_sort: String,

    /// Number of apt.dat lines printed by `show`
    #[serde(default = "default_head_lines")]
    pub head_lines: usize,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_sort() -> String {
    SortKey::default().to_string()
}

fn default_head_lines() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            default_apt_dat: None,
            default_sort: default_sort(),
            head_lines: default_head_lines(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults if missing
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// The configured default sort order.
    pub fn sort_key(&self) -> Result<SortKey, AptDatError> {
        self.default_sort.parse()
    }

    /// The apt.dat file to use: an explicit override wins over the
    /// configured default.
    #[must_use]
    pub fn resolve_apt_dat<'a>(&'a self, explicit: Option<&'a Path>) -> Option<&'a Path> {
        explicit.or(self.default_apt_dat.as_deref())
    }
}
