// Copyright 2025 Fernando Borretti
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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Name of the configuration file inside a collection directory.
pub const CONFIG_FILE: &str = "lexicards.toml";

/// Largest page size accepted by `list`.
pub const MAX_LIST_LIMIT: usize = 1000;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Whose vocabulary the commands operate on.
    pub learner: String,
    /// How many days `progress` looks back by default.
    pub progress_days: u32,
    /// Default page size for `list`.
    pub list_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learner: "default".to_string(),
            progress_days: 30,
            list_limit: 100,
        }
    }
}

impl Config {
    /// Reads the configuration file from the directory, falling back to the
    /// defaults when there is none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE} found, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        let config = Self::parse(&content)?;
        log::debug!("Loaded configuration from {}.", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.learner.trim().is_empty() {
            return Err(ErrorReport::invalid_argument("learner must not be empty"));
        }
        if config.list_limit == 0 || config.list_limit > MAX_LIST_LIMIT {
            return Err(ErrorReport::invalid_argument(format!(
                "list_limit must be between 1 and {MAX_LIST_LIMIT}"
            )));
        }
        Ok(config)
    }
}
