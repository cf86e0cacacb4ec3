/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Step budget for mazes that do not come with their own.
pub const DEFAULT_STEP_BUDGET: i32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings for a single episode. Every field is optional in the JSON file; missing fields take
/// the `Default` value.
///
/// ```json
/// { "step_budget": 500, "seed": 7, "trace_path": "/tmp/episode.json" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Overrides the maze's own step budget when set.
    pub step_budget: Option<i32>,

    /// Seed for agents that make random choices.
    pub seed: u64,

    /// Where to write the JSON episode trace, if anywhere.
    pub trace_path: Option<PathBuf>,
}

impl EpisodeConfig {
    fn new(step_budget: Option<i32>, seed: u64, trace_path: Option<PathBuf>) -> Self {
        Self {
            step_budget,
            seed,
            trace_path,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// The configured budget, or `maze_default` when none was configured.
    pub fn step_budget_or(&self, maze_default: i32) -> i32 {
        self.step_budget.unwrap_or(maze_default)
    }

    pub fn get_trace_path(&self) -> Option<PathBuf> {
        self.trace_path.clone()
    }
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self::new(None, 42, None)
    }
}
