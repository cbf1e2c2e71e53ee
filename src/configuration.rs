// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>
//! Configuration of an import.

use crate::Result;
use anyhow::Context;
use derivative::Derivative;
use serde::Deserialize;
use std::fs::File;
use std::path;
use tracing::info;

/// What to do with a row that cannot be imported.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Derivative)]
#[derivative(Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// The import of the file fails on the first invalid row.
    #[derivative(Default)]
    Abort,
    /// Invalid rows are logged and skipped.
    Skip,
}

/// Parameters of an import.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Configuration {
    /// Name given to the created feed.
    pub feed_name: String,
    /// Policy for invalid rows.
    pub on_error: ErrorPolicy,
}

/// Read a JSON configuration file.
///
/// Below is an example of this file
/// ```text
/// {
///     "feed_name": "Metro",
///     "on_error": "skip"
/// }
/// ```
/// Without a file, the default configuration is used: an unnamed feed and
/// the import aborting on the first invalid row.
pub fn read_config<P: AsRef<path::Path>>(config_path: Option<P>) -> Result<Configuration> {
    match config_path {
        Some(config_path) => {
            let config_path = config_path.as_ref();
            info!("Reading configuration from {:?}", config_path);
            let json_config_file = File::open(config_path)
                .with_context(|| format!("Error reading {:?}", config_path))?;
            let configuration = serde_json::from_reader(json_config_file)
                .with_context(|| format!("Error parsing {:?}", config_path))?;
            Ok(configuration)
        }
        None => Ok(Configuration::default()),
    }
}
