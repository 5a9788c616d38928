/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use cluster_router::{Origin, TransactionLogConfig};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) router: RouterConfig,
    pub(crate) transaction_log: TransactionLogConfig,
    pub(crate) replay: ReplayConfig,
    /// Initial worker registry written to the shared store.
    #[serde(default)]
    pub(crate) workers: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    pub(crate) worker_id: String,
    /// `schema:table` topics that get a standard channel at startup.
    #[serde(default)]
    pub(crate) schemas_tables: Vec<String>,
    #[serde(default = "default_channel_capacity")]
    pub(crate) channel_capacity: usize,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ReplayConfig {
    pub(crate) input_file: PathBuf,
    /// Stamped on messages that arrive without a data source.
    #[serde(default = "default_replay_origin")]
    pub(crate) origin: Origin,
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_replay_origin() -> Origin {
    Origin::Cluster
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: json5::Error,
    },
    Invalid {
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "unable to read config file {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "unable to parse config file {}: {source}", path.display())
            }
            Self::Invalid { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = json5::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.router.worker_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "router.worker_id must not be empty".to_string(),
            });
        }
        if let Some(topic) = self
            .router
            .schemas_tables
            .iter()
            .find(|topic| topic.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                reason: format!("router.schemas_tables contains an empty topic {topic:?}"),
            });
        }
        if self.transaction_log.max_files == 0 {
            return Err(ConfigError::Invalid {
                reason: "transaction_log.max_files must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
