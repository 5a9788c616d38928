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

//! Durable per-channel transaction log.
//!
//! Rules only see [`DurableLogWriter`] and [`TransactionLogProvider`]. The file-backed
//! implementation keeps one writer thread per channel and rotates by size.
//!
//! ```
//! use cluster_router::{decode_line, encode_line, TransactionLogLine, TransactionOperation};
//! use serde_json::json;
//!
//! let line = TransactionLogLine {
//!     timestamp_millis: 1_700_000_000_000,
//!     operation: TransactionOperation::Insert,
//!     payload: json!([{ "id": 1, "name": "a b" }]),
//! };
//!
//! let encoded = encode_line(&line).unwrap();
//! assert!(encoded.starts_with("1700000000000,insert,"));
//! assert_eq!(decode_line(&encoded).unwrap(), line);
//! ```

pub(crate) mod file_writer;
pub(crate) mod line;
pub(crate) mod registry;

use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 10;
const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Failures while opening, writing or decoding the transaction log.
#[derive(Debug)]
pub enum TransactionLogError {
    Io { path: PathBuf, source: io::Error },
    WriterClosed { path: PathBuf },
    Spawn(io::Error),
    Encode(serde_json::Error),
    Decode { reason: String },
}

impl Display for TransactionLogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionLogError::Io { path, source } => {
                write!(f, "transaction log io on {}: {source}", path.display())
            }
            TransactionLogError::WriterClosed { path } => {
                write!(f, "transaction log writer for {} is closed", path.display())
            }
            TransactionLogError::Spawn(err) => {
                write!(f, "failed to spawn transaction log writer: {err}")
            }
            TransactionLogError::Encode(err) => {
                write!(f, "failed to encode transaction payload: {err}")
            }
            TransactionLogError::Decode { reason } => {
                write!(f, "malformed transaction log line: {reason}")
            }
        }
    }
}

impl Error for TransactionLogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransactionLogError::Io { source, .. } => Some(source),
            TransactionLogError::Spawn(err) => Some(err),
            TransactionLogError::Encode(err) => Some(err),
            _ => None,
        }
    }
}

/// Settings for the rotating file writer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TransactionLogConfig {
    pub root_dir: PathBuf,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Total files kept per channel, including the active one.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Pending lines per channel before appends wait for the writer.
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

impl TransactionLogConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_queue_size() -> usize {
    DEFAULT_QUEUE_SIZE
}

/// Sequential, durable line sink for one channel.
#[async_trait]
pub trait DurableLogWriter: Send + Sync {
    /// Resolves once the line has been written and flushed.
    async fn append_line(&self, line: String) -> Result<(), TransactionLogError>;
}

/// Hands out the writer owned by a channel, creating it on first use.
#[async_trait]
pub trait TransactionLogProvider: Send + Sync {
    async fn writer_for(
        &self,
        channel: &str,
    ) -> Result<Arc<dyn DurableLogWriter>, TransactionLogError>;
}
