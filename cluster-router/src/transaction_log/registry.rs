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

//! Per-channel writer registry.

use crate::channel::topics::split_schema_table;
use crate::observability::events;
use crate::transaction_log::file_writer::FileTransactionLogWriter;
use crate::transaction_log::{
    DurableLogWriter, TransactionLogConfig, TransactionLogError, TransactionLogProvider,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const LOG_FILE_NAME: &str = "transaction.log";
const COMPONENT: &str = "log_registry";

/// Keeps one [`FileTransactionLogWriter`] per log file so that a channel's lines are serialized
/// through a single writer thread.
///
/// Writers are keyed by resolved path: channels whose names sanitize to the same file share
/// one writer.
pub struct FileTransactionLogRegistry {
    config: TransactionLogConfig,
    writers: Mutex<HashMap<PathBuf, Arc<FileTransactionLogWriter>>>,
}

impl FileTransactionLogRegistry {
    pub fn new(config: TransactionLogConfig) -> Self {
        Self {
            config,
            writers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TransactionLogConfig {
        &self.config
    }

    pub async fn writer_count(&self) -> usize {
        self.writers.lock().await.len()
    }

    pub(crate) async fn file_writer_for(
        &self,
        channel: &str,
    ) -> Result<Arc<FileTransactionLogWriter>, TransactionLogError> {
        let path = log_path_for(&self.config.root_dir, channel);
        let mut writers = self.writers.lock().await;

        if let Some(writer) = writers.get(&path) {
            debug!(
                event = events::LOG_WRITER_REUSE,
                component = COMPONENT,
                channel,
                "reusing transaction log writer"
            );
            return Ok(writer.clone());
        }

        let writer = Arc::new(FileTransactionLogWriter::spawn(
            path.clone(),
            &self.config,
            channel,
        )?);
        debug!(
            event = events::LOG_WRITER_CREATE,
            component = COMPONENT,
            channel,
            path = %writer.path().display(),
            worker_thread = writer.worker_thread(),
            "created transaction log writer"
        );
        writers.insert(path, writer.clone());
        Ok(writer)
    }
}

#[async_trait]
impl TransactionLogProvider for FileTransactionLogRegistry {
    async fn writer_for(
        &self,
        channel: &str,
    ) -> Result<Arc<dyn DurableLogWriter>, TransactionLogError> {
        let writer: Arc<dyn DurableLogWriter> = self.file_writer_for(channel).await?;
        Ok(writer)
    }
}

/// `<root>/<schema>/<table>/transaction.log`; channels without that shape get one flattened
/// directory.
pub fn log_path_for(root: &Path, channel: &str) -> PathBuf {
    let directory = match split_schema_table(channel) {
        Some((schema, table)) => root
            .join(sanitize_component(schema))
            .join(sanitize_component(table)),
        None => root.join(sanitize_component(channel)),
    };
    directory.join(LOG_FILE_NAME)
}

fn sanitize_component(component: &str) -> String {
    let sanitized: String = component
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|ch| ch == '.') {
        sanitized.replace('.', "_") + "_"
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::{log_path_for, FileTransactionLogRegistry};
    use crate::transaction_log::{TransactionLogConfig, TransactionLogProvider};
    use std::path::Path;

    #[test]
    fn schema_table_channels_get_nested_directories() {
        let root = Path::new("/var/log/cr");

        assert_eq!(
            log_path_for(root, "dev:dog"),
            root.join("dev").join("dog").join("transaction.log")
        );
    }

    #[test]
    fn internal_and_odd_topics_are_flattened_and_contained() {
        let root = Path::new("/var/log/cr");

        assert_eq!(
            log_path_for(root, "internal:users"),
            root.join("internal_users").join("transaction.log")
        );
        assert_eq!(
            log_path_for(root, "../etc"),
            root.join(".._etc").join("transaction.log")
        );
        assert_eq!(
            log_path_for(root, "..:x"),
            root.join("___").join("x").join("transaction.log")
        );
    }

    #[tokio::test]
    async fn writer_is_reused_per_channel() {
        let root = tempfile::tempdir().expect("tempdir");
        let registry = FileTransactionLogRegistry::new(TransactionLogConfig::new(root.path()));

        let first = registry.file_writer_for("dev:dog").await.unwrap();
        let again = registry.file_writer_for("dev:dog").await.unwrap();
        let other = registry.writer_for("dev:cat").await.unwrap();
        drop(other);

        assert!(std::sync::Arc::ptr_eq(&first, &again));
        assert_eq!(registry.writer_count().await, 2);
    }

    #[tokio::test]
    async fn channels_sharing_a_log_file_share_its_writer() {
        let root = tempfile::tempdir().expect("tempdir");
        let registry = FileTransactionLogRegistry::new(TransactionLogConfig::new(root.path()));

        let slashed = registry.file_writer_for("a/b:c").await.unwrap();
        let underscored = registry.file_writer_for("a_b:c").await.unwrap();

        assert_eq!(slashed.path(), underscored.path());
        assert!(std::sync::Arc::ptr_eq(&slashed, &underscored));
        assert_eq!(registry.writer_count().await, 1);
    }
}
