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

//! Rotating file writer that owns one log file on a dedicated thread.

use crate::observability::events;
use crate::runtime::worker_runtime::{
    spawn_writer_loop, WriterLoopHandle, DEFAULT_LOG_WRITER_THREAD_NAME,
};
use crate::transaction_log::{DurableLogWriter, TransactionLogConfig, TransactionLogError};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const LOG_WRITER_THREAD_NAME_PREFIX: &str = "cr-log-";
const LOG_WRITER_THREAD_NAME_MAX_LEN: usize = 15;
const COMPONENT: &str = "file_writer";

struct WriteRequest {
    line: String,
    ack: oneshot::Sender<Result<(), TransactionLogError>>,
}

/// Durable writer for one `transaction.log`. Appends queue on a bounded channel and are
/// acknowledged after the line is written and flushed.
pub struct FileTransactionLogWriter {
    path: PathBuf,
    sender: mpsc::Sender<WriteRequest>,
    writer_handle: WriterLoopHandle,
}

impl FileTransactionLogWriter {
    pub fn spawn(
        path: PathBuf,
        config: &TransactionLogConfig,
        thread_label: &str,
    ) -> Result<Self, TransactionLogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TransactionLogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let (sender, receiver) = mpsc::channel(config.queue_size.max(1));
        let file_state = LogFileState {
            path: path.clone(),
            file: None,
            written: 0,
            max_file_bytes: config.max_file_bytes,
            max_files: config.max_files,
        };

        let writer_handle = spawn_writer_loop(Self::build_thread_name(thread_label), move || {
            async move { file_state.run(receiver).await }
        })
        .map_err(TransactionLogError::Spawn)?;

        Ok(Self {
            path,
            sender,
            writer_handle,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn worker_thread(&self) -> &str {
        self.writer_handle.worker_thread()
    }

    fn build_thread_name(label: &str) -> String {
        let suffix_len = LOG_WRITER_THREAD_NAME_MAX_LEN - LOG_WRITER_THREAD_NAME_PREFIX.len();
        let suffix: String = label
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .take(suffix_len)
            .collect();

        if suffix.is_empty() {
            DEFAULT_LOG_WRITER_THREAD_NAME.to_string()
        } else {
            format!("{LOG_WRITER_THREAD_NAME_PREFIX}{suffix}")
        }
    }
}

#[async_trait]
impl DurableLogWriter for FileTransactionLogWriter {
    async fn append_line(&self, line: String) -> Result<(), TransactionLogError> {
        let (ack, acked) = oneshot::channel();

        // Waits for queue capacity when the writer falls behind.
        self.sender
            .send(WriteRequest { line, ack })
            .await
            .map_err(|_| TransactionLogError::WriterClosed {
                path: self.path.clone(),
            })?;

        acked.await.map_err(|_| TransactionLogError::WriterClosed {
            path: self.path.clone(),
        })?
    }
}

struct LogFileState {
    path: PathBuf,
    file: Option<File>,
    written: u64,
    max_file_bytes: u64,
    max_files: usize,
}

impl LogFileState {
    async fn run(mut self, mut receiver: mpsc::Receiver<WriteRequest>) {
        while let Some(request) = receiver.recv().await {
            let result = self.write_line(&request.line).await;
            if let Err(err) = &result {
                warn!(
                    event = events::LOG_WRITER_WRITE_FAILED,
                    component = COMPONENT,
                    path = %self.path.display(),
                    err = %err,
                    "transaction log write failed"
                );
                // Reopen on the next request.
                self.file = None;
            }
            // The appender may have given up waiting; nothing else to report to.
            let _ = request.ack.send(result);
        }

        info!(
            event = events::LOG_WRITER_CLOSED,
            component = COMPONENT,
            path = %self.path.display(),
            "transaction log writer closed"
        );
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransactionLogError> {
        let record_len = line.len() as u64 + 1;
        self.open().await?;
        if self.written > 0 && self.written + record_len > self.max_file_bytes {
            self.rotate().await?;
        }

        let path = self.path.clone();
        let io_error = |source| TransactionLogError::Io {
            path: path.clone(),
            source,
        };

        let file = self.open().await?;
        file.write_all(line.as_bytes()).await.map_err(io_error)?;
        file.write_all(b"\n").await.map_err(io_error)?;
        file.flush().await.map_err(io_error)?;

        self.written += record_len;
        Ok(())
    }

    async fn open(&mut self) -> Result<&mut File, TransactionLogError> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await
                .map_err(|source| self.io_error(source))?;
            self.written = file
                .metadata()
                .await
                .map_err(|source| self.io_error(source))?
                .len();
            self.file = Some(file);
        }

        match self.file.as_mut() {
            Some(file) => Ok(file),
            None => Err(TransactionLogError::WriterClosed {
                path: self.path.clone(),
            }),
        }
    }

    /// Shifts `transaction.log.N` to `.N+1`, dropping the oldest beyond `max_files`.
    async fn rotate(&mut self) -> Result<(), TransactionLogError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await.map_err(|source| self.io_error(source))?;
        }

        let rotated_count = self.max_files.saturating_sub(1);
        if rotated_count == 0 {
            remove_if_exists(&self.path)
                .await
                .map_err(|source| self.io_error(source))?;
        } else {
            remove_if_exists(&rotated_path(&self.path, rotated_count))
                .await
                .map_err(|source| self.io_error(source))?;
            for index in (1..rotated_count).rev() {
                rename_if_exists(
                    &rotated_path(&self.path, index),
                    &rotated_path(&self.path, index + 1),
                )
                .await
                .map_err(|source| self.io_error(source))?;
            }
            rename_if_exists(&self.path, &rotated_path(&self.path, 1))
                .await
                .map_err(|source| self.io_error(source))?;
        }

        debug!(
            event = events::LOG_WRITER_ROTATE,
            component = COMPONENT,
            path = %self.path.display(),
            written = self.written,
            "rotated transaction log"
        );
        self.written = 0;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> TransactionLogError {
        TransactionLogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

pub(crate) fn rotated_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

async fn rename_if_exists(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to).await {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{rotated_path, FileTransactionLogWriter};
    use crate::transaction_log::{DurableLogWriter, TransactionLogConfig};
    use std::path::Path;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }

    #[tokio::test]
    async fn append_is_visible_once_acknowledged() {
        let root = tempfile::tempdir().expect("tempdir");
        let path = root.path().join("dev").join("dog").join("transaction.log");
        let writer =
            FileTransactionLogWriter::spawn(path.clone(), &TransactionLogConfig::new(root.path()), "dev:dog")
                .expect("writer should spawn");

        writer.append_line("1,insert,%5B%5D".to_string()).await.unwrap();
        writer.append_line("2,delete,%5B%5D".to_string()).await.unwrap();

        assert_eq!(read(&path), "1,insert,%5B%5D\n2,delete,%5B%5D\n");
        assert_eq!(writer.worker_thread(), "cr-log-devdog");
    }

    #[tokio::test]
    async fn rotation_keeps_at_most_max_files() {
        let root = tempfile::tempdir().expect("tempdir");
        let path = root.path().join("transaction.log");
        let config = TransactionLogConfig {
            max_file_bytes: 8,
            max_files: 3,
            queue_size: 2,
            ..TransactionLogConfig::new(root.path())
        };
        let writer = FileTransactionLogWriter::spawn(path.clone(), &config, "rotate")
            .expect("writer should spawn");

        for line in ["line-1", "line-2", "line-3", "line-4"] {
            writer.append_line(line.to_string()).await.unwrap();
        }

        assert_eq!(read(&path), "line-4\n");
        assert_eq!(read(&rotated_path(&path, 1)), "line-3\n");
        assert_eq!(read(&rotated_path(&path, 2)), "line-2\n");
        assert!(!rotated_path(&path, 3).exists());
    }

    #[tokio::test]
    async fn existing_file_size_counts_toward_rotation() {
        let root = tempfile::tempdir().expect("tempdir");
        let path = root.path().join("transaction.log");
        std::fs::write(&path, "previous\n").unwrap();
        let config = TransactionLogConfig {
            max_file_bytes: 12,
            ..TransactionLogConfig::new(root.path())
        };
        let writer = FileTransactionLogWriter::spawn(path.clone(), &config, "existing")
            .expect("writer should spawn");

        writer.append_line("next".to_string()).await.unwrap();

        assert_eq!(read(&rotated_path(&path, 1)), "previous\n");
        assert_eq!(read(&path), "next\n");
    }

    #[test]
    fn thread_name_falls_back_for_symbol_only_labels() {
        assert_eq!(FileTransactionLogWriter::build_thread_name(":::"), "cr-log-writer");
        assert_eq!(
            FileTransactionLogWriter::build_thread_name("internal:cluster_status"),
            "cr-log-internal"
        );
    }
}
