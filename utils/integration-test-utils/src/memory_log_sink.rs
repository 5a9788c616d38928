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

use async_trait::async_trait;
use cluster_router::{DurableLogWriter, TransactionLogError, TransactionLogProvider};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct SinkState {
    lines: Mutex<HashMap<String, Vec<String>>>,
    fail_writes: AtomicBool,
}

/// Durable log stand-in that keeps every appended line in memory, keyed by channel.
#[derive(Default)]
pub struct MemoryLogSink {
    state: Arc<SinkState>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lines(&self, channel: &str) -> Vec<String> {
        self.state
            .lines
            .lock()
            .await
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn total_lines(&self) -> usize {
        self.state.lines.lock().await.values().map(Vec::len).sum()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }
}

struct MemoryLogWriter {
    channel: String,
    state: Arc<SinkState>,
}

#[async_trait]
impl DurableLogWriter for MemoryLogWriter {
    async fn append_line(&self, line: String) -> Result<(), TransactionLogError> {
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(TransactionLogError::WriterClosed {
                path: PathBuf::from(&self.channel),
            });
        }
        self.state
            .lines
            .lock()
            .await
            .entry(self.channel.clone())
            .or_default()
            .push(line);
        Ok(())
    }
}

#[async_trait]
impl TransactionLogProvider for MemoryLogSink {
    async fn writer_for(
        &self,
        channel: &str,
    ) -> Result<Arc<dyn DurableLogWriter>, TransactionLogError> {
        Ok(Arc::new(MemoryLogWriter {
            channel: channel.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}
