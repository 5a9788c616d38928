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

//! In-crate collaborator fakes for unit tests.
//!
//! `integration-test-utils` implements the traits of the `cluster-router` it links against,
//! which is a separate crate instance from the one under unit test, so those fakes cannot stand
//! in here.

use crate::exchange::{Exchange, ExchangeError};
use crate::runtime::{ConnectionSnapshot, RuntimeError, StatusEmitter, WorkerRuntime};
use crate::transaction_log::{DurableLogWriter, TransactionLogError, TransactionLogProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct SpyExchangeState {
    store: HashMap<String, Value>,
    published: Vec<(String, Value)>,
    fail_store: bool,
    fail_publish: bool,
}

/// Exchange that records publishes and serves an in-memory store.
#[derive(Default)]
pub(crate) struct SpyExchange {
    state: Mutex<SpyExchangeState>,
}

impl SpyExchange {
    pub(crate) fn seed(&self, key: &str, value: Value) {
        self.state
            .lock()
            .unwrap()
            .store
            .insert(key.to_string(), value);
    }

    pub(crate) fn stored(&self, key: &str) -> Option<Value> {
        self.state.lock().unwrap().store.get(key).cloned()
    }

    pub(crate) fn fail_store(&self, fail: bool) {
        self.state.lock().unwrap().fail_store = fail;
    }

    pub(crate) fn fail_publish(&self, fail: bool) {
        self.state.lock().unwrap().fail_publish = fail;
    }

    pub(crate) fn publish_count(&self) -> usize {
        self.state.lock().unwrap().published.len()
    }

    pub(crate) fn published(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().published.clone()
    }

    pub(crate) fn published_to(&self, channel: &str) -> Vec<Value> {
        self.published()
            .into_iter()
            .filter(|(published, _)| published == channel)
            .map(|(_, payload)| payload)
            .collect()
    }
}

#[async_trait]
impl Exchange for SpyExchange {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), ExchangeError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_publish {
            return Err(ExchangeError::Publish {
                channel: channel.to_string(),
                reason: "publish disabled".to_string(),
            });
        }
        state.published.push((channel.to_string(), payload));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, ExchangeError> {
        let state = self.state.lock().unwrap();
        if state.fail_store {
            return Err(store_error(key));
        }
        Ok(state.store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ExchangeError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_store {
            return Err(store_error(key));
        }
        state.store.insert(key.to_string(), value);
        Ok(())
    }
}

fn store_error(key: &str) -> ExchangeError {
    ExchangeError::Store {
        key: key.to_string(),
        reason: "store unreachable".to_string(),
    }
}

#[derive(Default)]
struct MemoryLogState {
    lines: HashMap<String, Vec<String>>,
    fail_writes: bool,
}

/// Transaction log that keeps lines in memory, per channel.
#[derive(Default)]
pub(crate) struct MemoryLog {
    state: Arc<Mutex<MemoryLogState>>,
}

impl MemoryLog {
    pub(crate) fn lines(&self, channel: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .lines
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

struct MemoryLogWriter {
    channel: String,
    state: Arc<Mutex<MemoryLogState>>,
}

#[async_trait]
impl DurableLogWriter for MemoryLogWriter {
    async fn append_line(&self, line: String) -> Result<(), TransactionLogError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(TransactionLogError::WriterClosed {
                path: PathBuf::from(&self.channel),
            });
        }
        state
            .lines
            .entry(self.channel.clone())
            .or_default()
            .push(line);
        Ok(())
    }
}

#[async_trait]
impl TransactionLogProvider for MemoryLog {
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

/// Records emitted cluster statuses.
#[derive(Default)]
pub(crate) struct SpyStatusEmitter {
    emitted: Mutex<Vec<Value>>,
    fail: Mutex<bool>,
}

impl SpyStatusEmitter {
    pub(crate) fn emitted(&self) -> Vec<Value> {
        self.emitted.lock().unwrap().clone()
    }

    pub(crate) fn fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl StatusEmitter for SpyStatusEmitter {
    fn emit_cluster_status(&self, status: &Value) -> Result<(), RuntimeError> {
        if *self.fail.lock().unwrap() {
            return Err(RuntimeError::StatusEmit {
                reason: "emitter disabled".to_string(),
            });
        }
        self.emitted.lock().unwrap().push(status.clone());
        Ok(())
    }
}

pub(crate) struct TestHarness {
    pub(crate) runtime: Arc<WorkerRuntime>,
    pub(crate) exchange: Arc<SpyExchange>,
    pub(crate) logs: Arc<MemoryLog>,
    pub(crate) statuses: Arc<SpyStatusEmitter>,
}

impl TestHarness {
    pub(crate) fn new(worker_id: &str) -> Self {
        Self::with_snapshot(worker_id, ConnectionSnapshot::default())
    }

    pub(crate) fn with_snapshot(worker_id: &str, snapshot: ConnectionSnapshot) -> Self {
        let exchange = Arc::new(SpyExchange::default());
        let logs = Arc::new(MemoryLog::default());
        let statuses = Arc::new(SpyStatusEmitter::default());
        let runtime = WorkerRuntime::builder(worker_id, exchange.clone(), logs.clone())
            .status_emitter(statuses.clone())
            .connection_monitor(Arc::new(snapshot))
            .build();

        Self {
            runtime: Arc::new(runtime),
            exchange,
            logs,
            statuses,
        }
    }
}
