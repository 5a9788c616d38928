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
use cluster_router::{Exchange, ExchangeError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Exchange spy: records every publish and keeps the shared store in memory.
#[derive(Default)]
pub struct RecordingExchange {
    published: Mutex<Vec<(String, Value)>>,
    store: Mutex<HashMap<String, Value>>,
    fail_publish: AtomicBool,
    fail_store: AtomicBool,
}

impl RecordingExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, key: &str, value: Value) {
        self.store.lock().await.insert(key.to_string(), value);
    }

    pub async fn stored(&self, key: &str) -> Option<Value> {
        self.store.lock().await.get(key).cloned()
    }

    pub fn fail_publish(&self, fail: bool) {
        self.fail_publish.store(fail, Ordering::SeqCst);
    }

    pub fn fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub async fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().await.clone()
    }

    pub async fn published_to(&self, channel: &str) -> Vec<Value> {
        self.published
            .lock()
            .await
            .iter()
            .filter(|(published, _)| published == channel)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub async fn publish_count(&self) -> usize {
        self.published.lock().await.len()
    }

    fn store_error(&self, key: &str) -> Option<ExchangeError> {
        self.fail_store
            .load(Ordering::SeqCst)
            .then(|| ExchangeError::Store {
                key: key.to_string(),
                reason: "store unreachable".to_string(),
            })
    }
}

#[async_trait]
impl Exchange for RecordingExchange {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), ExchangeError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(ExchangeError::Publish {
                channel: channel.to_string(),
                reason: "publish disabled".to_string(),
            });
        }
        debug!("RecordingExchange: publish on {channel}");
        self.published
            .lock()
            .await
            .push((channel.to_string(), payload));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, ExchangeError> {
        if let Some(err) = self.store_error(key) {
            return Err(err);
        }
        Ok(self.store.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ExchangeError> {
        if let Some(err) = self.store_error(key) {
            return Err(err);
        }
        self.store.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}
