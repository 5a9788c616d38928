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

//! Single-process exchange backed by tokio broadcast channels.

use crate::exchange::{Exchange, ExchangeError};
use crate::observability::events;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

const COMPONENT: &str = "local_exchange";

/// Delivered item: the channel it was published on and the payload.
pub type ExchangeDelivery = (String, Value);

/// In-process [`Exchange`]. Each channel gets its own broadcast sender, created on first use.
pub struct LocalExchange {
    channel_capacity: usize,
    channels: Mutex<HashMap<String, Sender<ExchangeDelivery>>>,
    store: RwLock<HashMap<String, Value>>,
}

impl LocalExchange {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
            channels: Mutex::new(HashMap::new()),
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes to one channel. Deliveries published before the call are not replayed.
    pub async fn subscribe(&self, channel: &str) -> Receiver<ExchangeDelivery> {
        let mut channels = self.channels.lock().await;
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .subscribe()
    }
}

impl Default for LocalExchange {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Exchange for LocalExchange {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), ExchangeError> {
        let channels = self.channels.lock().await;
        let Some(sender) = channels.get(channel) else {
            debug!(
                event = events::EXCHANGE_PUBLISH_NO_SUBSCRIBERS,
                component = COMPONENT,
                channel,
                "no subscribers for channel"
            );
            return Ok(());
        };

        // A send error only means every receiver has been dropped.
        if sender.send((channel.to_string(), payload)).is_err() {
            debug!(
                event = events::EXCHANGE_PUBLISH_NO_SUBSCRIBERS,
                component = COMPONENT,
                channel,
                "all subscribers dropped"
            );
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, ExchangeError> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ExchangeError> {
        self.store.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::LocalExchange;
    use crate::exchange::Exchange;
    use serde_json::json;

    #[tokio::test]
    async fn publish_reaches_only_subscribers_of_that_channel() {
        let exchange = LocalExchange::new(8);
        let mut dogs = exchange.subscribe("dev:dog").await;
        let mut cats = exchange.subscribe("dev:cat").await;

        exchange
            .publish("dev:dog", json!({ "id": 1 }))
            .await
            .expect("publish should succeed");

        let (channel, payload) = dogs.recv().await.expect("dog subscriber receives");
        assert_eq!(channel, "dev:dog");
        assert_eq!(payload, json!({ "id": 1 }));
        assert!(cats.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let exchange = LocalExchange::default();

        assert!(exchange.publish("nobody", json!(1)).await.is_ok());

        let receiver = exchange.subscribe("gone").await;
        drop(receiver);
        assert!(exchange.publish("gone", json!(2)).await.is_ok());
    }

    #[tokio::test]
    async fn store_round_trips_values() {
        let exchange = LocalExchange::default();

        assert_eq!(exchange.get("internal:workers").await.unwrap(), None);
        exchange
            .set("internal:workers", json!(["w1"]))
            .await
            .unwrap();
        assert_eq!(
            exchange.get("internal:workers").await.unwrap(),
            Some(json!(["w1"]))
        );
    }
}
