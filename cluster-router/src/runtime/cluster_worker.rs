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

use crate::channel::{topics, Channel, ChannelFactory};
use crate::exchange::Exchange;
use crate::message::{InternalHeader, Message, TransportPhase};
use crate::middleware::{MiddlewareNext, MiddlewareVerdict};
use crate::observability::{events, fields};
use crate::runtime::status::{
    ConnectionMonitor, ConnectionSnapshot, StatusEmitter, TracingStatusEmitter,
};
use crate::runtime::{RuntimeError, UserCache, WorkerContext};
use crate::transaction_log::{DurableLogWriter, TransactionLogError, TransactionLogProvider};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn, Level};

const COMPONENT: &str = "cluster_worker";

/// Result of routing one inbound message.
#[derive(Debug)]
pub enum InboundOutcome {
    /// Every rule passed; carries the message as the rules left it.
    Accepted(Message),
    RejectedByMiddleware { reason: String },
    MiddlewareFailed,
    /// A rule swallowed the message or failed.
    RejectedByRules,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutboundOutcome {
    Deliver,
    Suppressed { reason: String },
    Failed,
}

/// One worker process: its registries, collaborators and channels.
pub struct WorkerRuntime {
    worker_id: String,
    workers: ArcSwap<Vec<String>>,
    users: ArcSwap<UserCache>,
    exchange: Arc<dyn Exchange>,
    logs: Arc<dyn TransactionLogProvider>,
    status_emitter: Arc<dyn StatusEmitter>,
    connection_monitor: Arc<dyn ConnectionMonitor>,
    channels: RwLock<HashMap<String, Arc<Channel>>>,
    factory: ChannelFactory,
}

pub struct WorkerRuntimeBuilder {
    worker_id: String,
    exchange: Arc<dyn Exchange>,
    logs: Arc<dyn TransactionLogProvider>,
    status_emitter: Option<Arc<dyn StatusEmitter>>,
    connection_monitor: Option<Arc<dyn ConnectionMonitor>>,
    workers: Vec<String>,
}

impl WorkerRuntimeBuilder {
    pub fn status_emitter(mut self, status_emitter: Arc<dyn StatusEmitter>) -> Self {
        self.status_emitter = Some(status_emitter);
        self
    }

    pub fn connection_monitor(mut self, connection_monitor: Arc<dyn ConnectionMonitor>) -> Self {
        self.connection_monitor = Some(connection_monitor);
        self
    }

    /// Initial worker list, used until the first refresh from the shared store.
    pub fn workers(mut self, workers: Vec<String>) -> Self {
        self.workers = workers;
        self
    }

    pub fn build(self) -> WorkerRuntime {
        let status_emitter = self
            .status_emitter
            .unwrap_or_else(|| Arc::new(TracingStatusEmitter));
        let connection_monitor = self
            .connection_monitor
            .unwrap_or_else(|| Arc::new(ConnectionSnapshot::default()));

        WorkerRuntime {
            factory: ChannelFactory::new(self.worker_id.as_str()),
            worker_id: self.worker_id,
            workers: ArcSwap::from_pointee(self.workers),
            users: ArcSwap::from_pointee(UserCache::new()),
            exchange: self.exchange,
            logs: self.logs,
            status_emitter,
            connection_monitor,
            channels: RwLock::new(HashMap::new()),
        }
    }
}

impl WorkerRuntime {
    pub fn builder(
        worker_id: impl Into<String>,
        exchange: Arc<dyn Exchange>,
        logs: Arc<dyn TransactionLogProvider>,
    ) -> WorkerRuntimeBuilder {
        WorkerRuntimeBuilder {
            worker_id: worker_id.into(),
            exchange,
            logs,
            status_emitter: None,
            connection_monitor: None,
            workers: Vec::new(),
        }
    }

    pub fn factory(&self) -> &ChannelFactory {
        &self.factory
    }

    /// Registers `channel` under its topic, returning the channel it replaced.
    pub async fn register_channel(&self, channel: Channel) -> Option<Arc<Channel>> {
        let topic = channel.topic().to_string();
        debug!(
            event = events::CHANNEL_REGISTER,
            component = COMPONENT,
            worker_id = self.worker_id.as_str(),
            channel = topic.as_str(),
            "registering channel"
        );
        self.channels
            .write()
            .await
            .insert(topic, Arc::new(channel))
    }

    pub async fn remove_channel(&self, topic: &str) -> Option<Arc<Channel>> {
        self.channels.write().await.remove(topic)
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Registers every control channel and the worker-status channel.
    pub async fn install_internal_channels(&self) -> Result<(), RuntimeError> {
        for channel in self.factory.internal_channels()? {
            self.register_channel(channel).await;
        }
        Ok(())
    }

    /// Registers one standard channel per topic and returns how many were built.
    pub async fn install_standard_channels<'a, I>(&self, topics: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let channels = self.factory.standard_channels(topics);
        let installed = channels.len();
        for channel in channels {
            self.register_channel(channel).await;
        }
        installed
    }

    /// Routes one inbound message: origin check, middleware for `phase`, then the rules.
    pub async fn on_inbound(
        &self,
        message: Message,
        phase: TransportPhase,
    ) -> Result<InboundOutcome, RuntimeError> {
        let Some(origin) = message.origin() else {
            warn!(
                event = events::INBOUND_MISSING_ORIGIN,
                component = COMPONENT,
                worker_id = self.worker_id.as_str(),
                channel = fields::format_channel(&message).as_str(),
                "inbound message without origin"
            );
            return Err(RuntimeError::MissingOrigin {
                channel: message.channel.clone(),
            });
        };
        let Some(topic) = message.channel.clone() else {
            return Err(RuntimeError::MissingChannel);
        };

        debug!(
            event = events::INBOUND_RECEIVE,
            component = COMPONENT,
            worker_id = self.worker_id.as_str(),
            channel = topic.as_str(),
            origin = origin.as_str(),
            phase = phase.as_str(),
            "inbound message"
        );

        let channel = self.channel_or_create(&topic).await?;

        let mut next = MiddlewareNext::new();
        let outcome = match channel.eval_middleware(&message, &mut next, phase).await {
            MiddlewareVerdict::Swallow => InboundOutcome::RejectedByMiddleware {
                reason: next.rejection().unwrap_or_default().to_string(),
            },
            MiddlewareVerdict::Error => InboundOutcome::MiddlewareFailed,
            MiddlewareVerdict::Pass => {
                let mut message = message;
                if channel.eval_rules(&mut message, self, origin, phase).await {
                    InboundOutcome::Accepted(message)
                } else {
                    InboundOutcome::RejectedByRules
                }
            }
        };

        debug!(
            event = events::INBOUND_OUTCOME,
            component = COMPONENT,
            worker_id = self.worker_id.as_str(),
            channel = topic.as_str(),
            origin = origin.as_str(),
            phase = phase.as_str(),
            outcome = outcome_label(&outcome),
            "inbound message routed"
        );
        Ok(outcome)
    }

    /// Runs the publish-out middleware that decides whether `message` reaches a subscriber.
    pub async fn on_outbound(&self, message: &Message) -> Result<OutboundOutcome, RuntimeError> {
        let Some(topic) = message.channel.as_deref() else {
            return Err(RuntimeError::MissingChannel);
        };
        let channel = self.channel_or_create(topic).await?;

        let mut next = MiddlewareNext::new();
        let outcome = match channel
            .eval_middleware(message, &mut next, TransportPhase::PublishOut)
            .await
        {
            MiddlewareVerdict::Pass => OutboundOutcome::Deliver,
            MiddlewareVerdict::Swallow => OutboundOutcome::Suppressed {
                reason: next.rejection().unwrap_or_default().to_string(),
            },
            MiddlewareVerdict::Error => OutboundOutcome::Failed,
        };

        if outcome == OutboundOutcome::Deliver {
            debug!(
                event = events::OUTBOUND_DELIVER,
                component = COMPONENT,
                worker_id = self.worker_id.as_str(),
                channel = topic,
                "delivering outbound message"
            );
        } else if tracing::enabled!(Level::DEBUG) {
            debug!(
                event = events::OUTBOUND_SUPPRESSED,
                component = COMPONENT,
                worker_id = self.worker_id.as_str(),
                channel = topic,
                originator = fields::format_originator(message).as_str(),
                outcome = ?outcome,
                "outbound message not delivered"
            );
        }
        Ok(outcome)
    }

    /// Publishes through the channel registered for `topic`.
    pub async fn publish_to_room(
        &self,
        topic: &str,
        message: Message,
        existing_header: Option<&InternalHeader>,
    ) -> Result<Message, RuntimeError> {
        let channel = self.channel_or_create(topic).await?;
        channel
            .publish_to_room(message, self, existing_header)
            .await
            .map_err(RuntimeError::Channel)
    }

    async fn channel_or_create(&self, topic: &str) -> Result<Arc<Channel>, RuntimeError> {
        if let Some(channel) = self.channels.read().await.get(topic) {
            return Ok(Arc::clone(channel));
        }

        if topics::split_schema_table(topic).is_none() {
            return Err(RuntimeError::UnknownChannel {
                topic: topic.to_string(),
            });
        }

        let mut channels = self.channels.write().await;
        if let Some(channel) = channels.get(topic) {
            return Ok(Arc::clone(channel));
        }
        let channel = Arc::new(self.factory.standard(topic)?);
        channels.insert(topic.to_string(), Arc::clone(&channel));
        info!(
            event = events::CHANNEL_CREATE,
            component = COMPONENT,
            worker_id = self.worker_id.as_str(),
            channel = topic,
            "created standard channel on demand"
        );
        Ok(channel)
    }
}

fn outcome_label(outcome: &InboundOutcome) -> &'static str {
    match outcome {
        InboundOutcome::Accepted(_) => "accepted",
        InboundOutcome::RejectedByMiddleware { .. } => "rejected_by_middleware",
        InboundOutcome::MiddlewareFailed => "middleware_failed",
        InboundOutcome::RejectedByRules => "rejected_by_rules",
    }
}

#[async_trait]
impl WorkerContext for WorkerRuntime {
    fn worker_id(&self) -> &str {
        &self.worker_id
    }

    fn workers(&self) -> Arc<Vec<String>> {
        self.workers.load_full()
    }

    fn set_workers(&self, workers: Vec<String>) {
        self.workers.store(Arc::new(workers));
    }

    fn users(&self) -> Arc<UserCache> {
        self.users.load_full()
    }

    fn set_users(&self, users: UserCache) {
        self.users.store(Arc::new(users));
    }

    fn update_users(&self, update: &(dyn Fn(&mut UserCache) + Send + Sync)) -> Arc<UserCache> {
        let mut updated = Arc::new(UserCache::new());
        self.users.rcu(|current| {
            let mut next = UserCache::clone(current);
            update(&mut next);
            updated = Arc::new(next);
            Arc::clone(&updated)
        });
        updated
    }

    fn exchange(&self) -> &dyn Exchange {
        self.exchange.as_ref()
    }

    async fn channel(&self, topic: &str) -> Option<Arc<Channel>> {
        self.channels.read().await.get(topic).cloned()
    }

    async fn transaction_log(
        &self,
        channel: &str,
    ) -> Result<Arc<dyn DurableLogWriter>, TransactionLogError> {
        self.logs.writer_for(channel).await
    }

    fn status_emitter(&self) -> &dyn StatusEmitter {
        self.status_emitter.as_ref()
    }

    fn connection_snapshot(&self) -> ConnectionSnapshot {
        self.connection_monitor.snapshot()
    }
}
