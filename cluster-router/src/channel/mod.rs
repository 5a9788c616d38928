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

//! Channels (rooms): a topic bound to worker rules, transport middleware and an inbound handler.
//!
//! The variant is picked once, at construction, by [`ChannelFactory`]. Every variant shares the
//! same contract and differs only in its inbound handler and pre-installed policy.

pub(crate) mod factory;
pub(crate) mod handlers;
pub mod topics;

use crate::command::collection::CommandCollectionError;
use crate::command::table::CommandTable;
use crate::command::CommandKind;
use crate::exchange::ExchangeError;
use crate::message::{InternalHeader, Message, Origin, TransportPhase};
use crate::middleware::{Middleware, MiddlewareError, MiddlewareNext, MiddlewareVerdict};
use crate::observability::{events, fields};
use crate::rules::decision_matrix::DecisionMatrix;
use crate::rules::RuleArgs;
use crate::runtime::WorkerContext;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{debug, warn, Level};

pub use factory::ChannelFactory;

const COMPONENT: &str = "channel";

/// Failures while building a channel or running its outbound path.
#[derive(Debug)]
pub enum ChannelError {
    EmptyTopic,
    Command(CommandCollectionError),
    Exchange(ExchangeError),
    Encode(serde_json::Error),
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::EmptyTopic => write!(f, "channel topic must not be empty"),
            ChannelError::Command(err) => write!(f, "failed to register command: {err}"),
            ChannelError::Exchange(err) => write!(f, "channel exchange call failed: {err}"),
            ChannelError::Encode(err) => write!(f, "failed to encode channel message: {err}"),
        }
    }
}

impl Error for ChannelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChannelError::EmptyTopic => None,
            ChannelError::Command(err) => Some(err),
            ChannelError::Exchange(err) => Some(err),
            ChannelError::Encode(err) => Some(err),
        }
    }
}

impl From<CommandCollectionError> for ChannelError {
    fn from(err: CommandCollectionError) -> Self {
        ChannelError::Command(err)
    }
}

/// Fixed internal control topics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ControlChannel {
    WorkerList,
    Users,
    AddUser,
    AlterUser,
    DropUser,
    ClusterStatus,
}

impl ControlChannel {
    pub const ALL: [ControlChannel; 6] = [
        ControlChannel::WorkerList,
        ControlChannel::Users,
        ControlChannel::AddUser,
        ControlChannel::AlterUser,
        ControlChannel::DropUser,
        ControlChannel::ClusterStatus,
    ];

    pub fn topic(&self) -> &'static str {
        match self {
            ControlChannel::WorkerList => topics::WORKERS,
            ControlChannel::Users => topics::USERS,
            ControlChannel::AddUser => topics::ADD_USER,
            ControlChannel::AlterUser => topics::ALTER_USER,
            ControlChannel::DropUser => topics::DROP_USER,
            ControlChannel::ClusterStatus => topics::CLUSTER_STATUS,
        }
    }
}

/// Closed set of channel behaviors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChannelKind {
    /// `schema:table` traffic.
    Standard,
    Control(ControlChannel),
    /// Process-to-process status exchange.
    WorkerStatus,
}

/// Sent to an inbound caller once the handler has run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandlerReply {
    pub ack_topic: String,
    pub handled: bool,
}

pub type Responder = oneshot::Sender<HandlerReply>;

pub struct Channel {
    topic: String,
    ack_topic: String,
    kind: ChannelKind,
    rules: Option<DecisionMatrix>,
    middleware: RwLock<CommandTable<dyn Middleware>>,
}

impl Channel {
    /// An unnamed channel; name it with [`Channel::set_topic`].
    pub fn with_kind(kind: ChannelKind) -> Self {
        Self {
            topic: String::new(),
            ack_topic: String::new(),
            kind,
            rules: None,
            middleware: RwLock::new(CommandTable::new()),
        }
    }

    pub fn new(topic: &str, kind: ChannelKind) -> Result<Self, ChannelError> {
        let mut channel = Self::with_kind(kind);
        if channel.set_topic(topic) {
            Ok(channel)
        } else {
            Err(ChannelError::EmptyTopic)
        }
    }

    pub fn with_rules(mut self, rules: DecisionMatrix) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_middleware_table(mut self, middleware: CommandTable<dyn Middleware>) -> Self {
        self.middleware = RwLock::new(middleware);
        self
    }

    /// Names the channel and derives its ack topic. An empty name is logged and refused.
    pub fn set_topic(&mut self, name: &str) -> bool {
        if name.is_empty() {
            warn!(
                event = events::CHANNEL_TOPIC_EMPTY,
                component = COMPONENT,
                kind = ?self.kind,
                "refusing empty channel topic"
            );
            return false;
        }

        self.topic = name.to_string();
        self.ack_topic = topics::ack_topic_for(name);
        true
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn ack_topic(&self) -> &str {
        &self.ack_topic
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn rules(&self) -> Option<&DecisionMatrix> {
        self.rules.as_ref()
    }

    /// Registers `middleware` under its own phase for `origin`.
    pub async fn add_middleware(
        &self,
        middleware: Arc<dyn Middleware>,
        origin: Origin,
    ) -> Result<(), ChannelError> {
        let phase = middleware.phase();
        self.middleware
            .write()
            .await
            .add(middleware, origin, phase)
            .map_err(ChannelError::Command)
    }

    pub async fn remove_middleware(
        &self,
        phase: TransportPhase,
        kind: CommandKind,
        origin: Origin,
    ) -> bool {
        self.middleware
            .write()
            .await
            .collection_mut(origin, phase)
            .remove_by_kind(kind)
    }

    pub async fn list_middleware(
        &self,
        phase: TransportPhase,
        origin: Origin,
    ) -> Vec<Arc<dyn Middleware>> {
        self.middleware
            .read()
            .await
            .collection(origin, phase)
            .list()
    }

    /// Runs the middleware for the message's own origin and `phase`.
    pub async fn eval_middleware(
        &self,
        message: &Message,
        next: &mut MiddlewareNext,
        phase: TransportPhase,
    ) -> MiddlewareVerdict {
        let Some(origin) = message.origin() else {
            warn!(
                event = events::MIDDLEWARE_MISSING_ORIGIN,
                component = COMPONENT,
                channel = self.topic.as_str(),
                phase = phase.as_str(),
                err = %MiddlewareError::MissingOrigin,
                "cannot select middleware"
            );
            return MiddlewareVerdict::Error;
        };

        let chain = self.list_middleware(phase, origin).await;
        for middleware in chain {
            if let Err(err) = middleware.evaluate(message, next).await {
                warn!(
                    event = events::MIDDLEWARE_ERROR,
                    component = COMPONENT,
                    channel = self.topic.as_str(),
                    origin = origin.as_str(),
                    phase = phase.as_str(),
                    rule_kind = middleware.kind().as_str(),
                    err = %err,
                    "middleware failed"
                );
                return MiddlewareVerdict::Error;
            }

            if let Some(reason) = next.rejection() {
                debug!(
                    event = events::MIDDLEWARE_REJECT,
                    component = COMPONENT,
                    channel = self.topic.as_str(),
                    origin = origin.as_str(),
                    phase = phase.as_str(),
                    rule_kind = middleware.kind().as_str(),
                    reason,
                    "middleware rejected message"
                );
                return MiddlewareVerdict::Swallow;
            }
        }

        MiddlewareVerdict::Pass
    }

    /// Delegates to the channel's rules. A channel without rules passes every message.
    pub async fn eval_rules(
        &self,
        message: &mut Message,
        context: &dyn WorkerContext,
        origin: Origin,
        phase: TransportPhase,
    ) -> bool {
        match &self.rules {
            Some(rules) => {
                rules
                    .eval_rules(message, &RuleArgs::new(&self.topic), context, origin, phase)
                    .await
            }
            None => true,
        }
    }

    /// Outbound path: stamps a missing header and channel, then publishes on this topic.
    ///
    /// A header already present on the message is left untouched.
    pub async fn publish_to_room(
        &self,
        mut message: Message,
        context: &dyn WorkerContext,
        existing_header: Option<&InternalHeader>,
    ) -> Result<Message, ChannelError> {
        if message.internal_header.is_none() {
            message.internal_header =
                Some(InternalHeader::stamped_by(context.worker_id(), existing_header));
        }
        if message.channel.is_none() {
            message.channel = Some(self.topic.clone());
        }

        if tracing::enabled!(Level::DEBUG) {
            debug!(
                event = events::CHANNEL_PUBLISH_TO_ROOM,
                component = COMPONENT,
                channel = self.topic.as_str(),
                worker_id = fields::format_originator(&message).as_str(),
                "publishing to room"
            );
        }

        let envelope = serde_json::to_value(&message).map_err(ChannelError::Encode)?;
        context
            .exchange()
            .publish(&self.topic, envelope)
            .await
            .map_err(ChannelError::Exchange)?;
        Ok(message)
    }

    /// Channel-specific terminal reaction to an inbound message.
    pub async fn inbound_msg_handler(
        &self,
        message: &Message,
        context: &dyn WorkerContext,
        responder: Option<Responder>,
    ) -> Result<(), ChannelError> {
        let result = match self.kind {
            ChannelKind::Standard => Ok(()),
            ChannelKind::Control(control) => {
                handlers::handle_control(control, message, context).await;
                Ok(())
            }
            ChannelKind::WorkerStatus => handlers::handle_worker_status(message, context).await,
        };

        if let Some(responder) = responder {
            // The caller may have stopped waiting.
            let _ = responder.send(HandlerReply {
                ack_topic: self.ack_topic.clone(),
                handled: result.is_ok(),
            });
        }
        result
    }
}
