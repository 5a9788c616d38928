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

//! Worker runtime boundary.
//!
//! Rules and handlers never reach ambient state: everything they read or mutate is passed in
//! through [`WorkerContext`]. [`WorkerRuntime`] is the production implementation and also owns
//! the inbound and outbound entry points.

pub(crate) mod cluster_worker;
pub(crate) mod status;
pub(crate) mod worker_runtime;

use crate::channel::{Channel, ChannelError};
use crate::exchange::Exchange;
use crate::transaction_log::{DurableLogWriter, TransactionLogError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use cluster_worker::{InboundOutcome, OutboundOutcome, WorkerRuntime, WorkerRuntimeBuilder};
pub use status::{
    ConnectionInfo, ConnectionMonitor, ConnectionSnapshot, StatusEmitter, TracingStatusEmitter,
};

/// Local copy of the cluster user registry, keyed by username.
pub type UserCache = Map<String, Value>;

#[derive(Debug)]
pub enum RuntimeError {
    /// The message header carries no `data_source`.
    MissingOrigin { channel: Option<String> },
    MissingChannel,
    /// Not a registered channel and not a `schema:table` topic.
    UnknownChannel { topic: String },
    Channel(ChannelError),
    StatusEmit { reason: String },
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::MissingOrigin { channel } => write!(
                f,
                "message on channel {} has no resolved origin",
                channel.as_deref().unwrap_or("<none>")
            ),
            RuntimeError::MissingChannel => write!(f, "message has no channel"),
            RuntimeError::UnknownChannel { topic } => write!(f, "unknown channel {topic}"),
            RuntimeError::Channel(err) => write!(f, "channel operation failed: {err}"),
            RuntimeError::StatusEmit { reason } => {
                write!(f, "failed to emit cluster status: {reason}")
            }
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Channel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ChannelError> for RuntimeError {
    fn from(err: ChannelError) -> Self {
        RuntimeError::Channel(err)
    }
}

/// Worker state and collaborators visible to rules and channel handlers.
#[async_trait]
pub trait WorkerContext: Send + Sync {
    fn worker_id(&self) -> &str;

    fn workers(&self) -> Arc<Vec<String>>;

    fn set_workers(&self, workers: Vec<String>);

    fn users(&self) -> Arc<UserCache>;

    fn set_users(&self, users: UserCache);

    /// Applies `update` to a copy of the cache, stores the copy and returns it.
    fn update_users(&self, update: &(dyn Fn(&mut UserCache) + Send + Sync)) -> Arc<UserCache>;

    fn exchange(&self) -> &dyn Exchange;

    async fn channel(&self, topic: &str) -> Option<Arc<Channel>>;

    async fn transaction_log(
        &self,
        channel: &str,
    ) -> Result<Arc<dyn DurableLogWriter>, TransactionLogError>;

    fn status_emitter(&self) -> &dyn StatusEmitter;

    fn connection_snapshot(&self) -> ConnectionSnapshot;
}
