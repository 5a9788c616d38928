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

//! Status collaborators: the process-local status emitter and the connection snapshot source.

use crate::observability::events;
use crate::runtime::RuntimeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

const COMPONENT: &str = "status";

/// Receives cluster status responses gathered from other workers.
pub trait StatusEmitter: Send + Sync {
    fn emit_cluster_status(&self, status: &Value) -> Result<(), RuntimeError>;
}

/// Emits every status response as an `info` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStatusEmitter;

impl StatusEmitter for TracingStatusEmitter {
    fn emit_cluster_status(&self, status: &Value) -> Result<(), RuntimeError> {
        let worker_id = status
            .get("worker_id")
            .and_then(Value::as_str)
            .unwrap_or("none");
        info!(
            event = events::CLUSTER_STATUS_EMIT,
            component = COMPONENT,
            worker_id,
            status = %status,
            "cluster status received"
        );
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub node: String,
    #[serde(default)]
    pub subscriptions: Vec<String>,
}

/// Inbound and outbound peer connections of this worker.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    #[serde(default)]
    pub inbound: Vec<ConnectionInfo>,
    #[serde(default)]
    pub outbound: Vec<ConnectionInfo>,
}

pub trait ConnectionMonitor: Send + Sync {
    fn snapshot(&self) -> ConnectionSnapshot;
}

/// A fixed snapshot, for workers without a live transport.
impl ConnectionMonitor for ConnectionSnapshot {
    fn snapshot(&self) -> ConnectionSnapshot {
        self.clone()
    }
}
