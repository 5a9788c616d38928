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

use crate::channel::topics::WORKERS_STORE_KEY;
use crate::command::{Command, CommandDescriptor, CommandKind, RuleOrder};
use crate::message::Message;
use crate::observability::{events, fields};
use crate::rules::{Rule, RuleArgs, RuleError};
use crate::runtime::WorkerContext;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

const COMPONENT: &str = "refresh_worker_list";

/// Reloads the worker registry from the shared store. A stale list is kept on any failure.
pub struct RefreshWorkerListRule {
    descriptor: CommandDescriptor,
}

impl RefreshWorkerListRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::RefreshWorkerList, RuleOrder::High),
        }
    }
}

impl Default for RefreshWorkerListRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for RefreshWorkerListRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

fn parse_workers(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|worker| worker.as_str().map(str::to_string))
        .collect()
}

#[async_trait]
impl Rule for RefreshWorkerListRule {
    async fn evaluate(
        &self,
        _message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        let Some(registry) = context.exchange().get(WORKERS_STORE_KEY).await? else {
            warn!(
                event = events::WORKER_LIST_REFRESH_MALFORMED,
                component = COMPONENT,
                channel = args.topic.as_str(),
                reason = fields::REASON_REGISTRY_ABSENT,
                "worker registry missing from shared store"
            );
            return Ok(false);
        };

        let Some(workers) = parse_workers(&registry) else {
            warn!(
                event = events::WORKER_LIST_REFRESH_MALFORMED,
                component = COMPONENT,
                channel = args.topic.as_str(),
                reason = fields::REASON_REGISTRY_MALFORMED,
                shape = fields::format_value_shape(&registry),
                "worker registry is not a list of worker ids"
            );
            return Ok(false);
        };

        debug!(
            event = events::WORKER_LIST_REFRESH_OK,
            component = COMPONENT,
            channel = args.topic.as_str(),
            workers = workers.len(),
            "worker list refreshed"
        );
        context.set_workers(workers);
        Ok(true)
    }
}
