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

use crate::channel::topics::split_schema_table;
use crate::command::{Command, CommandDescriptor, CommandKind, RuleOrder};
use crate::message::Message;
use crate::observability::{events, fields};
use crate::rules::{Rule, RuleArgs, RuleError};
use crate::runtime::WorkerContext;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{debug, warn};

const COMPONENT: &str = "assign_to_worker";

/// Hands untransacted cluster traffic to one local worker and swallows it.
///
/// The chosen worker re-submits a transacted copy later, which is the copy that gets logged
/// and published. Returning `false` after a successful handoff is therefore expected.
pub struct AssignToWorkerRule {
    descriptor: CommandDescriptor,
}

impl AssignToWorkerRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::AssignToWorker, RuleOrder::Low),
        }
    }
}

impl Default for AssignToWorkerRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for AssignToWorkerRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

fn stamp_schema_table(message: &mut Message, topic: &str) {
    let Some((schema, table)) = split_schema_table(topic) else {
        return;
    };
    if let Value::Object(data) = &mut message.data {
        data.insert("schema".to_string(), Value::String(schema.to_string()));
        data.insert("table".to_string(), Value::String(table.to_string()));
    }
}

/// Uniform choice over the registered workers.
fn pick_worker(workers: &[String]) -> Option<&String> {
    workers.choose(&mut rand::thread_rng())
}

#[async_trait]
impl Rule for AssignToWorkerRule {
    async fn evaluate(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        if message.transacted {
            debug!(
                event = events::WORKER_ASSIGN_SKIPPED_TRANSACTED,
                component = COMPONENT,
                channel = args.topic.as_str(),
                "message already transacted"
            );
            return Ok(true);
        }

        stamp_schema_table(message, &args.topic);

        let workers = context.workers();
        let Some(worker_id) = pick_worker(&workers) else {
            warn!(
                event = events::WORKER_ASSIGN_NO_WORKERS,
                component = COMPONENT,
                channel = args.topic.as_str(),
                reason = fields::REASON_NO_WORKERS,
                "dropping message, no local workers registered"
            );
            return Ok(false);
        };

        let envelope = serde_json::to_value(&*message).map_err(RuleError::Serialize)?;
        context.exchange().publish(worker_id, envelope).await?;

        debug!(
            event = events::WORKER_ASSIGN_OK,
            component = COMPONENT,
            channel = args.topic.as_str(),
            worker_id = worker_id.as_str(),
            "message handed to worker"
        );
        Ok(false)
    }
}
