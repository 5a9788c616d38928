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

use crate::command::{Command, CommandDescriptor, CommandKind, RuleOrder};
use crate::message::Message;
use crate::observability::{events, fields};
use crate::rules::{Rule, RuleArgs, RuleError};
use crate::runtime::WorkerContext;
use crate::transaction_log::line::{encode_line, TransactionLogLine};
use async_trait::async_trait;
use tracing::debug;

const COMPONENT: &str = "write_to_transaction_log";

/// Appends committed (transacted) mutations to the channel's durable log.
///
/// The transacted flag is cleared before writing so later rules never log twice. A failed
/// write stops the pipeline for that message.
pub struct WriteToTransactionLogRule {
    descriptor: CommandDescriptor,
}

impl WriteToTransactionLogRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::WriteToTransactionLog, RuleOrder::Low),
        }
    }
}

impl Default for WriteToTransactionLogRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for WriteToTransactionLogRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Rule for WriteToTransactionLogRule {
    async fn evaluate(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        if !message.transacted {
            return Ok(true);
        }
        message.transacted = false;

        let Some(operation) = message.transaction_operation() else {
            debug!(
                event = events::TRANSACTION_LOG_SKIP_OPERATION,
                component = COMPONENT,
                channel = args.topic.as_str(),
                reason = fields::REASON_UNKNOWN_OPERATION,
                "skipping transaction log for unsupported operation"
            );
            return Ok(true);
        };

        let Some(payload) = message
            .transaction()
            .and_then(|transaction| transaction.get(operation.payload_field()))
            .cloned()
        else {
            debug!(
                event = events::TRANSACTION_LOG_SKIP_PAYLOAD,
                component = COMPONENT,
                channel = args.topic.as_str(),
                operation = operation.as_str(),
                reason = fields::REASON_MISSING_PAYLOAD,
                "skipping transaction log without a payload field"
            );
            return Ok(true);
        };
        let line = encode_line(&TransactionLogLine::now(operation, payload))?;

        let writer = context.transaction_log(&args.topic).await?;
        writer.append_line(line).await?;

        debug!(
            event = events::TRANSACTION_LOG_WRITE_OK,
            component = COMPONENT,
            channel = args.topic.as_str(),
            operation = operation.as_str(),
            "transaction logged"
        );
        Ok(true)
    }
}
