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
use crate::observability::events;
use crate::rules::{Rule, RuleArgs, RuleError};
use crate::runtime::WorkerContext;
use async_trait::async_trait;
use tracing::debug;

const COMPONENT: &str = "dispatch_to_channel_handler";

/// Terminal rule: runs the inbound handler of the channel registered for the topic.
///
/// A topic with no registered channel still passes.
pub struct DispatchToChannelHandlerRule {
    descriptor: CommandDescriptor,
}

impl DispatchToChannelHandlerRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(
                CommandKind::DispatchToChannelHandler,
                RuleOrder::Last,
            ),
        }
    }
}

impl Default for DispatchToChannelHandlerRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for DispatchToChannelHandlerRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Rule for DispatchToChannelHandlerRule {
    async fn evaluate(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        let Some(channel) = context.channel(&args.topic).await else {
            debug!(
                event = events::CHANNEL_HANDLER_NOT_FOUND,
                component = COMPONENT,
                channel = args.topic.as_str(),
                "no channel registered for topic"
            );
            return Ok(true);
        };

        channel
            .inbound_msg_handler(message, context, None)
            .await
            .map_err(RuleError::Handler)?;
        Ok(true)
    }
}
