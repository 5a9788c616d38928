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
use async_trait::async_trait;
use tracing::warn;

const COMPONENT: &str = "post_to_exchange";

/// Publishes the message payload on its channel for every subscriber, remote peers included.
pub struct PostToExchangeRule {
    descriptor: CommandDescriptor,
}

impl PostToExchangeRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::PostToExchange, RuleOrder::Low),
        }
    }
}

impl Default for PostToExchangeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for PostToExchangeRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Rule for PostToExchangeRule {
    async fn evaluate(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        let reason = match (&message.channel, message.data.is_null()) {
            (None, _) => Some(fields::REASON_MISSING_CHANNEL),
            (Some(_), true) => Some(fields::REASON_MISSING_DATA),
            _ => None,
        };
        if let Some(reason) = reason {
            warn!(
                event = events::EXCHANGE_PUBLISH_MISSING_FIELDS,
                component = COMPONENT,
                channel = args.topic.as_str(),
                reason,
                "message cannot be published"
            );
            return Ok(false);
        }

        let channel = message.channel.as_deref().unwrap_or(args.topic.as_str());
        context
            .exchange()
            .publish(channel, message.data.clone())
            .await?;
        Ok(true)
    }
}
