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
use crate::rules::{Rule, RuleArgs, RuleError};
use crate::runtime::WorkerContext;
use async_trait::async_trait;
use serde_json::Value;

/// Payload fields that only make sense inside this process.
pub const LOCAL_ONLY_FIELDS: [&str; 2] = ["__id", "__originator"];

/// Strips local-only payload fields. Non-object payloads pass unchanged.
pub struct CleanEnvelopeRule {
    descriptor: CommandDescriptor,
}

impl CleanEnvelopeRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::CleanEnvelope, RuleOrder::Low),
        }
    }
}

impl Default for CleanEnvelopeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for CleanEnvelopeRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Rule for CleanEnvelopeRule {
    async fn evaluate(
        &self,
        message: &mut Message,
        _args: &RuleArgs,
        _context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        if let Value::Object(data) = &mut message.data {
            for field in LOCAL_ONLY_FIELDS {
                data.remove(field);
            }
        }
        Ok(true)
    }
}
