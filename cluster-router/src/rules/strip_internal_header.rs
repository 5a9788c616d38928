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
use crate::message::{Message, INTERNAL_HEADER_KEY};
use crate::rules::{Rule, RuleArgs, RuleError};
use crate::runtime::WorkerContext;
use async_trait::async_trait;
use serde_json::Value;

/// Removes the internal header from the message and from its payload.
pub struct StripInternalHeaderRule {
    descriptor: CommandDescriptor,
}

impl StripInternalHeaderRule {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::StripInternalHeader, RuleOrder::Low),
        }
    }
}

impl Default for StripInternalHeaderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for StripInternalHeaderRule {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Rule for StripInternalHeaderRule {
    async fn evaluate(
        &self,
        message: &mut Message,
        _args: &RuleArgs,
        _context: &dyn WorkerContext,
    ) -> Result<bool, RuleError> {
        message.internal_header = None;
        if let Value::Object(data) = &mut message.data {
            data.remove(INTERNAL_HEADER_KEY);
        }
        Ok(true)
    }
}
