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
use crate::message::{Message, TransportPhase};
use crate::middleware::{Middleware, MiddlewareError, MiddlewareNext};
use crate::observability::fields;
use async_trait::async_trait;

/// Publish-in check that the payload is a JSON object.
pub struct RequestDataValidMiddleware {
    descriptor: CommandDescriptor,
}

impl RequestDataValidMiddleware {
    pub fn new() -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::RequestDataValid, RuleOrder::High),
        }
    }
}

impl Default for RequestDataValidMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for RequestDataValidMiddleware {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Middleware for RequestDataValidMiddleware {
    fn phase(&self) -> TransportPhase {
        TransportPhase::PublishIn
    }

    async fn evaluate(
        &self,
        message: &Message,
        next: &mut MiddlewareNext,
    ) -> Result<(), MiddlewareError> {
        if !message.data.is_object() {
            next.reject(format!(
                "request data must be an object, got {}",
                fields::format_value_shape(&message.data)
            ));
        }
        Ok(())
    }
}
