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
use async_trait::async_trait;

/// Publish-out check that keeps a worker from receiving its own messages back.
///
/// It judges the envelope's `worker_originator_id`, so it only acts on envelopes stamped by
/// [`publish_to_room`](crate::WorkerRuntime::publish_to_room). Standard-pipeline traffic loses
/// its header to `StripInternalHeaderRule` before `PostToExchangeRule` publishes the bare
/// `data`, and always passes this check.
pub struct OriginatorCheckMiddleware {
    descriptor: CommandDescriptor,
    worker_id: String,
}

impl OriginatorCheckMiddleware {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            descriptor: CommandDescriptor::new(CommandKind::OriginatorCheck, RuleOrder::High),
            worker_id: worker_id.into(),
        }
    }
}

impl Command for OriginatorCheckMiddleware {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl Middleware for OriginatorCheckMiddleware {
    fn phase(&self) -> TransportPhase {
        TransportPhase::PublishOut
    }

    async fn evaluate(
        &self,
        message: &Message,
        next: &mut MiddlewareNext,
    ) -> Result<(), MiddlewareError> {
        if message.worker_originator_id() == Some(self.worker_id.as_str()) {
            next.reject(format!("message originated from worker {}", self.worker_id));
        }
        Ok(())
    }
}
