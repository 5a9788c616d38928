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

use crate::channel::{topics, Channel, ChannelError, ChannelKind, ControlChannel};
use crate::command::table::CommandTable;
use crate::message::{Origin, TransportPhase};
use crate::middleware::originator_check::OriginatorCheckMiddleware;
use crate::middleware::request_data_valid::RequestDataValidMiddleware;
use crate::middleware::Middleware;
use crate::observability::events;
use crate::rules::assign_to_worker::AssignToWorkerRule;
use crate::rules::clean_envelope::CleanEnvelopeRule;
use crate::rules::decision_matrix::DecisionMatrix;
use crate::rules::dispatch_to_channel_handler::DispatchToChannelHandlerRule;
use crate::rules::post_to_exchange::PostToExchangeRule;
use crate::rules::refresh_worker_list::RefreshWorkerListRule;
use crate::rules::strip_internal_header::StripInternalHeaderRule;
use crate::rules::write_to_transaction_log::WriteToTransactionLogRule;
use crate::rules::Rule;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "channel_factory";

/// Builds channels with the policy each variant ships with.
#[derive(Clone, Debug)]
pub struct ChannelFactory {
    worker_id: String,
}

impl ChannelFactory {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn create(&self, kind: ChannelKind, topic: &str) -> Result<Channel, ChannelError> {
        let (rules, middleware) = match kind {
            ChannelKind::Standard => (standard_rules()?, self.standard_middleware()?),
            ChannelKind::Control(_) | ChannelKind::WorkerStatus => {
                (dispatch_only_rules()?, CommandTable::new())
            }
        };

        let channel = Channel::new(topic, kind)?
            .with_rules(DecisionMatrix::with_table(rules))
            .with_middleware_table(middleware);

        debug!(
            event = events::CHANNEL_CREATE,
            component = COMPONENT,
            channel = topic,
            kind = ?kind,
            "channel created"
        );
        Ok(channel)
    }

    /// A `schema:table` data channel.
    pub fn standard(&self, topic: &str) -> Result<Channel, ChannelError> {
        self.create(ChannelKind::Standard, topic)
    }

    pub fn control(&self, control: ControlChannel) -> Result<Channel, ChannelError> {
        self.create(ChannelKind::Control(control), control.topic())
    }

    pub fn worker_status(&self) -> Result<Channel, ChannelError> {
        self.create(ChannelKind::WorkerStatus, topics::WORKER_STATUS)
    }

    /// Builds one standard channel per topic. A failing topic is logged and skipped.
    pub fn standard_channels<'a, I>(&self, topics: I) -> Vec<Channel>
    where
        I: IntoIterator<Item = &'a str>,
    {
        topics
            .into_iter()
            .filter_map(|topic| match self.standard(topic) {
                Ok(channel) => Some(channel),
                Err(err) => {
                    warn!(
                        event = events::CHANNEL_CREATE_FAILED,
                        component = COMPONENT,
                        channel = topic,
                        err = %err,
                        "skipping channel"
                    );
                    None
                }
            })
            .collect()
    }

    /// Every control channel plus the worker-status channel.
    pub fn internal_channels(&self) -> Result<Vec<Channel>, ChannelError> {
        let mut channels = ControlChannel::ALL
            .iter()
            .map(|control| self.control(*control))
            .collect::<Result<Vec<_>, _>>()?;
        channels.push(self.worker_status()?);
        Ok(channels)
    }

    fn standard_middleware(&self) -> Result<CommandTable<dyn Middleware>, ChannelError> {
        let mut table: CommandTable<dyn Middleware> = CommandTable::new();
        for origin in [Origin::Core, Origin::Cluster] {
            let request_data_valid: Arc<dyn Middleware> =
                Arc::new(RequestDataValidMiddleware::new());
            let originator_check: Arc<dyn Middleware> =
                Arc::new(OriginatorCheckMiddleware::new(self.worker_id.as_str()));
            for middleware in [request_data_valid, originator_check] {
                let phase = middleware.phase();
                table.add(middleware, origin, phase)?;
            }
        }
        Ok(table)
    }
}

fn standard_rules() -> Result<CommandTable<dyn Rule>, ChannelError> {
    let mut table: CommandTable<dyn Rule> = CommandTable::new();
    let phase = TransportPhase::PublishIn;

    let cluster: [Arc<dyn Rule>; 7] = [
        Arc::new(RefreshWorkerListRule::new()),
        Arc::new(AssignToWorkerRule::new()),
        Arc::new(WriteToTransactionLogRule::new()),
        Arc::new(CleanEnvelopeRule::new()),
        Arc::new(StripInternalHeaderRule::new()),
        Arc::new(PostToExchangeRule::new()),
        Arc::new(DispatchToChannelHandlerRule::new()),
    ];
    for rule in cluster {
        table.add(rule, Origin::Cluster, phase)?;
    }

    let core: [Arc<dyn Rule>; 6] = [
        Arc::new(RefreshWorkerListRule::new()),
        Arc::new(WriteToTransactionLogRule::new()),
        Arc::new(CleanEnvelopeRule::new()),
        Arc::new(StripInternalHeaderRule::new()),
        Arc::new(PostToExchangeRule::new()),
        Arc::new(DispatchToChannelHandlerRule::new()),
    ];
    for rule in core {
        table.add(rule, Origin::Core, phase)?;
    }

    Ok(table)
}

fn dispatch_only_rules() -> Result<CommandTable<dyn Rule>, ChannelError> {
    let mut table: CommandTable<dyn Rule> = CommandTable::new();
    for origin in [Origin::Core, Origin::Cluster] {
        table.add(
            Arc::new(DispatchToChannelHandlerRule::new()),
            origin,
            TransportPhase::PublishIn,
        )?;
    }
    Ok(table)
}
