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

//! Worker rules and the decision matrix that evaluates them.
//!
//! A rule returns `Ok(true)` to let the message continue, `Ok(false)` to stop it (a business
//! rejection or a deliberate swallow) and `Err` for failures. The matrix collapses the last two
//! into a single `false`; [`RuleOutcome`] keeps the distinction for diagnostics.

pub(crate) mod assign_to_worker;
pub(crate) mod clean_envelope;
pub(crate) mod decision_matrix;
pub(crate) mod dispatch_to_channel_handler;
pub(crate) mod post_to_exchange;
pub(crate) mod refresh_worker_list;
pub(crate) mod strip_internal_header;
pub(crate) mod write_to_transaction_log;

use crate::channel::ChannelError;
use crate::command::{Command, CommandId, CommandKind};
use crate::exchange::ExchangeError;
use crate::message::Message;
use crate::runtime::WorkerContext;
use crate::transaction_log::TransactionLogError;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Per-evaluation arguments supplied by the owning channel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleArgs {
    pub topic: String,
}

impl RuleArgs {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

/// Unexpected failures raised while evaluating a rule.
#[derive(Debug)]
pub enum RuleError {
    Exchange(ExchangeError),
    TransactionLog(TransactionLogError),
    Handler(ChannelError),
    Serialize(serde_json::Error),
    Failed(String),
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleError::Exchange(err) => write!(f, "exchange call failed: {err}"),
            RuleError::TransactionLog(err) => write!(f, "transaction log failed: {err}"),
            RuleError::Handler(err) => write!(f, "channel handler failed: {err}"),
            RuleError::Serialize(err) => write!(f, "failed to serialize message: {err}"),
            RuleError::Failed(reason) => write!(f, "rule failed: {reason}"),
        }
    }
}

impl Error for RuleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuleError::Exchange(err) => Some(err),
            RuleError::TransactionLog(err) => Some(err),
            RuleError::Handler(err) => Some(err),
            RuleError::Serialize(err) => Some(err),
            RuleError::Failed(_) => None,
        }
    }
}

impl From<ExchangeError> for RuleError {
    fn from(err: ExchangeError) -> Self {
        RuleError::Exchange(err)
    }
}

impl From<TransactionLogError> for RuleError {
    fn from(err: TransactionLogError) -> Self {
        RuleError::TransactionLog(err)
    }
}

/// A prioritized routing step evaluated against one message.
#[async_trait]
pub trait Rule: Command {
    async fn evaluate(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
    ) -> Result<bool, RuleError>;
}

/// Detailed result of one collection evaluation.
#[derive(Debug)]
pub enum RuleOutcome {
    Passed,
    Rejected {
        kind: CommandKind,
        id: CommandId,
    },
    Errored {
        kind: CommandKind,
        id: CommandId,
        error: RuleError,
    },
}

impl RuleOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, RuleOutcome::Passed)
    }

    /// Kind of the rule that stopped evaluation, if any.
    pub fn stopped_at(&self) -> Option<CommandKind> {
        match self {
            RuleOutcome::Passed => None,
            RuleOutcome::Rejected { kind, .. } | RuleOutcome::Errored { kind, .. } => Some(*kind),
        }
    }
}
