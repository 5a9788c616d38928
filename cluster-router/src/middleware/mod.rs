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

//! Transport middleware: read-only checks attached to one transport phase.
//!
//! Middleware reject through [`MiddlewareNext::reject`] and fail through `Err`. The owning
//! channel turns the two into [`MiddlewareVerdict::Swallow`] and [`MiddlewareVerdict::Error`].

pub(crate) mod originator_check;
pub(crate) mod request_data_valid;

use crate::command::Command;
use crate::message::{Message, TransportPhase};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection callback handed to every middleware in a chain.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MiddlewareNext {
    rejection: Option<String>,
}

impl MiddlewareNext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the message. The first reason wins.
    pub fn reject(&mut self, reason: impl Into<String>) {
        if self.rejection.is_none() {
            self.rejection = Some(reason.into());
        }
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

/// Result of a channel's middleware chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MiddlewareVerdict {
    Pass,
    Swallow,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MiddlewareError {
    MissingOrigin,
    Failed { reason: String },
}

impl Display for MiddlewareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MiddlewareError::MissingOrigin => write!(f, "message has no resolved origin"),
            MiddlewareError::Failed { reason } => write!(f, "middleware failed: {reason}"),
        }
    }
}

impl Error for MiddlewareError {}

#[async_trait]
pub trait Middleware: Command {
    fn phase(&self) -> TransportPhase;

    async fn evaluate(
        &self,
        message: &Message,
        next: &mut MiddlewareNext,
    ) -> Result<(), MiddlewareError>;
}
