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

//! Shared publish/subscribe exchange and its small key-value store.

pub(crate) mod local;

use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures reported by an exchange implementation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExchangeError {
    Unavailable { reason: String },
    Publish { channel: String, reason: String },
    Store { key: String, reason: String },
}

impl Display for ExchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeError::Unavailable { reason } => write!(f, "exchange unavailable: {reason}"),
            ExchangeError::Publish { channel, reason } => {
                write!(f, "failed to publish on {channel}: {reason}")
            }
            ExchangeError::Store { key, reason } => {
                write!(f, "shared store access for {key} failed: {reason}")
            }
        }
    }
}

impl Error for ExchangeError {}

/// Opaque pub/sub plus shared registry store. Wire formats belong to the implementation.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn publish(&self, channel: &str, payload: Value) -> Result<(), ExchangeError>;

    async fn get(&self, key: &str) -> Result<Option<Value>, ExchangeError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), ExchangeError>;
}
