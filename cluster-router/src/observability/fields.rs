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

//! Canonical structured field keys and value-format helpers.

use crate::message::Message;
use serde_json::Value;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const CHANNEL: &str = "channel";
pub const ORIGIN: &str = "origin";
pub const PHASE: &str = "phase";
pub const RULE_KIND: &str = "rule_kind";
pub const RULE_ID: &str = "rule_id";
pub const WORKER_ID: &str = "worker_id";
pub const WORKER_THREAD: &str = "worker_thread";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_NO_WORKERS: &str = "no_workers";
pub const REASON_MISSING_CHANNEL: &str = "missing_channel";
pub const REASON_MISSING_DATA: &str = "missing_data";
pub const REASON_REGISTRY_ABSENT: &str = "registry_absent";
pub const REASON_REGISTRY_MALFORMED: &str = "registry_malformed";
pub const REASON_UNKNOWN_OPERATION: &str = "unknown_operation";
pub const REASON_MISSING_PAYLOAD: &str = "missing_payload";

pub fn format_channel(message: &Message) -> String {
    message
        .channel
        .clone()
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_originator(message: &Message) -> String {
    message
        .worker_originator_id()
        .unwrap_or(NONE)
        .to_string()
}

/// Short JSON type label, used when a payload shape is rejected.
pub fn format_value_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
