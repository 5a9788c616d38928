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

//! `timestampMillis,operation,percentEncodedJson` line codec.

use crate::message::TransactionOperation;
use crate::transaction_log::TransactionLogError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, matching `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One decoded transaction-log record.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionLogLine {
    pub timestamp_millis: i64,
    pub operation: TransactionOperation,
    pub payload: Value,
}

impl TransactionLogLine {
    /// Stamps the current wall-clock time in milliseconds.
    pub fn now(operation: TransactionOperation, payload: Value) -> Self {
        Self {
            timestamp_millis: chrono::Utc::now().timestamp_millis(),
            operation,
            payload,
        }
    }
}

/// Renders a line without the trailing newline.
pub fn encode_line(line: &TransactionLogLine) -> Result<String, TransactionLogError> {
    let json = serde_json::to_string(&line.payload).map_err(TransactionLogError::Encode)?;
    Ok(format!(
        "{},{},{}",
        line.timestamp_millis,
        line.operation,
        utf8_percent_encode(&json, URI_COMPONENT)
    ))
}

pub fn decode_line(line: &str) -> Result<TransactionLogLine, TransactionLogError> {
    let mut fields = line.trim_end_matches(&['\r', '\n'][..]).splitn(3, ',');
    let (Some(timestamp), Some(operation), Some(payload)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(decode_error("expected three comma-separated fields"));
    };

    let timestamp_millis = timestamp
        .parse::<i64>()
        .map_err(|err| decode_error(format!("timestamp {timestamp:?}: {err}")))?;
    let operation = TransactionOperation::parse(operation)
        .ok_or_else(|| decode_error(format!("unknown operation {operation:?}")))?;
    let json = percent_decode_str(payload)
        .decode_utf8()
        .map_err(|err| decode_error(format!("payload is not utf-8: {err}")))?;
    let payload = serde_json::from_str(&json)
        .map_err(|err| decode_error(format!("payload is not json: {err}")))?;

    Ok(TransactionLogLine {
        timestamp_millis,
        operation,
        payload,
    })
}

fn decode_error(reason: impl Into<String>) -> TransactionLogError {
    TransactionLogError::Decode {
        reason: reason.into(),
    }
}
