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

//! Newline-delimited JSON replay through [`WorkerRuntime::on_inbound`].

use cluster_router::{InboundOutcome, Message, Origin, TransportPhase, WorkerRuntime};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

const COMPONENT: &str = "replay";
const REPLAY_LINE_MALFORMED: &str = "replay_line_malformed";
const REPLAY_LINE_ROUTED: &str = "replay_line_routed";
const REPLAY_LINE_FAILED: &str = "replay_line_failed";
const REPLAY_DONE: &str = "replay_done";

/// Per-outcome counts for one replay run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub malformed: usize,
}

pub async fn replay<R>(
    runtime: &WorkerRuntime,
    input: R,
    default_origin: Origin,
) -> std::io::Result<ReplaySummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReplaySummary::default();
    let mut lines = input.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut message: Message = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                warn!(
                    event = REPLAY_LINE_MALFORMED,
                    component = COMPONENT,
                    line = line_number,
                    err = %err,
                    "skipping line that is not a message"
                );
                summary.malformed += 1;
                continue;
            }
        };
        if message.origin().is_none() {
            message = message.with_origin(default_origin);
        }
        let channel = message.channel.clone().unwrap_or_default();

        match runtime.on_inbound(message, TransportPhase::PublishIn).await {
            Ok(outcome) => {
                let label = match &outcome {
                    InboundOutcome::Accepted(_) => {
                        summary.accepted += 1;
                        "accepted"
                    }
                    InboundOutcome::RejectedByMiddleware { .. }
                    | InboundOutcome::MiddlewareFailed
                    | InboundOutcome::RejectedByRules => {
                        summary.rejected += 1;
                        "rejected"
                    }
                };
                debug!(
                    event = REPLAY_LINE_ROUTED,
                    component = COMPONENT,
                    line = line_number,
                    channel = %channel,
                    outcome = label,
                    "routed replayed message"
                );
            }
            Err(err) => {
                warn!(
                    event = REPLAY_LINE_FAILED,
                    component = COMPONENT,
                    line = line_number,
                    channel = %channel,
                    err = %err,
                    "replayed message could not be routed"
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        event = REPLAY_DONE,
        component = COMPONENT,
        accepted = summary.accepted,
        rejected = summary.rejected,
        failed = summary.failed,
        malformed = summary.malformed,
        "replay finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{replay, ReplaySummary};
    use cluster_router::{
        log_path_for, topics, Exchange, FileTransactionLogRegistry, LocalExchange, Origin,
        TransactionLogConfig, WorkerRuntime,
    };
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn replay_stamps_missing_origin_and_counts_outcomes() {
        let root = tempfile::tempdir().expect("tempdir");
        let exchange = Arc::new(LocalExchange::new(8));
        exchange
            .set(topics::WORKERS_STORE_KEY, json!(["w1"]))
            .await
            .unwrap();
        let registry = Arc::new(FileTransactionLogRegistry::new(TransactionLogConfig::new(
            root.path(),
        )));
        let runtime = WorkerRuntime::builder("w1", exchange, registry).build();
        runtime.install_internal_channels().await.unwrap();

        let input = [
            json!({
                "channel": "dev:dog",
                "data": { "transaction": { "operation": "insert", "records": [{ "id": 1 }] } },
                "transacted": true
            })
            .to_string(),
            String::new(),
            "not json".to_string(),
            json!({
                "channel": "dev:dog",
                "data": { "transaction": { "operation": "insert", "records": [{ "id": 2 }] } }
            })
            .to_string(),
            json!({ "channel": "internal:nope", "data": {} }).to_string(),
        ]
        .join("\n");

        let summary = replay(&runtime, input.as_bytes(), Origin::Cluster)
            .await
            .unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                accepted: 1,
                rejected: 1,
                failed: 1,
                malformed: 1,
            }
        );
        let logged = std::fs::read_to_string(log_path_for(root.path(), "dev:dog")).unwrap();
        assert_eq!(logged.lines().count(), 1);
    }
}
