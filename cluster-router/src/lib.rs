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

//! # cluster-router
//!
//! `cluster-router` is the replication message-routing core of a clustered database worker.
//! Every locally committed mutation and every message received from a cluster peer is run
//! through an ordered, per-channel decision pipeline that may assign it to a local worker,
//! append it to a durable transaction log and publish it on the shared exchange.
//!
//! Typical usage is centered on [`WorkerRuntime`]: build it over an [`Exchange`] and a
//! [`TransactionLogProvider`], install channels, then feed messages to
//! [`WorkerRuntime::on_inbound`].
//!
//! ```
//! use std::sync::Arc;
//! use cluster_router::{
//!     topics, Exchange, InboundOutcome, LocalExchange, Message, Origin,
//!     TransactionLogConfig, FileTransactionLogRegistry, TransportPhase, WorkerRuntime,
//! };
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let exchange = Arc::new(LocalExchange::default());
//! exchange.set(topics::WORKERS_STORE_KEY, json!(["w1"])).await.unwrap();
//!
//! let log_dir = std::env::temp_dir().join("cluster-router-doc");
//! let logs = Arc::new(FileTransactionLogRegistry::new(TransactionLogConfig::new(log_dir)));
//! let runtime = WorkerRuntime::builder("w1", exchange.clone(), logs).build();
//! runtime.install_internal_channels().await.unwrap();
//!
//! let message = Message::new("dev:dog", json!({ "id": 1 })).with_origin(Origin::Core);
//! let outcome = runtime.on_inbound(message, TransportPhase::PublishIn).await.unwrap();
//! assert!(matches!(outcome, InboundOutcome::Accepted(_)));
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Command layer: identity, priority buckets and the origin x phase table
//! - Rules: the decision matrix and the concrete routing rules
//! - Middleware: read-only transport checks per phase
//! - Channels: standard, control and worker-status rooms built by a factory
//! - Runtime: the worker context handed to rules, plus inbound and outbound entry points
//! - Collaborators: the exchange and the durable transaction log
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber. Binaries and tests
//! are responsible for one-time `tracing_subscriber` initialization at process boundaries.

mod channel;
pub use channel::{
    topics, Channel, ChannelError, ChannelFactory, ChannelKind, ControlChannel, HandlerReply,
    Responder,
};

mod command;
pub use command::collection::{CommandCollection, CommandCollectionError};
pub use command::table::CommandTable;
pub use command::{Command, CommandDescriptor, CommandId, CommandKind, RuleOrder};

mod exchange;
pub use exchange::local::{ExchangeDelivery, LocalExchange};
pub use exchange::{Exchange, ExchangeError};

mod message;
pub use message::{
    InternalHeader, Message, Origin, TransactionOperation, TransportPhase, INTERNAL_HEADER_KEY,
};

mod middleware;
pub use middleware::originator_check::OriginatorCheckMiddleware;
pub use middleware::request_data_valid::RequestDataValidMiddleware;
pub use middleware::{Middleware, MiddlewareError, MiddlewareNext, MiddlewareVerdict};

#[doc(hidden)]
pub mod observability;

mod rules;
pub use rules::assign_to_worker::AssignToWorkerRule;
pub use rules::clean_envelope::CleanEnvelopeRule;
pub use rules::decision_matrix::DecisionMatrix;
pub use rules::dispatch_to_channel_handler::DispatchToChannelHandlerRule;
pub use rules::post_to_exchange::PostToExchangeRule;
pub use rules::refresh_worker_list::RefreshWorkerListRule;
pub use rules::strip_internal_header::StripInternalHeaderRule;
pub use rules::write_to_transaction_log::WriteToTransactionLogRule;
pub use rules::{Rule, RuleArgs, RuleError, RuleOutcome};

mod runtime;
pub use runtime::{
    ConnectionInfo, ConnectionMonitor, ConnectionSnapshot, InboundOutcome, OutboundOutcome,
    RuntimeError, StatusEmitter, TracingStatusEmitter, UserCache, WorkerContext, WorkerRuntime,
    WorkerRuntimeBuilder,
};

mod transaction_log;
pub use transaction_log::file_writer::FileTransactionLogWriter;
pub use transaction_log::line::{decode_line, encode_line, TransactionLogLine};
pub use transaction_log::registry::{log_path_for, FileTransactionLogRegistry};
pub use transaction_log::{
    DurableLogWriter, TransactionLogConfig, TransactionLogError, TransactionLogProvider,
};

#[cfg(test)]
mod test_support;
