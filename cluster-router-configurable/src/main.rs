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

mod config;
mod replay;

use crate::config::Config;
use clap::Parser;
use cluster_router::{topics, Exchange, FileTransactionLogRegistry, LocalExchange, WorkerRuntime};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command()]
struct RouterArgs {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = RouterArgs::parse();
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!(err = %err, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    info!(
        worker_id = %config.router.worker_id,
        log_root = %config.transaction_log.root_dir.display(),
        "Started cluster-router-configurable"
    );

    let exchange = Arc::new(LocalExchange::new(config.router.channel_capacity));
    if let Err(err) = exchange
        .set(topics::WORKERS_STORE_KEY, serde_json::json!(config.workers))
        .await
    {
        error!(err = %err, "unable to seed the worker registry");
        return ExitCode::FAILURE;
    }

    let logs = Arc::new(FileTransactionLogRegistry::new(
        config.transaction_log.clone(),
    ));
    let runtime = WorkerRuntime::builder(config.router.worker_id.clone(), exchange, logs)
        .workers(config.workers.clone())
        .build();
    if let Err(err) = runtime.install_internal_channels().await {
        error!(err = %err, "unable to install internal channels");
        return ExitCode::FAILURE;
    }
    let installed = runtime
        .install_standard_channels(config.router.schemas_tables.iter().map(String::as_str))
        .await;
    info!(standard_channels = installed, "channels installed");

    let input = match tokio::fs::File::open(&config.replay.input_file).await {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            error!(
                path = %config.replay.input_file.display(),
                err = %err,
                "unable to open replay input"
            );
            return ExitCode::FAILURE;
        }
    };

    match replay::replay(&runtime, input, config.replay.origin).await {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(err) => {
            error!(err = %err, "replay input could not be read");
            ExitCode::FAILURE
        }
    }
}
