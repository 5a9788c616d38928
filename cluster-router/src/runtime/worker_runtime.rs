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

//! Runtime helper for spawning dedicated writer loops.

use crate::observability::events;
use std::future::Future;
use std::io;
use std::thread;
use tokio::runtime::Builder;
use tracing::{debug, warn};

pub(crate) const DEFAULT_LOG_WRITER_THREAD_NAME: &str = "cr-log-writer";
const COMPONENT: &str = "worker_runtime";

/// Handle for a spawned writer loop and its thread label.
pub(crate) struct WriterLoopHandle {
    worker_thread: String,
    _join_handle: thread::JoinHandle<()>,
}

impl WriterLoopHandle {
    pub(crate) fn worker_thread(&self) -> &str {
        &self.worker_thread
    }
}

/// Runs `run_loop` to completion on a named thread with its own current-thread runtime.
///
/// The runtime is built before the thread starts so that both failures surface as `io::Error`.
pub(crate) fn spawn_writer_loop<F, Fut>(
    thread_name: String,
    run_loop: F,
) -> io::Result<WriterLoopHandle>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + 'static,
{
    debug!(
        event = events::RUNTIME_SPAWN_START,
        component = COMPONENT,
        worker_thread = thread_name.as_str(),
        "spawning writer runtime thread"
    );

    let runtime = Builder::new_current_thread().enable_all().build()?;

    let spawned = thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            runtime.block_on(run_loop());
        });

    match spawned {
        Ok(join_handle) => {
            debug!(
                event = events::RUNTIME_SPAWN_OK,
                component = COMPONENT,
                worker_thread = thread_name.as_str(),
                "writer runtime thread spawned"
            );
            Ok(WriterLoopHandle {
                worker_thread: thread_name,
                _join_handle: join_handle,
            })
        }
        Err(err) => {
            warn!(
                event = events::RUNTIME_SPAWN_FAILED,
                component = COMPONENT,
                worker_thread = thread_name.as_str(),
                err = %err,
                "failed to spawn writer runtime thread"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::spawn_writer_loop;
    use std::sync::mpsc;

    #[test]
    fn spawned_loop_runs_on_named_thread() {
        let (tx, rx) = mpsc::channel();

        let handle = spawn_writer_loop("cr-test-writer".to_string(), move || async move {
            let name = std::thread::current().name().map(str::to_string);
            tx.send(name).expect("receiver should be alive");
        })
        .expect("thread should spawn");

        assert_eq!(handle.worker_thread(), "cr-test-writer");
        assert_eq!(
            rx.recv().expect("loop should report").as_deref(),
            Some("cr-test-writer")
        );
    }
}
