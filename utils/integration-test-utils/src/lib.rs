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

mod recording_exchange;
pub use recording_exchange::RecordingExchange;
mod memory_log_sink;
pub use memory_log_sink::MemoryLogSink;
mod recording_status_emitter;
pub use recording_status_emitter::RecordingStatusEmitter;
mod integration_test_messages;
pub use integration_test_messages::{
    cluster_message, core_message, insert_transaction, transacted_cluster_insert,
    untransacted_cluster_insert, users_update, worker_list_update,
};
mod integration_test_logging;
pub use integration_test_logging::init_logging;
