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

use cluster_router::{topics, Message, Origin};
use serde_json::{json, Value};

pub fn core_message(channel: &str, data: Value) -> Message {
    Message::new(channel, data).with_origin(Origin::Core)
}

pub fn cluster_message(channel: &str, data: Value) -> Message {
    Message::new(channel, data).with_origin(Origin::Cluster)
}

/// `{ "transaction": { "operation": "insert", "records": records } }`
pub fn insert_transaction(records: Value) -> Value {
    json!({ "transaction": { "operation": "insert", "records": records } })
}

pub fn untransacted_cluster_insert(channel: &str, records: Value) -> Message {
    cluster_message(channel, insert_transaction(records))
}

pub fn transacted_cluster_insert(channel: &str, records: Value) -> Message {
    untransacted_cluster_insert(channel, records).with_transacted(true)
}

pub fn worker_list_update(origin: Origin, workers: &[&str]) -> Message {
    Message::new(topics::WORKERS, json!({ "workers": workers })).with_origin(origin)
}

pub fn users_update(origin: Origin, users: Value) -> Message {
    Message::new(topics::USERS, json!({ "users": users })).with_origin(origin)
}
