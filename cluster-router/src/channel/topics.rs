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

//! Well-known control topics and shared-store keys.

pub const INTERNAL_TOPIC_PREFIX: &str = "internal:";

pub const WORKERS: &str = "internal:workers";
pub const USERS: &str = "internal:users";
pub const ADD_USER: &str = "internal:add_user";
pub const ALTER_USER: &str = "internal:alter_user";
pub const DROP_USER: &str = "internal:drop_user";
pub const CLUSTER_STATUS: &str = "internal:cluster_status";
pub const WORKER_STATUS: &str = "internal:worker_status";

pub const WORKERS_STORE_KEY: &str = "internal:workers";
pub const USERS_STORE_KEY: &str = "internal:users";

pub const ACK_TOPIC_PREFIX: &str = "ack";

pub fn is_internal_topic(topic: &str) -> bool {
    topic.starts_with(INTERNAL_TOPIC_PREFIX)
}

/// Splits a `schema:table` data topic. Internal topics and malformed names yield `None`.
pub fn split_schema_table(topic: &str) -> Option<(&str, &str)> {
    if is_internal_topic(topic) {
        return None;
    }

    topic
        .split_once(':')
        .filter(|(schema, table)| !schema.is_empty() && !table.is_empty())
}

pub fn ack_topic_for(topic: &str) -> String {
    format!("{ACK_TOPIC_PREFIX}{topic}")
}
