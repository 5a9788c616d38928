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

//! Canonical structured event names used across `cluster-router`.

// Decision matrix events.
pub const RULE_PASS: &str = "rule_pass";
pub const RULE_REJECT: &str = "rule_reject";
pub const RULE_ERROR: &str = "rule_error";
pub const RULES_PASS: &str = "rules_pass";

// Transport middleware events.
pub const MIDDLEWARE_REJECT: &str = "middleware_reject";
pub const MIDDLEWARE_ERROR: &str = "middleware_error";
pub const MIDDLEWARE_MISSING_ORIGIN: &str = "middleware_missing_origin";

// Channel construction and outbound events.
pub const CHANNEL_TOPIC_EMPTY: &str = "channel_topic_empty";
pub const CHANNEL_CREATE: &str = "channel_create";
pub const CHANNEL_CREATE_FAILED: &str = "channel_create_failed";
pub const CHANNEL_PUBLISH_TO_ROOM: &str = "channel_publish_to_room";

// Concrete routing rule events.
pub const WORKER_LIST_REFRESH_OK: &str = "worker_list_refresh_ok";
pub const WORKER_LIST_REFRESH_MALFORMED: &str = "worker_list_refresh_malformed";
pub const WORKER_ASSIGN_OK: &str = "worker_assign_ok";
pub const WORKER_ASSIGN_SKIPPED_TRANSACTED: &str = "worker_assign_skipped_transacted";
pub const WORKER_ASSIGN_NO_WORKERS: &str = "worker_assign_no_workers";
pub const TRANSACTION_LOG_WRITE_OK: &str = "transaction_log_write_ok";
pub const TRANSACTION_LOG_SKIP_OPERATION: &str = "transaction_log_skip_operation";
pub const TRANSACTION_LOG_SKIP_PAYLOAD: &str = "transaction_log_skip_payload";
pub const EXCHANGE_PUBLISH_MISSING_FIELDS: &str = "exchange_publish_missing_fields";
pub const CHANNEL_HANDLER_NOT_FOUND: &str = "channel_handler_not_found";

// Control-channel handler events.
pub const HANDLER_WORKERS_REPLACED: &str = "handler_workers_replaced";
pub const HANDLER_USERS_REPLACED: &str = "handler_users_replaced";
pub const HANDLER_USERS_RESET: &str = "handler_users_reset";
pub const HANDLER_USER_MUTATION_SKIPPED: &str = "handler_user_mutation_skipped";
pub const HANDLER_USER_SYNC_FAILED: &str = "handler_user_sync_failed";
pub const HANDLER_STATUS_REQUEST_FORWARDED: &str = "handler_status_request_forwarded";
pub const HANDLER_STATUS_RESPONSE_EMITTED: &str = "handler_status_response_emitted";
pub const HANDLER_STATUS_FAILED: &str = "handler_status_failed";
pub const HANDLER_STATUS_SELF_REQUEST_IGNORED: &str = "handler_status_self_request_ignored";
pub const HANDLER_STATUS_RESPONDED: &str = "handler_status_responded";

// Worker runtime events.
pub const INBOUND_RECEIVE: &str = "inbound_receive";
pub const INBOUND_MISSING_ORIGIN: &str = "inbound_missing_origin";
pub const INBOUND_OUTCOME: &str = "inbound_outcome";
pub const OUTBOUND_DELIVER: &str = "outbound_deliver";
pub const OUTBOUND_SUPPRESSED: &str = "outbound_suppressed";
pub const CHANNEL_REGISTER: &str = "channel_register";
pub const CLUSTER_STATUS_EMIT: &str = "cluster_status_emit";

// Transaction log writer events.
pub const LOG_WRITER_CREATE: &str = "log_writer_create";
pub const LOG_WRITER_REUSE: &str = "log_writer_reuse";
pub const LOG_WRITER_ROTATE: &str = "log_writer_rotate";
pub const LOG_WRITER_WRITE_FAILED: &str = "log_writer_write_failed";
pub const LOG_WRITER_CLOSED: &str = "log_writer_closed";
pub const RUNTIME_SPAWN_START: &str = "runtime_spawn_start";
pub const RUNTIME_SPAWN_OK: &str = "runtime_spawn_ok";
pub const RUNTIME_SPAWN_FAILED: &str = "runtime_spawn_failed";

// Single-process exchange events.
pub const EXCHANGE_PUBLISH_NO_SUBSCRIBERS: &str = "exchange_publish_no_subscribers";
