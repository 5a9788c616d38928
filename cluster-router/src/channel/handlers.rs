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

//! Inbound handlers of the control and worker-status channels.
//!
//! Each handler reduces one inbound payload into worker state. Malformed shapes reset state
//! rather than merge into it. Only the worker-status handler reports failures to its caller.

use crate::channel::{topics, ChannelError, ControlChannel};
use crate::exchange::ExchangeError;
use crate::message::Message;
use crate::observability::events;
use crate::runtime::{UserCache, WorkerContext};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

const COMPONENT: &str = "channel_handlers";

const STATUS_TYPE_FIELD: &str = "type";
const STATUS_REQUEST: &str = "request";
const STATUS_RESPONSE: &str = "response";
const REQUESTING_WORKER_FIELD: &str = "requesting_worker_id";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum UserMutation {
    Add,
    Alter,
    Drop,
}

pub(crate) async fn handle_control(
    control: ControlChannel,
    message: &Message,
    context: &dyn WorkerContext,
) {
    match control {
        ControlChannel::WorkerList => replace_workers(message, context),
        ControlChannel::Users => replace_users(message, context),
        ControlChannel::AddUser => mutate_user(UserMutation::Add, message, context).await,
        ControlChannel::AlterUser => mutate_user(UserMutation::Alter, message, context).await,
        ControlChannel::DropUser => mutate_user(UserMutation::Drop, message, context).await,
        ControlChannel::ClusterStatus => cluster_status(message, context).await,
    }
}

fn replace_workers(message: &Message, context: &dyn WorkerContext) {
    let workers: Vec<String> = message
        .payload_field("workers")
        .and_then(Value::as_array)
        .map(|workers| {
            workers
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    debug!(
        event = events::HANDLER_WORKERS_REPLACED,
        component = COMPONENT,
        worker_id = context.worker_id(),
        count = workers.len(),
        "worker list replaced"
    );
    context.set_workers(workers);
}

fn replace_users(message: &Message, context: &dyn WorkerContext) {
    match message.payload_field("users") {
        Some(Value::Object(users)) => {
            debug!(
                event = events::HANDLER_USERS_REPLACED,
                component = COMPONENT,
                worker_id = context.worker_id(),
                count = users.len(),
                "user cache replaced"
            );
            context.set_users(users.clone());
        }
        _ => {
            debug!(
                event = events::HANDLER_USERS_RESET,
                component = COMPONENT,
                worker_id = context.worker_id(),
                "user payload missing or not a mapping, resetting cache"
            );
            context.set_users(UserCache::new());
        }
    }
}

fn apply_user_mutation(
    cache: &mut UserCache,
    mutation: UserMutation,
    username: &str,
    user: &Map<String, Value>,
) {
    match mutation {
        UserMutation::Add => {
            if !cache.contains_key(username) {
                cache.insert(username.to_string(), Value::Object(user.clone()));
            }
        }
        UserMutation::Alter => {
            if let Some(Value::Object(existing)) = cache.get_mut(username) {
                for (field, value) in user {
                    existing.insert(field.clone(), value.clone());
                }
            }
        }
        UserMutation::Drop => {
            cache.remove(username);
        }
    }
}

async fn mutate_user(mutation: UserMutation, message: &Message, context: &dyn WorkerContext) {
    let user = message.payload_field("user").and_then(Value::as_object);
    let username = user
        .and_then(|user| user.get("username"))
        .and_then(Value::as_str);

    let (Some(user), Some(username)) = (user, username) else {
        warn!(
            event = events::HANDLER_USER_MUTATION_SKIPPED,
            component = COMPONENT,
            worker_id = context.worker_id(),
            mutation = ?mutation,
            "user mutation without user.username"
        );
        return;
    };

    let updated = context.update_users(&|cache: &mut UserCache| {
        apply_user_mutation(cache, mutation, username, user)
    });

    if let Err(err) = sync_users(&updated, context).await {
        warn!(
            event = events::HANDLER_USER_SYNC_FAILED,
            component = COMPONENT,
            worker_id = context.worker_id(),
            mutation = ?mutation,
            err = %err,
            "failed to persist user cache"
        );
    }
}

async fn sync_users(users: &UserCache, context: &dyn WorkerContext) -> Result<(), ExchangeError> {
    let users = Value::Object(users.clone());
    context
        .exchange()
        .set(topics::USERS_STORE_KEY, users.clone())
        .await?;
    context
        .exchange()
        .publish(topics::USERS, json!({ "users": users }))
        .await
}

/// The status body: `data` when it is an object, otherwise the top-level envelope keys.
fn status_payload(message: &Message) -> Value {
    if message.data.is_object() {
        message.data.clone()
    } else {
        Value::Object(message.extra.clone())
    }
}

async fn cluster_status(message: &Message, context: &dyn WorkerContext) {
    match message.payload_field(STATUS_TYPE_FIELD).and_then(Value::as_str) {
        Some(STATUS_REQUEST) => {
            let request = json!({
                "type": STATUS_REQUEST,
                "requesting_worker_id": context.worker_id(),
            });
            match context.exchange().publish(topics::WORKER_STATUS, request).await {
                Ok(()) => debug!(
                    event = events::HANDLER_STATUS_REQUEST_FORWARDED,
                    component = COMPONENT,
                    worker_id = context.worker_id(),
                    "cluster status request forwarded"
                ),
                Err(err) => warn!(
                    event = events::HANDLER_STATUS_FAILED,
                    component = COMPONENT,
                    worker_id = context.worker_id(),
                    err = %err,
                    "failed to forward cluster status request"
                ),
            }
        }
        Some(STATUS_RESPONSE) => match context
            .status_emitter()
            .emit_cluster_status(&status_payload(message))
        {
            Ok(()) => debug!(
                event = events::HANDLER_STATUS_RESPONSE_EMITTED,
                component = COMPONENT,
                worker_id = context.worker_id(),
                "cluster status response emitted"
            ),
            Err(err) => warn!(
                event = events::HANDLER_STATUS_FAILED,
                component = COMPONENT,
                worker_id = context.worker_id(),
                err = %err,
                "failed to emit cluster status"
            ),
        },
        _ => debug!(
            event = events::HANDLER_STATUS_FAILED,
            component = COMPONENT,
            worker_id = context.worker_id(),
            "cluster status message without a known type"
        ),
    }
}

/// Answers another worker's status request with this worker's connection snapshot.
pub(crate) async fn handle_worker_status(
    message: &Message,
    context: &dyn WorkerContext,
) -> Result<(), ChannelError> {
    if message.payload_field(STATUS_TYPE_FIELD).and_then(Value::as_str) != Some(STATUS_REQUEST) {
        return Ok(());
    }

    let requesting = message
        .payload_field(REQUESTING_WORKER_FIELD)
        .and_then(Value::as_str);
    let Some(requesting) = requesting.filter(|id| *id != context.worker_id()) else {
        debug!(
            event = events::HANDLER_STATUS_SELF_REQUEST_IGNORED,
            component = COMPONENT,
            worker_id = context.worker_id(),
            "ignoring status request from self or unknown worker"
        );
        return Ok(());
    };

    let connections =
        serde_json::to_value(context.connection_snapshot()).map_err(ChannelError::Encode)?;
    let response = json!({
        "type": STATUS_RESPONSE,
        "worker_id": context.worker_id(),
        "requesting_worker_id": requesting,
        "connections": connections,
    });

    context
        .exchange()
        .publish(topics::CLUSTER_STATUS, response)
        .await
        .map_err(ChannelError::Exchange)?;

    info!(
        event = events::HANDLER_STATUS_RESPONDED,
        component = COMPONENT,
        worker_id = context.worker_id(),
        requesting_worker_id = requesting,
        "answered worker status request"
    );
    Ok(())
}
