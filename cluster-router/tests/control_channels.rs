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

mod support;

use cluster_router::{
    topics, ConnectionInfo, ConnectionSnapshot, InboundOutcome, Message, Origin, TransportPhase,
    WorkerContext,
};
use integration_test_utils::{users_update, worker_list_update};
use serde_json::json;
use support::{make_fixture, make_fixture_with_snapshot};

#[tokio::test(flavor = "multi_thread")]
async fn users_channel_replaces_cache_and_resets_on_array() {
    let fixture = make_fixture("w1", &["w1"]).await;
    fixture.runtime.set_users(
        json!({ "carol": { "role": "reader" } })
            .as_object()
            .cloned()
            .unwrap(),
    );

    let outcome = fixture
        .runtime
        .on_inbound(
            users_update(
                Origin::Cluster,
                json!({ "alice": { "role": "admin" }, "bob": { "role": "reader" } }),
            ),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, InboundOutcome::Accepted(_)));

    let users = fixture.runtime.users();
    let mut names: Vec<&String> = users.keys().collect();
    names.sort();
    assert_eq!(names, vec!["alice", "bob"]);

    fixture
        .runtime
        .on_inbound(
            users_update(Origin::Cluster, json!([{ "alice": {} }])),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    assert!(fixture.runtime.users().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn control_payload_may_sit_at_the_top_level() {
    let fixture = make_fixture("w1", &["w1"]).await;
    let users: Message = serde_json::from_value(json!({
        "channel": topics::USERS,
        "users": { "alice": { "role": "admin" }, "bob": { "role": "reader" } },
        "hdb_header": { "data_source": "CLUSTER" }
    }))
    .unwrap();

    let outcome = fixture
        .runtime
        .on_inbound(users, TransportPhase::PublishIn)
        .await
        .unwrap();
    assert!(matches!(outcome, InboundOutcome::Accepted(_)));
    assert_eq!(fixture.runtime.users().len(), 2);
    assert_eq!(fixture.runtime.users()["alice"]["role"], "admin");

    let workers: Message = serde_json::from_value(json!({
        "channel": topics::WORKERS,
        "workers": ["w1", "w4"],
        "hdb_header": { "data_source": "CORE" }
    }))
    .unwrap();
    fixture
        .runtime
        .on_inbound(workers, TransportPhase::PublishIn)
        .await
        .unwrap();
    assert_eq!(*fixture.runtime.workers(), vec!["w1", "w4"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn worker_list_channel_replaces_the_list() {
    let fixture = make_fixture("w1", &["w1"]).await;

    fixture
        .runtime
        .on_inbound(
            worker_list_update(Origin::Core, &["w1", "w5"]),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    assert_eq!(*fixture.runtime.workers(), vec!["w1", "w5"]);

    fixture
        .runtime
        .on_inbound(
            Message::new(topics::WORKERS, json!({})).with_origin(Origin::Core),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    assert!(fixture.runtime.workers().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn add_user_is_persisted_and_republished() {
    let fixture = make_fixture("w1", &["w1"]).await;

    fixture
        .runtime
        .on_inbound(
            Message::new(
                topics::ADD_USER,
                json!({ "user": { "username": "dana", "role": "writer" } }),
            )
            .with_origin(Origin::Core),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();

    assert_eq!(fixture.runtime.users()["dana"]["role"], "writer");
    assert_eq!(
        fixture.exchange.stored(topics::USERS_STORE_KEY).await,
        Some(json!({ "dana": { "username": "dana", "role": "writer" } }))
    );
    let republished = fixture.exchange.published_to(topics::USERS).await;
    assert_eq!(republished.len(), 1);
    assert_eq!(republished[0]["users"]["dana"]["role"], "writer");
}

#[tokio::test(flavor = "multi_thread")]
async fn user_sync_failure_does_not_reject_the_message() {
    let fixture = make_fixture("w1", &["w1"]).await;
    fixture.exchange.fail_publish(true);

    let outcome = fixture
        .runtime
        .on_inbound(
            Message::new(topics::DROP_USER, json!({ "user": { "username": "dana" } }))
                .with_origin(Origin::Cluster),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, InboundOutcome::Accepted(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn cluster_status_round_trip_between_two_workers() {
    let snapshot = ConnectionSnapshot {
        inbound: vec![ConnectionInfo {
            node: "node-a".to_string(),
            subscriptions: vec!["dev:dog".to_string()],
        }],
        outbound: Vec::new(),
    };
    let requester = make_fixture("w1", &["w1", "w2"]).await;
    let responder = make_fixture_with_snapshot("w2", &["w1", "w2"], snapshot).await;

    requester
        .runtime
        .on_inbound(
            Message::new(topics::CLUSTER_STATUS, json!({ "type": "request" }))
                .with_origin(Origin::Core),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    let requests = requester.exchange.published_to(topics::WORKER_STATUS).await;
    assert_eq!(requests.len(), 1);

    // The requester ignores its own request.
    requester
        .runtime
        .on_inbound(
            Message::new(topics::WORKER_STATUS, requests[0].clone()).with_origin(Origin::Cluster),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    assert!(requester
        .exchange
        .published_to(topics::CLUSTER_STATUS)
        .await
        .is_empty());

    responder
        .runtime
        .on_inbound(
            Message::new(topics::WORKER_STATUS, requests[0].clone()).with_origin(Origin::Cluster),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    let responses = responder.exchange.published_to(topics::CLUSTER_STATUS).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["requesting_worker_id"], "w1");

    requester
        .runtime
        .on_inbound(
            Message::new(topics::CLUSTER_STATUS, responses[0].clone())
                .with_origin(Origin::Cluster),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();
    let emitted = requester.statuses.emitted();
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0]["worker_id"], "w2");
    assert_eq!(emitted[0]["connections"]["inbound"][0]["node"], "node-a");
}

#[tokio::test(flavor = "multi_thread")]
async fn worker_status_publish_failure_rejects_the_message() {
    let fixture = make_fixture("w1", &["w1"]).await;
    fixture.exchange.fail_publish(true);

    let outcome = fixture
        .runtime
        .on_inbound(
            Message::new(
                topics::WORKER_STATUS,
                json!({ "type": "request", "requesting_worker_id": "w9" }),
            )
            .with_origin(Origin::Cluster),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, InboundOutcome::RejectedByRules));
}
