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
    decode_line, InboundOutcome, InternalHeader, Message, Origin, OutboundOutcome,
    TransactionOperation, TransportPhase, WorkerContext,
};
use integration_test_utils::{
    core_message, transacted_cluster_insert, untransacted_cluster_insert,
};
use serde_json::json;
use support::make_fixture;

#[tokio::test(flavor = "multi_thread")]
async fn untransacted_cluster_insert_is_handed_to_the_only_worker_and_swallowed() {
    let fixture = make_fixture("w1", &["w1"]).await;

    let outcome = fixture
        .runtime
        .on_inbound(
            untransacted_cluster_insert("dev:dog", json!([{ "id": 9 }])),
            TransportPhase::PublishIn,
        )
        .await
        .expect("routing should not fail");

    assert!(matches!(outcome, InboundOutcome::RejectedByRules));

    let handed_off = fixture.exchange.published_to("w1").await;
    assert_eq!(handed_off.len(), 1);
    assert_eq!(handed_off[0]["channel"], "dev:dog");
    assert_eq!(handed_off[0]["data"]["schema"], "dev");
    assert_eq!(handed_off[0]["data"]["table"], "dog");
    assert_eq!(
        handed_off[0]["data"]["transaction"]["records"],
        json!([{ "id": 9 }])
    );
    assert_eq!(fixture.exchange.publish_count().await, 1);
    assert_eq!(fixture.logs.total_lines().await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn transacted_cluster_insert_is_logged_and_published() {
    let fixture = make_fixture("w1", &["w1"]).await;

    let outcome = fixture
        .runtime
        .on_inbound(
            transacted_cluster_insert("dev:dog", json!([{ "id": 9 }])),
            TransportPhase::PublishIn,
        )
        .await
        .expect("routing should not fail");

    let InboundOutcome::Accepted(message) = outcome else {
        panic!("transacted message should pass every rule, got {outcome:?}");
    };
    assert!(!message.transacted);
    assert!(message.internal_header.is_none());

    assert!(fixture.exchange.published_to("w1").await.is_empty());

    let lines = fixture.logs.lines("dev:dog").await;
    assert_eq!(lines.len(), 1);
    let line = decode_line(&lines[0]).expect("log line should decode");
    assert_eq!(line.operation, TransactionOperation::Insert);
    assert_eq!(line.payload, json!([{ "id": 9 }]));

    assert_eq!(
        fixture.exchange.published_to("dev:dog").await,
        vec![json!({ "transaction": { "operation": "insert", "records": [{ "id": 9 }] } })]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn cluster_insert_without_registered_workers_is_dropped() {
    let fixture = make_fixture("w1", &[]).await;

    let outcome = fixture
        .runtime
        .on_inbound(
            untransacted_cluster_insert("dev:dog", json!([{ "id": 1 }])),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, InboundOutcome::RejectedByRules));
    assert_eq!(fixture.exchange.publish_count().await, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn worker_is_chosen_among_the_refreshed_registry() {
    let fixture = make_fixture("w1", &["w2", "w3"]).await;
    fixture.runtime.set_workers(vec!["stale".to_string()]);

    for _ in 0..16 {
        fixture
            .runtime
            .on_inbound(
                untransacted_cluster_insert("dev:dog", json!([{ "id": 1 }])),
                TransportPhase::PublishIn,
            )
            .await
            .unwrap();
    }

    assert_eq!(*fixture.runtime.workers(), vec!["w2", "w3"]);
    let chosen: Vec<String> = fixture
        .exchange
        .published()
        .await
        .into_iter()
        .map(|(channel, _)| channel)
        .collect();
    assert_eq!(chosen.len(), 16);
    assert!(chosen.iter().all(|worker| worker == "w2" || worker == "w3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn core_message_strips_local_fields_before_publication() {
    let fixture = make_fixture("w1", &["w1"]).await;

    let mut message = core_message(
        "dev:dog",
        json!({ "__id": "corr-1", "hdb_header": { "trace": "x" }, "id": 2 }),
    );
    message.internal_header = Some(InternalHeader::stamped_by(
        "w1",
        message.internal_header.as_ref(),
    ));

    let outcome = fixture
        .runtime
        .on_inbound(message, TransportPhase::PublishIn)
        .await
        .unwrap();

    assert!(matches!(outcome, InboundOutcome::Accepted(_)));
    assert_eq!(
        fixture.exchange.published_to("dev:dog").await,
        vec![json!({ "id": 2 })]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn log_failure_stops_publication() {
    let fixture = make_fixture("w1", &["w1"]).await;
    fixture.logs.fail_writes(true);

    let outcome = fixture
        .runtime
        .on_inbound(
            transacted_cluster_insert("dev:dog", json!([{ "id": 3 }])),
            TransportPhase::PublishIn,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, InboundOutcome::RejectedByRules));
    assert!(fixture.exchange.published_to("dev:dog").await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn publish_to_room_then_outbound_check_round_trip() {
    let fixture = make_fixture("w1", &["w1"]).await;
    let mut header = InternalHeader::with_origin(Origin::Cluster);
    header.extra.insert("trace".to_string(), json!("t-9"));

    let published = fixture
        .runtime
        .publish_to_room(
            "dev:dog",
            Message {
                data: json!({ "id": 4 }),
                ..Default::default()
            },
            Some(&header),
        )
        .await
        .unwrap();

    let already_stamped = fixture
        .runtime
        .publish_to_room("dev:dog", published.clone(), None)
        .await
        .unwrap();
    assert_eq!(already_stamped.internal_header, published.internal_header);

    assert!(matches!(
        fixture.runtime.on_outbound(&published).await.unwrap(),
        OutboundOutcome::Suppressed { .. }
    ));

    let peer = make_fixture("w2", &["w1", "w2"]).await;
    assert_eq!(
        peer.runtime.on_outbound(&published).await.unwrap(),
        OutboundOutcome::Deliver
    );
}
