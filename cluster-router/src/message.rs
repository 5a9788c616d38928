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

//! Message envelope routed through channels, plus the origin and phase axes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Key under which the internal header travels, both on the envelope and inside payloads.
pub const INTERNAL_HEADER_KEY: &str = "hdb_header";

const TRANSACTION_KEY: &str = "transaction";

/// Where a message entered this process from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Origin {
    /// The local database engine.
    Core,
    /// A remote cluster peer.
    Cluster,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Core => "CORE",
            Origin::Cluster => "CLUSTER",
        }
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport phase a rule or middleware is attached to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportPhase {
    Handshake,
    Subscribe,
    Authenticate,
    PublishIn,
    PublishOut,
    Emit,
}

impl TransportPhase {
    pub const ALL: [TransportPhase; 6] = [
        TransportPhase::Handshake,
        TransportPhase::Subscribe,
        TransportPhase::Authenticate,
        TransportPhase::PublishIn,
        TransportPhase::PublishOut,
        TransportPhase::Emit,
    ];

    pub(crate) const COUNT: usize = Self::ALL.len();

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportPhase::Handshake => "handshake",
            TransportPhase::Subscribe => "subscribe",
            TransportPhase::Authenticate => "authenticate",
            TransportPhase::PublishIn => "publish_in",
            TransportPhase::PublishOut => "publish_out",
            TransportPhase::Emit => "emit",
        }
    }
}

impl Display for TransportPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport bookkeeping stamped on a message. Never delivered outside the cluster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_originator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<Origin>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InternalHeader {
    pub fn with_origin(origin: Origin) -> Self {
        Self {
            data_source: Some(origin),
            ..Default::default()
        }
    }

    /// Builds a header owned by `worker_id`, carrying over every other field of `existing`.
    pub fn stamped_by(worker_id: &str, existing: Option<&InternalHeader>) -> Self {
        let mut header = existing.cloned().unwrap_or_default();
        header.worker_originator_id = Some(worker_id.to_string());
        header
    }
}

/// Mutation kinds that may be durably logged.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TransactionOperation {
    Insert,
    Update,
    Delete,
}

impl TransactionOperation {
    pub fn parse(operation: &str) -> Option<Self> {
        match operation {
            "insert" => Some(TransactionOperation::Insert),
            "update" => Some(TransactionOperation::Update),
            "delete" => Some(TransactionOperation::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionOperation::Insert => "insert",
            TransactionOperation::Update => "update",
            TransactionOperation::Delete => "delete",
        }
    }

    /// Transaction field holding the logged payload for this operation.
    pub fn payload_field(&self) -> &'static str {
        match self {
            TransactionOperation::Insert | TransactionOperation::Update => "records",
            TransactionOperation::Delete => "hash_values",
        }
    }
}

impl Display for TransactionOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit routed through the system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(
        default,
        rename = "hdb_header",
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_header: Option<InternalHeader>,
    #[serde(default)]
    pub transacted: bool,
    /// Top-level envelope keys other than the ones above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(channel: impl Into<String>, data: Value) -> Self {
        Self {
            channel: Some(channel.into()),
            data,
            internal_header: None,
            transacted: false,
            extra: Map::new(),
        }
    }

    /// Stamps the data-source tag, creating the header when absent.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.internal_header
            .get_or_insert_with(InternalHeader::default)
            .data_source = Some(origin);
        self
    }

    pub fn with_transacted(mut self, transacted: bool) -> Self {
        self.transacted = transacted;
        self
    }

    pub fn origin(&self) -> Option<Origin> {
        self.internal_header
            .as_ref()
            .and_then(|header| header.data_source)
    }

    pub fn worker_originator_id(&self) -> Option<&str> {
        self.internal_header
            .as_ref()
            .and_then(|header| header.worker_originator_id.as_deref())
    }

    /// Looks `key` up in `data` first, then among the top-level envelope keys.
    pub fn payload_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key).or_else(|| self.extra.get(key))
    }

    pub fn transaction(&self) -> Option<&Value> {
        self.data.get(TRANSACTION_KEY)
    }

    /// Returns the embedded operation when it is one of the loggable kinds.
    pub fn transaction_operation(&self) -> Option<TransactionOperation> {
        self.transaction()
            .and_then(|transaction| transaction.get("operation"))
            .and_then(Value::as_str)
            .and_then(TransactionOperation::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::{InternalHeader, Message, Origin, TransactionOperation, TransportPhase};
    use serde_json::json;

    #[test]
    fn message_serde_uses_wire_field_names() {
        let message = Message::new("dev:dog", json!({ "id": 1 }))
            .with_origin(Origin::Cluster)
            .with_transacted(true);

        let value = serde_json::to_value(&message).expect("message should serialize");

        assert_eq!(value["channel"], "dev:dog");
        assert_eq!(value["hdb_header"]["data_source"], "CLUSTER");
        assert_eq!(value["transacted"], true);

        let decoded: Message = serde_json::from_value(value).expect("message should decode");
        assert_eq!(decoded, message);
    }

    #[test]
    fn missing_fields_default_to_untransacted_without_origin() {
        let message: Message =
            serde_json::from_value(json!({ "channel": "dev:dog" })).expect("should decode");

        assert!(!message.transacted);
        assert!(message.origin().is_none());
        assert!(message.data.is_null());
    }

    #[test]
    fn top_level_payload_keys_survive_decoding() {
        let message: Message = serde_json::from_value(json!({
            "channel": "internal:users",
            "users": { "alice": {} },
            "hdb_header": { "data_source": "CLUSTER" }
        }))
        .expect("should decode");

        assert!(message.data.is_null());
        assert_eq!(message.extra["users"], json!({ "alice": {} }));
        assert_eq!(message.payload_field("users"), Some(&json!({ "alice": {} })));
        assert_eq!(message.origin(), Some(Origin::Cluster));

        let value = serde_json::to_value(&message).expect("message should serialize");
        assert_eq!(value["users"], json!({ "alice": {} }));
    }

    #[test]
    fn data_wins_over_top_level_keys() {
        let mut message = Message::new("internal:users", json!({ "users": { "bob": {} } }));
        message.extra.insert("users".to_string(), json!({ "alice": {} }));

        assert_eq!(message.payload_field("users"), Some(&json!({ "bob": {} })));
        assert_eq!(message.payload_field("workers"), None);
    }

    #[test]
    fn stamped_by_keeps_extra_fields_and_takes_worker_identity() {
        let mut existing = InternalHeader::with_origin(Origin::Core);
        existing.extra.insert("trace".to_string(), json!("abc"));

        let header = InternalHeader::stamped_by("w7", Some(&existing));

        assert_eq!(header.worker_originator_id.as_deref(), Some("w7"));
        assert_eq!(header.data_source, Some(Origin::Core));
        assert_eq!(header.extra["trace"], "abc");
    }

    #[test]
    fn transaction_operation_reads_embedded_transaction() {
        let message = Message::new(
            "dev:dog",
            json!({ "transaction": { "operation": "delete", "hash_values": [1] } }),
        );
        assert_eq!(
            message.transaction_operation(),
            Some(TransactionOperation::Delete)
        );

        let unknown = Message::new("dev:dog", json!({ "transaction": { "operation": "upsert" } }));
        assert_eq!(unknown.transaction_operation(), None);
    }

    #[test]
    fn phase_indexes_are_dense() {
        for (position, phase) in TransportPhase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), position);
        }
    }
}
