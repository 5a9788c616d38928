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

//! Origin x phase rule sets evaluated as a fail-fast chain.

use crate::command::collection::CommandCollectionError;
use crate::command::table::CommandTable;
use crate::command::{CommandId, CommandKind};
use crate::message::{Message, Origin, TransportPhase};
use crate::observability::events;
use crate::rules::{Rule, RuleArgs, RuleOutcome};
use crate::runtime::WorkerContext;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const COMPONENT: &str = "decision_matrix";

/// Worker rules for one channel, split by origin and transport phase.
#[derive(Default)]
pub struct DecisionMatrix {
    table: RwLock<CommandTable<dyn Rule>>,
}

impl DecisionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a table assembled synchronously, e.g. by the channel factory.
    pub fn with_table(table: CommandTable<dyn Rule>) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    pub async fn add_rule(
        &self,
        rule: Arc<dyn Rule>,
        origin: Origin,
        phase: TransportPhase,
    ) -> Result<(), CommandCollectionError> {
        self.table.write().await.add(rule, origin, phase)
    }

    pub async fn remove_rule(&self, id: &CommandId, origin: Origin, phase: TransportPhase) -> bool {
        self.table
            .write()
            .await
            .collection_mut(origin, phase)
            .remove(id)
    }

    pub async fn remove_rule_by_kind(
        &self,
        kind: CommandKind,
        origin: Origin,
        phase: TransportPhase,
    ) -> bool {
        self.table
            .write()
            .await
            .collection_mut(origin, phase)
            .remove_by_kind(kind)
    }

    pub async fn list_rules(&self, origin: Origin, phase: TransportPhase) -> Vec<Arc<dyn Rule>> {
        self.table.read().await.collection(origin, phase).list()
    }

    /// Runs the `(origin, phase)` rules in order and reports whether all of them passed.
    ///
    /// Evaluation stops at the first rule that returns `false` or fails; failures are logged
    /// and reported as `false`.
    pub async fn eval_rules(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
        origin: Origin,
        phase: TransportPhase,
    ) -> bool {
        self.eval_rules_detailed(message, args, context, origin, phase)
            .await
            .passed()
    }

    pub async fn eval_rules_detailed(
        &self,
        message: &mut Message,
        args: &RuleArgs,
        context: &dyn WorkerContext,
        origin: Origin,
        phase: TransportPhase,
    ) -> RuleOutcome {
        // Snapshot so that no lock is held while rules await I/O.
        let rules = self.list_rules(origin, phase).await;

        for rule in rules {
            match rule.evaluate(message, args, context).await {
                Ok(true) => {
                    debug!(
                        event = events::RULE_PASS,
                        component = COMPONENT,
                        channel = args.topic.as_str(),
                        origin = origin.as_str(),
                        phase = phase.as_str(),
                        rule_kind = rule.kind().as_str(),
                        "rule passed"
                    );
                }
                Ok(false) => {
                    debug!(
                        event = events::RULE_REJECT,
                        component = COMPONENT,
                        channel = args.topic.as_str(),
                        origin = origin.as_str(),
                        phase = phase.as_str(),
                        rule_kind = rule.kind().as_str(),
                        rule_id = %rule.id(),
                        "rule stopped message"
                    );
                    return RuleOutcome::Rejected {
                        kind: rule.kind(),
                        id: rule.id().clone(),
                    };
                }
                Err(error) => {
                    warn!(
                        event = events::RULE_ERROR,
                        component = COMPONENT,
                        channel = args.topic.as_str(),
                        origin = origin.as_str(),
                        phase = phase.as_str(),
                        rule_kind = rule.kind().as_str(),
                        rule_id = %rule.id(),
                        err = %error,
                        "rule failed"
                    );
                    return RuleOutcome::Errored {
                        kind: rule.kind(),
                        id: rule.id().clone(),
                        error,
                    };
                }
            }
        }

        debug!(
            event = events::RULES_PASS,
            component = COMPONENT,
            channel = args.topic.as_str(),
            origin = origin.as_str(),
            phase = phase.as_str(),
            "all rules passed"
        );
        RuleOutcome::Passed
    }
}
