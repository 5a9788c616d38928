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

//! Command layer.
//!
//! Shared identity and priority model for worker rules and transport middleware, the
//! priority-bucketed [`CommandCollection`] and the origin x phase [`CommandTable`].
//!
//! ```
//! use std::sync::Arc;
//! use cluster_router::{Command, CommandCollection, CommandDescriptor, CommandKind, RuleOrder};
//!
//! struct Step(CommandDescriptor);
//!
//! impl Command for Step {
//!     fn descriptor(&self) -> &CommandDescriptor {
//!         &self.0
//!     }
//! }
//!
//! let mut collection: CommandCollection<Step> = CommandCollection::new();
//! collection
//!     .add(Arc::new(Step(CommandDescriptor::new(CommandKind::Custom("low"), RuleOrder::Low))))
//!     .unwrap();
//! collection
//!     .add(Arc::new(Step(CommandDescriptor::new(CommandKind::Custom("high"), RuleOrder::High))))
//!     .unwrap();
//!
//! let kinds: Vec<_> = collection.list().iter().map(|step| step.kind()).collect();
//! assert_eq!(kinds, vec![CommandKind::Custom("high"), CommandKind::Custom("low")]);
//! ```

pub(crate) mod collection;
pub(crate) mod table;

use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Priority bucket. Evaluation runs `First` to `Last`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RuleOrder {
    First,
    High,
    Mid,
    Low,
    Last,
}

impl RuleOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOrder::First => "first",
            RuleOrder::High => "high",
            RuleOrder::Mid => "mid",
            RuleOrder::Low => "low",
            RuleOrder::Last => "last",
        }
    }

    /// `First` and `Last` admit a single command per collection.
    pub fn is_singleton(&self) -> bool {
        matches!(self, RuleOrder::First | RuleOrder::Last)
    }
}

impl Display for RuleOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque command identity, generated at construction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CommandId(Uuid);

impl CommandId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for CommandId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Declared kind tag, used for removal by kind and for logs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CommandKind {
    RefreshWorkerList,
    AssignToWorker,
    WriteToTransactionLog,
    PostToExchange,
    CleanEnvelope,
    StripInternalHeader,
    DispatchToChannelHandler,
    RequestDataValid,
    OriginatorCheck,
    Custom(&'static str),
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::RefreshWorkerList => "refresh_worker_list",
            CommandKind::AssignToWorker => "assign_to_worker",
            CommandKind::WriteToTransactionLog => "write_to_transaction_log",
            CommandKind::PostToExchange => "post_to_exchange",
            CommandKind::CleanEnvelope => "clean_envelope",
            CommandKind::StripInternalHeader => "strip_internal_header",
            CommandKind::DispatchToChannelHandler => "dispatch_to_channel_handler",
            CommandKind::RequestDataValid => "request_data_valid",
            CommandKind::OriginatorCheck => "originator_check",
            CommandKind::Custom(name) => *name,
        }
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity, kind and priority shared by every command.
#[derive(Clone, Debug)]
pub struct CommandDescriptor {
    id: CommandId,
    kind: CommandKind,
    order: RuleOrder,
}

impl CommandDescriptor {
    pub fn new(kind: CommandKind, order: RuleOrder) -> Self {
        Self {
            id: CommandId::generate(),
            kind,
            order,
        }
    }
}

/// Anything that can sit in a [`CommandCollection`].
pub trait Command: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    fn id(&self) -> &CommandId {
        &self.descriptor().id
    }

    fn kind(&self) -> CommandKind {
        self.descriptor().kind
    }

    fn order(&self) -> RuleOrder {
        self.descriptor().order
    }
}

#[cfg(test)]
pub(crate) mod test_command {
    use super::{Command, CommandDescriptor, CommandKind, RuleOrder};

    pub(crate) struct TestCommand {
        descriptor: CommandDescriptor,
        pub(crate) label: &'static str,
    }

    impl TestCommand {
        pub(crate) fn new(label: &'static str, order: RuleOrder) -> Self {
            Self {
                descriptor: CommandDescriptor::new(CommandKind::Custom(label), order),
                label,
            }
        }
    }

    impl Command for TestCommand {
        fn descriptor(&self) -> &CommandDescriptor {
            &self.descriptor
        }
    }
}
