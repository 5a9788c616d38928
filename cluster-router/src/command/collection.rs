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

//! Priority-bucketed, insertion-stable command sequence.

use crate::command::{Command, CommandId, CommandKind, RuleOrder};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Construction-time failures when registering a command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandCollectionError {
    DuplicateFirst { existing: CommandKind },
    DuplicateLast { existing: CommandKind },
}

impl Display for CommandCollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandCollectionError::DuplicateFirst { existing } => {
                write!(f, "a FIRST command is already registered ({existing})")
            }
            CommandCollectionError::DuplicateLast { existing } => {
                write!(f, "a LAST command is already registered ({existing})")
            }
        }
    }
}

impl Error for CommandCollectionError {}

/// Commands kept sorted by [`RuleOrder`], FIFO within a bucket.
///
/// The backing `Vec` stays sorted, so the insertion point is the first command whose order is
/// strictly greater than the new one.
pub struct CommandCollection<T: ?Sized + Command> {
    commands: Vec<Arc<T>>,
}

impl<T: ?Sized + Command> Default for CommandCollection<T> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<T: ?Sized + Command> Debug for CommandCollection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.commands
                    .iter()
                    .map(|command| (command.order(), command.kind())),
            )
            .finish()
    }
}

impl<T: ?Sized + Command> CommandCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts after the last command whose order is `<=` the new command's order.
    pub fn add(&mut self, command: Arc<T>) -> Result<(), CommandCollectionError> {
        let order = command.order();

        if order.is_singleton() {
            if let Some(existing) = self.commands.iter().find(|c| c.order() == order) {
                let existing = existing.kind();
                return Err(match order {
                    RuleOrder::First => CommandCollectionError::DuplicateFirst { existing },
                    _ => CommandCollectionError::DuplicateLast { existing },
                });
            }
        }

        let position = self
            .commands
            .partition_point(|existing| existing.order() <= order);
        self.commands.insert(position, command);
        Ok(())
    }

    /// Removes the first command with a matching id. Returns `true` when one was removed.
    pub fn remove(&mut self, id: &CommandId) -> bool {
        self.remove_first_matching(|command| command.id() == id)
    }

    /// Removes the first command with a matching kind tag.
    pub fn remove_by_kind(&mut self, kind: CommandKind) -> bool {
        self.remove_first_matching(|command| command.kind() == kind)
    }

    fn remove_first_matching(&mut self, predicate: impl Fn(&T) -> bool) -> bool {
        match self.commands.iter().position(|command| predicate(command)) {
            Some(position) => {
                self.commands.remove(position);
                true
            }
            None => false,
        }
    }

    /// Commands in evaluation order. Each call returns a fresh sequence.
    pub fn list(&self) -> Vec<Arc<T>> {
        self.commands.clone()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
