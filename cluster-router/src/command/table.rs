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

//! Origin x phase table of command collections.

use crate::command::collection::{CommandCollection, CommandCollectionError};
use crate::command::Command;
use crate::message::{Origin, TransportPhase};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type PhaseCollections<T> = [CommandCollection<T>; TransportPhase::COUNT];

/// One collection per `(origin, phase)` pair, all present from construction.
pub struct CommandTable<T: ?Sized + Command> {
    core: PhaseCollections<T>,
    cluster: PhaseCollections<T>,
}

impl<T: ?Sized + Command> Default for CommandTable<T> {
    fn default() -> Self {
        Self {
            core: std::array::from_fn(|_| CommandCollection::new()),
            cluster: std::array::from_fn(|_| CommandCollection::new()),
        }
    }
}

impl<T: ?Sized + Command> Debug for CommandTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for origin in [Origin::Core, Origin::Cluster] {
            for phase in TransportPhase::ALL {
                let collection = self.collection(origin, phase);
                if !collection.is_empty() {
                    map.entry(&format_args!("{origin}/{phase}"), collection);
                }
            }
        }
        map.finish()
    }
}

impl<T: ?Sized + Command> CommandTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self, origin: Origin, phase: TransportPhase) -> &CommandCollection<T> {
        let phases = match origin {
            Origin::Core => &self.core,
            Origin::Cluster => &self.cluster,
        };
        &phases[phase.index()]
    }

    pub fn collection_mut(
        &mut self,
        origin: Origin,
        phase: TransportPhase,
    ) -> &mut CommandCollection<T> {
        let phases = match origin {
            Origin::Core => &mut self.core,
            Origin::Cluster => &mut self.cluster,
        };
        &mut phases[phase.index()]
    }

    pub fn add(
        &mut self,
        command: Arc<T>,
        origin: Origin,
        phase: TransportPhase,
    ) -> Result<(), CommandCollectionError> {
        self.collection_mut(origin, phase).add(command)
    }
}
