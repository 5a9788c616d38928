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

use cluster_router::{RuntimeError, StatusEmitter};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingStatusEmitter {
    emitted: Mutex<Vec<Value>>,
}

impl RecordingStatusEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<Value> {
        match self.emitted.lock() {
            Ok(emitted) => emitted.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StatusEmitter for RecordingStatusEmitter {
    fn emit_cluster_status(&self, status: &Value) -> Result<(), RuntimeError> {
        self.emitted
            .lock()
            .map_err(|err| RuntimeError::StatusEmit {
                reason: err.to_string(),
            })?
            .push(status.clone());
        Ok(())
    }
}
