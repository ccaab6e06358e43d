/*
Copyright (c) 2022 VMware, Inc.
SPDX-License-Identifier: MIT
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Maps device-independent treatments onto actions of the `basic` program's tables.

use crate::interpreter::InterpreterError;
use crate::p4info::{
    BASIC_INGRESS_TABLE0_DROP, BASIC_INGRESS_TABLE0_SET_EGRESS_PORT,
    BASIC_INGRESS_TABLE0_TABLE0, PORT_BITWIDTH, PORT_NUM,
};
use lazy_static::lazy_static;
use pimodel::{ByteSequence, Instruction, PiAction, PiActionId, PiTableId, PortNumber, TrafficTreatment};
use std::collections::HashMap;

/// Which action, per table, implements each kind of treatment.
#[derive(Clone, Debug, Default)]
pub(crate) struct ActionMaps {
    set_output: HashMap<PiTableId, PiActionId>,
    drop: HashMap<PiTableId, PiActionId>,
}

impl ActionMaps {
    fn basic() -> Self {
        ActionMaps {
            set_output: HashMap::from([
                (BASIC_INGRESS_TABLE0_TABLE0, BASIC_INGRESS_TABLE0_SET_EGRESS_PORT),
            ]),
            drop: HashMap::from([(BASIC_INGRESS_TABLE0_TABLE0, BASIC_INGRESS_TABLE0_DROP)]),
        }
    }

    fn map_treatment(&self, treatment: &TrafficTreatment, table: &PiTableId)
                     -> Result<PiAction, InterpreterError> {
        if table != &BASIC_INGRESS_TABLE0_TABLE0 {
            return Err(InterpreterError::UnsupportedTable(table.clone()));
        }

        if treatment.instructions().is_empty() && treatment.cleared_deferred() {
            self.drop_action(table)
        } else if let Some(Instruction::Output(port)) = treatment.instructions().first() {
            self.set_output_action(table, port)
        } else {
            Err(InterpreterError::UnsupportedTreatment {
                table: Some(table.clone()),
                treatment: treatment.clone(),
            })
        }
    }

    fn drop_action(&self, table: &PiTableId) -> Result<PiAction, InterpreterError> {
        let id = self.drop.get(table).ok_or_else(|| InterpreterError::MissingAction {
            table: table.clone(),
            kind: "drop",
        })?;
        Ok(PiAction::new(id.clone()))
    }

    fn set_output_action(&self, table: &PiTableId, port: &PortNumber) -> Result<PiAction, InterpreterError> {
        let id = self.set_output.get(table).ok_or_else(|| InterpreterError::MissingAction {
            table: table.clone(),
            kind: "set output",
        })?;
        Ok(PiAction::new(id.clone()).with_param(PORT_NUM, fit_port(port.to_u64())?))
    }
}

lazy_static! {
    static ref ACTION_MAPS: ActionMaps = ActionMaps::basic();
}

/// Encodes `port` as a value of the 32-bit port fields the `basic` program uses.
pub(crate) fn fit_port(port: u64) -> Result<ByteSequence, InterpreterError> {
    ByteSequence::from_u64(port)
        .fit(PORT_BITWIDTH)
        .map_err(|source| InterpreterError::PortTooWide { port, source })
}

/// Maps `treatment` to the action that implements it in `table`.
///
/// Only `table0` is supported.  A cleared treatment with no instructions becomes `drop`, and a
/// treatment whose first instruction is an output becomes `set_egress_port`.  Anything else is
/// an [`InterpreterError::UnsupportedTreatment`].
pub fn map_treatment(treatment: &TrafficTreatment, table: &PiTableId)
                     -> Result<PiAction, InterpreterError> {
    ACTION_MAPS.map_treatment(treatment, table)
}
