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

use super::error::PipelinerError;
use super::translation::ObjectiveTranslation;
use crate::interpreter::PipelineInterpreter;
use crate::p4info::PIPELINE_MODEL;
use pimodel::{
    ActionMismatch, DeviceId, FlowRule, ObjectiveInfo, PiAction, PiTableId, TrafficSelector,
    TrafficTreatment,
};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{trace, warn};

/// Translates one kind of objective into flow rules.
pub trait ObjectiveTranslator {
    type Objective: ObjectiveInfo + Debug;

    /// Name of the objective kind, for diagnostics.
    const KIND: &'static str;

    fn do_translate(&self, objective: &Self::Objective)
                    -> Result<ObjectiveTranslation, PipelinerError>;

    /// Translates `objective`.  Failures are logged and turned into an error translation; they
    /// never escape.
    fn translate(&self, objective: &Self::Objective) -> ObjectiveTranslation {
        match self.do_translate(objective) {
            Ok(translation) => translation,
            Err(e) => {
                warn!("Cannot translate {} objective: {} [{:?}]", Self::KIND, e, objective);
                ObjectiveTranslation::of_error(e.objective_error())
            }
        }
    }
}

/// What every translator needs: the device it translates for and the interpreter for the
/// device's pipeline.
#[derive(Clone)]
pub struct TranslatorBase {
    device_id: DeviceId,
    interpreter: Arc<dyn PipelineInterpreter>,
}

impl TranslatorBase {
    pub fn new(device_id: DeviceId, interpreter: Arc<dyn PipelineInterpreter>) -> Self {
        TranslatorBase { device_id, interpreter }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// A permanent flow rule for `table` owned by the objective's application, at the
    /// objective's priority.
    pub fn flow_rule<O: ObjectiveInfo + Debug>(&self, objective: &O, table: PiTableId,
                                               selector: TrafficSelector,
                                               treatment: &TrafficTreatment)
                                               -> Result<FlowRule, PipelinerError> {
        let action = self.map_treatment_to_pi_if_needed(treatment, &table)?;
        check_entry_action(&table, &action)?;
        let flow_rule = FlowRule {
            device_id: self.device_id.clone(),
            table_id: table,
            selector,
            action,
            priority: objective.priority(),
            app_id: objective.app_id().clone(),
            permanent: true,
        };
        trace!("Objective {:?} -> Flow {}", objective, flow_rule);
        Ok(flow_rule)
    }

    // A treatment that is already a PI action passes through.
    fn map_treatment_to_pi_if_needed(&self, treatment: &TrafficTreatment, table: &PiTableId)
                                     -> Result<PiAction, PipelinerError> {
        if let Some(action) = treatment.as_pi_action() {
            return Ok(action.clone());
        }
        self.interpreter.map_treatment(treatment, table)
            .map_err(|source| PipelinerError::Treatment { table: table.clone(), source })
    }
}

fn check_entry_action(table: &PiTableId, action: &PiAction) -> Result<(), PipelinerError> {
    let model = PIPELINE_MODEL.table(table)
        .ok_or_else(|| PipelinerError::UnknownTable(table.clone()))?;
    model.check_entry_action(action).map_err(|mismatch| match mismatch {
        ActionMismatch::UnknownAction(action) => {
            PipelinerError::ActionNotInTable { table: table.clone(), action }
        }
        ActionMismatch::UnknownParam(param) => PipelinerError::UndeclaredParam {
            table: table.clone(),
            action: action.id.clone(),
            param,
        },
    })
}
