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

//! Pipeliner for the `basic` program: translates objectives into flow rules, hands them to the
//! apply backend, and reports the outcome to the objective's context.

mod error;
mod filtering;
mod forwarding;
mod next;
mod translation;
mod translator;

pub use error::PipelinerError;
pub use filtering::FilteringObjectiveTranslator;
pub use forwarding::ForwardingObjectiveTranslator;
pub use next::NextObjectiveTranslator;
pub use translation::{ObjectiveTranslation, TranslationBuilder};
pub use translator::{ObjectiveTranslator, TranslatorBase};

use crate::capabilities::BasicCapabilities;
use crate::APP_NAME;
use crate::interpreter::{BasicInterpreter, PipelineInterpreter};
use crate::services::{ApplyBackend, BatchMode, GroupBackend, PortResolver};
use anyhow::{Context, Result};
use itertools::Itertools;
use pimodel::{
    ApplicationId, DeviceId, FilteringObjective, FlowRule, ForwardingObjective, NextObjective,
    Objective, ObjectiveError, ObjectiveInfo, Operation,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, trace};

/// Collaborators a pipeliner is bound to.
#[derive(Clone)]
pub struct PipelinerContext {
    pub apply_backend: Arc<dyn ApplyBackend>,
    pub group_backend: Arc<dyn GroupBackend>,
    pub port_resolver: Option<Arc<dyn PortResolver>>,
    /// Completion callbacks run on this runtime's workers.
    pub runtime: Handle,
}

pub struct BasicPipeliner {
    device_id: DeviceId,
    capabilities: Arc<BasicCapabilities>,
    interpreter: Arc<BasicInterpreter>,
    forwarding_translator: ForwardingObjectiveTranslator,
    filtering_translator: FilteringObjectiveTranslator,
    next_translator: NextObjectiveTranslator,
    apply_backend: Arc<dyn ApplyBackend>,
    group_backend: Arc<dyn GroupBackend>,
    runtime: Handle,
}

impl BasicPipeliner {
    pub fn init(device_id: DeviceId, capabilities: Arc<BasicCapabilities>,
                context: PipelinerContext) -> Self {
        let interpreter = Arc::new(BasicInterpreter::new(capabilities.clone(),
                                                         context.port_resolver));
        let base = TranslatorBase::new(device_id.clone(),
                                       interpreter.clone() as Arc<dyn PipelineInterpreter>);
        debug!("{}: {} pipeliner initialized for {}", device_id, APP_NAME,
               capabilities.descriptor().id);
        BasicPipeliner {
            device_id,
            capabilities,
            interpreter,
            forwarding_translator: ForwardingObjectiveTranslator::new(base),
            filtering_translator: FilteringObjectiveTranslator,
            next_translator: NextObjectiveTranslator,
            apply_backend: context.apply_backend,
            group_backend: context.group_backend,
            runtime: context.runtime,
        }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn capabilities(&self) -> &BasicCapabilities {
        &self.capabilities
    }

    /// The interpreter for this device, e.g. for packet-in and packet-out.
    pub fn interpreter(&self) -> &BasicInterpreter {
        &self.interpreter
    }

    /// Translates and applies `objective`.  Returns immediately; the outcome is reported
    /// through the objective's context, from a runtime worker.
    pub fn apply(&self, objective: Objective) {
        let result = match &objective {
            Objective::Forwarding(obj) => self.forwarding_translator.translate(obj),
            Objective::Filtering(obj) => self.filtering_translator.translate(obj),
            Objective::Next(obj) => self.next_translator.translate(obj),
        };
        self.handle_result(objective, result);
    }

    pub fn forward(&self, obj: ForwardingObjective) {
        self.apply(obj.into());
    }

    pub fn filter(&self, obj: FilteringObjective) {
        self.apply(obj.into());
    }

    pub fn next(&self, obj: NextObjective) {
        self.apply(obj.into());
    }

    /// Removes the flow rules and groups that `app_id` owns on this device.
    ///
    /// Entries that only an external objective store knows about are not purged.
    pub fn purge_all(&self, app_id: &ApplicationId) -> Result<()> {
        self.apply_backend.purge_by_owner(&self.device_id, app_id)
            .with_context(|| format!("{}: purging flow rules of {}", self.device_id, app_id))?;
        self.group_backend.purge_by_owner(&self.device_id, app_id)
            .with_context(|| format!("{}: purging groups of {}", self.device_id, app_id))?;
        // TODO: purge the objective store too, once it can be queried by application and device.
        Ok(())
    }

    fn handle_result(&self, objective: Objective, result: ObjectiveTranslation) {
        match result {
            ObjectiveTranslation::Error(e) => self.fail(objective, e),
            ObjectiveTranslation::FlowRules(flow_rules) => {
                match self.process_flows(&objective, flow_rules) {
                    Ok(()) => self.success(objective),
                    Err(e) => {
                        error!("{}: unable to apply {} objective: {:#}",
                               self.device_id, objective.kind(), e);
                        self.fail(objective, ObjectiveError::FlowInstallationFailed);
                    }
                }
            }
        }
    }

    fn process_flows(&self, objective: &Objective, flow_rules: Vec<FlowRule>) -> Result<()> {
        if flow_rules.is_empty() {
            return Ok(());
        }

        trace!("Objective {:?} -> Flows [{}]", objective, flow_rules.iter().join(", "));

        let mode = match objective.op() {
            Operation::Add | Operation::AddToExisting | Operation::Modify => BatchMode::Apply,
            Operation::Remove | Operation::RemoveFromExisting => BatchMode::Withdraw,
        };
        self.apply_backend.submit_batch(&self.device_id, flow_rules, mode)
    }

    fn fail(&self, objective: Objective, error: ObjectiveError) {
        if let Some(context) = objective.context().cloned() {
            self.runtime.spawn(async move { context.0.on_error(&objective, error) });
        }
    }

    fn success(&self, objective: Objective) {
        if let Some(context) = objective.context().cloned() {
            self.runtime.spawn(async move { context.0.on_success(&objective) });
        }
    }
}
