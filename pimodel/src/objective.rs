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

//! Flow objectives: device-independent requests to install or remove forwarding behavior.
//!
//! An objective says what the application wants.  It is up to a pipeline-specific pipeliner to
//! turn it into table entries, and to tell the application, through the objective's
//! [`ObjectiveContext`], whether that worked.

use crate::flow::{Criterion, TrafficSelector, TrafficTreatment};
use std::fmt::{self, Display};
use std::sync::Arc;

/// The application that owns an objective and the table entries derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationId {
    pub id: u16,
    pub name: String,
}

impl ApplicationId {
    pub fn new<S: Into<String>>(id: u16, name: S) -> Self {
        ApplicationId { id, name: name.into() }
    }
}

impl Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.name)
    }
}

/// What the application wants done with the objective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    AddToExisting,
    Modify,
    Remove,
    RemoveFromExisting,
}

/// Why an objective could not be carried out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectiveError {
    /// The pipeline can't express what the objective asks for.
    Unsupported,
    /// The objective names something the pipeline doesn't have.
    BadParams,
    /// The table entries could not be handed to the device.
    FlowInstallationFailed,
    /// Something went wrong that isn't the caller's fault.
    Unknown,
}

impl Display for ObjectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectiveError::Unsupported => "UNSUPPORTED",
            ObjectiveError::BadParams => "BADPARAMS",
            ObjectiveError::FlowInstallationFailed => "FLOWINSTALLATIONFAILED",
            ObjectiveError::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Receives the outcome of an objective.
///
/// Pipeliners invoke these from a worker pool, never from the thread that submitted the
/// objective, and with no ordering guarantee relative to anything the submitter does next.
pub trait ObjectiveContext: Send + Sync {
    fn on_success(&self, objective: &Objective);
    fn on_error(&self, objective: &Objective, error: ObjectiveError);
}

/// Shared handle to an [`ObjectiveContext`].
#[derive(Clone)]
pub struct ContextHandle(pub Arc<dyn ObjectiveContext>);

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextHandle")
    }
}

/// Properties common to every kind of objective.
pub trait ObjectiveInfo {
    fn priority(&self) -> i32;
    fn app_id(&self) -> &ApplicationId;
    fn op(&self) -> Operation;
    fn context(&self) -> Option<&ContextHandle>;
}

/// Which stage of the pipeline a forwarding objective targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ForwardingFlag {
    /// Forwarding on a specific header, e.g. a destination MAC or IP prefix.
    Specific,
    /// ACL-like matching on any combination of header fields.
    Versatile,
    /// Egress processing.
    Egress,
}

#[derive(Clone, Debug)]
pub struct ForwardingObjective {
    pub selector: TrafficSelector,
    pub treatment: Option<TrafficTreatment>,
    pub next_id: Option<u32>,
    pub flag: ForwardingFlag,
    pub priority: i32,
    pub app_id: ApplicationId,
    pub op: Operation,
    pub context: Option<ContextHandle>,
}

impl ForwardingObjective {
    /// An objective to add a versatile (ACL) rule with no treatment and no next
    /// objective yet; fill those in with the builder-style setters below.
    pub fn versatile(selector: TrafficSelector, priority: i32, app_id: ApplicationId) -> Self {
        ForwardingObjective {
            selector,
            treatment: None,
            next_id: None,
            flag: ForwardingFlag::Versatile,
            priority,
            app_id,
            op: Operation::Add,
            context: None,
        }
    }

    pub fn with_treatment(mut self, treatment: TrafficTreatment) -> Self {
        self.treatment = Some(treatment);
        self
    }

    pub fn with_next_id(mut self, next_id: u32) -> Self {
        self.next_id = Some(next_id);
        self
    }

    pub fn with_flag(mut self, flag: ForwardingFlag) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_op(mut self, op: Operation) -> Self {
        self.op = op;
        self
    }

    pub fn with_context(mut self, context: Arc<dyn ObjectiveContext>) -> Self {
        self.context = Some(ContextHandle(context));
        self
    }
}

#[derive(Clone, Debug)]
pub struct FilteringObjective {
    pub key: Option<Criterion>,
    pub conditions: Vec<Criterion>,
    pub meta: Option<TrafficTreatment>,
    pub priority: i32,
    pub app_id: ApplicationId,
    pub op: Operation,
    pub context: Option<ContextHandle>,
}

/// How the treatments of a next objective are combined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NextType {
    Simple,
    Hashed,
    Broadcast,
    Indirect,
}

#[derive(Clone, Debug)]
pub struct NextObjective {
    pub id: u32,
    pub next_type: NextType,
    pub treatments: Vec<TrafficTreatment>,
    pub priority: i32,
    pub app_id: ApplicationId,
    pub op: Operation,
    pub context: Option<ContextHandle>,
}

macro_rules! impl_objective_info {
    ($type:ty) => {
        impl ObjectiveInfo for $type {
            fn priority(&self) -> i32 {
                self.priority
            }
            fn app_id(&self) -> &ApplicationId {
                &self.app_id
            }
            fn op(&self) -> Operation {
                self.op
            }
            fn context(&self) -> Option<&ContextHandle> {
                self.context.as_ref()
            }
        }
    };
}

impl_objective_info!(ForwardingObjective);
impl_objective_info!(FilteringObjective);
impl_objective_info!(NextObjective);

/// Any objective, tagged by kind.
#[derive(Clone, Debug)]
pub enum Objective {
    Forwarding(ForwardingObjective),
    Filtering(FilteringObjective),
    Next(NextObjective),
}

impl Objective {
    fn info(&self) -> &dyn ObjectiveInfo {
        match self {
            Objective::Forwarding(o) => o,
            Objective::Filtering(o) => o,
            Objective::Next(o) => o,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Objective::Forwarding(_) => "forwarding",
            Objective::Filtering(_) => "filtering",
            Objective::Next(_) => "next",
        }
    }
}

impl ObjectiveInfo for Objective {
    fn priority(&self) -> i32 {
        self.info().priority()
    }
    fn app_id(&self) -> &ApplicationId {
        self.info().app_id()
    }
    fn op(&self) -> Operation {
        self.info().op()
    }
    fn context(&self) -> Option<&ContextHandle> {
        self.info().context()
    }
}

impl From<ForwardingObjective> for Objective {
    fn from(o: ForwardingObjective) -> Self {
        Objective::Forwarding(o)
    }
}

impl From<FilteringObjective> for Objective {
    fn from(o: FilteringObjective) -> Self {
        Objective::Filtering(o)
    }
}

impl From<NextObjective> for Objective {
    fn from(o: NextObjective) -> Self {
        Objective::Next(o)
    }
}
