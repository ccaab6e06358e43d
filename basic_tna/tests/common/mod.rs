#![allow(dead_code)]

use anyhow::{anyhow, Result};
use basic_tna::{
    ApplyBackend, Architecture, BasicCapabilities, BatchMode, GroupBackend, PipelineDescriptor,
    PortResolver,
};
use pimodel::{
    ApplicationId, ConnectPoint, DeviceId, FlowRule, Objective, ObjectiveContext, ObjectiveError,
    Port, PortNumber,
};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

pub enum Completion<T> {
    Incomplete,
    Complete(T)
}
pub use Completion::*;

/// Repeatedly evaluates `condition`, sleeping a bit between calls, until it yields
/// Complete(value), then returns Ok(value).  After a while, however, give up and return an error
/// instead.
pub fn wait_until<T, F>(mut condition: F) -> Result<T>
    where F: FnMut() -> Completion<T>
{
    for i in 0..10 {
        if let Complete(result) = condition() {
            return Ok(result)
        }

        let ms = match i {
            0 => 10,
            1 => 100,
            _ => 1000,
        };
        std::thread::sleep(std::time::Duration::from_millis(ms));
    }
    Err(anyhow!("wait_until timed out"))
}

pub fn device_id() -> DeviceId {
    DeviceId::new("device:leaf1")
}

pub fn app_id() -> ApplicationId {
    ApplicationId::new(7, "org.example.acl")
}

pub fn tna_capabilities() -> Arc<BasicCapabilities> {
    Arc::new(BasicCapabilities::new(PipelineDescriptor::new(
        "org.stratumproject.basic.montara_sde_9_7_0", Some(Architecture::Tna))))
}

pub fn v1model_capabilities() -> Arc<BasicCapabilities> {
    Arc::new(BasicCapabilities::new(PipelineDescriptor::new(
        "org.stratumproject.basic.bmv2", Some(Architecture::V1Model))))
}

/// Device inventory with a fixed set of ports, each named `eth<n>`.
pub struct FakePortResolver {
    pub ports: Vec<u64>,
}

impl FakePortResolver {
    pub fn new(ports: &[u64]) -> Arc<Self> {
        Arc::new(FakePortResolver { ports: ports.to_vec() })
    }
}

impl PortResolver for FakePortResolver {
    fn resolve_port(&self, connect_point: &ConnectPoint) -> Option<Port> {
        let number = connect_point.port.to_u64();
        self.ports.iter()
            .find(|&&p| p == number)
            .map(|&p| Port::new(PortNumber::named(p, format!("eth{}", p)), true))
    }

    fn ports(&self, _device_id: &DeviceId) -> Vec<Port> {
        self.ports.iter()
            .map(|&p| Port::new(PortNumber::named(p, format!("eth{}", p)), true))
            .collect()
    }
}

/// Apply backend that records what it is given, and fails every submission if `fail` is set.
#[derive(Default)]
pub struct RecordingBackend {
    pub batches: Mutex<Vec<(DeviceId, Vec<FlowRule>, BatchMode)>>,
    pub purged: Mutex<Vec<(DeviceId, ApplicationId)>>,
    pub fail: bool,
}

impl RecordingBackend {
    pub fn failing() -> Self {
        RecordingBackend { fail: true, ..Default::default() }
    }

    pub fn batches(&self) -> Vec<(DeviceId, Vec<FlowRule>, BatchMode)> {
        self.batches.lock().unwrap().clone()
    }
}

impl ApplyBackend for RecordingBackend {
    fn submit_batch(&self, device_id: &DeviceId, rules: Vec<FlowRule>, mode: BatchMode) -> Result<()> {
        if self.fail {
            return Err(anyhow!("device {} unreachable", device_id));
        }
        self.batches.lock().unwrap().push((device_id.clone(), rules, mode));
        Ok(())
    }

    fn purge_by_owner(&self, device_id: &DeviceId, app_id: &ApplicationId) -> Result<()> {
        self.purged.lock().unwrap().push((device_id.clone(), app_id.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingGroupBackend {
    pub purged: Mutex<Vec<(DeviceId, ApplicationId)>>,
}

impl GroupBackend for RecordingGroupBackend {
    fn purge_by_owner(&self, device_id: &DeviceId, app_id: &ApplicationId) -> Result<()> {
        self.purged.lock().unwrap().push((device_id.clone(), app_id.clone()));
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error(ObjectiveError),
}

/// Objective context that records each outcome and the thread that delivered it.
#[derive(Default)]
pub struct RecordingContext {
    pub outcomes: Mutex<Vec<(Outcome, ThreadId)>>,
}

impl RecordingContext {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingContext::default())
    }

    /// Waits for the first outcome.
    pub fn wait_for_outcome(&self) -> Result<(Outcome, ThreadId)> {
        wait_until(|| match self.outcomes.lock().unwrap().first() {
            Some(outcome) => Complete(outcome.clone()),
            None => Incomplete,
        })
    }

    pub fn count(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }
}

impl ObjectiveContext for RecordingContext {
    fn on_success(&self, _objective: &Objective) {
        self.outcomes.lock().unwrap().push((Outcome::Success, thread::current().id()));
    }

    fn on_error(&self, _objective: &Objective, error: ObjectiveError) {
        self.outcomes.lock().unwrap().push((Outcome::Error(error), thread::current().id()));
    }
}
