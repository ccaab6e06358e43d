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

//! Collaborators the translation layer is driven by or drives.  Implementations live in the
//! hosting control plane.

use anyhow::Result;
use pimodel::{ApplicationId, ConnectPoint, DeviceId, FlowRule, Port};
use std::fmt::{self, Display};

/// Device inventory lookups.
pub trait PortResolver: Send + Sync {
    /// The port at `connect_point`, if the inventory knows it.
    fn resolve_port(&self, connect_point: &ConnectPoint) -> Option<Port>;

    /// Every port the inventory currently knows on `device_id`.
    fn ports(&self, device_id: &DeviceId) -> Vec<Port>;
}

/// Whether a batch of flow rules is being installed or removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BatchMode {
    Apply,
    Withdraw,
}

impl Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchMode::Apply => write!(f, "apply"),
            BatchMode::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Hands flow rules to a device.  An `Ok` return means the batch was accepted for delivery,
/// not that the device has installed it.
pub trait ApplyBackend: Send + Sync {
    fn submit_batch(&self, device_id: &DeviceId, rules: Vec<FlowRule>, mode: BatchMode) -> Result<()>;

    /// Removes every flow rule owned by `app_id` from `device_id`.
    fn purge_by_owner(&self, device_id: &DeviceId, app_id: &ApplicationId) -> Result<()>;
}

/// Group and multicast state on a device.
pub trait GroupBackend: Send + Sync {
    fn purge_by_owner(&self, device_id: &DeviceId, app_id: &ApplicationId) -> Result<()>;
}
