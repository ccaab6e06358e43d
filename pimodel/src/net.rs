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

use std::fmt::{self, Display};

/// Identifies a device, e.g. `device:leaf1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reserved ports that don't correspond to a physical interface.
///
/// The numeric values are the OpenFlow reserved port numbers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalPort {
    InPort,
    Table,
    Normal,
    Flood,
    All,
    Controller,
    Local,
    Any,
}

impl LogicalPort {
    pub fn number(self) -> u64 {
        use LogicalPort::*;
        match self {
            InPort => 0xffff_fff8,
            Table => 0xffff_fff9,
            Normal => 0xffff_fffa,
            Flood => 0xffff_fffb,
            All => 0xffff_fffc,
            Controller => 0xffff_fffd,
            Local => 0xffff_fffe,
            Any => 0xffff_ffff,
        }
    }

    fn name(self) -> &'static str {
        use LogicalPort::*;
        match self {
            InPort => "IN_PORT",
            Table => "TABLE",
            Normal => "NORMAL",
            Flood => "FLOOD",
            All => "ALL",
            Controller => "CONTROLLER",
            Local => "LOCAL",
            Any => "ANY",
        }
    }
}

/// A port on a device: either a physical port, which may carry a human-readable name, or one of
/// the [`LogicalPort`]s.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortNumber {
    Physical { number: u64, name: Option<String> },
    Logical(LogicalPort),
}

impl PortNumber {
    pub const IN_PORT: PortNumber = PortNumber::Logical(LogicalPort::InPort);
    pub const TABLE: PortNumber = PortNumber::Logical(LogicalPort::Table);
    pub const NORMAL: PortNumber = PortNumber::Logical(LogicalPort::Normal);
    pub const FLOOD: PortNumber = PortNumber::Logical(LogicalPort::Flood);
    pub const ALL: PortNumber = PortNumber::Logical(LogicalPort::All);
    pub const CONTROLLER: PortNumber = PortNumber::Logical(LogicalPort::Controller);
    pub const LOCAL: PortNumber = PortNumber::Logical(LogicalPort::Local);
    pub const ANY: PortNumber = PortNumber::Logical(LogicalPort::Any);

    pub fn physical(number: u64) -> Self {
        PortNumber::Physical { number, name: None }
    }

    pub fn named<S: Into<String>>(number: u64, name: S) -> Self {
        PortNumber::Physical { number, name: Some(name.into()) }
    }

    pub fn to_u64(&self) -> u64 {
        match self {
            PortNumber::Physical { number, .. } => *number,
            PortNumber::Logical(logical) => logical.number(),
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, PortNumber::Logical(_))
    }

    pub fn has_name(&self) -> bool {
        matches!(self, PortNumber::Physical { name: Some(_), .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PortNumber::Physical { name, .. } => name.as_deref(),
            PortNumber::Logical(logical) => Some(logical.name()),
        }
    }
}

impl Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortNumber::Physical { number, name: None } => write!(f, "{}", number),
            PortNumber::Physical { number, name: Some(name) } => write!(f, "[{}]({})", name, number),
            PortNumber::Logical(logical) => write!(f, "{}", logical.name()),
        }
    }
}

/// A port on a particular device.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectPoint {
    pub device_id: DeviceId,
    pub port: PortNumber,
}

impl ConnectPoint {
    pub fn new(device_id: DeviceId, port: PortNumber) -> Self {
        ConnectPoint { device_id, port }
    }
}

impl Display for ConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.port)
    }
}

/// What the device inventory knows about a port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub number: PortNumber,
    pub enabled: bool,
}

impl Port {
    pub fn new(number: PortNumber, enabled: bool) -> Self {
        Port { number, enabled }
    }
}
