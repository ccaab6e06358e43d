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

use crate::flow::TrafficTreatment;
use crate::frame::{Ethernet, Frame};
use crate::net::{ConnectPoint, DeviceId};

/// A packet an application wants a device to emit, described device-independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundPacket {
    pub send_through: DeviceId,
    pub treatment: TrafficTreatment,
    pub data: Frame,
}

impl OutboundPacket {
    pub fn new(send_through: DeviceId, treatment: TrafficTreatment, data: Vec<u8>) -> Self {
        OutboundPacket { send_through, treatment, data: Frame(data) }
    }
}

/// A packet a device handed to the controller, with the port it arrived on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundPacket {
    pub received_from: ConnectPoint,
    pub parsed: Ethernet,
    pub unparsed: Frame,
}
