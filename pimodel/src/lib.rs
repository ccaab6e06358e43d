/*
Copyright (c) 2021 VMware, Inc.
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

//! Data model shared between applications and pipeline drivers.
//!
//! The types here fall in two groups.  The device-independent half ([`flow`], [`objective`],
//! [`net`], [`packet`]) is what applications speak.  The protocol-independent half ([`pi`],
//! [`model`], [`bytes`]) is what a P4Runtime device speaks.  A pipeline driver translates
//! between the two.

pub mod bytes;
pub mod flow;
pub mod frame;
pub mod model;
pub mod net;
pub mod objective;
pub mod packet;
pub mod pi;

pub use bytes::{ByteSequence, TrimError};
pub use flow::{
    Criterion, CriterionType, FlowRule, Instruction, InstructionType, L2Modification,
    TrafficSelector, TrafficTreatment,
};
pub use frame::{Ethernet, Frame, FrameError};
pub use model::{
    ActionMismatch, ActionModel, ActionParamModel, ActionRef, MatchFieldModel, MatchType,
    PipelineModel, TableModel,
};
pub use net::{ConnectPoint, DeviceId, LogicalPort, Port, PortNumber};
pub use objective::{
    ApplicationId, ContextHandle, FilteringObjective, ForwardingFlag, ForwardingObjective,
    NextObjective, NextType, Objective, ObjectiveContext, ObjectiveError, ObjectiveInfo,
    Operation,
};
pub use crate::packet::{InboundPacket, OutboundPacket};
pub use pi::{
    PiAction, PiActionId, PiActionParam, PiActionParamId, PiMatchFieldId, PiPacketIn,
    PiPacketMetadata, PiPacketMetadataId, PiPacketOut, PiTableId,
};
