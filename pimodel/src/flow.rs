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

//! Device-independent flow descriptions: what to match ([`TrafficSelector`]), what to do with
//! matching packets ([`TrafficTreatment`]), and the concrete table entries ([`FlowRule`]) that
//! a pipeline-specific translator turns them into.

use crate::bytes::ByteSequence;
use crate::net::{DeviceId, PortNumber};
use crate::objective::ApplicationId;
use crate::pi::{PiAction, PiTableId};
use itertools::Itertools;
use std::fmt::{self, Display};

/// The header field (or pseudo-field) a [`Criterion`] matches on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriterionType {
    InPort,
    InPhyPort,
    EthDst,
    EthSrc,
    EthType,
    VlanVid,
    VlanPcp,
    IpDscp,
    IpProto,
    Ipv4Src,
    Ipv4Dst,
    TcpSrc,
    TcpDst,
    UdpSrc,
    UdpDst,
    Icmpv4Type,
    Ipv6Src,
    Ipv6Dst,
    MplsLabel,
    ArpOp,
}

impl Display for CriterionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CriterionType::*;
        let s = match self {
            InPort => "IN_PORT",
            InPhyPort => "IN_PHY_PORT",
            EthDst => "ETH_DST",
            EthSrc => "ETH_SRC",
            EthType => "ETH_TYPE",
            VlanVid => "VLAN_VID",
            VlanPcp => "VLAN_PCP",
            IpDscp => "IP_DSCP",
            IpProto => "IP_PROTO",
            Ipv4Src => "IPV4_SRC",
            Ipv4Dst => "IPV4_DST",
            TcpSrc => "TCP_SRC",
            TcpDst => "TCP_DST",
            UdpSrc => "UDP_SRC",
            UdpDst => "UDP_DST",
            Icmpv4Type => "ICMPV4_TYPE",
            Ipv6Src => "IPV6_SRC",
            Ipv6Dst => "IPV6_DST",
            MplsLabel => "MPLS_LABEL",
            ArpOp => "ARP_OP",
        };
        write!(f, "{}", s)
    }
}

/// One match condition: a field and the value it must have.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Criterion {
    pub criterion_type: CriterionType,
    pub value: ByteSequence,
}

impl Criterion {
    pub fn new<V: Into<ByteSequence>>(criterion_type: CriterionType, value: V) -> Self {
        Criterion { criterion_type, value: value.into() }
    }

    pub fn in_port(port: &PortNumber) -> Self {
        Criterion::new(CriterionType::InPort, port.to_u64())
    }

    pub fn eth_type(ether_type: u16) -> Self {
        Criterion::new(CriterionType::EthType, ether_type as u64)
    }

    pub fn eth_dst(mac: [u8; 6]) -> Self {
        Criterion::new(CriterionType::EthDst, ByteSequence::from_bytes(mac.to_vec()))
    }

    pub fn eth_src(mac: [u8; 6]) -> Self {
        Criterion::new(CriterionType::EthSrc, ByteSequence::from_bytes(mac.to_vec()))
    }

    pub fn vlan_vid(vid: u16) -> Self {
        Criterion::new(CriterionType::VlanVid, vid as u64)
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.criterion_type, self.value)
    }
}

/// A set of criteria, at most one per [`CriterionType`], that a packet must all satisfy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrafficSelector {
    criteria: Vec<Criterion>,
}

impl TrafficSelector {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds `criterion`, replacing any existing criterion of the same type.
    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.retain(|c| c.criterion_type != criterion.criterion_type);
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn criterion(&self, criterion_type: CriterionType) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.criterion_type == criterion_type)
    }
}

impl FromIterator<Criterion> for TrafficSelector {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        iter.into_iter().fold(TrafficSelector::new(), TrafficSelector::with)
    }
}

impl Display for TrafficSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.criteria.iter().join(", "))
    }
}

/// Header rewrites at layer 2.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum L2Modification {
    EthSrc([u8; 6]),
    EthDst([u8; 6]),
    VlanId(u16),
    VlanPush,
    VlanPop,
}

impl Display for L2Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mac = |m: &[u8; 6]| m.iter().map(|b| format!("{:02x}", b)).join(":");
        match self {
            L2Modification::EthSrc(m) => write!(f, "ETH_SRC:{}", mac(m)),
            L2Modification::EthDst(m) => write!(f, "ETH_DST:{}", mac(m)),
            L2Modification::VlanId(vid) => write!(f, "VLAN_ID:{}", vid),
            L2Modification::VlanPush => write!(f, "VLAN_PUSH"),
            L2Modification::VlanPop => write!(f, "VLAN_POP"),
        }
    }
}

/// Kind of an [`Instruction`], without its arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstructionType {
    Output,
    Group,
    Meter,
    Table,
    L2Modification,
    NoAction,
    ProtocolIndependent,
}

/// One step of a [`TrafficTreatment`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Output(PortNumber),
    Group(u32),
    Meter(u32),
    Table(u32),
    L2Modification(L2Modification),
    NoAction,
    /// An action already expressed in the target pipeline's own terms.
    ProtocolIndependent(PiAction),
}

impl Instruction {
    pub fn instruction_type(&self) -> InstructionType {
        match self {
            Instruction::Output(_) => InstructionType::Output,
            Instruction::Group(_) => InstructionType::Group,
            Instruction::Meter(_) => InstructionType::Meter,
            Instruction::Table(_) => InstructionType::Table,
            Instruction::L2Modification(_) => InstructionType::L2Modification,
            Instruction::NoAction => InstructionType::NoAction,
            Instruction::ProtocolIndependent(_) => InstructionType::ProtocolIndependent,
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Output(port) => write!(f, "OUTPUT:{}", port),
            Instruction::Group(id) => write!(f, "GROUP:{:#x}", id),
            Instruction::Meter(id) => write!(f, "METER:{}", id),
            Instruction::Table(id) => write!(f, "TABLE:{}", id),
            Instruction::L2Modification(m) => write!(f, "L2MODIFICATION:{}", m),
            Instruction::NoAction => write!(f, "NOACTION"),
            Instruction::ProtocolIndependent(a) => write!(f, "PROTOCOL_INDEPENDENT:{}", a),
        }
    }
}

/// An ordered list of instructions.
///
/// A treatment with no instructions whose deferred instruction set was explicitly cleared says
/// "drop".  A treatment that is merely empty says nothing at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrafficTreatment {
    instructions: Vec<Instruction>,
    cleared_deferred: bool,
}

impl TrafficTreatment {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        TrafficTreatment { instructions, cleared_deferred: false }
    }

    pub fn drop() -> Self {
        TrafficTreatment { instructions: Vec::new(), cleared_deferred: true }
    }

    pub fn output(port: PortNumber) -> Self {
        TrafficTreatment::new(vec![Instruction::Output(port)])
    }

    pub fn pi_action(action: PiAction) -> Self {
        TrafficTreatment::new(vec![Instruction::ProtocolIndependent(action)])
    }

    pub fn with_cleared_deferred(mut self) -> Self {
        self.cleared_deferred = true;
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn cleared_deferred(&self) -> bool {
        self.cleared_deferred
    }

    /// The first instruction of type `instruction_type`, if any.
    pub fn instruction(&self, instruction_type: InstructionType) -> Option<&Instruction> {
        self.instructions.iter().find(|i| i.instruction_type() == instruction_type)
    }

    /// The port of the first output instruction, if any.
    pub fn output_port(&self) -> Option<&PortNumber> {
        match self.instruction(InstructionType::Output) {
            Some(Instruction::Output(port)) => Some(port),
            _ => None,
        }
    }

    /// The PI action, if this treatment consists of exactly one protocol-independent
    /// instruction.
    pub fn as_pi_action(&self) -> Option<&PiAction> {
        match self.instructions.as_slice() {
            [Instruction::ProtocolIndependent(action)] => Some(action),
            _ => None,
        }
    }
}

impl Display for TrafficTreatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.instructions.iter().join(", "))?;
        if self.cleared_deferred {
            write!(f, " cleared")?;
        }
        Ok(())
    }
}

/// A concrete entry for one table of one device's pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlowRule {
    pub device_id: DeviceId,
    pub table_id: PiTableId,
    pub selector: TrafficSelector,
    pub action: PiAction,
    pub priority: i32,
    pub app_id: ApplicationId,
    pub permanent: bool,
}

impl Display for FlowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} table={} priority={} selector={} action={} app={}",
               self.device_id, self.table_id, self.priority, self.selector, self.action,
               self.app_id)?;
        if self.permanent {
            write!(f, " permanent")?;
        }
        Ok(())
    }
}
