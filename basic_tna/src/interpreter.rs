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

use crate::capabilities::BasicCapabilities;
use crate::p4info::{
    BASIC_INGRESS_TABLE0_TABLE0, HDR_ETH_DST, HDR_ETH_SRC, HDR_ETH_TYPE, HDR_IG_PORT,
    HDR_IPV4_DST, HDR_IPV4_SRC, HDR_IP_PROTO, HDR_L4_DPORT, HDR_L4_SPORT,
};
use crate::services::PortResolver;
use crate::{packet, treatment};
use lazy_static::lazy_static;
use pimodel::{
    CriterionType, DeviceId, FrameError, InboundPacket, LogicalPort, OutboundPacket, PiAction,
    PiMatchFieldId, PiPacketIn, PiPacketOut, PiTableId, PortNumber, TrafficTreatment, TrimError,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error translating between device-independent and pipeline-specific terms.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum InterpreterError {
    #[error("unsupported table {0}")]
    UnsupportedTable(PiTableId),

    #[error("treatment not supported{}: {treatment}", in_table(.table))]
    UnsupportedTreatment {
        table: Option<PiTableId>,
        treatment: TrafficTreatment,
    },

    /// The static action maps have no action of this kind for the table.  This is a bug in the
    /// maps, not in the input.
    #[error("no {kind} action for table {table}")]
    MissingAction {
        table: PiTableId,
        kind: &'static str,
    },

    #[error("output on logical port '{0}' not supported")]
    UnsupportedLogicalPort(PortNumber),

    #[error("port number '{port}' too big, {source}")]
    PortTooWide { port: u64, source: TrimError },

    #[error("no port service to enumerate the ports of {0}")]
    PortServiceUnavailable(DeviceId),

    #[error(transparent)]
    DeserializationFailed(#[from] FrameError),

    #[error("missing metadata 'ingress_port' in packet-in received from '{0}'")]
    MissingIngressMetadata(DeviceId),

    #[error("malformed metadata 'ingress_port' in packet-in received from '{device_id}': {source}")]
    MalformedMetadata { device_id: DeviceId, source: TrimError },
}

fn in_table(table: &Option<PiTableId>) -> String {
    match table {
        Some(table) => format!(" for table '{}'", table),
        None => String::new(),
    }
}

/// Translates between device-independent flow and packet descriptions and one P4 program.
pub trait PipelineInterpreter: Send + Sync {
    /// The match field that `criterion_type` maps to, if the program has one.
    fn map_criterion_type(&self, criterion_type: CriterionType) -> Option<PiMatchFieldId>;

    /// The table that a numeric flow-rule table id names.
    fn map_flow_rule_table_id(&self, table_id: u32) -> Option<PiTableId>;

    fn map_treatment(&self, treatment: &TrafficTreatment, table: &PiTableId)
                     -> Result<PiAction, InterpreterError>;

    fn map_outbound_packet(&self, packet: &OutboundPacket)
                           -> Result<Vec<PiPacketOut>, InterpreterError>;

    fn map_inbound_packet(&self, packet_in: &PiPacketIn, device_id: &DeviceId)
                          -> Result<InboundPacket, InterpreterError>;

    /// The number the program uses for a logical port, if it has one.
    fn map_logical_port(&self, port: &PortNumber) -> Option<u64>;

    /// The action `table` had before anyone changed its default action.
    fn original_default_action(&self, table: &PiTableId) -> Option<PiAction>;
}

lazy_static! {
    static ref CRITERION_MAP: HashMap<CriterionType, PiMatchFieldId> = HashMap::from([
        (CriterionType::InPort, HDR_IG_PORT),
        (CriterionType::EthDst, HDR_ETH_DST),
        (CriterionType::EthSrc, HDR_ETH_SRC),
        (CriterionType::EthType, HDR_ETH_TYPE),
        (CriterionType::Ipv4Dst, HDR_IPV4_DST),
        (CriterionType::Ipv4Src, HDR_IPV4_SRC),
        (CriterionType::IpProto, HDR_IP_PROTO),
        (CriterionType::UdpDst, HDR_L4_DPORT),
        (CriterionType::UdpSrc, HDR_L4_SPORT),
        (CriterionType::TcpDst, HDR_L4_DPORT),
        (CriterionType::TcpSrc, HDR_L4_SPORT),
    ]);

    static ref TABLE_MAP: HashMap<u32, PiTableId> =
        HashMap::from([(0, BASIC_INGRESS_TABLE0_TABLE0)]);
}

/// Interpreter for the `basic` program.
#[derive(Clone)]
pub struct BasicInterpreter {
    capabilities: Arc<BasicCapabilities>,
    port_resolver: Option<Arc<dyn PortResolver>>,
}

impl BasicInterpreter {
    pub fn new(capabilities: Arc<BasicCapabilities>,
               port_resolver: Option<Arc<dyn PortResolver>>) -> Self {
        BasicInterpreter { capabilities, port_resolver }
    }

    pub fn capabilities(&self) -> &BasicCapabilities {
        &self.capabilities
    }
}

impl PipelineInterpreter for BasicInterpreter {
    fn map_criterion_type(&self, criterion_type: CriterionType) -> Option<PiMatchFieldId> {
        CRITERION_MAP.get(&criterion_type).cloned()
    }

    fn map_flow_rule_table_id(&self, table_id: u32) -> Option<PiTableId> {
        TABLE_MAP.get(&table_id).cloned()
    }

    fn map_treatment(&self, treatment: &TrafficTreatment, table: &PiTableId)
                     -> Result<PiAction, InterpreterError> {
        treatment::map_treatment(treatment, table)
    }

    fn map_outbound_packet(&self, packet: &OutboundPacket)
                           -> Result<Vec<PiPacketOut>, InterpreterError> {
        packet::map_outbound_packet(packet, self.port_resolver.as_deref())
    }

    fn map_inbound_packet(&self, packet_in: &PiPacketIn, device_id: &DeviceId)
                          -> Result<InboundPacket, InterpreterError> {
        packet::map_inbound_packet(packet_in, device_id, self.port_resolver.as_deref())
    }

    fn map_logical_port(&self, port: &PortNumber) -> Option<u64> {
        match port {
            PortNumber::Logical(LogicalPort::Controller) => self.capabilities.cpu_port(),
            _ => None,
        }
    }

    fn original_default_action(&self, _table: &PiTableId) -> Option<PiAction> {
        None
    }
}
