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

//! Names the `basic` P4 program gives its tables, actions, match fields and packet metadata,
//! and the static schema of its tables.

use lazy_static::lazy_static;
use pimodel::{
    ActionModel, ActionRef, MatchFieldModel, MatchType, PiActionId, PiActionParamId,
    PiMatchFieldId, PiPacketMetadataId, PiTableId, PipelineModel, TableModel,
};

// Tables.
pub const BASIC_INGRESS_TABLE0_TABLE0: PiTableId = PiTableId::of("BasicIngress.table0.table0");
pub const BASIC_EGRESS_STATS_FLOWS: PiTableId = PiTableId::of("BasicEgress.stats.flows");

// Match fields.
pub const HDR_IG_PORT: PiMatchFieldId = PiMatchFieldId::of("ig_port");
pub const HDR_EG_PORT: PiMatchFieldId = PiMatchFieldId::of("eg_port");
pub const HDR_ETH_DST: PiMatchFieldId = PiMatchFieldId::of("eth_dst");
pub const HDR_ETH_SRC: PiMatchFieldId = PiMatchFieldId::of("eth_src");
pub const HDR_ETH_TYPE: PiMatchFieldId = PiMatchFieldId::of("eth_type");
pub const HDR_IP_PROTO: PiMatchFieldId = PiMatchFieldId::of("ip_proto");
pub const HDR_IPV4_SRC: PiMatchFieldId = PiMatchFieldId::of("ipv4_src");
pub const HDR_IPV4_DST: PiMatchFieldId = PiMatchFieldId::of("ipv4_dst");
pub const HDR_L4_SPORT: PiMatchFieldId = PiMatchFieldId::of("l4_sport");
pub const HDR_L4_DPORT: PiMatchFieldId = PiMatchFieldId::of("l4_dport");

// Actions.
pub const BASIC_INGRESS_TABLE0_COPY_TO_CPU: PiActionId =
    PiActionId::of("BasicIngress.table0.copy_to_cpu");
pub const BASIC_INGRESS_TABLE0_DROP: PiActionId = PiActionId::of("BasicIngress.table0.drop");
pub const BASIC_INGRESS_TABLE0_SET_EGRESS_PORT: PiActionId =
    PiActionId::of("BasicIngress.table0.set_egress_port");
pub const NOP: PiActionId = PiActionId::of("nop");

// Action params.
pub const CPU_PORT: PiActionParamId = PiActionParamId::of("cpu_port");
pub const PORT_NUM: PiActionParamId = PiActionParamId::of("port_num");

// Packet metadata.
pub const EGRESS_PORT: PiPacketMetadataId = PiPacketMetadataId::of("egress_port");
pub const EGRESS_PORT_BITWIDTH: usize = 32;
pub const INGRESS_PORT: PiPacketMetadataId = PiPacketMetadataId::of("ingress_port");
pub const INGRESS_PORT_BITWIDTH: usize = 32;
pub const PAD0: PiPacketMetadataId = PiPacketMetadataId::of("pad0");
pub const PAD0_BITWIDTH: usize = 7;

pub const PORT_BITWIDTH: usize = 32;

fn ternary(id: PiMatchFieldId, bit_width: usize) -> MatchFieldModel {
    MatchFieldModel::new(id, bit_width, MatchType::Ternary)
}

lazy_static! {
    /// Schema of the `basic` program, as its P4Info declares it.
    pub static ref PIPELINE_MODEL: PipelineModel = PipelineModel {
        tables: vec![
            TableModel {
                id: BASIC_INGRESS_TABLE0_TABLE0,
                match_fields: vec![
                    ternary(HDR_IG_PORT, PORT_BITWIDTH),
                    ternary(HDR_ETH_DST, 48),
                    ternary(HDR_ETH_SRC, 48),
                    ternary(HDR_ETH_TYPE, 16),
                    ternary(HDR_IPV4_SRC, 32),
                    ternary(HDR_IPV4_DST, 32),
                    ternary(HDR_IP_PROTO, 8),
                    ternary(HDR_L4_SPORT, 16),
                    ternary(HDR_L4_DPORT, 16),
                ],
                actions: vec![
                    ActionRef::new(ActionModel::new(BASIC_INGRESS_TABLE0_SET_EGRESS_PORT)
                                   .with_param(PORT_NUM, PORT_BITWIDTH)),
                    ActionRef::new(ActionModel::new(BASIC_INGRESS_TABLE0_COPY_TO_CPU)),
                    ActionRef::new(ActionModel::new(BASIC_INGRESS_TABLE0_DROP)),
                    ActionRef::default_only(ActionModel::new(NOP)),
                ],
                const_default_action: None,
                max_entries: Some(1024),
                is_const_table: false,
            },
            TableModel {
                id: BASIC_EGRESS_STATS_FLOWS,
                match_fields: vec![
                    MatchFieldModel::new(HDR_IG_PORT, PORT_BITWIDTH, MatchType::Exact),
                    MatchFieldModel::new(HDR_EG_PORT, PORT_BITWIDTH, MatchType::Exact),
                ],
                actions: vec![ActionRef::new(ActionModel::new(NOP))],
                const_default_action: Some(NOP),
                max_entries: Some(1024),
                is_const_table: false,
            },
        ],
    };
}
