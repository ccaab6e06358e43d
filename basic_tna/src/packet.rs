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

//! Packet-out and packet-in codec for the `basic` program.
//!
//! Packet-outs carry two metadata fields in front of the frame: a 7-bit pad and the 32-bit
//! egress port.  Packet-ins carry the 32-bit ingress port.

use crate::interpreter::InterpreterError;
use crate::p4info::{EGRESS_PORT, INGRESS_PORT, INGRESS_PORT_BITWIDTH, PAD0, PAD0_BITWIDTH};
use crate::services::PortResolver;
use crate::treatment::fit_port;
use pimodel::{
    ByteSequence, ConnectPoint, DeviceId, Ethernet, Frame, InboundPacket, Instruction,
    LogicalPort, OutboundPacket, PiPacketIn, PiPacketMetadata, PiPacketOut, PortNumber,
};
use tracing::{trace, warn};

/// Packet-out metadata telling the switch to emit the packet on `port`.
pub fn create_packet_metadata(port: u64) -> Result<Vec<PiPacketMetadata>, InterpreterError> {
    let pad = ByteSequence::from_bytes(vec![0; PAD0_BITWIDTH.div_ceil(8)]);
    Ok(vec![
        PiPacketMetadata { id: PAD0, value: pad },
        PiPacketMetadata { id: EGRESS_PORT, value: fit_port(port)? },
    ])
}

fn create_packet_out(data: &Frame, port: u64, via_tables: bool)
                     -> Result<PiPacketOut, InterpreterError> {
    Ok(PiPacketOut {
        data: data.0.clone(),
        metadata: create_packet_metadata(port)?,
        via_tables,
    })
}

/// Maps `packet` to the packet-outs that implement its treatment, which must consist only of
/// output instructions.
///
/// Output to `TABLE` sends the packet through the ingress pipeline.  Output to `FLOOD` emits one
/// copy per port `port_resolver` knows on the device.  Output to a physical port emits the
/// packet on that port, bypassing the tables.
pub fn map_outbound_packet(packet: &OutboundPacket, port_resolver: Option<&dyn PortResolver>)
                           -> Result<Vec<PiPacketOut>, InterpreterError> {
    let treatment = &packet.treatment;
    let ports = treatment.instructions().iter()
        .map(|i| match i {
            Instruction::Output(port) => Some(port),
            _ => None,
        })
        .collect::<Option<Vec<&PortNumber>>>()
        .ok_or_else(|| InterpreterError::UnsupportedTreatment {
            table: None,
            treatment: treatment.clone(),
        })?;

    let mut packet_outs = Vec::new();
    for port in ports {
        match port {
            PortNumber::Logical(LogicalPort::Table) => {
                packet_outs.push(create_packet_out(&packet.data, 0, true)?);
            }
            PortNumber::Logical(LogicalPort::Flood) => {
                let resolver = port_resolver.ok_or_else(|| {
                    InterpreterError::PortServiceUnavailable(packet.send_through.clone())
                })?;
                for p in resolver.ports(&packet.send_through) {
                    packet_outs.push(create_packet_out(&packet.data, p.number.to_u64(), false)?);
                }
            }
            PortNumber::Logical(_) => {
                return Err(InterpreterError::UnsupportedLogicalPort(port.clone()));
            }
            PortNumber::Physical { number, .. } => {
                packet_outs.push(create_packet_out(&packet.data, *number, false)?);
            }
        }
    }
    trace!("{}: {} packet-out(s) for treatment {}",
           packet.send_through, packet_outs.len(), treatment);
    Ok(packet_outs)
}

// Replaces a bare port number by the inventory's port, which may carry a name.
fn translate_switch_port(connect_point: ConnectPoint, port_resolver: Option<&dyn PortResolver>)
                         -> ConnectPoint {
    let resolver = match port_resolver {
        Some(resolver) => resolver,
        None => {
            warn!("Unable to translate switch port due to port service not available");
            return connect_point;
        }
    };
    match resolver.resolve_port(&connect_point) {
        Some(port) => ConnectPoint::new(connect_point.device_id, port.number),
        None => connect_point,
    }
}

/// Decodes a packet-in received from `device_id`.
pub fn map_inbound_packet(packet_in: &PiPacketIn, device_id: &DeviceId,
                          port_resolver: Option<&dyn PortResolver>)
                          -> Result<InboundPacket, InterpreterError> {
    let parsed = Ethernet::deserialize(&packet_in.data)?;

    let metadata = packet_in.metadata(&INGRESS_PORT)
        .ok_or_else(|| InterpreterError::MissingIngressMetadata(device_id.clone()))?;
    let port = metadata.value.fit(INGRESS_PORT_BITWIDTH)
        .and_then(|value| value.to_u32())
        .map_err(|source| InterpreterError::MalformedMetadata {
            device_id: device_id.clone(),
            source,
        })?;

    let mut received_from = ConnectPoint::new(device_id.clone(), PortNumber::physical(port as u64));
    if !received_from.port.has_name() {
        received_from = translate_switch_port(received_from, port_resolver);
    }
    Ok(InboundPacket {
        received_from,
        parsed,
        unparsed: Frame(packet_in.data.clone()),
    })
}
