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

//! Ethernet frames carried in packet-in and packet-out messages.

use byteorder::{BigEndian, ByteOrder};
use hwaddr::HwAddr;
use packet::Packet;
use thiserror::Error;

/// Length of an untagged Ethernet header.
pub const ETHERNET_HEADER_LEN: usize = 14;

/// Length of an 802.1Q tag.
pub const VLAN_TAG_LEN: usize = 4;

/// Ethertype that marks an 802.1Q-tagged frame.
pub const ETH_TYPE_VLAN: u16 = 0x8100;

/// Error decoding a frame.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than an Ethernet header.
    #[error("frame too short for an Ethernet header ({0} bytes)")]
    TooShort(usize),

    /// The packet parser rejected the frame.
    #[error("malformed Ethernet frame: {0}")]
    Malformed(String),
}

/// An Ethernet frame.
///
/// This is a "newtype" style struct so we can define `Debug` on it.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct Frame(pub Vec<u8>);

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let eth = match packet::ether::Packet::new(&self.0) {
            Ok(packet) => packet,
            Err(e) => return write!(f, "{}", e)
        };
        write!(f, "eth(dst={}, src={}), ", eth.destination(), eth.source())?;

        match eth.protocol() {
            packet::ether::Protocol::Ipv4 => {
                let ipv4 = match packet::ip::v4::Packet::new(eth.payload()) {
                    Ok(packet) => packet,
                    Err(e) => return write!(f, "bad_ipv4({})", e)
                };
                write!(f, "ipv4(dst={}, src={}, proto={:?})",
                       ipv4.destination(), ipv4.source(), ipv4.protocol())
            },
            protocol => write!(f, "ethertype({:?})", protocol)
        }
    }
}

impl From<Vec<u8>> for Frame {
    fn from(data: Vec<u8>) -> Self {
        Frame(data)
    }
}

/// A decoded Ethernet header, plus whatever follows it.
///
/// For an 802.1Q-tagged frame, `ether_type` is the inner ethertype, `vlan_id` holds the tag's
/// VLAN ID and `payload` starts after the tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ethernet {
    pub destination: HwAddr,
    pub source: HwAddr,
    pub vlan_id: Option<u16>,
    pub ether_type: u16,
    pub payload: Vec<u8>,
}

impl Ethernet {
    /// Decodes the Ethernet header at the start of `data`.
    pub fn deserialize(data: &[u8]) -> Result<Ethernet, FrameError> {
        if data.len() < ETHERNET_HEADER_LEN {
            return Err(FrameError::TooShort(data.len()));
        }
        let eth = packet::ether::Packet::new(data)
            .map_err(|e| FrameError::Malformed(e.to_string()))?;

        let ether_type = BigEndian::read_u16(&data[12..ETHERNET_HEADER_LEN]);
        if ether_type != ETH_TYPE_VLAN {
            return Ok(Ethernet {
                destination: eth.destination(),
                source: eth.source(),
                vlan_id: None,
                ether_type,
                payload: eth.payload().to_vec(),
            });
        }

        let header_len = ETHERNET_HEADER_LEN + VLAN_TAG_LEN;
        if data.len() < header_len {
            return Err(FrameError::TooShort(data.len()));
        }
        Ok(Ethernet {
            destination: eth.destination(),
            source: eth.source(),
            vlan_id: Some(BigEndian::read_u16(&data[14..16]) & 0x0fff),
            ether_type: BigEndian::read_u16(&data[16..header_len]),
            payload: data[header_len..].to_vec(),
        })
    }
}
