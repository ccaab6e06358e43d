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

//! Protocol-independent (PI) entities: the names a P4 program gives its tables, match fields,
//! actions and packet metadata, and the values built from them.

use crate::bytes::ByteSequence;
use std::borrow::Cow;
use std::fmt::{self, Display};

// P4 entities are identified by their fully qualified names in the P4Info.  Constants for a
// particular program are declared with `of`, which is usable in `const` context.
macro_rules! pi_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub const fn of(id: &'static str) -> Self {
                $name(Cow::Borrowed(id))
            }

            pub fn new<S: Into<String>>(id: S) -> Self {
                $name(Cow::Owned(id.into()))
            }

            pub fn id(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pi_identifier!(
    /// Name of a match-action table.
    PiTableId
);
pi_identifier!(
    /// Name of a table match field, e.g. `eth_dst`.
    PiMatchFieldId
);
pi_identifier!(
    /// Name of an action.
    PiActionId
);
pi_identifier!(
    /// Name of an action parameter.
    PiActionParamId
);
pi_identifier!(
    /// Name of a packet-in or packet-out metadata field.
    PiPacketMetadataId
);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PiActionParam {
    pub id: PiActionParamId,
    pub value: ByteSequence,
}

impl PiActionParam {
    pub fn new<V: Into<ByteSequence>>(id: PiActionParamId, value: V) -> Self {
        PiActionParam { id, value: value.into() }
    }
}

impl Display for PiActionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.value)
    }
}

/// An action invocation: which action, with which parameter values, in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PiAction {
    pub id: PiActionId,
    pub params: Vec<PiActionParam>,
}

impl PiAction {
    pub fn new(id: PiActionId) -> Self {
        PiAction { id, params: Vec::new() }
    }

    pub fn with_param<V: Into<ByteSequence>>(mut self, id: PiActionParamId, value: V) -> Self {
        self.params.push(PiActionParam::new(id, value));
        self
    }

    pub fn param(&self, id: &PiActionParamId) -> Option<&PiActionParam> {
        self.params.iter().find(|p| &p.id == id)
    }
}

impl Display for PiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.id)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PiPacketMetadata {
    pub id: PiPacketMetadataId,
    pub value: ByteSequence,
}

impl Display for PiPacketMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.value)
    }
}

/// A packet the controller asks the switch to emit.
///
/// `via_tables` says whether the switch should push the packet through its ingress pipeline
/// like a packet received on a port, rather than sending it straight out the egress port named
/// in `metadata`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PiPacketOut {
    pub data: Vec<u8>,
    pub metadata: Vec<PiPacketMetadata>,
    pub via_tables: bool,
}

impl PiPacketOut {
    pub fn metadata(&self, id: &PiPacketMetadataId) -> Option<&PiPacketMetadata> {
        self.metadata.iter().find(|m| &m.id == id)
    }
}

/// A packet the switch sent to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PiPacketIn {
    pub data: Vec<u8>,
    pub metadata: Vec<PiPacketMetadata>,
}

impl PiPacketIn {
    pub fn metadata(&self, id: &PiPacketMetadataId) -> Option<&PiPacketMetadata> {
        self.metadata.iter().find(|m| &m.id == id)
    }
}

impl Display for PiPacketIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "packet-in({} bytes", self.data.len())?;
        for m in &self.metadata {
            write!(f, ", {}", m)?;
        }
        write!(f, ")")
    }
}
