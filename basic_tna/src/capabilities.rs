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

//! Static facts about one pipeline instance, derived from its descriptor.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use tracing::error;

/// CPU port on the hardware (`tna`) target.
pub const PORT_CPU: u64 = 0xFFFF_FFFD;
/// CPU port on the software (`v1model`) target.
pub const PORT_CPU_BMV2: u64 = 255;

// Chip families and how many pipes each has.  First match wins.
const CHIP_FAMILIES: &[(&str, u32)] = &[("montara", 2), ("mavericks", 4)];

/// Architecture a P4 program was compiled for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    V1Model,
    Tna,
    Psa,
}

impl Architecture {
    pub fn name(self) -> &'static str {
        match self {
            Architecture::V1Model => "v1model",
            Architecture::Tna => "tna",
            Architecture::Psa => "psa",
        }
    }
}

impl Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identifies a pipeline configuration, e.g. `org.stratumproject.basic.montara_sde_9_7_0`, and
/// the architecture it targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDescriptor {
    pub id: String,
    #[serde(default)]
    pub architecture: Option<Architecture>,
}

impl PipelineDescriptor {
    pub fn new<S: Into<String>>(id: S, architecture: Option<Architecture>) -> Self {
        PipelineDescriptor { id: id.into(), architecture }
    }

    /// Parses a JSON descriptor, e.g. `{"id": "...", "architecture": "tna"}`.
    pub fn from_json(blob: &[u8]) -> Result<Self> {
        serde_json::from_slice(blob).context("parsing pipeline descriptor")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let blob = fs::read(path)
            .with_context(|| format!("{}: could not read pipeline descriptor", path.display()))?;
        Self::from_json(&blob).with_context(|| format!("{}: bad pipeline descriptor", path.display()))
    }
}

/// Summary of what [`BasicCapabilities`] derives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub architecture: Option<Architecture>,
    pub hw_pipe_count: u32,
    pub cpu_port: u64,
}

/// Capabilities of the `basic` program on a particular target.
#[derive(Clone, Debug)]
pub struct BasicCapabilities {
    descriptor: PipelineDescriptor,
}

impl BasicCapabilities {
    pub fn new(descriptor: PipelineDescriptor) -> Self {
        BasicCapabilities { descriptor }
    }

    pub fn descriptor(&self) -> &PipelineDescriptor {
        &self.descriptor
    }

    /// Number of hardware pipes on the chip the descriptor names, or 0 if the chip is unknown.
    /// Zero means "unknown", not "no pipes".
    pub fn hw_pipe_count(&self) -> u32 {
        let id = &self.descriptor.id;
        match CHIP_FAMILIES.iter().find(|(family, _)| id.contains(family)) {
            Some((_, pipes)) => *pipes,
            None => {
                error!("Unable to derive HW pipe count from pipeconf ID: {}", id);
                0
            }
        }
    }

    pub fn is_architecture(&self, name: &str) -> bool {
        self.descriptor.architecture.map_or(false, |a| a.name() == name)
    }

    pub fn is_arch_tna(&self) -> bool {
        self.is_architecture(Architecture::Tna.name())
    }

    pub fn is_arch_v1model(&self) -> bool {
        self.is_architecture(Architecture::V1Model.name())
    }

    /// The port number that means "send to the controller".  Always `Some`.
    pub fn cpu_port(&self) -> Option<u64> {
        if self.is_arch_tna() {
            Some(PORT_CPU)
        } else {
            Some(PORT_CPU_BMV2)
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            architecture: self.descriptor.architecture,
            hw_pipe_count: self.hw_pipe_count(),
            cpu_port: self.cpu_port().unwrap_or(PORT_CPU_BMV2),
        }
    }
}
