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

//! Translation layer between the device-independent forwarding model in [`pimodel`] and the
//! `basic` P4 program, on its hardware (`tna`) and software (`v1model`) targets.
//!
//! [`BasicPipeliner`] turns flow objectives into table entries for one device and reports the
//! outcome asynchronously.  [`BasicInterpreter`] maps treatments to table actions and encodes
//! and decodes packet-outs and packet-ins.  Neither installs a `tracing` subscriber; the hosting
//! process does that.

pub mod capabilities;
pub mod interpreter;
pub mod p4info;
pub mod packet;
pub mod pipeliner;
pub mod services;
pub mod treatment;

/// Application name the `basic` pipeline registers under.
pub const APP_NAME: &str = "org.stratumproject.basic-tna";

pub use capabilities::{
    Architecture, BasicCapabilities, Capabilities, PipelineDescriptor, PORT_CPU, PORT_CPU_BMV2,
};
pub use interpreter::{BasicInterpreter, InterpreterError, PipelineInterpreter};
pub use pipeliner::{BasicPipeliner, ObjectiveTranslation, PipelinerContext, PipelinerError};
pub use services::{ApplyBackend, BatchMode, GroupBackend, PortResolver};
