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

use crate::interpreter::InterpreterError;
use itertools::Itertools;
use pimodel::{
    CriterionType, ForwardingFlag, ObjectiveError, PiActionId, PiActionParamId, PiTableId,
};
use std::collections::BTreeSet;
use thiserror::Error;

/// Error translating an objective into flow rules.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PipelinerError {
    #[error("unsupported forwarding objective flag {0:?}")]
    UnsupportedFlag(ForwardingFlag),

    #[error("unsupported ACL criteria [{}]", .0.iter().join(", "))]
    UnsupportedCriteria(BTreeSet<CriterionType>),

    #[error("unable to map treatment for table '{table}': {source}")]
    Treatment { table: PiTableId, source: InterpreterError },

    #[error("table '{0}' is not part of the pipeline")]
    UnknownTable(PiTableId),

    #[error("action '{action}' is not allowed in table '{table}'")]
    ActionNotInTable { table: PiTableId, action: PiActionId },

    #[error("action '{action}' of table '{table}' has no parameter '{param}'")]
    UndeclaredParam { table: PiTableId, action: PiActionId, param: PiActionParamId },

    #[error("{0} objectives are not supported by this pipeline")]
    UnsupportedObjective(&'static str),
}

impl PipelinerError {
    /// The error code reported to the objective's owner.
    pub fn objective_error(&self) -> ObjectiveError {
        match self {
            PipelinerError::Treatment { source: InterpreterError::MissingAction { .. }, .. } => {
                ObjectiveError::Unknown
            }
            PipelinerError::UnknownTable(_)
            | PipelinerError::ActionNotInTable { .. }
            | PipelinerError::UndeclaredParam { .. } => ObjectiveError::BadParams,
            _ => ObjectiveError::Unsupported,
        }
    }
}
