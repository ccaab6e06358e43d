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

//! Static schema of a P4 pipeline: its tables, what they match on, and which actions they may
//! invoke.

use crate::pi::{PiAction, PiActionId, PiActionParamId, PiMatchFieldId, PiTableId};
use std::fmt::{self, Display};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchType {
    Exact,
    Lpm,
    Ternary,
    Range,
    Optional,
}

impl Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MatchType::*;
        let s = match self {
            Exact => "exact",
            Lpm => "LPM",
            Ternary => "ternary",
            Range => "range",
            Optional => "optional",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchFieldModel {
    pub id: PiMatchFieldId,
    pub bit_width: usize,
    pub match_type: MatchType,
}

impl MatchFieldModel {
    pub fn new(id: PiMatchFieldId, bit_width: usize, match_type: MatchType) -> Self {
        MatchFieldModel { id, bit_width, match_type }
    }
}

impl Display for MatchFieldModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field {}: bit<{}> {}-match", self.id, self.bit_width, self.match_type)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionParamModel {
    pub id: PiActionParamId,
    pub bit_width: usize,
}

impl Display for ActionParamModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: bit<{}>", self.id, self.bit_width)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionModel {
    pub id: PiActionId,
    pub params: Vec<ActionParamModel>,
}

impl ActionModel {
    pub fn new(id: PiActionId) -> Self {
        ActionModel { id, params: Vec::new() }
    }

    pub fn with_param(mut self, id: PiActionParamId, bit_width: usize) -> Self {
        self.params.push(ActionParamModel { id, bit_width });
        self
    }

    pub fn param(&self, id: &PiActionParamId) -> Option<&ActionParamModel> {
        self.params.iter().find(|p| &p.id == id)
    }
}

impl Display for ActionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action {}(", self.id)?;
        for (p_index, p) in self.params.iter().enumerate() {
            if p_index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

/// An action as a particular table may use it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRef {
    pub action: ActionModel,
    pub may_be_default: bool, // Allowed as the default action?
    pub may_be_entry: bool,   // Allowed as an entry's action?
}

impl ActionRef {
    pub fn new(action: ActionModel) -> Self {
        ActionRef { action, may_be_default: true, may_be_entry: true }
    }

    pub fn default_only(action: ActionModel) -> Self {
        ActionRef { action, may_be_default: true, may_be_entry: false }
    }
}

impl Display for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.may_be_entry {
            write!(f, "default-only ")?;
        } else if !self.may_be_default {
            write!(f, "not-default ")?;
        }
        write!(f, "{}", self.action)
    }
}

/// Why a [`PiAction`] can't be installed in a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionMismatch {
    /// The table doesn't declare the action, or declares it default-only.
    UnknownAction(PiActionId),
    /// The action doesn't declare the parameter.
    UnknownParam(PiActionParamId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableModel {
    pub id: PiTableId,
    pub match_fields: Vec<MatchFieldModel>,
    pub actions: Vec<ActionRef>,
    pub const_default_action: Option<PiActionId>,
    pub max_entries: Option<u64>,
    pub is_const_table: bool,
}

impl TableModel {
    pub fn match_field(&self, id: &PiMatchFieldId) -> Option<&MatchFieldModel> {
        self.match_fields.iter().find(|mf| &mf.id == id)
    }

    pub fn action(&self, id: &PiActionId) -> Option<&ActionRef> {
        self.actions.iter().find(|ar| &ar.action.id == id)
    }

    /// Checks that `action` may be the action of an entry in this table: the table declares
    /// it for entries, and every parameter it passes is one the action declares.
    pub fn check_entry_action(&self, action: &PiAction) -> Result<(), ActionMismatch> {
        let action_ref = match self.action(&action.id) {
            Some(action_ref) if action_ref.may_be_entry => action_ref,
            _ => return Err(ActionMismatch::UnknownAction(action.id.clone())),
        };
        match action.params.iter().find(|p| action_ref.action.param(&p.id).is_none()) {
            Some(p) => Err(ActionMismatch::UnknownParam(p.id.clone())),
            None => Ok(()),
        }
    }
}

impl Display for TableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {}:", self.id)?;
        for mf in &self.match_fields {
            write!(f, "\t{}", mf)?;
        }
        for ar in &self.actions {
            write!(f, "\t{}", ar)?;
        }
        if let Some(max_entries) = self.max_entries {
            write!(f, "\tsize: {}", max_entries)?;
        }
        if let Some(a) = &self.const_default_action {
            write!(f, "\tconst default action {}", a)?;
        }
        if self.is_const_table {
            write!(f, "\tconst table")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineModel {
    pub tables: Vec<TableModel>,
}

impl PipelineModel {
    pub fn table(&self, id: &PiTableId) -> Option<&TableModel> {
        self.tables.iter().find(|t| &t.id == id)
    }
}
