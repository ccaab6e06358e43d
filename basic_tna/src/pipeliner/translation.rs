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

use pimodel::{FlowRule, ObjectiveError};

/// Outcome of translating one objective: either the flow rules that implement it, or why it
/// can't be implemented.  Never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectiveTranslation {
    FlowRules(Vec<FlowRule>),
    Error(ObjectiveError),
}

impl ObjectiveTranslation {
    pub fn of_error(error: ObjectiveError) -> Self {
        ObjectiveTranslation::Error(error)
    }

    pub fn builder() -> TranslationBuilder {
        TranslationBuilder::default()
    }

    /// The flow rules, which are empty for an error.
    pub fn flow_rules(&self) -> &[FlowRule] {
        match self {
            ObjectiveTranslation::FlowRules(rules) => rules,
            ObjectiveTranslation::Error(_) => &[],
        }
    }

    pub fn error(&self) -> Option<ObjectiveError> {
        match self {
            ObjectiveTranslation::FlowRules(_) => None,
            ObjectiveTranslation::Error(e) => Some(*e),
        }
    }
}

/// Accumulates the flow rules of a successful translation.  Adding a rule twice keeps one.
#[derive(Clone, Debug, Default)]
pub struct TranslationBuilder {
    flow_rules: Vec<FlowRule>,
}

impl TranslationBuilder {
    pub fn add_flow_rule(&mut self, flow_rule: FlowRule) -> &mut Self {
        if !self.flow_rules.contains(&flow_rule) {
            self.flow_rules.push(flow_rule);
        }
        self
    }

    pub fn build(self) -> ObjectiveTranslation {
        ObjectiveTranslation::FlowRules(self.flow_rules)
    }
}
