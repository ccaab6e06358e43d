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

use super::error::PipelinerError;
use super::translation::{ObjectiveTranslation, TranslationBuilder};
use super::translator::{ObjectiveTranslator, TranslatorBase};
use crate::p4info::{BASIC_INGRESS_TABLE0_COPY_TO_CPU, BASIC_INGRESS_TABLE0_TABLE0};
use lazy_static::lazy_static;
use pimodel::{
    CriterionType, ForwardingFlag, ForwardingObjective, LogicalPort, PiAction, PortNumber,
    TrafficTreatment,
};
use std::collections::{BTreeSet, HashSet};

lazy_static! {
    static ref TABLE0_CRITERIA: HashSet<CriterionType> = HashSet::from([
        CriterionType::InPort,
        CriterionType::EthDst,
        CriterionType::EthSrc,
        CriterionType::EthType,
        CriterionType::IpProto,
        CriterionType::Ipv4Src,
        CriterionType::Ipv4Dst,
        CriterionType::TcpSrc,
        CriterionType::TcpDst,
        CriterionType::UdpSrc,
        CriterionType::UdpDst,
    ]);
}

pub struct ForwardingObjectiveTranslator {
    base: TranslatorBase,
}

impl ForwardingObjectiveTranslator {
    pub fn new(base: TranslatorBase) -> Self {
        ForwardingObjectiveTranslator { base }
    }

    fn process_versatile_fwd(&self, obj: &ForwardingObjective, result: &mut TranslationBuilder)
                             -> Result<(), PipelinerError> {
        let unsupported_criteria: BTreeSet<CriterionType> = obj.selector.criteria().iter()
            .map(|c| c.criterion_type)
            .filter(|t| !TABLE0_CRITERIA.contains(t))
            .collect();
        if !unsupported_criteria.is_empty() {
            return Err(PipelinerError::UnsupportedCriteria(unsupported_criteria));
        }

        self.table0_rule(obj, result)
    }

    // Only "copy to CPU" is materialized.  Other shapes translate to no flow rules.
    fn table0_rule(&self, obj: &ForwardingObjective, result: &mut TranslationBuilder)
                   -> Result<(), PipelinerError> {
        let treatment = match (&obj.next_id, &obj.treatment) {
            (None, Some(treatment)) => treatment,
            _ => return Ok(()),
        };
        if treatment.instructions().len() == 1
            && matches!(treatment.output_port(), Some(PortNumber::Logical(LogicalPort::Controller)))
        {
            let acl_action = PiAction::new(BASIC_INGRESS_TABLE0_COPY_TO_CPU);
            result.add_flow_rule(self.base.flow_rule(obj, BASIC_INGRESS_TABLE0_TABLE0,
                                                     obj.selector.clone(),
                                                     &TrafficTreatment::pi_action(acl_action))?);
        }
        Ok(())
    }
}

impl ObjectiveTranslator for ForwardingObjectiveTranslator {
    type Objective = ForwardingObjective;
    const KIND: &'static str = "forwarding";

    fn do_translate(&self, obj: &ForwardingObjective)
                    -> Result<ObjectiveTranslation, PipelinerError> {
        let mut result = ObjectiveTranslation::builder();
        match obj.flag {
            ForwardingFlag::Versatile => self.process_versatile_fwd(obj, &mut result)?,
            flag => return Err(PipelinerError::UnsupportedFlag(flag)),
        }
        Ok(result.build())
    }
}
