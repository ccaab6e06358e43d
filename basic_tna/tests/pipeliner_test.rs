mod common;

use anyhow::Result;
use basic_tna::p4info::*;
use basic_tna::pipeliner::{ForwardingObjectiveTranslator, ObjectiveTranslator, TranslatorBase};
use basic_tna::{
    BasicInterpreter, BasicPipeliner, BatchMode, ObjectiveTranslation, PipelineInterpreter,
    PipelinerContext, PortResolver, PORT_CPU,
};
use common::*;
use pimodel::{
    Criterion, CriterionType, FilteringObjective, ForwardingFlag, ForwardingObjective,
    Instruction, NextObjective, NextType, ObjectiveError, Operation, PiAction, PortNumber,
    TrafficSelector, TrafficTreatment,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing_test::traced_test;

struct Setup {
    pipeliner: BasicPipeliner,
    backend: Arc<RecordingBackend>,
    groups: Arc<RecordingGroupBackend>,
}

impl Setup {
    fn new() -> Self {
        Self::with_backend(RecordingBackend::default())
    }

    fn with_backend(backend: RecordingBackend) -> Self {
        let backend = Arc::new(backend);
        let groups = Arc::new(RecordingGroupBackend::default());
        let context = PipelinerContext {
            apply_backend: backend.clone(),
            group_backend: groups.clone(),
            port_resolver: Some(FakePortResolver::new(&[1, 2, 3]) as Arc<dyn PortResolver>),
            runtime: Handle::current(),
        };
        let pipeliner = BasicPipeliner::init(device_id(), tna_capabilities(), context);
        Setup { pipeliner, backend, groups }
    }
}

fn acl_selector() -> TrafficSelector {
    TrafficSelector::new()
        .with(Criterion::in_port(&PortNumber::physical(1)))
        .with(Criterion::eth_type(0x0800))
}

fn punt_objective() -> ForwardingObjective {
    ForwardingObjective::versatile(acl_selector(), 40000, app_id())
        .with_treatment(TrafficTreatment::output(PortNumber::CONTROLLER))
}

fn translator() -> ForwardingObjectiveTranslator {
    let interpreter = Arc::new(BasicInterpreter::new(tna_capabilities(), None));
    ForwardingObjectiveTranslator::new(TranslatorBase::new(device_id(),
                                                           interpreter as Arc<dyn PipelineInterpreter>))
}

#[test]
fn punt_to_controller_translates_to_copy_to_cpu() {
    let translation = translator().translate(&punt_objective());
    let flow_rules = translation.flow_rules();
    assert_eq!(translation.error(), None);
    assert_eq!(flow_rules.len(), 1);

    let rule = &flow_rules[0];
    assert_eq!(rule.device_id, device_id());
    assert_eq!(rule.table_id, BASIC_INGRESS_TABLE0_TABLE0);
    assert_eq!(rule.selector, acl_selector());
    assert_eq!(rule.action, PiAction::new(BASIC_INGRESS_TABLE0_COPY_TO_CPU));
    assert!(rule.action.params.is_empty());
    assert_eq!(rule.priority, 40000);
    assert_eq!(rule.app_id, app_id());
    assert!(rule.permanent);
}

#[test]
fn other_shapes_translate_to_nothing() {
    let translator = translator();
    let no_op = |obj: ForwardingObjective| {
        assert_eq!(translator.translate(&obj), ObjectiveTranslation::FlowRules(vec![]));
    };

    no_op(ForwardingObjective::versatile(acl_selector(), 10, app_id()));
    no_op(punt_objective().with_next_id(5));
    no_op(ForwardingObjective::versatile(acl_selector(), 10, app_id())
          .with_treatment(TrafficTreatment::output(PortNumber::physical(2))));
    no_op(ForwardingObjective::versatile(acl_selector(), 10, app_id())
          .with_treatment(TrafficTreatment::new(vec![
              Instruction::Output(PortNumber::CONTROLLER),
              Instruction::Output(PortNumber::physical(2)),
          ])));
}

#[test]
#[traced_test]
fn unsupported_criteria_are_all_named() {
    let selector = acl_selector()
        .with(Criterion::vlan_vid(10))
        .with(Criterion::new(CriterionType::Ipv6Dst, 1u64));
    let obj = ForwardingObjective::versatile(selector, 10, app_id())
        .with_treatment(TrafficTreatment::output(PortNumber::CONTROLLER));

    assert_eq!(translator().translate(&obj), ObjectiveTranslation::Error(ObjectiveError::Unsupported));
    assert!(logs_contain("Cannot translate forwarding objective: unsupported ACL criteria [VLAN_VID, IPV6_DST]"));
}

#[test]
fn only_versatile_is_supported() {
    for flag in [ForwardingFlag::Specific, ForwardingFlag::Egress] {
        let obj = punt_objective().with_flag(flag);
        assert_eq!(translator().translate(&obj).error(), Some(ObjectiveError::Unsupported));
    }
}

#[test]
fn pi_treatment_passes_through_schema_check() {
    let base = TranslatorBase::new(device_id(),
                                   Arc::new(BasicInterpreter::new(tna_capabilities(), None))
                                   as Arc<dyn PipelineInterpreter>);
    let obj = punt_objective();

    let action = PiAction::new(BASIC_INGRESS_TABLE0_SET_EGRESS_PORT).with_param(PORT_NUM, 4u64);
    let rule = base.flow_rule(&obj, BASIC_INGRESS_TABLE0_TABLE0, acl_selector(),
                              &TrafficTreatment::pi_action(action.clone()))
        .unwrap();
    assert_eq!(rule.action, action);

    let not_in_table = PiAction::new(NOP);
    let error = base.flow_rule(&obj, BASIC_INGRESS_TABLE0_TABLE0, acl_selector(),
                               &TrafficTreatment::pi_action(not_in_table))
        .unwrap_err();
    assert_eq!(error.objective_error(), ObjectiveError::BadParams);

    let bad_param = PiAction::new(BASIC_INGRESS_TABLE0_SET_EGRESS_PORT).with_param(CPU_PORT, 4u64);
    let error = base.flow_rule(&obj, BASIC_INGRESS_TABLE0_TABLE0, acl_selector(),
                               &TrafficTreatment::pi_action(bad_param))
        .unwrap_err();
    assert_eq!(error.objective_error(), ObjectiveError::BadParams);

    let unsupported = base.flow_rule(&obj, BASIC_INGRESS_TABLE0_TABLE0, acl_selector(),
                                     &TrafficTreatment::new(vec![Instruction::Group(3)]))
        .unwrap_err();
    assert_eq!(unsupported.objective_error(), ObjectiveError::Unsupported);
}

#[tokio::test]
#[traced_test]
async fn init_logs_app_name() {
    let setup = Setup::new();
    assert_eq!(setup.pipeliner.device_id(), &device_id());
    assert!(logs_contain(&format!("{} pipeliner initialized", basic_tna::APP_NAME)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn forward_applies_batch_and_succeeds() -> Result<()> {
    let setup = Setup::new();
    let context = RecordingContext::new();
    setup.pipeliner.forward(punt_objective().with_context(context.clone()));

    let (outcome, callback_thread) = context.wait_for_outcome()?;
    assert_eq!(outcome, Outcome::Success);
    assert_ne!(callback_thread, thread::current().id());

    let batches = setup.backend.batches();
    assert_eq!(batches.len(), 1);
    let (device, rules, mode) = &batches[0];
    assert_eq!(device, &device_id());
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].action, PiAction::new(BASIC_INGRESS_TABLE0_COPY_TO_CPU));
    assert_eq!(*mode, BatchMode::Apply);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn remove_withdraws_batch() -> Result<()> {
    let setup = Setup::new();
    for (op, expected) in [(Operation::Add, BatchMode::Apply),
                           (Operation::AddToExisting, BatchMode::Apply),
                           (Operation::Modify, BatchMode::Apply),
                           (Operation::Remove, BatchMode::Withdraw),
                           (Operation::RemoveFromExisting, BatchMode::Withdraw)] {
        let context = RecordingContext::new();
        setup.pipeliner.forward(punt_objective().with_op(op).with_context(context.clone()));
        assert_eq!(context.wait_for_outcome()?.0, Outcome::Success);
        assert_eq!(setup.backend.batches().last().map(|b| b.2), Some(expected));
    }
    assert_eq!(setup.backend.batches().len(), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_translation_still_succeeds() -> Result<()> {
    let setup = Setup::new();
    let context = RecordingContext::new();
    let obj = ForwardingObjective::versatile(acl_selector(), 10, app_id())
        .with_treatment(TrafficTreatment::output(PortNumber::physical(2)))
        .with_context(context.clone());
    setup.pipeliner.forward(obj);

    assert_eq!(context.wait_for_outcome()?.0, Outcome::Success);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(context.count(), 1);
    assert!(setup.backend.batches().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn translation_error_fails_without_backend() -> Result<()> {
    let setup = Setup::new();
    let context = RecordingContext::new();
    let obj = ForwardingObjective::versatile(acl_selector().with(Criterion::vlan_vid(10)), 10, app_id())
        .with_treatment(TrafficTreatment::output(PortNumber::CONTROLLER))
        .with_context(context.clone());
    setup.pipeliner.forward(obj);

    let (outcome, callback_thread) = context.wait_for_outcome()?;
    assert_eq!(outcome, Outcome::Error(ObjectiveError::Unsupported));
    assert_ne!(callback_thread, thread::current().id());
    assert!(setup.backend.batches().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn backend_failure_is_reported() -> Result<()> {
    let setup = Setup::with_backend(RecordingBackend::failing());
    let context = RecordingContext::new();
    setup.pipeliner.forward(punt_objective().with_context(context.clone()));

    assert_eq!(context.wait_for_outcome()?.0, Outcome::Error(ObjectiveError::FlowInstallationFailed));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn filtering_and_next_are_unsupported() -> Result<()> {
    let setup = Setup::new();

    let context = RecordingContext::new();
    setup.pipeliner.filter(FilteringObjective {
        key: Some(Criterion::in_port(&PortNumber::physical(1))),
        conditions: vec![Criterion::eth_type(0x0800)],
        meta: None,
        priority: 10,
        app_id: app_id(),
        op: Operation::Add,
        context: Some(pimodel::ContextHandle(context.clone())),
    });
    assert_eq!(context.wait_for_outcome()?.0, Outcome::Error(ObjectiveError::Unsupported));

    let context = RecordingContext::new();
    setup.pipeliner.next(NextObjective {
        id: 1,
        next_type: NextType::Simple,
        treatments: vec![TrafficTreatment::output(PortNumber::physical(1))],
        priority: 0,
        app_id: app_id(),
        op: Operation::Add,
        context: Some(pimodel::ContextHandle(context.clone())),
    });
    assert_eq!(context.wait_for_outcome()?.0, Outcome::Error(ObjectiveError::Unsupported));
    assert!(setup.backend.batches().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn purge_all_purges_flows_and_groups() -> Result<()> {
    let setup = Setup::new();
    setup.pipeliner.purge_all(&app_id())?;
    assert_eq!(*setup.backend.purged.lock().unwrap(), vec![(device_id(), app_id())]);
    assert_eq!(*setup.groups.purged.lock().unwrap(), vec![(device_id(), app_id())]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn objective_without_context_is_applied() -> Result<()> {
    let setup = Setup::new();
    setup.pipeliner.forward(punt_objective());
    assert_eq!(setup.backend.batches().len(), 1);
    assert_eq!(setup.pipeliner.interpreter().map_logical_port(&PortNumber::CONTROLLER),
               Some(PORT_CPU));
    Ok(())
}
