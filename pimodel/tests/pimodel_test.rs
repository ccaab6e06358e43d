extern crate pimodel;

use hwaddr::HwAddr;
use ::packet::Builder;
use pimodel::*;
use proptest::prelude::*;

fn lldp_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![
        0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e, // dst
        0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // src
        0x88, 0xcc,                         // ethertype
    ];
    frame.extend_from_slice(payload);
    frame
}

fn udp_frame(dst: HwAddr, src: HwAddr) -> ::packet::Result<Frame> {
    Ok(Frame(::packet::ether::Builder::default().destination(dst)?.source(src)?
             .ip()?.v4()?.destination([1, 2, 3, 4].into())?
             .udp()?.source(1234)?.destination(2345)?
             .build()?))
}

fn table0() -> TableModel {
    TableModel {
        id: PiTableId::of("ingress.table0"),
        match_fields: vec![MatchFieldModel::new(PiMatchFieldId::of("ig_port"), 32, MatchType::Ternary)],
        actions: vec![
            ActionRef::new(ActionModel::new(PiActionId::of("ingress.fwd"))
                           .with_param(PiActionParamId::of("port"), 32)),
            ActionRef::default_only(ActionModel::new(PiActionId::of("ingress.miss"))),
        ],
        const_default_action: None,
        max_entries: Some(1024),
        is_const_table: false,
    }
}

#[test]
fn fit_pads_to_declared_width() {
    let fitted = ByteSequence::from_u64(5).fit(32).unwrap();
    assert_eq!(fitted.as_slice(), &[0, 0, 0, 5]);

    let fitted = ByteSequence::from_bytes(vec![]).fit(7).unwrap();
    assert_eq!(fitted.as_slice(), &[0]);
}

#[test]
fn fit_refuses_to_truncate() {
    assert_eq!(ByteSequence::from_u64(0x100).fit(8),
               Err(TrimError::TooWide { bit_length: 9, bit_width: 8 }));
    assert_eq!(ByteSequence::from_u64(1).fit(0), Err(TrimError::ZeroWidth));
}

#[test]
fn to_u32_accepts_short_and_long_inputs() {
    assert_eq!(ByteSequence::from_bytes(vec![0x01, 0x02]).to_u32(), Ok(0x0102));
    assert_eq!(ByteSequence::from_u64(0xffff_fffd).to_u32(), Ok(0xffff_fffd));
    assert!(ByteSequence::from_u64(1 << 32).to_u32().is_err());
}

proptest! {
    #[test]
    fn fit_preserves_value(value in any::<u32>(), bit_width in 1usize..=64) {
        let bytes = ByteSequence::from_u64(value as u64);
        match bytes.fit(bit_width) {
            Ok(fitted) => {
                prop_assert!(bytes.bit_length() <= bit_width);
                prop_assert_eq!(fitted.len(), bit_width.div_ceil(8));
                prop_assert_eq!(fitted.to_u64(), Ok(value as u64));
            }
            Err(e) => {
                prop_assert!(bytes.bit_length() > bit_width);
                prop_assert_eq!(e, TrimError::TooWide { bit_length: bytes.bit_length(), bit_width });
            }
        }
    }
}

#[test]
fn port_numbers() {
    assert_eq!(PortNumber::CONTROLLER.to_u64(), 0xffff_fffd);
    assert_eq!(PortNumber::FLOOD.to_string(), "FLOOD");
    assert!(PortNumber::TABLE.is_logical());

    let port = PortNumber::named(7, "eth7");
    assert!(port.has_name());
    assert_eq!(port.to_string(), "[eth7](7)");
    assert_eq!(PortNumber::physical(7).to_string(), "7");
    assert!(!PortNumber::physical(7).has_name());
}

#[test]
fn selector_keeps_one_criterion_per_type() {
    let selector = TrafficSelector::new()
        .with(Criterion::eth_type(0x0800))
        .with(Criterion::in_port(&PortNumber::physical(1)))
        .with(Criterion::eth_type(0x86dd));
    assert_eq!(selector.criteria().len(), 2);
    assert_eq!(selector.criterion(CriterionType::EthType),
               Some(&Criterion::eth_type(0x86dd)));
}

#[test]
fn treatment_helpers() {
    let drop = TrafficTreatment::drop();
    assert!(drop.instructions().is_empty());
    assert!(drop.cleared_deferred());
    assert!(!TrafficTreatment::default().cleared_deferred());

    let output = TrafficTreatment::output(PortNumber::physical(3));
    assert_eq!(output.output_port(), Some(&PortNumber::physical(3)));
    assert_eq!(output.as_pi_action(), None);

    let action = PiAction::new(PiActionId::of("ingress.fwd"));
    assert_eq!(TrafficTreatment::pi_action(action.clone()).as_pi_action(), Some(&action));
}

#[test]
fn table_checks_entry_actions() {
    let table = table0();
    let fwd = PiAction::new(PiActionId::of("ingress.fwd"))
        .with_param(PiActionParamId::of("port"), 1u64);
    assert_eq!(table.check_entry_action(&fwd), Ok(()));

    let miss = PiAction::new(PiActionId::of("ingress.miss"));
    assert_eq!(table.check_entry_action(&miss),
               Err(ActionMismatch::UnknownAction(PiActionId::of("ingress.miss"))));

    let bad_param = PiAction::new(PiActionId::of("ingress.fwd"))
        .with_param(PiActionParamId::of("vlan"), 1u64);
    assert_eq!(table.check_entry_action(&bad_param),
               Err(ActionMismatch::UnknownParam(PiActionParamId::of("vlan"))));

    let model = PipelineModel { tables: vec![table] };
    assert!(model.table(&PiTableId::of("ingress.table0")).is_some());
    assert!(model.table(&PiTableId::of("egress.table0")).is_none());
}

#[test]
fn decode_ethernet() {
    let data = lldp_frame(&[1, 2, 3]);
    let eth = Ethernet::deserialize(&data).unwrap();
    assert_eq!(eth.destination, HwAddr::from([0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e]));
    assert_eq!(eth.source, HwAddr::from([0x00, 0x00, 0x00, 0x00, 0x00, 0x01]));
    assert_eq!(eth.ether_type, 0x88cc);
    assert_eq!(eth.payload, vec![1, 2, 3]);

    assert!(format!("{:?}", Frame(data)).starts_with("eth(dst="));
}

#[test]
fn decode_udp_frame() {
    let e0: HwAddr = [0x00, 0x11, 0x11, 0x00, 0x00, 0x00].into();
    let e1: HwAddr = [0x00, 0x22, 0x22, 0x00, 0x00, 0x00].into();
    let frame = udp_frame(e0, e1).unwrap();

    let eth = Ethernet::deserialize(&frame.0).unwrap();
    assert_eq!(eth.destination, e0);
    assert_eq!(eth.source, e1);
    assert_eq!(eth.ether_type, 0x0800);
    assert!(format!("{:?}", frame).contains("ipv4(dst=1.2.3.4"));
}

#[test]
fn decode_short_frame() {
    assert_eq!(Ethernet::deserialize(&[0u8; 10]), Err(FrameError::TooShort(10)));
}

#[test]
fn fit_rounds_up_to_whole_bytes() {
    assert_eq!(ByteSequence::from_u64(1).fit(7).map(|b| b.len()), Ok(1));
    assert_eq!(ByteSequence::from_u64(1).fit(8).map(|b| b.len()), Ok(1));
    assert_eq!(ByteSequence::from_u64(1).fit(9).map(|b| b.len()), Ok(2));
}

#[test]
fn decode_vlan_tagged_frame() {
    let mut data = vec![
        0x00, 0x11, 0x11, 0x00, 0x00, 0x00, // dst
        0x00, 0x22, 0x22, 0x00, 0x00, 0x00, // src
        0x81, 0x00, 0x20, 0x0a,             // 802.1Q, PCP 1, VID 10
        0x08, 0x00,                         // ethertype
    ];
    data.extend_from_slice(&[0x45, 0x00]);

    let eth = Ethernet::deserialize(&data).unwrap();
    assert_eq!(eth.vlan_id, Some(10));
    assert_eq!(eth.ether_type, 0x0800);
    assert_eq!(eth.payload, vec![0x45, 0x00]);

    assert_eq!(Ethernet::deserialize(&data[..16]), Err(FrameError::TooShort(16)));
    assert_eq!(Ethernet::deserialize(&lldp_frame(&[])).map(|eth| eth.vlan_id), Ok(None));
}
