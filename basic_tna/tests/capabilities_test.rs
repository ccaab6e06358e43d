mod common;

use anyhow::Result;
use basic_tna::{
    Architecture, BasicCapabilities, Capabilities, PipelineDescriptor, PORT_CPU, PORT_CPU_BMV2,
};
use common::*;
use std::io::Write;
use tracing_test::traced_test;

fn capabilities(id: &str, architecture: Option<Architecture>) -> BasicCapabilities {
    BasicCapabilities::new(PipelineDescriptor::new(id, architecture))
}

#[test]
fn hw_pipe_count_by_chip_family() {
    assert_eq!(capabilities("org.stratumproject.basic.montara_sde_9_7_0", None).hw_pipe_count(), 2);
    assert_eq!(capabilities("org.stratumproject.basic.mavericks_sde_9_7_0", None).hw_pipe_count(), 4);
}

#[test]
#[traced_test]
fn hw_pipe_count_unknown_chip() {
    assert_eq!(capabilities("org.stratumproject.basic.bmv2", None).hw_pipe_count(), 0);
    assert!(logs_contain("Unable to derive HW pipe count from pipeconf ID: org.stratumproject.basic.bmv2"));
}

#[test]
fn cpu_port_by_architecture() {
    assert_eq!(tna_capabilities().cpu_port(), Some(PORT_CPU));
    assert_eq!(v1model_capabilities().cpu_port(), Some(PORT_CPU_BMV2));
    assert_eq!(capabilities("basic", Some(Architecture::Psa)).cpu_port(), Some(PORT_CPU_BMV2));
    assert_eq!(capabilities("basic", None).cpu_port(), Some(PORT_CPU_BMV2));
}

#[test]
fn architecture_predicates() {
    let tna = tna_capabilities();
    assert!(tna.is_arch_tna());
    assert!(!tna.is_arch_v1model());
    assert!(tna.is_architecture("tna"));

    let unknown = capabilities("basic", None);
    assert!(!unknown.is_arch_tna());
    assert!(!unknown.is_arch_v1model());
    assert!(!unknown.is_architecture("v1model"));
}

#[test]
fn summary() {
    assert_eq!(tna_capabilities().capabilities(),
               Capabilities { architecture: Some(Architecture::Tna), hw_pipe_count: 2, cpu_port: PORT_CPU });
}

#[test]
fn descriptor_from_json() -> Result<()> {
    let descriptor = PipelineDescriptor::from_json(
        br#"{"id": "org.stratumproject.basic.mavericks_sde_9_7_0", "architecture": "v1model"}"#)?;
    assert_eq!(descriptor.architecture, Some(Architecture::V1Model));
    assert_eq!(BasicCapabilities::new(descriptor).hw_pipe_count(), 4);

    let descriptor = PipelineDescriptor::from_json(br#"{"id": "basic"}"#)?;
    assert_eq!(descriptor.architecture, None);

    assert!(PipelineDescriptor::from_json(br#"{"id": "basic", "architecture": "ebpf"}"#).is_err());
    Ok(())
}

#[test]
fn descriptor_from_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("basic_tna_descriptor_{}.json", std::process::id()));
    std::fs::File::create(&path)?
        .write_all(br#"{"id": "org.stratumproject.basic.montara", "architecture": "tna"}"#)?;
    let descriptor = PipelineDescriptor::from_file(&path);
    std::fs::remove_file(&path)?;
    assert_eq!(descriptor?.architecture, Some(Architecture::Tna));

    let missing = PipelineDescriptor::from_file("/nonexistent/descriptor.json").unwrap_err();
    assert!(format!("{:#}", missing).contains("could not read pipeline descriptor"));
    Ok(())
}
