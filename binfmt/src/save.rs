use bytes::BufMut;
use logicol_netlist::{Component, Project};

/// Serializes a project into the binary layout.
///
/// The inverse of [`load`][crate::load]: any project saved here loads back
/// structurally identical, including positions, live output values and
/// unconnected slots.
pub fn save(project: &Project) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.put_u64_le(project.circuits.len() as u64);
    for circuit in &project.circuits {
        buf.put_u64_le(circuit.id.get());
        put_name(&mut buf, &circuit.name);
        buf.put_u64_le(circuit.components.len() as u64);
        for component in &circuit.components {
            put_component(&mut buf, component);
        }
    }
    buf
}

fn put_name(buf: &mut Vec<u8>, name: &str) {
    buf.put_u64_le(name.len() as u64);
    buf.put_slice(name.as_bytes());
}

fn put_component(buf: &mut Vec<u8>, component: &Component) {
    buf.put_u64_le(component.id.get());
    buf.put_f32_le(component.position.0);
    buf.put_f32_le(component.position.1);
    put_name(buf, component.kind.name());

    buf.put_u64_le(component.inputs.len() as u64);
    for slot in &component.inputs {
        match slot {
            Some(driver) => {
                buf.put_u64_le(driver.output as u64);
                buf.put_u64_le(driver.component.get());
            }
            None => {
                buf.put_u64_le(0);
                buf.put_u64_le(0);
            }
        }
    }

    buf.put_u64_le(component.outputs.len() as u64);
    for &value in &component.outputs {
        buf.put_u8(value as u8);
    }
}
