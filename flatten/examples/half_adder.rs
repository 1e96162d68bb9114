//! Builds a half adder out of library circuits and prints its truth table.

use logicol_flatten::evaluate;
use logicol_netlist::{CircuitId, ComponentId, ComponentKind, Project};

fn set_input(project: &mut Project, circuit: CircuitId, input: ComponentId, value: bool) {
    let current = project
        .circuit(circuit)
        .unwrap()
        .component(input)
        .unwrap()
        .outputs[0];
    if current != value {
        project.toggle_input(circuit, input).unwrap();
    }
}

fn main() {
    logicol_logger::setup();

    let mut project = Project::default();

    // XOR components resolve against a circuit of that name; build it as
    // AND(OR(a, b), NOT(AND(a, b)))
    let xor = project.add_circuit("XOR").unwrap();
    let a = project.add_component(xor, ComponentKind::Input).unwrap();
    let b = project.add_component(xor, ComponentKind::Input).unwrap();
    let either = project.add_component(xor, ComponentKind::Or).unwrap();
    let both = project.add_component(xor, ComponentKind::And).unwrap();
    let not_both = project.add_component(xor, ComponentKind::Not).unwrap();
    let result = project.add_component(xor, ComponentKind::And).unwrap();
    let out = project.add_component(xor, ComponentKind::Output).unwrap();
    project.set_connection(xor, either, 0, a, 0).unwrap();
    project.set_connection(xor, either, 1, b, 0).unwrap();
    project.set_connection(xor, both, 0, a, 0).unwrap();
    project.set_connection(xor, both, 1, b, 0).unwrap();
    project.set_connection(xor, not_both, 0, both, 0).unwrap();
    project.set_connection(xor, result, 0, either, 0).unwrap();
    project.set_connection(xor, result, 1, not_both, 0).unwrap();
    project.set_connection(xor, out, 0, result, 0).unwrap();

    let adder = project.add_circuit("HALF_ADDER").unwrap();
    let a = project.add_component(adder, ComponentKind::Input).unwrap();
    let b = project.add_component(adder, ComponentKind::Input).unwrap();
    let sum = project.add_component(adder, ComponentKind::Xor).unwrap();
    let carry = project.add_component(adder, ComponentKind::And).unwrap();
    let sum_out = project.add_component(adder, ComponentKind::Output).unwrap();
    let carry_out = project.add_component(adder, ComponentKind::Output).unwrap();
    project.set_connection(adder, sum, 0, a, 0).unwrap();
    project.set_connection(adder, sum, 1, b, 0).unwrap();
    project.set_connection(adder, carry, 0, a, 0).unwrap();
    project.set_connection(adder, carry, 1, b, 0).unwrap();
    project.set_connection(adder, sum_out, 0, sum, 0).unwrap();
    project.set_connection(adder, carry_out, 0, carry, 0).unwrap();

    for (va, vb) in [(false, false), (false, true), (true, false), (true, true)] {
        set_input(&mut project, adder, a, va);
        set_input(&mut project, adder, b, vb);
        let outputs = evaluate(&mut project, adder).unwrap();
        log::info!(
            "{} + {} = sum {}, carry {}",
            va as u8,
            vb as u8,
            outputs[0] as u8,
            outputs[1] as u8,
        );
    }
}
