use logicol_flatten::{elaborate, evaluate, CompileError, Evaluator, Node};
use logicol_netlist::{CircuitId, ComponentId, ComponentKind, Project};

/// Builds `name` as two INPUTs feeding one binary gate feeding one OUTPUT.
fn binary_gate_circuit(
    project: &mut Project,
    name: &str,
    kind: ComponentKind,
) -> (CircuitId, ComponentId, ComponentId) {
    let circuit = project.add_circuit(name).unwrap();
    let a = project.add_component(circuit, ComponentKind::Input).unwrap();
    let b = project.add_component(circuit, ComponentKind::Input).unwrap();
    let gate = project.add_component(circuit, kind).unwrap();
    let out = project
        .add_component(circuit, ComponentKind::Output)
        .unwrap();
    project.set_connection(circuit, gate, 0, a, 0).unwrap();
    project.set_connection(circuit, gate, 1, b, 0).unwrap();
    project.set_connection(circuit, out, 0, gate, 0).unwrap();
    (circuit, a, b)
}

/// Builds `name` as one INPUT feeding one NOT feeding one OUTPUT.
fn inverter_circuit(project: &mut Project, name: &str) -> (CircuitId, ComponentId) {
    let circuit = project.add_circuit(name).unwrap();
    let input = project.add_component(circuit, ComponentKind::Input).unwrap();
    let gate = project.add_component(circuit, ComponentKind::Not).unwrap();
    let out = project
        .add_component(circuit, ComponentKind::Output)
        .unwrap();
    project.set_connection(circuit, gate, 0, input, 0).unwrap();
    project.set_connection(circuit, out, 0, gate, 0).unwrap();
    (circuit, input)
}

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

#[test]
fn not_gate_inverts() {
    let mut project = Project::default();
    let (circuit, input) = inverter_circuit(&mut project, "MAIN");

    assert_eq!(evaluate(&mut project, circuit).unwrap(), [true]);
    set_input(&mut project, circuit, input, true);
    assert_eq!(evaluate(&mut project, circuit).unwrap(), [false]);
}

#[test]
fn and_gate_truth_table() {
    let mut project = Project::default();
    let (circuit, a, b) = binary_gate_circuit(&mut project, "MAIN", ComponentKind::And);
    for (va, vb, expected) in [
        (false, false, false),
        (false, true, false),
        (true, false, false),
        (true, true, true),
    ] {
        set_input(&mut project, circuit, a, va);
        set_input(&mut project, circuit, b, vb);
        assert_eq!(evaluate(&mut project, circuit).unwrap(), [expected]);
    }
}

#[test]
fn or_gate_truth_table() {
    let mut project = Project::default();
    let (circuit, a, b) = binary_gate_circuit(&mut project, "MAIN", ComponentKind::Or);
    for (va, vb, expected) in [
        (false, false, false),
        (false, true, true),
        (true, false, true),
        (true, true, true),
    ] {
        set_input(&mut project, circuit, a, va);
        set_input(&mut project, circuit, b, vb);
        assert_eq!(evaluate(&mut project, circuit).unwrap(), [expected]);
    }
}

#[test]
fn gates_expand_into_universal_nodes() {
    let mut project = Project::default();
    let (circuit, _) = inverter_circuit(&mut project, "INV");
    let network = elaborate(&project, project.circuit(circuit).unwrap()).unwrap();
    // NOT x is a single gate with both children on x
    assert_eq!(network.len(), 2);
    let root = network.roots()[0];
    let Node::Universal(left, right) = network.node(root) else {
        panic!("expected a gate at the root");
    };
    assert_eq!(left, right);
    assert_eq!(network.node(left), Node::Leaf(false));

    let (circuit, _, _) = binary_gate_circuit(&mut project, "CONJ", ComponentKind::And);
    let network = elaborate(&project, project.circuit(circuit).unwrap()).unwrap();
    // AND is the negation of one inner gate over the two operands
    assert_eq!(network.len(), 4);
    let Node::Universal(outer_left, outer_right) = network.node(network.roots()[0]) else {
        panic!("expected a gate at the root");
    };
    assert_eq!(outer_left, outer_right);
    let Node::Universal(a, b) = network.node(outer_left) else {
        panic!("expected the inner conjunction gate");
    };
    assert_ne!(a, b);

    let (circuit, _, _) = binary_gate_circuit(&mut project, "DISJ", ComponentKind::Or);
    let network = elaborate(&project, project.circuit(circuit).unwrap()).unwrap();
    // OR negates each operand first
    assert_eq!(network.len(), 5);
    let Node::Universal(not_a, not_b) = network.node(network.roots()[0]) else {
        panic!("expected a gate at the root");
    };
    assert_ne!(not_a, not_b);
    for side in [not_a, not_b] {
        let Node::Universal(left, right) = network.node(side) else {
            panic!("expected a negation gate");
        };
        assert_eq!(left, right);
    }
}

#[test]
fn unconnected_slots_read_false() {
    let mut project = Project::default();
    let (circuit, a, b) = binary_gate_circuit(&mut project, "MAIN", ComponentKind::And);
    // drop the second operand, leaving the slot unconnected
    let gate = project.circuit(circuit).unwrap().components[2].id;
    project.set_connection(circuit, gate, 1, b, 0).unwrap();

    set_input(&mut project, circuit, a, true);
    assert_eq!(evaluate(&mut project, circuit).unwrap(), [false]);
}

#[test]
fn unconnected_outputs_read_false() {
    let mut project = Project::default();
    let circuit = project.add_circuit("MAIN").unwrap();
    project
        .add_component(circuit, ComponentKind::Output)
        .unwrap();

    let network = elaborate(&project, project.circuit(circuit).unwrap()).unwrap();
    assert_eq!(network.node(network.roots()[0]), Node::False);
    assert_eq!(evaluate(&mut project, circuit).unwrap(), [false]);
}

#[test]
fn outputs_can_read_inputs_directly() {
    let mut project = Project::default();
    let circuit = project.add_circuit("MAIN").unwrap();
    let input = project.add_component(circuit, ComponentKind::Input).unwrap();
    let out = project
        .add_component(circuit, ComponentKind::Output)
        .unwrap();
    project.set_connection(circuit, out, 0, input, 0).unwrap();

    assert_eq!(evaluate(&mut project, circuit).unwrap(), [false]);
    set_input(&mut project, circuit, input, true);
    assert_eq!(evaluate(&mut project, circuit).unwrap(), [true]);
}

#[test]
fn empty_circuits_have_no_outputs() {
    let mut project = Project::default();
    let circuit = project.add_circuit("MAIN").unwrap();
    let network = elaborate(&project, project.circuit(circuit).unwrap()).unwrap();
    assert!(network.is_empty());
    assert_eq!(evaluate(&mut project, circuit).unwrap(), Vec::<bool>::new());
}

// XOR components are resolved against a circuit named XOR instead of being
// expanded directly. Without one they read as constant false; this pins that
// fallthrough rather than quietly turning it into a real exclusive or.
#[test]
fn xor_without_a_library_circuit_is_constant_false() {
    let mut project = Project::default();
    let (circuit, a, b) = binary_gate_circuit(&mut project, "MAIN", ComponentKind::Xor);
    for (va, vb) in [(false, false), (false, true), (true, false), (true, true)] {
        set_input(&mut project, circuit, a, va);
        set_input(&mut project, circuit, b, vb);
        assert_eq!(evaluate(&mut project, circuit).unwrap(), [false]);
    }
}

/// Adds a circuit named `XOR` built as `AND(OR(a, b), NOT(AND(a, b)))`.
fn add_xor_library_circuit(project: &mut Project) {
    let circuit = project.add_circuit("XOR").unwrap();
    let a = project.add_component(circuit, ComponentKind::Input).unwrap();
    let b = project.add_component(circuit, ComponentKind::Input).unwrap();
    let either = project.add_component(circuit, ComponentKind::Or).unwrap();
    let both = project.add_component(circuit, ComponentKind::And).unwrap();
    let not_both = project.add_component(circuit, ComponentKind::Not).unwrap();
    let result = project.add_component(circuit, ComponentKind::And).unwrap();
    let out = project
        .add_component(circuit, ComponentKind::Output)
        .unwrap();
    project.set_connection(circuit, either, 0, a, 0).unwrap();
    project.set_connection(circuit, either, 1, b, 0).unwrap();
    project.set_connection(circuit, both, 0, a, 0).unwrap();
    project.set_connection(circuit, both, 1, b, 0).unwrap();
    project.set_connection(circuit, not_both, 0, both, 0).unwrap();
    project.set_connection(circuit, result, 0, either, 0).unwrap();
    project
        .set_connection(circuit, result, 1, not_both, 0)
        .unwrap();
    project.set_connection(circuit, out, 0, result, 0).unwrap();
}

#[test]
fn xor_resolves_against_the_library() {
    let mut project = Project::default();
    add_xor_library_circuit(&mut project);
    let (circuit, a, b) = binary_gate_circuit(&mut project, "MAIN", ComponentKind::Xor);
    for (va, vb, expected) in [
        (false, false, false),
        (false, true, true),
        (true, false, true),
        (true, true, false),
    ] {
        set_input(&mut project, circuit, a, va);
        set_input(&mut project, circuit, b, vb);
        assert_eq!(evaluate(&mut project, circuit).unwrap(), [expected]);
    }
}

#[test]
fn instances_substitute_the_actual_inputs() {
    let mut project = Project::default();
    inverter_circuit(&mut project, "R");

    let main = project.add_circuit("MAIN").unwrap();
    let input = project.add_component(main, ComponentKind::Input).unwrap();
    let instance = project
        .add_component(main, ComponentKind::Subcircuit("R".to_owned()))
        .unwrap();
    let out = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, instance, 0, input, 0).unwrap();
    project.set_connection(main, out, 0, instance, 0).unwrap();

    // ports dissolve into wiring: the flattened network is exactly the leaf
    // and the inverter gate
    let network = elaborate(&project, project.circuit(main).unwrap()).unwrap();
    assert_eq!(network.len(), 2);

    assert_eq!(evaluate(&mut project, main).unwrap(), [true]);
    set_input(&mut project, main, input, true);
    assert_eq!(evaluate(&mut project, main).unwrap(), [false]);
}

#[test]
fn substitution_crosses_every_hierarchy_level() {
    let mut project = Project::default();
    inverter_circuit(&mut project, "CORE");
    for (name, inner) in [("MID", "CORE"), ("TOP", "MID")] {
        let circuit = project.add_circuit(name).unwrap();
        let input = project.add_component(circuit, ComponentKind::Input).unwrap();
        let instance = project
            .add_component(circuit, ComponentKind::Subcircuit(inner.to_owned()))
            .unwrap();
        let out = project
            .add_component(circuit, ComponentKind::Output)
            .unwrap();
        project
            .set_connection(circuit, instance, 0, input, 0)
            .unwrap();
        project.set_connection(circuit, out, 0, instance, 0).unwrap();
    }

    let top = project.circuit_by_name("TOP").unwrap().id;
    let input = project.circuit_by_name("TOP").unwrap().components[0].id;

    let network = elaborate(&project, project.circuit(top).unwrap()).unwrap();
    assert_eq!(network.len(), 2);

    assert_eq!(evaluate(&mut project, top).unwrap(), [true]);
    set_input(&mut project, top, input, true);
    assert_eq!(evaluate(&mut project, top).unwrap(), [false]);
}

#[test]
fn chained_instances_of_one_circuit_are_legal() {
    let mut project = Project::default();
    inverter_circuit(&mut project, "R");

    let main = project.add_circuit("MAIN").unwrap();
    let input = project.add_component(main, ComponentKind::Input).unwrap();
    let first = project
        .add_component(main, ComponentKind::Subcircuit("R".to_owned()))
        .unwrap();
    let second = project
        .add_component(main, ComponentKind::Subcircuit("R".to_owned()))
        .unwrap();
    let out = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, first, 0, input, 0).unwrap();
    project.set_connection(main, second, 0, first, 0).unwrap();
    project.set_connection(main, out, 0, second, 0).unwrap();

    // two inverters in a row, one gate each
    let network = elaborate(&project, project.circuit(main).unwrap()).unwrap();
    assert_eq!(network.len(), 3);

    assert_eq!(evaluate(&mut project, main).unwrap(), [false]);
    set_input(&mut project, main, input, true);
    assert_eq!(evaluate(&mut project, main).unwrap(), [true]);
}

#[test]
fn shared_pins_elaborate_to_one_node() {
    let mut project = Project::default();
    let main = project.add_circuit("MAIN").unwrap();
    let input = project.add_component(main, ComponentKind::Input).unwrap();
    let gate = project.add_component(main, ComponentKind::Not).unwrap();
    let first = project.add_component(main, ComponentKind::Output).unwrap();
    let second = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, gate, 0, input, 0).unwrap();
    project.set_connection(main, first, 0, gate, 0).unwrap();
    project.set_connection(main, second, 0, gate, 0).unwrap();

    let network = elaborate(&project, project.circuit(main).unwrap()).unwrap();
    // both outputs hold the same node id, not copies of the cone
    assert_eq!(network.len(), 2);
    assert_eq!(network.roots()[0], network.roots()[1]);
    assert_eq!(evaluate(&mut project, main).unwrap(), [true, true]);
}

#[test]
fn shared_cones_evaluate_once() {
    let mut project = Project::default();
    let main = project.add_circuit("MAIN").unwrap();
    let input = project.add_component(main, ComponentKind::Input).unwrap();
    let shared = project.add_component(main, ComponentKind::Not).unwrap();
    let gate = project.add_component(main, ComponentKind::And).unwrap();
    let first = project.add_component(main, ComponentKind::Output).unwrap();
    let second = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, shared, 0, input, 0).unwrap();
    project.set_connection(main, gate, 0, shared, 0).unwrap();
    project.set_connection(main, gate, 1, input, 0).unwrap();
    project.set_connection(main, first, 0, shared, 0).unwrap();
    project.set_connection(main, second, 0, gate, 0).unwrap();

    let network = elaborate(&project, project.circuit(main).unwrap()).unwrap();
    // leaf, inverter and the two nodes of the AND expansion
    assert_eq!(network.len(), 4);

    let mut evaluator = Evaluator::new(&network);
    assert_eq!(evaluator.pass(), [true, false]);
    assert_eq!(evaluator.computed_nodes(), network.len());
}

#[test]
fn hierarchy_cycles_are_rejected() {
    let mut project = Project::default();
    let a = project.add_circuit("A").unwrap();
    let b = project.add_circuit("B").unwrap();
    let a_inst = project
        .add_component(a, ComponentKind::Subcircuit("B".to_owned()))
        .unwrap();
    let b_inst = project
        .add_component(b, ComponentKind::Subcircuit("A".to_owned()))
        .unwrap();
    let a_out = project.add_component(a, ComponentKind::Output).unwrap();
    let b_out = project.add_component(b, ComponentKind::Output).unwrap();
    project.set_connection(a, a_out, 0, a_inst, 0).unwrap();
    project.set_connection(b, b_out, 0, b_inst, 0).unwrap();

    assert_eq!(
        evaluate(&mut project, a),
        Err(CompileError::HierarchyCycle {
            name: "A".to_owned()
        })
    );
}

#[test]
fn self_instantiation_is_rejected() {
    let mut project = Project::default();
    let circuit = project.add_circuit("LOOP").unwrap();
    let out = project
        .add_component(circuit, ComponentKind::Output)
        .unwrap();
    let instance = project
        .add_component(circuit, ComponentKind::Subcircuit("LOOP".to_owned()))
        .unwrap();
    project.set_connection(circuit, out, 0, instance, 0).unwrap();

    assert_eq!(
        evaluate(&mut project, circuit),
        Err(CompileError::HierarchyCycle {
            name: "LOOP".to_owned()
        })
    );
}

#[test]
fn combinational_feedback_is_rejected() {
    let mut project = Project::default();
    let main = project.add_circuit("MAIN").unwrap();
    let gate = project.add_component(main, ComponentKind::And).unwrap();
    let out = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, gate, 0, gate, 0).unwrap();
    project.set_connection(main, out, 0, gate, 0).unwrap();

    assert_eq!(
        evaluate(&mut project, main),
        Err(CompileError::CombinationalCycle {
            circuit: "MAIN".to_owned(),
            component: gate,
        })
    );
}

#[test]
fn feedback_through_an_instance_is_rejected() {
    let mut project = Project::default();
    // R passes its input straight through to its output
    let inner = project.add_circuit("R").unwrap();
    let r_in = project.add_component(inner, ComponentKind::Input).unwrap();
    let r_out = project.add_component(inner, ComponentKind::Output).unwrap();
    project.set_connection(inner, r_out, 0, r_in, 0).unwrap();

    let main = project.add_circuit("MAIN").unwrap();
    let instance = project
        .add_component(main, ComponentKind::Subcircuit("R".to_owned()))
        .unwrap();
    let out = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, instance, 0, instance, 0).unwrap();
    project.set_connection(main, out, 0, instance, 0).unwrap();

    assert_eq!(
        evaluate(&mut project, main),
        Err(CompileError::CombinationalCycle {
            circuit: "MAIN".to_owned(),
            component: instance,
        })
    );
}

#[test]
fn unresolved_references_are_rejected() {
    let mut project = Project::default();
    inverter_circuit(&mut project, "R");
    let main = project.add_circuit("MAIN").unwrap();
    let instance = project
        .add_component(main, ComponentKind::Subcircuit("R".to_owned()))
        .unwrap();
    let out = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, out, 0, instance, 0).unwrap();

    // a rename behind the model's back leaves the instance dangling
    let inner = project.circuit_by_name("R").unwrap().id;
    project.circuit_mut(inner).unwrap().name = "RENAMED".to_owned();

    assert_eq!(
        evaluate(&mut project, main),
        Err(CompileError::UnresolvedReference {
            name: "R".to_owned()
        })
    );
}

#[test]
fn results_write_back_into_the_model() {
    let mut project = Project::default();
    let (circuit, input) = inverter_circuit(&mut project, "MAIN");
    let gate = project.circuit(circuit).unwrap().components[1].id;

    assert_eq!(evaluate(&mut project, circuit).unwrap(), [true]);
    assert_eq!(
        project.circuit(circuit).unwrap().component(gate).unwrap().outputs,
        [true]
    );

    set_input(&mut project, circuit, input, true);
    assert_eq!(evaluate(&mut project, circuit).unwrap(), [false]);
    assert_eq!(
        project.circuit(circuit).unwrap().component(gate).unwrap().outputs,
        [false]
    );
}

#[test]
fn failed_evaluation_leaves_the_model_unchanged() {
    let mut project = Project::default();
    let main = project.add_circuit("MAIN").unwrap();
    let gate = project.add_component(main, ComponentKind::Or).unwrap();
    let out = project.add_component(main, ComponentKind::Output).unwrap();
    project.set_connection(main, gate, 0, gate, 0).unwrap();
    project.set_connection(main, out, 0, gate, 0).unwrap();

    let snapshot = project.clone();
    assert!(evaluate(&mut project, main).is_err());
    assert_eq!(project, snapshot);
}
