use std::{ffi::OsString, path::PathBuf};

use clap::Parser;
use logicol_netlist::{CircuitId, ComponentId, ComponentKind, Project};
use serde_json::json;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    input: OsString,

    #[clap(short = 'c', long)]
    circuit: Option<String>,

    #[clap(short = 's', long = "set", value_name = "ID=BIT")]
    set: Vec<String>,

    #[clap(short = 'o', long)]
    save: Option<PathBuf>,

    #[clap(long)]
    jsonl_output: bool,
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    logicol_logger::setup();

    let bytes = std::fs::read(&args.input)?;
    let mut project = logicol_binfmt::load(&bytes)?;

    log::info!("# Library");
    for circuit in &project.circuits {
        log::info!(
            "{}: {} components, {} inputs, {} outputs",
            circuit.name,
            circuit.components.len(),
            circuit.input_count(),
            circuit.output_count(),
        );
    }

    let root = match &args.circuit {
        Some(name) => match project.circuit_by_name(name) {
            Some(circuit) => circuit.id,
            None => {
                log::error!("no circuit named {name:?} in {:?}", args.input);
                std::process::exit(1);
            }
        },
        None => match project.circuits.first() {
            Some(circuit) => circuit.id,
            None => {
                log::error!("{:?} contains no circuits", args.input);
                std::process::exit(1);
            }
        },
    };

    for request in &args.set {
        let (component, value) = parse_override(request);
        apply_override(&mut project, root, component, value)?;
    }

    let name = project.circuit(root).unwrap().name.clone();
    log::info!("evaluating {name:?}");
    let outputs = logicol_flatten::evaluate(&mut project, root)?;

    let mut row = String::default();
    for &value in &outputs {
        row.push(if value { '1' } else { '0' });
    }
    println!("{row}");

    if args.jsonl_output {
        println!(
            "{}",
            serde_json::to_string(&json!({ "circuit": name, "outputs": row })).unwrap()
        );
    }

    if let Some(path) = &args.save {
        std::fs::write(path, logicol_binfmt::save(&project))?;
        log::info!("saved {path:?}");
    }

    Ok(())
}

fn bad_override(request: &str) -> ! {
    log::error!("input overrides take the form ID=0 or ID=1, got {request:?}");
    std::process::exit(1);
}

fn parse_override(request: &str) -> (ComponentId, bool) {
    let Some((id, bit)) = request.split_once('=') else {
        bad_override(request)
    };
    let Some(component) = id.parse().ok().and_then(ComponentId::new) else {
        bad_override(request)
    };
    let value = match bit {
        "0" => false,
        "1" => true,
        _ => bad_override(request),
    };
    (component, value)
}

fn apply_override(
    project: &mut Project,
    root: CircuitId,
    component: ComponentId,
    value: bool,
) -> color_eyre::Result<()> {
    let current = {
        let circuit = project.circuit(root).expect("root was just resolved");
        match circuit.component(component) {
            Some(found) if found.kind == ComponentKind::Input => found.outputs[0],
            _ => {
                log::error!("component {component} is not an INPUT of the evaluated circuit");
                std::process::exit(1);
            }
        }
    };
    if current != value {
        project.toggle_input(root, component)?;
    }
    Ok(())
}
