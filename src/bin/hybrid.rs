//! Hybrid simulation runner
//!
//! Loads a JSON model, waits for the experimental control of every actuator
//! to connect, and runs the static analysis.
//!
//! Usage: `frame-hybrid <model.json>`
//!
//! Link settings in the model file can be overridden with
//! `FRAME_HYBRID_HOST`, `FRAME_HYBRID_PORT` and `FRAME_HYBRID_TIMEOUT_MS`.

use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{error, info};

use frame_hybrid::prelude::*;

fn run(path: &str) -> Result<ExitCode> {
    let input = ModelInput::from_path(path).with_context(|| format!("reading {path}"))?;
    let mut model = input
        .build(|cfg| cfg.with_env_overrides())
        .context("building model")?;

    info!(
        "Model: {} nodes, {} elements, {} steps",
        model.num_nodes(),
        model.num_elements(),
        input.analysis.num_steps
    );

    let analysis = StaticAnalysis::new(input.analysis.clone().with_logging());
    let report = match analysis.analyze(&mut model) {
        Ok(report) => report,
        Err(FEAError::SimulationTerminated) => {
            info!("Simulation terminated by the remote peer at t = {}", model.current_time());
            print_displacements(&model.node_displacements());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            error!("Analysis failed at t = {}: {}", model.current_time(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(
        "Analysis complete: {} steps, {} iterations",
        report.steps.len(),
        report.total_iterations()
    );
    print_displacements(&report.displacements);
    Ok(ExitCode::SUCCESS)
}

fn print_displacements(displacements: &[(usize, NodeDisplacement)]) {
    println!("Node Displacements:");
    for (tag, d) in displacements {
        println!(
            "  {}: DX={:.6e}, DY={:.6e}, DZ={:.6e}, RX={:.6e}, RY={:.6e}, RZ={:.6e}",
            tag, d.dx, d.dy, d.dz, d.rx, d.ry, d.rz
        );
    }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: frame-hybrid <model.json>");
        return Ok(ExitCode::from(2));
    };

    run(&path)
}
