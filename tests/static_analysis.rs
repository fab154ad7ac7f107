//! End-to-end static analyses of small frames

use approx::assert_relative_eq;
use frame_hybrid::prelude::*;

const E: f64 = 200e9;
const G: f64 = 77e9;

fn section() -> BeamSection {
    BeamSection::new(E, G, 5e-3, 4e-5, 2e-5, 1e-6)
}

fn cantilever(length: f64, load: NodeLoad, transf: Box<dyn CrdTransf>) -> Model {
    let mut model = Model::new();
    model.add_node(Node::frame(1, 0.0, 0.0, 0.0)).unwrap();
    model.add_node(Node::frame(2, length, 0.0, 0.0)).unwrap();
    model.add_support(1, Support::fixed()).unwrap();
    model
        .add_element(Box::new(ElasticBeam3d::new(1, 1, 2, section(), transf)))
        .unwrap();
    model.add_node_load(2, load).unwrap();
    model
}

#[test]
fn test_cantilever_tip_deflection() {
    let (length, p) = (3.0, 5000.0);
    let mut model = cantilever(length, NodeLoad::force(0.0, -p, 0.0), Box::new(LinearCrdTransf3d::new(Vec3::z())));
    let report = StaticAnalysis::default().analyze(&mut model).unwrap();
    let tip = report.displacement(2).unwrap();

    // δ = PL³/3EI, θ = PL²/2EI about the local z axis
    let iz = section().iz;
    assert_relative_eq!(tip.dy, -p * length.powi(3) / (3.0 * E * iz), max_relative = 1e-8);
    assert_relative_eq!(tip.rz, -p * length.powi(2) / (2.0 * E * iz), max_relative = 1e-8);
    assert_relative_eq!(tip.dx, 0.0, epsilon = 1e-14);
}

#[test]
fn test_cantilever_out_of_plane_and_torsion() {
    let (length, p, t) = (2.0, 1000.0, 300.0);
    let load = NodeLoad::new(0.0, 0.0, p, t, 0.0, 0.0);
    let mut model = cantilever(length, load, Box::new(LinearCrdTransf3d::new(Vec3::z())));
    let report = StaticAnalysis::default().analyze(&mut model).unwrap();
    let tip = report.displacement(2).unwrap();

    let s = section();
    assert_relative_eq!(tip.dz, p * length.powi(3) / (3.0 * E * s.iy), max_relative = 1e-8);
    assert_relative_eq!(tip.rx, t * length / (G * s.j), max_relative = 1e-8);
}

#[test]
fn test_uniform_load_on_cantilever() {
    let (length, w) = (4.0, -2000.0);
    let mut model = cantilever(length, NodeLoad::default(), Box::new(LinearCrdTransf3d::new(Vec3::z())));
    model.add_element_load(1, ElementLoad::uniform(0.0, w, 0.0)).unwrap();
    let report = StaticAnalysis::default().analyze(&mut model).unwrap();

    // δ = wL⁴/8EI
    let tip = report.displacement(2).unwrap();
    assert_relative_eq!(tip.dy, w * length.powi(4) / (8.0 * E * section().iz), max_relative = 1e-8);
}

#[test]
fn test_pdelta_amplifies_drift() {
    let column = |transf: Box<dyn CrdTransf>| {
        let mut model = Model::new();
        model.add_node(Node::frame(1, 0.0, 0.0, 0.0)).unwrap();
        model.add_node(Node::frame(2, 0.0, 4.0, 0.0)).unwrap();
        model.add_support(1, Support::fixed()).unwrap();
        model
            .add_element(Box::new(ElasticBeam3d::new(1, 1, 2, section(), transf)))
            .unwrap();
        model.add_node_load(2, NodeLoad::force(1000.0, -200e3, 0.0)).unwrap();
        model
    };

    let options = AnalysisOptions::default().with_steps(5).with_tolerance(1e-10);
    let mut linear = column(Box::new(LinearCrdTransf3d::new(Vec3::z())));
    let mut pdelta = column(Box::new(PDeltaCrdTransf3d::new(Vec3::z())));
    let a = StaticAnalysis::new(options.clone()).analyze(&mut linear).unwrap();
    let b = StaticAnalysis::new(options).analyze(&mut pdelta).unwrap();

    let (da, db) = (a.displacement(2).unwrap().dx, b.displacement(2).unwrap().dx);
    assert!(da > 0.0);
    assert!(db > da * 1.05, "linear {da}, p-delta {db}");
    // the P-Delta run needs equilibrium iterations, the linear one does not
    assert!(b.total_iterations() > a.total_iterations());
}

#[test]
fn test_model_from_json() {
    let json = r#"{
        "nodes": [
            {"tag": 1, "coords": [0.0, 0.0, 0.0]},
            {"tag": 2, "coords": [0.0, 3.0, 0.0]},
            {"tag": 3, "coords": [5.0, 3.0, 0.0]},
            {"tag": 4, "coords": [5.0, 0.0, 0.0]}
        ],
        "supports": [
            {"node": 1, "dx": true, "dy": true, "dz": true, "rx": true, "ry": true, "rz": true},
            {"node": 4, "dx": true, "dy": true, "dz": true, "rx": true, "ry": true, "rz": true}
        ],
        "beams": [
            {"tag": 1, "nodes": [1, 2], "vecxz": [0.0, 0.0, 1.0],
             "section": {"e": 200e9, "g": 77e9, "a": 5e-3, "iy": 4e-5, "iz": 2e-5, "j": 1e-6}},
            {"tag": 2, "nodes": [2, 3], "vecxz": [0.0, 0.0, 1.0],
             "section": {"e": 200e9, "g": 77e9, "a": 5e-3, "iy": 4e-5, "iz": 2e-5, "j": 1e-6}},
            {"tag": 3, "nodes": [3, 4], "vecxz": [0.0, 0.0, 1.0],
             "section": {"e": 200e9, "g": 77e9, "a": 5e-3, "iy": 4e-5, "iz": 2e-5, "j": 1e-6}}
        ],
        "node_loads": [{"node": 2, "fx": 10000.0}],
        "analysis": {"num_steps": 2}
    }"#;

    let input = ModelInput::from_json(json).unwrap();
    let mut model = input.build(Ok).unwrap();
    let report = StaticAnalysis::new(input.analysis.clone()).analyze(&mut model).unwrap();
    assert_eq!(report.steps.len(), 2);

    // symmetric portal under sway: both beam ends drift the same way
    let (d2, d3) = (report.displacement(2).unwrap(), report.displacement(3).unwrap());
    assert!(d2.dx > 0.0 && d3.dx > 0.0);
    assert_relative_eq!(d2.dx, d3.dx, max_relative = 0.05);
    assert_relative_eq!(d2.dy, -d3.dy, max_relative = 1e-6);
}

#[test]
fn test_revert_to_start_clears_state() {
    let mut model = cantilever(2.0, NodeLoad::force(0.0, -100.0, 0.0), Box::new(PDeltaCrdTransf3d::new(Vec3::z())));
    StaticAnalysis::default().analyze(&mut model).unwrap();
    assert!(model.node(2).unwrap().committed_displacement().amax() > 0.0);

    model.revert_to_start().unwrap();
    assert_eq!(model.node(2).unwrap().committed_displacement().amax(), 0.0);
    assert_eq!(model.current_time(), 0.0);
}
