//! Frame Hybrid Example - offline cantilever and portal frame

use frame_hybrid::prelude::*;

fn main() {
    env_logger::init();

    println!("=== Frame Hybrid Example: Cantilever ===\n");

    // Steel HEB 200 (approximate properties)
    // A = 78.1 cm² = 7.81e-3 m²
    // Iy = 5696 cm⁴ = 5.696e-5 m⁴
    // Iz = 2003 cm⁴ = 2.003e-5 m⁴
    // J = 59.3 cm⁴ = 5.93e-7 m⁴
    let section = BeamSection::new(210e9, 81e9, 7.81e-3, 5.696e-5, 2.003e-5, 5.93e-7);

    let length = 3.0;
    let load = 10000.0;

    let mut model = Model::new();
    model.add_node(Node::frame(1, 0.0, 0.0, 0.0)).unwrap();
    model.add_node(Node::frame(2, length, 0.0, 0.0)).unwrap();
    model.add_support(1, Support::fixed()).unwrap();
    model
        .add_element(Box::new(ElasticBeam3d::new(
            1,
            1,
            2,
            section,
            Box::new(LinearCrdTransf3d::new(Vec3::z())),
        )))
        .unwrap();
    model.add_node_load(2, NodeLoad::force(0.0, -load, 0.0)).unwrap();

    println!("Running static analysis...\n");
    let report = StaticAnalysis::default()
        .analyze(&mut model)
        .expect("Analysis failed");

    let tip = report.displacement(2).unwrap();
    let expected = -load * length.powi(3) / (3.0 * section.e * section.iz);
    println!("Tip deflection:");
    println!("  computed: DY={:.4}mm, RZ={:.6}rad", tip.dy * 1000.0, tip.rz);
    println!("  PL³/3EI:  DY={:.4}mm", expected * 1000.0);

    println!("\n=== Frame Hybrid Example: Portal Frame with P-Delta ===\n");

    //     N3 -------- N4
    //     |          |
    //     |          |
    //     N1        N2
    //   Fixed     Fixed

    let height = 4.0;
    let span = 6.0;

    let mut linear = portal_frame(section, height, span, false);
    let mut pdelta = portal_frame(section, height, span, true);

    let options = AnalysisOptions::default().with_steps(4);
    let linear_report = StaticAnalysis::new(options.clone())
        .analyze(&mut linear)
        .expect("Analysis failed");
    let pdelta_report = StaticAnalysis::new(options)
        .analyze(&mut pdelta)
        .expect("Analysis failed");

    println!("Roof drift:");
    for node in [3, 4] {
        let a = linear_report.displacement(node).unwrap();
        let b = pdelta_report.displacement(node).unwrap();
        println!(
            "  N{}: linear DX={:.4}mm, P-Delta DX={:.4}mm (amplification {:.3})",
            node,
            a.dx * 1000.0,
            b.dx * 1000.0,
            b.dx / a.dx
        );
    }
    println!(
        "  iterations: linear {}, P-Delta {}",
        linear_report.total_iterations(),
        pdelta_report.total_iterations()
    );

    println!("\n=== Frame Hybrid Example: Hardening Laws ===\n");

    let mut multi = MultiLinearKp::new(1, vec![0.0, 0.01, 0.03], vec![5000.0, 2000.0, 0.0])
        .expect("Invalid hardening law");
    let mut expon = ExponReducing::new(2, 5000.0, 50.0).with_residual(0.1);

    println!("  {:>8}  {:>12}  {:>12}", "x", "MultiLinear", "ExponReduc");
    for x in [0.0, 0.005, 0.01, 0.02, 0.03, 0.05, 0.1] {
        multi.set_trial_value(x, 1.0);
        expon.set_trial_value(x, 1.0);
        println!(
            "  {:>8.3}  {:>12.1}  {:>12.1}",
            x,
            multi.trial_plastic_stiffness(),
            expon.trial_plastic_stiffness()
        );
    }

    println!("\n=== Example Complete ===");
}

fn portal_frame(section: BeamSection, height: f64, span: f64, p_delta: bool) -> Model {
    let transf = || -> Box<dyn CrdTransf> {
        if p_delta {
            Box::new(PDeltaCrdTransf3d::new(Vec3::z()))
        } else {
            Box::new(LinearCrdTransf3d::new(Vec3::z()))
        }
    };

    let mut model = Model::new();
    model.add_node(Node::frame(1, 0.0, 0.0, 0.0)).unwrap();
    model.add_node(Node::frame(2, span, 0.0, 0.0)).unwrap();
    model.add_node(Node::frame(3, 0.0, height, 0.0)).unwrap();
    model.add_node(Node::frame(4, span, height, 0.0)).unwrap();

    // Columns and beam
    model
        .add_element(Box::new(ElasticBeam3d::new(1, 1, 3, section, transf())))
        .unwrap();
    model
        .add_element(Box::new(ElasticBeam3d::new(2, 2, 4, section, transf())))
        .unwrap();
    model
        .add_element(Box::new(ElasticBeam3d::new(3, 3, 4, section, transf())))
        .unwrap();

    model.add_support(1, Support::fixed()).unwrap();
    model.add_support(2, Support::fixed()).unwrap();

    // Gravity on the columns and 10 kN lateral at roof level
    model.add_node_load(3, NodeLoad::force(10000.0, -500000.0, 0.0)).unwrap();
    model.add_node_load(4, NodeLoad::force(0.0, -500000.0, 0.0)).unwrap();

    model
}
