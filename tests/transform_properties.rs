//! Property tests for the 3D frame coordinate transformations

use approx::assert_relative_eq;
use frame_hybrid::math::{Mat6, Vec as DVec, Vec5};
use frame_hybrid::prelude::*;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -10.0..10.0f64
}

fn point() -> impl Strategy<Value = [f64; 3]> {
    [coord(), coord(), coord()]
}

fn displacement() -> impl Strategy<Value = [f64; 6]> {
    [
        -0.1..0.1f64,
        -0.1..0.1f64,
        -0.1..0.1f64,
        -0.05..0.05f64,
        -0.05..0.05f64,
        -0.05..0.05f64,
    ]
}

/// Geometry with a usable length and an orientation vector off the element axis
fn well_posed(xi: [f64; 3], xj: [f64; 3], vecxz: [f64; 3]) -> bool {
    let axis = Vec3::from(xj) - Vec3::from(xi);
    let v = Vec3::from(vecxz);
    axis.norm() > 1.0 && v.norm() > 0.5 && axis.normalize().cross(&v.normalize()).norm() > 0.1
}

fn ends(xi: [f64; 3], xj: [f64; 3]) -> (Node, Node) {
    (Node::new(1, xi, 6), Node::new(2, xj, 6))
}

proptest! {
    #[test]
    fn rotation_is_proper_orthonormal(xi in point(), xj in point(), vecxz in point()) {
        prop_assume!(well_posed(xi, xj, vecxz));
        let (ni, nj) = ends(xi, xj);
        let mut transf = LinearCrdTransf3d::new(Vec3::from(vecxz));
        transf.initialize([&ni, &nj]).unwrap();

        let r = *transf.rotation();
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(r * r.transpose(), frame_hybrid::math::Mat3::identity(), epsilon = 1e-10);

        // first axis runs from node i to node j
        let axis = (Vec3::from(xj) - Vec3::from(xi)).normalize();
        assert_relative_eq!(r.row(0).transpose(), axis, epsilon = 1e-10);
        assert_relative_eq!(transf.initial_length(), ni.distance_to(&nj), max_relative = 1e-12);
    }

    #[test]
    fn virtual_work_is_preserved(
        xi in point(),
        xj in point(),
        vecxz in point(),
        ui in displacement(),
        uj in displacement(),
        q in [coord(), coord(), coord(), coord(), coord(), coord()],
        offset in point(),
    ) {
        prop_assume!(well_posed(xi, xj, vecxz));
        let (mut ni, mut nj) = ends(xi, xj);
        ni.set_trial_displacement(DVec::from_row_slice(&ui)).unwrap();
        nj.set_trial_displacement(DVec::from_row_slice(&uj)).unwrap();

        let mut transf = LinearCrdTransf3d::with_offsets(
            Vec3::from(vecxz),
            Vec3::from(offset) * 0.01,
            Vec3::zeros(),
        );
        transf.initialize([&ni, &nj]).unwrap();

        let q = Vec6::from_row_slice(&q);
        let ub = transf.basic_trial_disp([&ni, &nj]);
        let pg = transf.global_resisting_force(&q, &Vec5::zeros());

        let mut ug = [0.0; 12];
        ug[..6].copy_from_slice(&ui);
        ug[6..].copy_from_slice(&uj);
        let external: f64 = pg.iter().zip(ug.iter()).map(|(p, u)| p * u).sum();
        let internal = q.dot(&ub);
        assert_relative_eq!(external, internal, epsilon = 1e-9, max_relative = 1e-9);
    }

    #[test]
    fn rigid_translation_is_strain_free(
        xi in point(),
        xj in point(),
        vecxz in point(),
        t in [-0.1..0.1f64, -0.1..0.1f64, -0.1..0.1f64],
    ) {
        prop_assume!(well_posed(xi, xj, vecxz));
        let (mut ni, mut nj) = ends(xi, xj);
        let u = DVec::from_row_slice(&[t[0], t[1], t[2], 0.0, 0.0, 0.0]);
        ni.set_trial_displacement(u.clone()).unwrap();
        nj.set_trial_displacement(u).unwrap();

        let mut transf = PDeltaCrdTransf3d::new(Vec3::from(vecxz));
        transf.initialize([&ni, &nj]).unwrap();
        transf.update([&ni, &nj]).unwrap();

        let ub = transf.basic_trial_disp([&ni, &nj]);
        assert!(ub.amax() < 1e-12, "ub = {ub}");
        assert!(transf.trial_drift().iter().all(|d| d.abs() < 1e-12));
    }

    #[test]
    fn global_stiffness_is_symmetric(
        xi in point(),
        xj in point(),
        vecxz in point(),
        axial in -1000.0..1000.0f64,
    ) {
        prop_assume!(well_posed(xi, xj, vecxz));
        let (ni, nj) = ends(xi, xj);
        let mut transf = PDeltaCrdTransf3d::new(Vec3::from(vecxz));
        transf.initialize([&ni, &nj]).unwrap();

        let mut kb = Mat6::identity() * 500.0;
        kb[(1, 2)] = 120.0;
        kb[(2, 1)] = 120.0;
        let q = Vec6::new(axial, 0.0, 0.0, 0.0, 0.0, 0.0);
        let kg = transf.global_stiff_matrix(&kb, &q);
        assert_relative_eq!(kg, kg.transpose(), epsilon = 1e-8);
    }
}

#[test]
fn test_parallel_orientation_is_rejected() {
    let (ni, nj) = ends([0.0, 0.0, 0.0], [0.0, 0.0, 3.0]);
    let mut transf = LinearCrdTransf3d::new(Vec3::z());
    assert!(matches!(transf.initialize([&ni, &nj]), Err(FEAError::DegenerateAxis)));
}

#[test]
fn test_coincident_nodes_are_rejected() {
    let (ni, nj) = ends([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
    let mut transf = LinearCrdTransf3d::new(Vec3::z());
    assert!(matches!(transf.initialize([&ni, &nj]), Err(FEAError::ZeroLength { .. })));
}
