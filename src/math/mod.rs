//! Mathematical utilities for frame and actuator calculations

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, SMatrix, SVector, Vector3};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;

/// 6-element vector for basic frame forces/deformations
/// `[N, Mz_i, Mz_j, My_i, My_j, T]`
pub type Vec6 = SVector<f64, 6>;
/// Fixed-end reactions from element loads `[Px_i, Vy_i, Vy_j, Vz_i, Vz_j]`
pub type Vec5 = SVector<f64, 5>;
/// 12x12 matrix for frame stiffness in global coordinates
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for frame end forces/displacements
pub type Vec12 = SVector<f64, 12>;
/// Compatibility matrix mapping 12 end displacements to 6 basic deformations
pub type Mat6x12 = SMatrix<f64, 6, 12>;

/// Tolerance below which lengths are treated as zero
pub const GEOMETRY_TOL: f64 = 1e-10;

/// Expand a 3x3 rotation into the 12x12 block-diagonal transformation
///
/// The rotation maps global to local axes, so the result does the same for
/// the translations and rotations of both end nodes.
pub fn block_diagonal(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for i in 0..4 {
        let offset = i * 3;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(r);
    }
    t
}

/// Rigid-offset transfer for one end node
///
/// Returns the 6x6 matrix taking the node's `[u, θ]` to the displacement of
/// the offset end point, `u + θ × o`.
pub fn rigid_offset_matrix(offset: &Vec3) -> Mat6 {
    let mut m = Mat6::identity();
    // θ × o = -(o × θ) = skew(o)ᵀ θ
    let (ox, oy, oz) = (offset.x, offset.y, offset.z);
    #[rustfmt::skip]
    let skew_t = Mat3::new(
        0.0,  oz, -oy,
        -oz, 0.0,  ox,
         oy, -ox, 0.0,
    );
    m.fixed_view_mut::<3, 3>(0, 3).copy_from(&skew_t);
    m
}

/// Compatibility matrix between local end displacements and the basic system
///
/// Basic deformations are `[axial, θz_i, θz_j, θy_i, θy_j, twist]` with the
/// rigid-body chord rotations removed.
pub fn basic_from_local(length: f64) -> Mat6x12 {
    let one_over_l = 1.0 / length;
    let mut a = Mat6x12::zeros();

    // axial
    a[(0, 0)] = -1.0;
    a[(0, 6)] = 1.0;

    // bending about local z (uses uy)
    a[(1, 1)] = one_over_l;
    a[(1, 7)] = -one_over_l;
    a[(1, 5)] = 1.0;
    a[(2, 1)] = one_over_l;
    a[(2, 7)] = -one_over_l;
    a[(2, 11)] = 1.0;

    // bending about local y (uses uz)
    a[(3, 2)] = -one_over_l;
    a[(3, 8)] = one_over_l;
    a[(3, 4)] = 1.0;
    a[(4, 2)] = -one_over_l;
    a[(4, 8)] = one_over_l;
    a[(4, 10)] = 1.0;

    // twist
    a[(5, 3)] = -1.0;
    a[(5, 9)] = 1.0;

    a
}

/// Basic stiffness of an elastic 3D frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Element length
pub fn basic_frame_stiffness(e: f64, g: f64, a: f64, iy: f64, iz: f64, j: f64, length: f64) -> Mat6 {
    let l = length;
    let ea_l = e * a / l;
    let gj_l = g * j / l;
    let eiz_l = e * iz / l;
    let eiy_l = e * iy / l;

    let mut kb = Mat6::zeros();
    kb[(0, 0)] = ea_l;

    kb[(1, 1)] = 4.0 * eiz_l;
    kb[(2, 2)] = 4.0 * eiz_l;
    kb[(1, 2)] = 2.0 * eiz_l;
    kb[(2, 1)] = 2.0 * eiz_l;

    kb[(3, 3)] = 4.0 * eiy_l;
    kb[(4, 4)] = 4.0 * eiy_l;
    kb[(3, 4)] = 2.0 * eiy_l;
    kb[(4, 3)] = 2.0 * eiy_l;

    kb[(5, 5)] = gj_l;
    kb
}

/// Cubic Hermite shape functions at normalized position `xi` in [0, 1]
///
/// Returns `(n1, n2, n3, n4)` for (v_i, θ_i·L, v_j, θ_j·L).
pub fn hermite(xi: f64) -> (f64, f64, f64, f64) {
    let xi2 = xi * xi;
    let xi3 = xi2 * xi;
    (
        1.0 - 3.0 * xi2 + 2.0 * xi3,
        xi - 2.0 * xi2 + xi3,
        3.0 * xi2 - 2.0 * xi3,
        -xi2 + xi3,
    )
}

/// Solve a linear system using LU decomposition
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_stiffness_symmetry() {
        let k = basic_frame_stiffness(200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5, 10.0);
        assert_relative_eq!(k, k.transpose(), epsilon = 1e-6);
    }

    #[test]
    fn test_rigid_body_translation_is_strain_free() {
        let a = basic_from_local(4.0);
        let mut ul = Vec12::zeros();
        for node in 0..2 {
            ul[node * 6] = 0.3;
            ul[node * 6 + 1] = -0.2;
            ul[node * 6 + 2] = 0.7;
        }
        assert_relative_eq!((a * ul).norm(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_rigid_offset_matrix() {
        let o = Vec3::new(0.0, 0.5, 0.0);
        let m = rigid_offset_matrix(&o);
        // rotation about z moves the offset point along -x
        let u = m * Vec6::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.1);
        assert_relative_eq!(u[0], -0.05, epsilon = 1e-14);
        assert_relative_eq!(u[5], 0.1, epsilon = 1e-14);
    }

    #[test]
    fn test_hermite_partition() {
        let (n1, _, n3, _) = hermite(0.37);
        assert_relative_eq!(n1 + n3, 1.0, epsilon = 1e-14);
    }
}
