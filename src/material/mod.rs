//! Plastic hardening materials
//!
//! A hardening material tracks one non-negative internal variable (accumulated
//! plastic deformation) under the trial/commit discipline and reports the
//! plastic stiffness it implies. The variable itself lives in
//! [`HardeningState`]; the laws differ only in how they map it to a stiffness.

mod hardening;

pub use hardening::{
    ExponReducing, HardeningState, MultiLinearKp, NullPlasticMaterial, PlasticHardeningMaterial,
};
