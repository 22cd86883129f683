#![deny(missing_docs)]
#![doc = "Pure forward model of the emergent-gravity toy theory: the derived coupling chain plus standalone auxiliary predictions."]

pub mod auxiliary;
pub mod forward;

pub use forward::{
    bare_coupling, cmb_amplitude, evaluate, evaluate_with, gauge_suppression, thermo_damping,
    vacuum_energy_base, DerivedQuantities, UnitScaling, SIMPLEX_FACTOR,
};
