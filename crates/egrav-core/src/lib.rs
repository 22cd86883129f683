#![deny(missing_docs)]
#![doc = "Constant tables, bounded parameter vectors, deterministic seeding and error types shared by the emergent-gravity calibration crates."]

pub mod constants;
pub mod errors;
/// Stable content hashing helpers.
pub mod hash;
pub mod params;
pub mod rng;
/// Canonical JSON helpers.
pub mod serde;

pub use constants::ConstantSet;
pub use errors::{EgravError, ErrorInfo};
pub use hash::{round_sig, stable_hash_string};
pub use params::{
    default_initial_guess, Interval, ParamBounds, ParamName, ParameterVector, PARAM_COUNT,
};
pub use rng::{derive_substream_seed, RngHandle};
pub use crate::serde::{from_json_slice, to_canonical_json_bytes};
