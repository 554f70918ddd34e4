#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Burn federated data partitioning.
//!
//! Splits a single array across the participants of a simulated federation, either
//! uniformly or with a seeded non-IID strategy, along the sample axis (horizontal
//! federation) or a feature axis (vertical federation).

extern crate alloc;

mod assemble;
mod config;
mod error;
mod fed;
mod label;
mod parties;
mod placement;
mod slicer;

pub mod planner;

pub use assemble::*;
pub use config::*;
pub use error::*;
pub use fed::*;
pub use label::*;
pub use parties::*;
pub use placement::*;
pub use slicer::materialize;
