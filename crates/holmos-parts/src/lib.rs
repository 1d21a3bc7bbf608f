#![warn(missing_docs)]

//! Printable parts for the HolMOS cage.
//!
//! Every builder in [`cage`] is a pure function returning a [`holmos::Part`]
//! positioned relative to the cage's optical axis (or with its bottom at
//! z=0, as documented per builder). [`generate::generate_all`] writes the
//! whole catalogue as `.scad` files.
//!
//! # Example
//!
//! ```rust,no_run
//! use holmos_parts::{cage, CageConfig};
//!
//! let cfg = CageConfig::default();
//! let plate = cage::cage_base_plate(&cfg, false);
//! plate.write_scad("Cage_Base_Plate.scad", "$fa = 5;$fs = 0.1;").unwrap();
//! ```

pub mod base;
pub mod cage;
pub mod config;
pub mod error;
pub mod generate;
pub mod helpers;
pub mod strut;

pub use base::{CageConfig, MountKind};
pub use config::{GeneratorConfig, Quality};
pub use error::{CageError, Result};
pub use generate::{generate_all, PartKind};
