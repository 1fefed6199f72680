//! # kripke-rs: symbolic model checking over Kripke models
//!
//! **`kripke-rs`** decides whether a formula holds at a world of a finite
//! Kripke model. Models are encoded into Binary Decision Diagrams: every
//! world becomes a cube over its propositions, and the accessibility relation
//! becomes one BDD over a present and a next copy of those propositions.
//! Formulas are then evaluated by explicit recursion over the world graph,
//! with neighbours computed on the relation BDD.
//!
//! Three logics are supported:
//!
//! - **modal**: `~`, `/\`, `\/`, `<>` and `[]`;
//! - **travel** (`lhs`): an observer world plus agent positions, with the
//!   atom `I`, observer moves `<left>`/`<H>` and agent moves `<Si>`;
//! - **sabotage**: modal logic plus `<.>`/`[.]`, which evaluate after removing
//!   one edge of the model.
//!
//! ## Basic Usage
//!
//! ```rust
//! use kripke_rs::config::CheckOptions;
//! use kripke_rs::loader::ModelDescription;
//! use kripke_rs::model::Model;
//!
//! let description = ModelDescription::from_yaml_str(
//!     "
//! logic: modal
//! P: [p, q]
//! V: {w1: [p], w2: [q]}
//! R: {w1: [w2]}
//! ",
//! )
//! .unwrap();
//! let model = Model::new(description, CheckOptions::default()).unwrap();
//!
//! assert!(model.check("<>(q)", &["w1"]).unwrap());
//! assert!(!model.check("<>(p)", &["w1"]).unwrap());
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: the [`Bdd`][crate::bdd::Bdd] manager and its algorithms.
//! - **[`kripke`]**: encoding of worlds and relation, and neighbour resolution.
//! - **[`formula`]**: the formula tree and its bracketed notation.
//! - **[`logic`]**: satisfaction checkers, one per logic.
//! - **[`model`]**: the [`Model`][crate::model::Model] facade tying it together.
//! - **[`dot`]**: rendering of models and verdicts to Graphviz.

pub mod bdd;
pub mod cache;
pub mod config;
pub mod dot;
pub mod error;
pub mod formula;
pub mod kripke;
pub mod loader;
pub mod logic;
pub mod model;
pub mod node;
pub mod paths;
pub mod reference;
pub mod sat;
pub mod table;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
