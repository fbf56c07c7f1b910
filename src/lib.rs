#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod errors;
pub mod geometry;
pub mod results;
pub mod solver;
pub mod structure;
pub mod truss;

pub use errors::{JointReference, LoadKeyError, SolveError, TrussEditError};
pub use geometry::{force, point, Force, Point};
pub use results::{ForceState, MemberForce, Solution, ZERO_FORCE_TOLERANCE};
pub use solver::{solve, solve_with, SolveOptions};
pub use structure::{Joints, LoadKey, Loads, Member, Support, Supports, TrussInput};
pub use truss::Truss;
