//! Roommate assignment solver.
//!
//! Pairs residents into shared rooms so aggregate interpersonal
//! incompatibility is minimized, subject to room capacity and gender
//! segregation, by driving a mixed-integer program through HiGHS.

pub mod data;
pub mod error;
pub mod extract;
pub mod key;
pub mod model;
pub mod oracle;
pub mod score;
pub mod server;
pub mod solver;

pub use data::{Pairing, PairingInput, PairingOutput, SolveStatus};
pub use error::SolveError;
pub use solver::{solve, solve_with};
