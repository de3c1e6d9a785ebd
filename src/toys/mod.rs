//! Small warm-up programs: exact arithmetic, number theory and a source checker.

mod factorial;
mod fibonacci;
mod triangle;
mod mersenne;
mod elementary;
pub mod filecheck;

pub use factorial::{euler_approximation, factorial};
pub use fibonacci::{fibonacci_iterative, fibonacci_ratios, fibonacci_recursive};
pub use triangle::is_right_triangle;
pub use mersenne::{lucas_lehmer, MersenneResult};
pub use elementary::{logarithm, sphere_volume};
