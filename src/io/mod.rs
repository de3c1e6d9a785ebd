//! Reading experiment configuration and measured data from disk.

mod config;
pub mod data;

pub use config::{read_config, Config};
pub use data::{read_columns, read_values};
