//! Descriptive statistics of measured data.

mod measurement;

pub use measurement::{default_bin_count, running_summary, summarize, Histogram, RunningSummary, Summary};
