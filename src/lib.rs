//! tdmm-graph: charts for the tdmm allocator benchmarks.
//!
//! The benchmark harness leaves a set of CSV files behind (allocation speed
//! and utilization traces per policy, plus the average utilization and the
//! data structure overhead of every policy). This crate reads them and draws
//! the comparison charts as PNG images.
#![recursion_limit = "1024"]
#![deny(missing_docs)]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod chart;
pub mod clean;
#[allow(missing_docs)]
pub mod errors;
pub mod policy;
pub mod record;
pub mod report;
mod setting;

pub use policy::Policy;
pub use report::{render_all, Summary};
pub use setting::Setting;
