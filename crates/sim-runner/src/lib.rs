//! # Simulation Runner
//!
//! The thin glue around [`sim_engine`]: command-line parsing, scenario-file
//! parsing, output-file layout and process exit codes. Everything with
//! simulation semantics lives in the engine; this crate only decides where
//! bytes come from and where they go.

pub mod args;
pub mod outputs;
pub mod scenario;
