//! Command line front end for the sitebrand engine: argument parsing,
//! configuration loading, logging setup and the run summary.

pub mod args;
pub mod config;
pub mod logger;
pub mod summary;
