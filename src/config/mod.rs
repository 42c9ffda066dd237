//! Configuration module for SparkConf
//!
//! Provides CLI arguments, topology files, and the precedence rules that
//! turn them into a cluster topology.

mod settings;

pub use settings::*;
