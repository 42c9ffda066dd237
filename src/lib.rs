//! # SparkConf - Spark Executor Sizing for YARN and HPC Clusters
//!
//! SparkConf turns coarse cluster sizing (node count, cores per node,
//! memory per node) into the executor settings Spark needs, and renders
//! them for the tools that consume them.
//!
//! ## Features
//!
//! - **Memory Parsing**: `64G`, `512m`, `1.5t` and plain byte counts
//! - **Clean Rounding**: Executor memory snapped to 128/256/512/1024 MB steps
//! - **Executor Planning**: Cores, instances and memory per executor
//! - **Sizing Profiles**: General purpose and high-memory workloads
//! - **Output Dialects**: `spark-defaults.conf`, `spark-submit`, `hod.conf`, JSON
//! - **Detection**: Local host resources and Slurm job allocations
//!
//! ## Quick Start
//!
//! ```
//! use sparkconf::sizing::{plan_allocation, ClusterTopology, ExecutorPolicy};
//! use sparkconf::render::{render, OutputFormat};
//!
//! let topology = ClusterTopology::new(16, 20, "64G", "/tmp");
//! let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();
//!
//! assert_eq!(plan.executor_instances, 159);
//! assert_eq!(plan.executor_memory(), "6144M");
//!
//! println!("{}", render(&plan, OutputFormat::SparkDefaults).unwrap());
//! ```
//!
//! ## Memory Strings
//!
//! ```
//! use sparkconf::sizing::{parse_memory, round_to_clean_megabytes};
//!
//! let bytes = parse_memory("6.4g").unwrap();
//! assert_eq!(round_to_clean_megabytes(bytes), 6144);
//! assert!(parse_memory("abc").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod render;
pub mod sizing;
pub mod system;

// Re-export commonly used types
pub use error::{Result, SparkConfError};
pub use sizing::{plan_allocation, AllocationPlan, ClusterTopology, ExecutorPolicy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```
    //! use sparkconf::prelude::*;
    //! ```

    pub use crate::config::{DetectSource, PartialTopology};
    pub use crate::error::{Result, SparkConfError};
    pub use crate::render::{render, ConfigEntries, OutputFormat};
    pub use crate::sizing::{
        parse_memory, plan_allocation, round_to_clean_megabytes, AllocationPlan, ClusterTopology,
        ExecutorPolicy, MemoryAmount,
    };
    pub use crate::system::{detect_topology, Detection, HostResources, SlurmAllocation};
}
