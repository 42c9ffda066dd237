//! Local host resource detection
//!
//! Detects CPU and memory of the current machine so it can be sized as a
//! single-node cluster, or used as a template for identical nodes.

use crate::config::PartialTopology;
use crate::sizing::MemoryAmount;
use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Resources of the machine we are running on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostResources {
    /// Total number of logical CPUs
    pub logical_cores: usize,
    /// Number of physical cores
    pub physical_cores: usize,
    /// Total physical memory in bytes
    pub total_memory: u64,
    /// Available memory in bytes
    pub available_memory: u64,
    /// Temporary directory
    pub temp_dir: String,
}

impl HostResources {
    /// Collect resources of the current host
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();

        HostResources {
            logical_cores: num_cpus::get(),
            physical_cores: num_cpus::get_physical(),
            total_memory: sys.total_memory(),
            available_memory: sys.available_memory(),
            temp_dir: std::env::temp_dir().to_string_lossy().to_string(),
        }
    }

    /// This host as one node; unknown values are left unset
    pub fn to_topology(&self) -> PartialTopology {
        PartialTopology {
            node_count: Some(1),
            cores_per_node: u32::try_from(self.logical_cores).ok().filter(|c| *c > 0),
            memory_per_node: (self.total_memory > 0).then(|| MemoryAmount::from(self.total_memory)),
            scratch_dir: Some(self.temp_dir.clone()).filter(|d| !d.is_empty()),
        }
    }

    /// Print host summary to console
    pub fn print_summary(&self) {
        println!("=== Local Host ===\n");
        println!("CPU:");
        println!("  Logical cores: {}", self.logical_cores);
        println!("  Physical cores: {}", self.physical_cores);
        println!("\nMemory:");
        println!("  Total: {}", humansize::format_size(self.total_memory, humansize::BINARY));
        println!("  Available: {}", humansize::format_size(self.available_memory, humansize::BINARY));
        println!("\nScratch: {}", self.temp_dir);
    }
}
