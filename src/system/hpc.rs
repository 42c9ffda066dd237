//! HPC job scheduler integration
//!
//! Reads the node, core and memory allocation of the current Slurm job
//! from its environment so Spark can be sized to fit inside it.

use crate::config::PartialTopology;
use crate::error::{Result, SparkConfError};
use crate::sizing::{parse_memory_with_default_unit, MemoryAmount, MemoryUnit};
use serde::{Deserialize, Serialize};
use std::env;

/// Resources granted to a Slurm job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlurmAllocation {
    /// Job ID
    pub job_id: Option<String>,
    /// Number of nodes allocated
    pub num_nodes: Option<u32>,
    /// CPUs available on this node
    pub cpus_on_node: Option<u32>,
    /// Memory per node (bytes)
    pub mem_per_node: Option<f64>,
    /// Job-private scratch directory
    pub tmp_dir: Option<String>,
}

impl SlurmAllocation {
    /// Collect allocation from the process environment
    pub fn collect() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Collect allocation using `lookup` to read variables
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let num_nodes = lookup("SLURM_JOB_NUM_NODES")
            .or_else(|| lookup("SLURM_NNODES"))
            .and_then(|s| s.trim().parse().ok());

        // Slurm reports plain megabytes unless a suffix is given
        let mem_per_node = lookup("SLURM_MEM_PER_NODE").and_then(|s| {
            match parse_memory_with_default_unit(&s, MemoryUnit::Mega) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!("Ignoring SLURM_MEM_PER_NODE: {}", e);
                    None
                }
            }
        });

        Self {
            job_id: lookup("SLURM_JOB_ID"),
            num_nodes,
            cpus_on_node: lookup("SLURM_CPUS_ON_NODE").and_then(|s| s.trim().parse().ok()),
            mem_per_node,
            tmp_dir: lookup("TMPDIR").filter(|s| !s.is_empty()),
        }
    }

    /// Check if running inside a job
    pub fn is_job(&self) -> bool {
        self.job_id.is_some()
    }

    /// Allocation as a topology; fails outside a Slurm job
    pub fn to_topology(&self) -> Result<PartialTopology> {
        if !self.is_job() {
            return Err(SparkConfError::DetectionError(
                "not running inside a Slurm job (SLURM_JOB_ID is unset)".to_string(),
            ));
        }

        Ok(PartialTopology {
            node_count: self.num_nodes,
            cores_per_node: self.cpus_on_node,
            memory_per_node: self.mem_per_node.map(MemoryAmount::Bytes),
            scratch_dir: self.tmp_dir.clone(),
        })
    }

    /// Print allocation summary to console
    pub fn print_summary(&self) {
        println!("=== Slurm Allocation ===\n");
        println!("  Job ID: {}", self.job_id.as_deref().unwrap_or("-"));
        match self.num_nodes {
            Some(n) => println!("  Nodes: {}", n),
            None => println!("  Nodes: unknown"),
        }
        match self.cpus_on_node {
            Some(c) => println!("  CPUs per node: {}", c),
            None => println!("  CPUs per node: unknown"),
        }
        match self.mem_per_node {
            Some(m) => println!(
                "  Memory per node: {}",
                humansize::format_size(m as u64, humansize::BINARY)
            ),
            None => println!("  Memory per node: unknown"),
        }
        println!("  Scratch: {}", self.tmp_dir.as_deref().unwrap_or("-"));
    }
}
