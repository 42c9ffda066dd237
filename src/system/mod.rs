//! System and scheduler detection module
//!
//! Provides cluster topology detected from the local host or from the
//! allocation of the current HPC job.

mod resources;
pub mod hpc;

pub use hpc::SlurmAllocation;
pub use resources::*;

use crate::config::{DetectSource, PartialTopology};
use crate::error::Result;

/// One snapshot of the resources a detection source reports
#[derive(Debug, Clone)]
pub enum Detection {
    /// Local host resources
    Host(HostResources),
    /// Current Slurm job allocation
    Slurm(SlurmAllocation),
}

impl Detection {
    /// Take a snapshot from `source`
    pub fn collect(source: DetectSource) -> Self {
        match source {
            DetectSource::Local => Self::Host(HostResources::collect()),
            DetectSource::Slurm => Self::Slurm(SlurmAllocation::collect()),
        }
    }

    /// Print the snapshot to console
    pub fn print_summary(&self) {
        match self {
            Self::Host(host) => host.print_summary(),
            Self::Slurm(alloc) => alloc.print_summary(),
        }
    }

    /// Topology derived from this snapshot
    pub fn to_topology(&self) -> Result<PartialTopology> {
        let topology = match self {
            Self::Host(host) => host.to_topology(),
            Self::Slurm(alloc) => alloc.to_topology()?,
        };
        tracing::debug!("Detected topology: {:?}", topology);
        Ok(topology)
    }
}

/// Detect a (possibly partial) topology from `source`
pub fn detect_topology(source: DetectSource) -> Result<PartialTopology> {
    Detection::collect(source).to_topology()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SparkConfError;

    #[test]
    fn test_topology_comes_from_the_same_snapshot() {
        let host = HostResources {
            logical_cores: 8,
            physical_cores: 4,
            total_memory: 16 * 1024 * 1024 * 1024,
            available_memory: 1024,
            temp_dir: "/scratch".to_string(),
        };
        let detection = Detection::Host(host.clone());
        assert_eq!(detection.to_topology().unwrap(), host.to_topology());
    }

    #[test]
    fn test_slurm_snapshot_outside_job() {
        let detection = Detection::Slurm(SlurmAllocation::default());
        assert!(matches!(
            detection.to_topology().unwrap_err(),
            SparkConfError::DetectionError(_)
        ));
    }
}
