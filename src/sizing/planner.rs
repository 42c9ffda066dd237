//! Executor allocation planning
//!
//! Turns a cluster topology and an executor policy into the executor
//! count, cores and memory Spark should request. Planning is a pure
//! function of its inputs and is recomputed on every call.

use super::memory::{parse_memory, round_to_clean_megabytes, BYTES_PER_MB};
use super::profile::ExecutorPolicy;
use crate::error::{Result, SparkConfError};
use serde::{Deserialize, Serialize};

/// Memory per node, either already in bytes or as a string like `64G`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryAmount {
    /// Byte count
    Bytes(f64),
    /// Human-readable quantity, parsed on use
    Text(String),
}

impl MemoryAmount {
    /// Resolve to a byte count
    pub fn to_bytes(&self) -> Result<f64> {
        match self {
            Self::Bytes(bytes) => {
                if bytes.is_finite() && *bytes >= 0.0 {
                    Ok(*bytes)
                } else {
                    Err(SparkConfError::invalid_memory(
                        bytes.to_string(),
                        "byte count must be finite and non-negative",
                    ))
                }
            }
            Self::Text(text) => parse_memory(text),
        }
    }
}

impl From<&str> for MemoryAmount {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MemoryAmount {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for MemoryAmount {
    fn from(bytes: f64) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<u64> for MemoryAmount {
    fn from(bytes: u64) -> Self {
        Self::Bytes(bytes as f64)
    }
}

impl std::fmt::Display for MemoryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "{}", bytes),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Sizing of a homogeneous cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterTopology {
    /// Number of worker nodes
    pub node_count: u32,
    /// Cores on each node
    pub cores_per_node: u32,
    /// Memory on each node
    pub memory_per_node: MemoryAmount,
    /// Local scratch directory for shuffle spill
    pub scratch_dir: String,
}

impl ClusterTopology {
    /// Create a topology description
    pub fn new(
        node_count: u32,
        cores_per_node: u32,
        memory_per_node: impl Into<MemoryAmount>,
        scratch_dir: impl Into<String>,
    ) -> Self {
        Self {
            node_count,
            cores_per_node,
            memory_per_node: memory_per_node.into(),
            scratch_dir: scratch_dir.into(),
        }
    }
}

impl Default for ClusterTopology {
    fn default() -> Self {
        Self::new(16, 20, "64G", "/tmp")
    }
}

/// Derived executor allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Policy the plan was computed with
    pub policy: ExecutorPolicy,
    /// Cores assigned to each executor
    pub cores_per_executor: u32,
    /// Executors that fit on one node; may be fractional
    pub instances_per_node: f64,
    /// Executors to request across the cluster, at least 1
    pub executor_instances: u64,
    /// Memory per executor before rounding, in bytes
    pub per_executor_memory_bytes: f64,
    /// Memory per executor after rounding, in megabytes
    pub executor_memory_mb: u64,
    /// Local scratch directory, passed through unchanged
    pub scratch_dir: String,
}

impl AllocationPlan {
    /// Executor memory in the `<n>M` form Spark expects
    pub fn executor_memory(&self) -> String {
        format!("{}M", self.executor_memory_mb)
    }

    /// Executor memory in bytes, saturating at `u64::MAX`
    pub fn executor_memory_bytes(&self) -> u64 {
        self.executor_memory_mb.saturating_mul(BYTES_PER_MB as u64)
    }

    /// Total cores requested by all executors
    pub fn total_executor_cores(&self) -> u64 {
        self.executor_instances * self.cores_per_executor as u64
    }
}

/// Compute the executor allocation for `topology` under `policy`.
///
/// One executor slot is held back cluster-wide for the driver. The
/// executor count never drops below one.
pub fn plan_allocation(topology: &ClusterTopology, policy: ExecutorPolicy) -> Result<AllocationPlan> {
    let memory_per_node = topology.memory_per_node.to_bytes()?;

    if topology.cores_per_node == 0 {
        return Err(SparkConfError::invalid_topology("cores per node must be positive"));
    }
    if topology.node_count == 0 {
        return Err(SparkConfError::invalid_topology("node count must be positive"));
    }

    let cores_per_executor = policy.max_cores_per_executor().min(topology.cores_per_node);
    let instances_per_node = topology.cores_per_node as f64 / cores_per_executor as f64;

    if instances_per_node.fract() != 0.0 {
        tracing::warn!(
            "{} cores per node is not a multiple of {} cores per executor ({} executors per node)",
            topology.cores_per_node,
            cores_per_executor,
            instances_per_node
        );
    }

    let raw_instances = topology.node_count as f64 * instances_per_node - 1.0;
    let executor_instances = raw_instances.max(1.0).floor() as u64;

    let per_executor_memory_bytes = memory_per_node / instances_per_node;
    let executor_memory_mb = round_to_clean_megabytes(per_executor_memory_bytes);

    tracing::debug!(
        "Planned {} executors x {} cores, {} MB each ({:?}, {} per node, raw {})",
        executor_instances,
        cores_per_executor,
        executor_memory_mb,
        policy,
        instances_per_node,
        raw_instances
    );

    if executor_memory_mb == 0 {
        tracing::warn!(
            "Per-executor memory {} rounds down to 0 MB",
            humansize::format_size(per_executor_memory_bytes as u64, humansize::BINARY)
        );
    }

    Ok(AllocationPlan {
        policy,
        cores_per_executor,
        instances_per_node,
        executor_instances,
        per_executor_memory_bytes,
        executor_memory_mb,
        scratch_dir: topology.scratch_dir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

    #[test]
    fn test_general_profile_reference_cluster() {
        let topology = ClusterTopology::new(16, 20, "64G", "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();

        assert_eq!(plan.cores_per_executor, 2);
        assert_eq!(plan.instances_per_node, 10.0);
        assert_eq!(plan.executor_instances, 159);
        assert_eq!(plan.executor_memory_mb, round_to_clean_megabytes(64.0 * GIB / 10.0));
        assert_eq!(plan.executor_memory(), "6144M");
        assert_eq!(plan.scratch_dir, "/tmp");
    }

    #[test]
    fn test_high_memory_profile() {
        let topology = ClusterTopology::new(16, 20, "64G", "/scratch");
        let plan = plan_allocation(&topology, ExecutorPolicy::HighMemory).unwrap();

        assert_eq!(plan.cores_per_executor, 4);
        assert_eq!(plan.instances_per_node, 5.0);
        assert_eq!(plan.executor_instances, 79);
        assert_eq!(plan.executor_memory_mb, 12288);
        assert_eq!(plan.total_executor_cores(), 316);
    }

    #[test]
    fn test_cores_capped_by_node() {
        let topology = ClusterTopology::new(4, 1, "8G", "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::HighMemory).unwrap();
        assert_eq!(plan.cores_per_executor, 1);
        assert_eq!(plan.instances_per_node, 1.0);
        assert_eq!(plan.executor_instances, 3);
    }

    #[test]
    fn test_single_node_keeps_one_executor() {
        let topology = ClusterTopology::new(1, 1, "2G", "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();
        assert_eq!(plan.executor_instances, 1);

        let topology = ClusterTopology::new(1, 2, "2G", "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();
        assert_eq!(plan.executor_instances, 1);
    }

    #[test]
    fn test_fractional_instances_per_node() {
        let topology = ClusterTopology::new(3, 3, "3G", "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();
        assert_eq!(plan.instances_per_node, 1.5);
        assert_eq!(plan.executor_instances, 3);
        // 3 GiB / 1.5 = 2048 MB, which sits in the 256 MB band
        assert_eq!(plan.executor_memory_mb, 2048);
    }

    #[test]
    fn test_numeric_memory_skips_parsing() {
        let topology = ClusterTopology::new(16, 20, 64.0 * GIB, "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();
        assert_eq!(plan.executor_memory_mb, 6144);
        assert_eq!(plan.executor_memory_bytes(), 6144 * 1024 * 1024);
    }

    #[test]
    fn test_zero_cores_is_invalid_topology() {
        let topology = ClusterTopology::new(16, 0, "64G", "/tmp");
        let err = plan_allocation(&topology, ExecutorPolicy::General).unwrap_err();
        assert!(matches!(err, SparkConfError::InvalidTopology(_)));
    }

    #[test]
    fn test_zero_nodes_is_invalid_topology() {
        let topology = ClusterTopology::new(0, 20, "64G", "/tmp");
        let err = plan_allocation(&topology, ExecutorPolicy::General).unwrap_err();
        assert!(matches!(err, SparkConfError::InvalidTopology(_)));
    }

    #[test]
    fn test_bad_memory_propagates() {
        let topology = ClusterTopology::new(16, 20, "lots", "/tmp");
        let err = plan_allocation(&topology, ExecutorPolicy::General).unwrap_err();
        assert!(matches!(err, SparkConfError::InvalidMemoryFormat { .. }));

        let topology = ClusterTopology::new(16, 20, -1.0, "/tmp");
        let err = plan_allocation(&topology, ExecutorPolicy::General).unwrap_err();
        assert!(matches!(err, SparkConfError::InvalidMemoryFormat { .. }));
    }

    #[test]
    fn test_overflowing_memory_is_invalid() {
        let topology = ClusterTopology::new(16, 20, "1e308t", "/tmp");
        let err = plan_allocation(&topology, ExecutorPolicy::General).unwrap_err();
        assert!(matches!(err, SparkConfError::InvalidMemoryFormat { .. }));
    }

    #[test]
    fn test_huge_memory_bytes_saturate() {
        let topology = ClusterTopology::new(1, 1, "1e9t", "/tmp");
        let plan = plan_allocation(&topology, ExecutorPolicy::General).unwrap();
        assert!(plan.executor_memory_mb > u64::MAX / (1024 * 1024));
        assert_eq!(plan.executor_memory_bytes(), u64::MAX);
    }

    #[test]
    fn test_memory_amount_deserializes_both_forms() {
        let text: MemoryAmount = serde_json::from_str("\"64G\"").unwrap();
        assert_eq!(text, MemoryAmount::Text("64G".to_string()));

        let bytes: MemoryAmount = serde_json::from_str("1024").unwrap();
        assert_eq!(bytes.to_bytes().unwrap(), 1024.0);
    }
}
