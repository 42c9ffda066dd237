//! Configuration settings for SparkConf
//!
//! Defines CLI arguments, the topology file format, and how the cluster
//! topology is assembled from flags, environment, files and detection.

use crate::error::{IoResultExt, Result, SparkConfError};
use crate::render::OutputFormat;
use crate::sizing::{ClusterTopology, ExecutorPolicy, MemoryAmount};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// SparkConf - Spark executor sizing for YARN and HPC clusters
#[derive(Parser, Debug, Clone)]
#[command(name = "sparkconf")]
#[command(author = "SparkConf Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute Spark executor counts, cores and memory from cluster size")]
#[command(long_about = r#"
SparkConf derives Spark executor settings from coarse cluster sizing.

Given the number of nodes, cores per node and memory per node, it computes
executor cores, executor instances and executor memory, and renders them
as spark-defaults.conf lines, a spark-submit command line, or a
hanythingondemand hod.conf section.

Examples:
  sparkconf                                     # 16 nodes x 20 cores x 64G
  sparkconf -n 8 -c 32 -m 256G --profile high-memory
  sparkconf --topology cluster.json --format json
  sparkconf --detect slurm --format spark-submit
  sparkconf memory 6.5G                         # inspect a memory string
"#)]
pub struct CliArgs {
    /// Sizing options for the default generate action
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Cluster sizing options
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Number of worker nodes
    #[arg(short = 'n', long, env = "SPARKCONF_NODES", value_name = "NUM")]
    pub nodes: Option<u32>,

    /// Cores per node
    #[arg(short = 'c', long, env = "SPARKCONF_CORES", value_name = "NUM")]
    pub cores: Option<u32>,

    /// Memory per node (e.g., 64G, 512M)
    #[arg(short = 'm', long, env = "SPARKCONF_MEMORY", value_name = "SIZE")]
    pub memory: Option<String>,

    /// Local scratch directory (spark.local.dir)
    #[arg(short = 'd', long, env = "SPARKCONF_LOCAL_DIR", value_name = "PATH")]
    pub local_dir: Option<String>,

    /// Executor sizing profile
    #[arg(short = 'p', long, value_enum, default_value = "general")]
    pub profile: ExecutorPolicy,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "all")]
    pub format: OutputFormat,

    /// JSON topology file (node_count, cores_per_node, memory_per_node, scratch_dir)
    #[arg(short = 't', long, value_name = "PATH")]
    pub topology: Option<PathBuf>,

    /// Fill unspecified values from the local host or the current Slurm job
    #[arg(long, value_enum, value_name = "SOURCE")]
    pub detect: Option<DetectSource>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List executor sizing profiles
    #[command(name = "profiles")]
    Profiles,

    /// Parse a memory string and show how it rounds
    #[command(name = "memory")]
    Memory {
        /// Memory quantity (e.g., 64G, 6.5g, 1024)
        size: String,
    },

    /// Show the topology detected from the host or scheduler
    #[command(name = "detect")]
    Detect {
        /// Where to read topology from
        #[arg(short, long, value_enum, default_value = "local")]
        source: DetectSource,
    },
}

/// Topology detection source
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectSource {
    /// This machine (single node)
    #[default]
    Local,
    /// Current Slurm job allocation
    Slurm,
}

/// Topology with every field optional, as read from files or detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialTopology {
    /// Number of worker nodes
    pub node_count: Option<u32>,
    /// Cores per node
    pub cores_per_node: Option<u32>,
    /// Memory per node
    pub memory_per_node: Option<MemoryAmount>,
    /// Local scratch directory
    pub scratch_dir: Option<String>,
}

impl PartialTopology {
    /// Fill fields missing from `self` with those of `fallback`
    pub fn or(self, fallback: PartialTopology) -> Self {
        Self {
            node_count: self.node_count.or(fallback.node_count),
            cores_per_node: self.cores_per_node.or(fallback.cores_per_node),
            memory_per_node: self.memory_per_node.or(fallback.memory_per_node),
            scratch_dir: self.scratch_dir.or(fallback.scratch_dir),
        }
    }

    /// Complete the topology with built-in defaults and validate inputs
    pub fn resolve(self) -> Result<ClusterTopology> {
        let defaults = ClusterTopology::default();

        let topology = ClusterTopology {
            node_count: self.node_count.unwrap_or(defaults.node_count),
            cores_per_node: self.cores_per_node.unwrap_or(defaults.cores_per_node),
            memory_per_node: self.memory_per_node.unwrap_or(defaults.memory_per_node),
            scratch_dir: self.scratch_dir.unwrap_or(defaults.scratch_dir),
        };

        validate_topology_input(&topology)?;
        Ok(topology)
    }
}

impl From<ClusterTopology> for PartialTopology {
    fn from(topology: ClusterTopology) -> Self {
        Self {
            node_count: Some(topology.node_count),
            cores_per_node: Some(topology.cores_per_node),
            memory_per_node: Some(topology.memory_per_node),
            scratch_dir: Some(topology.scratch_dir),
        }
    }
}

/// Reject empty text fields before they reach the planner
pub fn validate_topology_input(topology: &ClusterTopology) -> Result<()> {
    if let MemoryAmount::Text(text) = &topology.memory_per_node {
        if text.trim().is_empty() {
            return Err(SparkConfError::invalid_topology("memory per node is empty"));
        }
    }
    if topology.scratch_dir.trim().is_empty() {
        return Err(SparkConfError::invalid_topology("scratch directory is empty"));
    }
    Ok(())
}

/// Load a JSON topology file
pub fn load_topology_file(path: &Path) -> Result<PartialTopology> {
    let text = std::fs::read_to_string(path).with_path(path)?;
    let topology: PartialTopology = serde_json::from_str(&text)?;
    tracing::debug!("Loaded topology from {:?}: {:?}", path, topology);
    Ok(topology)
}

impl GenerateArgs {
    /// Values given explicitly on the command line or through the environment
    pub fn overrides(&self) -> PartialTopology {
        PartialTopology {
            node_count: self.nodes,
            cores_per_node: self.cores,
            memory_per_node: self.memory.clone().map(MemoryAmount::Text),
            scratch_dir: self.local_dir.clone(),
        }
    }

    /// Assemble the topology: flags, then file, then `detected`, then defaults
    pub fn topology(&self, detected: Option<PartialTopology>) -> Result<ClusterTopology> {
        let mut merged = self.overrides();

        if let Some(path) = &self.topology {
            merged = merged.or(load_topology_file(path)?);
        }
        if let Some(detected) = detected {
            merged = merged.or(detected);
        }

        merged.resolve()
    }
}
