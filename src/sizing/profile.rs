//! Executor sizing profiles
//!
//! Each profile caps how many cores a single executor may take. Adding a
//! profile is a new variant plus its cap; nothing else changes.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named executor policy for a class of workloads
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutorPolicy {
    /// General use case: many small executors
    #[default]
    #[value(name = "general")]
    General,
    /// High memory / low parallelism (e.g. random forest training)
    #[value(name = "high-memory")]
    HighMemory,
}

impl ExecutorPolicy {
    /// All profiles, in display order
    pub const ALL: [ExecutorPolicy; 2] = [ExecutorPolicy::General, ExecutorPolicy::HighMemory];

    /// Upper bound on cores handed to one executor
    pub fn max_cores_per_executor(&self) -> u32 {
        match self {
            Self::General => 2,
            Self::HighMemory => 4,
        }
    }

    /// Human-readable profile name
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "General use case",
            Self::HighMemory => "High Memory / Low Parallelism (e.g. Random Forest)",
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::HighMemory => "high-memory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_caps() {
        assert_eq!(ExecutorPolicy::General.max_cores_per_executor(), 2);
        assert_eq!(ExecutorPolicy::HighMemory.max_cores_per_executor(), 4);
        assert_eq!(ExecutorPolicy::default(), ExecutorPolicy::General);
    }

    #[test]
    fn test_cli_names_round_trip() {
        for policy in ExecutorPolicy::ALL {
            let parsed = ExecutorPolicy::from_str(policy.cli_name(), false).unwrap();
            assert_eq!(parsed, policy);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ExecutorPolicy::HighMemory).unwrap();
        assert_eq!(json, "\"high-memory\"");
    }
}
