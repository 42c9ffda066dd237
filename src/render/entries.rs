//! Ordered configuration key/value lists

use crate::sizing::AllocationPlan;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered list of configuration keys and their rendered values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEntries {
    entries: Vec<(String, String)>,
}

impl ConfigEntries {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair, keeping insertion order
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.push((key.into(), value.to_string()));
    }

    /// Look up the value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys for `spark-defaults.conf` and `hod.conf`
    pub fn spark_defaults(plan: &AllocationPlan) -> Self {
        let mut entries = Self::new();
        entries.push("spark.executor.cores", plan.cores_per_executor);
        entries.push("spark.executor.instances", plan.executor_instances);
        entries.push("spark.executor.memory", plan.executor_memory());
        entries.push("spark.local.dir", &plan.scratch_dir);
        entries
    }

    /// Flags for `spark-submit`
    pub fn spark_submit(plan: &AllocationPlan) -> Self {
        let mut entries = Self::new();
        entries.push("executor-memory", plan.executor_memory());
        entries.push("num-executors", plan.executor_instances);
        entries
    }
}

impl Serialize for ConfigEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
