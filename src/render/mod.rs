//! Output rendering module
//!
//! Maps an allocation plan onto Spark configuration keys and renders the
//! resulting key/value lists in the dialects different deployment tools
//! read. Renderers never interpret values.

mod entries;

pub use entries::*;

use crate::error::{Result, SparkConfError};
use crate::sizing::AllocationPlan;
use clap::ValueEnum;
use serde::Serialize;

/// Command prefix for spark-submit invocations
pub const SPARK_SUBMIT_PREFIX: &str = "spark-submit --master yarn --deploy-mode cluster";

/// Section header used by hanythingondemand `hod.conf`
pub const HOD_SECTION_HEADER: &str = "[spark-default.conf]";

/// Output format for generated configuration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// All text formats, each under a heading
    #[default]
    All,
    /// `spark-defaults.conf` lines
    SparkDefaults,
    /// `spark-submit` command line
    SparkSubmit,
    /// hanythingondemand `hod.conf` section
    Hod,
    /// JSON document with both key sets
    Json,
}

/// `spark-defaults.conf` dialect: whitespace between key and value
pub fn render_spark_defaults(entries: &ConfigEntries) -> String {
    let mut ret = String::new();
    for (key, value) in entries.iter() {
        ret.push_str(key);
        ret.push(' ');
        ret.push_str(value);
        ret.push('\n');
    }
    ret
}

/// `spark-submit` flags appended to the fixed YARN cluster-mode prefix
pub fn render_spark_submit(entries: &ConfigEntries) -> String {
    let mut ret = String::from(SPARK_SUBMIT_PREFIX);
    for (key, value) in entries.iter() {
        ret.push_str(&format!(" --{} {}", key, value));
    }
    ret
}

/// `hod.conf` dialect: `key=value` lines under a section header
pub fn render_hod_conf(entries: &ConfigEntries) -> String {
    let mut ret = format!("{}\n", HOD_SECTION_HEADER);
    for (key, value) in entries.iter() {
        ret.push_str(&format!("{}={}\n", key, value));
    }
    ret
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    spark_defaults: &'a ConfigEntries,
    spark_submit: &'a ConfigEntries,
}

/// Both key sets as a pretty-printed JSON object
pub fn render_json(plan: &AllocationPlan) -> Result<String> {
    let spark_defaults = ConfigEntries::spark_defaults(plan);
    let spark_submit = ConfigEntries::spark_submit(plan);
    let doc = JsonDocument {
        spark_defaults: &spark_defaults,
        spark_submit: &spark_submit,
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| SparkConfError::config(format!("Failed to render JSON: {}", e)))
}

/// Render `plan` in the requested format
pub fn render(plan: &AllocationPlan, format: OutputFormat) -> Result<String> {
    let spark_defaults = ConfigEntries::spark_defaults(plan);
    let spark_submit = ConfigEntries::spark_submit(plan);

    let text = match format {
        OutputFormat::SparkDefaults => render_spark_defaults(&spark_defaults),
        OutputFormat::SparkSubmit => format!("{}\n", render_spark_submit(&spark_submit)),
        OutputFormat::Hod => render_hod_conf(&spark_defaults),
        OutputFormat::Json => format!("{}\n", render_json(plan)?),
        OutputFormat::All => format!(
            "=== spark-defaults.conf ===\n{}\n=== spark-submit ===\n{}\n\n=== hod.conf ===\n{}",
            render_spark_defaults(&spark_defaults),
            render_spark_submit(&spark_submit),
            render_hod_conf(&spark_defaults)
        ),
    };

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::{plan_allocation, ClusterTopology, ExecutorPolicy};

    fn reference_plan() -> AllocationPlan {
        plan_allocation(&ClusterTopology::default(), ExecutorPolicy::General).unwrap()
    }

    #[test]
    fn test_render_spark_defaults() {
        let text = render_spark_defaults(&ConfigEntries::spark_defaults(&reference_plan()));
        assert_eq!(
            text,
            "spark.executor.cores 2\n\
             spark.executor.instances 159\n\
             spark.executor.memory 6144M\n\
             spark.local.dir /tmp\n"
        );
    }

    #[test]
    fn test_render_spark_submit() {
        let text = render_spark_submit(&ConfigEntries::spark_submit(&reference_plan()));
        assert_eq!(
            text,
            "spark-submit --master yarn --deploy-mode cluster --executor-memory 6144M --num-executors 159"
        );
    }

    #[test]
    fn test_render_hod_conf() {
        let text = render_hod_conf(&ConfigEntries::spark_defaults(&reference_plan()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[spark-default.conf]");
        assert_eq!(lines[1], "spark.executor.cores=2");
        assert_eq!(lines[4], "spark.local.dir=/tmp");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_renderers_do_not_interpret_values() {
        let mut entries = ConfigEntries::new();
        entries.push("odd key", "value with spaces");
        assert_eq!(render_spark_defaults(&entries), "odd key value with spaces\n");
        assert_eq!(render_hod_conf(&entries), "[spark-default.conf]\nodd key=value with spaces\n");
    }

    #[test]
    fn test_render_json_preserves_key_order() {
        let json = render_json(&reference_plan()).unwrap();
        let cores = json.find("spark.executor.cores").unwrap();
        let local_dir = json.find("spark.local.dir").unwrap();
        assert!(cores < local_dir);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["spark_submit"]["num-executors"], "159");
        assert_eq!(value["spark_defaults"]["spark.executor.memory"], "6144M");
    }

    #[test]
    fn test_render_all_contains_every_dialect() {
        let text = render(&reference_plan(), OutputFormat::All).unwrap();
        assert!(text.contains("spark.executor.instances 159"));
        assert!(text.contains("--num-executors 159"));
        assert!(text.contains("spark.executor.memory=6144M"));
    }
}
