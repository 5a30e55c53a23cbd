//! Renders a reachability matrix as JSON and Markdown.

use crate::matrix::{FlowResult, Matrix, Summary};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

pub const RESULTS_JSON: &str = "results.json";
pub const SUMMARY_MARKDOWN: &str = "summary.md";

/// The contents of `results.json`.
#[derive(Debug, Serialize)]
pub struct Results<'m> {
    pub generated_at_utc: String,
    pub policy_file: String,
    pub policy_namespace: &'m str,
    pub summary: Summary,
    pub flows: &'m [FlowResult],
    pub summary_markdown: String,
}

/// Where the reports were written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Written {
    pub results: PathBuf,
    pub summary: PathBuf,
}

/// Renders the Markdown summary of a matrix.
pub fn summary_markdown(
    policy_file: &Path,
    policy_namespace: &str,
    matrix: &Matrix,
) -> Result<String> {
    let mut md = String::new();
    write_markdown(&mut md, policy_file, policy_namespace, matrix)?;
    Ok(md)
}

fn write_markdown(
    md: &mut impl fmt::Write,
    policy_file: &Path,
    policy_namespace: &str,
    matrix: &Matrix,
) -> fmt::Result {
    let Summary {
        total_flows,
        allowed_before,
        allowed_after,
        expected_after_allow,
        expectation_mismatches,
    } = matrix.summary;

    writeln!(md, "# NetworkPolicy Reachability Summary")?;
    writeln!(md)?;
    writeln!(md, "- Policy file: `{}`", policy_file.display())?;
    writeln!(md, "- Evaluated namespace: `{policy_namespace}`")?;
    writeln!(md, "- Total flows evaluated: `{total_flows}`")?;
    writeln!(md, "- Allowed before policy: `{allowed_before}`")?;
    writeln!(md, "- Allowed after policy: `{allowed_after}`")?;
    writeln!(md, "- Expected allowed after policy: `{expected_after_allow}`")?;
    writeln!(md, "- Expectation mismatches: `{expectation_mismatches}`")?;
    writeln!(md)?;
    writeln!(md, "| Flow | Before | After | Expected After |")?;
    writeln!(md, "|---|---:|---:|---:|")?;
    for result in &matrix.flows {
        writeln!(
            md,
            "| `{}` | {} | {} | {} |",
            result.name,
            outcome(result.allowed_before),
            outcome(result.allowed_after),
            outcome(result.should_work_after_policy),
        )?;
    }
    Ok(())
}

/// Writes `summary.md` and `results.json` into `output_dir`, creating it if necessary.
pub fn write(
    output_dir: &Path,
    policy_file: &Path,
    policy_namespace: &str,
    matrix: &Matrix,
) -> Result<Written> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let summary = output_dir.join(SUMMARY_MARKDOWN);
    std::fs::write(
        &summary,
        summary_markdown(policy_file, policy_namespace, matrix)?,
    )
    .with_context(|| format!("failed to write {}", summary.display()))?;

    let results = output_dir.join(RESULTS_JSON);
    let payload = Results {
        generated_at_utc: chrono::Utc::now().to_rfc3339(),
        policy_file: policy_file.display().to_string(),
        policy_namespace,
        summary: matrix.summary,
        flows: &matrix.flows,
        summary_markdown: summary.display().to_string(),
    };
    let mut json = serde_json::to_string_pretty(&payload)?;
    json.push('\n');
    std::fs::write(&results, json)
        .with_context(|| format!("failed to write {}", results.display()))?;

    Ok(Written { results, summary })
}

fn outcome(allowed: bool) -> &'static str {
    if allowed {
        "ALLOW"
    } else {
        "DENY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Matrix {
        let flows = vec![
            FlowResult {
                name: "Gateway to student-app".to_string(),
                source: "gateway".to_string(),
                destination: "student-app".to_string(),
                port: 5000,
                protocol: "TCP".to_string(),
                allowed_before: true,
                allowed_after: true,
                should_work_after_policy: true,
            },
            FlowResult {
                name: "Gateway to redis".to_string(),
                source: "gateway".to_string(),
                destination: "redis".to_string(),
                port: 6379,
                protocol: "TCP".to_string(),
                allowed_before: true,
                allowed_after: true,
                should_work_after_policy: false,
            },
        ];
        Matrix {
            flows,
            summary: Summary {
                total_flows: 2,
                allowed_before: 2,
                allowed_after: 2,
                expected_after_allow: 1,
                expectation_mismatches: 1,
            },
        }
    }

    #[test]
    fn renders_markdown() {
        let md = summary_markdown(Path::new("policy.yaml"), "student-dev", &matrix())
            .expect("summary must render");
        let lines = md.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "# NetworkPolicy Reachability Summary");
        assert!(lines.contains(&"- Policy file: `policy.yaml`"));
        assert!(lines.contains(&"- Evaluated namespace: `student-dev`"));
        assert!(lines.contains(&"- Expectation mismatches: `1`"));
        assert_eq!(
            &lines[lines.len() - 4..],
            &[
                "| Flow | Before | After | Expected After |",
                "|---|---:|---:|---:|",
                "| `Gateway to student-app` | ALLOW | ALLOW | ALLOW |",
                "| `Gateway to redis` | ALLOW | ALLOW | DENY |",
            ]
        );
        assert!(md.ends_with('\n'));
    }

    #[test]
    fn writes_reports() {
        let tmp = tempfile::tempdir().expect("must create temp dir");
        let dir = tmp.path().join("reports");
        let written = write(&dir, Path::new("policy.yaml"), "student-dev", &matrix())
            .expect("reports must be written");
        assert_eq!(written.summary, dir.join(SUMMARY_MARKDOWN));

        let json = std::fs::read_to_string(&written.results).expect("results must be readable");
        let value = serde_json::from_str::<serde_json::Value>(&json).expect("results must be JSON");
        assert_eq!(value["policy_file"], "policy.yaml");
        assert_eq!(value["policy_namespace"], "student-dev");
        assert_eq!(value["summary"]["total_flows"], 2);
        assert_eq!(value["summary"]["expectation_mismatches"], 1);
        assert_eq!(value["flows"][1]["name"], "Gateway to redis");
        assert_eq!(value["flows"][1]["should_work_after_policy"], false);
        assert_eq!(
            value["summary_markdown"],
            written.summary.display().to_string()
        );
        assert!(chrono::DateTime::parse_from_rfc3339(
            value["generated_at_utc"].as_str().expect("timestamp")
        )
        .is_ok());
    }
}
