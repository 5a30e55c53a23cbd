use crate::{
    fixtures::{self, Catalog},
    index::Index,
    load_policies,
    matrix::Matrix,
    report,
};
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, info_span};

#[derive(Debug, Parser)]
#[clap(
    name = "netpol-reachability",
    version,
    about = "Evaluates NetworkPolicy reachability for a fixed workload topology"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "netpol_reachability=info,warn",
        env = "NETPOL_REACHABILITY_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// Path to a multi-document NetworkPolicy YAML file.
    #[clap(long)]
    policy_file: PathBuf,

    /// Namespace for policies that don't set `metadata.namespace`. Application workloads are
    /// placed in this namespace.
    #[clap(long, default_value = "student-dev")]
    policy_namespace: String,

    /// Directory in which `results.json` and `summary.md` are written.
    ///
    /// When omitted, the Markdown summary is printed to stdout.
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Exits with an error if any flow doesn't match its expected outcome.
    #[clap(long)]
    fail_on_mismatch: bool,
}

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            policy_file,
            policy_namespace,
            output_dir,
            fail_on_mismatch,
        } = self;

        if let Err(error) = log_format.try_init(log_level) {
            bail!("failed to initialize logging: {error}");
        }

        let _span = info_span!("evaluate", ns = %policy_namespace).entered();

        let after = load_policies(&policy_file, &policy_namespace)?;
        info!(policies = after.len(), file = %policy_file.display(), "Evaluating flows");

        let catalog = Catalog::fixture(&policy_namespace);
        let flows = fixtures::flows();
        let matrix = Matrix::evaluate(&Index::default(), &after, &catalog, &flows)?;
        info!(
            flows = matrix.summary.total_flows,
            allowed_before = matrix.summary.allowed_before,
            allowed_after = matrix.summary.allowed_after,
            mismatches = matrix.summary.expectation_mismatches,
            "Evaluated flows"
        );

        match output_dir {
            Some(dir) => {
                let report::Written { results, summary } =
                    report::write(&dir, &policy_file, &policy_namespace, &matrix)?;
                info!(results = %results.display(), summary = %summary.display(), "Wrote reports");
            }
            None => print!(
                "{}",
                report::summary_markdown(&policy_file, &policy_namespace, &matrix)?
            ),
        }

        let mismatches = matrix.summary.expectation_mismatches;
        if fail_on_mismatch && mismatches > 0 {
            bail!("{mismatches} flow(s) did not match their expected outcome");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["netpol-reachability", "--policy-file", "policy.yaml"])
            .expect("args must parse");
        assert_eq!(args.policy_file, PathBuf::from("policy.yaml"));
        assert_eq!(args.policy_namespace, "student-dev");
        assert_eq!(args.output_dir, None);
        assert!(!args.fail_on_mismatch);
    }

    #[test]
    fn parses_options() {
        let args = Args::try_parse_from([
            "netpol-reachability",
            "--policy-file",
            "policy.yaml",
            "--policy-namespace",
            "staging",
            "--output-dir",
            "out",
            "--fail-on-mismatch",
            "--log-format",
            "json",
        ])
        .expect("args must parse");
        assert_eq!(args.policy_namespace, "staging");
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.fail_on_mismatch);
    }

    #[test]
    fn requires_a_policy_file() {
        assert!(Args::try_parse_from(["netpol-reachability"]).is_err());
    }
}
