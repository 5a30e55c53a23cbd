//! Evaluates the fixture flows before and after a policy set applies.

use crate::{
    fixtures::{Catalog, ExpectedFlow},
    index::Index,
};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// The outcome of one flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlowResult {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub port: u16,
    pub protocol: String,
    pub allowed_before: bool,
    pub allowed_after: bool,
    pub should_work_after_policy: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_flows: usize,
    pub allowed_before: usize,
    pub allowed_after: usize,
    pub expected_after_allow: usize,
    pub expectation_mismatches: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matrix {
    pub flows: Vec<FlowResult>,
    pub summary: Summary,
}

// === impl FlowResult ===

impl FlowResult {
    pub fn is_mismatch(&self) -> bool {
        self.allowed_after != self.should_work_after_policy
    }
}

// === impl Matrix ===

impl Matrix {
    /// Evaluates each flow against `before` and `after`.
    ///
    /// Fails if a flow names an entity that isn't in `catalog`.
    pub fn evaluate<'f>(
        before: &Index,
        after: &Index,
        catalog: &Catalog,
        flows: impl IntoIterator<Item = &'f ExpectedFlow>,
    ) -> Result<Self> {
        let mut matrix = Self::default();
        for ExpectedFlow {
            flow,
            allowed_after: expected,
        } in flows
        {
            let source = catalog.get(&flow.source).with_context(|| {
                format!("flow {:?}: unknown source {:?}", flow.name, flow.source)
            })?;
            let destination = catalog.get(&flow.destination).with_context(|| {
                format!(
                    "flow {:?}: unknown destination {:?}",
                    flow.name, flow.destination
                )
            })?;

            let allowed_before = before.is_allowed(source, destination, flow.port, &flow.protocol);
            let verdict = after.evaluate(source, destination, flow.port, &flow.protocol);
            debug!(flow = %flow.name, allowed_before, ?verdict);

            let result = FlowResult {
                name: flow.name.clone(),
                source: flow.source.clone(),
                destination: flow.destination.clone(),
                port: flow.port,
                protocol: flow.protocol.to_string(),
                allowed_before,
                allowed_after: verdict.is_allowed(),
                should_work_after_policy: *expected,
            };
            if result.is_mismatch() {
                warn!(
                    flow = %flow,
                    name = %flow.name,
                    expected = *expected,
                    egress = verdict.egress,
                    ingress = verdict.ingress,
                    "Flow does not match its expected outcome"
                );
            }
            matrix.push(result);
        }
        Ok(matrix)
    }

    fn push(&mut self, result: FlowResult) {
        let summary = &mut self.summary;
        summary.total_flows += 1;
        summary.allowed_before += usize::from(result.allowed_before);
        summary.allowed_after += usize::from(result.allowed_after);
        summary.expected_after_allow += usize::from(result.should_work_after_policy);
        summary.expectation_mismatches += usize::from(result.is_mismatch());
        self.flows.push(result);
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &FlowResult> {
        self.flows.iter().filter(|r| r.is_mismatch())
    }
}
