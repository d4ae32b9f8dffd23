//! Prometheus counters for workflow outcomes.

use std::sync::Arc;

use domains::DomainError;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct WorkflowLabels {
    pub operation: String,
    pub outcome: String,
}

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    workflows: Family<WorkflowLabels, Counter>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("ycbn");
        let workflows = Family::<WorkflowLabels, Counter>::default();
        registry.register(
            "workflow",
            "Completed workflow operations by outcome",
            workflows.clone(),
        );
        Self {
            registry: Arc::new(registry),
            workflows,
        }
    }

    /// Counts one finished operation. Errors are labelled by kind.
    pub fn track<T>(&self, operation: &str, result: &Result<T, DomainError>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(err) => error_label(err),
        };
        self.workflows
            .get_or_create(&WorkflowLabels {
                operation: operation.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Current value of one series; reading never creates it.
    pub fn count(&self, operation: &str, outcome: &str) -> u64 {
        self.workflows
            .get(&WorkflowLabels {
                operation: operation.to_string(),
                outcome: outcome.to_string(),
            })
            .map_or(0, |counter| counter.get())
    }

    /// OpenMetrics text exposition.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut body = String::new();
        encode(&mut body, &self.registry)?;
        Ok(body)
    }
}

pub fn error_label(err: &DomainError) -> &'static str {
    match err {
        DomainError::NotFound(..) => "not_found",
        DomainError::Forbidden(_) => "forbidden",
        DomainError::Conflict(_) => "conflict",
        DomainError::Validation(_) => "validation",
        DomainError::Unauthorized(_) => "unauthorized",
        DomainError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ConflictKind;

    #[test]
    fn outcomes_are_counted_and_exported() {
        let metrics = Metrics::new();
        metrics.track("join", &Ok::<_, DomainError>(()));
        metrics.track("join", &Ok::<_, DomainError>(()));
        metrics.track::<()>("join", &Err(DomainError::Conflict(ConflictKind::AlreadyMember)));

        assert_eq!(metrics.count("join", "ok"), 2);
        assert_eq!(metrics.count("join", "conflict"), 1);

        let text = metrics.render().unwrap();
        assert!(text.contains("ycbn_workflow_total"));
        assert!(text.contains(r#"operation="join""#));
    }

    #[test]
    fn reading_an_unseen_series_does_not_export_it() {
        let metrics = Metrics::new();
        assert_eq!(metrics.count("leave", "ok"), 0);
        let text = metrics.render().unwrap();
        assert!(!text.contains(r#"operation="leave""#));
    }
}
