//! Flow counters. Recording is a no-op unless the `metrics` feature is on and a recorder is
//! installed.

// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counter incremented once per flow attempt and once per outcome.
pub const FLOW_COUNTER: &str = "hubspot_oauth_flow_total";

/// Bumps [`FLOW_COUNTER`] labeled with `flow` and `outcome`.
#[cfg(feature = "metrics")]
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	::metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
}

/// Bumps [`FLOW_COUNTER`] labeled with `flow` and `outcome`.
#[cfg(not(feature = "metrics"))]
pub fn record_flow_outcome(_: FlowKind, _: FlowOutcome) {}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_harmless() {
		for outcome in [FlowOutcome::Attempt, FlowOutcome::Success, FlowOutcome::Failure] {
			record_flow_outcome(FlowKind::Authorize, outcome);
		}

		assert!(FLOW_COUNTER.starts_with("hubspot_oauth_"));
	}
}
