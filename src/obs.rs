//! Optional observability helpers for connector flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `hubspot_oauth.flow` with the
//!   `flow` and `operation` fields, plus point events for state transitions.
//! - Enable `metrics` to increment the `hubspot_oauth_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Connector flows observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization URL construction and verifier storage.
	Authorize,
	/// Redirect handling and code exchange.
	Callback,
	/// Refresh-on-demand.
	Refresh,
	/// Contact listing.
	FetchItems,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::Callback => "callback",
			FlowKind::Refresh => "refresh",
			FlowKind::FetchItems => "fetch_items",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a connector flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside a flow span, recording attempt and outcome counters around it.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, operation: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, operation);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.wrap(fut).await;

	match &result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(_err) => {
			flow_event!(warn, flow = kind.as_str(), status = _err.status(), error = %_err, "Flow failed.");
			record_flow_outcome(kind, FlowOutcome::Failure);
		},
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::AuthError;

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok = observe(FlowKind::Authorize, "test", async { Ok(7) }).await;

		assert_eq!(ok.expect("Successful flow should pass its value through."), 7);

		let err = observe::<(), _>(FlowKind::Refresh, "test", async {
			Err(AuthError::MissingCredentials.into())
		})
		.await
		.expect_err("Failing flow should pass its error through.");

		assert_eq!(err.status(), 401);
	}

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::FetchItems.to_string(), "fetch_items");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}
}
