//! Flow spans. Without the `tracing` feature the span is a unit value and wrapping is a no-op.

// self
use crate::{_prelude::*, obs::FlowKind};

/// Future returned by [`FlowSpan::wrap`].
#[cfg(feature = "tracing")]
pub type Traced<F> = ::tracing::instrument::Instrumented<F>;
/// Future returned by [`FlowSpan::wrap`].
#[cfg(not(feature = "tracing"))]
pub type Traced<F> = F;

/// Span covering one connector operation, labeled with its flow and operation name.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: ::tracing::Span,
}
#[cfg(feature = "tracing")]
impl FlowSpan {
	/// Opens an `info` span named `hubspot_oauth.flow`.
	pub fn new(kind: FlowKind, operation: &'static str) -> Self {
		Self { span: ::tracing::info_span!("hubspot_oauth.flow", flow = kind.as_str(), operation) }
	}

	/// Runs `fut` inside the span on every poll.
	pub fn wrap<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		::tracing::Instrument::instrument(fut, self.span.clone())
	}
}
#[cfg(not(feature = "tracing"))]
impl FlowSpan {
	/// Builds the inert span.
	pub fn new(_: FlowKind, _: &'static str) -> Self {
		Self {}
	}

	/// Returns `fut` unchanged.
	pub fn wrap<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		fut
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn wrapped_future_keeps_its_output() {
		let span = FlowSpan::new(FlowKind::FetchItems, "fetch_items");
		let ids = span.wrap(async { vec!["101", "102"] }).await;

		assert_eq!(ids, ["101", "102"]);
	}

	#[cfg(feature = "tracing")]
	#[test]
	fn span_carries_the_flow_name() {
		let span = FlowSpan::new(FlowKind::Callback, "handle_callback");

		// Spans are disabled without a subscriber; the name is still fixed at the callsite.
		assert!(span.span.metadata().is_none_or(|meta| meta.name() == "hubspot_oauth.flow"));
	}
}
