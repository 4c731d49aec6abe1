// self
use crate::{_prelude::*, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("session_relay.call", kind = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event naming a token by fingerprint only.
pub fn token_event(message: &'static str, fingerprint: Option<&str>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(token = fingerprint.unwrap_or("none"), "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (message, fingerprint);
	}
}

/// Emits a warning for a token-store failure the caller cannot act on.
pub fn store_failure(message: &'static str, err: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %err, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (message, err);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(CallKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);

		token_event("smoke", None);
		store_failure("smoke", &"backend offline");
	}
}
