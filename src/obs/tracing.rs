// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by provider operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("oauth2_authority.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
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

/// Emits a `warn` event for a rejected request. Reasons never carry secrets.
pub(crate) fn rejected(kind: OperationKind, reason: &Error) {
	#[cfg(feature = "tracing")]
	{
		if reason.is_server_error() {
			tracing::error!(operation = kind.as_str(), error = %reason, "operation failed");
		} else {
			tracing::warn!(operation = kind.as_str(), error = %reason, "request rejected");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, reason);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::VerifyToken, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn rejected_accepts_protocol_and_server_errors() {
		rejected(OperationKind::ExchangeCode, &Error::invalid_grant("replayed"));
		rejected(
			OperationKind::ExchangeCode,
			&Error::from(crate::store::StoreError::Backend { message: "down".into() }),
		);
	}
}
