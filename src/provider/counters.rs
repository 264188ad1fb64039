// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for credential issuance and rejection.
#[derive(Debug, Default)]
pub struct OperationMetrics {
	codes_issued: AtomicU64,
	tokens_issued: AtomicU64,
	rejections: AtomicU64,
	revocations: AtomicU64,
}
impl OperationMetrics {
	/// Authorization codes handed out by `authorize`.
	pub fn codes_issued(&self) -> u64 {
		self.codes_issued.load(Ordering::Relaxed)
	}

	/// Access and refresh tokens minted.
	pub fn tokens_issued(&self) -> u64 {
		self.tokens_issued.load(Ordering::Relaxed)
	}

	/// Operations that ended in an error.
	pub fn rejections(&self) -> u64 {
		self.rejections.load(Ordering::Relaxed)
	}

	/// Tokens deleted through revocation.
	pub fn revocations(&self) -> u64 {
		self.revocations.load(Ordering::Relaxed)
	}

	pub(crate) fn record_code(&self) {
		self.codes_issued.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_tokens(&self, count: u64) {
		self.tokens_issued.fetch_add(count, Ordering::Relaxed);
	}

	pub(crate) fn record_rejection(&self) {
		self.rejections.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_revocation(&self) {
		self.revocations.fetch_add(1, Ordering::Relaxed);
	}
}
