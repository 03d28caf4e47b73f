//! Debounced, cancellable queries against the search endpoint.
//!
//! Every scheduled query is tagged with a sequence number when its debounce
//! window fires; a response is applied only while its number is still the
//! latest issued. Results therefore land in request-issuance order: a slow
//! early response can never overwrite a later query's batch, no matter how
//! the network reorders arrivals.

use std::sync::atomic::{AtomicU64, Ordering};

use leptos::task::spawn_local;
use log::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::api::{ApiClient, Suggestion};

/// Quiet window before a query actually goes out.
pub const DEBOUNCE_MS: i32 = 300;
/// Candidate count requested for the inline link dropdown.
pub const SUGGESTION_LIMIT: usize = 5;
/// Candidate count requested by the search overlay.
pub const SEARCH_LIMIT: usize = 20;

/// Monotonic request tags. `issue` marks a new request as the latest,
/// `admits` tells a completed request whether it still is.
#[derive(Debug, Default)]
pub struct SequenceGate {
	latest: AtomicU64,
}

impl SequenceGate {
	pub fn issue(&self) -> u64 {
		self.latest.fetch_add(1, Ordering::Relaxed) + 1
	}

	pub fn admits(&self, seq: u64) -> bool {
		self.latest.load(Ordering::Relaxed) == seq
	}

	/// Invalidates every request issued so far without issuing a new one.
	/// In-flight responses then complete silently.
	pub fn invalidate(&self) {
		self.latest.fetch_add(1, Ordering::Relaxed);
	}
}

/// One-shot cancellable timer over `window.setTimeout`. Scheduling while a
/// call is pending supersedes it; the superseded call never fires.
#[derive(Default)]
pub struct Debounce {
	pending: Option<(i32, Closure<dyn FnMut()>)>,
}

impl Debounce {
	pub fn schedule(&mut self, delay_ms: i32, f: impl FnOnce() + 'static) {
		self.cancel();
		let Some(window) = web_sys::window() else {
			return;
		};
		let cb = Closure::once(f);
		match window.set_timeout_with_callback_and_timeout_and_arguments_0(
			cb.as_ref().unchecked_ref(),
			delay_ms,
		) {
			Ok(id) => self.pending = Some((id, cb)),
			Err(err) => warn!("failed to schedule timer: {err:?}"),
		}
	}

	pub fn cancel(&mut self) {
		if let Some((id, _)) = self.pending.take() {
			if let Some(window) = web_sys::window() {
				window.clear_timeout_with_handle(id);
			}
		}
	}
}

impl Drop for Debounce {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// Issues debounced search queries and hands the winning batch to the
/// caller's `apply` closure. Owned by whichever view consumes the batches;
/// each view keeps its own instance and its own gate.
pub struct SuggestionService {
	api: ApiClient,
	gate: std::rc::Rc<SequenceGate>,
	debounce: Debounce,
	limit: usize,
}

impl SuggestionService {
	pub fn new(api: ApiClient, limit: usize) -> Self {
		Self {
			api,
			gate: std::rc::Rc::new(SequenceGate::default()),
			debounce: Debounce::default(),
			limit,
		}
	}

	/// Schedules a query for `text`. A call arriving within the debounce
	/// window supersedes the pending one rather than queueing behind it.
	/// Network failure degrades to an empty batch, logged, never surfaced
	/// as a blocking error.
	pub fn query(&mut self, text: String, apply: impl FnOnce(Vec<Suggestion>) + 'static) {
		let api = self.api.clone();
		let gate = std::rc::Rc::clone(&self.gate);
		let limit = self.limit;
		self.debounce.schedule(DEBOUNCE_MS, move || {
			let seq = gate.issue();
			spawn_local(async move {
				let batch = match api.search(&text, limit).await {
					Ok(batch) => batch,
					Err(err) => {
						warn!("suggestion query failed: {err}");
						Vec::new()
					}
				};
				if gate.admits(seq) {
					apply(batch);
				} else {
					debug!("discarding stale suggestion batch (seq {seq})");
				}
			});
		});
	}

	/// Cancels the pending query and neutralizes any in-flight response's
	/// effect. The response may still complete, silently.
	pub fn cancel(&mut self) {
		self.debounce.cancel();
		self.gate.invalidate();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_latest_issue_is_admitted() {
		let gate = SequenceGate::default();
		let first = gate.issue();
		let second = gate.issue();
		assert!(!gate.admits(first));
		assert!(gate.admits(second));
	}

	#[test]
	fn invalidate_rejects_everything_in_flight() {
		let gate = SequenceGate::default();
		let seq = gate.issue();
		gate.invalidate();
		assert!(!gate.admits(seq));
	}

	#[test]
	fn out_of_order_arrival_keeps_last_query_result() {
		// Two queries issued back to back; responses arrive reversed.
		let gate = SequenceGate::default();
		let mut displayed: Vec<&str> = Vec::new();

		let older = gate.issue();
		let newer = gate.issue();

		// Newer response lands first and wins.
		if gate.admits(newer) {
			displayed = vec!["newer"];
		}
		// Older response straggles in afterwards and is dropped.
		if gate.admits(older) {
			displayed = vec!["older"];
		}

		assert_eq!(displayed, vec!["newer"]);
	}
}
