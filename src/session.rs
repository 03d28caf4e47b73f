//! UI mode coordination: editing versus graph exploration, plus the search
//! overlay that can sit atop either.
//!
//! Pure state. The page owns a copy inside a signal and decides what each
//! transition triggers (a fresh graph fetch on every entry into
//! [`Mode::GraphExploring`], cancellation of in-flight work on exit).

/// The two mutually exclusive top-level modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
	#[default]
	Editing,
	GraphExploring,
}

/// Current mode plus the orthogonal search-overlay flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeState {
	pub mode: Mode,
	pub search_open: bool,
}

impl ModeState {
	/// Flips between editing and the graph view. Returns true when the
	/// transition entered the graph view, which is the caller's cue to
	/// fetch and adapt a fresh snapshot. Nothing is cached across entries.
	pub fn toggle_graph(&mut self) -> bool {
		match self.mode {
			Mode::Editing => {
				self.mode = Mode::GraphExploring;
				true
			}
			Mode::GraphExploring => {
				self.mode = Mode::Editing;
				false
			}
		}
	}

	/// Returns to editing. Idempotent.
	pub fn close_graph(&mut self) {
		self.mode = Mode::Editing;
	}

	pub fn toggle_search(&mut self) {
		self.search_open = !self.search_open;
	}

	/// Hides the overlay. Idempotent.
	pub fn close_search(&mut self) {
		self.search_open = false;
	}

	/// Global escape: both closes run unconditionally, search first, so the
	/// overlay always wins when both happen to be signaled.
	pub fn escape(&mut self) {
		self.close_search();
		self.close_graph();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toggle_graph_flips_and_reports_entry() {
		let mut state = ModeState::default();
		assert!(state.toggle_graph());
		assert_eq!(state.mode, Mode::GraphExploring);
		assert!(!state.toggle_graph());
		assert_eq!(state.mode, Mode::Editing);
	}

	#[test]
	fn closes_are_idempotent() {
		let mut state = ModeState::default();
		state.close_graph();
		state.close_graph();
		assert_eq!(state.mode, Mode::Editing);

		state.toggle_search();
		state.close_search();
		state.close_search();
		assert!(!state.search_open);
	}

	#[test]
	fn search_overlay_is_orthogonal_to_mode() {
		let mut state = ModeState::default();
		state.toggle_graph();
		state.toggle_search();
		assert_eq!(state.mode, Mode::GraphExploring);
		assert!(state.search_open);
	}

	#[test]
	fn escape_closes_both_unconditionally() {
		let mut state = ModeState::default();
		state.toggle_graph();
		state.toggle_search();
		state.escape();
		assert_eq!(state.mode, Mode::Editing);
		assert!(!state.search_open);

		// Already closed: escape stays a no-op rather than toggling.
		state.escape();
		assert_eq!(state.mode, Mode::Editing);
		assert!(!state.search_open);
	}
}
