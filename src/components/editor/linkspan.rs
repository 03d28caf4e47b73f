//! Cursor-aware detection of inline `[[...]]` wikilink spans.

/// A bracket span containing the cursor. Offsets are byte indices into the
/// scanned text, `start` at the first `[` and `end` one past the last `]`.
/// Transient: recomputed on every edit, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSpan {
	pub inner: String,
	pub start: usize,
	pub end: usize,
}

/// Finds the leftmost `[[...]]` span whose bracket range contains `cursor`
/// (a byte offset; both bracket pairs count as inside).
///
/// A span is two open brackets, one or more non-`]` characters, two close
/// brackets. Matches are non-overlapping, scanned left to right in a single
/// pass. Malformed input (unclosed `[[`, empty `[[]]`, a lone `]`) never
/// matches and never panics.
pub fn scan(text: &str, cursor: usize) -> Option<LinkSpan> {
	let bytes = text.as_bytes();
	let mut i = 0;
	while i + 1 < bytes.len() {
		if bytes[i] != b'[' || bytes[i + 1] != b'[' {
			i += 1;
			continue;
		}
		let inner_start = i + 2;
		let mut j = inner_start;
		while j < bytes.len() && bytes[j] != b']' {
			j += 1;
		}
		if j == bytes.len() {
			// No closing bracket anywhere ahead, so nothing later can
			// match either.
			return None;
		}
		if j == inner_start {
			// Empty brackets. A new span can only start past them.
			i = inner_start;
			continue;
		}
		if j + 1 < bytes.len() && bytes[j + 1] == b']' {
			let end = j + 2;
			if cursor >= i && cursor <= end {
				return Some(LinkSpan {
					inner: text[inner_start..j].to_string(),
					start: i,
					end,
				});
			}
			i = end;
		} else {
			// Single close bracket: no match can start before it, since
			// any earlier `[[` would hit this same lone `]`.
			i = j + 1;
		}
	}
	None
}

/// Converts a UTF-16 code-unit offset (what the DOM selection API reports)
/// into a byte offset into `text`, clamped to the text length.
pub fn utf16_to_byte_offset(text: &str, utf16: u32) -> usize {
	let mut units = 0u32;
	for (idx, ch) in text.char_indices() {
		if units >= utf16 {
			return idx;
		}
		units += ch.len_utf16() as u32;
	}
	text.len()
}
