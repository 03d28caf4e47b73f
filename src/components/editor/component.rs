use leptos::prelude::*;
use web_sys::HtmlTextAreaElement;

use super::linkspan::{scan, utf16_to_byte_offset, LinkSpan};
use crate::api::{ApiClient, Suggestion};
use crate::components::suggest::{SuggestionService, SUGGESTION_LIMIT};

/// Quiet window before an edit burst triggers the autosave hook.
const AUTOSAVE_MS: i32 = 2_000;

type DropdownState = (LinkSpan, Vec<Suggestion>);

/// Free-text note editor with inline `[[...]]` link autocompletion.
///
/// On every text change the cursor is checked against the bracket spans in
/// the buffer; while it sits inside one, a debounced suggestion query runs
/// and the dropdown shows the winning batch. Selecting an entry replaces
/// exactly the span's byte range with the chosen title. Persistence is the
/// host's concern and arrives through the injected `on_autosave` hook.
#[component]
pub fn Editor(
	title: RwSignal<String>,
	content: RwSignal<String>,
	api: StoredValue<ApiClient, LocalStorage>,
	#[prop(into)] on_autosave: Callback<()>,
) -> impl IntoView {
	let area_ref = NodeRef::<leptos::html::Textarea>::new();
	let dropdown: RwSignal<Option<DropdownState>> = RwSignal::new(None);
	let service = StoredValue::new_local(SuggestionService::new(
		api.get_value(),
		SUGGESTION_LIMIT,
	));
	let autosave = StoredValue::new_local(crate::components::suggest::Debounce::default());

	let schedule_autosave = move || {
		autosave.update_value(|timer| {
			timer.schedule(AUTOSAVE_MS, move || on_autosave.run(()));
		});
	};

	let on_title_input = move |ev: leptos::ev::Event| {
		title.set(event_target_value(&ev));
		schedule_autosave();
	};

	let on_input = move |_: leptos::ev::Event| {
		let Some(area) = area_ref.get() else {
			return;
		};
		let area: HtmlTextAreaElement = area.into();
		let value = area.value();
		content.set(value.clone());
		schedule_autosave();

		let cursor_utf16 = area.selection_start().ok().flatten().unwrap_or(0);
		let cursor = utf16_to_byte_offset(&value, cursor_utf16);
		match scan(&value, cursor) {
			Some(span) => {
				// The active span is exclusive: a batch shown for any other
				// span (including this one at pre-keystroke offsets) must
				// not survive until the new query lands, or its rows would
				// commit at stale byte ranges.
				let shown_elsewhere = dropdown
					.with_untracked(|d| d.as_ref().is_some_and(|(shown, _)| *shown != span));
				if shown_elsewhere {
					dropdown.set(None);
				}
				let text = span.inner.clone();
				service.update_value(|svc| {
					svc.query(text, move |batch| {
						dropdown.set(Some((span, batch)));
					});
				});
			}
			None => {
				service.update_value(SuggestionService::cancel);
				dropdown.set(None);
			}
		}
	};

	// Tab indents instead of moving focus, matching the plain-text editing
	// behavior of the rest of the component.
	let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
		if ev.key() != "Tab" {
			return;
		}
		ev.prevent_default();
		let Some(area) = area_ref.get_untracked() else {
			return;
		};
		let area: HtmlTextAreaElement = area.into();
		let value = area.value();
		let cursor_utf16 = area.selection_start().ok().flatten().unwrap_or(0);
		let (next, caret) = insert_indent(&value, utf16_to_byte_offset(&value, cursor_utf16));
		let caret16 = next[..caret].encode_utf16().count() as u32;
		content.set(next.clone());
		area.set_value(&next);
		let _ = area.set_selection_range(caret16, caret16);
		schedule_autosave();
	};

	// Hiding is idempotent and also neutralizes any in-flight query.
	let hide = move || {
		service.update_value(SuggestionService::cancel);
		dropdown.set(None);
	};
	let on_blur = move |_: leptos::ev::FocusEvent| hide();

	view! {
		<div class="editor-pane">
			<input
				class="note-title"
				type="text"
				placeholder="Note title"
				prop:value=move || title.get()
				on:input=on_title_input
			/>
			<textarea
				node_ref=area_ref
				class="note-content"
				placeholder="Write, and link notes with [[double brackets]]"
				prop:value=move || content.get()
				on:input=on_input
				on:keydown=on_keydown
				on:blur=on_blur
			></textarea>
			{move || {
				dropdown
					.get()
					.map(|(span, batch)| {
						view! {
							<SuggestionDropdown
								span=span
								batch=batch
								content=content
								dropdown=dropdown
								area_ref=area_ref
							/>
						}
					})
			}}
		</div>
	}
}

/// Positioned list of candidates for the active span, or a "create" row
/// when the batch is empty.
#[component]
fn SuggestionDropdown(
	span: LinkSpan,
	batch: Vec<Suggestion>,
	content: RwSignal<String>,
	dropdown: RwSignal<Option<DropdownState>>,
	area_ref: NodeRef<leptos::html::Textarea>,
) -> impl IntoView {
	let rows = if batch.is_empty() {
		let create_span = span.clone();
		let inner = span.inner.clone();
		leptos::either::Either::Left(view! {
			<div
				class="suggestion-item no-results"
				on:mousedown=move |ev: web_sys::MouseEvent| {
					ev.prevent_default();
					commit(content, dropdown, area_ref, &create_span.inner, &create_span);
				}
			>
				{format!("No notes found. Select to create \"{inner}\"")}
			</div>
		})
	} else {
		leptos::either::Either::Right(
			batch
				.into_iter()
				.map(|suggestion| {
					let chosen = suggestion.title.clone();
					let row_span = span.clone();
					let preview = suggestion.preview();
					view! {
						<div
							class="suggestion-item"
							on:mousedown=move |ev: web_sys::MouseEvent| {
								ev.prevent_default();
								commit(content, dropdown, area_ref, &chosen, &row_span);
							}
						>
							<div class="suggestion-title">{suggestion.title}</div>
							<div class="suggestion-preview">{preview}</div>
						</div>
					}
				})
				.collect_view(),
		)
	};

	view! { <div class="link-suggestions-dropdown">{rows}</div> }
}

/// Replaces exactly the span's byte range in the buffer with `chosen`,
/// restores the caret to the end of the insertion, then hides the
/// dropdown. The buffer must still hold `[[inner]]` at the span's exact
/// offsets; a span the text has since shifted out from under commits
/// nothing rather than splicing at stale offsets.
fn commit(
	content: RwSignal<String>,
	dropdown: RwSignal<Option<DropdownState>>,
	area_ref: NodeRef<leptos::html::Textarea>,
	chosen: &str,
	span: &LinkSpan,
) {
	let mut value = content.get_untracked();
	let intact = value
		.get(span.start..span.end)
		.is_some_and(|range| range == format!("[[{}]]", span.inner));
	if intact {
		value.replace_range(span.start..span.end, chosen);
		content.set(value.clone());
		if let Some(area) = area_ref.get_untracked() {
			let area: HtmlTextAreaElement = area.into();
			area.set_value(&value);
			let caret = value[..span.start + chosen.len()].encode_utf16().count() as u32;
			let _ = area.set_selection_range(caret, caret);
			let _ = area.focus();
		}
	}
	dropdown.set(None);
}

/// Inserts a literal tab at the caret (a byte offset on a char boundary,
/// clamped to the text length), returning the new buffer and the byte
/// offset just past the inserted character.
fn insert_indent(text: &str, caret: usize) -> (String, usize) {
	let caret = caret.min(text.len());
	let mut next = String::with_capacity(text.len() + 1);
	next.push_str(&text[..caret]);
	next.push('\t');
	next.push_str(&text[caret..]);
	(next, caret + 1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn commit_replaces_exactly_the_live_span() {
		let content = RwSignal::new("x [[alphab]] y".to_string());
		let dropdown: RwSignal<Option<DropdownState>> = RwSignal::new(None);
		let area = NodeRef::new();
		let span = LinkSpan { inner: "alphab".into(), start: 2, end: 12 };
		commit(content, dropdown, area, "Title", &span);
		assert_eq!(content.get_untracked(), "x Title y");
		assert!(dropdown.get_untracked().is_none());
	}

	#[test]
	fn commit_refuses_offsets_the_text_has_shifted_under() {
		// Offsets captured before a trailing keystroke widened the span;
		// splicing at them would drop a bracket and eat a character.
		let content = RwSignal::new("x [[alphab]]".to_string());
		let dropdown: RwSignal<Option<DropdownState>> = RwSignal::new(None);
		let area = NodeRef::new();
		let stale = LinkSpan { inner: "alpha".into(), start: 2, end: 11 };
		dropdown.set(Some((stale.clone(), Vec::new())));
		commit(content, dropdown, area, "Title", &stale);
		assert_eq!(content.get_untracked(), "x [[alphab]]");
		assert!(dropdown.get_untracked().is_none());
	}

	#[test]
	fn indent_inserts_a_tab_at_the_caret() {
		assert_eq!(insert_indent("ab", 1), ("a\tb".to_string(), 2));
		assert_eq!(insert_indent("", 0), ("\t".to_string(), 1));
		// Past-the-end carets clamp.
		assert_eq!(insert_indent("a", 9), ("a\t".to_string(), 2));
	}
}
