//! Full-screen search overlay over the same debounced query machinery the
//! editor dropdown uses, with a larger result limit.

use leptos::either::EitherOf4;
use leptos::prelude::*;

use crate::api::{ApiClient, Suggestion};
use crate::components::suggest::{SuggestionService, SEARCH_LIMIT};

/// Queries shorter than this never hit the network.
const MIN_QUERY_CHARS: usize = 2;

#[derive(Clone, PartialEq)]
enum Phase {
	Prompt,
	Loading,
	Results(Vec<Suggestion>),
}

/// Modal search across all notes. Picking a result loads that note and
/// closes the overlay; clicking the backdrop closes it without a pick.
#[component]
pub fn SearchOverlay(
	api: StoredValue<ApiClient, LocalStorage>,
	#[prop(into)] on_open_note: Callback<i64>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let phase = RwSignal::new(Phase::Prompt);
	let service = StoredValue::new_local(SuggestionService::new(api.get_value(), SEARCH_LIMIT));
	let input_ref = NodeRef::<leptos::html::Input>::new();

	Effect::new(move |_| {
		if let Some(input) = input_ref.get() {
			let _ = input.focus();
		}
	});

	let on_input = move |ev: leptos::ev::Event| {
		let text = event_target_value(&ev);
		if text.chars().count() < MIN_QUERY_CHARS {
			service.update_value(SuggestionService::cancel);
			phase.set(Phase::Prompt);
			return;
		}
		phase.set(Phase::Loading);
		service.update_value(|svc| {
			svc.query(text, move |batch| phase.set(Phase::Results(batch)));
		});
	};

	// Only a click on the backdrop itself dismisses; clicks inside the
	// panel bubble up with a different target.
	let on_backdrop = move |ev: web_sys::MouseEvent| {
		if ev.target() == ev.current_target() {
			on_close.run(());
		}
	};

	view! {
		<div class="search-overlay" on:mousedown=on_backdrop>
			<div class="search-panel">
				<input
					node_ref=input_ref
					class="search-input"
					type="text"
					placeholder="Search notes..."
					on:input=on_input
				/>
				<div class="search-results">
					{move || match phase.get() {
						Phase::Prompt => {
							EitherOf4::A(view! {
								<div class="search-hint">
									"Type at least 2 characters to search..."
								</div>
							})
						}
						Phase::Loading => {
							EitherOf4::B(view! {
								<div class="search-hint">"Searching..."</div>
							})
						}
						Phase::Results(batch) if batch.is_empty() => {
							EitherOf4::C(view! {
								<div class="search-hint">"No notes found."</div>
							})
						}
						Phase::Results(batch) => {
							EitherOf4::D(
								batch
									.into_iter()
									.map(|suggestion| {
										let id = suggestion.id;
										let preview = suggestion.preview();
										view! {
											<div
												class="search-result"
												on:click=move |_| {
													on_open_note.run(id);
													on_close.run(());
												}
											>
												<div class="search-result-title">
													{suggestion.title}
												</div>
												<div class="search-result-preview">{preview}</div>
											</div>
										}
									})
									.collect_view(),
							)
						}
					}}
				</div>
			</div>
		</div>
	}
}
