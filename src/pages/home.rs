//! The single page hosting everything: editor, graph view, search overlay
//! and the notification stack, coordinated through [`ModeState`].

use std::sync::Arc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::api::ApiClient;
use crate::components::editor::Editor;
use crate::components::graph::types::GraphSnapshot;
use crate::components::graph::{adapt, GraphCanvas};
use crate::components::search::SearchOverlay;
use crate::components::suggest::SequenceGate;
use crate::notify::{NotificationArea, Notifier};
use crate::session::{Mode, ModeState};

/// Workspace page.
#[component]
pub fn Home() -> impl IntoView {
	let api = StoredValue::new_local(ApiClient::from_window());
	let notifier = Notifier::new();

	let mode = RwSignal::new(ModeState::default());
	let title = RwSignal::new(String::new());
	let content = RwSignal::new(String::new());
	let current_note: RwSignal<Option<i64>> = RwSignal::new(None);

	// None while no fetch has landed for the current graph session; an empty
	// snapshot (the fetch-failed fallback) still renders, as the empty state.
	let snapshot: RwSignal<Option<GraphSnapshot>> = RwSignal::new(None);
	// Tags graph fetches so a response landing after the view closed, or
	// after a newer entry into the view, is dropped.
	let graph_gen = StoredValue::new(Arc::new(SequenceGate::default()));

	let fetch_graph = move || {
		let gate = graph_gen.get_value();
		let seq = gate.issue();
		spawn_local(async move {
			match api.get_value().graph().await {
				Ok(raw) => {
					if gate.admits(seq) {
						snapshot.set(Some(adapt(&raw)));
					}
				}
				Err(err) => {
					error!("graph fetch failed: {err}");
					if gate.admits(seq) {
						notifier.error("Failed to load graph");
						snapshot.set(Some(GraphSnapshot::default()));
					}
				}
			}
		});
	};

	let leave_graph = move || {
		graph_gen.get_value().invalidate();
		snapshot.set(None);
	};

	let toggle_graph = move || {
		let mut entered = false;
		mode.update(|m| entered = m.toggle_graph());
		if entered {
			fetch_graph();
		} else {
			leave_graph();
		}
	};

	let load_note = move |id: i64| {
		spawn_local(async move {
			match api.get_value().note(id).await {
				Ok(note) => {
					title.set(note.title.clone());
					content.set(note.content);
					current_note.set(Some(note.id));
					notifier.success(format!("Loaded: {}", note.title));
				}
				Err(err) => {
					error!("note {id} fetch failed: {err}");
					notifier.error("Failed to load note");
				}
			}
		});
	};

	// Persistence belongs to the storage service behind the API; from here a
	// save is a validation plus a signal to the user.
	let save_note = move || {
		if title.get_untracked().trim().is_empty() {
			notifier.error("Please enter a note title");
			return;
		}
		notifier.success("Note saved");
	};

	let autosaved = move |_: ()| {
		if !title.get_untracked().trim().is_empty() {
			notifier.info("Autosaved");
		}
	};

	let new_note = move || {
		title.set(String::new());
		content.set(String::new());
		current_note.set(None);
	};

	// Picking a node (or a search result) always lands back in the editor
	// with that note loaded.
	let open_note = move |id: i64| {
		mode.update(|m| m.close_graph());
		leave_graph();
		load_note(id);
	};

	let toggle_search = move || mode.update(|m| m.toggle_search());
	let close_search = move |_: ()| mode.update(|m| m.close_search());

	// The listener handle is not Send; park it in local storage for the
	// cleanup hook to drain.
	let key_handle = StoredValue::new_local(Some(window_event_listener(ev::keydown, move |ev| {
		if ev.key() == "Escape" {
			// Unconditional: closes the overlay first, then the graph view,
			// whatever combination is actually open.
			mode.update(|m| m.escape());
			leave_graph();
			return;
		}
		if !(ev.ctrl_key() || ev.meta_key()) {
			return;
		}
		match ev.key().as_str() {
			"s" => {
				ev.prevent_default();
				save_note();
			}
			"n" => {
				ev.prevent_default();
				new_note();
			}
			"f" => {
				ev.prevent_default();
				toggle_search();
			}
			_ => {}
		}
	})));
	on_cleanup(move || {
		key_handle.update_value(|handle| {
			if let Some(handle) = handle.take() {
				handle.remove();
			}
		});
	});

	view! {
		<div class="app-shell">
			<header class="toolbar">
				<h1 class="app-name">"Note Graph"</h1>
				<div class="toolbar-actions">
					<button class="btn" on:click=move |_| save_note()>
						"Save"
					</button>
					<button class="btn" on:click=move |_| new_note()>
						"New"
					</button>
					<button class="btn" on:click=move |_| toggle_search()>
						"Search"
					</button>
					<button class="btn" on:click=move |_| toggle_graph()>
						{move || match mode.get().mode {
							Mode::Editing => "Graph",
							Mode::GraphExploring => "Editor",
						}}
					</button>
				</div>
			</header>

			<main class="workspace">
				<Show when=move || mode.get().mode == Mode::Editing>
					<Editor title=title content=content api=api on_autosave=autosaved />
				</Show>
				<Show when=move || mode.get().mode == Mode::GraphExploring>
					<div class="graph-pane">
						{move || {
							snapshot
								.get()
								.map_or_else(
									|| {
										leptos::either::Either::Left(
											view! {
												<div class="graph-loading">"Loading graph..."</div>
											},
										)
									},
									|snap| {
										leptos::either::Either::Right(
											view! {
												<GraphCanvas snapshot=snap on_select=open_note />
											},
										)
									},
								)
						}}
					</div>
				</Show>
			</main>

			<Show when=move || mode.get().search_open>
				<SearchOverlay api=api on_open_note=open_note on_close=close_search />
			</Show>

			<NotificationArea notifier=notifier />
		</div>
	}
}
