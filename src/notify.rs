//! Auto-expiring toast notifications.
//!
//! Every failure in the subsystem degrades to one of these plus an empty or
//! prior-state view; nothing blocks and nothing is fatal.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// How long a notice stays on screen.
const NOTICE_TTL_MS: i32 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
	Info,
	Success,
	Error,
}

impl Level {
	fn class(self) -> &'static str {
		match self {
			Level::Info => "info",
			Level::Success => "success",
			Level::Error => "error",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	pub id: u64,
	pub level: Level,
	pub message: String,
}

/// Copyable handle for pushing notices from anywhere in the app.
#[derive(Clone, Copy)]
pub struct Notifier {
	notices: RwSignal<Vec<Notice>>,
	next_id: StoredValue<u64>,
}

impl Notifier {
	pub fn new() -> Self {
		Self {
			notices: RwSignal::new(Vec::new()),
			next_id: StoredValue::new(0),
		}
	}

	/// Shows `message` and schedules its removal after [`NOTICE_TTL_MS`].
	pub fn notify(&self, level: Level, message: impl Into<String>) {
		let id = self.next_id.with_value(|n| *n);
		self.next_id.set_value(id + 1);
		self.notices.update(|list| {
			list.push(Notice {
				id,
				level,
				message: message.into(),
			})
		});

		let notices = self.notices;
		let expire = Closure::once_into_js(move || {
			notices.update(|list| list.retain(|n| n.id != id));
		});
		if let Some(window) = web_sys::window() {
			let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
				expire.unchecked_ref(),
				NOTICE_TTL_MS,
			);
		}
	}

	pub fn info(&self, message: impl Into<String>) {
		self.notify(Level::Info, message);
	}

	pub fn success(&self, message: impl Into<String>) {
		self.notify(Level::Success, message);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.notify(Level::Error, message);
	}

	fn list(&self) -> Vec<Notice> {
		self.notices.get()
	}
}

impl Default for Notifier {
	fn default() -> Self {
		Self::new()
	}
}

/// Fixed-position stack of active notices.
#[component]
pub fn NotificationArea(notifier: Notifier) -> impl IntoView {
	view! {
		<div class="notification-area">
			<For
				each=move || notifier.list()
				key=|notice| notice.id
				children=|notice| {
					view! {
						<div class=format!(
							"notification notification-{}",
							notice.level.class(),
						)>{notice.message}</div>
					}
				}
			/>
		</div>
	}
}
