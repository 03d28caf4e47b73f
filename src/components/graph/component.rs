use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::either::Either;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::GraphState;
use super::types::GraphSnapshot;

/// Delay before the auto-fit transform is applied, long enough for the
/// simulation to partially settle.
const AUTO_FIT_DELAY_MS: i32 = 500;

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		parent
			.as_ref()
			.map(|p| p.client_width() as f64)
			.unwrap_or(800.0),
		parent.map(|p| p.client_height() as f64).unwrap_or(600.0),
	)
}

/// Interactive canvas for one graph-view session.
///
/// Mounted fresh with a freshly adapted snapshot each time the graph view
/// opens; unmounting stops the animation loop so no further ticks are
/// processed after close. Clicking a node reports its note id through
/// `on_select`.
#[component]
pub fn GraphCanvas(snapshot: GraphSnapshot, #[prop(into)] on_select: Callback<i64>) -> impl IntoView {
	if snapshot.is_empty() {
		return Either::Left(view! {
			<div class="graph-empty">
				"No notes to visualize yet. Create some notes with [[links]] to see the graph!"
			</div>
		});
	}

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Shared with the cleanup hook, which requires a Send container.
	let alive: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, alive_init) = (state.clone(), animate.clone(), alive.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
			.expect("2d canvas context");
		*state_init.borrow_mut() = Some(GraphState::new(snapshot.clone(), w, h));

		// Auto-fit once the layout has had a moment to spread out.
		let (fit_state, fit_alive) = (state_init.clone(), alive_init.clone());
		let fit_cb = Closure::once_into_js(move || {
			if !fit_alive.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *fit_state.borrow_mut() {
				s.fit_to_view();
			}
		});
		let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
			fit_cb.unchecked_ref(),
			AUTO_FIT_DELAY_MS,
		);

		let (state_anim, animate_inner, alive_anim) =
			(state_init.clone(), animate_init.clone(), alive_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_rs = state.clone();
	// The listener handle is not Send, so it parks in local storage until
	// the cleanup hook drains it.
	let resize_handle = StoredValue::new_local(Some(window_event_listener(leptos::ev::resize, move |_| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		if let Some(ref mut s) = *state_rs.borrow_mut() {
			s.resize(w, h);
		}
	})));

	// Closing the view must fully stop the tick loop.
	let alive_cleanup = alive.clone();
	on_cleanup(move || {
		alive_cleanup.store(false, Ordering::Relaxed);
		resize_handle.update_value(|handle| {
			if let Some(handle) = handle.take() {
				handle.remove();
			}
		});
	});

	let pointer_position = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| {
				let idx = s.pointer_up()?;
				Some(s.snapshot.nodes[idx].id)
			});
		if let Some(id) = clicked {
			on_select.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(factor, x, y);
		}
	};

	Either::Right(view! {
		<canvas
			node_ref=canvas_ref
			class="note-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	})
}
