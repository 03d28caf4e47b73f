//! Canvas projection of the current graph state. No physics here: every
//! frame redraws edges and nodes from whatever positions the simulation
//! left in the snapshot.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphState;
use super::types::DegreeBucket;

const BACKGROUND: &str = "#f8f9fa";
const EDGE_COLOR: &str = "153, 153, 153";
const LABEL_FONT: &str = "10px Arial, sans-serif";
const LEGEND_FONT: &str = "11px Arial, sans-serif";
const TOOLTIP_FONT: &str = "12px Arial, sans-serif";

pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_legend(state, ctx);
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let highlighting = state.has_hover();
	for edge in &state.snapshot.edges {
		let source = &state.snapshot.nodes[edge.source];
		let target = &state.snapshot.nodes[edge.target];

		let touches_hover = state
			.hover
			.node
			.is_some_and(|idx| edge.touches(idx));
		let (alpha, width) = if !highlighting {
			(0.6, edge.stroke_width())
		} else if touches_hover {
			(1.0, edge.stroke_width() * 1.5)
		} else {
			(0.1, edge.stroke_width())
		};

		ctx.set_stroke_style_str(&format!("rgba({EDGE_COLOR}, {alpha})"));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(source.x, source.y);
		ctx.line_to(target.x, target.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	for (idx, node) in state.snapshot.nodes.iter().enumerate() {
		let alpha = if state.is_dimmed(idx) { 0.3 } else { 1.0 };
		ctx.set_global_alpha(alpha);

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius(), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.bucket().color());
		ctx.fill();
		ctx.set_stroke_style_str("#fff");
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_fill_style_str("#333");
		ctx.set_font(LABEL_FONT);
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&node.label(), node.x, node.y + 3.0);

		ctx.set_global_alpha(1.0);
	}
	ctx.set_text_align("start");
}

fn draw_legend(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let entries = [
		(DegreeBucket::Orphan, 8.0),
		(DegreeBucket::Light, 10.0),
		(DegreeBucket::Connected, 15.0),
		(DegreeBucket::Hub, 20.0),
	];
	let (base_x, base_y) = (state.width - 150.0, 20.0);
	ctx.set_font(LEGEND_FONT);
	ctx.set_text_align("start");
	for (i, (bucket, size)) in entries.iter().enumerate() {
		let y = base_y + i as f64 * 25.0;
		ctx.begin_path();
		let _ = ctx.arc(base_x, y, size / 2.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(bucket.color());
		ctx.fill();
		ctx.set_stroke_style_str("#fff");
		ctx.set_line_width(1.0);
		ctx.stroke();
		ctx.set_fill_style_str("#333");
		let _ = ctx.fill_text(bucket.legend_label(), base_x + 15.0, y + 4.0);
	}
}

fn draw_tooltip(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hover.node else {
		return;
	};
	let node = &state.snapshot.nodes[idx];
	let created = node
		.created
		.as_ref()
		.map(|raw| {
			js_sys::Date::new(&JsValue::from_str(raw))
				.to_locale_date_string("en-US", &JsValue::UNDEFINED)
				.into()
		})
		.unwrap_or_else(|| "Unknown".to_string());
	let lines = [
		node.title.clone(),
		format!("Connections: {}", node.connections),
		format!("Created: {created}"),
	];

	ctx.set_font(TOOLTIP_FONT);
	let width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0_f64, f64::max)
		+ 16.0;
	let height = lines.len() as f64 * 16.0 + 10.0;
	let (px, py) = state.hover.pointer;
	// Keep the box inside the canvas when hovering near the right edge.
	let x = (px + 10.0).min(state.width - width);
	let y = (py - 10.0).max(0.0);

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
	ctx.fill_rect(x, y, width, height);
	ctx.set_fill_style_str("#fff");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 8.0, y + 18.0 + i as f64 * 16.0);
	}
}
