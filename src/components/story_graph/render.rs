use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_RADIUS};

const BACKGROUND: &str = "#1e1e2f";
const LINK_RGB: &str = "153, 153, 153";
const ARROW_SIZE: f64 = 10.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	ctx.set_text_align("center");
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let positions = state.positions();
	let t = ease_out_cubic(state.focus.strength);

	for link in &state.links {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};

		let in_focus =
			state.focus.includes(link.source) && state.focus.includes(link.target);
		// links inside the focus brighten to 0.95, the rest dim to 0.15
		let alpha = if in_focus {
			0.6 + 0.35 * t
		} else {
			0.6 - 0.45 * t
		};
		let color = format!("rgba({LINK_RGB}, {alpha})");
		ctx.set_stroke_style_str(&color);
		ctx.set_fill_style_str(&color);
		ctx.set_line_width(2.0);

		if link.source == link.target {
			draw_self_loop(ctx, x1, y1);
			draw_link_label(ctx, &link.label, x1, y1 - NODE_RADIUS * 2.6, alpha);
			continue;
		}

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + ARROW_SIZE),
			y2 - uy * (NODE_RADIUS + ARROW_SIZE),
		);
		ctx.stroke();

		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		draw_arrow_head(ctx, tip_x, tip_y, ux, uy);
		draw_link_label(ctx, &link.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0, alpha);
	}
}

fn draw_arrow_head(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, ux: f64, uy: f64) {
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_self_loop(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
	let loop_radius = NODE_RADIUS * 0.7;
	let (cx, cy) = (x, y - NODE_RADIUS - loop_radius * 0.6);
	ctx.begin_path();
	let _ = ctx.arc(cx, cy, loop_radius, 0.0, 2.0 * PI);
	ctx.stroke();
	// arrow back into the node on the right side of the loop
	let (tip_x, tip_y) = (x + NODE_RADIUS * 0.35, y - NODE_RADIUS * 0.95);
	draw_arrow_head(ctx, tip_x, tip_y, 0.0, 1.0);
}

fn draw_link_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, alpha: f64) {
	if label.is_empty() {
		return;
	}
	ctx.set_fill_style_str(&format!("rgba(200, 200, 200, {})", alpha.min(1.0)));
	ctx.set_font("10px sans-serif");
	let _ = ctx.fill_text(label, x, y);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_focus, t, k) = (
		state.focus.is_active(),
		ease_out_cubic(state.focus.strength),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let in_focus = has_focus && state.focus.includes(idx);
		let alpha = if has_focus && !in_focus {
			1.0 - 0.6 * t
		} else {
			1.0
		};
		let radius = if state.focus.is_centre(idx) {
			NODE_RADIUS * (1.0 + 0.15 * t)
		} else {
			NODE_RADIUS
		};

		ctx.set_global_alpha(alpha);

		if state.focus.is_centre(idx) && t > 0.01 {
			let glow = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, radius * 1.8);
			if let Ok(gradient) = glow {
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * t));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 1.8, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(info.fill);
		ctx.fill();
		if info.is_missing {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(3.0),
			));
		}
		ctx.set_stroke_style_str("#fff");
		ctx.set_line_width(2.0);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if state.is_selected(info) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 5.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("#fdcb6e");
			ctx.set_line_width(3.0 / k.max(0.5));
			ctx.stroke();
		}

		ctx.set_fill_style_str("#fff");
		ctx.set_font("bold 11px sans-serif");
		let _ = ctx.fill_text(&info.id, x, y + 35.0);
		ctx.set_font("9px sans-serif");
		let _ = ctx.fill_text(&info.preview, x, y + 60.0);
		ctx.set_global_alpha(1.0);
	});
}
