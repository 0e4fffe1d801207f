use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Div;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn container_size(container: &web_sys::HtmlDivElement) -> (f64, f64) {
	let (w, h) = (container.client_width(), container.client_height());
	if w > 0 && h > 0 {
		(w as f64, h as f64)
	} else {
		FALLBACK_SIZE
	}
}

fn local_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

type ClosureSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything the mounted graph keeps alive outside the reactive tree.
#[derive(Clone, Default)]
struct GraphHandles {
	state: Rc<RefCell<Option<ForceGraphState>>>,
	animate: ClosureSlot,
	resize_cb: ClosureSlot,
	frame: Rc<Cell<Option<i32>>>,
}

impl GraphHandles {
	/// Cancels the pending frame, detaches the resize listener and drops both
	/// closures, which breaks the animation closure's reference to itself.
	fn release(&self) {
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(ref cb) = *self.resize_cb.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.frame.take();
		self.resize_cb.borrow_mut().take();
		self.animate.borrow_mut().take();
		self.state.borrow_mut().take();
		debug!("story graph released");
	}
}

/// Force-directed view of a story.
///
/// The graph is rebuilt whenever `data` changes and resized with the window;
/// clicking a node calls `on_node_click` with the node id.
#[component]
pub fn StoryGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(optional)] on_node_click: Option<Callback<String>>,
) -> impl IntoView {
	let container_ref = NodeRef::<Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handles = GraphHandles::default();
	let GraphHandles {
		state,
		animate: animate_init,
		resize_cb: resize_cb_init,
		frame: frame_init,
	} = handles.clone();
	let state_init = state.clone();

	let stored = StoredValue::new_local(handles);
	on_cleanup(move || {
		stored.try_with_value(GraphHandles::release);
	});

	Effect::new(move |_| {
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = container_size(&container);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas 2d context unavailable");
			return;
		};
		let mut initial = ForceGraphState::new(&data.get_untracked(), w, h);
		initial.set_selected(selected.get_untracked());
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&container);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, frame_anim) =
			(state_init.clone(), animate_init.clone(), frame_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			frame_anim.set(None);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_anim.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let state_data = state.clone();
	Effect::new(move |_| {
		let graph = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.rebuild(&graph);
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.set_selected(id);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
			let cursor = if s.pan.active {
				"grabbing"
			} else if s.focus.node.is_some() {
				"pointer"
			} else {
				"grab"
			};
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, &ev);
		let clicked = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_up(x, y));
		if let Some(id) = clicked {
			match on_node_click {
				Some(cb) => cb.run(id),
				None => debug!("Node clicked: {id}"),
			}
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
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			// same wheel-to-scale curve as d3-zoom
			let factor = (-ev.delta_y() * 0.002).exp();
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<div node_ref=container_ref class="story-graph">
			<canvas
				node_ref=canvas_ref
				class="story-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}
