use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::font::FontHandle;
use super::placement::CloudLabel;
use super::render;
use super::state::WordCloudState;
use crate::components::animation::{AnimationLoop, DelayedCall, WindowListener};
use crate::config::CloudConfig;

// Give the layout a moment to settle before reading the new size.
const RESIZE_DELAY_MS: i32 = 100;

struct CloudView {
	state: Rc<RefCell<WordCloudState>>,
	_frames: AnimationLoop,
	_resize: WindowListener,
	resize_call: Rc<DelayedCall>,
}

impl Drop for CloudView {
	fn drop(&mut self) {
		self.resize_call.cancel();
	}
}

fn cursor_for(hovering: bool) -> &'static str {
	if hovering { "pointer" } else { "grab" }
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn mount(
	canvas: &HtmlCanvasElement,
	labels: Vec<CloudLabel>,
	font: FontHandle,
	config: &CloudConfig,
) -> Option<CloudView> {
	let window: Window = web_sys::window()?;
	let (w, h) = container_size(canvas);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
	let state = Rc::new(RefCell::new(WordCloudState::new(labels, font, config, w, h)));

	let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
	let resize_call = Rc::new(DelayedCall::new(move || {
		let (nw, nh) = container_size(&canvas_resize);
		canvas_resize.set_width(nw as u32);
		canvas_resize.set_height(nh as u32);
		state_resize.borrow_mut().resize(nw, nh);
	}));
	let resize_listener = resize_call.clone();
	let resize = WindowListener::attach(&window, "resize", move || {
		resize_listener.schedule(RESIZE_DELAY_MS);
	});

	let state_anim = state.clone();
	let frames = AnimationLoop::start(&window, move || {
		let mut s = state_anim.borrow_mut();
		s.tick();
		let font = s.font.clone();
		s.layout_hit_boxes(|text, px| render::measure(&ctx, &font, text, px));
		render::render(&s, &ctx);
	});

	Some(CloudView {
		state,
		_frames: frames,
		_resize: resize,
		resize_call,
	})
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Rotating sphere of entity names. Clicking a name calls `on_select` with it.
#[component]
pub fn WordCloudCanvas(
	labels: Vec<CloudLabel>,
	font: FontHandle,
	config: CloudConfig,
	#[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let cloud: Rc<RefCell<Option<CloudView>>> = Rc::new(RefCell::new(None));
	let cloud_init = cloud.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match mount(&canvas, labels.clone(), font.clone(), &config) {
			Some(v) => *cloud_init.borrow_mut() = Some(v),
			None => log::error!("entity cloud: canvas unavailable"),
		}
	});

	let holder = StoredValue::new_local(cloud.clone());
	on_cleanup(move || {
		holder.try_update_value(|v| v.borrow_mut().take());
	});

	let with_state = {
		let cloud = cloud.clone();
		move |f: &mut dyn FnMut(&mut WordCloudState)| {
			if let Some(v) = cloud.borrow().as_ref() {
				f(&mut v.state.borrow_mut());
			}
		}
	};

	let set_cursor = move |hovering: bool| {
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor_for(hovering));
		}
	};

	let with_state_md = with_state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		with_state_md(&mut |s| {
			s.drag.active = true;
			(s.drag.start_x, s.drag.start_y) = (x, y);
			(s.drag.last_x, s.drag.last_y) = (x, y);
		});
	};

	let with_state_mm = with_state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut hovering = false;
		with_state_mm(&mut |s| {
			if s.drag.active {
				let (dx, dy) = (x - s.drag.last_x, y - s.drag.last_y);
				let height = s.height;
				s.camera.drag(dx, dy, height);
				(s.drag.last_x, s.drag.last_y) = (x, y);
			} else {
				s.hover = s.label_at(x, y);
				hovering = s.hover.is_some();
			}
		});
		set_cursor(hovering);
	};

	let with_state_mu = with_state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut selected = None;
		with_state_mu(&mut |s| {
			if s.drag.active && s.drag.is_click(x, y) {
				selected = s.label_at(x, y).map(|i| s.labels[i].text.clone());
			}
			s.drag.active = false;
		});
		if let Some(name) = selected {
			log::debug!("entity selected: {name}");
			on_select.run(name);
		}
	};

	let with_state_ml = with_state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state_ml(&mut |s| {
			s.drag.active = false;
			s.hover = None;
		});
		set_cursor(false);
	};

	let with_state_wh = with_state;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		with_state_wh(&mut |s| {
			let factor = if ev.delta_y() > 0.0 { 1.1 } else { 0.9 };
			s.camera.zoom(factor);
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="word-cloud-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cursor_shows_pointer_only_over_labels() {
		assert_eq!(cursor_for(true), "pointer");
		assert_eq!(cursor_for(false), "grab");
	}
}
