use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{FRAME_DT, ForceGraphState};
use super::types::GraphData;
use crate::components::animation::{AnimationLoop, WindowListener};
use crate::config::PhysicsConfig;

#[derive(Debug, Error)]
pub enum RenderError {
	#[error("no browser window")]
	NoWindow,
	#[error("canvas 2d context unavailable: {0}")]
	NoContext(String),
}

/// One live graph drawing: the simulation, its animation loop and its resize
/// listener. Dropping it stops the loop and detaches the listener.
pub struct GraphRenderer {
	state: Rc<RefCell<ForceGraphState>>,
	_frames: AnimationLoop,
	_resize: WindowListener,
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

impl GraphRenderer {
	/// Lay out `data`, run the stabilization pass and start drawing on `canvas`.
	pub fn mount(
		canvas: &HtmlCanvasElement,
		data: &GraphData,
		physics: &PhysicsConfig,
	) -> Result<Self, RenderError> {
		let window: Window = web_sys::window().ok_or(RenderError::NoWindow)?;
		let (w, h) = parent_size(canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| RenderError::NoContext(format!("{:?}", e)))?
			.ok_or_else(|| RenderError::NoContext("null context".into()))?
			.dyn_into()
			.map_err(|_| RenderError::NoContext("not a 2d context".into()))?;
		let state = Rc::new(RefCell::new(ForceGraphState::new(data, w, h, physics)));

		let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
		let resize = WindowListener::attach(&window, "resize", move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			state_resize.borrow_mut().resize(nw, nh);
		});

		let state_anim = state.clone();
		let frames = AnimationLoop::start(&window, move || {
			let mut s = state_anim.borrow_mut();
			s.tick(FRAME_DT);
			render::render(&s, &ctx);
		});

		Ok(Self {
			state,
			_frames: frames,
			_resize: resize,
		})
	}

	pub fn state(&self) -> &Rc<RefCell<ForceGraphState>> {
		&self.state
	}
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn ForceGraphCanvas(data: GraphData, physics: PhysicsConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let renderer: Rc<RefCell<Option<GraphRenderer>>> = Rc::new(RefCell::new(None));
	let (renderer_init, error) = (renderer.clone(), RwSignal::new(None::<String>));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match GraphRenderer::mount(&canvas, &data, &physics) {
			Ok(r) => *renderer_init.borrow_mut() = Some(r),
			Err(err) => {
				log::error!("graph renderer failed to mount: {err}");
				error.set(Some(err.to_string()));
			}
		}
	});

	let holder = StoredValue::new_local(renderer.clone());
	on_cleanup(move || {
		holder.try_update_value(|r| r.borrow_mut().take());
	});

	let with_state = {
		let renderer = renderer.clone();
		move |f: &mut dyn FnMut(&mut ForceGraphState)| {
			if let Some(r) = renderer.borrow().as_ref() {
				f(&mut r.state().borrow_mut());
			}
		}
	};

	let with_state_md = with_state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		with_state_md(&mut |s| {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				let (mut nx, mut ny) = (0.0, 0.0);
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						(nx, ny) = (node.x(), node.y());
					}
				});
				s.drag.node_start_x = nx;
				s.drag.node_start_y = ny;
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		});
	};

	let with_state_mm = with_state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		with_state_mm(&mut |s| {
			s.hover.pointer = (x, y);
			// Update hover state when not dragging
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		});
	};

	let with_state_mu = with_state.clone();
	let on_mouseup = move |_: MouseEvent| {
		with_state_mu(&mut |s| {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		});
	};

	let with_state_ml = with_state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state_ml(&mut |s| {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		});
	};

	let with_state_wh = with_state;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		with_state_wh(&mut |s| {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		{move || error.get().map(|e| view! { <p class="graph-error">{e}</p> })}
	}
}
