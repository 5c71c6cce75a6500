//! Browser callbacks that must be released with the view that registered them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A `requestAnimationFrame` loop. Stops when dropped.
pub struct AnimationLoop {
	callback: FrameCallback,
	frame_id: Rc<Cell<Option<i32>>>,
	alive: Rc<Cell<bool>>,
}

impl AnimationLoop {
	pub fn start(window: &Window, mut frame: impl FnMut() + 'static) -> Self {
		let callback: FrameCallback = Rc::new(RefCell::new(None));
		let frame_id = Rc::new(Cell::new(None));
		let alive = Rc::new(Cell::new(true));

		let (callback_inner, frame_inner, alive_inner) =
			(callback.clone(), frame_id.clone(), alive.clone());
		*callback.borrow_mut() = Some(Closure::new(move || {
			if !alive_inner.get() {
				return;
			}
			frame();
			if let (Some(cb), Some(win)) = (callback_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}

		Self {
			callback,
			frame_id,
			alive,
		}
	}

	pub fn stop(&mut self) {
		self.alive.set(false);
		if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// The closure holds a handle to its own slot; clearing it breaks the cycle.
		self.callback.borrow_mut().take();
	}
}

impl Drop for AnimationLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

/// The id of at most one pending `setTimeout`.
#[derive(Debug, Default)]
pub struct TimeoutSlot(Cell<Option<i32>>);

impl TimeoutSlot {
	/// Record `id` as pending and hand back the one it replaces.
	pub fn replace(&self, id: i32) -> Option<i32> {
		self.0.replace(Some(id))
	}

	/// Forget the pending id, returning it if there was one.
	pub fn take(&self) -> Option<i32> {
		self.0.take()
	}

	pub fn is_pending(&self) -> bool {
		self.0.get().is_some()
	}
}

/// A callback run once after a delay. Rescheduling replaces the pending call,
/// and dropping cancels it, so the callback never outlives its owner.
pub struct DelayedCall {
	callback: Closure<dyn FnMut()>,
	pending: Rc<TimeoutSlot>,
}

impl DelayedCall {
	pub fn new(mut f: impl FnMut() + 'static) -> Self {
		let pending = Rc::new(TimeoutSlot::default());
		let pending_inner = pending.clone();
		let callback: Closure<dyn FnMut()> = Closure::new(move || {
			pending_inner.take();
			f();
		});
		Self { callback, pending }
	}

	/// Run after `delay_ms`, replacing any call still waiting.
	pub fn schedule(&self, delay_ms: i32) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
			self.callback.as_ref().unchecked_ref(),
			delay_ms,
		);
		if let Ok(id) = scheduled {
			if let Some(previous) = self.pending.replace(id) {
				window.clear_timeout_with_handle(previous);
			}
		}
	}

	pub fn cancel(&self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			window.clear_timeout_with_handle(id);
		}
	}
}

impl Drop for DelayedCall {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// A window event listener, removed when dropped.
pub struct WindowListener {
	event: &'static str,
	callback: Closure<dyn FnMut()>,
}

impl WindowListener {
	pub fn attach(window: &Window, event: &'static str, f: impl FnMut() + 'static) -> Self {
		let callback: Closure<dyn FnMut()> = Closure::new(f);
		let _ = window.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
		Self { event, callback }
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
		}
	}
}
