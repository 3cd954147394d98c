//! `requestAnimationFrame` driver.
//!
//! The callback reschedules itself for as long as `tick` returns `true`. The
//! closure holds a handle to its own slot, so it stays alive until [`FrameLoop::stop`]
//! clears the slot; `stop` must not be called from inside `tick` or `on_stall`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::ui_model::{after_frame, FrameAction};

type FrameCallback = Closure<dyn FnMut(f64)>;

pub(super) struct FrameLoop {
    callback: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

fn request_frame(cb: &FrameCallback) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .ok()
}

impl FrameLoop {
    /// `on_stall` runs once if a frame cannot be scheduled while `tick` still
    /// wants more.
    pub(super) fn start(
        mut tick: impl FnMut(f64) -> bool + 'static,
        mut on_stall: impl FnMut(String) + 'static,
    ) -> Result<Self, String> {
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let slot = callback.clone();
        let pending_in = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            pending_in.set(None);
            let keep_going = tick(timestamp);
            let next = if keep_going {
                slot.borrow().as_ref().and_then(request_frame)
            } else {
                None
            };
            pending_in.set(next);
            if after_frame(keep_going, next) == FrameAction::Stalled {
                on_stall("requestAnimationFrame failed mid-spin".to_string());
            }
        }) as Box<dyn FnMut(f64)>));

        let first = callback.borrow().as_ref().and_then(request_frame);
        if first.is_none() {
            callback.borrow_mut().take();
            return Err("requestAnimationFrame unavailable".to_string());
        }
        pending.set(first);
        Ok(Self { callback, pending })
    }

    /// Cancel the pending frame and release the callback.
    pub(super) fn stop(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = web_sys::window() {
                w.cancel_animation_frame(id).ok();
            }
        }
        self.callback.borrow_mut().take();
    }
}
