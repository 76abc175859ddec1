//! Scoped DOM callbacks: listeners that unregister themselves on drop, and a
//! `requestAnimationFrame` loop that can be cancelled.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Event, EventTarget};

/// An event listener removed from its target when dropped.
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, kind: &'static str, f: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {:?}", self.kind, err);
        }
    }
}

/// Runs `f` on the shared state if it still exists and is not already
/// borrowed; otherwise does nothing. Callbacks that fire after their owner
/// was torn down land here and return.
pub fn with_state<T>(state: &Weak<RefCell<T>>, f: impl FnOnce(&mut T)) {
    if let Some(state) = state.upgrade() {
        if let Ok(mut state) = state.try_borrow_mut() {
            f(&mut state);
        }
    }
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Self-rescheduling animation-frame loop.
///
/// The callback is stored in a shared slot so it can request the next frame
/// from inside itself. [`AnimationLoop::cancel`] cancels the pending request,
/// clears the running flag and empties the slot, which also breaks the
/// callback's reference cycle.
pub struct AnimationLoop {
    slot: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
}

impl AnimationLoop {
    /// Starts calling `tick(timestamp_ms)` once per frame until cancelled.
    pub fn start<F>(mut tick: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) + 'static,
    {
        let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));

        let callback = {
            let slot = slot.clone();
            let pending = pending.clone();
            let running = running.clone();
            Closure::wrap(Box::new(move |now: f64| {
                pending.set(None);
                if !running.get() {
                    return;
                }
                tick(now);
                if !running.get() {
                    return;
                }

                // schedule next
                let next = match (window(), slot.borrow().as_ref()) {
                    (Some(win), Some(cb)) => {
                        win.request_animation_frame(cb.as_ref().unchecked_ref())
                    }
                    _ => return,
                };
                match next {
                    Ok(id) => pending.set(Some(id)),
                    Err(err) => log::error!("request_animation_frame failed: {:?}", err),
                }
            }) as Box<dyn FnMut(f64)>)
        };

        let win = window().ok_or("no window")?;
        let id = win.request_animation_frame(callback.as_ref().unchecked_ref())?;
        pending.set(Some(id));
        *slot.borrow_mut() = Some(callback);

        Ok(Self {
            slot,
            pending,
            running,
        })
    }

    /// Stops the loop. Later calls do nothing.
    pub fn cancel(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(win)) = (self.pending.take(), window()) {
            if let Err(err) = win.cancel_animation_frame(id) {
                log::warn!("cancel_animation_frame failed: {:?}", err);
            }
        }
        self.slot.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_with_state_runs_on_live_state() {
        let state = Rc::new(RefCell::new(0u32));
        with_state(&Rc::downgrade(&state), |n| *n += 1);
        assert_eq!(*state.borrow(), 1);
    }

    #[wasm_bindgen_test]
    fn test_with_state_skips_dropped_state() {
        let state = Rc::new(RefCell::new(0u32));
        let weak = Rc::downgrade(&state);
        drop(state);
        let mut called = false;
        with_state(&weak, |_| called = true);
        assert!(!called);
    }

    #[wasm_bindgen_test]
    fn test_with_state_skips_reentrant_borrow() {
        let state = Rc::new(RefCell::new(0u32));
        let weak = Rc::downgrade(&state);
        let _held = state.borrow_mut();
        let mut called = false;
        with_state(&weak, |_| called = true);
        assert!(!called);
    }
}
