//! Small DOM helpers that do not fit the component layer.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

/// Event listeners tied to a scope: attaching keeps the closure alive, and
/// dropping the scope detaches everything.
pub struct ListenerScope {
    target: EventTarget,
    listeners: Vec<(&'static str, Closure<dyn FnMut(web_sys::Event)>)>,
}

impl ListenerScope {
    pub fn new(target: EventTarget) -> Self {
        Self {
            target,
            listeners: Vec::new(),
        }
    }

    pub fn listen(&mut self, event: &'static str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(err) = self
            .target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::error!("failed to attach {event} listener: {err:?}");
        }
        self.listeners.push((event, closure));
    }
}

impl Drop for ListenerScope {
    fn drop(&mut self) {
        for (event, closure) in self.listeners.drain(..) {
            if let Err(err) = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::debug!("failed to detach {event} listener: {err:?}");
            }
        }
    }
}
