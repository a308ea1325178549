use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub(crate) fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

pub(crate) fn query(selector: &str) -> Option<web_sys::Element> {
    document()?.query_selector(selector).ok().flatten()
}

pub(crate) fn query_in(root: &web_sys::Element, selector: &str) -> Option<web_sys::Element> {
    root.query_selector(selector).ok().flatten()
}

/// All matches of `selector` under `root`, in document order.
pub(crate) fn query_all_in(root: &web_sys::Element, selector: &str) -> Vec<web_sys::Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return vec![];
    };

    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
        .collect()
}

pub(crate) fn query_all(selector: &str) -> Vec<web_sys::Element> {
    match document().and_then(|d| d.document_element()) {
        Some(root) => query_all_in(&root, selector),
        None => vec![],
    }
}

pub(crate) fn add_class(el: &web_sys::Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub(crate) fn remove_class(el: &web_sys::Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

/// Lock or release page scrolling behind an overlay.
pub(crate) fn set_body_scroll_locked(locked: bool) {
    let Some(body) = document().and_then(|d| d.body()) else {
        return;
    };
    let style = body.style();
    if locked {
        let _ = style.set_property("overflow", "hidden");
    } else {
        let _ = style.set_property("overflow", "");
    }
}

pub(crate) fn navigate_to(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(url);
    }
}

pub(crate) fn focus(el: &web_sys::Element) {
    if let Some(el) = el.dyn_ref::<web_sys::HtmlElement>() {
        let _ = el.focus();
    }
}

/// Run `f` once the document has finished parsing.
pub(crate) fn on_ready(f: impl FnOnce() + 'static) {
    let Some(document) = document() else {
        return;
    };

    if document.ready_state() != "loading" {
        f();
        return;
    }

    let cb = Closure::once_into_js(f);
    let _ = document.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref());
}

/// An event listener attached to a DOM node that is not owned by a Leptos view.
///
/// The listener is removed when the value is dropped.
pub(crate) struct Listener {
    target: web_sys::EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn new(
        target: &web_sys::EventTarget,
        event: &'static str,
        f: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(f);
        let _ = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            callback,
        }
    }

    pub fn on_window(event: &'static str, f: impl FnMut(web_sys::Event) + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self::new(&window, event, f))
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

type Task = Box<dyn FnOnce()>;

/// Cancel-and-restart timer: scheduling replaces whatever is still pending,
/// so at most one task is queued at a time.
///
/// Every timeout fires the same JS function, which runs the queued task.
/// A replaced or cancelled task is dropped right away.
#[derive(Clone)]
pub(crate) struct Debouncer {
    delay_ms: i32,
    timer: Rc<Cell<Option<i32>>>,
    task: Rc<RefCell<Option<Task>>>,
    callback: Rc<Closure<dyn FnMut()>>,
}

impl Debouncer {
    pub fn new(delay_ms: i32) -> Self {
        let timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let task: Rc<RefCell<Option<Task>>> = Rc::new(RefCell::new(None));

        let callback = {
            let timer = timer.clone();
            let task = task.clone();
            Closure::<dyn FnMut()>::new(move || {
                timer.set(None);
                // Release the borrow first; the task may schedule again.
                let next = task.borrow_mut().take();
                if let Some(next) = next {
                    next();
                }
            })
        };

        Self {
            delay_ms,
            timer,
            task,
            callback: Rc::new(callback),
        }
    }

    pub fn schedule(&self, f: impl FnOnce() + 'static) {
        let Some(window) = web_sys::window() else {
            return;
        };

        if let Some(id) = self.timer.take() {
            window.clear_timeout_with_handle(id);
        }
        self.task.replace(Some(Box::new(f)));

        let callback: &wasm_bindgen::JsValue = (*self.callback).as_ref();
        let id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                self.delay_ms,
            )
            .ok();
        self.timer.set(id);
    }

    pub fn cancel(&self) {
        if let Some(id) = self.timer.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id);
            }
        }
        self.task.replace(None);
    }

    pub fn is_pending(&self) -> bool {
        self.timer.get().is_some()
    }
}

pub(crate) fn current_year() -> u32 {
    js_sys::Date::new_0().get_full_year()
}

/// Fill `[data-current-year]` with the local year.
pub(crate) fn stamp_current_year() {
    if let Some(el) = query("[data-current-year]") {
        el.set_text_content(Some(&current_year().to_string()));
    }
}
