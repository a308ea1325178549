use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;

use crate::dom::{self, Debouncer, Listener};

/// Widths at or above this use the desktop nav.
pub const DESKTOP_MIN_WIDTH_PX: f64 = 768.0;
pub const RESIZE_DEBOUNCE_MS: i32 = 250;
/// Matches the drawer's slide-in transition.
pub const FOCUS_DELAY_MS: i32 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// New open state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Whether a settled resize to `width` should close the drawer.
    pub fn closes_on_resize(&self, width: f64) -> bool {
        self.open && width >= DESKTOP_MIN_WIDTH_PX
    }
}

struct Menu {
    button: web_sys::Element,
    drawer: web_sys::Element,
    overlay: web_sys::Element,
    state: Cell<MenuState>,
    resize: Debouncer,
    focus_delay: Debouncer,
}

impl Menu {
    fn toggle(&self) {
        if self.state.get().is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    fn open(&self) {
        let mut state = self.state.get();
        state.open();
        self.state.set(state);

        dom::add_class(&self.drawer, "mobile-menu-drawer--open");
        dom::add_class(&self.overlay, "mobile-menu-overlay--visible");
        let _ = self.button.set_attribute("aria-expanded", "true");
        dom::set_body_scroll_locked(true);

        if let Some(first_link) = dom::query_in(&self.drawer, "a") {
            self.focus_delay.schedule(move || dom::focus(&first_link));
        }
    }

    fn close(&self) {
        let mut state = self.state.get();
        state.close();
        self.state.set(state);

        self.focus_delay.cancel();
        dom::remove_class(&self.drawer, "mobile-menu-drawer--open");
        dom::remove_class(&self.overlay, "mobile-menu-overlay--visible");
        let _ = self.button.set_attribute("aria-expanded", "false");
        dom::set_body_scroll_locked(false);
        dom::focus(&self.button);
    }
}

/// Hamburger drawer for narrow viewports.
pub struct MobileMenu {
    menu: Rc<Menu>,
    _listeners: Vec<Listener>,
}

impl MobileMenu {
    pub fn attach() -> Option<Self> {
        let menu = Rc::new(Menu {
            button: dom::query("[data-mobile-menu-button]")?,
            drawer: dom::query("[data-mobile-menu-drawer]")?,
            overlay: dom::query("[data-mobile-menu-overlay]")?,
            state: Cell::new(MenuState::default()),
            resize: Debouncer::new(RESIZE_DEBOUNCE_MS),
            focus_delay: Debouncer::new(FOCUS_DELAY_MS),
        });

        let mut listeners = Vec::new();

        let m = menu.clone();
        listeners.push(Listener::new(&menu.button, "click", move |_| m.toggle()));

        if let Some(close_button) = dom::query("[data-mobile-menu-close]") {
            let m = menu.clone();
            listeners.push(Listener::new(&close_button, "click", move |_| m.close()));
        }

        let m = menu.clone();
        listeners.push(Listener::new(&menu.overlay, "click", move |_| m.close()));

        for link in dom::query_all_in(&menu.drawer, "a") {
            let m = menu.clone();
            listeners.push(Listener::new(&link, "click", move |_| m.close()));
        }

        let m = menu.clone();
        let escape = Listener::on_window("keydown", move |ev| {
            let is_escape = ev
                .dyn_ref::<web_sys::KeyboardEvent>()
                .is_some_and(|k| k.key() == "Escape");
            if is_escape && m.state.get().is_open() {
                m.close();
            }
        });
        listeners.extend(escape);

        let m = menu.clone();
        let resize = Listener::on_window("resize", move |_| {
            let settled = m.clone();
            m.resize.schedule(move || {
                let width = web_sys::window()
                    .and_then(|w| w.inner_width().ok())
                    .and_then(|w| w.as_f64())
                    .unwrap_or(0.0);
                if settled.state.get().closes_on_resize(width) {
                    settled.close();
                }
            });
        });
        listeners.extend(resize);

        Some(Self {
            menu,
            _listeners: listeners,
        })
    }

    pub fn is_open(&self) -> bool {
        self.menu.state.get().is_open()
    }

    pub fn toggle(&self) {
        self.menu.toggle();
    }

    pub fn close(&self) {
        if self.is_open() {
            self.menu.close();
        }
    }

    pub fn destroy(self) {
        self.menu.resize.cancel();
        self.menu.focus_delay.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_state() {
        let mut s = MenuState::default();
        assert!(s.toggle());
        assert!(s.is_open());
        assert!(!s.toggle());
    }

    #[test]
    fn test_resize_closes_only_open_menu_on_desktop() {
        let mut s = MenuState::default();
        assert!(!s.closes_on_resize(1024.0));

        s.open();
        assert!(!s.closes_on_resize(767.0));
        assert!(s.closes_on_resize(768.0));

        s.close();
        assert!(!s.closes_on_resize(1280.0));
    }
}
