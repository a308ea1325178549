use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;

use crate::dom::{self, Debouncer, Listener};

pub const AUTO_ROTATE_MS: i32 = 7000;
/// Horizontal travel, in px, before a touch counts as a swipe.
pub const SWIPE_THRESHOLD_PX: i32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Prev,
}

/// Left swipes advance, right swipes go back.
pub fn swipe_direction(start_x: i32, end_x: i32) -> Option<Swipe> {
    let diff = start_x - end_x;
    if diff.abs() <= SWIPE_THRESHOLD_PX {
        return None;
    }
    Some(if diff > 0 { Swipe::Next } else { Swipe::Prev })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselState {
    len: usize,
    index: usize,
    paused: bool,
}

impl CarouselState {
    /// `None` for an empty carousel.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self {
            len,
            index: 0,
            paused: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = if self.index == 0 { self.len - 1 } else { self.index - 1 };
        self.index
    }

    /// Returns false and leaves the index alone when `index` is out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.index = index;
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn rotates(&self) -> bool {
        self.len > 1
    }

    /// Live-region text for the current slide.
    pub fn announcement(&self) -> String {
        format!("Testimonial {} of {}", self.index + 1, self.len)
    }
}

struct Carousel {
    root: web_sys::Element,
    slides: Vec<web_sys::HtmlElement>,
    indicators: Vec<web_sys::Element>,
    prev_button: Option<web_sys::HtmlButtonElement>,
    next_button: Option<web_sys::HtmlButtonElement>,
    state: RefCell<CarouselState>,
    rotation: Debouncer,
    touch_start_x: Cell<i32>,
}

impl Carousel {
    fn render(&self, animate: bool) {
        let state = *self.state.borrow();

        for (i, slide) in self.slides.iter().enumerate() {
            if i == state.index() {
                dom::remove_class(slide, "hidden");
                dom::add_class(slide, "testimonial-slide--active");
                let _ = slide.set_attribute("aria-hidden", "false");

                if animate {
                    // Reading layout between the two writes restarts the animation.
                    let style = slide.style();
                    let _ = style.set_property("animation", "none");
                    let _ = slide.offset_height();
                    let _ = style.set_property("animation", "");
                }
            } else {
                dom::add_class(slide, "hidden");
                dom::remove_class(slide, "testimonial-slide--active");
                let _ = slide.set_attribute("aria-hidden", "true");
            }
        }

        for (i, indicator) in self.indicators.iter().enumerate() {
            let active = i == state.index();
            if active {
                dom::add_class(indicator, "testimonial-indicator--active");
            } else {
                dom::remove_class(indicator, "testimonial-indicator--active");
            }
            let _ = indicator.set_attribute("aria-current", &active.to_string());
        }

        if let Some(button) = &self.prev_button {
            button.set_disabled(state.is_first());
            let _ = button.set_attribute("aria-disabled", &state.is_first().to_string());
        }
        if let Some(button) = &self.next_button {
            button.set_disabled(state.is_last());
            let _ = button.set_attribute("aria-disabled", &state.is_last().to_string());
        }

        if let Some(live) = dom::query_in(&self.root, "[data-testimonials-live]") {
            live.set_text_content(Some(&state.announcement()));
        }
    }

    fn next(self: &Rc<Self>) {
        self.state.borrow_mut().next();
        self.render(true);
        self.restart_rotation();
    }

    fn prev(self: &Rc<Self>) {
        self.state.borrow_mut().prev();
        self.render(true);
        self.restart_rotation();
    }

    fn go_to(&self, index: usize) {
        if self.state.borrow_mut().go_to(index) {
            self.render(true);
        }
    }

    /// Replaces any pending tick, so there is never more than one timer.
    fn restart_rotation(self: &Rc<Self>) {
        if !self.state.borrow().rotates() {
            return;
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        self.rotation.schedule(move || {
            let Some(carousel) = weak.upgrade() else {
                return;
            };
            if carousel.state.borrow().is_paused() {
                carousel.restart_rotation();
            } else {
                carousel.next();
            }
        });
    }
}

/// Testimonials slider under `[data-testimonials-carousel]`.
pub struct TestimonialsCarousel {
    carousel: Rc<Carousel>,
    _listeners: Vec<Listener>,
}

impl TestimonialsCarousel {
    pub fn attach() -> Option<Self> {
        let root = dom::query("[data-testimonials-carousel]")?;
        let track = dom::query_in(&root, "[data-testimonials-track]")?;

        let slides: Vec<web_sys::HtmlElement> = dom::query_all_in(&track, "[data-testimonial-slide]")
            .into_iter()
            .filter_map(|el| el.dyn_into().ok())
            .collect();
        let state = CarouselState::new(slides.len())?;

        let carousel = Rc::new(Carousel {
            indicators: dom::query_all_in(&root, "[data-testimonial-indicator]"),
            prev_button: dom::query_in(&root, "[data-testimonials-prev]").and_then(|el| el.dyn_into().ok()),
            next_button: dom::query_in(&root, "[data-testimonials-next]").and_then(|el| el.dyn_into().ok()),
            root: root.clone(),
            slides,
            state: RefCell::new(state),
            rotation: Debouncer::new(AUTO_ROTATE_MS),
            touch_start_x: Cell::new(0),
        });

        let mut listeners = Vec::new();

        if let Some(button) = &carousel.prev_button {
            let c = carousel.clone();
            listeners.push(Listener::new(button, "click", move |_| c.prev()));
        }
        if let Some(button) = &carousel.next_button {
            let c = carousel.clone();
            listeners.push(Listener::new(button, "click", move |_| c.next()));
        }

        for (index, indicator) in carousel.indicators.iter().enumerate() {
            let c = carousel.clone();
            listeners.push(Listener::new(indicator, "click", move |_| c.go_to(index)));

            let c = carousel.clone();
            listeners.push(Listener::new(indicator, "keydown", move |ev| {
                let Some(key) = ev.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key()) else {
                    return;
                };
                if key == "Enter" || key == " " {
                    ev.prevent_default();
                    c.go_to(index);
                }
            }));
        }

        let c = carousel.clone();
        listeners.push(Listener::new(&root, "keydown", move |ev| {
            let Some(key) = ev.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key()) else {
                return;
            };
            match key.as_str() {
                "ArrowLeft" => {
                    ev.prevent_default();
                    c.prev();
                }
                "ArrowRight" => {
                    ev.prevent_default();
                    c.next();
                }
                _ => {}
            }
        }));

        let c = carousel.clone();
        listeners.push(Listener::new(&track, "touchstart", move |ev| {
            if let Some(x) = changed_touch_x(&ev) {
                c.touch_start_x.set(x);
            }
        }));
        let c = carousel.clone();
        listeners.push(Listener::new(&track, "touchend", move |ev| {
            let Some(end_x) = changed_touch_x(&ev) else {
                return;
            };
            match swipe_direction(c.touch_start_x.get(), end_x) {
                Some(Swipe::Next) => c.next(),
                Some(Swipe::Prev) => c.prev(),
                None => {}
            }
        }));

        for event in ["mouseenter", "focusin"] {
            let c = carousel.clone();
            listeners.push(Listener::new(&root, event, move |_| c.state.borrow_mut().pause()));
        }
        for event in ["mouseleave", "focusout"] {
            let c = carousel.clone();
            listeners.push(Listener::new(&root, event, move |_| c.state.borrow_mut().resume()));
        }

        carousel.render(false);
        carousel.restart_rotation();

        Some(Self {
            carousel,
            _listeners: listeners,
        })
    }

    pub fn state(&self) -> CarouselState {
        *self.carousel.state.borrow()
    }

    pub fn next(&self) {
        self.carousel.next();
    }

    pub fn prev(&self) {
        self.carousel.prev();
    }

    pub fn go_to(&self, index: usize) {
        self.carousel.go_to(index);
    }

    pub fn destroy(self) {
        self.carousel.rotation.cancel();
    }
}

fn changed_touch_x(ev: &web_sys::Event) -> Option<i32> {
    let touch = ev.dyn_ref::<web_sys::TouchEvent>()?.changed_touches().get(0)?;
    Some(touch.screen_x())
}
