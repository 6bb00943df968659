//! Scroll-driven page behaviours.
//!
//! [`HeaderEffect`] slides the site header out of view while scrolling down and
//! back in while scrolling up. [`ReturnTopButton`] fades a "back to top" button
//! in once the reader is far enough down the page.
//!
//! Both react to scroll positions delivered by a [`ScrollEvents`] registry.
//! Subscribing hands back a [`ScrollSubscription`]; dropping it removes the
//! listener, so a component's listener lives exactly as long as the component
//! holds the guard.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Scroll offset at which the return-to-top button appears.
pub const RETURN_TOP_THRESHOLD: f64 = 300.0;

/// Fade duration of the return-to-top button.
pub const FADE_TRANSITION: &str = "0.5s";

/// Something that reacts to vertical scroll positions.
pub trait ScrollHandler {
    /// Called with the new vertical scroll offset in CSS pixels.
    fn on_scroll(&mut self, position: f64);
}

/// Header that hides on scroll down and reappears on scroll up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderEffect {
    header_height: f64,
    top: f64,
    last_position: f64,
}

impl HeaderEffect {
    /// Header of the given rendered height, fully visible at the top of the page.
    pub fn new(header_height: f64) -> Self {
        Self {
            header_height,
            top: 0.0,
            last_position: 0.0,
        }
    }

    /// Current `top` offset in pixels, between `-header_height` and `0`.
    pub fn top(&self) -> f64 {
        self.top
    }

    /// CSS value for the header's `top` property.
    pub fn css_top(&self) -> String {
        format!("{}px", self.top)
    }

    /// Move the header by the scroll delta and return the new `top`.
    pub fn update(&mut self, position: f64) -> f64 {
        let diff = position - self.last_position;
        let moved = self.top - diff;

        self.top = if diff < 0.0 {
            moved.min(0.0)
        } else {
            moved.max(-self.header_height)
        };
        self.last_position = position;
        self.top
    }
}

impl ScrollHandler for HeaderEffect {
    fn on_scroll(&mut self, position: f64) {
        let top = self.update(position);
        trace!(position, top, "header moved");
    }
}

/// How the viewport travels to a scroll target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

/// Arguments for a `scrollTo` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollTo {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Inline style of the return-to-top button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ButtonStyle {
    pub opacity: f32,
    pub transition: &'static str,
    /// `Some("none")` while hidden so the invisible button cannot be clicked.
    pub pointer_events: Option<&'static str>,
}

impl ButtonStyle {
    /// Render as an inline `style` attribute value.
    pub fn css(&self) -> String {
        let mut css = format!("opacity: {}; transition: {};", self.opacity, self.transition);
        if let Some(events) = self.pointer_events {
            css.push_str(&format!(" pointer-events: {events};"));
        }
        css
    }
}

/// Button that becomes visible past a scroll threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnTopButton {
    threshold: f64,
    active: bool,
}

impl Default for ReturnTopButton {
    fn default() -> Self {
        Self::new(RETURN_TOP_THRESHOLD)
    }
}

impl ReturnTopButton {
    /// Hidden button appearing at `threshold` pixels.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            active: false,
        }
    }

    /// Whether the button is currently shown.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current inline style.
    pub fn style(&self) -> ButtonStyle {
        if self.active {
            ButtonStyle {
                opacity: 1.0,
                transition: FADE_TRANSITION,
                pointer_events: None,
            }
        } else {
            ButtonStyle {
                opacity: 0.0,
                transition: FADE_TRANSITION,
                pointer_events: Some("none"),
            }
        }
    }

    /// Where a click on the button scrolls to.
    pub fn scroll_target(&self) -> ScrollTo {
        ScrollTo {
            top: 0.0,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

impl ScrollHandler for ReturnTopButton {
    fn on_scroll(&mut self, position: f64) {
        self.active = position >= self.threshold;
    }
}

type Listener = Box<dyn FnMut(f64)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    dispatching: bool,
    removed: Vec<u64>,
}

/// Registry of scroll listeners for one page.
#[derive(Clone, Default)]
pub struct ScrollEvents {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for ScrollEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ScrollEvents {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure; it is removed when the returned guard drops.
    #[must_use = "dropping the subscription removes the listener immediately"]
    pub fn subscribe(&self, listener: impl FnMut(f64) + 'static) -> ScrollSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));

        ScrollSubscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Register a shared handler.
    #[must_use = "dropping the subscription removes the listener immediately"]
    pub fn bind<H>(&self, handler: Rc<RefCell<H>>) -> ScrollSubscription
    where
        H: ScrollHandler + 'static,
    {
        self.subscribe(move |position| handler.borrow_mut().on_scroll(position))
    }

    /// Deliver a scroll position to every live listener, in subscription order.
    pub fn dispatch(&self, position: f64) {
        let mut listeners = {
            let mut registry = self.registry.borrow_mut();
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        for (id, listener) in &mut listeners {
            // Skip listeners whose guard was dropped earlier in this dispatch.
            if self.registry.borrow().removed.contains(id) {
                continue;
            }
            listener(position);
        }

        let dropped = {
            let mut registry = self.registry.borrow_mut();
            let removed = std::mem::take(&mut registry.removed);
            let (dropped, mut kept): (Vec<_>, Vec<_>) = listeners
                .into_iter()
                .partition(|(id, _)| removed.contains(id));
            // Listeners added during dispatch go after the existing ones.
            kept.append(&mut registry.listeners);
            registry.listeners = kept;
            registry.dispatching = false;
            dropped
        };
        // Released outside the borrow: a closure may own another subscription.
        drop(dropped);
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Guard that owns one listener registration.
#[derive(Debug)]
pub struct ScrollSubscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let Ok(mut registry) = registry.try_borrow_mut() else {
                return;
            };

            if registry.dispatching {
                registry.removed.push(self.id);
            }
            registry
                .listeners
                .iter()
                .position(|(id, _)| *id == self.id)
                .map(|index| registry.listeners.remove(index))
        };
        // Released outside the borrow: the closure may own another subscription.
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_hides_and_returns() {
        let mut header = HeaderEffect::new(60.0);

        assert_eq!(header.update(30.0), -30.0);
        assert_eq!(header.update(100.0), -60.0);
        assert_eq!(header.update(80.0), -40.0);
        assert_eq!(header.update(0.0), 0.0);
        assert_eq!(header.css_top(), "0px");
    }

    #[test]
    fn test_header_never_below_zero_when_scrolling_up() {
        let mut header = HeaderEffect::new(50.0);
        header.update(10.0);
        assert_eq!(header.update(-40.0), 0.0);
    }

    #[test]
    fn test_return_top_threshold() {
        let mut button = ReturnTopButton::default();
        assert!(!button.is_active());

        button.on_scroll(299.0);
        assert!(!button.is_active());
        assert_eq!(
            button.style().css(),
            "opacity: 0; transition: 0.5s; pointer-events: none;"
        );

        button.on_scroll(300.0);
        assert!(button.is_active());
        assert_eq!(button.style().css(), "opacity: 1; transition: 0.5s;");

        button.on_scroll(10.0);
        assert!(!button.is_active());
    }

    #[test]
    fn test_scroll_target_is_smooth_top() {
        let target = ReturnTopButton::default().scroll_target();
        assert_eq!(target.top, 0.0);
        assert_eq!(target.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_subscription_removed_on_drop() {
        let events = ScrollEvents::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let subscription = events.subscribe(move |y| sink.borrow_mut().push(y));
        assert_eq!(events.listener_count(), 1);

        events.dispatch(5.0);
        drop(subscription);
        events.dispatch(6.0);

        assert_eq!(events.listener_count(), 0);
        assert_eq!(*seen.borrow(), [5.0]);
    }

    #[test]
    fn test_bind_handlers() {
        let events = ScrollEvents::new();
        let header = Rc::new(RefCell::new(HeaderEffect::new(40.0)));
        let button = Rc::new(RefCell::new(ReturnTopButton::default()));

        let _header_sub = events.bind(Rc::clone(&header));
        let _button_sub = events.bind(Rc::clone(&button));
        events.dispatch(400.0);

        assert_eq!(header.borrow().top(), -40.0);
        assert!(button.borrow().is_active());
    }

    #[test]
    fn test_drop_during_dispatch() {
        let events = ScrollEvents::new();
        let slot: Rc<RefCell<Option<ScrollSubscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));

        let inner_slot = Rc::clone(&slot);
        let counter = Rc::clone(&calls);
        let subscription = events.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(subscription);

        events.dispatch(1.0);
        events.dispatch(2.0);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_dropping_listener_releases_owned_subscription() {
        let events = ScrollEvents::new();
        let calls = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&calls);
        let inner = events.subscribe(move |_| *counter.borrow_mut() += 1);
        let outer = events.subscribe(move |_| {
            let _owned = &inner;
        });
        assert_eq!(events.listener_count(), 2);

        drop(outer);
        events.dispatch(1.0);

        assert_eq!(events.listener_count(), 0);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_listener_removed_earlier_in_dispatch_is_not_called() {
        let events = ScrollEvents::new();
        let slot: Rc<RefCell<Option<ScrollSubscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));

        let inner_slot = Rc::clone(&slot);
        let _first = events.subscribe(move |_| {
            inner_slot.borrow_mut().take();
        });
        let counter = Rc::clone(&calls);
        *slot.borrow_mut() = Some(events.subscribe(move |_| *counter.borrow_mut() += 1));

        events.dispatch(1.0);
        events.dispatch(2.0);

        assert_eq!(*calls.borrow(), 0);
        assert_eq!(events.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_registry() {
        let events = ScrollEvents::new();
        let subscription = events.subscribe(|_| {});
        drop(events);
        drop(subscription);
    }
}
