//! In-memory [`Platform`] for tests: a small node tree rooted at a body
//! element, a virtual clock driven by [`MemoryPlatform::advance`], and a
//! body-width model with a fixed-width scrollbar.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::modal::SimpleModal;
use crate::options::leading_number;
use crate::platform::Platform;
use crate::scroll_lock::DISABLE_SCROLL_CLASS;

const VIEWPORT_WIDTH: f64 = 1024.0;
const SCROLLBAR_WIDTH: f64 = 15.0;

type Handler = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Clone)]
pub struct MemoryElement(Rc<RefCell<Node>>);

struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    stylesheet_opacity: f64,
    content: Vec<Content>,
    parent: Option<Weak<RefCell<Node>>>,
    handlers: Vec<(u64, Handler)>,
}

enum Content {
    Element(MemoryElement),
    Text(String),
    Markup(String),
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        write!(f, "<{} class=\"{}\">", node.tag, node.classes.join(" "))
    }
}

impl MemoryElement {
    fn new(tag: &str) -> Self {
        MemoryElement(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            stylesheet_opacity: 1.0,
            content: Vec::new(),
            parent: None,
            handlers: Vec::new(),
        })))
    }

    fn child_elements(&self) -> Vec<MemoryElement> {
        self.0
            .borrow()
            .content
            .iter()
            .filter_map(|c| match c {
                Content::Element(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    fn descendants(&self) -> Vec<MemoryElement> {
        let mut found = Vec::new();
        for child in self.child_elements() {
            found.push(child.clone());
            found.extend(child.descendants());
        }
        found
    }

    fn style(&self, property: &str) -> Option<String> {
        self.0
            .borrow()
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        match node.style.iter_mut().find(|(k, _)| k == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => node.style.push((property.to_string(), value.to_string())),
        }
    }

    fn clear_content(&self) {
        let content = std::mem::take(&mut self.0.borrow_mut().content);
        for item in content {
            if let Content::Element(child) = item {
                child.0.borrow_mut().parent = None;
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryFunction {
    calls: Rc<Cell<u32>>,
    result: Option<bool>,
}

impl fmt::Debug for MemoryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryFunction(calls={})", self.calls.get())
    }
}

impl MemoryFunction {
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

pub struct MemoryTimer {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for MemoryTimer {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

pub struct MemoryListener {
    node: Weak<RefCell<Node>>,
    id: u64,
}

impl Drop for MemoryListener {
    fn drop(&mut self) {
        if let Some(node) = self.node.upgrade() {
            node.borrow_mut().handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

struct Scheduled {
    id: u64,
    due: u64,
    period: Option<u64>,
    task: Option<Box<dyn FnMut()>>,
    cancelled: Rc<Cell<bool>>,
}

pub struct MemoryPlatform {
    body: MemoryElement,
    clock: Cell<u64>,
    next_id: Cell<u64>,
    timers: RefCell<Vec<Scheduled>>,
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self {
            body: MemoryElement::new("body"),
            clock: Cell::new(0),
            next_id: Cell::new(1),
            timers: RefCell::new(Vec::new()),
        }
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn schedule(&self, millis: u32, period: Option<u64>, task: Box<dyn FnMut()>) -> MemoryTimer {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(Scheduled {
            id: self.next_id(),
            due: self.clock.get() + u64::from(millis),
            period,
            task: Some(task),
            cancelled: cancelled.clone(),
        });
        MemoryTimer { cancelled }
    }

    pub fn now(&self) -> u64 {
        self.clock.get()
    }

    /// Moves the clock forward, running every timer that falls due on the way.
    pub fn advance(&self, millis: u64) {
        let target = self.clock.get() + millis;
        loop {
            let next = self
                .timers
                .borrow()
                .iter()
                .filter(|t| t.task.is_some() && !t.cancelled.get() && t.due <= target)
                .min_by_key(|t| (t.due, t.id))
                .map(|t| t.id);
            let Some(id) = next else {
                break;
            };

            let (due, period, cancelled, mut task) = {
                let mut timers = self.timers.borrow_mut();
                let Some(timer) = timers.iter_mut().find(|t| t.id == id) else {
                    break;
                };
                let Some(task) = timer.task.take() else {
                    break;
                };
                (timer.due, timer.period, timer.cancelled.clone(), task)
            };

            self.clock.set(due);
            task();

            let leftover = {
                let mut timers = self.timers.borrow_mut();
                let repeat = period.filter(|_| !cancelled.get());
                let slot = timers.iter_mut().find(|t| t.id == id);
                let leftover = match (repeat, slot) {
                    (Some(period), Some(timer)) => {
                        timer.due += period;
                        timer.task = Some(task);
                        None
                    }
                    _ => Some(task),
                };
                timers.retain(|t| t.task.is_some() && !t.cancelled.get());
                leftover
            };
            drop(leftover);
        }
        self.clock.set(target);
    }

    /// Timers that are scheduled and not cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    /// Simulates a click. Returns whether any handler ran.
    pub fn click(&self, element: &MemoryElement) -> bool {
        let handlers: Vec<Handler> = element
            .0
            .borrow()
            .handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in &handlers {
            (&mut *handler.borrow_mut())();
        }
        !handlers.is_empty()
    }

    pub fn host_function(&self, result: Option<bool>) -> MemoryFunction {
        MemoryFunction {
            calls: Rc::new(Cell::new(0)),
            result,
        }
    }

    pub fn tag(&self, element: &MemoryElement) -> String {
        element.0.borrow().tag.clone()
    }

    pub fn classes(&self, element: &MemoryElement) -> Vec<String> {
        element.0.borrow().classes.clone()
    }

    pub fn children(&self, element: &MemoryElement) -> Vec<MemoryElement> {
        element.child_elements()
    }

    /// Text content, with tags stripped from injected markup.
    pub fn text(&self, element: &MemoryElement) -> String {
        let node = element.0.borrow();
        node.content
            .iter()
            .map(|c| match c {
                Content::Element(e) => self.text(e),
                Content::Text(t) => t.clone(),
                Content::Markup(m) => strip_tags(m),
            })
            .collect()
    }

    pub fn inner_html(&self, element: &MemoryElement) -> String {
        let node = element.0.borrow();
        node.content
            .iter()
            .map(|c| match c {
                Content::Element(e) => {
                    let tag = self.tag(e);
                    format!("<{tag}>{}</{tag}>", self.inner_html(e))
                }
                Content::Text(t) => escape(t),
                Content::Markup(m) => m.clone(),
            })
            .collect()
    }

    /// Inline opacity, if one has been set.
    pub fn opacity(&self, element: &MemoryElement) -> Option<f64> {
        element.style("opacity").and_then(|v| v.parse().ok())
    }

    pub fn display(&self, element: &MemoryElement) -> Option<String> {
        element.style("display")
    }

    /// Opacity the element computes to when no inline value is set.
    pub fn set_stylesheet_opacity(&self, element: &MemoryElement, opacity: f64) {
        element.0.borrow_mut().stylesheet_opacity = opacity;
    }

    pub fn body_padding_style(&self) -> Option<String> {
        self.body.style("padding-right")
    }

    pub fn find_by_tag(&self, root: &MemoryElement, tag: &str) -> Option<MemoryElement> {
        root.descendants()
            .into_iter()
            .find(|e| e.0.borrow().tag == tag)
    }

    pub fn find_in_document(&self, class: &str) -> Option<MemoryElement> {
        self.find_by_class(&self.body, class)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn strip_tags(markup: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

impl Platform for MemoryPlatform {
    type Element = MemoryElement;
    type Timer = MemoryTimer;
    type Listener = MemoryListener;
    type Function = MemoryFunction;

    fn create_element(&self, tag: &str) -> MemoryElement {
        MemoryElement::new(tag)
    }

    fn add_class(&self, element: &MemoryElement, class: &str) {
        let mut node = element.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, element: &MemoryElement, class: &str) {
        element.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, element: &MemoryElement, class: &str) -> bool {
        element.0.borrow().classes.iter().any(|c| c == class)
    }

    fn append_child(&self, parent: &MemoryElement, child: &MemoryElement) {
        self.detach(child);
        child.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
        parent
            .0
            .borrow_mut()
            .content
            .push(Content::Element(child.clone()));
    }

    fn append_text(&self, element: &MemoryElement, text: &str) {
        element
            .0
            .borrow_mut()
            .content
            .push(Content::Text(text.to_string()));
    }

    fn set_text(&self, element: &MemoryElement, text: &str) {
        element.clear_content();
        self.append_text(element, text);
    }

    fn set_inner_html(&self, element: &MemoryElement, html: &str) {
        element.clear_content();
        element
            .0
            .borrow_mut()
            .content
            .push(Content::Markup(html.to_string()));
    }

    fn find_by_class(&self, root: &MemoryElement, class: &str) -> Option<MemoryElement> {
        root.descendants()
            .into_iter()
            .find(|e| self.has_class(e, class))
    }

    fn append_to_body(&self, element: &MemoryElement) {
        self.append_child(&self.body, element);
    }

    fn detach(&self, element: &MemoryElement) {
        let parent = element.0.borrow_mut().parent.take();
        if let Some(parent) = parent.and_then(|p| p.upgrade()) {
            parent.borrow_mut().content.retain(|c| match c {
                Content::Element(e) => e != element,
                _ => true,
            });
        }
    }

    fn is_attached(&self, element: &MemoryElement) -> bool {
        let mut current = element.0.borrow().parent.as_ref().and_then(|p| p.upgrade());
        while let Some(node) = current {
            if Rc::ptr_eq(&node, &self.body.0) {
                return true;
            }
            current = node.borrow().parent.as_ref().and_then(|p| p.upgrade());
        }
        false
    }

    fn count_by_class(&self, class: &str) -> usize {
        self.body
            .descendants()
            .iter()
            .filter(|e| self.has_class(e, class))
            .count()
    }

    fn set_opacity(&self, element: &MemoryElement, opacity: f64) {
        element.set_style("opacity", &opacity.to_string());
    }

    fn set_display(&self, element: &MemoryElement, display: &str) {
        element.set_style("display", display);
    }

    fn computed_opacity(&self, element: &MemoryElement) -> f64 {
        match element.style("opacity") {
            Some(value) => value.parse().unwrap_or(f64::NAN),
            None => element.0.borrow().stylesheet_opacity,
        }
    }

    fn on_click(&self, element: &MemoryElement, handler: Box<dyn FnMut()>) -> MemoryListener {
        let id = self.next_id();
        element
            .0
            .borrow_mut()
            .handlers
            .push((id, Rc::new(RefCell::new(handler))));
        MemoryListener {
            node: Rc::downgrade(&element.0),
            id,
        }
    }

    fn body_width(&self) -> f64 {
        let scrollbar = if self.body_has_class(DISABLE_SCROLL_CLASS) {
            0.0
        } else {
            SCROLLBAR_WIDTH
        };
        VIEWPORT_WIDTH - scrollbar - self.body_padding_right()
    }

    fn body_padding_right(&self) -> f64 {
        self.body_padding_style()
            .and_then(|v| leading_number(&v, true))
            .unwrap_or(0.0)
    }

    fn set_body_padding_right(&self, value: &str) {
        self.body.set_style("padding-right", value);
    }

    fn body_add_class(&self, class: &str) {
        self.add_class(&self.body, class);
    }

    fn body_remove_class(&self, class: &str) {
        self.remove_class(&self.body, class);
    }

    fn body_has_class(&self, class: &str) -> bool {
        self.has_class(&self.body, class)
    }

    fn body_attribute(&self, name: &str) -> Option<String> {
        self.body
            .0
            .borrow()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_body_attribute(&self, name: &str, value: &str) {
        let mut node = self.body.0.borrow_mut();
        match node.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> MemoryTimer {
        let mut callback = Some(callback);
        self.schedule(
            millis,
            None,
            Box::new(move || {
                if let Some(callback) = callback.take() {
                    callback();
                }
            }),
        )
    }

    fn set_interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> MemoryTimer {
        self.schedule(millis, Some(u64::from(millis)), callback)
    }

    fn call_with_modal(
        &self,
        function: &MemoryFunction,
        _modal: &SimpleModal<Self>,
    ) -> Option<bool> {
        function.calls.set(function.calls.get() + 1);
        function.result
    }

    fn call_with_element(&self, function: &MemoryFunction, _element: &MemoryElement) {
        function.calls.set(function.calls.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_fire_once_in_order() {
        let platform = MemoryPlatform::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = log.clone();
        let _a = platform.set_timeout(50, Box::new(move || first.borrow_mut().push("a")));
        let second = log.clone();
        let _b = platform.set_timeout(10, Box::new(move || second.borrow_mut().push("b")));

        platform.advance(100);
        assert_eq!(*log.borrow(), vec!["b", "a"]);
        assert_eq!(platform.now(), 100);
        assert_eq!(platform.pending_timers(), 0);
    }

    #[test]
    fn test_dropping_timer_cancels_it() {
        let platform = MemoryPlatform::new();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        let timer = platform.set_timeout(10, Box::new(move || flag.set(true)));
        drop(timer);
        platform.advance(20);

        assert!(!fired.get());
    }

    #[test]
    fn test_interval_repeats() {
        let platform = MemoryPlatform::new();
        let ticks = Rc::new(Cell::new(0));

        let counter = ticks.clone();
        let _interval = platform.set_interval(20, Box::new(move || counter.set(counter.get() + 1)));
        platform.advance(100);

        assert_eq!(ticks.get(), 5);
        assert_eq!(platform.pending_timers(), 1);
    }

    #[test]
    fn test_attachment_follows_tree() {
        let platform = MemoryPlatform::new();
        let outer = platform.create_element("div");
        let inner = platform.create_element("span");
        platform.append_child(&outer, &inner);
        assert!(!platform.is_attached(&inner));

        platform.append_to_body(&outer);
        assert!(platform.is_attached(&inner));

        platform.detach(&outer);
        assert!(!platform.is_attached(&inner));
    }

    #[test]
    fn test_dropping_listener_detaches_handler() {
        let platform = MemoryPlatform::new();
        let element = platform.create_element("button");
        let listener = platform.on_click(&element, Box::new(|| {}));

        assert!(platform.click(&element));
        drop(listener);
        assert!(!platform.click(&element));
    }
}
