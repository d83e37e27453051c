//! [`Platform`] over the browser document, `web-sys` and `gloo-timers`.

use gloo_timers::callback::{Interval, Timeout};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Node, Window};

use simple_modal_core::{ModalError, Platform, SimpleModal};

use crate::bindings::JsSimpleModal;

pub struct WebPlatform {
    window: Window,
    document: Document,
    body: HtmlElement,
}

impl WebPlatform {
    pub fn new() -> Result<Self, ModalError> {
        let window = web_sys::window().ok_or_else(|| ModalError::Platform("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ModalError::Platform("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| ModalError::Platform("document has no body".into()))?;
        Ok(Self {
            window,
            document,
            body,
        })
    }

    fn computed(&self, element: &Element, property: &str) -> Option<String> {
        self.window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value(property).ok())
    }

    fn computed_pixels(&self, element: &Element, property: &str) -> f64 {
        self.computed(element, property)
            .and_then(|value| value.trim().trim_end_matches("px").parse().ok())
            .unwrap_or(0.0)
    }
}

/// Dropping either variant clears the underlying browser timer.
pub enum WebTimer {
    Timeout(Timeout),
    Interval(Interval),
}

pub struct WebListener {
    target: HtmlElement,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for WebListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("click", self.closure.as_ref().unchecked_ref());
    }
}

impl Platform for WebPlatform {
    type Element = HtmlElement;
    type Timer = WebTimer;
    type Listener = WebListener;
    type Function = Function;

    fn create_element(&self, tag: &str) -> HtmlElement {
        self.document
            .create_element(tag)
            .expect("modal elements use valid tag names")
            .unchecked_into()
    }

    fn add_class(&self, element: &HtmlElement, class: &str) {
        let _ = element.class_list().add_1(class);
    }

    fn remove_class(&self, element: &HtmlElement, class: &str) {
        let _ = element.class_list().remove_1(class);
    }

    fn has_class(&self, element: &HtmlElement, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn append_child(&self, parent: &HtmlElement, child: &HtmlElement) {
        let _ = parent.append_child(child);
    }

    fn append_text(&self, element: &HtmlElement, text: &str) {
        let _ = element.append_with_str_1(text);
    }

    fn set_text(&self, element: &HtmlElement, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_inner_html(&self, element: &HtmlElement, html: &str) {
        element.set_inner_html(html);
    }

    fn find_by_class(&self, root: &HtmlElement, class: &str) -> Option<HtmlElement> {
        root.get_elements_by_class_name(class)
            .item(0)
            .and_then(|element| element.dyn_into().ok())
    }

    fn append_to_body(&self, element: &HtmlElement) {
        let _ = self.body.append_child(element);
    }

    fn detach(&self, element: &HtmlElement) {
        element.remove();
    }

    fn is_attached(&self, element: &HtmlElement) -> bool {
        let node: &Node = element;
        self.body.contains(Some(node))
    }

    fn count_by_class(&self, class: &str) -> usize {
        self.document.get_elements_by_class_name(class).length() as usize
    }

    fn set_opacity(&self, element: &HtmlElement, opacity: f64) {
        let _ = element.style().set_property("opacity", &opacity.to_string());
    }

    fn set_display(&self, element: &HtmlElement, display: &str) {
        let _ = element.style().set_property("display", display);
    }

    fn computed_opacity(&self, element: &HtmlElement) -> f64 {
        self.computed(element, "opacity")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(f64::NAN)
    }

    fn on_click(&self, element: &HtmlElement, handler: Box<dyn FnMut()>) -> WebListener {
        let mut handler = handler;
        let closure = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            handler();
        }) as Box<dyn FnMut(Event)>);
        let _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        WebListener {
            target: element.clone(),
            closure,
        }
    }

    fn body_width(&self) -> f64 {
        self.computed_pixels(&self.body, "width")
    }

    fn body_padding_right(&self) -> f64 {
        self.computed_pixels(&self.body, "padding-right")
    }

    fn set_body_padding_right(&self, value: &str) {
        let _ = self.body.style().set_property("padding-right", value);
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
        self.body.get_attribute(name)
    }

    fn set_body_attribute(&self, name: &str, value: &str) {
        let _ = self.body.set_attribute(name, value);
    }

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> WebTimer {
        WebTimer::Timeout(Timeout::new(millis, callback))
    }

    fn set_interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> WebTimer {
        WebTimer::Interval(Interval::new(millis, callback))
    }

    fn call_with_modal(&self, function: &Function, modal: &SimpleModal<Self>) -> Option<bool> {
        let this = JsValue::from(JsSimpleModal::from(modal.clone()));
        match function.call1(&JsValue::NULL, &this) {
            Ok(result) => result.as_bool(),
            Err(err) => {
                log::error!("Modal callback threw: {err:?}");
                Some(false)
            }
        }
    }

    fn call_with_element(&self, function: &Function, element: &HtmlElement) {
        if let Err(err) = function.call1(&JsValue::NULL, element) {
            log::error!("Custom fade function threw: {err:?}");
        }
    }
}
