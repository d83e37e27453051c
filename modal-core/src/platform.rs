//! The seam between the modal logic and the document it renders into.
//!
//! Everything the widget needs from its host is expressed here: element
//! creation and class manipulation, body styling for the scroll lock,
//! one-shot and repeating timers, and a way to call host-native functions
//! found in untyped options. Resources are RAII handles: dropping a
//! [`Platform::Timer`] cancels it and dropping a [`Platform::Listener`]
//! detaches the click handler.

use crate::modal::SimpleModal;

pub trait Platform: Sized + 'static {
    type Element: Clone + 'static;
    type Timer: 'static;
    type Listener: 'static;
    /// Host-native callable, as found in untyped options.
    type Function: Clone + 'static;

    // Element construction

    fn create_element(&self, tag: &str) -> Self::Element;
    fn add_class(&self, element: &Self::Element, class: &str);
    fn remove_class(&self, element: &Self::Element, class: &str);
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn append_child(&self, parent: &Self::Element, child: &Self::Element);
    /// Appends a text node; the text is never parsed as markup.
    fn append_text(&self, element: &Self::Element, text: &str);
    /// Replaces all content of `element` with a single text node.
    fn set_text(&self, element: &Self::Element, text: &str);
    /// Replaces all content of `element` with parsed markup. No sanitization.
    fn set_inner_html(&self, element: &Self::Element, html: &str);
    /// First descendant of `root` carrying `class`.
    fn find_by_class(&self, root: &Self::Element, class: &str) -> Option<Self::Element>;

    // Document attachment

    fn append_to_body(&self, element: &Self::Element);
    /// Removes `element` from its parent. Detached elements are left alone.
    fn detach(&self, element: &Self::Element);
    fn is_attached(&self, element: &Self::Element) -> bool;
    /// Number of elements in the document carrying exactly `class`.
    fn count_by_class(&self, class: &str) -> usize;

    // Styling

    fn set_opacity(&self, element: &Self::Element, opacity: f64);
    fn set_display(&self, element: &Self::Element, display: &str);
    /// Computed opacity of `element`, `NaN` when it is not numeric.
    fn computed_opacity(&self, element: &Self::Element) -> f64;

    // Events

    /// Registers a click handler that prevents the default action before running.
    fn on_click(&self, element: &Self::Element, handler: Box<dyn FnMut()>) -> Self::Listener;

    // Body, for the scroll lock

    /// Computed content width of the body, in pixels.
    fn body_width(&self) -> f64;
    /// Computed right padding of the body, in pixels.
    fn body_padding_right(&self) -> f64;
    fn set_body_padding_right(&self, value: &str);
    fn body_add_class(&self, class: &str);
    fn body_remove_class(&self, class: &str);
    fn body_has_class(&self, class: &str) -> bool;
    fn body_attribute(&self, name: &str) -> Option<String>;
    fn set_body_attribute(&self, name: &str, value: &str);

    // Timers

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Timer;
    fn set_interval(&self, millis: u32, callback: Box<dyn FnMut()>) -> Self::Timer;

    // Host functions

    /// Calls a host function with the modal. `None` means it returned a non-boolean.
    fn call_with_modal(&self, function: &Self::Function, modal: &SimpleModal<Self>)
        -> Option<bool>;
    fn call_with_element(&self, function: &Self::Function, element: &Self::Element);
}
