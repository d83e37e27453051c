//! The JavaScript surface: `new SimpleModal(options)` and
//! `configureSimpleModal(options)`.
//!
//! Every modal created from JavaScript shares one page-wide context,
//! created on first use.

use std::cell::RefCell;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use simple_modal_core::{Callback, ModalContext, ModalError, OptionValue, SimpleModal, UsageError};

use crate::platform::WebPlatform;

thread_local! {
    static CONTEXT: RefCell<Option<ModalContext<WebPlatform>>> = const { RefCell::new(None) };
}

/// The page-wide context, created on first use.
pub fn page_context() -> Result<ModalContext<WebPlatform>, ModalError> {
    CONTEXT.with(|cell| {
        if let Some(context) = cell.borrow().as_ref() {
            return Ok(context.clone());
        }
        let context = ModalContext::new(WebPlatform::new()?);
        *cell.borrow_mut() = Some(context.clone());
        Ok(context)
    })
}

/// Converts a JavaScript value into untyped options.
pub fn option_value(value: &JsValue) -> OptionValue<Function> {
    if value.is_undefined() {
        OptionValue::Undefined
    } else if value.is_null() {
        OptionValue::Null
    } else if let Some(b) = value.as_bool() {
        OptionValue::Bool(b)
    } else if let Some(n) = value.as_f64() {
        OptionValue::Number(n)
    } else if let Some(s) = value.as_string() {
        OptionValue::String(s)
    } else if let Some(function) = value.dyn_ref::<Function>() {
        OptionValue::Function(function.clone())
    } else if Array::is_array(value) {
        let array: &Array = value.unchecked_ref();
        OptionValue::Array(array.iter().map(|item| option_value(&item)).collect())
    } else if value.is_object() {
        let object: &Object = value.unchecked_ref();
        let entries = Object::keys(object)
            .iter()
            .filter_map(|key| {
                let name = key.as_string()?;
                let item = Reflect::get(object, &key).ok()?;
                Some((name, option_value(&item)))
            })
            .collect();
        OptionValue::Object(entries)
    } else {
        // Symbols and bigints. An empty object fails every typed check.
        OptionValue::Object(Vec::new())
    }
}

fn host_callback(value: &JsValue) -> Option<Callback<WebPlatform>> {
    value
        .dyn_ref::<Function>()
        .map(|function| Callback::Host(function.clone()))
}

/// Overlays the page-wide settings (`disableScrolling`, `transitionTime`,
/// `customFadeIn`, `customFadeOut`).
#[wasm_bindgen(js_name = configureSimpleModal)]
pub fn configure_simple_modal(options: JsValue) -> Result<(), JsError> {
    let context = page_context()?;
    context.configure_from(&option_value(&options))?;
    Ok(())
}

#[wasm_bindgen(js_name = SimpleModal)]
pub struct JsSimpleModal {
    modal: SimpleModal<WebPlatform>,
}

impl From<SimpleModal<WebPlatform>> for JsSimpleModal {
    fn from(modal: SimpleModal<WebPlatform>) -> Self {
        Self { modal }
    }
}

impl JsSimpleModal {
    pub fn modal(&self) -> &SimpleModal<WebPlatform> {
        &self.modal
    }
}

#[wasm_bindgen(js_class = SimpleModal)]
impl JsSimpleModal {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsSimpleModal, JsError> {
        let context = page_context()?;
        let modal = SimpleModal::from_options(&context, &option_value(&options))?;
        Ok(modal.into())
    }

    /// Builds and shows the modal. A non-function argument is ignored.
    ///
    /// Returns the instance for chaining. wasm-bindgen cannot hand back the
    /// receiver's own JS object, so the result is a second wrapper around the
    /// same modal: every method on it acts on this instance, but
    /// `modal.show() === modal` is false.
    pub fn show(&self, callback: JsValue) -> JsSimpleModal {
        self.modal.show(host_callback(&callback)).into()
    }

    /// Fades the modal out and removes it. A non-function argument is ignored.
    ///
    /// Returns the instance for chaining, wrapped the same way as [`Self::show`].
    pub fn close(&self, callback: JsValue) -> JsSimpleModal {
        self.modal.close(host_callback(&callback)).into()
    }

    #[wasm_bindgen(js_name = updateTitle)]
    pub fn update_title(&self, title: JsValue) -> Result<(), JsError> {
        let title = title.as_string().ok_or(UsageError::ExpectedString {
            operation: "updateTitle",
        })?;
        self.modal.update_title(&title)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = updateBody)]
    pub fn update_body(&self, body: JsValue) -> Result<(), JsError> {
        let body = body.as_string().ok_or(UsageError::ExpectedString {
            operation: "updateBody",
        })?;
        self.modal.update_body(&body)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = getModalElement)]
    pub fn get_modal_element(&self) -> Option<HtmlElement> {
        self.modal.get_modal_element()
    }

    #[wasm_bindgen(js_name = getBackdropElement)]
    pub fn get_backdrop_element(&self) -> Option<HtmlElement> {
        self.modal.get_backdrop_element()
    }
}
