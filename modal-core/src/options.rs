//! Modal options: the typed record every instance is built from, and the
//! resolver that produces it from untyped host input.
//!
//! Resolution happens once, when the instance is constructed. The result
//! is owned by the instance, so later changes to the caller's input cannot
//! leak into a modal that already exists.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::modal::SimpleModal;
use crate::platform::Platform;
use crate::value::OptionValue;

// ============================================================================
// Size
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalSize {
    #[default]
    ExtraSmall,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl ModalSize {
    pub const ALL: [ModalSize; 5] = [
        ModalSize::ExtraSmall,
        ModalSize::Small,
        ModalSize::Medium,
        ModalSize::Large,
        ModalSize::ExtraLarge,
    ];

    /// The CSS class applied to the frame.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalSize::ExtraSmall => "extra-small",
            ModalSize::Small => "small",
            ModalSize::Medium => "medium",
            ModalSize::Large => "large",
            ModalSize::ExtraLarge => "extra-large",
        }
    }
}

impl FromStr for ModalSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModalSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or(())
    }
}

// ============================================================================
// Callables
// ============================================================================

/// A callback receiving the modal instance.
///
/// Button callbacks use the return value: `Some(false)` keeps the modal
/// open, anything else closes it. Other hooks ignore it.
pub enum Callback<P: Platform> {
    Native(Rc<dyn Fn(&SimpleModal<P>) -> Option<bool>>),
    Host(P::Function),
}

impl<P: Platform> Callback<P> {
    pub fn new(f: impl Fn(&SimpleModal<P>) -> Option<bool> + 'static) -> Self {
        Callback::Native(Rc::new(f))
    }

    /// Wraps a closure whose result is irrelevant.
    pub fn hook(f: impl Fn(&SimpleModal<P>) + 'static) -> Self {
        Callback::Native(Rc::new(move |modal| {
            f(modal);
            None
        }))
    }

    pub fn call(&self, modal: &SimpleModal<P>) -> Option<bool> {
        match self {
            Callback::Native(f) => f(modal),
            Callback::Host(f) => modal.context().platform().call_with_modal(f, modal),
        }
    }
}

impl<P: Platform> Clone for Callback<P> {
    fn clone(&self) -> Self {
        match self {
            Callback::Native(f) => Callback::Native(f.clone()),
            Callback::Host(f) => Callback::Host(f.clone()),
        }
    }
}

impl<P: Platform> fmt::Debug for Callback<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Native(_) => f.write_str("Callback::Native"),
            Callback::Host(_) => f.write_str("Callback::Host"),
        }
    }
}

/// A custom fade function. The engine hands over the element and makes no
/// timing guarantees of its own.
pub enum FadeFn<P: Platform> {
    Native(Rc<dyn Fn(&P::Element)>),
    Host(P::Function),
}

impl<P: Platform> FadeFn<P> {
    pub fn new(f: impl Fn(&P::Element) + 'static) -> Self {
        FadeFn::Native(Rc::new(f))
    }

    pub fn call(&self, platform: &P, element: &P::Element) {
        match self {
            FadeFn::Native(f) => f(element),
            FadeFn::Host(f) => platform.call_with_element(f, element),
        }
    }
}

impl<P: Platform> Clone for FadeFn<P> {
    fn clone(&self) -> Self {
        match self {
            FadeFn::Native(f) => FadeFn::Native(f.clone()),
            FadeFn::Host(f) => FadeFn::Host(f.clone()),
        }
    }
}

impl<P: Platform> fmt::Debug for FadeFn<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeFn::Native(_) => f.write_str("FadeFn::Native"),
            FadeFn::Host(_) => f.write_str("FadeFn::Host"),
        }
    }
}

// ============================================================================
// Buttons
// ============================================================================

pub const DEFAULT_BUTTON_VALUE: &str = "button";

pub struct ButtonSpec<P: Platform> {
    pub value: String,
    pub class: Option<String>,
    pub callback: Option<Callback<P>>,
}

impl<P: Platform> ButtonSpec<P> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            class: None,
            callback: None,
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn callback(mut self, callback: Callback<P>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Shorthand for a native callback.
    pub fn on_click(self, f: impl Fn(&SimpleModal<P>) -> Option<bool> + 'static) -> Self {
        self.callback(Callback::new(f))
    }

    fn resolve(index: usize, raw: &OptionValue<P::Function>) -> Result<Self, ConfigError> {
        let OptionValue::Object(entries) = raw else {
            return Err(ConfigError::InvalidButton { index });
        };

        let mut button = ButtonSpec::new(DEFAULT_BUTTON_VALUE);
        for (key, value) in entries {
            if value.is_absent() {
                continue;
            }
            match (key.as_str(), value) {
                ("value", OptionValue::String(s)) => button.value = s.clone(),
                ("class", OptionValue::String(s)) => button.class = Some(s.clone()),
                ("callback", OptionValue::Function(f)) => {
                    button.callback = Some(Callback::Host(f.clone()))
                }
                ("value", _) | ("class", _) => {
                    return Err(ConfigError::InvalidButtonOptionType {
                        key: if key == "value" { "value" } else { "class" },
                        expected: "string",
                        found: value.type_name(),
                    })
                }
                ("callback", _) => {
                    return Err(ConfigError::InvalidButtonOptionType {
                        key: "callback",
                        expected: "function",
                        found: value.type_name(),
                    })
                }
                _ => {
                    return Err(ConfigError::UnknownButtonOption { key: key.clone() });
                }
            }
        }
        Ok(button)
    }
}

impl<P: Platform> fmt::Debug for ButtonSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonSpec")
            .field("value", &self.value)
            .field("class", &self.class)
            .field("callback", &self.callback)
            .finish()
    }
}

impl<P: Platform> Clone for ButtonSpec<P> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            class: self.class.clone(),
            callback: self.callback.clone(),
        }
    }
}

// ============================================================================
// Modal options
// ============================================================================

/// Typed modal configuration.
///
/// Build it directly with the setters, or from untyped input with
/// [`ModalOptions::resolve`]. `transition_time` and the fade functions are
/// optional here; the instance falls back to the global settings for them.
pub struct ModalOptions<P: Platform> {
    pub size: ModalSize,
    pub title: String,
    pub body: String,
    pub closable: bool,
    pub closable_on_outside_click: bool,
    pub buttons: Vec<ButtonSpec<P>>,
    pub transition_time: Option<u32>,
    /// Always within `[0, 1]`. `None` uses the backdrop's computed opacity.
    pub background_opacity: Option<f64>,
    pub custom_fade_in: Option<FadeFn<P>>,
    pub custom_fade_out: Option<FadeFn<P>>,
    pub on_complete: Option<Callback<P>>,
}

impl<P: Platform> Default for ModalOptions<P> {
    fn default() -> Self {
        Self {
            size: ModalSize::default(),
            title: String::new(),
            body: String::new(),
            closable: true,
            closable_on_outside_click: true,
            buttons: Vec::new(),
            transition_time: None,
            background_opacity: None,
            custom_fade_in: None,
            custom_fade_out: None,
            on_complete: None,
        }
    }
}

impl<P: Platform> fmt::Debug for ModalOptions<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalOptions")
            .field("size", &self.size)
            .field("title", &self.title)
            .field("body", &self.body)
            .field("closable", &self.closable)
            .field("closable_on_outside_click", &self.closable_on_outside_click)
            .field("buttons", &self.buttons)
            .field("transition_time", &self.transition_time)
            .field("background_opacity", &self.background_opacity)
            .field("custom_fade_in", &self.custom_fade_in)
            .field("custom_fade_out", &self.custom_fade_out)
            .field("on_complete", &self.on_complete)
            .finish()
    }
}

impl<P: Platform> Clone for ModalOptions<P> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            title: self.title.clone(),
            body: self.body.clone(),
            closable: self.closable,
            closable_on_outside_click: self.closable_on_outside_click,
            buttons: self.buttons.clone(),
            transition_time: self.transition_time,
            background_opacity: self.background_opacity,
            custom_fade_in: self.custom_fade_in.clone(),
            custom_fade_out: self.custom_fade_out.clone(),
            on_complete: self.on_complete.clone(),
        }
    }
}

impl<P: Platform> ModalOptions<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn closable_on_outside_click(mut self, closable: bool) -> Self {
        self.closable_on_outside_click = closable;
        self
    }

    pub fn button(mut self, button: ButtonSpec<P>) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn transition_time(mut self, millis: u32) -> Self {
        self.transition_time = Some(millis);
        self
    }

    /// Clamped into `[0, 1]`. `NaN` is ignored.
    pub fn background_opacity(mut self, opacity: f64) -> Self {
        if !opacity.is_nan() {
            self.background_opacity = Some(opacity.clamp(0.0, 1.0));
        }
        self
    }

    pub fn custom_fade_in(mut self, fade: FadeFn<P>) -> Self {
        self.custom_fade_in = Some(fade);
        self
    }

    pub fn custom_fade_out(mut self, fade: FadeFn<P>) -> Self {
        self.custom_fade_out = Some(fade);
        self
    }

    pub fn on_complete(mut self, callback: Callback<P>) -> Self {
        self.on_complete = Some(callback);
        self
    }

    /// Resolves untyped options, applying defaults to everything absent.
    ///
    /// Wrong types fail with a [`ConfigError`]. A `size` string outside the
    /// known set silently falls back to the default size.
    pub fn resolve(raw: &OptionValue<P::Function>) -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Some(value) = raw.get("size") {
            let size = expect_string("size", value)?;
            options.size = size.parse().unwrap_or_else(|_| {
                log::debug!("Unknown modal size {size:?}, using {}", ModalSize::default().as_str());
                ModalSize::default()
            });
        }
        if let Some(value) = raw.get("title") {
            options.title = expect_string("title", value)?.to_string();
        }
        if let Some(value) = raw.get("body") {
            options.body = expect_string("body", value)?.to_string();
        }
        if let Some(value) = raw.get("closable") {
            options.closable = expect_bool("closable", value)?;
        }
        if let Some(value) = raw.get("closableOnOutsideClick") {
            options.closable_on_outside_click = expect_bool("closableOnOutsideClick", value)?;
        }
        if let Some(value) = raw.get("buttons") {
            options.buttons = resolve_buttons(value)?;
        }
        if let Some(value) = raw.get("transitionTime") {
            options.transition_time = Some(parse_millis("transitionTime", value)?);
        }
        if let Some(value) = raw.get("backgroundOpacity") {
            let opacity = parse_float("backgroundOpacity", value)?;
            options.background_opacity = Some(opacity.clamp(0.0, 1.0));
        }
        if let Some(value) = raw.get("customFadeIn") {
            options.custom_fade_in = Some(FadeFn::Host(expect_function("customFadeIn", value)?));
        }
        if let Some(value) = raw.get("customFadeOut") {
            options.custom_fade_out =
                Some(FadeFn::Host(expect_function("customFadeOut", value)?));
        }
        if let Some(value) = raw.get("onComplete") {
            options.on_complete = Some(Callback::Host(expect_function("onComplete", value)?));
        }

        Ok(options)
    }
}

fn resolve_buttons<P: Platform>(
    raw: &OptionValue<P::Function>,
) -> Result<Vec<ButtonSpec<P>>, ConfigError> {
    let items: Vec<&OptionValue<P::Function>> = match raw {
        OptionValue::Array(items) => items.iter().collect(),
        OptionValue::Object(entries) => entries.iter().map(|(_, v)| v).collect(),
        _ => {
            return Err(ConfigError::InvalidType {
                option: "buttons",
                expected: "object",
                found: raw.type_name(),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| ButtonSpec::resolve(index, item))
        .collect()
}

// ============================================================================
// Value helpers
// ============================================================================

pub(crate) fn expect_string<'a, F>(
    option: &'static str,
    value: &'a OptionValue<F>,
) -> Result<&'a str, ConfigError> {
    match value {
        OptionValue::String(s) => Ok(s),
        _ => Err(ConfigError::InvalidType {
            option,
            expected: "string",
            found: value.type_name(),
        }),
    }
}

pub(crate) fn expect_bool<F>(
    option: &'static str,
    value: &OptionValue<F>,
) -> Result<bool, ConfigError> {
    match value {
        OptionValue::Bool(b) => Ok(*b),
        _ => Err(ConfigError::InvalidType {
            option,
            expected: "boolean",
            found: value.type_name(),
        }),
    }
}

pub(crate) fn expect_function<F: Clone>(
    option: &'static str,
    value: &OptionValue<F>,
) -> Result<F, ConfigError> {
    match value {
        OptionValue::Function(f) => Ok(f.clone()),
        _ => Err(ConfigError::InvalidType {
            option,
            expected: "function",
            found: value.type_name(),
        }),
    }
}

/// Milliseconds from a number (truncated) or a string with a leading integer.
pub(crate) fn parse_millis<F>(
    option: &'static str,
    value: &OptionValue<F>,
) -> Result<u32, ConfigError> {
    let millis = match value {
        OptionValue::Number(n) => Some(*n),
        OptionValue::String(s) => leading_number(s, false),
        _ => {
            return Err(ConfigError::InvalidType {
                option,
                expected: "number",
                found: value.type_name(),
            })
        }
    };

    match millis {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n.trunc().min(u32::MAX as f64) as u32),
        _ => Err(ConfigError::InvalidValue {
            option,
            reason: "expecting a non-negative number of milliseconds".to_string(),
        }),
    }
}

/// A float from a number or a string with a leading float.
pub(crate) fn parse_float<F>(
    option: &'static str,
    value: &OptionValue<F>,
) -> Result<f64, ConfigError> {
    let parsed = match value {
        OptionValue::Number(n) => Some(*n),
        OptionValue::String(s) => leading_number(s, true),
        _ => {
            return Err(ConfigError::InvalidType {
                option,
                expected: "number",
                found: value.type_name(),
            })
        }
    };

    parsed.filter(|n| !n.is_nan()).ok_or(ConfigError::InvalidValue {
        option,
        reason: "expecting a numeric value".to_string(),
    })
}

/// Parses the longest numeric prefix of `s`, ignoring leading whitespace
/// and trailing garbage such as a `px` unit.
pub(crate) fn leading_number(s: &str, allow_fraction: bool) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse().ok()
}
