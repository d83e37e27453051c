//! A modal dialog widget: a titled frame with a body and buttons over a
//! dimmed backdrop, faded in and out, with page scrolling locked while any
//! modal is open.
//!
//! The logic here is host-agnostic. Everything that touches a document or
//! a timer goes through [`Platform`], and every modal belongs to a
//! [`ModalContext`] that carries the global settings and the scroll lock.

pub mod animation;
pub mod context;
pub mod error;
pub mod modal;
pub mod options;
pub mod platform;
pub mod scroll_lock;
pub mod settings;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use animation::{FadeDirection, Fader, OpacityTween, TweenStep, FRAME_INTERVAL_MS};
pub use context::ModalContext;
pub use error::{ConfigError, ModalError, UsageError};
pub use modal::{ModalState, SimpleModal};
pub use options::{ButtonSpec, Callback, FadeFn, ModalOptions, ModalSize};
pub use platform::Platform;
pub use scroll_lock::ScrollLock;
pub use settings::{GlobalSettings, DEFAULT_TRANSITION_TIME};
pub use value::OptionValue;
