//! Page scroll locking while modals are open.
//!
//! The number of open modals is read from the document (frames carrying
//! [`MODAL_CLASS`]), so the lock engages when the first frame appears and
//! releases when the last one is removed. The body's original right padding
//! is stashed in [`ORIGINAL_PADDING_ATTRIBUTE`] while locked.

use crate::modal::MODAL_CLASS;
use crate::options::leading_number;
use crate::platform::Platform;

pub const DISABLE_SCROLL_CLASS: &str = "simple-modal-disable-scroll";
pub const ORIGINAL_PADDING_ATTRIBUTE: &str = "data-original-padding";

#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollLock;

impl ScrollLock {
    pub fn new() -> Self {
        Self
    }

    pub fn is_locked<P: Platform>(&self, platform: &P) -> bool {
        platform.body_has_class(DISABLE_SCROLL_CLASS)
    }

    /// Called after a modal frame has been inserted.
    pub fn on_modal_shown<P: Platform>(&self, platform: &P, disable_scrolling: bool) {
        if !disable_scrolling || platform.count_by_class(MODAL_CLASS) != 1 {
            return;
        }

        let before = platform.body_width().trunc();
        platform.body_add_class(DISABLE_SCROLL_CLASS);
        let after = platform.body_width().trunc();

        let original = platform.body_padding_right().trunc();
        let compensated = original + (after - before);
        platform.set_body_padding_right(&px(compensated));
        platform.set_body_attribute(ORIGINAL_PADDING_ATTRIBUTE, &px(original));

        log::debug!("Scroll locked, padding {} -> {}", px(original), px(compensated));
    }

    /// Called after a modal frame has been removed.
    pub fn on_modal_removed<P: Platform>(&self, platform: &P) {
        if platform.count_by_class(MODAL_CLASS) > 0 || !self.is_locked(platform) {
            return;
        }

        platform.body_remove_class(DISABLE_SCROLL_CLASS);
        let original = platform
            .body_attribute(ORIGINAL_PADDING_ATTRIBUTE)
            .filter(|value| leading_number(value, true).is_some())
            .unwrap_or_else(|| px(0.0));
        platform.set_body_padding_right(&original);
        log::debug!("Scroll unlocked, padding restored to {original}");
    }
}

fn px(value: f64) -> String {
    format!("{}px", value as i64)
}
