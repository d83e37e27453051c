//! Page-wide defaults shared by every modal built on the same context.

use std::fmt;

use crate::error::ConfigError;
use crate::options::{expect_bool, expect_function, parse_millis, FadeFn};
use crate::platform::Platform;
use crate::value::OptionValue;

pub const DEFAULT_TRANSITION_TIME: u32 = 600;

pub struct GlobalSettings<P: Platform> {
    /// Lock page scrolling while at least one modal is open.
    pub disable_scrolling: bool,
    /// Fallback for modals that do not set their own transition time.
    pub transition_time: u32,
    pub custom_fade_in: Option<FadeFn<P>>,
    pub custom_fade_out: Option<FadeFn<P>>,
}

impl<P: Platform> Default for GlobalSettings<P> {
    fn default() -> Self {
        Self {
            disable_scrolling: true,
            transition_time: DEFAULT_TRANSITION_TIME,
            custom_fade_in: None,
            custom_fade_out: None,
        }
    }
}

impl<P: Platform> Clone for GlobalSettings<P> {
    fn clone(&self) -> Self {
        Self {
            disable_scrolling: self.disable_scrolling,
            transition_time: self.transition_time,
            custom_fade_in: self.custom_fade_in.clone(),
            custom_fade_out: self.custom_fade_out.clone(),
        }
    }
}

impl<P: Platform> fmt::Debug for GlobalSettings<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalSettings")
            .field("disable_scrolling", &self.disable_scrolling)
            .field("transition_time", &self.transition_time)
            .field("custom_fade_in", &self.custom_fade_in)
            .field("custom_fade_out", &self.custom_fade_out)
            .finish()
    }
}

impl<P: Platform> GlobalSettings<P> {
    /// Overlays untyped settings onto `self`. Absent keys are left untouched.
    pub fn apply(&mut self, raw: &OptionValue<P::Function>) -> Result<(), ConfigError> {
        if let Some(value) = raw.get("disableScrolling") {
            self.disable_scrolling = expect_bool("disableScrolling", value)?;
        }
        if let Some(value) = raw.get("transitionTime") {
            self.transition_time = parse_millis("transitionTime", value)?;
        }
        if let Some(value) = raw.get("customFadeIn") {
            self.custom_fade_in = Some(FadeFn::Host(expect_function("customFadeIn", value)?));
        }
        if let Some(value) = raw.get("customFadeOut") {
            self.custom_fade_out = Some(FadeFn::Host(expect_function("customFadeOut", value)?));
        }
        Ok(())
    }
}
