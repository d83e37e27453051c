//! The modal instance and its lifecycle.
//!
//! ```text
//! Unshown --show()--> Open --close()--> Closing --(transition)--> Removed
//! ```
//!
//! `show()` builds the backdrop and frame, inserts them and starts the
//! fade-in. `close()` fades both out and removes them once the transition
//! time has elapsed. A removed modal is never shown again.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::animation::Fader;
use crate::context::ModalContext;
use crate::error::{ConfigError, UsageError};
use crate::options::{ButtonSpec, Callback, FadeFn, ModalOptions};
use crate::platform::Platform;
use crate::value::OptionValue;

pub const MODAL_CLASS: &str = "simple-modal";
pub const HIDE_CLASS: &str = "simple-modal-hide";
pub const NO_TITLE_CLASS: &str = "simple-modal-no-title";
pub const NO_BODY_CLASS: &str = "simple-modal-no-body";
pub const NO_BUTTONS_CLASS: &str = "simple-modal-no-buttons";
pub const BACKGROUND_CLASS: &str = "simple-modal-background";
pub const INNER_CLASS: &str = "simple-modal-inner";
pub const CLOSE_CLASS: &str = "simple-modal-close";
pub const TITLE_CLASS: &str = "simple-modal-title";
pub const BODY_CLASS: &str = "simple-modal-body";
pub const BUTTONS_CLASS: &str = "simple-modal-buttons";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    /// Constructed, nothing rendered yet.
    Unshown,
    Open,
    /// Fading out; the DOM is removed when the transition ends.
    Closing,
    Removed,
}

/// A single modal dialog. Clones are handles to the same instance.
pub struct SimpleModal<P: Platform> {
    inner: Rc<ModalInner<P>>,
}

struct ModalInner<P: Platform> {
    context: ModalContext<P>,
    options: ModalOptions<P>,
    transition_time: u32,
    fade_in: Option<FadeFn<P>>,
    fade_out: Option<FadeFn<P>>,
    state: Cell<ModalState>,
    frame: RefCell<Option<P::Element>>,
    backdrop: RefCell<Option<P::Element>>,
    frame_fader: Fader<P>,
    backdrop_fader: Fader<P>,
    settle: RefCell<Option<P::Timer>>,
    removals: RefCell<Vec<P::Timer>>,
    listeners: RefCell<Vec<P::Listener>>,
}

struct WeakModal<P: Platform>(Weak<ModalInner<P>>);

impl<P: Platform> WeakModal<P> {
    fn upgrade(&self) -> Option<SimpleModal<P>> {
        self.0.upgrade().map(|inner| SimpleModal { inner })
    }
}

impl<P: Platform> Clone for SimpleModal<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Platform> fmt::Debug for SimpleModal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleModal")
            .field("state", &self.state())
            .field("size", &self.inner.options.size)
            .field("title", &self.inner.options.title)
            .field("transition_time", &self.inner.transition_time)
            .finish_non_exhaustive()
    }
}

impl<P: Platform> SimpleModal<P> {
    /// Creates an instance. Nothing is rendered until [`SimpleModal::show`].
    ///
    /// The transition time and fade functions fall back to the context's
    /// global settings as they are at this moment.
    pub fn new(context: &ModalContext<P>, options: ModalOptions<P>) -> Self {
        let (transition_time, fade_in, fade_out) = {
            let settings = context.settings();
            (
                options.transition_time.unwrap_or(settings.transition_time),
                options
                    .custom_fade_in
                    .clone()
                    .or_else(|| settings.custom_fade_in.clone()),
                options
                    .custom_fade_out
                    .clone()
                    .or_else(|| settings.custom_fade_out.clone()),
            )
        };

        Self {
            inner: Rc::new(ModalInner {
                context: context.clone(),
                options,
                transition_time,
                fade_in,
                fade_out,
                state: Cell::new(ModalState::Unshown),
                frame: RefCell::new(None),
                backdrop: RefCell::new(None),
                frame_fader: Fader::new(),
                backdrop_fader: Fader::new(),
                settle: RefCell::new(None),
                removals: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Resolves untyped options and creates an instance.
    pub fn from_options(
        context: &ModalContext<P>,
        raw: &OptionValue<P::Function>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(context, ModalOptions::resolve(raw)?))
    }

    pub fn context(&self) -> &ModalContext<P> {
        &self.inner.context
    }

    pub fn options(&self) -> &ModalOptions<P> {
        &self.inner.options
    }

    pub fn state(&self) -> ModalState {
        self.inner.state.get()
    }

    pub fn transition_time(&self) -> u32 {
        self.inner.transition_time
    }

    pub fn ptr_eq(&self, other: &SimpleModal<P>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn downgrade(&self) -> WeakModal<P> {
        WeakModal(Rc::downgrade(&self.inner))
    }

    fn platform(&self) -> Rc<P> {
        self.inner.context.platform().clone()
    }

    /// Builds the modal, inserts it into the document and fades it in.
    ///
    /// `on_shown` runs after the DOM is in place, right after the
    /// `on_complete` option. Calling `show` more than once has no effect.
    pub fn show(&self, on_shown: Option<Callback<P>>) -> Self {
        if self.state() != ModalState::Unshown {
            log::warn!("Ignoring show() on a modal in state {:?}", self.state());
            return self.clone();
        }

        let platform = self.platform();
        let frame = self.build_frame(&platform);
        *self.inner.frame.borrow_mut() = Some(frame.clone());

        self.show_backdrop(&platform);
        platform.append_to_body(&frame);
        self.inner.state.set(ModalState::Open);
        self.inner.context.register(self);
        log::debug!(
            "Showing {} modal {:?}",
            self.inner.options.size.as_str(),
            self.inner.options.title
        );

        self.inner.frame_fader.fade_in(
            &platform,
            &frame,
            None,
            self.inner.transition_time,
            self.inner.fade_in.as_ref(),
        );

        if let Some(on_complete) = &self.inner.options.on_complete {
            on_complete.call(self);
        }
        if let Some(on_shown) = on_shown {
            on_shown.call(self);
        }

        let disable_scrolling = self.inner.context.settings().disable_scrolling;
        self.inner
            .context
            .scroll_lock()
            .on_modal_shown(platform.as_ref(), disable_scrolling);

        self.clone()
    }

    fn build_frame(&self, platform: &Rc<P>) -> P::Element {
        let options = &self.inner.options;
        let frame = platform.create_element("div");
        platform.add_class(&frame, MODAL_CLASS);
        platform.add_class(&frame, HIDE_CLASS);
        platform.add_class(&frame, options.size.as_str());

        let inner = platform.create_element("div");
        platform.add_class(&inner, INNER_CLASS);

        if options.closable {
            let close = platform.create_element("div");
            platform.add_class(&close, CLOSE_CLASS);
            let weak = self.downgrade();
            let listener = platform.on_click(
                &close,
                Box::new(move || {
                    if let Some(modal) = weak.upgrade() {
                        modal.close(None);
                    }
                }),
            );
            self.inner.listeners.borrow_mut().push(listener);
            platform.append_child(&inner, &close);
        }

        if options.title.is_empty() {
            platform.add_class(&frame, NO_TITLE_CLASS);
        } else {
            let title = platform.create_element("div");
            platform.add_class(&title, TITLE_CLASS);
            platform.append_text(&title, &options.title);
            platform.append_child(&inner, &title);
        }

        if options.body.is_empty() {
            platform.add_class(&frame, NO_BODY_CLASS);
        } else {
            let body = platform.create_element("div");
            platform.add_class(&body, BODY_CLASS);
            platform.set_inner_html(&body, &options.body);
            platform.append_child(&inner, &body);
        }

        if options.buttons.is_empty() {
            platform.add_class(&frame, NO_BUTTONS_CLASS);
        } else {
            let buttons = platform.create_element("div");
            platform.add_class(&buttons, BUTTONS_CLASS);
            for spec in &options.buttons {
                let button = self.build_button(platform, spec);
                platform.append_child(&buttons, &button);
            }
            platform.append_child(&inner, &buttons);
        }

        platform.append_child(&frame, &inner);
        frame
    }

    fn build_button(&self, platform: &Rc<P>, spec: &ButtonSpec<P>) -> P::Element {
        let button = platform.create_element("button");
        platform.append_text(&button, &spec.value);
        if let Some(class) = &spec.class {
            platform.add_class(&button, class);
        }

        let weak = self.downgrade();
        let callback = spec.callback.clone();
        let listener = platform.on_click(
            &button,
            Box::new(move || {
                if let Some(modal) = weak.upgrade() {
                    modal.handle_button(callback.as_ref());
                }
            }),
        );
        self.inner.listeners.borrow_mut().push(listener);
        button
    }

    /// Runs a button callback; only an explicit `false` keeps the modal open.
    fn handle_button(&self, callback: Option<&Callback<P>>) {
        let keep_open = callback.and_then(|c| c.call(self)) == Some(false);
        if !keep_open {
            self.close(None);
        }
    }

    fn show_backdrop(&self, platform: &Rc<P>) {
        let backdrop = platform.create_element("div");
        platform.add_class(&backdrop, BACKGROUND_CLASS);
        platform.add_class(&backdrop, HIDE_CLASS);
        platform.append_to_body(&backdrop);
        *self.inner.backdrop.borrow_mut() = Some(backdrop.clone());

        self.inner.backdrop_fader.fade_in(
            platform,
            &backdrop,
            self.inner.options.background_opacity,
            self.inner.transition_time,
            self.inner.fade_in.as_ref(),
        );

        // The outside-click handler waits for the fade so the click that
        // opened the modal cannot close it.
        let weak = self.downgrade();
        let timer = platform.set_timeout(
            self.inner.transition_time,
            Box::new(move || {
                if let Some(modal) = weak.upgrade() {
                    modal.settle();
                }
            }),
        );
        *self.inner.settle.borrow_mut() = Some(timer);
    }

    /// End of the fade-in: drop the hide markers and arm outside-click dismissal.
    fn settle(&self) {
        if self.state() != ModalState::Open {
            return;
        }
        let platform = self.platform();
        if let Some(frame) = self.inner.frame.borrow().as_ref() {
            platform.remove_class(frame, HIDE_CLASS);
        }
        let Some(backdrop) = self.inner.backdrop.borrow().clone() else {
            return;
        };
        platform.remove_class(&backdrop, HIDE_CLASS);

        if self.inner.options.closable_on_outside_click {
            let weak = self.downgrade();
            let listener = platform.on_click(
                &backdrop,
                Box::new(move || {
                    if let Some(modal) = weak.upgrade() {
                        modal.close(None);
                    }
                }),
            );
            self.inner.listeners.borrow_mut().push(listener);
        }
    }

    /// Fades the modal out and removes it once the transition time elapses.
    ///
    /// `on_closed` runs after the frame has left the document. Has no effect
    /// unless the modal is open.
    pub fn close(&self, on_closed: Option<Callback<P>>) -> Self {
        if self.state() != ModalState::Open {
            return self.clone();
        }
        let platform = self.platform();
        let Some(frame) = self.inner.frame.borrow().clone() else {
            return self.clone();
        };
        if !platform.is_attached(&frame) {
            return self.clone();
        }

        self.inner.state.set(ModalState::Closing);
        let settle = self.inner.settle.borrow_mut().take();
        drop(settle);
        log::debug!("Closing modal {:?}", self.inner.options.title);

        let transition_time = self.inner.transition_time;
        let backdrop = self.inner.backdrop.borrow().clone();
        if let Some(backdrop) = backdrop {
            self.inner.backdrop_fader.fade_out(
                &platform,
                &backdrop,
                transition_time,
                self.inner.fade_out.as_ref(),
            );
            let weak = self.downgrade();
            let timer = platform.set_timeout(
                transition_time,
                Box::new(move || {
                    if let Some(modal) = weak.upgrade() {
                        modal.remove_backdrop();
                    }
                }),
            );
            self.inner.removals.borrow_mut().push(timer);
        }

        self.inner.frame_fader.fade_out(
            &platform,
            &frame,
            transition_time,
            self.inner.fade_out.as_ref(),
        );
        let weak = self.downgrade();
        let timer = platform.set_timeout(
            transition_time,
            Box::new(move || {
                if let Some(modal) = weak.upgrade() {
                    modal.remove_frame(on_closed);
                }
            }),
        );
        self.inner.removals.borrow_mut().push(timer);

        self.clone()
    }

    fn remove_backdrop(&self) {
        self.inner.backdrop_fader.cancel();
        if let Some(backdrop) = self.inner.backdrop.borrow().as_ref() {
            self.inner.context.platform().detach(backdrop);
        }
    }

    fn remove_frame(&self, on_closed: Option<Callback<P>>) {
        let platform = self.platform();
        self.inner.frame_fader.cancel();
        if let Some(frame) = self.inner.frame.borrow().as_ref() {
            platform.detach(frame);
        }
        self.inner.state.set(ModalState::Removed);
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        drop(listeners);

        self.inner
            .context
            .scroll_lock()
            .on_modal_removed(platform.as_ref());
        log::debug!("Removed modal {:?}", self.inner.options.title);

        if let Some(on_closed) = on_closed {
            on_closed.call(self);
        }
        self.inner.context.unregister(self);
    }

    /// Replaces the title text. Only modals built with a title have one to
    /// replace, and an empty string leaves it unchanged.
    pub fn update_title(&self, title: &str) -> Result<(), UsageError> {
        let frame = self.require_frame("updateTitle")?;
        if title.is_empty() {
            return Ok(());
        }
        let platform = self.platform();
        if let Some(element) = platform.find_by_class(&frame, TITLE_CLASS) {
            platform.set_text(&element, title);
        }
        Ok(())
    }

    /// Replaces the body markup verbatim. Only modals built with a body have
    /// one to replace. The markup is not sanitized.
    pub fn update_body(&self, html: &str) -> Result<(), UsageError> {
        let frame = self.require_frame("updateBody")?;
        let platform = self.platform();
        if let Some(element) = platform.find_by_class(&frame, BODY_CLASS) {
            platform.set_inner_html(&element, html);
        }
        Ok(())
    }

    fn require_frame(&self, operation: &'static str) -> Result<P::Element, UsageError> {
        self.inner
            .frame
            .borrow()
            .clone()
            .ok_or(UsageError::NotShown { operation })
    }

    /// The frame root, only while it is attached to the document.
    pub fn get_modal_element(&self) -> Option<P::Element> {
        let frame = self.inner.frame.borrow().clone()?;
        self.inner
            .context
            .platform()
            .is_attached(&frame)
            .then_some(frame)
    }

    /// The backdrop element, only while it is attached to the document.
    pub fn get_backdrop_element(&self) -> Option<P::Element> {
        let backdrop = self.inner.backdrop.borrow().clone()?;
        self.inner
            .context
            .platform()
            .is_attached(&backdrop)
            .then_some(backdrop)
    }
}
