//! The shared state every modal on a page coordinates through.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::error::ConfigError;
use crate::modal::SimpleModal;
use crate::platform::Platform;
use crate::scroll_lock::ScrollLock;
use crate::settings::GlobalSettings;
use crate::value::OptionValue;

/// Handle to a platform, its global settings, the scroll lock and the set
/// of live modals. Clones share state; separate contexts share nothing.
pub struct ModalContext<P: Platform> {
    inner: Rc<ContextInner<P>>,
}

struct ContextInner<P: Platform> {
    platform: Rc<P>,
    settings: RefCell<GlobalSettings<P>>,
    scroll_lock: ScrollLock,
    live: RefCell<Vec<SimpleModal<P>>>,
}

impl<P: Platform> Clone for ModalContext<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Platform> ModalContext<P> {
    pub fn new(platform: P) -> Self {
        Self::with_settings(platform, GlobalSettings::default())
    }

    pub fn with_settings(platform: P, settings: GlobalSettings<P>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                platform: Rc::new(platform),
                settings: RefCell::new(settings),
                scroll_lock: ScrollLock::new(),
                live: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn platform(&self) -> &Rc<P> {
        &self.inner.platform
    }

    pub fn settings(&self) -> Ref<'_, GlobalSettings<P>> {
        self.inner.settings.borrow()
    }

    /// Changes the global settings. Modals already constructed keep the
    /// values they resolved at construction.
    pub fn configure(&self, f: impl FnOnce(&mut GlobalSettings<P>)) {
        f(&mut self.inner.settings.borrow_mut());
    }

    /// Overlays untyped global settings. Nothing changes on error.
    pub fn configure_from(&self, raw: &OptionValue<P::Function>) -> Result<(), ConfigError> {
        let mut updated = self.settings().clone();
        updated.apply(raw)?;
        *self.inner.settings.borrow_mut() = updated;
        Ok(())
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.inner.scroll_lock
    }

    /// Modals that have been shown and not yet removed from the document.
    pub fn live_count(&self) -> usize {
        self.inner.live.borrow().len()
    }

    pub(crate) fn register(&self, modal: &SimpleModal<P>) {
        self.inner.live.borrow_mut().push(modal.clone());
    }

    pub(crate) fn unregister(&self, modal: &SimpleModal<P>) -> Option<SimpleModal<P>> {
        let mut live = self.inner.live.borrow_mut();
        let index = live.iter().position(|m| m.ptr_eq(modal))?;
        Some(live.remove(index))
    }
}
