//! Navigator defense: per-session user-agent spoof.
//!
//! The reported user agent is replaced with one value drawn once per session
//! from a pool of plausible strings. Languages and plugins pass through; the
//! collectors salt-hash them instead.

use super::{lock_state, SharedState};
use crate::platform::{ApiResult, NavigatorSource};

/// Navigator decorator.
pub struct DefendedNavigator {
    inner: Box<dyn NavigatorSource>,
    state: SharedState,
}

impl DefendedNavigator {
    pub fn new(inner: Box<dyn NavigatorSource>, state: SharedState) -> Self {
        Self { inner, state }
    }
}

impl NavigatorSource for DefendedNavigator {
    fn user_agent(&self) -> ApiResult<String> {
        let mut st = lock_state(&self.state);
        if st.settings.enabled && st.settings.spoof_user_agent {
            Ok(st.user_agent())
        } else {
            drop(st);
            self.inner.user_agent()
        }
    }

    fn languages(&self) -> ApiResult<Vec<String>> {
        self.inner.languages()
    }

    fn plugins(&self) -> ApiResult<Vec<String>> {
        self.inner.plugins()
    }
}
