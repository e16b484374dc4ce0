//! # Handler resolution with a failure boundary.
//!
//! [`Dispatcher::dispatch`] looks up the [`Handler`] bound to an event name, runs its
//! normalizer, and applies the returned [`Effect`]s.
//!
//! ```text
//! dispatch(event, payload)
//!     │
//!     ├─ no binding ───────────────► Err(MissingHandler)          (loud)
//!     │
//!     └─ catch_unwind(handler.normalize(flags, payload))
//!           ├─ Err / panic ────────► Diagnostics::report(..)      Ok(())
//!           └─ Ok(effects) ────────► apply each in order          Ok(())
//!                 Record     → BreadcrumbStore::add (tagged with context identity)
//!                 EnterScope → ScopeState::enter
//!                 ExitScope  → ScopeState::exit (None → ScopeImbalance)
//!                 Identify / TagCommand → ScopeState tags
//!                 Flush      → FlushHandle::request (no transport → no-op)
//! ```
//!
//! Effects are applied only when the normalizer succeeds as a whole, so a failing
//! payload never half-applies.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::breadcrumbs::BreadcrumbStore;
use crate::config::RecorderFlags;
use crate::diagnostics::{Diagnostic, Diagnostics, DIAGNOSTIC_TARGET};
use crate::error::{DispatchError, NormalizeError};
use crate::events::Payload;
use crate::normalizers::{Effect, Handler};

use super::flusher::FlushHandle;
use super::panic_message;
use super::scope::{ContextKey, ScopeState};

/// Routes host events to their normalizers.
pub struct Dispatcher {
    bindings: RwLock<HashMap<&'static str, Handler>>,
    flags: RecorderFlags,
    store: Arc<BreadcrumbStore>,
    scopes: ScopeState,
    diagnostics: Arc<Diagnostics>,
    flush: Option<FlushHandle>,
}

impl Dispatcher {
    pub(crate) fn new(
        flags: RecorderFlags,
        store: Arc<BreadcrumbStore>,
        diagnostics: Arc<Diagnostics>,
        flush: Option<FlushHandle>,
    ) -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            flags,
            store,
            scopes: ScopeState::new(),
            diagnostics,
            flush,
        }
    }

    /// Binds `event` to `handler`, replacing any previous binding.
    pub fn bind(&self, event: &'static str, handler: Handler) {
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event, handler);
    }

    /// Returns the handler bound to `event`, if any.
    pub fn handler(&self, event: &str) -> Option<Handler> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .copied()
    }

    /// Dispatches one host event.
    ///
    /// # Errors
    /// [`DispatchError::MissingHandler`] when nothing is bound to `event`. Normalizer
    /// failures (including panics) are never returned; they are reported to the
    /// collector's [`Diagnostics`] and the event is dropped.
    pub fn dispatch(&self, event: &str, payload: &Payload) -> Result<(), DispatchError> {
        let handler = self.handler(event).ok_or_else(|| DispatchError::MissingHandler {
            event: event.to_string(),
        })?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.normalize(&self.flags, payload)))
            .unwrap_or_else(|p| Err(NormalizeError::Panicked(panic_message(p))));

        match outcome {
            Ok(effects) => self.apply(event, effects),
            Err(err) => self
                .diagnostics
                .report(Diagnostic::normalizer_failed(event, handler, &err)),
        }
        Ok(())
    }

    fn apply(&self, event: &str, effects: Vec<Effect>) {
        let ctx = ContextKey::current();
        for effect in effects {
            match effect {
                Effect::Record(mut crumb) => {
                    crumb.user = self.scopes.identity(ctx);
                    self.store.add(crumb);
                }
                Effect::EnterScope(scope) => self.scopes.enter(ctx, scope),
                Effect::ExitScope => {
                    if self.scopes.exit(ctx).is_none() {
                        self.diagnostics.report(Diagnostic::scope_imbalance(event));
                    }
                }
                Effect::Identify(identity) => self.scopes.identify(ctx, identity),
                Effect::TagCommand(command) => self.scopes.tag_command(ctx, command),
                Effect::Flush(reason) => match &self.flush {
                    Some(handle) => handle.request(reason),
                    None => tracing::trace!(
                        target: DIAGNOSTIC_TARGET,
                        reason = reason.as_str(),
                        "flush requested without a transport"
                    ),
                },
            }
        }
    }

    pub fn flags(&self) -> &RecorderFlags {
        &self.flags
    }

    pub fn scopes(&self) -> &ScopeState {
        &self.scopes
    }

    pub(crate) fn flush_handle(&self) -> Option<&FlushHandle> {
        self.flush.as_ref()
    }
}
