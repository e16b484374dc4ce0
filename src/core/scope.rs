//! # Unit-of-work bracketing per execution context.
//!
//! [`ScopeState`] tracks, for each execution context, the stack of open
//! [`JobScope`]s plus the context's identity and command tags.
//!
//! ## Architecture
//! ```text
//! JobProcessing ──► Effect::EnterScope ──► ScopeState::enter(ctx)   push frame (tags saved)
//! Authenticated ──► Effect::Identify   ──► ScopeState::identify(ctx)
//! JobProcessed  ──► Effect::ExitScope  ──► ScopeState::exit(ctx)    pop frame (tags restored)
//!
//!            HashMap<ContextKey, ContextState>
//!                          │
//!                          ▼
//!            { tags, frames: [ (JobScope, saved tags), ... ] }
//! ```
//!
//! ## Rules
//! - State is keyed by [`ContextKey`], never shared across contexts.
//! - Nested starts push; each end pops exactly one level.
//! - An end with no open scope is a no-op reported as imbalance (`exit` returns `None`).
//! - Leaving a scope restores the tags that were active when it was entered.
//! - A context entry is removed as soon as it is back to an empty Idle state.
//! - A thread's entry is removed when the thread exits. Worker entries live until
//!   [`ScopeState::forget`], since worker ids are chosen and reused by the host.
//! - Identity set outside any scope persists in its context until cleared, so hosts
//!   serving requests on pooled threads clear it at the end of each request.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

tokio::task_local! {
    static WORKER: u64;
}

thread_local! {
    static THREAD_EXIT: ThreadExit = ThreadExit::new();
}

type Contexts = Mutex<HashMap<ContextKey, ContextState>>;

/// Removes the exiting thread's entry from every [`ScopeState`] it touched.
struct ThreadExit {
    key: ContextKey,
    states: RefCell<Vec<Weak<Contexts>>>,
}

impl ThreadExit {
    fn new() -> Self {
        Self {
            key: ContextKey::Thread(thread::current().id()),
            states: RefCell::new(Vec::new()),
        }
    }

    fn watch(&self, contexts: &Arc<Contexts>) {
        let mut states = self.states.borrow_mut();
        states.retain(|w| w.strong_count() > 0);
        if !states.iter().any(|w| w.as_ptr() == Arc::as_ptr(contexts)) {
            states.push(Arc::downgrade(contexts));
        }
    }
}

impl Drop for ThreadExit {
    fn drop(&mut self) {
        for contexts in self.states.get_mut().drain(..).filter_map(|w| w.upgrade()) {
            contexts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.key);
        }
    }
}

/// Identifies one execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// A logical worker bound with [`with_worker_context`] / [`sync_with_worker_context`].
    Worker(u64),
    /// The OS thread calling into the collector.
    Thread(ThreadId),
}

impl ContextKey {
    /// Resolves the caller's context: the bound worker if any, else the current thread.
    pub fn current() -> Self {
        WORKER
            .try_with(|id| ContextKey::Worker(*id))
            .unwrap_or_else(|_| ContextKey::Thread(thread::current().id()))
    }
}

/// Runs `fut` with events attributed to worker `id` instead of the polling thread.
///
/// Async hosts should wrap each worker loop in this, since a task may resume on a
/// different thread after every `.await`.
pub async fn with_worker_context<F: Future>(id: u64, fut: F) -> F::Output {
    WORKER.scope(id, fut).await
}

/// Runs `f` with events attributed to worker `id`.
pub fn sync_with_worker_context<R>(id: u64, f: impl FnOnce() -> R) -> R {
    WORKER.sync_scope(id, f)
}

/// One open unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobScope {
    pub job: Option<String>,
    pub queue: Option<String>,
    pub connection: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Tags {
    identity: Option<String>,
    command: Option<String>,
}

impl Tags {
    fn is_empty(&self) -> bool {
        self.identity.is_none() && self.command.is_none()
    }
}

#[derive(Debug, Default)]
struct ContextState {
    tags: Tags,
    /// Open scopes, innermost last, each with the tags saved at entry.
    frames: Vec<(JobScope, Tags)>,
}

impl ContextState {
    fn is_idle_and_empty(&self) -> bool {
        self.frames.is_empty() && self.tags.is_empty()
    }
}

/// Per-context scope stacks and tags.
#[derive(Debug, Default)]
pub struct ScopeState {
    contexts: Arc<Contexts>,
}

impl ScopeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope in `ctx`; tags set inside it are unwound by the matching [`exit`](Self::exit).
    pub fn enter(&self, ctx: ContextKey, scope: JobScope) {
        let mut contexts = self.lock();
        if !contexts.contains_key(&ctx) {
            self.watch_thread_exit(ctx);
        }
        let state = contexts.entry(ctx).or_default();
        let saved = state.tags.clone();
        state.frames.push((scope, saved));
    }

    /// Closes the innermost scope of `ctx`.
    ///
    /// Returns `None` (and changes nothing) when no scope is open.
    pub fn exit(&self, ctx: ContextKey) -> Option<JobScope> {
        let mut contexts = self.lock();
        let state = contexts.get_mut(&ctx)?;
        let (scope, saved) = state.frames.pop()?;
        state.tags = saved;
        if state.is_idle_and_empty() {
            contexts.remove(&ctx);
        }
        Some(scope)
    }

    /// Returns the number of open scopes in `ctx` (0 = Idle).
    pub fn depth(&self, ctx: ContextKey) -> usize {
        self.lock().get(&ctx).map_or(0, |s| s.frames.len())
    }

    pub fn is_idle(&self, ctx: ContextKey) -> bool {
        self.depth(ctx) == 0
    }

    /// Returns a copy of the innermost open scope of `ctx`.
    pub fn current(&self, ctx: ContextKey) -> Option<JobScope> {
        self.lock()
            .get(&ctx)
            .and_then(|s| s.frames.last())
            .map(|(scope, _)| scope.clone())
    }

    pub fn identify(&self, ctx: ContextKey, identity: String) {
        self.update_tags(ctx, |tags| tags.identity = Some(identity));
    }

    /// Clears the identity of `ctx`. Inside a scope, the identity saved at entry
    /// still comes back when the scope exits.
    pub fn clear_identity(&self, ctx: ContextKey) {
        self.update_tags(ctx, |tags| tags.identity = None);
    }

    pub fn identity(&self, ctx: ContextKey) -> Option<String> {
        self.lock().get(&ctx).and_then(|s| s.tags.identity.clone())
    }

    pub fn tag_command(&self, ctx: ContextKey, command: Option<String>) {
        self.update_tags(ctx, |tags| tags.command = command);
    }

    pub fn command(&self, ctx: ContextKey) -> Option<String> {
        self.lock().get(&ctx).and_then(|s| s.tags.command.clone())
    }

    /// Drops every scope and tag of `ctx`.
    ///
    /// Returns the number of scopes that were still open.
    pub fn forget(&self, ctx: ContextKey) -> usize {
        self.lock().remove(&ctx).map_or(0, |s| s.frames.len())
    }

    /// Returns the number of contexts currently holding state.
    pub fn tracked_contexts(&self) -> usize {
        self.lock().len()
    }

    fn update_tags(&self, ctx: ContextKey, f: impl FnOnce(&mut Tags)) {
        let mut contexts = self.lock();
        let fresh = !contexts.contains_key(&ctx);
        let state = contexts.entry(ctx).or_default();
        f(&mut state.tags);
        if state.is_idle_and_empty() {
            contexts.remove(&ctx);
        } else if fresh {
            self.watch_thread_exit(ctx);
        }
    }

    fn watch_thread_exit(&self, ctx: ContextKey) {
        if ctx == ContextKey::Thread(thread::current().id()) {
            // already torn down while the thread exits
            let _ = THREAD_EXIT.try_with(|exit| exit.watch(&self.contexts));
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContextKey, ContextState>> {
        self.contexts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
