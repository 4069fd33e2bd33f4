use crate::{
    BindingKey, ConstantProvider, InjectError, InjectResult, Injector,
    Provider, Scope, Svc,
};
use ::thread_local::ThreadLocal;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct ContextState {
    depth: usize,
    cache: HashMap<BindingKey, Svc<dyn Provider>>,
}

/// A scope whose values are only valid inside an explicitly entered
/// context, for example the handling of a single request.
///
/// The scope is not built in, so it has to be registered with
/// [`Binder::bind_scope`](crate::Binder::bind_scope). Values are cached
/// until the outermost context is left. Outside of any context, resolving
/// a capability bound in this scope fails with
/// [`InjectError::UnsatisfiedRequirement`].
///
/// Contexts belong to the thread which entered them. Entering a context on
/// one thread does not activate the scope for other threads, and each
/// thread's context has its own cache.
///
/// ```
/// use binding_injector::{
///     interface, ContextScope, InjectError, Injector, ScopeRef, Svc, Target,
/// };
///
/// struct Session(u32);
/// interface!(Session);
///
/// let injector = Injector::new();
/// let binder = injector.binder();
/// binder.bind_scope::<ContextScope>();
/// binder
///     .bind::<Svc<Session>>(
///         Target::callable(|| Session(7)),
///         Some(ScopeRef::context()),
///     )
///     .unwrap();
///
/// let scope = injector.scope::<ContextScope>().unwrap();
/// {
///     let _context = scope.enter();
///     let first: Svc<Session> = injector.get().unwrap();
///     let second: Svc<Session> = injector.get().unwrap();
///     assert!(Svc::ptr_eq(&first, &second));
/// }
///
/// assert!(matches!(
///     injector.get::<Svc<Session>>(),
///     Err(InjectError::UnsatisfiedRequirement { .. })
/// ));
/// ```
#[derive(Default)]
pub struct ContextScope {
    states: ThreadLocal<Mutex<ContextState>>,
}

impl ContextScope {
    /// Enters a context on the current thread. The context is left when the
    /// returned guard is dropped. Contexts may be nested.
    #[must_use]
    pub fn enter(&self) -> ContextGuard<'_> {
        let state = self.states.get_or_default();
        state.lock().depth += 1;
        ContextGuard { state }
    }

    /// Whether a context is active on the current thread.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.states
            .get()
            .map_or(false, |state| state.lock().depth > 0)
    }
}

impl Scope for ContextScope {
    fn get(
        &self,
        key: &BindingKey,
        provider: Svc<dyn Provider>,
        owner: &Injector,
    ) -> InjectResult<Svc<dyn Provider>> {
        let state = self.states.get_or_default();
        {
            let state = state.lock();
            if state.depth == 0 {
                return Err(InjectError::UnsatisfiedRequirement {
                    owner: None,
                    key: *key,
                });
            }
            if let Some(cached) = state.cache.get(key) {
                return Ok(cached.clone());
            }
        }

        let value = provider.get(owner)?;
        let produced: Svc<dyn Provider> =
            Svc::new(ConstantProvider::from_dyn(value));
        let mut state = state.lock();
        if state.depth == 0 {
            return Ok(produced);
        }
        Ok(state.cache.entry(*key).or_insert(produced).clone())
    }
}

/// Keeps a [`ContextScope`] context active until dropped.
pub struct ContextGuard<'a> {
    state: &'a Mutex<ContextState>,
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.depth -= 1;
        if state.depth == 0 {
            state.cache.clear();
        }
    }
}
