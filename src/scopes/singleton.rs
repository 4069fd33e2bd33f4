use crate::{
    BindingKey, ConstantProvider, InjectError, InjectResult, Injector,
    Provider, Scope, ScopeRef, Svc,
};
use parking_lot::Mutex;
use std::collections::HashMap;

/// A scope which produces a single value per key for the lifetime of the
/// injector which owns it.
///
/// Production happens while the injector tree's resolution lock is held, so
/// racing first requests still produce only one value. When a capability was
/// auto-bound in a child injector, the parent's singleton is preferred so
/// that the child shares the instance its parent would have produced. A
/// failed production is never cached.
///
/// ```
/// use binding_injector::{interface, Injector, ScopeRef, Svc, Target};
///
/// struct Counter(u32);
/// interface!(Counter);
///
/// let injector = Injector::new();
/// injector
///     .binder()
///     .bind::<Svc<Counter>>(
///         Target::callable(|| Counter(0)),
///         Some(ScopeRef::singleton()),
///     )
///     .unwrap();
///
/// let first: Svc<Counter> = injector.get().unwrap();
/// let second: Svc<Counter> = injector.get().unwrap();
/// assert!(Svc::ptr_eq(&first, &second));
/// ```
#[derive(Default)]
pub struct SingletonScope {
    cache: Mutex<HashMap<BindingKey, Svc<dyn Provider>>>,
}

impl SingletonScope {
    /// Whether a value has been produced for `key`.
    #[must_use]
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.cache.lock().contains_key(key)
    }

    fn from_parent(
        key: &BindingKey,
        provider: &Svc<dyn Provider>,
        owner: &Injector,
    ) -> InjectResult<Option<Svc<dyn Provider>>> {
        let parent = match owner.parent() {
            Some(parent) => parent,
            None => return Ok(None),
        };
        if owner.binder().has_explicit_binding_for(key) {
            return Ok(None);
        }

        let scope = parent.scope_instance(ScopeRef::singleton())?;
        match scope.get(key, provider.clone(), parent) {
            Ok(provider) => Ok(Some(provider)),
            Err(
                InjectError::CallError { .. }
                | InjectError::UnsatisfiedRequirement { .. },
            ) => Ok(None),
            Err(error) => Err(error),
        }
    }
}

impl Scope for SingletonScope {
    fn get(
        &self,
        key: &BindingKey,
        provider: Svc<dyn Provider>,
        owner: &Injector,
    ) -> InjectResult<Svc<dyn Provider>> {
        if let Some(cached) = self.cache.lock().get(key).cloned() {
            return Ok(cached);
        }

        if let Some(shared) = Self::from_parent(key, &provider, owner)? {
            trace!(%key, "sharing singleton from parent injector");
            return Ok(shared);
        }

        trace!(%key, "producing singleton");
        let value = provider.get(owner)?;
        let produced: Svc<dyn Provider> =
            Svc::new(ConstantProvider::from_dyn(value));
        let mut cache = self.cache.lock();
        Ok(cache.entry(*key).or_insert(produced).clone())
    }
}
