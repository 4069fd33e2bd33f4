use crate::{
    AsAny, BindingKey, ContextScope, InjectResult, Injector, Provider,
    ServiceInfo, SingletonScope, Svc, ThreadLocalScope,
};
use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
};

/// A caching policy applied on top of a provider.
///
/// The injector asks the scope instance owned by the injector holding a
/// binding for a provider wrapping the binding's default provider, then
/// invokes the returned provider. A scope may return the default provider
/// unchanged, or a provider of a value it produced earlier.
pub trait Scope: AsAny {
    /// Returns the provider to use for `key`. `owner` is the injector which
    /// owns this scope instance.
    fn get(
        &self,
        key: &BindingKey,
        provider: Svc<dyn Provider>,
        owner: &Injector,
    ) -> InjectResult<Svc<dyn Provider>>;
}

/// A reference to a scope type, used to choose the scope of a binding.
///
/// The built-in scopes are created on demand by each injector that uses
/// them. Any other scope must be registered with
/// [`Binder::bind_scope`](crate::Binder::bind_scope) before it is used.
#[derive(Clone, Copy)]
pub struct ScopeRef {
    info: ServiceInfo,
    builtin: Option<fn() -> Svc<dyn Scope>>,
}

impl ScopeRef {
    /// Refers to the scope type `S`.
    #[must_use]
    pub fn of<S: Scope>() -> Self {
        let info = ServiceInfo::of::<S>();
        [Self::no_scope(), Self::singleton(), Self::thread_local()]
            .into_iter()
            .find(|scope| scope.info == info)
            .unwrap_or(ScopeRef {
                info,
                builtin: None,
            })
    }

    /// Refers to [`NoScope`].
    #[must_use]
    pub fn no_scope() -> Self {
        ScopeRef {
            info: ServiceInfo::of::<NoScope>(),
            builtin: Some(new_no_scope as fn() -> Svc<dyn Scope>),
        }
    }

    /// Refers to [`SingletonScope`].
    #[must_use]
    pub fn singleton() -> Self {
        ScopeRef {
            info: ServiceInfo::of::<SingletonScope>(),
            builtin: Some(new_singleton as fn() -> Svc<dyn Scope>),
        }
    }

    /// Refers to [`ThreadLocalScope`].
    #[must_use]
    pub fn thread_local() -> Self {
        ScopeRef {
            info: ServiceInfo::of::<ThreadLocalScope>(),
            builtin: Some(new_thread_local as fn() -> Svc<dyn Scope>),
        }
    }

    /// Refers to [`ContextScope`].
    #[must_use]
    pub fn context() -> Self {
        Self::of::<ContextScope>()
    }

    /// The type of the scope.
    #[must_use]
    pub fn info(&self) -> ServiceInfo {
        self.info
    }

    /// The key under which instances of this scope are bound.
    #[must_use]
    pub fn key(&self) -> BindingKey {
        BindingKey::Singular(self.info)
    }

    /// Whether the scope is created on demand.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.builtin.is_some()
    }

    pub(crate) fn create(&self) -> Option<Svc<dyn Scope>> {
        self.builtin.map(|create| create())
    }
}

impl PartialEq for ScopeRef {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl Eq for ScopeRef {}

impl Hash for ScopeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.hash(state);
    }
}

impl Debug for ScopeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScopeRef").field(&self.info.name()).finish()
    }
}

fn new_no_scope() -> Svc<dyn Scope> {
    Svc::new(NoScope)
}

fn new_singleton() -> Svc<dyn Scope> {
    Svc::new(SingletonScope::default())
}

fn new_thread_local() -> Svc<dyn Scope> {
    Svc::new(ThreadLocalScope::default())
}

/// The default scope. Every resolution invokes the underlying provider.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoScope;

impl Scope for NoScope {
    fn get(
        &self,
        _key: &BindingKey,
        provider: Svc<dyn Provider>,
        _owner: &Injector,
    ) -> InjectResult<Svc<dyn Provider>> {
        Ok(provider)
    }
}
