use crate::{
    BindingKey, DynSvc, InjectError, InjectResult, Injector, Interface,
    InjectorProvider, ListProvider, MapProvider, Provider, ScopeRef, Service,
    ServiceInfo, Svc,
};
use std::collections::HashMap;

/// A capability which can be requested from an injector.
///
/// The following requests are supported:
///
/// - [`Svc<I>`](crate::Svc): the implementation bound for the interface `I`.
/// - `Vec<Svc<I>>`: every implementation contributed to the list
///   multibinding of `I`, in contribution order.
/// - `HashMap<String, Svc<I>>`: the entries contributed to the map
///   multibinding of `I`.
/// - [`Injector`]: the injector performing the request.
/// - [`ProviderOf<R>`](crate::ProviderOf): a handle resolving `R` lazily.
/// - [`AssistedBuilder<I>`](crate::AssistedBuilder) and
///   [`ClassAssistedBuilder<T>`](crate::ClassAssistedBuilder): builders
///   which construct a type with some arguments supplied by the caller.
///
/// The value inside the [`DynSvc`] produced for a request is always the
/// request type itself.
pub trait Request: Clone + Service {
    /// The key this request is bound under.
    fn binding_key() -> BindingKey;

    /// The provider used when this request is auto-bound.
    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        None
    }

    /// The scope this request is auto-bound in.
    fn declared_scope() -> Option<ScopeRef> {
        None
    }

    /// Whether this request can be resolved even when auto-binding is
    /// disabled.
    fn is_special() -> bool {
        false
    }

    /// Recovers the request from a provided value.
    fn from_dyn(value: DynSvc) -> InjectResult<Self> {
        value
            .downcast::<Self>()
            .map(|value| (*value).clone())
            .map_err(|_| InjectError::InvalidProvider {
                key: Self::binding_key(),
            })
    }
}

/// A request which can be bound with [`Binder::bind`](crate::Binder::bind).
pub trait Bindable: Request {
    /// The interface the request resolves.
    type Interface: ?Sized + Interface;

    /// Wraps a service pointer to the interface.
    fn from_interface(service: Svc<Self::Interface>) -> Self;
}

/// A request which can be contributed to with
/// [`Binder::multibind`](crate::Binder::multibind).
pub trait MultiBindable: Request {
    /// Creates an empty aggregating provider for this request.
    fn aggregator() -> Svc<dyn Provider>;
}

impl<I: ?Sized + Interface> Request for Svc<I> {
    fn binding_key() -> BindingKey {
        BindingKey::Singular(ServiceInfo::of::<I>())
    }

    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        I::implicit_provider()
    }

    fn declared_scope() -> Option<ScopeRef> {
        I::declared_scope()
    }
}

impl<I: ?Sized + Interface> Bindable for Svc<I> {
    type Interface = I;

    fn from_interface(service: Svc<I>) -> Self {
        service
    }
}

impl<I: ?Sized + Interface> Request for Vec<Svc<I>> {
    fn binding_key() -> BindingKey {
        BindingKey::List(ServiceInfo::of::<I>())
    }

    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        Some(Self::aggregator())
    }
}

impl<I: ?Sized + Interface> MultiBindable for Vec<Svc<I>> {
    fn aggregator() -> Svc<dyn Provider> {
        Svc::new(ListProvider::<I>::new())
    }
}

impl<I: ?Sized + Interface> Request for HashMap<String, Svc<I>> {
    fn binding_key() -> BindingKey {
        BindingKey::Map(ServiceInfo::of::<I>())
    }

    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        Some(Self::aggregator())
    }
}

impl<I: ?Sized + Interface> MultiBindable for HashMap<String, Svc<I>> {
    fn aggregator() -> Svc<dyn Provider> {
        Svc::new(MapProvider::<I>::new())
    }
}

/// Requests the injector which is performing the request.
impl Request for Injector {
    fn binding_key() -> BindingKey {
        BindingKey::Singular(ServiceInfo::of::<Injector>())
    }

    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        Some(Svc::new(InjectorProvider))
    }

    fn declared_scope() -> Option<ScopeRef> {
        Some(ScopeRef::no_scope())
    }

    fn is_special() -> bool {
        true
    }
}
