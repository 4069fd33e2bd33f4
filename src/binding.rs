use crate::{
    BindingKey, Bindable, CallableProvider, ClassProvider, Injectable,
    InterfaceFor, Provider, Request, ScopeRef, Service, ServiceFactory,
    Svc,
};

/// A capability stored in a binder along with its provider and scope.
#[derive(Clone)]
pub struct Binding {
    key: BindingKey,
    provider: Svc<dyn Provider>,
    scope: ScopeRef,
    implicit: bool,
}

impl Binding {
    pub(crate) fn new(
        key: BindingKey,
        provider: Svc<dyn Provider>,
        scope: ScopeRef,
        implicit: bool,
    ) -> Self {
        Binding {
            key,
            provider,
            scope,
            implicit,
        }
    }

    #[must_use]
    pub fn key(&self) -> BindingKey {
        self.key
    }

    #[must_use]
    pub fn provider(&self) -> &Svc<dyn Provider> {
        &self.provider
    }

    #[must_use]
    pub fn scope(&self) -> ScopeRef {
        self.scope
    }

    /// Whether this binding was created by auto-binding rather than by an
    /// explicit call to `bind` or `multibind`.
    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }
}

/// A type which is constructed to provide an interface.
pub struct ClassTarget {
    provider: Svc<dyn Provider>,
    scope: Option<ScopeRef>,
}

impl ClassTarget {
    pub(crate) fn into_provider(self) -> Svc<dyn Provider> {
        self.provider
    }
}

/// What a capability is bound to.
///
/// [`Binder::bind`](crate::Binder::bind) and
/// [`Binder::multibind`](crate::Binder::multibind) turn targets into
/// providers in this order:
///
/// 1. [`Target::Provider`] is used as-is.
/// 2. [`Target::Value`] contributed to a multibinding becomes a constant
///    owned by the aggregator.
/// 3. [`Target::Callable`] invokes a service factory, injecting its
///    parameters.
/// 4. [`Target::Class`] constructs an [`Injectable`] type.
/// 5. [`Target::Value`] becomes a constant.
/// 6. [`Target::Default`] uses the capability's own implicit provider, if
///    it has one.
pub enum Target<R: Request> {
    /// Bind to the capability's implicit provider.
    Default,
    /// Bind to an existing provider.
    Provider(Svc<dyn Provider>),
    /// Bind to a fixed value.
    Value(R),
    /// Bind to a service factory.
    Callable(CallableProvider),
    /// Bind to an injectable type.
    Class(ClassTarget),
}

impl<R: Request> Target<R> {
    /// Targets a provider.
    pub fn provider<P: Provider>(provider: P) -> Self {
        Target::Provider(Svc::new(provider))
    }

    /// Targets a fixed value.
    pub fn value(value: R) -> Self {
        Target::Value(value)
    }

    /// Targets a service factory which returns the request type itself.
    /// This is how factories contribute to multibindings.
    pub fn factory<D, F>(factory: F) -> Self
    where
        D: 'static,
        F: ServiceFactory<D, Result = R>,
    {
        Target::Callable(CallableProvider::new(factory, identity::<R>))
    }

    /// The scope declared by the target itself.
    pub(crate) fn declared_scope(&self) -> Option<ScopeRef> {
        match self {
            Target::Class(class) => class.scope,
            Target::Default => R::declared_scope(),
            _ => None,
        }
    }
}

impl<R: Bindable> Target<R> {
    /// Targets a service factory whose result implements the interface.
    pub fn callable<D, F>(factory: F) -> Self
    where
        D: 'static,
        F: ServiceFactory<D>,
        R::Interface: InterfaceFor<F::Result>,
    {
        Target::Callable(CallableProvider::new(
            factory,
            into_interface::<R::Interface, F::Result, R>,
        ))
    }

    /// Targets an injectable type implementing the interface.
    #[must_use]
    pub fn class<T>() -> Self
    where
        T: Injectable,
        R::Interface: InterfaceFor<T>,
    {
        Target::Class(ClassTarget {
            provider: Svc::new(ClassProvider::<R::Interface, T>::new()),
            scope: T::scope(),
        })
    }

    /// Targets a fixed instance of a type implementing the interface.
    pub fn instance<S>(instance: S) -> Self
    where
        S: Service,
        R::Interface: InterfaceFor<S>,
    {
        Target::Value(into_interface::<R::Interface, S, R>(instance))
    }
}

fn identity<R>(value: R) -> R {
    value
}

fn into_interface<I, S, R>(service: S) -> R
where
    I: ?Sized + InterfaceFor<S>,
    S: Service,
    R: Bindable<Interface = I>,
{
    R::from_interface(I::from_svc(Svc::new(service)))
}
