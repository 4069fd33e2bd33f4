use crate::{
    Arguments, BindingKey, DynSvc, InjectError, InjectResult, Injectable,
    Injector, Interface, Provider, Request, Requirement, ScopeRef,
    ServiceInfo, Svc,
};
use std::marker::PhantomData;

/// Provides the injector performing a request.
pub struct InjectorProvider;

impl Provider for InjectorProvider {
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        Ok(Svc::new(injector.clone()) as DynSvc)
    }
}

/// Declares a request type which is always resolvable and which is
/// provided by constructing a handle around the requesting injector.
macro_rules! special_request {
    ($name:ident, $param:ident: $($bound:tt)+) => {
        impl<$param: $($bound)+> Request for $name<$param> {
            fn binding_key() -> BindingKey {
                BindingKey::Singular(ServiceInfo::of::<Self>())
            }

            fn implicit_provider() -> Option<Svc<dyn Provider>> {
                Some(Svc::new(HandleProvider::<Self>::new()))
            }

            fn declared_scope() -> Option<ScopeRef> {
                Some(ScopeRef::no_scope())
            }

            fn is_special() -> bool {
                true
            }
        }

        impl<$param: $($bound)+> Clone for $name<$param> {
            fn clone(&self) -> Self {
                $name {
                    injector: self.injector.clone(),
                    marker: PhantomData,
                }
            }
        }

        impl<$param: $($bound)+> Handle for $name<$param> {
            fn new(injector: Injector) -> Self {
                $name {
                    injector,
                    marker: PhantomData,
                }
            }
        }
    };
}

trait Handle: Request {
    fn new(injector: Injector) -> Self;
}

struct HandleProvider<H> {
    marker: PhantomData<fn() -> H>,
}

impl<H> HandleProvider<H> {
    fn new() -> Self {
        HandleProvider {
            marker: PhantomData,
        }
    }
}

impl<H: Handle> Provider for HandleProvider<H> {
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        Ok(Svc::new(H::new(injector.clone())) as DynSvc)
    }
}

/// Lazily resolves `R`. Each call to [`ProviderOf::get`] performs a new
/// request, so the bound scope decides whether the same value is returned.
///
/// ```
/// use binding_injector::{
///     Arguments, BoxError, Injectable, Injector, ProviderOf, Svc,
/// };
///
/// struct Connection;
/// impl Injectable for Connection {
///     fn construct(_arguments: &mut Arguments) -> Result<Self, BoxError> {
///         Ok(Connection)
///     }
/// }
///
/// let injector = Injector::new();
/// let connections: ProviderOf<Svc<Connection>> = injector.get().unwrap();
/// let first = connections.get().unwrap();
/// let second = connections.get().unwrap();
/// assert!(!Svc::ptr_eq(&first, &second));
/// ```
pub struct ProviderOf<R: Request> {
    injector: Injector,
    marker: PhantomData<fn() -> R>,
}

impl<R: Request> ProviderOf<R> {
    /// Resolves `R`.
    pub fn get(&self) -> InjectResult<R> {
        self.injector.get()
    }
}

special_request!(ProviderOf, R: Request);

/// Builds the implementation bound for `I`, with some of its constructor
/// arguments supplied by the caller. The binding must construct a type,
/// so it has to be auto-bound or bound to [`Target::class`](crate::Target::class).
///
/// Arguments supplied to [`AssistedBuilder::build`] take precedence over
/// injected ones, and the built value is never cached by any scope.
pub struct AssistedBuilder<I: ?Sized + Interface> {
    injector: Injector,
    marker: PhantomData<fn() -> Svc<I>>,
}

impl<I: ?Sized + Interface> AssistedBuilder<I> {
    /// Builds an instance using the given arguments.
    pub fn build(&self, arguments: Arguments) -> InjectResult<Svc<I>> {
        let requirement = Requirement::of::<Svc<I>>();
        let (binding, _) = self.injector.binder().lookup(&requirement)?;
        match binding.provider().build_with(&self.injector, arguments) {
            Some(value) => Svc::<I>::from_dyn(value?),
            None => Err(InjectError::InvalidBinding {
                key: binding.key(),
                reason: "assisted building requires a binding to a class"
                    .to_owned(),
            }),
        }
    }
}

special_request!(AssistedBuilder, I: ?Sized + Interface);

/// Builds the [`Injectable`] type `T` directly, with some of its
/// constructor arguments supplied by the caller. Unlike
/// [`AssistedBuilder`], bindings are not consulted.
pub struct ClassAssistedBuilder<T: Injectable> {
    injector: Injector,
    marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> ClassAssistedBuilder<T> {
    /// Builds an instance using the given arguments.
    pub fn build(&self, arguments: Arguments) -> InjectResult<T> {
        self.injector.create_object(arguments)
    }
}

special_request!(ClassAssistedBuilder, T: Injectable);
