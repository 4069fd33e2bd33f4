use crate::{
    AsAny, Arguments, Contributions, DynSvc, InjectResult, Injector, Request,
    Svc,
};

/// The variant of a provider, as reported by [`Provider::kind`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ProviderKind {
    /// Always provides the same instance.
    Constant,
    /// Invokes a service factory through the injection call path.
    Callable,
    /// Constructs an [`Injectable`](crate::Injectable) type.
    Class,
    /// Concatenates list contributions.
    List,
    /// Merges map contributions.
    Map,
    /// Any other provider.
    Custom,
}

/// Weakly typed service provider. Given an injector, this will provide a
/// value for a capability. This is automatically implemented for all types
/// that implement [`TypedProvider`], and [`TypedProvider`] should be
/// preferred if possible to allow for stronger type checking.
///
/// The value inside the returned [`DynSvc`] is always the request type the
/// provider is bound for (for example a `Svc<dyn Trait>` or a
/// `Vec<Svc<T>>`). Providers must not modify the injector and may be invoked
/// concurrently.
pub trait Provider: AsAny {
    /// Provides a value.
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc>;

    /// The variant of this provider.
    fn kind(&self) -> ProviderKind {
        ProviderKind::Custom
    }

    /// Provides a value using some explicitly supplied constructor
    /// arguments. Only providers which construct a type support this.
    fn build_with(
        &self,
        _injector: &Injector,
        _arguments: Arguments,
    ) -> Option<InjectResult<DynSvc>> {
        None
    }

    /// The contributions owned by an aggregating provider.
    fn contributions(&self) -> Option<&Contributions> {
        None
    }
}

impl<T> Provider for T
where
    T: TypedProvider,
{
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        let result = self.provide_typed(injector)?;
        Ok(Svc::new(result) as DynSvc)
    }
}

/// A strongly-typed service provider. Types which implement this provide
/// values of a request type when asked. [`Provider`] is automatically
/// implemented for all types which implement `TypedProvider`.
///
/// # Example
///
/// ```
/// use binding_injector::{
///     interface, InjectResult, Injector, Svc, Target, TypedProvider,
/// };
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// struct Ticket(u32);
/// interface!(Ticket);
///
/// #[derive(Default)]
/// struct TicketProvider(AtomicU32);
/// impl TypedProvider for TicketProvider {
///     type Result = Svc<Ticket>;
///
///     fn provide_typed(&self, _injector: &Injector) -> InjectResult<Svc<Ticket>> {
///         Ok(Svc::new(Ticket(self.0.fetch_add(1, Ordering::Relaxed))))
///     }
/// }
///
/// let injector = Injector::new();
/// injector
///     .binder()
///     .bind::<Svc<Ticket>>(Target::provider(TicketProvider::default()), None)
///     .unwrap();
///
/// let first: Svc<Ticket> = injector.get().unwrap();
/// let second: Svc<Ticket> = injector.get().unwrap();
/// assert_eq!((0, 1), (first.0, second.0));
/// ```
pub trait TypedProvider: AsAny {
    /// The request type this provider can satisfy.
    type Result: Request;

    /// Provides a value. The `Injector` passed in can be used to retrieve
    /// instances of any dependencies.
    fn provide_typed(&self, injector: &Injector) -> InjectResult<Self::Result>;
}
