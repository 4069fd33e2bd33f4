use crate::{DynSvc, InjectResult, Injector, Provider, ProviderKind, Request, Svc};

/// A provider which returns a constant, predetermined value. Singleton and
/// thread-local scopes cache the values they produce in providers of this
/// kind.
pub struct ConstantProvider {
    value: DynSvc,
}

impl ConstantProvider {
    /// Creates a new `ConstantProvider` using a predetermined value.
    #[must_use]
    pub fn new<R: Request>(value: R) -> Self {
        ConstantProvider {
            value: Svc::new(value),
        }
    }

    /// Creates a new `ConstantProvider` from a value that has already been
    /// provided.
    #[must_use]
    pub fn from_dyn(value: DynSvc) -> Self {
        ConstantProvider { value }
    }
}

impl Provider for ConstantProvider {
    fn get(&self, _injector: &Injector) -> InjectResult<DynSvc> {
        Ok(self.value.clone())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Constant
    }
}

/// Create a provider from a constant value. While the value itself will
/// never be exposed through a mutable reference, if it supports interior
/// mutability, its fields still can be mutated.
///
/// # Example
///
/// ```
/// use binding_injector::{constant, Injector, Svc, Target};
///
/// let injector = Injector::new();
/// injector
///     .binder()
///     .bind::<Svc<i32>>(Target::provider(constant(Svc::new(8i32))), None)
///     .unwrap();
///
/// let value: Svc<i32> = injector.get().unwrap();
/// assert_eq!(8, *value);
/// ```
#[must_use]
pub fn constant<R: Request>(value: R) -> ConstantProvider {
    ConstantProvider::new(value)
}
