use crate::{
    Arguments, DynSvc, InjectResult, Injector, Provider, ProviderKind,
    Request, ServiceFactory, Svc,
};
use std::any::type_name;

type Invoke = dyn Fn(&Injector) -> InjectResult<DynSvc> + Send + Sync;

/// A provider which invokes a service factory each time it is asked for a
/// value. The factory's own parameters are resolved through
/// [`Injector::call_with_injection`], so they are injected transitively.
pub struct CallableProvider {
    target: &'static str,
    invoke: Box<Invoke>,
}

impl CallableProvider {
    /// Creates a new [`CallableProvider`] from a service factory and a
    /// conversion from the factory's result to the request type the
    /// provider is bound for.
    #[must_use]
    pub fn new<D, F, R>(factory: F, convert: fn(F::Result) -> R) -> Self
    where
        D: 'static,
        F: ServiceFactory<D>,
        R: Request,
    {
        CallableProvider {
            target: type_name::<F>(),
            invoke: Box::new(move |injector| {
                let result =
                    injector.call_with_injection(&factory, Arguments::new())?;
                Ok(Svc::new(convert(result)) as DynSvc)
            }),
        }
    }

    /// The name of the wrapped factory.
    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl Provider for CallableProvider {
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        (self.invoke)(injector)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Callable
    }
}
