use crate::{Arguments, BoxError, Dependencies, Service, ServiceFactory};
use std::{error::Error, marker::PhantomData};

/// A service factory that may fail during service creation with a custom error
/// type. When it fails, the injector reports an
/// [`InjectError::CallError`](crate::InjectError::CallError) carrying the
/// error as its source.
pub struct FallibleServiceFactory<D, R, E, F>
where
    D: 'static,
    R: Service,
    E: Error + Service,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    inner: F,
    marker: PhantomData<fn(D) -> Result<R, E>>,
}

impl<D, R, E, F> ServiceFactory<D> for FallibleServiceFactory<D, R, E, F>
where
    D: 'static,
    R: Service,
    E: Error + Service,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    type Result = R;

    fn dependencies(&self) -> Dependencies {
        self.inner.dependencies()
    }

    fn invoke(&self, arguments: &mut Arguments) -> Result<R, BoxError> {
        let result = self.inner.invoke(arguments)?;
        result.map_err(|error| Box::new(error) as BoxError)
    }
}

/// Defines a conversion into a fallible service factory. This trait is
/// automatically implemented for all service factories that return a
/// [`Result<T, E>`] with an error type that implements [`Error`] +
/// [`Service`].
pub trait IntoFallible<D, R, E, F>
where
    D: 'static,
    R: Service,
    E: Error + Service,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    /// # Example
    ///
    /// ```
    /// use binding_injector::{
    ///     interface, InjectError, Injector, IntoFallible, Svc, Target,
    /// };
    /// use std::{
    ///     error::Error,
    ///     fmt::{Display, Formatter},
    /// };
    ///
    /// #[derive(Debug)]
    /// struct FooError;
    ///
    /// impl Error for FooError {}
    /// impl Display for FooError {
    ///     fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    ///         write!(f, "An error occurred while creating a Foo")
    ///     }
    /// }
    ///
    /// struct Foo;
    /// interface!(Foo);
    ///
    /// fn make_foo() -> Result<Foo, FooError> {
    ///     Err(FooError)
    /// }
    ///
    /// let injector = Injector::new();
    /// injector
    ///     .binder()
    ///     .bind::<Svc<Foo>>(Target::callable(make_foo.fallible()), None)
    ///     .unwrap();
    ///
    /// match injector.get::<Svc<Foo>>() {
    ///     Err(InjectError::CallError { .. }) => {},
    ///     Err(error) => Err(error).unwrap(),
    ///     _ => unreachable!("activation should have failed"),
    /// }
    /// ```
    #[must_use]
    fn fallible(self) -> FallibleServiceFactory<D, R, E, F>;
}

impl<D, R, E, F> IntoFallible<D, R, E, F> for F
where
    D: 'static,
    R: Service,
    E: Error + Service,
    F: ServiceFactory<D, Result = Result<R, E>>,
{
    fn fallible(self) -> FallibleServiceFactory<D, R, E, F> {
        FallibleServiceFactory {
            inner: self,
            marker: PhantomData,
        }
    }
}
