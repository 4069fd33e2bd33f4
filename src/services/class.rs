use crate::{
    Arguments, DynSvc, InjectResult, Injectable, Injector, InterfaceFor,
    Provider, ProviderKind, Svc,
};
use std::marker::PhantomData;

/// A provider which constructs an [`Injectable`] type `T` through
/// [`Injector::create_object`] and exposes it as the interface `I`.
pub struct ClassProvider<I: ?Sized, T> {
    marker: PhantomData<fn() -> (Svc<I>, T)>,
}

impl<I: ?Sized, T> ClassProvider<I, T> {
    /// Creates a new [`ClassProvider`].
    #[must_use]
    pub fn new() -> Self {
        ClassProvider {
            marker: PhantomData,
        }
    }
}

impl<I: ?Sized, T> Default for ClassProvider<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T> ClassProvider<I, T>
where
    I: ?Sized + InterfaceFor<T>,
    T: Injectable,
{
    fn construct(
        injector: &Injector,
        arguments: Arguments,
    ) -> InjectResult<DynSvc> {
        let object = injector.create_object::<T>(arguments)?;
        Ok(Svc::new(I::from_svc(Svc::new(object))) as DynSvc)
    }
}

impl<I, T> Provider for ClassProvider<I, T>
where
    I: ?Sized + InterfaceFor<T>,
    T: Injectable,
{
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        Self::construct(injector, Arguments::new())
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Class
    }

    fn build_with(
        &self,
        injector: &Injector,
        arguments: Arguments,
    ) -> Option<InjectResult<DynSvc>> {
        Some(Self::construct(injector, arguments))
    }
}
