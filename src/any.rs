use crate::{DynSvc, Svc};
use std::any::Any;

/// Defines a conversion for a type into a [`dyn Any`](Any) trait object.
/// Providers and scopes require this so that type-erased instances can be
/// downcast back to their concrete types.
pub trait AsAny: Any + Send + Sync {
    /// Converts this reference into a trait object reference.
    fn as_any(&self) -> &dyn Any;

    /// Converts this service pointer into a type-erased service pointer.
    fn into_any_svc(self: Svc<Self>) -> DynSvc;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_svc(self: Svc<Self>) -> DynSvc {
        self
    }
}
