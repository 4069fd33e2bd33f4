#![allow(clippy::used_underscore_binding)]

use crate::BindingKey;
use derive_more::Display;
use std::{
    any::{Any, TypeId},
    error::Error,
    sync::Arc,
};

/// A reference-counted pointer holding a service.
pub type Svc<T> = Arc<T>;

/// A reference-counted service pointer holding an instance of `dyn Any`.
pub type DynSvc = Arc<dyn Any + Send + Sync>;

/// A boxed error returned by constructors and service factories.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A result from attempting to inject dependencies into a service and
/// construct an instance of it.
pub type InjectResult<T> = Result<T, InjectError>;

/// Implemented automatically on types that are capable of being a service.
pub trait Service: Any + Send + Sync {}
impl<T: ?Sized + Any + Send + Sync> Service for T {}

/// Runtime identity of a type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ServiceInfo {
    id: TypeId,
    name: &'static str,
}

impl ServiceInfo {
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        ServiceInfo {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// An error that occurred while binding or resolving a capability.
#[derive(Debug, Display)]
#[non_exhaustive]
pub enum InjectError {
    /// The capability has no binding and none could be created for it, or
    /// a scope was used outside of the context in which it is valid.
    #[display(
        fmt = "unsatisfied requirement on {}{}",
        "key",
        "fmt_owner(owner)"
    )]
    UnsatisfiedRequirement {
        owner: Option<String>,
        key: BindingKey,
    },

    /// A constructor or factory was re-entered with the same set of
    /// dependencies left to resolve.
    #[display(fmt = "circular dependency detected: {}", "chain.join(\" -> \")")]
    CircularDependency { chain: Vec<String> },

    /// The target of a binding could not be turned into a provider.
    #[display(fmt = "couldn't determine provider for {} to {}", "key", "target")]
    UnknownProvider { key: BindingKey, target: String },

    /// The constructor or factory failed while being invoked.
    #[display(fmt = "call to {} failed: {}", "target", "source")]
    CallError {
        target: String,
        arguments: Vec<String>,
        stack: Vec<String>,
        source: BoxError,
    },

    /// The binding cannot be used the way it was requested.
    #[display(fmt = "invalid binding for {}: {}", "key", "reason")]
    InvalidBinding { key: BindingKey, reason: String },

    /// The registered provider returned a value of the wrong type.
    #[display(fmt = "the registered provider for {} returned the wrong type", "key")]
    InvalidProvider { key: BindingKey },

    /// An unexpected error has occurred. This is usually caused by a bug in
    /// the library itself.
    #[display(
        fmt = "an unexpected error occurred (please report this): {}",
        _0
    )]
    InternalError(String),
}

impl InjectError {
    /// Attributes an ownerless unsatisfied requirement to the callable whose
    /// dependencies were being resolved.
    pub(crate) fn with_owner(self, owner: impl FnOnce() -> String) -> Self {
        match self {
            InjectError::UnsatisfiedRequirement { owner: None, key } => {
                InjectError::UnsatisfiedRequirement {
                    owner: Some(owner()),
                    key,
                }
            }
            error => error,
        }
    }
}

impl Error for InjectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InjectError::CallError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

fn fmt_owner(owner: &Option<String>) -> String {
    owner
        .as_ref()
        .map(|owner| format!(" of {}", owner))
        .unwrap_or_default()
}
