use crate::{Request, ServiceInfo};
use std::fmt::{Display, Formatter};

/// The canonical identity of a requestable capability.
///
/// Keys are derived from request types, so type aliases collapse onto the
/// type they alias while newtypes keep their own identity. List and map
/// multibindings of an interface are distinct from the singular binding of
/// that same interface.
///
/// ```
/// use binding_injector::{interface, BindingKey, ServiceInfo, Svc};
/// use std::collections::HashMap;
///
/// struct Engine;
/// interface!(Engine);
/// type Motor = Engine;
///
/// assert_eq!(BindingKey::of::<Svc<Engine>>(), BindingKey::of::<Svc<Motor>>());
/// assert_eq!(
///     BindingKey::Singular(ServiceInfo::of::<Engine>()),
///     BindingKey::of::<Svc<Engine>>(),
/// );
/// assert_ne!(BindingKey::of::<Svc<Engine>>(), BindingKey::of::<Vec<Svc<Engine>>>());
/// assert_ne!(
///     BindingKey::of::<Vec<Svc<Engine>>>(),
///     BindingKey::of::<HashMap<String, Svc<Engine>>>(),
/// );
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BindingKey {
    /// A single implementation of an interface.
    Singular(ServiceInfo),
    /// An ordered list aggregated from multibind contributions.
    List(ServiceInfo),
    /// A string-keyed map aggregated from multibind contributions.
    Map(ServiceInfo),
}

impl BindingKey {
    /// Normalizes a request type to its key.
    #[must_use]
    pub fn of<R: Request>() -> Self {
        R::binding_key()
    }

    /// The interface (or element type, for multibindings) of this key.
    #[must_use]
    pub fn info(&self) -> ServiceInfo {
        match *self {
            BindingKey::Singular(info)
            | BindingKey::List(info)
            | BindingKey::Map(info) => info,
        }
    }

    /// Whether this key can only be bound through multibinding.
    #[must_use]
    pub fn is_multibinding(&self) -> bool {
        !matches!(self, BindingKey::Singular(_))
    }
}

impl Display for BindingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingKey::Singular(info) => write!(f, "{}", info.name()),
            BindingKey::List(info) => write!(f, "Vec<{}>", info.name()),
            BindingKey::Map(info) => {
                write!(f, "HashMap<String, {}>", info.name())
            }
        }
    }
}
