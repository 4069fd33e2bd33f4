use crate::{
    Arguments, BoxError, ClassProvider, Dependencies, Provider, ScopeRef,
    Service, Svc,
};

/// A type which can be constructed by the injector. The constructor declares
/// the capabilities it needs through [`Injectable::dependencies`], and the
/// injector supplies a resolved value for each of them (unless the caller
/// already supplied one) through the [`Arguments`] passed to
/// [`Injectable::construct`].
///
/// ```
/// use binding_injector::{
///     Arguments, BoxError, Dependencies, Injectable, Injector, Svc,
/// };
///
/// #[derive(Default)]
/// struct Engine;
///
/// impl Injectable for Engine {
///     fn construct(_arguments: &mut Arguments) -> Result<Self, BoxError> {
///         Ok(Engine)
///     }
/// }
///
/// struct Car {
///     engine: Svc<Engine>,
/// }
///
/// impl Injectable for Car {
///     fn dependencies() -> Dependencies {
///         Dependencies::new().with::<Svc<Engine>>("engine")
///     }
///
///     fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
///         Ok(Car {
///             engine: arguments.take("engine")?,
///         })
///     }
/// }
///
/// let injector = Injector::new();
/// let car: Svc<Car> = injector.get().unwrap();
/// let _engine: &Engine = &car.engine;
/// ```
pub trait Injectable: Service + Sized {
    /// The capabilities needed by [`Injectable::construct`], by parameter
    /// name.
    fn dependencies() -> Dependencies {
        Dependencies::new()
    }

    /// Constructs an instance from its (injected or supplied) arguments.
    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError>;

    /// The scope this type is bound in when no scope is given explicitly.
    fn scope() -> Option<ScopeRef> {
        None
    }
}

/// Indicates that a type can be requested as a singular capability through
/// [`Svc<Self>`](crate::Svc). Each [`Injectable`] type is an interface for
/// itself. Traits must be declared as interfaces with the [`interface!`]
/// macro before use, and so must plain value types which are only ever bound
/// to instances.
pub trait Interface: Service {
    /// The provider used when this interface is bound without a target,
    /// including when it is auto-bound.
    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        None
    }

    /// The scope declared by the interface itself.
    fn declared_scope() -> Option<ScopeRef> {
        None
    }
}

impl<T: Injectable> Interface for T {
    fn implicit_provider() -> Option<Svc<dyn Provider>> {
        Some(Svc::new(ClassProvider::<T, T>::new()))
    }

    fn declared_scope() -> Option<ScopeRef> {
        T::scope()
    }
}

/// Indicates that an interface can be implemented by a service type `S`.
/// Each sized interface is implemented by itself, and each `dyn Trait`
/// declared with [`interface!`] is implemented by every service implementing
/// that trait.
pub trait InterfaceFor<S: Service>: Interface {
    /// Converts a service pointer to the implementation into a pointer to the
    /// interface.
    fn from_svc(service: Svc<S>) -> Svc<Self>;
}

impl<T: Interface> InterfaceFor<T> for T {
    fn from_svc(service: Svc<T>) -> Svc<Self> {
        service
    }
}

/// Declares interfaces which can be requested as singular capabilities.
///
/// Trait objects are declared with `dyn`, and any service implementing the
/// trait can then be bound to it. Plain types are declared by name and can
/// then be bound to instances of themselves.
///
/// # Example
/// ```
/// use binding_injector::{interface, Injector, Svc, Target};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// struct Name(&'static str);
///
/// interface!(dyn Greeter);
/// interface!(Name);
///
/// let injector = Injector::new();
/// injector
///     .binder()
///     .bind::<Svc<dyn Greeter>>(Target::instance(English), None)
///     .unwrap();
/// injector
///     .binder()
///     .bind::<Svc<Name>>(Target::value(Svc::new(Name("world"))), None)
///     .unwrap();
///
/// let greeter: Svc<dyn Greeter> = injector.get().unwrap();
/// let name: Svc<Name> = injector.get().unwrap();
/// assert_eq!("hello world", format!("{} {}", greeter.greet(), name.0));
/// ```
#[macro_export]
macro_rules! interface {
    ($(dyn $trait:path),+ $(,)?) => {
        $(
            impl $crate::Interface for dyn $trait {}

            impl<S> $crate::InterfaceFor<S> for dyn $trait
            where
                S: $trait + $crate::Service,
            {
                fn from_svc(service: $crate::Svc<S>) -> $crate::Svc<Self> {
                    service
                }
            }
        )+
    };
    ($($value:ty),+ $(,)?) => {
        $(
            impl $crate::Interface for $value {}
        )+
    };
}

interface!(String, bool, i32, i64, u16, u32, u64, usize, f32, f64);
