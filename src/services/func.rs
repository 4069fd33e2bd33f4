use crate::{Arguments, BoxError, Dependencies, Request, Service};

/// Names given to the positional parameters of service factories.
pub(crate) const ARG_NAMES: [&str; 12] = [
    "arg0", "arg1", "arg2", "arg3", "arg4", "arg5", "arg6", "arg7", "arg8",
    "arg9", "arg10", "arg11",
];

/// A factory for creating instances of a service. All functions of arity 12 or
/// less are automatically service factories if the arguments to that function
/// are valid requests and the return value is a valid service type.
///
/// Parameters are named positionally (`arg0`, `arg1`, ...), which is how they
/// can be supplied explicitly through [`Arguments`].
///
/// ```
/// use binding_injector::{Arguments, Injector, ServiceFactory, Svc};
///
/// fn double(value: Svc<i32>) -> i64 {
///     i64::from(*value) * 2
/// }
///
/// assert_eq!(1, double.dependencies().len());
///
/// let injector = Injector::new();
/// let result = injector
///     .call_with_injection(&double, Arguments::new().with("arg0", Svc::new(21i32)))
///     .unwrap();
/// assert_eq!(42, result);
/// ```
///
/// # Type parameters
/// * `D` - Dependencies of this service as a tuple.
pub trait ServiceFactory<D>: Service {
    /// The resulting service from invoking this service factory.
    type Result: Service;

    /// The requests this factory needs, by parameter name.
    fn dependencies(&self) -> Dependencies;

    /// Invokes this service factory with a complete set of arguments.
    fn invoke(&self, arguments: &mut Arguments) -> Result<Self::Result, BoxError>;
}

macro_rules! impl_provider_function {
    () => {
        impl_provider_function!(@impl ());
    };
    ($first:ident $(, $rest:ident)*) => {
        impl_provider_function!(@impl ($first $(, $rest)*));
        impl_provider_function!($($rest),*);
    };
    (@impl ($($type_name:ident),*)) => {
        impl <F, R $(, $type_name)*> ServiceFactory<($($type_name,)*)> for F
        where
            F: Service + Fn($($type_name),*) -> R,
            R: Service,
            $($type_name: Request,)*
        {
            type Result = R;

            #[allow(unused_variables, unused_mut, unused_assignments)]
            fn dependencies(&self) -> Dependencies {
                let mut dependencies = Dependencies::new();
                let mut index = 0;
                $(
                    dependencies = dependencies.with::<$type_name>(ARG_NAMES[index]);
                    index += 1;
                )*
                dependencies
            }

            #[allow(unused_variables, unused_mut, unused_assignments)]
            fn invoke(&self, arguments: &mut Arguments) -> Result<R, BoxError> {
                let mut index = 0;
                let result = self($(
                    {
                        let name = ARG_NAMES[index];
                        index += 1;
                        arguments.take::<$type_name>(name)?
                    }
                ),*);
                Ok(result)
            }
        }
    };
}

impl_provider_function!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
