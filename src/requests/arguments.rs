use crate::{DynSvc, Service, Svc};
use derive_more::{Display, Error};
use std::{any::type_name, collections::HashMap};

/// An error taking an argument out of [`Arguments`].
#[derive(Debug, Display, Error)]
pub enum ArgumentError {
    /// No argument with the given name was supplied or injected.
    #[display(fmt = "missing argument '{}'", "name")]
    Missing { name: &'static str },

    /// The argument has a different type than requested.
    #[display(fmt = "argument '{}' is not a {}", "name", "expected")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },
}

/// A named, type-erased set of arguments for a constructor or factory.
///
/// Arguments supplied by a caller are merged with injected ones before the
/// constructor runs, and supplied values always win.
///
/// ```
/// use binding_injector::{ArgumentError, Arguments, Svc};
///
/// let mut arguments = Arguments::new()
///     .with("retries", 3u32)
///     .with("name", Svc::new(String::from("primary")));
///
/// assert_eq!(3, arguments.take::<u32>("retries").unwrap());
/// assert!(matches!(
///     arguments.take::<u32>("retries"),
///     Err(ArgumentError::Missing { name: "retries" })
/// ));
/// assert!(matches!(
///     arguments.take::<String>("name"),
///     Err(ArgumentError::WrongType { .. })
/// ));
/// ```
#[derive(Clone, Default)]
pub struct Arguments {
    values: HashMap<&'static str, DynSvc>,
}

impl Arguments {
    #[must_use]
    pub fn new() -> Self {
        Arguments::default()
    }

    /// Adds an argument, replacing any argument with the same name.
    #[must_use]
    pub fn with<T: Service>(mut self, name: &'static str, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds an argument, replacing any argument with the same name.
    pub fn insert<T: Service>(&mut self, name: &'static str, value: T) {
        self.values.insert(name, Svc::new(value));
    }

    pub(crate) fn insert_dyn(&mut self, name: &'static str, value: DynSvc) {
        self.values.insert(name, value);
    }

    /// Removes an argument and returns it as a `T`.
    pub fn take<T: Clone + Service>(
        &mut self,
        name: &'static str,
    ) -> Result<T, ArgumentError> {
        let value = self
            .values
            .remove(name)
            .ok_or(ArgumentError::Missing { name })?;
        value
            .downcast::<T>()
            .map(|value| (*value).clone())
            .map_err(|_| ArgumentError::WrongType {
                name,
                expected: type_name::<T>(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The names of all arguments, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.values.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Moves every argument of `other` into this set, replacing arguments
    /// with the same name.
    pub(crate) fn extend(&mut self, other: Arguments) {
        self.values.extend(other.values);
    }
}
