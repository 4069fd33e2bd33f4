use crate::{BindingKey, Provider, Request, ScopeRef, Svc};

/// A type-erased description of a request: its key, and how to bind it
/// implicitly when auto-binding.
#[derive(Clone, Copy, Debug)]
pub struct Requirement {
    key: BindingKey,
    implicit: fn() -> Option<Svc<dyn Provider>>,
    scope: fn() -> Option<ScopeRef>,
    special: bool,
}

impl Requirement {
    /// Describes the request `R`.
    #[must_use]
    pub fn of<R: Request>() -> Self {
        Requirement {
            key: R::binding_key(),
            implicit: R::implicit_provider,
            scope: R::declared_scope,
            special: R::is_special(),
        }
    }

    #[must_use]
    pub fn key(&self) -> BindingKey {
        self.key
    }

    /// Whether the request is resolvable even with auto-binding disabled.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.special
    }

    pub(crate) fn implicit_provider(&self) -> Option<Svc<dyn Provider>> {
        (self.implicit)()
    }

    pub(crate) fn declared_scope(&self) -> Option<ScopeRef> {
        (self.scope)()
    }
}

/// A single named dependency of a constructor or factory.
#[derive(Clone, Copy, Debug)]
pub struct Dependency {
    name: &'static str,
    requirement: Requirement,
}

impl Dependency {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }
}

/// The manifest of a constructor or factory: each parameter it needs, by
/// name, along with the request that satisfies it.
///
/// ```
/// use binding_injector::{interface, BindingKey, Dependencies, Svc};
///
/// struct Engine;
/// interface!(Engine);
///
/// let dependencies = Dependencies::new()
///     .with::<Svc<Engine>>("engine")
///     .with::<Vec<Svc<Engine>>>("spares");
///
/// let names: Vec<_> = dependencies.iter().map(|dependency| dependency.name()).collect();
/// assert_eq!(vec!["engine", "spares"], names);
/// assert_eq!(
///     BindingKey::of::<Vec<Svc<Engine>>>(),
///     dependencies.iter().nth(1).unwrap().requirement().key(),
/// );
/// ```
#[derive(Clone, Default, Debug)]
pub struct Dependencies {
    entries: Vec<Dependency>,
}

impl Dependencies {
    #[must_use]
    pub fn new() -> Self {
        Dependencies::default()
    }

    /// Adds a parameter named `name` which is satisfied by the request `R`.
    /// Adding a name twice replaces the earlier entry.
    #[must_use]
    pub fn with<R: Request>(mut self, name: &'static str) -> Self {
        self.entries.retain(|entry| entry.name != name);
        self.entries.push(Dependency {
            name,
            requirement: Requirement::of::<R>(),
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
