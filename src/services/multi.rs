use crate::{
    DynSvc, InjectResult, Injector, Interface, Provider, ProviderKind, Request,
    Svc,
};
use parking_lot::RwLock;
use std::{collections::HashMap, marker::PhantomData};

/// The ordered providers contributed to a multibinding. Each call to
/// [`Binder::multibind`](crate::Binder::multibind) appends one contribution.
#[derive(Default)]
pub struct Contributions {
    providers: RwLock<Vec<Svc<dyn Provider>>>,
}

impl Contributions {
    /// Appends a contribution.
    pub fn push(&self, provider: Svc<dyn Provider>) {
        self.providers.write().push(provider);
    }

    /// The number of contributions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Whether nothing has been contributed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes a copy of the current contributions so that they can be invoked
    /// without holding the lock.
    fn snapshot(&self) -> Vec<Svc<dyn Provider>> {
        self.providers.read().clone()
    }
}

/// Aggregates contributions of `Vec<Svc<I>>` by concatenating them in the
/// order they were contributed.
pub struct ListProvider<I: ?Sized> {
    contributions: Contributions,
    marker: PhantomData<fn() -> Svc<I>>,
}

impl<I: ?Sized> ListProvider<I> {
    /// Creates an empty [`ListProvider`].
    #[must_use]
    pub fn new() -> Self {
        ListProvider {
            contributions: Contributions::default(),
            marker: PhantomData,
        }
    }
}

impl<I: ?Sized> Default for ListProvider<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized + Interface> Provider for ListProvider<I> {
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        let mut items: Vec<Svc<I>> = Vec::new();
        for contribution in self.contributions.snapshot() {
            let value = contribution.get(injector)?;
            items.extend(Vec::<Svc<I>>::from_dyn(value)?);
        }

        Ok(Svc::new(items) as DynSvc)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::List
    }

    fn contributions(&self) -> Option<&Contributions> {
        Some(&self.contributions)
    }
}

/// Aggregates contributions of `HashMap<String, Svc<I>>` by merging them in
/// the order they were contributed. Later contributions overwrite earlier
/// entries with the same key.
pub struct MapProvider<I: ?Sized> {
    contributions: Contributions,
    marker: PhantomData<fn() -> Svc<I>>,
}

impl<I: ?Sized> MapProvider<I> {
    /// Creates an empty [`MapProvider`].
    #[must_use]
    pub fn new() -> Self {
        MapProvider {
            contributions: Contributions::default(),
            marker: PhantomData,
        }
    }
}

impl<I: ?Sized> Default for MapProvider<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized + Interface> Provider for MapProvider<I> {
    fn get(&self, injector: &Injector) -> InjectResult<DynSvc> {
        let mut entries: HashMap<String, Svc<I>> = HashMap::new();
        for contribution in self.contributions.snapshot() {
            let value = contribution.get(injector)?;
            entries.extend(HashMap::<String, Svc<I>>::from_dyn(value)?);
        }

        Ok(Svc::new(entries) as DynSvc)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Map
    }

    fn contributions(&self) -> Option<&Contributions> {
        Some(&self.contributions)
    }
}
