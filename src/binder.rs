use crate::{
    Bindable, Binding, BindingKey, ConstantProvider, DynSvc, InjectError,
    InjectResult, Injector, InjectorInner, Module, MultiBindable, Provider,
    Request, Requirement, Scope, ScopeRef, ServiceInfo, Svc, Target,
};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Weak};

struct BinderInner {
    injector: Weak<InjectorInner>,
    parent: Option<Binder>,
    auto_bind: bool,
    default_scope: ScopeRef,
    bindings: RwLock<HashMap<BindingKey, Binding>>,
    scopes: RwLock<HashMap<ServiceInfo, fn() -> Svc<dyn Scope>>>,
}

/// The binding table of an injector.
///
/// Lookups fall back to the parent binder, and when nothing is bound
/// anywhere the binder can synthesize an implicit binding for a capability
/// which knows how to provide itself. Bindings are never removed.
///
/// Cloning a binder does not copy its bindings. Both binders refer to the
/// same table.
#[derive(Clone)]
pub struct Binder {
    inner: Svc<BinderInner>,
}

impl Binder {
    pub(crate) fn new(
        injector: Weak<InjectorInner>,
        parent: Option<Binder>,
        auto_bind: bool,
        default_scope: ScopeRef,
    ) -> Self {
        Binder {
            inner: Svc::new(BinderInner {
                injector,
                parent,
                auto_bind,
                default_scope,
                bindings: RwLock::new(HashMap::new()),
                scopes: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Binds a singular capability, replacing any earlier binding of it in
    /// this binder.
    ///
    /// When no scope is given, the scope declared by the target (or, for
    /// [`Target::Default`], by the capability) is used, and otherwise the
    /// binder's default scope.
    ///
    /// ```
    /// use binding_injector::{interface, Injector, Svc, Target};
    ///
    /// trait Storage: Send + Sync {
    ///     fn name(&self) -> &'static str;
    /// }
    /// interface!(dyn Storage);
    ///
    /// struct Disk;
    /// impl Storage for Disk {
    ///     fn name(&self) -> &'static str {
    ///         "disk"
    ///     }
    /// }
    ///
    /// struct Memory;
    /// impl Storage for Memory {
    ///     fn name(&self) -> &'static str {
    ///         "memory"
    ///     }
    /// }
    ///
    /// let injector = Injector::new();
    /// let binder = injector.binder();
    /// binder.bind::<Svc<dyn Storage>>(Target::instance(Disk), None).unwrap();
    /// binder.bind::<Svc<dyn Storage>>(Target::instance(Memory), None).unwrap();
    ///
    /// let storage: Svc<dyn Storage> = injector.get().unwrap();
    /// assert_eq!("memory", storage.name());
    /// ```
    pub fn bind<R: Bindable>(
        &self,
        to: Target<R>,
        scope: Option<ScopeRef>,
    ) -> InjectResult<()> {
        let key = R::binding_key();
        if key.is_multibinding() {
            return Err(InjectError::InvalidBinding {
                key,
                reason: "use multibind for list and map bindings".to_owned(),
            });
        }

        let scope = scope
            .or_else(|| to.declared_scope())
            .unwrap_or(self.inner.default_scope);
        let provider = self.provider_for(to, false)?;
        debug!(%key, scope = scope.info().name(), "binding");
        self.inner
            .bindings
            .write()
            .insert(key, Binding::new(key, provider, scope, false));
        Ok(())
    }

    /// Contributes to a list or map multibinding. The first contribution
    /// creates the aggregating binding, in the given scope, and every later
    /// contribution is appended to it.
    ///
    /// ```
    /// use binding_injector::{Injector, Svc, Target};
    /// use std::collections::HashMap;
    ///
    /// let injector = Injector::new();
    /// let binder = injector.binder();
    /// binder
    ///     .multibind::<Vec<Svc<String>>>(Target::value(vec![Svc::new("a".to_owned())]), None)
    ///     .unwrap();
    /// binder
    ///     .multibind::<Vec<Svc<String>>>(Target::factory(|| vec![Svc::new("b".to_owned())]), None)
    ///     .unwrap();
    ///
    /// let names: Vec<Svc<String>> = injector.get().unwrap();
    /// assert_eq!(vec!["a", "b"], names.iter().map(|name| name.as_str()).collect::<Vec<_>>());
    ///
    /// let first = HashMap::from([("port".to_owned(), Svc::new(80u16))]);
    /// let second = HashMap::from([("port".to_owned(), Svc::new(8080u16))]);
    /// binder.multibind::<HashMap<String, Svc<u16>>>(Target::value(first), None).unwrap();
    /// binder.multibind::<HashMap<String, Svc<u16>>>(Target::value(second), None).unwrap();
    ///
    /// let ports: HashMap<String, Svc<u16>> = injector.get().unwrap();
    /// assert_eq!(8080, *ports["port"]);
    /// ```
    pub fn multibind<R: MultiBindable>(
        &self,
        to: Target<R>,
        scope: Option<ScopeRef>,
    ) -> InjectResult<()> {
        let key = R::binding_key();
        let contribution = self.provider_for(to, true)?;

        let aggregator = {
            let mut bindings = self.inner.bindings.write();
            let existing = bindings.get(&key).cloned();
            match existing {
                Some(binding)
                    if binding.provider().contributions().is_some() =>
                {
                    if binding.is_implicit() {
                        let scope = scope.unwrap_or(binding.scope());
                        bindings.insert(
                            key,
                            Binding::new(
                                key,
                                binding.provider().clone(),
                                scope,
                                false,
                            ),
                        );
                    }
                    binding.provider().clone()
                }
                _ => {
                    let aggregator = R::aggregator();
                    let scope = scope.unwrap_or(self.inner.default_scope);
                    bindings.insert(
                        key,
                        Binding::new(key, aggregator.clone(), scope, false),
                    );
                    aggregator
                }
            }
        };

        let contributions = aggregator.contributions().ok_or_else(|| {
            InjectError::InternalError(format!(
                "the binding for {} is not an aggregator",
                key
            ))
        })?;
        contributions.push(contribution);
        debug!(%key, contributions = contributions.len(), "contributed to multibinding");
        Ok(())
    }

    /// Runs a configuration unit against this binder.
    pub fn install<M: Module>(&self, module: M) -> InjectResult<()> {
        module.configure(self)
    }

    /// Registers the scope `S` in this binder and its descendants. Scopes
    /// which are not built in must be registered before they are used.
    ///
    /// Each injector gets its own instance of the scope. A child injector
    /// creates a fresh instance the first time it uses the scope rather than
    /// sharing its parent's.
    pub fn bind_scope<S: Scope + Default>(&self) {
        self.inner.scopes.write().insert(
            ScopeRef::of::<S>().info(),
            create_scope::<S> as fn() -> Svc<dyn Scope>,
        );
        self.bind_scope_instance(Svc::new(S::default()));
    }

    /// Registers an instance of the scope `S` for this binder only. Child
    /// injectors can only use the scope if it was registered with
    /// [`Binder::bind_scope`] or registered in them as well.
    pub fn bind_scope_instance<S: Scope>(&self, scope: Svc<S>) {
        let scope_ref = ScopeRef::of::<S>();
        let key = scope_ref.key();
        let scope: Svc<dyn Scope> = scope;
        let provider = ConstantProvider::from_dyn(Svc::new(scope) as DynSvc);
        debug!(scope = scope_ref.info().name(), "registering scope");
        self.inner.bindings.write().insert(
            key,
            Binding::new(
                key,
                Svc::new(provider),
                ScopeRef::no_scope(),
                false,
            ),
        );
    }

    /// Finds the binding for a request, along with the binder which holds
    /// it. Parent binders are searched when this binder has no binding. If
    /// none of them do, an implicit binding is created in this binder when
    /// auto-binding is enabled or the request is always resolvable.
    pub fn lookup(
        &self,
        requirement: &Requirement,
    ) -> InjectResult<(Binding, Binder)> {
        let key = requirement.key();
        if let Some(found) = self.find(&key) {
            return Ok(found);
        }

        let unsatisfied = || InjectError::UnsatisfiedRequirement {
            owner: None,
            key,
        };
        if !self.inner.auto_bind && !requirement.is_special() {
            return Err(unsatisfied());
        }

        let provider = requirement.implicit_provider().ok_or_else(unsatisfied)?;
        let scope = requirement
            .declared_scope()
            .unwrap_or(self.inner.default_scope);
        let binding = self
            .inner
            .bindings
            .write()
            .entry(key)
            .or_insert_with(|| Binding::new(key, provider, scope, true))
            .clone();
        trace!(%key, scope = scope.info().name(), "auto-bound");
        Ok((binding, self.clone()))
    }

    /// The instance of a scope owned by this binder. Only this binder's own
    /// instances are used. A missing scope is created here if it is built in
    /// or if this binder or an ancestor registered its type.
    pub(crate) fn scope_instance(
        &self,
        scope: ScopeRef,
    ) -> InjectResult<Svc<dyn Scope>> {
        let key = scope.key();
        let local = self
            .inner
            .bindings
            .read()
            .get(&key)
            .map(|binding| binding.provider().clone());
        let provider = match local {
            Some(provider) => provider,
            None => {
                let instance = scope
                    .create()
                    .or_else(|| {
                        self.scope_constructor(scope.info()).map(|create| create())
                    })
                    .ok_or(InjectError::UnsatisfiedRequirement {
                        owner: None,
                        key,
                    })?;
                trace!(scope = scope.info().name(), "creating scope instance");
                let provider: Svc<dyn Provider> = Svc::new(
                    ConstantProvider::from_dyn(Svc::new(instance) as DynSvc),
                );
                self.inner
                    .bindings
                    .write()
                    .entry(key)
                    .or_insert_with(|| {
                        Binding::new(key, provider, ScopeRef::no_scope(), true)
                    })
                    .provider()
                    .clone()
            }
        };

        let value = provider.get(&self.injector()?)?;
        value
            .downcast::<Svc<dyn Scope>>()
            .map(|scope| (*scope).clone())
            .map_err(|_| InjectError::InvalidProvider { key })
    }

    fn scope_constructor(
        &self,
        info: ServiceInfo,
    ) -> Option<fn() -> Svc<dyn Scope>> {
        let local = self.inner.scopes.read().get(&info).copied();
        match local {
            Some(create) => Some(create),
            None => self.inner.parent.as_ref()?.scope_constructor(info),
        }
    }

    fn find(&self, key: &BindingKey) -> Option<(Binding, Binder)> {
        let local = self.inner.bindings.read().get(key).cloned();
        match local {
            Some(binding) => Some((binding, self.clone())),
            None => self.inner.parent.as_ref()?.find(key),
        }
    }

    /// The binding for a key in this binder or its ancestors, without
    /// auto-binding.
    #[must_use]
    pub fn get_binding(&self, key: &BindingKey) -> Option<Binding> {
        self.find(key).map(|(binding, _)| binding)
    }

    /// Whether this binder or one of its ancestors has a binding for the
    /// request `R`.
    #[must_use]
    pub fn has_binding_for<R: Request>(&self) -> bool {
        self.find(&R::binding_key()).is_some()
    }

    /// Whether this binder itself has a binding for `key` which was not
    /// created by auto-binding.
    #[must_use]
    pub fn has_explicit_binding_for(&self, key: &BindingKey) -> bool {
        self.inner
            .bindings
            .read()
            .get(key)
            .map_or(false, |binding| !binding.is_implicit())
    }

    /// The injector which owns this binder.
    pub fn injector(&self) -> InjectResult<Injector> {
        self.inner
            .injector
            .upgrade()
            .map(Injector::from_inner)
            .ok_or_else(|| {
                InjectError::InternalError(
                    "the injector owning this binder was dropped".to_owned(),
                )
            })
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Binder> {
        self.inner.parent.as_ref()
    }

    /// Whether unknown capabilities are bound implicitly.
    #[must_use]
    pub fn auto_bind(&self) -> bool {
        self.inner.auto_bind
    }

    /// The scope used for bindings which do not declare one.
    #[must_use]
    pub fn default_scope(&self) -> ScopeRef {
        self.inner.default_scope
    }

    fn provider_for<R: Request>(
        &self,
        to: Target<R>,
        multibind: bool,
    ) -> InjectResult<Svc<dyn Provider>> {
        match to {
            Target::Provider(provider) => Ok(provider),
            Target::Value(value) if multibind => {
                Ok(Svc::new(ConstantProvider::new(value)))
            }
            Target::Callable(callable) => Ok(Svc::new(callable)),
            Target::Class(class) => Ok(class.into_provider()),
            Target::Value(value) => Ok(Svc::new(ConstantProvider::new(value))),
            Target::Default if !multibind => {
                R::implicit_provider().ok_or_else(|| {
                    InjectError::UnknownProvider {
                        key: R::binding_key(),
                        target: "no target".to_owned(),
                    }
                })
            }
            Target::Default => Err(InjectError::UnknownProvider {
                key: R::binding_key(),
                target: "no target".to_owned(),
            }),
        }
    }
}

fn create_scope<S: Scope + Default>() -> Svc<dyn Scope> {
    Svc::new(S::default())
}
