use crate::{InjectResult, Injector, Module, ScopeRef};

/// A builder for an [`Injector`].
///
/// Settings which are not given are inherited from the parent injector, if
/// there is one. Otherwise auto-binding is enabled and bindings default to
/// [`NoScope`](crate::NoScope).
///
/// ```
/// use binding_injector::{
///     Binder, InjectError, InjectResult, Injector, ScopeRef, Svc, Target,
/// };
///
/// fn configure(binder: &Binder) -> InjectResult<()> {
///     binder.bind::<Svc<String>>(Target::value(Svc::new("db".to_owned())), None)
/// }
///
/// let mut builder = Injector::builder();
/// builder
///     .auto_bind(false)
///     .default_scope(ScopeRef::singleton())
///     .install(configure);
/// let injector = builder.build().unwrap();
///
/// let name: Svc<String> = injector.get().unwrap();
/// assert_eq!("db", name.as_str());
/// assert!(matches!(
///     injector.get::<Svc<u32>>(),
///     Err(InjectError::UnsatisfiedRequirement { .. })
/// ));
/// ```
#[derive(Default)]
pub struct InjectorBuilder {
    parent: Option<Injector>,
    auto_bind: Option<bool>,
    default_scope: Option<ScopeRef>,
    modules: Vec<Box<dyn Module>>,
}

impl InjectorBuilder {
    /// Makes the new injector a child of `parent`.
    pub fn parent(&mut self, parent: &Injector) -> &mut Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Whether capabilities without a binding are bound implicitly.
    pub fn auto_bind(&mut self, enabled: bool) -> &mut Self {
        self.auto_bind = Some(enabled);
        self
    }

    /// The scope used for bindings which do not declare one.
    pub fn default_scope(&mut self, scope: ScopeRef) -> &mut Self {
        self.default_scope = Some(scope);
        self
    }

    /// Adds a module which configures the new injector's bindings. Modules
    /// are applied in the order they were added.
    pub fn install<M: Module>(&mut self, module: M) -> &mut Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Builds the injector and applies its modules.
    pub fn build(self) -> InjectResult<Injector> {
        let inherited = self.parent.as_ref().map(Injector::binder);
        let auto_bind = self
            .auto_bind
            .or_else(|| inherited.map(|binder| binder.auto_bind()))
            .unwrap_or(true);
        let default_scope = self
            .default_scope
            .or_else(|| inherited.map(|binder| binder.default_scope()))
            .unwrap_or_else(ScopeRef::no_scope);

        let injector = Injector::create(self.parent, auto_bind, default_scope);
        for module in &self.modules {
            module.configure(injector.binder())?;
        }

        debug!(
            auto_bind,
            default_scope = default_scope.info().name(),
            modules = self.modules.len(),
            "built injector"
        );
        Ok(injector)
    }
}
