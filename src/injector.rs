use crate::{
    Arguments, Binder, BoxError, Dependency, DynSvc, InjectError, InjectResult,
    Injectable, InjectorBuilder, Module, Request, Requirement, Scope, ScopeRef,
    ServiceFactory, ServiceInfo, Svc,
};
use parking_lot::{Mutex, ReentrantMutex};
use std::any::type_name;

mod stack;

use stack::{CallTarget, Frame, StackGuard};

pub(crate) struct InjectorInner {
    binder: Binder,
    parent: Option<Injector>,
    stack: Mutex<Vec<Frame>>,
    lock: Svc<ReentrantMutex<()>>,
}

/// A runtime dependency injection container. Each injector owns a
/// [`Binder`] holding its bindings, and may have a parent injector whose
/// bindings it falls back to.
///
/// # Injecting the injector
///
/// Cloning the injector does not clone the bindings inside of it. Instead,
/// both injectors will use the same bindings, meaning that an injector can be
/// passed to a service as a dependency. The injector can be requested as
/// itself without using a service pointer, even when auto-binding is
/// disabled.
///
/// Note that requesting the injector inside of your services is generally bad
/// practice, and is known as the service locator antipattern. This is mostly
/// useful for service factories where you can create instances of your
/// services on demand.
///
/// ```
/// use binding_injector::{Injector, InjectResult, Svc, Target};
///
/// struct FloatFactory(Injector);
///
/// impl FloatFactory {
///     pub fn get(&self) -> InjectResult<f32> {
///         let int: Svc<i32> = self.0.get()?;
///         Ok(*int as f32)
///     }
/// }
/// binding_injector::interface!(FloatFactory);
///
/// let injector = Injector::new();
/// let binder = injector.binder();
/// binder.bind::<Svc<i32>>(Target::value(Svc::new(3)), None).unwrap();
/// binder
///     .bind::<Svc<FloatFactory>>(Target::callable(FloatFactory), None)
///     .unwrap();
///
/// let float_factory: Svc<FloatFactory> = injector.get().unwrap();
/// assert_eq!(3.0, float_factory.get().unwrap());
/// ```
#[derive(Clone)]
pub struct Injector {
    inner: Svc<InjectorInner>,
}

impl Injector {
    /// Creates a root injector with auto-binding enabled and no bindings.
    #[must_use]
    pub fn new() -> Self {
        Injector::create(None, true, ScopeRef::no_scope())
    }

    /// Creates a builder for an injector. This is the way to configure
    /// auto-binding, the default scope, the parent injector and the modules
    /// applied to the new injector.
    #[must_use]
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::default()
    }

    pub(crate) fn create(
        parent: Option<Injector>,
        auto_bind: bool,
        default_scope: ScopeRef,
    ) -> Self {
        let lock = parent.as_ref().map_or_else(
            || Svc::new(ReentrantMutex::new(())),
            |parent| parent.inner.lock.clone(),
        );
        let parent_binder = parent.as_ref().map(|parent| parent.binder().clone());
        let inner = Svc::new_cyclic(|weak| InjectorInner {
            binder: Binder::new(
                weak.clone(),
                parent_binder,
                auto_bind,
                default_scope,
            ),
            parent,
            stack: Mutex::new(Vec::new()),
            lock,
        });

        Injector { inner }
    }

    pub(crate) fn from_inner(inner: Svc<InjectorInner>) -> Self {
        Injector { inner }
    }

    /// Performs a request. See [`Request`] for what can be requested.
    ///
    /// ```
    /// use binding_injector::{
    ///     Arguments, BoxError, Injectable, Injector, ScopeRef, Svc, Target,
    /// };
    ///
    /// struct Engine;
    /// impl Injectable for Engine {
    ///     fn construct(_arguments: &mut Arguments) -> Result<Self, BoxError> {
    ///         Ok(Engine)
    ///     }
    /// }
    ///
    /// let injector = Injector::new();
    /// let first: Svc<Engine> = injector.get().unwrap();
    /// let second: Svc<Engine> = injector.get().unwrap();
    /// assert!(!Svc::ptr_eq(&first, &second));
    ///
    /// injector
    ///     .binder()
    ///     .bind::<Svc<Engine>>(Target::Default, Some(ScopeRef::singleton()))
    ///     .unwrap();
    /// let first: Svc<Engine> = injector.get().unwrap();
    /// let second: Svc<Engine> = injector.get().unwrap();
    /// assert!(Svc::ptr_eq(&first, &second));
    /// ```
    pub fn get<R: Request>(&self) -> InjectResult<R> {
        let value = self.resolve(&Requirement::of::<R>(), None)?;
        R::from_dyn(value)
    }

    /// Performs a request, overriding the scope of the binding.
    pub fn get_in<R: Request>(&self, scope: ScopeRef) -> InjectResult<R> {
        let value = self.resolve(&Requirement::of::<R>(), Some(scope))?;
        R::from_dyn(value)
    }

    /// The instance of the scope `S` used by this injector. Custom scopes
    /// must have been registered with [`Binder::bind_scope`].
    pub fn scope<S: Scope>(&self) -> InjectResult<Svc<S>> {
        let scope = ScopeRef::of::<S>();
        self.scope_instance(scope)?
            .into_any_svc()
            .downcast::<S>()
            .map_err(|_| InjectError::InvalidProvider { key: scope.key() })
    }

    pub(crate) fn scope_instance(
        &self,
        scope: ScopeRef,
    ) -> InjectResult<Svc<dyn Scope>> {
        self.inner.binder.scope_instance(scope)
    }

    /// Creates a child injector configured by `module`. The child shares
    /// this injector's bindings as fallbacks, along with its auto-binding
    /// setting and default scope.
    pub fn create_child_injector<M: Module>(
        &self,
        module: M,
    ) -> InjectResult<Injector> {
        let mut builder = Injector::builder();
        builder.parent(self).install(module);
        builder.build()
    }

    /// Constructs an instance of `T`. Each dependency of `T` which is not in
    /// `arguments` is resolved by this injector. No binding or scope is
    /// involved in constructing `T` itself.
    pub fn create_object<T: Injectable>(
        &self,
        arguments: Arguments,
    ) -> InjectResult<T> {
        let target = CallTarget::new(Some(ServiceInfo::of::<T>()), "construct");
        self.inject(target, T::dependencies().iter(), arguments, T::construct)
    }

    /// Invokes a service factory, resolving each of its parameters which is
    /// not in `arguments`.
    pub fn call_with_injection<D, F: ServiceFactory<D>>(
        &self,
        factory: &F,
        arguments: Arguments,
    ) -> InjectResult<F::Result> {
        let target = CallTarget::new(None, type_name::<F>());
        let dependencies = factory.dependencies();
        self.inject(target, dependencies.iter(), arguments, |arguments| {
            factory.invoke(arguments)
        })
    }

    #[must_use]
    pub fn binder(&self) -> &Binder {
        &self.inner.binder
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Injector> {
        self.inner.parent.as_ref()
    }

    fn resolve(
        &self,
        requirement: &Requirement,
        scope: Option<ScopeRef>,
    ) -> InjectResult<DynSvc> {
        let _lock = self.inner.lock.lock();
        let (binding, owner) = self.inner.binder.lookup(requirement)?;
        let scope = scope.unwrap_or_else(|| binding.scope());
        trace!(
            key = %binding.key(),
            scope = scope.info().name(),
            depth = self.inner.stack.lock().len(),
            "resolving"
        );

        let scope = owner.scope_instance(scope)?;
        let provider = scope.get(
            &binding.key(),
            binding.provider().clone(),
            &owner.injector()?,
        )?;
        provider.get(self)
    }

    fn inject<'a, T, C>(
        &self,
        target: CallTarget,
        dependencies: impl Iterator<Item = &'a Dependency>,
        supplied: Arguments,
        call: C,
    ) -> InjectResult<T>
    where
        C: FnOnce(&mut Arguments) -> Result<T, BoxError>,
    {
        let _lock = self.inner.lock.lock();
        let needed: Vec<_> = dependencies
            .filter(|dependency| {
                let supplied = supplied.contains(dependency.name());
                if supplied {
                    trace!(
                        callable = %target,
                        argument = dependency.name(),
                        "supplied argument overrides injection"
                    );
                }
                !supplied
            })
            .collect();

        // The frame stays on the stack until the call returns so that cycles
        // through values requested inside the call report every step.
        let _frame = self.enter(Frame::new(target, &needed))?;
        let mut arguments = Arguments::new();
        for dependency in needed {
            let value = self
                .resolve(dependency.requirement(), None)
                .map_err(|error| error.with_owner(|| target.to_string()))?;
            arguments.insert_dyn(dependency.name(), value);
        }
        arguments.extend(supplied);

        let names = arguments.names();
        call(&mut arguments).map_err(|source| {
            match source.downcast::<InjectError>() {
                Ok(error) => *error,
                Err(source) => {
                    debug!(callable = %target, error = %source, "call failed");
                    InjectError::CallError {
                        target: target.to_string(),
                        arguments: names
                            .into_iter()
                            .map(ToOwned::to_owned)
                            .collect(),
                        stack: self.stack_snapshot(),
                        source,
                    }
                }
            }
        })
    }

    fn enter(&self, frame: Frame) -> InjectResult<StackGuard<'_>> {
        let mut stack = self.inner.stack.lock();
        if stack.contains(&frame) {
            let chain: Vec<String> = stack
                .iter()
                .chain(std::iter::once(&frame))
                .map(ToString::to_string)
                .collect();
            debug!(chain = ?chain, "circular dependency detected");
            return Err(InjectError::CircularDependency { chain });
        }

        stack.push(frame);
        Ok(StackGuard::new(&self.inner.stack))
    }

    fn stack_snapshot(&self) -> Vec<String> {
        self.inner
            .stack
            .lock()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl Default for Injector {
    fn default() -> Self {
        Injector::new()
    }
}
