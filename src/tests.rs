use crate::{
    interface, Arguments, AssistedBuilder, Binder, BindingKey, BoxError,
    ClassAssistedBuilder, ContextScope, Dependencies, DynSvc, InjectError,
    InjectResult, Injectable, Injector, InjectorBuilder, IntoFallible,
    Provider, ProviderKind, ProviderOf, ScopeRef, SingletonScope, Svc, Target,
    ThreadLocalScope, TypedProvider,
};
use std::{
    collections::HashMap,
    error::Error,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    },
    thread,
};

#[derive(Default)]
struct Counter(AtomicUsize);

impl Counter {
    fn next(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

interface!(Counter);

struct Svc1 {
    pub id: usize,
}

impl Injectable for Svc1 {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Svc<Counter>>("counter")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        let counter: Svc<Counter> = arguments.take("counter")?;
        Ok(Svc1 { id: counter.next() })
    }
}

struct Svc2 {
    pub dep1: Svc<Svc1>,
}

impl Injectable for Svc2 {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Svc<Svc1>>("dep1")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Svc2 {
            dep1: arguments.take("dep1")?,
        })
    }
}

struct Svc3 {
    pub dep1: Svc<Svc1>,
    pub dep2: Svc<Svc2>,
}

impl Injectable for Svc3 {
    fn dependencies() -> Dependencies {
        Dependencies::new()
            .with::<Svc<Svc1>>("dep1")
            .with::<Svc<Svc2>>("dep2")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Svc3 {
            dep1: arguments.take("dep1")?,
            dep2: arguments.take("dep2")?,
        })
    }
}

trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;
}

interface!(dyn Plugin);

struct Named(&'static str);

impl Plugin for Named {
    fn name(&self) -> &'static str {
        self.0
    }
}

fn plugin(name: &'static str) -> Svc<dyn Plugin> {
    Svc::new(Named(name))
}

fn bind_counter(binder: &Binder) -> InjectResult<()> {
    binder.bind::<Svc<Counter>>(Target::value(Svc::new(Counter::default())), None)
}

fn no_bindings(_binder: &Binder) -> InjectResult<()> {
    Ok(())
}

fn injector_with(configure: impl FnOnce(&mut InjectorBuilder)) -> Injector {
    let mut builder = Injector::builder();
    builder.install(bind_counter);
    configure(&mut builder);
    builder.build().unwrap()
}

fn injector() -> Injector {
    injector_with(|_| {})
}

fn count(injector: &Injector) -> usize {
    injector.get::<Svc<Counter>>().unwrap().count()
}

#[test]
fn can_make_svc1() {
    let injector = injector();
    let svc1: Svc<Svc1> = injector.get().unwrap();
    assert_eq!(1, svc1.id);
}

#[test]
fn can_make_svc3() {
    let injector = injector();
    let svc3: Svc<Svc3> = injector.get().unwrap();

    assert_ne!(svc3.dep1.id, svc3.dep2.dep1.id);
    assert_eq!(2, count(&injector));
}

#[test]
fn no_scope_produces_fresh_values() {
    let injector = injector();
    let first: Svc<Svc1> = injector.get().unwrap();
    let second: Svc<Svc1> = injector.get().unwrap();

    assert!(!Svc::ptr_eq(&first, &second));
    assert_ne!(first.id, second.id);
}

#[test]
fn singleton_scope_produces_one_value() {
    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::singleton()))
        .unwrap();

    let svc1: Svc<Svc1> = injector.get().unwrap();
    let svc2: Svc<Svc2> = injector.get().unwrap();
    let svc3: Svc<Svc3> = injector.get().unwrap();

    assert!(Svc::ptr_eq(&svc1, &svc2.dep1));
    assert!(Svc::ptr_eq(&svc1, &svc3.dep1));
    assert!(Svc::ptr_eq(&svc1, &svc3.dep2.dep1));
    assert_eq!(1, count(&injector));
}

#[test]
fn car_shares_engine_only_when_engine_is_singleton() {
    struct Engine;

    impl Injectable for Engine {
        fn construct(_arguments: &mut Arguments) -> Result<Self, BoxError> {
            Ok(Engine)
        }
    }

    struct Car {
        engine: Svc<Engine>,
    }

    impl Injectable for Car {
        fn dependencies() -> Dependencies {
            Dependencies::new().with::<Svc<Engine>>("engine")
        }

        fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
            Ok(Car {
                engine: arguments.take("engine")?,
            })
        }
    }

    let injector = Injector::new();
    let first: Svc<Car> = injector.get().unwrap();
    let second: Svc<Car> = injector.get().unwrap();
    assert!(!Svc::ptr_eq(&first, &second));
    assert!(!Svc::ptr_eq(&first.engine, &second.engine));

    let injector = Injector::new();
    injector
        .binder()
        .bind::<Svc<Engine>>(Target::Default, Some(ScopeRef::singleton()))
        .unwrap();
    let first: Svc<Car> = injector.get().unwrap();
    let second: Svc<Car> = injector.get().unwrap();
    assert!(!Svc::ptr_eq(&first, &second));
    assert!(Svc::ptr_eq(&first.engine, &second.engine));
}

#[test]
fn child_shares_parent_singleton_for_implicit_binding() {
    let parent = injector_with(|builder| {
        builder.default_scope(ScopeRef::singleton());
    });
    let child = parent.create_child_injector(no_bindings).unwrap();

    let from_child: Svc<Svc1> = child.get().unwrap();
    let from_parent: Svc<Svc1> = parent.get().unwrap();
    let again: Svc<Svc1> = child.get().unwrap();

    assert!(Svc::ptr_eq(&from_child, &from_parent));
    assert!(Svc::ptr_eq(&from_child, &again));
    assert_eq!(1, count(&parent));
}

#[test]
fn child_shares_singleton_of_parent_without_auto_binding() {
    let parent = injector_with(|builder| {
        builder.auto_bind(false);
    });
    let mut builder = Injector::builder();
    builder
        .parent(&parent)
        .auto_bind(true)
        .default_scope(ScopeRef::singleton());
    let child = builder.build().unwrap();

    let first: Svc<Svc1> = child.get().unwrap();
    let key = BindingKey::of::<Svc<Svc1>>();
    assert!(parent.scope::<SingletonScope>().unwrap().contains(&key));
    assert!(!parent.binder().has_binding_for::<Svc<Svc1>>());

    let second: Svc<Svc1> = child.get().unwrap();
    assert!(Svc::ptr_eq(&first, &second));
    assert_eq!(1, count(&parent));
}

#[test]
fn child_binding_overrides_parent_singleton() {
    let parent = injector();
    parent
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::singleton()))
        .unwrap();
    let child = parent
        .create_child_injector(|binder: &Binder| {
            binder.bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::singleton()))
        })
        .unwrap();

    let from_parent: Svc<Svc1> = parent.get().unwrap();
    let from_child: Svc<Svc1> = child.get().unwrap();

    assert!(!Svc::ptr_eq(&from_parent, &from_child));
    assert!(Svc::ptr_eq(&from_child, &child.get::<Svc<Svc1>>().unwrap()));
    assert!(Svc::ptr_eq(&from_parent, &parent.get::<Svc<Svc1>>().unwrap()));
}

#[test]
fn child_inherits_configuration() {
    let parent = injector_with(|builder| {
        builder.auto_bind(false).default_scope(ScopeRef::singleton());
    });
    let child = parent.create_child_injector(no_bindings).unwrap();

    assert!(!child.binder().auto_bind());
    assert_eq!(ScopeRef::singleton(), child.binder().default_scope());
    assert!(child.parent().is_some());

    let mut builder = Injector::builder();
    builder.parent(&parent).auto_bind(true);
    let overridden = builder.build().unwrap();
    assert!(overridden.binder().auto_bind());
    assert_eq!(ScopeRef::singleton(), overridden.binder().default_scope());
}

#[test]
fn declared_scope_is_used_unless_overridden() {
    struct Pool;

    impl Injectable for Pool {
        fn construct(_arguments: &mut Arguments) -> Result<Self, BoxError> {
            Ok(Pool)
        }

        fn scope() -> Option<ScopeRef> {
            Some(ScopeRef::singleton())
        }
    }

    let injector = Injector::new();
    let first: Svc<Pool> = injector.get().unwrap();
    let second: Svc<Pool> = injector.get().unwrap();
    assert!(Svc::ptr_eq(&first, &second));

    let injector = Injector::new();
    injector
        .binder()
        .bind::<Svc<Pool>>(Target::Default, Some(ScopeRef::no_scope()))
        .unwrap();
    let first: Svc<Pool> = injector.get().unwrap();
    let second: Svc<Pool> = injector.get().unwrap();
    assert!(!Svc::ptr_eq(&first, &second));
}

#[test]
fn get_in_overrides_binding_scope() {
    let injector = injector();
    let first: Svc<Svc1> = injector.get_in(ScopeRef::singleton()).unwrap();
    let second: Svc<Svc1> = injector.get_in(ScopeRef::singleton()).unwrap();
    let unscoped: Svc<Svc1> = injector.get().unwrap();

    assert!(Svc::ptr_eq(&first, &second));
    assert!(!Svc::ptr_eq(&first, &unscoped));
}

#[test]
fn thread_local_scope_is_per_thread() {
    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::thread_local()))
        .unwrap();

    let first: Svc<Svc1> = injector.get().unwrap();
    let second: Svc<Svc1> = injector.get().unwrap();
    assert!(Svc::ptr_eq(&first, &second));

    let remote = {
        let injector = injector.clone();
        thread::spawn(move || {
            let first: Svc<Svc1> = injector.get().unwrap();
            let second: Svc<Svc1> = injector.get().unwrap();
            assert!(Svc::ptr_eq(&first, &second));
            first
        })
        .join()
        .unwrap()
    };
    assert!(!Svc::ptr_eq(&first, &remote));
}

#[test]
fn racing_threads_produce_one_singleton() {
    const THREADS: usize = 8;

    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::singleton()))
        .unwrap();

    let barrier = Svc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let injector = injector.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                injector.get::<Svc<Svc1>>().unwrap()
            })
        })
        .collect();

    let values: Vec<Svc<Svc1>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert!(values.iter().all(|value| Svc::ptr_eq(value, &values[0])));
    assert_eq!(1, count(&injector));
}

#[test]
fn thread_local_scope_forgets_exited_threads() {
    const THREADS: usize = 200;

    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::thread_local()))
        .unwrap();

    let mut ids = Vec::with_capacity(THREADS);
    for _ in 0..THREADS {
        let injector = injector.clone();
        let svc1 = thread::spawn(move || injector.get::<Svc<Svc1>>().unwrap())
            .join()
            .unwrap();
        ids.push(svc1.id);
    }

    // Every thread got its own value, even when it reused a dead thread's slot
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(THREADS, ids.len());

    let scope = injector.scope::<ThreadLocalScope>().unwrap();
    assert!(scope.len() < THREADS / 4, "{} values cached", scope.len());
}

#[test]
fn context_scope_is_per_injector() {
    let parent = injector();
    parent.binder().bind_scope::<ContextScope>();
    let child = parent
        .create_child_injector(|binder: &Binder| {
            binder.bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::context()))
        })
        .unwrap();

    let outer = parent.scope::<ContextScope>().unwrap();
    let scope = child.scope::<ContextScope>().unwrap();
    assert!(!Svc::ptr_eq(&outer, &scope));

    {
        let _context = outer.enter();
        match child.get::<Svc<Svc1>>() {
            Err(InjectError::UnsatisfiedRequirement { .. }) => {}
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("only the parent's context was entered"),
        }
    }

    let inside = {
        let _context = scope.enter();
        assert!(scope.is_active());
        assert!(!outer.is_active());
        let first: Svc<Svc1> = child.get().unwrap();
        let second: Svc<Svc1> = child.get().unwrap();
        assert!(Svc::ptr_eq(&first, &second));
        first
    };
    assert!(!scope.is_active());

    let _context = scope.enter();
    let next: Svc<Svc1> = child.get().unwrap();
    assert!(!Svc::ptr_eq(&inside, &next));
}

#[test]
fn context_belongs_to_entering_thread() {
    let injector = injector();
    injector.binder().bind_scope::<ContextScope>();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::context()))
        .unwrap();

    let scope = injector.scope::<ContextScope>().unwrap();
    let _context = scope.enter();
    let local: Svc<Svc1> = injector.get().unwrap();

    let remote = {
        let injector = injector.clone();
        let scope = scope.clone();
        thread::spawn(move || {
            assert!(!scope.is_active());
            match injector.get::<Svc<Svc1>>() {
                Err(InjectError::UnsatisfiedRequirement { .. }) => {}
                Err(error) => Err(error).unwrap(),
                Ok(_) => unreachable!("no context was entered on this thread"),
            }

            let _context = scope.enter();
            injector.get::<Svc<Svc1>>().unwrap()
        })
        .join()
        .unwrap()
    };

    assert!(scope.is_active());
    assert!(!Svc::ptr_eq(&local, &remote));
    assert!(Svc::ptr_eq(&local, &injector.get::<Svc<Svc1>>().unwrap()));
}

#[test]
fn unregistered_custom_scope_is_unsatisfied() {
    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, Some(ScopeRef::context()))
        .unwrap();

    match injector.get::<Svc<Svc1>>() {
        Err(InjectError::UnsatisfiedRequirement { key, .. })
            if key == ScopeRef::context().key() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the context scope was never registered"),
    }
}

#[test]
fn auto_binding_is_idempotent() {
    let injector = injector();
    let key = BindingKey::of::<Svc<Svc1>>();
    assert!(!injector.binder().has_binding_for::<Svc<Svc1>>());

    let _first: Svc<Svc1> = injector.get().unwrap();
    let binding = injector.binder().get_binding(&key).unwrap();
    assert!(binding.is_implicit());
    assert!(!injector.binder().has_explicit_binding_for(&key));

    let _second: Svc<Svc1> = injector.get().unwrap();
    let again = injector.binder().get_binding(&key).unwrap();
    assert!(Svc::ptr_eq(binding.provider(), again.provider()));
    assert_eq!(ProviderKind::Class, again.provider().kind());
}

#[test]
fn cant_make_svc1_without_auto_binding() {
    let injector = injector_with(|builder| {
        builder.auto_bind(false);
    });

    match injector.get::<Svc<Svc1>>() {
        Err(InjectError::UnsatisfiedRequirement { owner: None, key })
            if key == BindingKey::of::<Svc<Svc1>>() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("service should not be auto-bound"),
    }
}

#[test]
fn cant_make_svc1_when_dependency_is_unbound() {
    let mut builder = Injector::builder();
    builder.auto_bind(false);
    let injector = builder.build().unwrap();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::Default, None)
        .unwrap();

    match injector.get::<Svc<Svc1>>() {
        Err(InjectError::UnsatisfiedRequirement {
            owner: Some(owner),
            key,
        }) if key == BindingKey::of::<Svc<Counter>>() => {
            assert!(owner.ends_with("Svc1::construct"), "{}", owner);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the counter is not bound"),
    }
}

#[test]
fn special_requests_resolve_without_auto_binding() {
    let injector = injector_with(|builder| {
        builder.auto_bind(false);
    });

    let _injector: Injector = injector.get().unwrap();
    let counter: ProviderOf<Svc<Counter>> = injector.get().unwrap();
    assert_eq!(0, counter.get().unwrap().count());

    let builder: ClassAssistedBuilder<Svc1> = injector.get().unwrap();
    let svc1 = builder.build(Arguments::new()).unwrap();
    assert_eq!(1, svc1.id);
}

#[test]
fn provider_of_resolves_lazily() {
    let injector = injector();
    let svc1s: ProviderOf<Svc<Svc1>> = injector.get().unwrap();
    assert_eq!(0, count(&injector));

    let first = svc1s.get().unwrap();
    let second = svc1s.get().unwrap();
    assert_eq!(2, count(&injector));
    assert!(!Svc::ptr_eq(&first, &second));
}

trait Linked: Send + Sync {}

interface!(dyn Linked);

struct Head {
    _next: Svc<dyn Linked>,
}

impl Injectable for Head {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Svc<dyn Linked>>("next")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Head {
            _next: arguments.take("next")?,
        })
    }
}

struct Tail {
    _head: Svc<Head>,
}

impl Linked for Tail {}

impl Injectable for Tail {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Svc<Head>>("head")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Tail {
            _head: arguments.take("head")?,
        })
    }
}

struct Link;

impl Linked for Link {}

#[test]
fn circular_dependency_is_detected() {
    let injector = Injector::new();
    injector
        .binder()
        .bind::<Svc<dyn Linked>>(Target::class::<Tail>(), None)
        .unwrap();

    match injector.get::<Svc<Head>>() {
        Err(InjectError::CircularDependency { chain }) => {
            assert_eq!(3, chain.len());
            assert_eq!(chain[0], chain[2]);
            assert!(chain[0].contains("Head::construct(injecting {next: "));
            assert!(chain[1].contains("Tail::construct(injecting {head: "));
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the cycle should not be constructible"),
    }

    // The stack unwinds on failure, so acyclic requests still succeed
    injector
        .binder()
        .bind::<Svc<dyn Linked>>(Target::instance(Link), None)
        .unwrap();
    let _head: Svc<Head> = injector.get().unwrap();
}

struct Upper;

impl Injectable for Upper {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Injector>("injector")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        let injector: Injector = arguments.take("injector")?;
        let _lower: Svc<Lower> = injector.get()?;
        Ok(Upper)
    }
}

struct Lower {
    _upper: Svc<Upper>,
}

impl Injectable for Lower {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Svc<Upper>>("upper")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Lower {
            _upper: arguments.take("upper")?,
        })
    }
}

#[test]
fn cycle_through_constructor_body_is_detected() {
    let injector = Injector::new();
    match injector.get::<Svc<Upper>>() {
        Err(InjectError::CircularDependency { chain }) => {
            assert_eq!(3, chain.len());
            assert_eq!(chain[0], chain[2]);
            assert!(chain[0].contains("Upper::construct"), "{}", chain[0]);
            assert!(chain[1].contains("Lower::construct"), "{}", chain[1]);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("Upper needs itself through Lower"),
    }
}

struct Node {
    peer: Svc<Peer>,
}

impl Injectable for Node {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<Svc<Peer>>("peer")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Node {
            peer: arguments.take("peer")?,
        })
    }
}

struct Peer {
    nodes: AssistedBuilder<Node>,
}

impl Injectable for Peer {
    fn dependencies() -> Dependencies {
        Dependencies::new().with::<AssistedBuilder<Node>>("nodes")
    }

    fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
        Ok(Peer {
            nodes: arguments.take("nodes")?,
        })
    }
}

#[test]
fn assisted_builder_breaks_cycle() {
    let injector = Injector::new();
    let node: Svc<Node> = injector.get().unwrap();

    let other = node
        .peer
        .nodes
        .build(Arguments::new().with("peer", node.peer.clone()))
        .unwrap();
    assert!(Svc::ptr_eq(&node.peer, &other.peer));
    assert!(!Svc::ptr_eq(&node, &other));
}

#[test]
fn assisted_builder_requires_class_binding() {
    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::value(Svc::new(Svc1 { id: 7 })), None)
        .unwrap();

    let builder: AssistedBuilder<Svc1> = injector.get().unwrap();
    match builder.build(Arguments::new()) {
        Err(InjectError::InvalidBinding { key, .. })
            if key == BindingKey::of::<Svc<Svc1>>() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("constants cannot be built with arguments"),
    }
}

#[test]
fn supplied_arguments_take_precedence() {
    let injector = injector();
    let svc2: Svc2 = injector
        .create_object(Arguments::new().with("dep1", Svc::new(Svc1 { id: 42 })))
        .unwrap();
    assert_eq!(42, svc2.dep1.id);
    assert_eq!(0, count(&injector));

    let svc3: Svc3 = injector
        .create_object(Arguments::new().with("dep1", Svc::new(Svc1 { id: 42 })))
        .unwrap();
    assert_eq!(42, svc3.dep1.id);
    assert_eq!(1, svc3.dep2.dep1.id);
}

#[test]
fn wrongly_typed_argument_is_call_error() {
    let injector = injector();
    match injector.create_object::<Svc2>(Arguments::new().with("dep1", 5u8)) {
        Err(InjectError::CallError { arguments, .. }) => {
            assert_eq!(vec!["dep1".to_owned()], arguments);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("dep1 has the wrong type"),
    }
}

#[test]
fn multibind_preserves_contribution_order() {
    let injector = injector();
    let binder = injector.binder();
    binder
        .multibind::<Vec<Svc<dyn Plugin>>>(Target::value(vec![plugin("alpha")]), None)
        .unwrap();
    binder
        .multibind::<Vec<Svc<dyn Plugin>>>(
            Target::factory(|| vec![plugin("beta"), plugin("gamma")]),
            None,
        )
        .unwrap();
    binder
        .multibind::<Vec<Svc<dyn Plugin>>>(
            Target::factory(|_: Svc<Counter>| vec![plugin("delta")]),
            None,
        )
        .unwrap();

    let plugins: Vec<Svc<dyn Plugin>> = injector.get().unwrap();
    let names: Vec<_> = plugins.iter().map(|plugin| plugin.name()).collect();
    assert_eq!(vec!["alpha", "beta", "gamma", "delta"], names);
}

#[test]
fn multibind_merges_maps_with_later_keys_winning() {
    let injector = Injector::new();
    let binder = injector.binder();
    binder
        .multibind::<HashMap<String, Svc<dyn Plugin>>>(
            Target::value(HashMap::from([
                ("first".to_owned(), plugin("a")),
                ("second".to_owned(), plugin("b")),
            ])),
            None,
        )
        .unwrap();
    binder
        .multibind::<HashMap<String, Svc<dyn Plugin>>>(
            Target::factory(|| HashMap::from([("second".to_owned(), plugin("c"))])),
            None,
        )
        .unwrap();

    let plugins: HashMap<String, Svc<dyn Plugin>> = injector.get().unwrap();
    assert_eq!(2, plugins.len());
    assert_eq!("a", plugins["first"].name());
    assert_eq!("c", plugins["second"].name());
}

#[test]
fn implicit_multibinding_is_promoted() {
    let injector = Injector::new();
    let empty: Vec<Svc<dyn Plugin>> = injector.get().unwrap();
    assert!(empty.is_empty());

    let key = BindingKey::of::<Vec<Svc<dyn Plugin>>>();
    assert!(injector.binder().get_binding(&key).unwrap().is_implicit());

    injector
        .binder()
        .multibind::<Vec<Svc<dyn Plugin>>>(Target::value(vec![plugin("late")]), None)
        .unwrap();
    assert!(injector.binder().has_explicit_binding_for(&key));

    let plugins: Vec<Svc<dyn Plugin>> = injector.get().unwrap();
    assert_eq!(1, plugins.len());
}

#[test]
fn multibinding_scope_applies_to_aggregate() {
    let injector = Injector::new();
    injector
        .binder()
        .multibind::<Vec<Svc<dyn Plugin>>>(
            Target::factory(|| vec![plugin("only")]),
            Some(ScopeRef::singleton()),
        )
        .unwrap();

    let first: Vec<Svc<dyn Plugin>> = injector.get().unwrap();
    let second: Vec<Svc<dyn Plugin>> = injector.get().unwrap();
    assert!(Svc::ptr_eq(&first[0], &second[0]));
}

#[test]
fn interface_without_target_is_unknown_provider() {
    let injector = Injector::new();
    match injector
        .binder()
        .bind::<Svc<dyn Plugin>>(Target::Default, None)
    {
        Err(InjectError::UnknownProvider { key, .. })
            if key == BindingKey::of::<Svc<dyn Plugin>>() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("dyn Plugin cannot provide itself"),
    }

    match injector.get::<Svc<dyn Plugin>>() {
        Err(InjectError::UnsatisfiedRequirement { key, .. })
            if key == BindingKey::of::<Svc<dyn Plugin>>() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("dyn Plugin is not bound"),
    }
}

fn flaky(counter: Svc<Counter>) -> Result<Svc1, io::Error> {
    match counter.next() {
        1 => Err(io::Error::new(io::ErrorKind::Other, "first attempt fails")),
        id => Ok(Svc1 { id }),
    }
}

#[test]
fn call_error_reports_target_and_is_not_cached() {
    let injector = injector();
    injector
        .binder()
        .bind::<Svc<Svc1>>(
            Target::callable(flaky.fallible()),
            Some(ScopeRef::singleton()),
        )
        .unwrap();

    match injector.get::<Svc<Svc2>>() {
        Err(error @ InjectError::CallError { .. }) => {
            assert!(error.source().is_some());
            if let InjectError::CallError {
                target,
                arguments,
                stack,
                ..
            } = error
            {
                assert!(target.contains("flaky"), "{}", target);
                assert_eq!(vec!["arg0".to_owned()], arguments);
                assert_eq!(2, stack.len());
                assert!(stack[0].contains("Svc2::construct"), "{}", stack[0]);
                assert!(stack[1].contains("flaky"), "{}", stack[1]);
            }
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the first attempt should fail"),
    }

    let scope = injector.scope::<SingletonScope>().unwrap();
    assert!(!scope.contains(&BindingKey::of::<Svc<Svc1>>()));

    let first: Svc<Svc1> = injector.get().unwrap();
    let second: Svc<Svc1> = injector.get().unwrap();
    assert_eq!(2, first.id);
    assert!(Svc::ptr_eq(&first, &second));
    assert!(scope.contains(&BindingKey::of::<Svc<Svc1>>()));
}

#[test]
fn constructor_can_propagate_inject_errors() {
    struct Lookup {
        counter: Svc<Counter>,
    }

    impl Injectable for Lookup {
        fn dependencies() -> Dependencies {
            Dependencies::new().with::<Injector>("injector")
        }

        fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
            let injector: Injector = arguments.take("injector")?;
            Ok(Lookup {
                counter: injector.get()?,
            })
        }
    }

    let injector = injector();
    let lookup: Svc<Lookup> = injector.get().unwrap();
    assert_eq!(0, lookup.counter.count());

    let injector = Injector::builder().build().unwrap();
    match injector.get::<Svc<Lookup>>() {
        Err(InjectError::UnsatisfiedRequirement { key, .. })
            if key == BindingKey::of::<Svc<Counter>>() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the counter is not bound"),
    }
}

struct FixedProvider;

impl TypedProvider for FixedProvider {
    type Result = Svc<Svc1>;

    fn provide_typed(&self, _injector: &Injector) -> InjectResult<Svc<Svc1>> {
        Ok(Svc::new(Svc1 { id: 99 }))
    }
}

struct WrongProvider;

impl Provider for WrongProvider {
    fn get(&self, _injector: &Injector) -> InjectResult<DynSvc> {
        Ok(Svc::new(5u8) as DynSvc)
    }
}

#[test]
fn custom_providers() {
    let injector = Injector::new();
    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::provider(FixedProvider), None)
        .unwrap();
    let svc1: Svc<Svc1> = injector.get().unwrap();
    assert_eq!(99, svc1.id);

    injector
        .binder()
        .bind::<Svc<Svc1>>(Target::provider(WrongProvider), None)
        .unwrap();
    match injector.get::<Svc<Svc1>>() {
        Err(InjectError::InvalidProvider { key })
            if key == BindingKey::of::<Svc<Svc1>>() => {}
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("the provider returns the wrong type"),
    }
}

#[test]
fn injector_is_injected_as_requester() {
    let parent = injector();
    let child = parent.create_child_injector(no_bindings).unwrap();

    let requester: Injector = child.get().unwrap();
    assert!(requester.parent().is_some());
}
