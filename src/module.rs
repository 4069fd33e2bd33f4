use crate::{Binder, InjectResult, Service};

/// A unit of configuration which adds bindings to a [`Binder`]. Modules can
/// be used to group together related bindings and configure an injector in
/// pieces rather than all at once.
///
/// Any function taking a binder is a module:
///
/// ```
/// use binding_injector::{
///     interface, Binder, InjectResult, Injector, Module, Svc, Target,
/// };
///
/// struct Port(u16);
/// interface!(Port);
///
/// struct ServerModule {
///     port: u16,
/// }
///
/// impl Module for ServerModule {
///     fn configure(&self, binder: &Binder) -> InjectResult<()> {
///         binder.bind::<Svc<Port>>(Target::value(Svc::new(Port(self.port))), None)
///     }
/// }
///
/// fn names(binder: &Binder) -> InjectResult<()> {
///     binder.bind::<Svc<String>>(Target::value(Svc::new("server".to_owned())), None)
/// }
///
/// let mut builder = Injector::builder();
/// builder.install(ServerModule { port: 8080 }).install(names);
/// let injector = builder.build().unwrap();
///
/// let port: Svc<Port> = injector.get().unwrap();
/// assert_eq!(8080, port.0);
/// ```
pub trait Module: Service {
    /// Adds this module's bindings.
    fn configure(&self, binder: &Binder) -> InjectResult<()>;
}

impl<F> Module for F
where
    F: Fn(&Binder) -> InjectResult<()> + Service,
{
    fn configure(&self, binder: &Binder) -> InjectResult<()> {
        self(binder)
    }
}
