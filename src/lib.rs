//! Runtime dependency injection with bindings, scopes and multibindings.
//!
//! An [`Injector`] builds an object graph on demand. Each capability which
//! can be requested is described by a [`BindingKey`], and the injector's
//! [`Binder`] maps keys to a provider which produces values along with a
//! scope which decides how long produced values are reused.
//!
//! # Capabilities
//!
//! The types which can be requested from an injector implement [`Request`]:
//!
//! - `Svc<I>`, a singular capability. `I` is either a type implementing
//!   [`Injectable`], or an interface declared with [`interface!`] such as
//!   `dyn Trait`.
//! - `Vec<Svc<I>>` and `HashMap<String, Svc<I>>`, multibindings which
//!   aggregate every contribution made with [`Binder::multibind`].
//! - [`Injector`], [`ProviderOf`], [`AssistedBuilder`] and
//!   [`ClassAssistedBuilder`], which are always available.
//!
//! # Auto-binding
//!
//! When nothing is bound for a capability, the injector binds it implicitly
//! if the capability knows how to provide itself. Every [`Injectable`] type
//! does, and empty multibindings do. Auto-binding can be disabled with
//! [`InjectorBuilder::auto_bind`], in which case only explicitly bound (and
//! always available) capabilities can be requested.
//!
//! # Scopes
//!
//! - [`NoScope`]: a new value is produced for every request. This is the
//!   default unless [`InjectorBuilder::default_scope`] says otherwise.
//! - [`SingletonScope`]: one value per injector.
//! - [`ThreadLocalScope`]: one value per injector and thread.
//! - [`ContextScope`]: one value per entered context. This scope must be
//!   registered with [`Binder::bind_scope`] before use.
//!
//! Custom scopes can be created by implementing [`Scope`].
//!
//! # Example
//!
//! ```
//! use binding_injector::{
//!     interface, Arguments, BoxError, Dependencies, Injectable, Injector,
//!     ScopeRef, Svc, Target,
//! };
//!
//! // Some type that represents a user
//! struct User;
//!
//! // This is our interface. Services depend on it without caring which
//! // implementation is bound at runtime.
//! trait DataService: Send + Sync {
//!     fn get_user(&self, user_id: &str) -> Option<User>;
//! }
//! interface!(dyn DataService);
//!
//! struct SqlDataService;
//! impl DataService for SqlDataService {
//!     fn get_user(&self, _user_id: &str) -> Option<User> { todo!() }
//! }
//!
//! struct MockDataService;
//! impl DataService for MockDataService {
//!     fn get_user(&self, _user_id: &str) -> Option<User> { Some(User) }
//! }
//!
//! impl Injectable for MockDataService {
//!     fn construct(_arguments: &mut Arguments) -> Result<Self, BoxError> {
//!         Ok(MockDataService)
//!     }
//! }
//!
//! // A service which depends on the interface. The manifest names each
//! // dependency, and the injector hands the resolved values to `construct`.
//! struct UserService {
//!     data_service: Svc<dyn DataService>,
//! }
//!
//! impl Injectable for UserService {
//!     fn dependencies() -> Dependencies {
//!         Dependencies::new().with::<Svc<dyn DataService>>("data_service")
//!     }
//!
//!     fn construct(arguments: &mut Arguments) -> Result<Self, BoxError> {
//!         Ok(UserService {
//!             data_service: arguments.take("data_service")?,
//!         })
//!     }
//!
//!     fn scope() -> Option<ScopeRef> {
//!         Some(ScopeRef::singleton())
//!     }
//! }
//!
//! impl UserService {
//!     pub fn get_user(&self, user_id: &str) -> Option<User> {
//!         self.data_service.get_user(user_id)
//!     }
//! }
//!
//! let injector = Injector::new();
//!
//! // Let's choose to use the MockDataService as our data service
//! injector
//!     .binder()
//!     .bind::<Svc<dyn DataService>>(Target::class::<MockDataService>(), None)
//!     .unwrap();
//!
//! // UserService is bound implicitly, in the scope it declares
//! let user_service: Svc<UserService> = injector.get().unwrap();
//! assert!(user_service.get_user("john").is_some());
//!
//! let again: Svc<UserService> = injector.get().unwrap();
//! assert!(Svc::ptr_eq(&user_service, &again));
//! ```
//!
//! # Logging
//!
//! With the `tracing` feature (enabled by default), bindings, resolutions
//! and detected cycles are reported as `tracing` events.

#![forbid(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

#[macro_use]
mod macros;

mod any;
mod binder;
mod binding;
mod builder;
mod dependency;
mod injector;
mod key;
mod module;
mod requests;
mod scopes;
mod services;

pub use any::*;
pub use binder::*;
pub use binding::*;
pub use builder::*;
pub use dependency::*;
pub use injector::*;
pub use key::*;
pub use module::*;
pub use requests::*;
pub use scopes::*;
pub use services::*;

#[cfg(test)]
mod tests;
