mod context;
mod scope;
mod singleton;
mod thread_local;

pub use context::*;
pub use scope::*;
pub use singleton::*;
pub use self::thread_local::*;
