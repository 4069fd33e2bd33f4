mod callable;
mod class;
mod constant;
mod fallible;
mod func;
mod interface;
mod multi;
mod providers;
mod service;

pub use callable::*;
pub use class::*;
pub use constant::*;
pub use fallible::*;
pub use func::*;
pub use interface::*;
pub use multi::*;
pub use providers::*;
pub use service::*;
