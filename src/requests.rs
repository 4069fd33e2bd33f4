mod arguments;
mod request;
mod special;

pub use arguments::*;
pub use request::*;
pub use special::*;
