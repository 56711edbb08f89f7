mod interface;
mod secure;
mod thread_random;

pub use interface::*;
pub use secure::*;
pub use thread_random::*;
