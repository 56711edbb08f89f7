mod interface;
mod mono_clock;
mod system;
mod utc;

pub use interface::*;
pub use mono_clock::*;
pub use system::*;
pub use utc::*;
