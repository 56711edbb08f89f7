mod components;
mod default;
mod mutex;
mod short_id;

pub use components::*;
pub use default::*;
pub(crate) use mutex::*;
pub use short_id::*;
