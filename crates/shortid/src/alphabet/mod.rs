mod abc;
mod shuffle;

pub use abc::*;
pub(crate) use abc::needed_symbols;
