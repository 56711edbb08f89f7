#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod alphabet;
mod error;
mod generator;
mod rand;
mod time;

pub use crate::alphabet::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::rand::*;
pub use crate::time::*;
