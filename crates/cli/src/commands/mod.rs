//! Command implementations

pub(crate) mod common;
pub mod generate;
pub mod inspect;
pub mod preview;
pub mod validate;
