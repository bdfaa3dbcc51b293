//! Core library components.
//!
//! Everything here is independent of the command line: the envelope-encrypted
//! vault, the access roster, key material and persistence.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod identity;
pub mod roster;
pub mod seal;
pub mod store;
pub mod types;
pub mod validation;
pub mod vault;
