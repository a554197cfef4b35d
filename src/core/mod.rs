#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Core protocol primitives: wire types, the contract engine, persistence
//! and key management.

pub mod dns;
pub mod security;
pub mod state;
pub mod types;
