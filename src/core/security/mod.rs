#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Key management: encrypted node keystore and signature verification.

pub mod keystore;
