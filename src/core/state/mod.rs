#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Durable contract state on sled.

pub mod store;
