#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Node ingress: signed envelopes over HTTP.

pub mod envelope;
pub mod http;
