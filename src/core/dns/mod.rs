#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! The domain-name contract: state, record and delegation stores, and the
//! message dispatcher.

pub mod contract;
pub mod dispatch;
pub mod records;
pub mod registry;

pub use contract::{AutoDns, ContractError, Phase};
pub use dispatch::{dispatch, Effect};
