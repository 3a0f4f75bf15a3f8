//! # Cross-Thread Generation
//!
//! - `latest`: single-value mailbox where the newest request wins
//! - `worker`: a generator thread feeding that mailbox

pub mod latest;
pub mod worker;

pub use latest::{LatestSlot, RequestId};
pub use worker::{BackgroundGenerator, CompletedField};
