//! Core logic: features, model artifacts and the risk policy.
//! Nothing here knows about HTTP.

pub mod features;
pub mod model;
pub mod risk;
