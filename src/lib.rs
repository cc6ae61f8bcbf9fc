//! Gram Atlas: a hierarchical location directory service.
//!
//! Loads a states/districts/blocks/villages tree once from a static JSON
//! dataset and serves it through a single parameter-driven HTTP endpoint.
//! Which level of the tree is returned is inferred from the query
//! parameters supplied, or forced with an explicit `type` parameter.

pub mod dataset;
pub mod dispatch;
pub mod server;
