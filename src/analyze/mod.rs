pub mod aggregator;
pub mod bucket;
pub mod collector;
mod model;
pub mod resolver;
pub mod visualization;

pub use model::*;
