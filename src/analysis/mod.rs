//! Analysis engine — frequency statistics, constraint filters, prize
//! ranking, and recommendation sampling.

pub mod filters;
pub mod frequency;
pub mod generator;
pub mod rank;

pub use generator::{GenerationBatch, GeneratorConfig, RecommendationGenerator};
pub use rank::rank;
