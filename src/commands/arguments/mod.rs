mod prediction;

pub use prediction::Prediction;
