pub mod evaluate;
pub mod human;
pub mod train;

pub use evaluate::{EvaluateMode, VisualizationSpeed};
pub use human::HumanMode;
pub use train::{EpisodeSummary, TrainConfig, TrainMode};
