pub mod clock;
pub mod date_range;
pub mod files;
pub mod graph;
pub mod mood;
