pub mod config;
pub mod error;
pub mod utils;

#[cfg(test)]
mod tests;

pub use error::GraphError;
pub use utils::date_range::{DateRange, DateRangeSelector};
pub use utils::graph::LineGraphGenerator;
pub use utils::graph::service::LineGraphService;
pub use utils::graph::types::{Background, DataPoint, GraphData, GraphMode, RenderOptions};
pub use utils::mood::MoodRecord;
