pub mod adapter;
pub mod classifier;
pub mod document;
pub mod etl;
pub mod geojson;
pub mod legend;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{FeedData, MapDocument};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
