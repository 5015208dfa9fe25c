//! Output formats for decoded and encoded batches

pub mod csv;
pub mod geojson;

pub use self::csv::{read_batch, read_batch_file, write_batch, write_batch_file, write_polygons};
pub use self::geojson::{feature, feature_collection};
