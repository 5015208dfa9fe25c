//! ndvi-zone-codec - Grid snapping and compact binary encoding of vegetation zones
//!
//! ndvi-zone-codec carries NDVI zone polygons over character-limited text
//! channels such as SMS. Polygons are snapped onto a planar grid anchored at
//! a shared reference point, stored as 16-bit cell offsets with per-zone
//! statistics, then compressed and text-encoded. The receiver reverses every
//! step and rebuilds geographic polygons.
//!
//! # Examples
//!
//! ## Encoding a detection run
//!
//! ```no_run
//! use ndvi_zone_codec::{pipeline, Config, DetectionRun};
//!
//! let run: DetectionRun = serde_json::from_str(&std::fs::read_to_string("run.json")?)?;
//! let encoded = pipeline::encode_run(&run, &Config::default())?;
//!
//! println!("{} zones in {} characters", encoded.batch.len(), encoded.payload.len());
//! # Ok::<(), ndvi_zone_codec::Error>(())
//! ```
//!
//! ## Decoding on the receiving side
//!
//! ```no_run
//! use ndvi_zone_codec::{codec, Config};
//!
//! let config = Config::default();
//! let batch = codec::decode("c$@Lk0RR...", &config.codec)?;
//!
//! for zone in batch.reconstruct(&config.grid)? {
//!     println!("NDVI {:.2}, {:.1} ha", zone.mean_ndvi, zone.area_ha);
//! }
//! # Ok::<(), ndvi_zone_codec::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod projection;
pub mod geometry;
pub mod grid;
pub mod wire;
pub mod compression;
pub mod text;
pub mod codec;
pub mod config;
pub mod pipeline;
pub mod message;
pub mod export;
pub mod api;

pub use error::{Error, Field, Result};
pub use types::{
    Batch, BoundingBox, DetectedZone, DetectionRun, GridOffset, ReconstructedZone,
    ReferencePoint, Zone,
};
pub use geometry::Ring;
pub use grid::{offsets_to_polygon, snap, to_offsets, GridConfig, GridFrame};
pub use codec::{decode, pack, CodecConfig, Quantization};
pub use config::Config;
pub use projection::{Coordinate, Projection, ProjectionBackend, UtmZone, ZoneRule};
pub use pipeline::{build_batch, encode_run, encode_runs, ZoneSelection};
