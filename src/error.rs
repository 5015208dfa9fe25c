//! Error types for ndvi-zone-codec

use std::fmt;
use std::io;

/// Result type for ndvi-zone-codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fixed-width fields whose representable range can be exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Number of zones in a batch (u16)
    ZoneCount,
    /// Scaled mean NDVI (u16)
    MeanNdvi,
    /// Scaled area in hectares (u16)
    AreaHa,
    /// Number of vertices in a zone (u16)
    OffsetCount,
    /// Absolute grid offset (i16)
    Offset,
    /// Delta between consecutive offsets (i16 before zigzag)
    OffsetDelta,
}

impl Field {
    /// Returns the field name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Field::ZoneCount => "zone count",
            Field::MeanNdvi => "mean_ndvi",
            Field::AreaHa => "area_ha",
            Field::OffsetCount => "offset count",
            Field::Offset => "offset",
            Field::OffsetDelta => "offset delta",
        }
    }
}

/// Error types that can occur while encoding or decoding zone batches
#[derive(Debug)]
pub enum Error {
    /// Degenerate or self-intersecting ring, or ring collapse after snapping
    Geometry {
        zone: Option<usize>,
        reason: String,
    },

    /// Value does not fit the width of its wire field
    Range {
        field: Field,
        zone: Option<usize>,
        vertex: Option<usize>,
        value: f64,
    },

    /// Compression, text decoding or structural buffer failure
    Codec(String),

    /// Projection error
    Projection(String),

    /// Invalid configuration value
    Config(String),

    /// I/O error
    Io(io::Error),

    /// JSON (de)serialization error
    Json(serde_json::Error),

    /// CSV (de)serialization error
    Csv(csv::Error),
}

impl Error {
    /// Creates a geometry error without zone context
    pub fn geometry(reason: impl Into<String>) -> Self {
        Error::Geometry {
            zone: None,
            reason: reason.into(),
        }
    }

    /// Creates a range error without zone context
    pub fn range(field: Field, value: f64) -> Self {
        Error::Range {
            field,
            zone: None,
            vertex: None,
            value,
        }
    }

    /// Attaches a zone index to geometry and range errors
    pub fn at_zone(self, index: usize) -> Self {
        match self {
            Error::Geometry { reason, .. } => Error::Geometry {
                zone: Some(index),
                reason,
            },
            Error::Range { field, vertex, value, .. } => Error::Range {
                field,
                zone: Some(index),
                vertex,
                value,
            },
            other => other,
        }
    }

    /// Attaches a vertex index to range errors
    pub fn at_vertex(self, index: usize) -> Self {
        match self {
            Error::Range { field, zone, value, .. } => Error::Range {
                field,
                zone,
                vertex: Some(index),
                value,
            },
            other => other,
        }
    }

    /// Returns the zone index the error refers to, if any
    pub fn zone(&self) -> Option<usize> {
        match self {
            Error::Geometry { zone, .. } | Error::Range { zone, .. } => *zone,
            _ => None,
        }
    }

    /// Returns the vertex index of a range error, if any
    pub fn vertex(&self) -> Option<usize> {
        match self {
            Error::Range { vertex, .. } => *vertex,
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Geometry { zone: Some(zone), reason } => {
                write!(f, "Geometry error in zone {}: {}", zone, reason)
            }
            Error::Geometry { zone: None, reason } => write!(f, "Geometry error: {}", reason),
            Error::Range { field, zone, vertex, value } => {
                write!(f, "Range error")?;
                if let Some(zone) = zone {
                    write!(f, " in zone {}", zone)?;
                }
                if let Some(vertex) = vertex {
                    write!(f, " at vertex {}", vertex)?;
                }
                write!(f, ": {} value {} does not fit its field", field.name(), value)
            }
            Error::Codec(msg) => write!(f, "Codec error: {}", msg),
            Error::Projection(msg) => write!(f, "Projection error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}
