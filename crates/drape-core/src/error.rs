//! Error types for fitting operations with rich diagnostics.
//!
//! This module provides error handling with:
//! - Machine-readable error codes for programmatic handling
//! - Rich context (which vertex, which measurement, what went wrong)
//! - Terminal display via miette
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `FIT-XXXX`:
//! - `FIT-1xxx`: I/O errors (file reading, writing, parsing)
//! - `FIT-2xxx`: Mesh validation errors (topology, coordinates, geometry)
//! - `FIT-3xxx`: Analysis errors (regions, measurements, size charts)

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Machine-readable error codes for fitting operations.
///
/// Codes follow the pattern `FIT-XXXX` where:
/// - 1xxx = I/O errors
/// - 2xxx = Mesh validation errors
/// - 3xxx = Analysis errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitErrorCode {
    // I/O errors (1xxx)
    /// FIT-1001: Failed to read file
    IoRead = 1001,
    /// FIT-1002: Failed to write file
    IoWrite = 1002,
    /// FIT-1003: Failed to parse file format
    ParseError = 1003,
    /// FIT-1004: Unsupported file format
    UnsupportedFormat = 1004,

    // Mesh validation errors (2xxx)
    /// FIT-2001: Mesh has no triangle index
    InvalidMesh = 2001,
    /// FIT-2002: Face references invalid vertex index
    InvalidVertexIndex = 2002,
    /// FIT-2003: Vertex has NaN or Infinity coordinate
    InvalidCoordinate = 2003,
    /// FIT-2004: Body bounding box has zero or near-zero extent
    DegenerateGeometry = 2004,

    // Analysis errors (3xxx)
    /// FIT-3001: Region selection produced no geometry
    EmptyRegion = 3001,
    /// FIT-3002: Required measurement is absent
    MissingMeasurement = 3002,
    /// FIT-3003: Size chart has no entries
    EmptySizeChart = 3003,
}

impl FitErrorCode {
    /// Returns the error code as a string in the format `FIT-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FitErrorCode::IoRead => "FIT-1001",
            FitErrorCode::IoWrite => "FIT-1002",
            FitErrorCode::ParseError => "FIT-1003",
            FitErrorCode::UnsupportedFormat => "FIT-1004",
            FitErrorCode::InvalidMesh => "FIT-2001",
            FitErrorCode::InvalidVertexIndex => "FIT-2002",
            FitErrorCode::InvalidCoordinate => "FIT-2003",
            FitErrorCode::DegenerateGeometry => "FIT-2004",
            FitErrorCode::EmptyRegion => "FIT-3001",
            FitErrorCode::MissingMeasurement => "FIT-3002",
            FitErrorCode::EmptySizeChart => "FIT-3003",
        }
    }
}

impl std::fmt::Display for FitErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during fitting operations.
///
/// Each error variant includes a human-readable message, a machine-readable
/// error code, and enough context (stage, offending invariant) for the
/// caller to decide whether to retry with different inputs.
#[derive(Debug, Error, Diagnostic)]
pub enum FitError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}")]
    #[diagnostic(
        code(fit::io::read),
        help("Check that the file exists and is readable")
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(fit::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a mesh file.
    #[error("failed to parse mesh from {path}: {details}")]
    #[diagnostic(
        code(fit::parse::error),
        help("The file may be corrupted or in an unsupported OBJ variant")
    )]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(
        code(fit::format::unsupported),
        help("Supported format: OBJ. Convert the body-service export first.")
    )]
    UnsupportedFormat { extension: Option<String> },

    /// Mesh lacking a triangle index was passed to a stage requiring one.
    #[error("invalid mesh in {stage}: {details}")]
    #[diagnostic(
        code(fit::mesh::invalid),
        help("Region selection, adjacency, and smoothing require an indexed triangle mesh")
    )]
    InvalidMesh {
        stage: &'static str,
        details: String,
    },

    /// Invalid vertex index in face data.
    #[error(
        "invalid vertex index: face {face_index} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(fit::mesh::vertex_index),
        help("Check the mesh export settings of the body-model service")
    )]
    InvalidVertexIndex {
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Invalid coordinate value (NaN or Infinity).
    #[error("invalid coordinate at vertex {vertex_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(fit::mesh::coordinate),
        help("Check for numerical issues in the source data")
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    /// Body bounding box has zero or near-zero height/width.
    #[error("degenerate body geometry: {dimension} extent is {extent:.2e} m")]
    #[diagnostic(
        code(fit::mesh::degenerate),
        help(
            "Every pipeline stage divides by the body height and width; a flat or empty body mesh cannot be fitted"
        )
    )]
    DegenerateGeometry {
        dimension: &'static str,
        extent: f64,
    },

    /// Region selection kept no geometry.
    #[error("region selection produced no geometry: {details}")]
    #[diagnostic(
        code(fit::region::empty),
        help("The torso band may not intersect the body mesh; check units (meters, y-up)")
    )]
    EmptyRegion { details: String },

    /// A required body measurement is absent.
    #[error("missing required body measurement: {field}")]
    #[diagnostic(
        code(fit::measurement::missing),
        help("Chest is required for fit analysis; waist and shoulder width may be estimated")
    )]
    MissingMeasurement { field: &'static str },

    /// The size chart has no entries.
    #[error("size chart is empty")]
    #[diagnostic(
        code(fit::sizing::empty_chart),
        help("At least one candidate size is required to recommend a size")
    )]
    EmptySizeChart,
}

impl FitError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> FitErrorCode {
        match self {
            FitError::IoRead { .. } => FitErrorCode::IoRead,
            FitError::IoWrite { .. } => FitErrorCode::IoWrite,
            FitError::ParseError { .. } => FitErrorCode::ParseError,
            FitError::UnsupportedFormat { .. } => FitErrorCode::UnsupportedFormat,
            FitError::InvalidMesh { .. } => FitErrorCode::InvalidMesh,
            FitError::InvalidVertexIndex { .. } => FitErrorCode::InvalidVertexIndex,
            FitError::InvalidCoordinate { .. } => FitErrorCode::InvalidCoordinate,
            FitError::DegenerateGeometry { .. } => FitErrorCode::DegenerateGeometry,
            FitError::EmptyRegion { .. } => FitErrorCode::EmptyRegion,
            FitError::MissingMeasurement { .. } => FitErrorCode::MissingMeasurement,
            FitError::EmptySizeChart => FitErrorCode::EmptySizeChart,
        }
    }

    // Constructor helpers for common error patterns

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FitError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FitError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        FitError::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an InvalidMesh error with stage context.
    pub fn invalid_mesh(stage: &'static str, details: impl Into<String>) -> Self {
        FitError::InvalidMesh {
            stage,
            details: details.into(),
        }
    }

    /// Create an InvalidVertexIndex error.
    pub fn invalid_vertex_index(face_index: usize, vertex_index: u32, vertex_count: usize) -> Self {
        FitError::InvalidVertexIndex {
            face_index,
            vertex_index,
            vertex_count,
        }
    }

    /// Create a DegenerateGeometry error.
    pub fn degenerate_geometry(dimension: &'static str, extent: f64) -> Self {
        FitError::DegenerateGeometry { dimension, extent }
    }

    /// Create an EmptyRegion error.
    pub fn empty_region(details: impl Into<String>) -> Self {
        FitError::EmptyRegion {
            details: details.into(),
        }
    }

    /// Create a MissingMeasurement error.
    pub fn missing_measurement(field: &'static str) -> Self {
        FitError::MissingMeasurement { field }
    }
}
