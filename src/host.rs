//! Capabilities the menu actions need from the surrounding application.
//!
//! Actions never see the whole application. They receive a `&mut dyn Host`
//! for the duration of one hook call and talk to it through this trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Geographic data formats the host can read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoFormat {
    /// Well-known text
    Wkt,
    /// GeoJSON
    GeoJson,
    /// Keyhole markup language
    Kml,
    /// GPS exchange format
    Gpx,
}

impl GeoFormat {
    /// Identify a format by file suffix (case-insensitive)
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "wkt" => Some(Self::Wkt),
            "geojson" | "json" => Some(Self::GeoJson),
            "kml" => Some(Self::Kml),
            "gpx" => Some(Self::Gpx),
            _ => None,
        }
    }

    /// File suffix used when exporting
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Wkt => "wkt",
            Self::GeoJson => "geojson",
            Self::Kml => "kml",
            Self::Gpx => "gpx",
        }
    }
}

impl fmt::Display for GeoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wkt => "WKT",
            Self::GeoJson => "GeoJSON",
            Self::Kml => "KML",
            Self::Gpx => "GPX",
        };
        f.write_str(name)
    }
}

/// Which features an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Only the active layer
    ActiveLayer,
    /// Every vector layer
    AllLayers,
}

/// Geometry type of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Single point
    Point,
    /// Several points
    MultiPoint,
    /// Line string
    LineString,
    /// Several line strings
    MultiLineString,
    /// Polygon
    Polygon,
    /// Several polygons
    MultiPolygon,
    /// Circle (drawn only, no text representation)
    Circle,
    /// Mixed collection
    Collection,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::Circle => "Circle",
            Self::Collection => "GeometryCollection",
        };
        f.write_str(name)
    }
}

/// A feature as handed around by the host
///
/// The geometry stays in the encoding it was read in; only the geo engine
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier
    pub id: Uuid,
    /// Geometry type
    pub kind: GeometryKind,
    /// Encoding of `geometry`
    pub format: GeoFormat,
    /// Encoded geometry (and properties, where the format has them)
    pub geometry: String,
}

impl Feature {
    /// Create a feature with a fresh id
    #[must_use]
    pub fn new(kind: GeometryKind, format: GeoFormat, geometry: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            format,
            geometry: geometry.into(),
        }
    }
}

/// Map interactions a modal action can hold open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Draw new features of the given type into the active layer
    Draw(GeometryKind),
    /// Move or reshape existing features
    Modify,
    /// Delete features by selecting them
    Delete,
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw(kind) => write!(f, "draw {kind}"),
            Self::Modify => f.write_str("modify"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Handle for a running interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InteractionId(pub u64);

/// How vector layers are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rasterised while interacting (fast, inaccurate)
    Fast,
    /// Re-rendered on every frame (slow, accurate)
    #[default]
    Precise,
}

/// How dropped or pasted content is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropMode {
    /// Content is geographic data
    #[default]
    Geo,
    /// Content is an image used as point style
    Style,
}

impl fmt::Display for DropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geo => f.write_str("geo"),
            Self::Style => f.write_str("style"),
        }
    }
}

/// Background tile source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSource {
    /// Display name
    pub name: String,
    /// URL template (`{z}`, `{x}`, `{y}`)
    pub url: String,
}

impl TileSource {
    /// Create a tile source
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Failures reported by host capabilities
#[derive(Debug, Error)]
pub enum HostError {
    /// Layer index out of range (indices are 1-based)
    #[error("layer {0} does not exist")]
    NoSuchLayer(usize),
    /// Feature index out of range in the active layer (1-based)
    #[error("feature {0} does not exist in the active layer")]
    NoSuchFeature(usize),
    /// There is no active layer
    #[error("no active layer")]
    NoActiveLayer,
    /// A layer cannot be used to filter itself
    #[error("cannot filter layer {0} by itself")]
    SelfFilter(usize),
    /// Nothing to export
    #[error("no features to export")]
    EmptyExport,
    /// Operation needs features on the active layer
    #[error("active layer has no features")]
    EmptyLayer,
    /// Clustering only applies to point layers
    #[error("layer can only be clustered if it contains only points")]
    ClusterRequiresPoints,
    /// The geo engine cannot handle this format
    #[error("{0} is not supported by the geo engine")]
    Unsupported(GeoFormat),
    /// Features cannot be written in another encoding
    #[error("cannot convert {from} features to {to}")]
    Conversion {
        /// Encoding the features were read in
        from: GeoFormat,
        /// Requested encoding
        to: GeoFormat,
    },
    /// The geo engine has no spatial operations
    #[error("spatial filtering is not available")]
    SpatialUnavailable,
    /// Content could not be parsed
    #[error("failed to read {format}: {reason}")]
    Parse {
        /// Format that was attempted
        format: GeoFormat,
        /// Parser message
        reason: String,
    },
    /// Dropped file is not an image
    #[error("{0} is not an image")]
    NotAnImage(String),
    /// Dropped file has no recognised suffix
    #[error("don't know how to read {0}")]
    UnknownSuffix(String),
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the menu actions may ask of the application
///
/// Layer indices are 1-based. Every call is synchronous.
pub trait Host {
    /// Number of vector layers
    fn layer_count(&self) -> usize;

    /// Index of the active layer, if there is one
    fn active_layer(&self) -> Option<usize>;

    /// Add an empty layer, make it active and return its index
    fn layer_add(&mut self) -> usize;

    /// Delete the active layer
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active layer
    fn layer_delete(&mut self) -> Result<(), HostError>;

    /// Make the layer at `index` active
    ///
    /// # Errors
    ///
    /// Returns `NoSuchLayer` if `index` is out of range
    fn layer_activate(&mut self, index: usize) -> Result<(), HostError>;

    /// Features of the active layer or of all layers
    fn features(&self, scope: ExportScope) -> Vec<Feature>;

    /// Remove the feature at 1-based `index` from the active layer
    ///
    /// # Errors
    ///
    /// Returns an error if the active layer has no such feature
    fn feature_delete(&mut self, index: usize) -> Result<(), HostError>;

    /// Features of layer `target` inside (or outside) the features of layer `filter`
    ///
    /// # Errors
    ///
    /// Returns an error for invalid indices, self-filtering or when spatial
    /// operations are unavailable
    fn filter_features(
        &self,
        target: usize,
        filter: usize,
        inside: bool,
    ) -> Result<Vec<Feature>, HostError>;

    /// Export a collection of features
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is empty or cannot be written
    fn export_features(&mut self, format: GeoFormat, features: &[Feature]) -> Result<(), HostError>;

    /// Start a map interaction on the active layer
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active layer
    fn begin_interaction(&mut self, interaction: Interaction) -> Result<InteractionId, HostError>;

    /// Release a map interaction
    fn end_interaction(&mut self, id: InteractionId);

    /// Fit the view to the active layer's features
    ///
    /// # Errors
    ///
    /// Returns an error if the active layer is empty
    fn zoom_to_active_extent(&mut self) -> Result<(), HostError>;

    /// Replace the background tile source
    fn set_tile_source(&mut self, source: &TileSource);

    /// Toggle point clustering on the active layer, returning the new state
    ///
    /// # Errors
    ///
    /// Returns an error if the layer holds non-point features
    fn toggle_clustering(&mut self, distance: u32) -> Result<bool, HostError>;

    /// Set how all vector layers are rendered
    fn set_render_mode(&mut self, mode: RenderMode);

    /// Use the active layer as clipping mask for the background
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active layer
    fn set_clipping(&mut self, clipping: bool) -> Result<(), HostError>;

    /// Image scale of the active layer's style
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active layer
    fn image_scale(&self) -> Result<f64, HostError>;

    /// Set the image scale of the active layer's style
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active layer
    fn set_image_scale(&mut self, scale: f64) -> Result<(), HostError>;

    /// Use an image (URL or data URL) for points of the active layer
    ///
    /// # Errors
    ///
    /// Returns an error if there is no active layer
    fn set_style_image(&mut self, url: &str) -> Result<(), HostError>;

    /// Set how subsequent drops and pastes are interpreted
    fn set_drop_mode(&mut self, mode: DropMode);

    /// Parse `content` and add the features to the active layer
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed
    fn import_geo(&mut self, format: GeoFormat, content: &str) -> Result<usize, HostError>;

    /// Show or hide the menu help
    fn toggle_help(&mut self);
}
