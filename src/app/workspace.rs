//! In-memory application state behind the menu actions

use super::engine::{Extent, GeoEngine, TextEngine};
use super::export::Exporter;
use super::import::{self, DropOutcome, DropPayload};
use super::style::{ColorCreator, StyleContainer};
use crate::config::Config;
use crate::host::{
    DropMode, ExportScope, Feature, GeoFormat, GeometryKind, Host, HostError, Interaction,
    InteractionId, RenderMode, TileSource,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One vector layer
#[derive(Debug, Clone)]
pub struct Layer {
    /// Stable identifier
    pub id: Uuid,
    /// Features, in insertion order
    pub features: Vec<Feature>,
    /// Colour and point image
    pub style: StyleContainer,
    /// Cluster distance while points are clustered
    pub cluster: Option<u32>,
    /// Whether the layer clips the background tiles
    pub clipping: bool,
}

impl Layer {
    fn new(style: StyleContainer) -> Self {
        Self {
            id: Uuid::new_v4(),
            features: Vec::new(),
            style,
            cluster: None,
            clipping: false,
        }
    }

    /// Whether every feature is a point
    #[must_use]
    pub fn only_points(&self) -> bool {
        self.features
            .iter()
            .all(|feature| matches!(feature.kind, GeometryKind::Point | GeometryKind::MultiPoint))
    }
}

/// Layers, view settings and running interactions
///
/// There is always at least one layer, and one of them is active.
#[derive(Debug)]
pub struct Workspace<E: GeoEngine = TextEngine> {
    layers: Vec<Layer>,
    active: usize,
    colors: ColorCreator,
    tile_source: TileSource,
    render_mode: RenderMode,
    drop_mode: DropMode,
    interactions: Vec<(InteractionId, Interaction)>,
    next_interaction: u64,
    view: Option<Extent>,
    help_visible: bool,
    exporter: Exporter,
    last_export: Option<PathBuf>,
    engine: E,
}

impl Workspace<TextEngine> {
    /// Workspace for `config` using the built-in text engine
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_engine(config, TextEngine)
    }
}

impl<E: GeoEngine> Workspace<E> {
    /// Workspace for `config` using `engine`
    #[must_use]
    pub fn with_engine(config: &Config, engine: E) -> Self {
        let tile_source = config
            .tile_sources
            .first()
            .cloned()
            .unwrap_or_else(|| TileSource::new("none", ""));
        let mut workspace = Self {
            layers: Vec::new(),
            active: 0,
            colors: ColorCreator::default(),
            tile_source,
            render_mode: RenderMode::default(),
            drop_mode: DropMode::default(),
            interactions: Vec::new(),
            next_interaction: 0,
            view: None,
            help_visible: false,
            exporter: Exporter::new(&config.export_dir, &config.export_prefix),
            last_export: None,
            engine,
        };
        workspace.push_layer();
        workspace
    }

    fn push_layer(&mut self) -> usize {
        let style = StyleContainer::new(self.colors.next_color());
        self.layers.push(Layer::new(style));
        self.active = self.layers.len() - 1;
        self.layers.len()
    }

    fn layer_at(&self, index: usize) -> Result<&Layer, HostError> {
        index
            .checked_sub(1)
            .and_then(|i| self.layers.get(i))
            .ok_or(HostError::NoSuchLayer(index))
    }

    fn active_mut(&mut self) -> &mut Layer {
        let last = self.layers.len().saturating_sub(1);
        self.active = self.active.min(last);
        if self.layers.is_empty() {
            self.push_layer();
        }
        &mut self.layers[self.active]
    }

    /// All layers, in index order
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The active layer
    #[must_use]
    pub fn active(&self) -> Option<&Layer> {
        self.layers.get(self.active)
    }

    /// Current background tiles
    #[must_use]
    pub const fn tile_source(&self) -> &TileSource {
        &self.tile_source
    }

    /// Current render mode
    #[must_use]
    pub const fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// How drops and pastes are read
    #[must_use]
    pub const fn drop_mode(&self) -> DropMode {
        self.drop_mode
    }

    /// Interactions currently held open
    #[must_use]
    pub fn interactions(&self) -> &[(InteractionId, Interaction)] {
        &self.interactions
    }

    /// Area the view was last zoomed to
    #[must_use]
    pub const fn view(&self) -> Option<Extent> {
        self.view
    }

    /// Whether the help overlay is shown
    #[must_use]
    pub const fn help_visible(&self) -> bool {
        self.help_visible
    }

    /// Hide the help overlay
    pub const fn hide_help(&mut self) {
        self.help_visible = false;
    }

    /// Path of the most recent export
    #[must_use]
    pub fn last_export(&self) -> Option<&PathBuf> {
        self.last_export.as_ref()
    }

    /// Read dropped or pasted content according to the drop mode
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be used
    pub fn handle_drop(&mut self, payload: &DropPayload) -> Result<DropOutcome, HostError> {
        let mode = self.drop_mode;
        import::handle_drop(mode, payload, self)
    }
}

impl<E: GeoEngine> Host for Workspace<E> {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn active_layer(&self) -> Option<usize> {
        (self.active < self.layers.len()).then_some(self.active + 1)
    }

    fn layer_add(&mut self) -> usize {
        let index = self.push_layer();
        info!(index, "Added layer");
        index
    }

    fn layer_delete(&mut self) -> Result<(), HostError> {
        if self.active >= self.layers.len() {
            return Err(HostError::NoActiveLayer);
        }
        let removed = self.layers.remove(self.active);
        info!(id = %removed.id, features = removed.features.len(), "Deleted layer");
        if self.layers.is_empty() {
            self.push_layer();
        } else {
            self.active = self.active.min(self.layers.len() - 1);
        }
        Ok(())
    }

    fn layer_activate(&mut self, index: usize) -> Result<(), HostError> {
        self.layer_at(index)?;
        self.active = index - 1;
        debug!(index, "Activated layer");
        Ok(())
    }

    fn features(&self, scope: ExportScope) -> Vec<Feature> {
        match scope {
            ExportScope::ActiveLayer => self
                .active()
                .map(|layer| layer.features.clone())
                .unwrap_or_default(),
            ExportScope::AllLayers => self
                .layers
                .iter()
                .flat_map(|layer| layer.features.iter().cloned())
                .collect(),
        }
    }

    fn feature_delete(&mut self, index: usize) -> Result<(), HostError> {
        let layer = self
            .layers
            .get_mut(self.active)
            .ok_or(HostError::NoActiveLayer)?;
        if index == 0 || index > layer.features.len() {
            return Err(HostError::NoSuchFeature(index));
        }
        let removed = layer.features.remove(index - 1);
        info!(index, kind = %removed.kind, "Deleted feature");
        Ok(())
    }

    fn filter_features(
        &self,
        target: usize,
        filter: usize,
        inside: bool,
    ) -> Result<Vec<Feature>, HostError> {
        if target == filter {
            return Err(HostError::SelfFilter(target));
        }
        let target_layer = self.layer_at(target)?;
        let filter_layer = self.layer_at(filter)?;
        self.engine
            .filter(&target_layer.features, &filter_layer.features, inside)
    }

    fn export_features(&mut self, format: GeoFormat, features: &[Feature]) -> Result<(), HostError> {
        if features.is_empty() {
            return Err(HostError::EmptyExport);
        }
        let contents = self.engine.write(format, features)?;
        let path = self.exporter.write(format, &contents)?;
        info!(path = %path.display(), count = features.len(), "Exported");
        self.last_export = Some(path);
        Ok(())
    }

    fn begin_interaction(&mut self, interaction: Interaction) -> Result<InteractionId, HostError> {
        if self.active().is_none() {
            return Err(HostError::NoActiveLayer);
        }
        self.next_interaction += 1;
        let id = InteractionId(self.next_interaction);
        self.interactions.push((id, interaction));
        debug!(id = id.0, %interaction, "Interaction started");
        Ok(id)
    }

    fn end_interaction(&mut self, id: InteractionId) {
        let before = self.interactions.len();
        self.interactions.retain(|(held, _)| *held != id);
        if self.interactions.len() == before {
            debug!(id = id.0, "Ending unknown interaction");
        }
    }

    fn zoom_to_active_extent(&mut self) -> Result<(), HostError> {
        let layer = self.active().ok_or(HostError::NoActiveLayer)?;
        if layer.features.is_empty() {
            return Err(HostError::EmptyLayer);
        }
        let extent = self
            .engine
            .extent(&layer.features)
            .ok_or(HostError::EmptyLayer)?;
        debug!(%extent, "Zoomed to extent");
        self.view = Some(extent);
        Ok(())
    }

    fn set_tile_source(&mut self, source: &TileSource) {
        self.tile_source = source.clone();
    }

    fn toggle_clustering(&mut self, distance: u32) -> Result<bool, HostError> {
        let layer = self.active_mut();
        if !layer.only_points() {
            return Err(HostError::ClusterRequiresPoints);
        }
        layer.cluster = match layer.cluster {
            Some(_) => None,
            None => Some(distance),
        };
        Ok(layer.cluster.is_some())
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    fn set_clipping(&mut self, clipping: bool) -> Result<(), HostError> {
        self.active_mut().clipping = clipping;
        Ok(())
    }

    fn image_scale(&self) -> Result<f64, HostError> {
        self.active()
            .map(|layer| layer.style.image_scale)
            .ok_or(HostError::NoActiveLayer)
    }

    fn set_image_scale(&mut self, scale: f64) -> Result<(), HostError> {
        self.active_mut().style.image_scale = scale;
        Ok(())
    }

    fn set_style_image(&mut self, url: &str) -> Result<(), HostError> {
        self.active_mut().style.image = Some(url.to_string());
        Ok(())
    }

    fn set_drop_mode(&mut self, mode: DropMode) {
        self.drop_mode = mode;
    }

    fn import_geo(&mut self, format: GeoFormat, content: &str) -> Result<usize, HostError> {
        let features = self.engine.read(format, content)?;
        let count = features.len();
        let layer = self.active_mut();
        if layer.cluster.is_some() && !features.iter().all(|f| f.kind == GeometryKind::Point) {
            warn!("Adding non-point features to a clustered layer");
        }
        layer.features.extend(features);
        info!(%format, count, "Imported features");
        Ok(count)
    }

    fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }
}
