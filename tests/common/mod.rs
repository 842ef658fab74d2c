//! Common test utilities shared across integration tests

use karte::action::{ActionError, Describe, Modal, OneShot};
use karte::config::ReservedKeys;
use karte::host::{
    DropMode, ExportScope, Feature, GeoFormat, Host, HostError, Interaction, InteractionId,
    RenderMode, TileSource,
};
use karte::menu::{ActionMap, Branch, KeyPress, KeyboardMenu, Navigation};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, append-only log of strings
pub type Log = Rc<RefCell<Vec<String>>>;

/// Host that records every request as a string
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub layers: usize,
    pub active: Option<usize>,
    pub calls: Vec<String>,
    pub features: Vec<Feature>,
    next_interaction: u64,
}

impl RecordingHost {
    pub fn with_layers(layers: usize) -> Self {
        Self {
            layers,
            active: (layers > 0).then_some(layers),
            ..Self::default()
        }
    }
}

impl Host for RecordingHost {
    fn layer_count(&self) -> usize {
        self.layers
    }

    fn active_layer(&self) -> Option<usize> {
        self.active
    }

    fn layer_add(&mut self) -> usize {
        self.calls.push("layer_add".to_string());
        self.layers += 1;
        self.active = Some(self.layers);
        self.layers
    }

    fn layer_delete(&mut self) -> Result<(), HostError> {
        self.calls.push("layer_delete".to_string());
        Ok(())
    }

    fn layer_activate(&mut self, index: usize) -> Result<(), HostError> {
        self.calls.push(format!("layer_activate({index})"));
        if index == 0 || index > self.layers {
            return Err(HostError::NoSuchLayer(index));
        }
        self.active = Some(index);
        Ok(())
    }

    fn features(&self, _scope: ExportScope) -> Vec<Feature> {
        self.features.clone()
    }

    fn feature_delete(&mut self, index: usize) -> Result<(), HostError> {
        self.calls.push(format!("feature_delete({index})"));
        if index == 0 || index > self.features.len() {
            return Err(HostError::NoSuchFeature(index));
        }
        self.features.remove(index - 1);
        Ok(())
    }

    fn filter_features(
        &self,
        target: usize,
        filter: usize,
        _inside: bool,
    ) -> Result<Vec<Feature>, HostError> {
        if target == filter {
            return Err(HostError::SelfFilter(target));
        }
        Err(HostError::SpatialUnavailable)
    }

    fn export_features(&mut self, format: GeoFormat, features: &[Feature]) -> Result<(), HostError> {
        self.calls.push(format!("export({format}, {})", features.len()));
        if features.is_empty() {
            return Err(HostError::EmptyExport);
        }
        Ok(())
    }

    fn begin_interaction(&mut self, interaction: Interaction) -> Result<InteractionId, HostError> {
        self.calls.push(format!("begin({interaction})"));
        self.next_interaction += 1;
        Ok(InteractionId(self.next_interaction))
    }

    fn end_interaction(&mut self, id: InteractionId) {
        self.calls.push(format!("end({})", id.0));
    }

    fn zoom_to_active_extent(&mut self) -> Result<(), HostError> {
        self.calls.push("zoom".to_string());
        Ok(())
    }

    fn set_tile_source(&mut self, source: &TileSource) {
        self.calls.push(format!("tile({})", source.name));
    }

    fn toggle_clustering(&mut self, distance: u32) -> Result<bool, HostError> {
        self.calls.push(format!("cluster({distance})"));
        Ok(true)
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        self.calls.push(format!("render({mode:?})"));
    }

    fn set_clipping(&mut self, clipping: bool) -> Result<(), HostError> {
        self.calls.push(format!("clipping({clipping})"));
        Ok(())
    }

    fn image_scale(&self) -> Result<f64, HostError> {
        Ok(1.0)
    }

    fn set_image_scale(&mut self, scale: f64) -> Result<(), HostError> {
        self.calls.push(format!("image_scale({scale})"));
        Ok(())
    }

    fn set_style_image(&mut self, url: &str) -> Result<(), HostError> {
        self.calls.push(format!("style_image({url})"));
        Ok(())
    }

    fn set_drop_mode(&mut self, mode: DropMode) {
        self.calls.push(format!("drop_mode({mode})"));
    }

    fn import_geo(&mut self, format: GeoFormat, content: &str) -> Result<usize, HostError> {
        self.calls.push(format!("import({format}, {content})"));
        Ok(1)
    }

    fn toggle_help(&mut self) {
        self.calls.push("help".to_string());
    }
}

/// Modal action that logs its lifecycle hooks
#[derive(Debug)]
pub struct ProbeModal {
    name: &'static str,
    log: Log,
}

impl ProbeModal {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}.{hook}", self.name));
    }
}

impl Describe for ProbeModal {
    fn label(&self) -> String {
        self.name.to_string()
    }
}

impl Modal for ProbeModal {
    fn start(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.record("start");
        Ok(())
    }

    fn handle_key(&mut self, key: &KeyPress, _host: &mut dyn Host) {
        self.record(&format!("key({})", key.key()));
    }

    fn stop(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.record("stop");
        Ok(())
    }

    fn abort(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.record("abort");
        Ok(())
    }
}

/// One-shot action that logs each start
#[derive(Debug)]
pub struct ProbeOneShot {
    name: &'static str,
    log: Log,
}

impl ProbeOneShot {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl Describe for ProbeOneShot {
    fn label(&self) -> String {
        self.name.to_string()
    }
}

impl OneShot for ProbeOneShot {
    fn start(&mut self, _host: &mut dyn Host) -> Result<(), ActionError> {
        self.log.borrow_mut().push(format!("{}.start", self.name));
        Ok(())
    }
}

/// What the menu reported through its callbacks
#[derive(Debug, Default)]
pub struct Signals {
    pub feedback: Vec<bool>,
    pub navigation: Vec<Navigation>,
}

/// Menu over `root` with the default reserved keys, wired to a [`Signals`] log
pub fn menu_with_signals(
    root: Branch,
) -> Result<(KeyboardMenu, Rc<RefCell<Signals>>), Box<dyn std::error::Error>> {
    let keys = ReservedKeys::default();
    let map = ActionMap::new(root, &keys)?;
    let signals = Rc::new(RefCell::new(Signals::default()));
    let feedback = Rc::clone(&signals);
    let navigation = Rc::clone(&signals);
    let menu = KeyboardMenu::new(map, keys)
        .with_feedback(move |success| feedback.borrow_mut().feedback.push(success))
        .with_navigation_changed(move |nav| navigation.borrow_mut().navigation.push(nav.clone()));
    Ok((menu, signals))
}

/// Press `key` and return the feedback value
pub fn press(menu: &mut KeyboardMenu, host: &mut dyn Host, key: &str) -> bool {
    menu.handle_keypress(&mut KeyPress::new(key), host)
}
