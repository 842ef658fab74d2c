//! The command tree the application ships with

use super::tree::{ActionMap, Branch, TreeError};
use crate::action::{
    Action, DropModeAction, ExportAction, FeatureAddAction, FeatureDeleteAction,
    FeatureFilterAction, FeatureModifyAction, HelpAction, LayerAddAction, LayerDeleteAction,
    LayerSelectAction, StyleImageScaleAction, ViewClippingAction, ViewClusterToggleAction,
    ViewExtentAction, ViewPerformanceAction, ViewTileAction,
};
use crate::config::{Config, ReservedKeys};
use crate::host::{DropMode, ExportScope, GeoFormat, GeometryKind, RenderMode, TileSource};
use tracing::warn;

/// Build the default command tree for `config`
///
/// # Errors
///
/// Returns an error if a configured reserved key is a single letter the
/// tree already uses
pub fn default_action_map(config: &Config) -> Result<ActionMap, TreeError> {
    let export = |scope| {
        Branch::new()
            .entry('g', Action::one_shot(ExportAction::new(GeoFormat::GeoJson, scope)))
            .entry('k', Action::one_shot(ExportAction::new(GeoFormat::Kml, scope)))
            .entry('w', Action::one_shot(ExportAction::new(GeoFormat::Wkt, scope)))
    };

    let mut view = Branch::new()
        .entry('e', Action::one_shot(ViewExtentAction))
        .entry(
            'c',
            Action::one_shot(ViewClusterToggleAction::new(config.cluster_distance)),
        )
        .entry(
            'k',
            Branch::new()
                .entry('c', Action::one_shot(ViewClippingAction::new(true)))
                .entry('n', Action::one_shot(ViewClippingAction::new(false))),
        );
    let tiles = tile_branch(&config.tile_sources, &config.keys);
    if !tiles.is_empty() {
        view.insert('t', tiles);
    }

    let root = Branch::new()
        .entry('h', Action::one_shot(HelpAction))
        .entry(
            's',
            Branch::new()
                .entry('f', Action::one_shot(ViewPerformanceAction::new(RenderMode::Fast)))
                .entry('p', Action::one_shot(ViewPerformanceAction::new(RenderMode::Precise))),
        )
        .entry(
            'e',
            Branch::new()
                .entry('a', export(ExportScope::AllLayers))
                .entry('c', export(ExportScope::ActiveLayer)),
        )
        .entry('l', Action::modal(LayerSelectAction::new()))
        .entry(
            'i',
            Branch::new()
                .entry('l', Action::one_shot(LayerAddAction))
                .entry('s', Action::modal(FeatureAddAction::new(GeometryKind::Point)))
                .entry('p', Action::modal(FeatureAddAction::new(GeometryKind::Polygon)))
                .entry('c', Action::modal(FeatureAddAction::new(GeometryKind::Circle)))
                .entry('n', Action::modal(FeatureAddAction::new(GeometryKind::LineString))),
        )
        .entry('m', Action::modal(FeatureModifyAction::default()))
        .entry(
            'd',
            Branch::new()
                .entry('l', Action::one_shot(LayerDeleteAction))
                .entry('f', Action::modal(FeatureDeleteAction::default())),
        )
        .entry(
            'f',
            Branch::new()
                .entry('i', Action::modal(FeatureFilterAction::new(true)))
                .entry('o', Action::modal(FeatureFilterAction::new(false))),
        )
        .entry('v', view)
        .entry(
            'y',
            Branch::new()
                .entry(
                    '+',
                    Action::one_shot(StyleImageScaleAction::new(config.image_scale_step)),
                )
                .entry(
                    '-',
                    Action::one_shot(StyleImageScaleAction::new(-config.image_scale_step)),
                ),
        )
        .entry(
            'p',
            Branch::new()
                .entry('g', Action::one_shot(DropModeAction::new(DropMode::Geo)))
                .entry('s', Action::one_shot(DropModeAction::new(DropMode::Style))),
        );

    ActionMap::new(root, &config.keys)
}

/// One entry per tile source, keyed by the first unused letter of its name
fn tile_branch(sources: &[TileSource], keys: &ReservedKeys) -> Branch {
    let mut branch = Branch::new();
    for source in sources {
        let key = source
            .name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .find(|c| !branch.contains(*c) && !keys.collides(*c));
        match key {
            Some(key) => branch.insert(key, Action::one_shot(ViewTileAction::new(source.clone()))),
            None => warn!(name = %source.name, "No free key for tile source; skipping"),
        }
    }
    branch
}
