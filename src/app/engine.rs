//! Reading and writing geographic text
//!
//! [`GeoEngine`] is the seam where a real mapping library would plug in.
//! [`TextEngine`] keeps features as the text they were read from: it can
//! split WKT into geometries, read GeoJSON documents and write either back
//! out, but it does no geometry work.

use crate::host::{Feature, GeoFormat, GeometryKind, HostError};
use serde_json::{Value, json};
use std::fmt;

/// Bounding box of a set of features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Smallest x
    pub min_x: f64,
    /// Smallest y
    pub min_y: f64,
    /// Largest x
    pub max_x: f64,
    /// Largest y
    pub max_y: f64,
}

impl Extent {
    const fn point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn merge(self, other: Option<Self>) -> Self {
        let mut merged = self;
        if let Some(other) = other {
            merged.include(other.min_x, other.min_y);
            merged.include(other.max_x, other.max_y);
        }
        merged
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] - [{}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// Format conversion and spatial queries on features
pub trait GeoEngine: fmt::Debug {
    /// Parse `text` into features
    ///
    /// # Errors
    ///
    /// Returns an error if the format is unsupported or the text malformed
    fn read(&self, format: GeoFormat, text: &str) -> Result<Vec<Feature>, HostError>;

    /// Serialise `features` as `format`
    ///
    /// # Errors
    ///
    /// Returns an error if a feature cannot be written in `format`
    fn write(&self, format: GeoFormat, features: &[Feature]) -> Result<String, HostError>;

    /// Features of `target` inside (or outside) the features of `filter`
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot evaluate spatial predicates
    fn filter(
        &self,
        target: &[Feature],
        filter: &[Feature],
        inside: bool,
    ) -> Result<Vec<Feature>, HostError>;

    /// Bounding box of `features`; `None` if they have no coordinates
    fn extent(&self, features: &[Feature]) -> Option<Extent>;
}

/// Text-only engine
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEngine;

impl GeoEngine for TextEngine {
    fn read(&self, format: GeoFormat, text: &str) -> Result<Vec<Feature>, HostError> {
        match format {
            GeoFormat::Wkt => read_wkt(text),
            GeoFormat::GeoJson => read_geojson(text),
            GeoFormat::Kml | GeoFormat::Gpx => Err(HostError::Unsupported(format)),
        }
    }

    fn write(&self, format: GeoFormat, features: &[Feature]) -> Result<String, HostError> {
        if let Some(foreign) = features.iter().find(|feature| feature.format != format) {
            return Err(match format {
                GeoFormat::Wkt | GeoFormat::GeoJson => HostError::Conversion {
                    from: foreign.format,
                    to: format,
                },
                GeoFormat::Kml | GeoFormat::Gpx => HostError::Unsupported(format),
            });
        }
        match format {
            GeoFormat::Wkt => Ok(features
                .iter()
                .map(|feature| feature.geometry.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            GeoFormat::GeoJson => write_geojson(features),
            GeoFormat::Kml | GeoFormat::Gpx => Err(HostError::Unsupported(format)),
        }
    }

    fn filter(
        &self,
        _target: &[Feature],
        _filter: &[Feature],
        _inside: bool,
    ) -> Result<Vec<Feature>, HostError> {
        Err(HostError::SpatialUnavailable)
    }

    fn extent(&self, features: &[Feature]) -> Option<Extent> {
        features
            .iter()
            .filter_map(|feature| match feature.format {
                GeoFormat::Wkt => wkt_extent(&feature.geometry),
                GeoFormat::GeoJson => serde_json::from_str::<Value>(&feature.geometry)
                    .ok()
                    .and_then(|value| json_extent(&value)),
                GeoFormat::Kml | GeoFormat::Gpx => None,
            })
            .reduce(|acc, extent| acc.merge(Some(extent)))
    }
}

fn parse_error(format: GeoFormat, reason: impl Into<String>) -> HostError {
    HostError::Parse {
        format,
        reason: reason.into(),
    }
}

fn wkt_kind(keyword: &str) -> Option<GeometryKind> {
    let kind = match keyword.to_ascii_uppercase().as_str() {
        "POINT" => GeometryKind::Point,
        "MULTIPOINT" => GeometryKind::MultiPoint,
        "LINESTRING" => GeometryKind::LineString,
        "MULTILINESTRING" => GeometryKind::MultiLineString,
        "POLYGON" => GeometryKind::Polygon,
        "MULTIPOLYGON" => GeometryKind::MultiPolygon,
        "GEOMETRYCOLLECTION" => GeometryKind::Collection,
        _ => return None,
    };
    Some(kind)
}

/// Split WKT text into its top-level geometries
fn read_wkt(text: &str) -> Result<Vec<Feature>, HostError> {
    let mut features = Vec::new();
    let mut current = String::new();
    let mut depth = 0_usize;

    let mut finish = |geometry: &str| -> Result<(), HostError> {
        let geometry = geometry.trim();
        let keyword = geometry
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or_default();
        let kind = wkt_kind(keyword)
            .ok_or_else(|| parse_error(GeoFormat::Wkt, format!("unknown geometry '{keyword}'")))?;
        features.push(Feature::new(kind, GeoFormat::Wkt, geometry));
        Ok(())
    };

    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| parse_error(GeoFormat::Wkt, "unbalanced ')'"))?;
                current.push(c);
                if depth == 0 {
                    finish(&current)?;
                    current.clear();
                }
            }
            ',' | ';' if depth == 0 && current.trim().is_empty() => current.clear(),
            _ => {
                current.push(c);
                if depth == 0 && current.trim_end().to_ascii_uppercase().ends_with(" EMPTY") {
                    finish(&current)?;
                    current.clear();
                }
            }
        }
    }

    if depth > 0 {
        return Err(parse_error(GeoFormat::Wkt, "unbalanced '('"));
    }
    if !current.trim().is_empty() {
        return Err(parse_error(
            GeoFormat::Wkt,
            format!("incomplete geometry '{}'", current.trim()),
        ));
    }
    Ok(features)
}

fn geojson_kind(geometry: &Value) -> Result<GeometryKind, HostError> {
    let kind = match geometry.get("type").and_then(Value::as_str) {
        Some("Point") => GeometryKind::Point,
        Some("MultiPoint") => GeometryKind::MultiPoint,
        Some("LineString") => GeometryKind::LineString,
        Some("MultiLineString") => GeometryKind::MultiLineString,
        Some("Polygon") => GeometryKind::Polygon,
        Some("MultiPolygon") => GeometryKind::MultiPolygon,
        Some("GeometryCollection") => GeometryKind::Collection,
        other => {
            return Err(parse_error(
                GeoFormat::GeoJson,
                format!("unknown geometry type {other:?}"),
            ));
        }
    };
    Ok(kind)
}

fn geojson_feature(feature: Value) -> Result<Feature, HostError> {
    let geometry = feature
        .get("geometry")
        .ok_or_else(|| parse_error(GeoFormat::GeoJson, "feature without geometry"))?;
    let kind = geojson_kind(geometry)?;
    Ok(Feature::new(kind, GeoFormat::GeoJson, feature.to_string()))
}

fn read_geojson(text: &str) -> Result<Vec<Feature>, HostError> {
    let document: Value =
        serde_json::from_str(text).map_err(|err| parse_error(GeoFormat::GeoJson, err.to_string()))?;

    let kind = document
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned);
    match kind.as_deref() {
        Some("FeatureCollection") => match document.get("features") {
            Some(Value::Array(features)) => {
                features.iter().cloned().map(geojson_feature).collect()
            }
            _ => Err(parse_error(
                GeoFormat::GeoJson,
                "feature collection without features",
            )),
        },
        Some("Feature") => Ok(vec![geojson_feature(document)?]),
        Some(_) => {
            let wrapped = json!({ "type": "Feature", "geometry": document, "properties": {} });
            Ok(vec![geojson_feature(wrapped)?])
        }
        None => Err(parse_error(GeoFormat::GeoJson, "document without type")),
    }
}

fn write_geojson(features: &[Feature]) -> Result<String, HostError> {
    let features = features
        .iter()
        .map(|feature| {
            serde_json::from_str::<Value>(&feature.geometry)
                .map_err(|err| parse_error(GeoFormat::GeoJson, err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let collection = json!({ "type": "FeatureCollection", "features": features });
    serde_json::to_string_pretty(&collection)
        .map_err(|err| parse_error(GeoFormat::GeoJson, err.to_string()))
}

/// Coordinates of WKT are the numbers between parentheses, in x y pairs
/// (z and m values are skipped by taking the first two per tuple).
fn wkt_extent(geometry: &str) -> Option<Extent> {
    let mut extent: Option<Extent> = None;
    let body = geometry.find('(').map_or("", |start| &geometry[start..]);
    for tuple in body.split(|c: char| c == ',' || c == '(' || c == ')') {
        let mut numbers = tuple.split_whitespace().map(str::parse::<f64>);
        if let (Some(Ok(x)), Some(Ok(y))) = (numbers.next(), numbers.next()) {
            extent = Some(Extent::point(x, y).merge(extent));
        }
    }
    extent
}

fn json_extent(value: &Value) -> Option<Extent> {
    match value {
        Value::Array(items) => {
            if let (Some(x), Some(y)) = (
                items.first().and_then(Value::as_f64),
                items.get(1).and_then(Value::as_f64),
            ) {
                return Some(Extent::point(x, y));
            }
            items
                .iter()
                .filter_map(json_extent)
                .reduce(|acc, extent| acc.merge(Some(extent)))
        }
        Value::Object(map) => {
            if let Some(coordinates) = map.get("coordinates") {
                return json_extent(coordinates);
            }
            ["geometry", "geometries", "features"]
                .iter()
                .filter_map(|key| map.get(*key))
                .filter_map(json_extent)
                .reduce(|acc, extent| acc.merge(Some(extent)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_wkt_splits_top_level_geometries() -> Result<(), HostError> {
        let features = TextEngine.read(
            GeoFormat::Wkt,
            "POINT(1 1)\nPOLYGON((0 0, 1 0, 1 1, 0 0)), LINESTRING(0 0, 2 2)",
        )?;
        let kinds: Vec<GeometryKind> = features.iter().map(|feature| feature.kind).collect();
        assert_eq!(
            kinds,
            vec![
                GeometryKind::Point,
                GeometryKind::Polygon,
                GeometryKind::LineString
            ]
        );
        assert_eq!(features[1].geometry, "POLYGON((0 0, 1 0, 1 1, 0 0))");
        Ok(())
    }

    #[test]
    fn test_wkt_collection_is_one_feature() -> Result<(), HostError> {
        let features = TextEngine.read(
            GeoFormat::Wkt,
            "GEOMETRYCOLLECTION(POINT(1 2), LINESTRING(0 0, 1 1))",
        )?;
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].kind, GeometryKind::Collection);
        Ok(())
    }

    #[test]
    fn test_wkt_empty_geometry() -> Result<(), HostError> {
        let features = TextEngine.read(GeoFormat::Wkt, "POINT EMPTY POINT(1 1)")?;
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].geometry, "POINT EMPTY");
        Ok(())
    }

    #[rstest]
    #[case("POINT(1 1")]
    #[case("POINT 1 1)")]
    #[case("CIRCLE(1 1)")]
    #[case("hello")]
    fn test_wkt_malformed(#[case] text: &str) {
        assert!(matches!(
            TextEngine.read(GeoFormat::Wkt, text),
            Err(HostError::Parse {
                format: GeoFormat::Wkt,
                ..
            })
        ));
    }

    #[test]
    fn test_geojson_collection() -> Result<(), HostError> {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}, "properties": {"name": "a"}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [3, 4]]}, "properties": {}}
        ]}"#;
        let features = TextEngine.read(GeoFormat::GeoJson, text)?;
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].kind, GeometryKind::Point);
        assert!(features[0].geometry.contains("\"name\":\"a\""));
        Ok(())
    }

    #[test]
    fn test_geojson_bare_geometry_is_wrapped() -> Result<(), HostError> {
        let features = TextEngine.read(
            GeoFormat::GeoJson,
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}"#,
        )?;
        assert_eq!(features[0].kind, GeometryKind::Polygon);
        assert!(features[0].geometry.contains("\"type\":\"Feature\""));
        Ok(())
    }

    #[test]
    fn test_geojson_write_round_trips_properties() -> Result<(), Box<dyn std::error::Error>> {
        let features = TextEngine.read(
            GeoFormat::GeoJson,
            r#"{"type": "Feature", "geometry": {"type": "Point", "coordinates": [5, 6]}, "properties": {"id": 7}}"#,
        )?;
        let written = TextEngine.write(GeoFormat::GeoJson, &features)?;
        let value: Value = serde_json::from_str(&written)?;
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["properties"]["id"], 7);
        Ok(())
    }

    #[test]
    fn test_write_refuses_conversion() -> Result<(), HostError> {
        let features = TextEngine.read(GeoFormat::Wkt, "POINT(1 1)")?;
        assert!(matches!(
            TextEngine.write(GeoFormat::GeoJson, &features),
            Err(HostError::Conversion {
                from: GeoFormat::Wkt,
                to: GeoFormat::GeoJson
            })
        ));
        assert!(matches!(
            TextEngine.write(GeoFormat::Kml, &features),
            Err(HostError::Unsupported(GeoFormat::Kml))
        ));
        Ok(())
    }

    #[test]
    fn test_kml_unsupported() {
        assert!(matches!(
            TextEngine.read(GeoFormat::Kml, "<kml/>"),
            Err(HostError::Unsupported(GeoFormat::Kml))
        ));
    }

    #[test]
    fn test_filter_unavailable() {
        assert!(matches!(
            TextEngine.filter(&[], &[], true),
            Err(HostError::SpatialUnavailable)
        ));
    }

    #[test]
    fn test_extent_over_formats() -> Result<(), HostError> {
        let mut features = TextEngine.read(GeoFormat::Wkt, "POINT(1 1) LINESTRING(-2 3, 4 -5)")?;
        features.extend(TextEngine.read(
            GeoFormat::GeoJson,
            r#"{"type": "Point", "coordinates": [10, 0.5]}"#,
        )?);
        assert_eq!(
            TextEngine.extent(&features),
            Some(Extent {
                min_x: -2.0,
                min_y: -5.0,
                max_x: 10.0,
                max_y: 3.0
            })
        );
        assert_eq!(TextEngine.extent(&[]), None);
        Ok(())
    }
}
