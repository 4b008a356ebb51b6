//! Serialisable description of a rendered map.
//!
//! The shapes follow Leaflet's vocabulary (circle markers, a
//! markercluster group, a heat layer) so a widget can replay them directly.

use opsdash_core::{Color, Status};
use serde::Serialize;

use crate::tiles::TileLayer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest box containing every point; `None` for no points.
    pub fn enclosing(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    south_west: p,
                    north_east: p,
                },
                Some(b) => Bounds {
                    south_west: LatLng {
                        lat: b.south_west.lat.min(p.lat),
                        lng: b.south_west.lng.min(p.lng),
                    },
                    north_east: LatLng {
                        lat: b.north_east.lat.max(p.lat),
                        lng: b.north_east.lng.max(p.lng),
                    },
                },
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    /// Fit the map to `bounds`, leaving `padding` pixels (x, y) around them.
    Fit { bounds: Bounds, padding: [u32; 2] },
    Center { center: LatLng, zoom: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PopupValue {
    Text { text: String },
    Link { href: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupRow {
    pub label: String,
    pub value: PopupValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub rows: Vec<PopupRow>,
    pub max_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub status: Status,
    pub color: Color,
    pub radius: u32,
    pub fill_opacity: f64,
    pub tooltip: Option<String>,
    pub popup: Popup,
}

/// Markers grouped so dense areas collapse at low zoom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterLayer {
    pub name: &'static str,
    /// Pixel radius within which markers merge into a cluster.
    pub max_cluster_radius: u32,
    pub markers: Vec<CircleMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatLayer {
    pub name: &'static str,
    pub points: Vec<LatLng>,
    pub radius: u32,
    pub blur: u32,
    pub min_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub status: Status,
    pub label: &'static str,
    pub color: Color,
}

/// Corner of the map a control is docked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Interactive widget controls layered over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapControl {
    Fullscreen { position: ControlPosition },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapArtifact {
    pub tiles: TileLayer,
    pub viewport: Viewport,
    pub cluster: ClusterLayer,
    pub heat: Option<HeatLayer>,
    pub legend: Vec<LegendEntry>,
    pub controls: Vec<MapControl>,
}

impl MapArtifact {
    pub fn markers(&self) -> &[CircleMarker] {
        &self.cluster.markers
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
