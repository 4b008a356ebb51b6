//! Filtered records → [`MapArtifact`].

use std::fmt;
use std::str::FromStr;

use opsdash_core::{FilteredView, Record, Status, columns};
use tracing::debug;

use crate::artifact::{
    Bounds, CircleMarker, ClusterLayer, ControlPosition, HeatLayer, LatLng, LegendEntry,
    MapArtifact, MapControl, Popup, PopupRow, PopupValue, Viewport,
};
use crate::tiles::BaseMap;

/// Riyadh; the fallback center when not fitting to data.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 24.7136,
    lng: 46.6753,
};
pub const DEFAULT_ZOOM: u8 = 12;
pub const FIT_PADDING: [u32; 2] = [20, 20];

pub const MARKER_RADIUS: u32 = 6;
pub const MARKER_FILL_OPACITY: f64 = 0.9;
pub const POPUP_MAX_WIDTH: u32 = 360;
pub const CLUSTER_RADIUS: u32 = 80;

pub const HEAT_RADIUS: u32 = 14;
pub const HEAT_BLUR: u32 = 18;
pub const HEAT_MIN_OPACITY: f64 = 0.25;

const LINK_TEXT: &str = "Open in CAFM";

/// Controls added to every map.
pub const CONTROLS: &[MapControl] = &[MapControl::Fullscreen {
    position: ControlPosition::TopLeft,
}];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CenterMode {
    #[default]
    FitToData,
    Default,
}

impl fmt::Display for CenterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FitToData => "fit",
            Self::Default => "default",
        })
    }
}

impl FromStr for CenterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" | "fit-to-data" | "data" => Ok(Self::FitToData),
            "default" | "fixed" | "riyadh" => Ok(Self::Default),
            other => Err(format!("unknown center mode '{other}' (expected fit or default)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub base_map: BaseMap,
    pub heat: bool,
    pub center: CenterMode,
}

/// Build the map for a filtered view. Pure; performs no I/O.
pub fn render(view: &FilteredView<'_>, options: &RenderOptions) -> MapArtifact {
    let dataset = view.dataset();
    let popup_columns: Vec<&str> = dataset
        .columns()
        .iter()
        .map(|c| c.as_str())
        .filter(|c| !columns::is_coordinate(c) && *c != columns::LINK)
        .collect();

    let markers: Vec<CircleMarker> = view
        .records()
        .map(|record| marker(record, &popup_columns))
        .collect();
    let points: Vec<LatLng> = markers.iter().map(|m| m.position).collect();

    let viewport = match (options.center, Bounds::enclosing(points.iter().copied())) {
        (CenterMode::FitToData, Some(bounds)) => Viewport::Fit {
            bounds,
            padding: FIT_PADDING,
        },
        _ => Viewport::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        },
    };

    let heat = (options.heat && !points.is_empty()).then(|| HeatLayer {
        name: "Heatmap",
        points,
        radius: HEAT_RADIUS,
        blur: HEAT_BLUR,
        min_opacity: HEAT_MIN_OPACITY,
    });

    debug!(
        markers = markers.len(),
        heat = heat.is_some(),
        base_map = %options.base_map,
        "rendered map"
    );

    MapArtifact {
        tiles: options.base_map.tile_layer(),
        viewport,
        cluster: ClusterLayer {
            name: "Observations",
            max_cluster_radius: CLUSTER_RADIUS,
            markers,
        },
        heat,
        legend: legend(),
        controls: CONTROLS.to_vec(),
    }
}

/// Static status → color key, identical for every render.
pub fn legend() -> Vec<LegendEntry> {
    Status::ALL
        .iter()
        .map(|s| LegendEntry {
            status: *s,
            label: s.label(),
            color: s.color(),
        })
        .collect()
}

fn marker(record: &Record, popup_columns: &[&str]) -> CircleMarker {
    CircleMarker {
        position: LatLng {
            lat: record.latitude,
            lng: record.longitude,
        },
        status: record.status,
        color: record.status.color(),
        radius: MARKER_RADIUS,
        fill_opacity: MARKER_FILL_OPACITY,
        tooltip: record.identifier().map(str::to_string),
        popup: popup(record, popup_columns),
    }
}

fn popup(record: &Record, popup_columns: &[&str]) -> Popup {
    let mut rows: Vec<PopupRow> = popup_columns
        .iter()
        .map(|col| PopupRow {
            label: col.to_string(),
            value: PopupValue::Text {
                text: record.get(col).unwrap_or_default().trim().to_string(),
            },
        })
        .collect();

    if let Some(href) = record.link() {
        rows.push(PopupRow {
            label: columns::LINK.to_string(),
            value: PopupValue::Link {
                href: href.to_string(),
                text: LINK_TEXT.to_string(),
            },
        });
    }

    Popup {
        rows,
        max_width: POPUP_MAX_WIDTH,
    }
}
