//! Map rendering: turns a filtered view into markers, layers, legend and viewport.

pub mod artifact;
pub mod render;
pub mod tiles;

pub use artifact::{
    Bounds, CircleMarker, ClusterLayer, ControlPosition, HeatLayer, LatLng, LegendEntry,
    MapArtifact, MapControl, Popup, PopupRow, PopupValue, Viewport,
};
pub use render::{CenterMode, RenderOptions, legend, render};
pub use tiles::{BaseMap, TileLayer};
