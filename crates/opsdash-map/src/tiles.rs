//! Base tile layers selectable for the map.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
const STADIA_ATTRIBUTION: &str =
    "&copy; Stadia Maps &copy; Stamen Design &copy; OpenMapTiles &copy; OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseMap {
    #[default]
    OpenStreetMap,
    CartoDbPositron,
    StamenTerrain,
    StamenToner,
}

/// A raster tile source in Leaflet `{z}/{x}/{y}` template form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
}

impl BaseMap {
    pub const ALL: [BaseMap; 4] = [
        BaseMap::OpenStreetMap,
        BaseMap::CartoDbPositron,
        BaseMap::StamenTerrain,
        BaseMap::StamenToner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "OpenStreetMap",
            Self::CartoDbPositron => "CartoDB Positron",
            Self::StamenTerrain => "Stamen Terrain",
            Self::StamenToner => "Stamen Toner",
        }
    }

    pub fn tile_layer(&self) -> TileLayer {
        let (url, attribution) = match self {
            Self::OpenStreetMap => (
                "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
            ),
            Self::CartoDbPositron => (
                "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
                "&copy; OpenStreetMap contributors &copy; CARTO",
            ),
            Self::StamenTerrain => (
                "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}{r}.png",
                STADIA_ATTRIBUTION,
            ),
            Self::StamenToner => (
                "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}{r}.png",
                STADIA_ATTRIBUTION,
            ),
        };
        TileLayer {
            name: self.name(),
            url,
            attribution,
        }
    }
}

impl fmt::Display for BaseMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseMap {
    type Err = String;

    /// Accepts display names or compact forms ("osm", "positron", "toner").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "openstreetmap" | "osm" => Ok(Self::OpenStreetMap),
            "cartodbpositron" | "positron" => Ok(Self::CartoDbPositron),
            "stamenterrain" | "terrain" => Ok(Self::StamenTerrain),
            "stamentoner" | "toner" => Ok(Self::StamenToner),
            _ => Err(format!(
                "unknown base map '{s}' (expected one of: {})",
                BaseMap::ALL.map(|b| b.name()).join(", ")
            )),
        }
    }
}
