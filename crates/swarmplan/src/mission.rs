//! Mission records and their JSON encoding.
//!
//! Wire format
//! - PascalCase keys (`Description`, `MissionType`, `AreaLink`, `MetaNeeded`,
//!   `Goal`, `Geometry`, `SwarmGeometry`).
//! - `Geometry`/`SwarmGeometry` are polygon coordinate arrays `[[[x, y], ...]]`.
//!   Encoding a non-polygon geometry is an error rather than a lossy conversion.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::geojson;
use crate::geom::{Geometry, Polygon};

/// Sub-area mission handed to one agent; same record as its parent.
pub type SubMission = Mission;

/// Free-form mission classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionType(pub String);

impl MissionType {
    pub const FIND: &'static str = "find";

    pub fn find() -> Self {
        MissionType(Self::FIND.to_string())
    }
}

impl From<&str> for MissionType {
    fn from(s: &str) -> Self {
        MissionType(s.to_string())
    }
}

/// Capabilities an agent needs for the mission.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MetaNeeded {
    pub movement_axis: i32,
    #[serde(rename = "SwarmSW")]
    pub swarm_sw: Vec<String>,
    #[serde(rename = "OnboardHW")]
    pub onboard_hw: Vec<String>,
    pub data_collection: String,
}

/// Start and end conditions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Goal {
    #[serde(rename = "Do")]
    pub start: String,
    pub end: String,
    pub endgame: String,
    pub reached: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mission {
    pub description: String,
    pub mission_type: MissionType,
    #[serde(default)]
    pub area_link: String,
    #[serde(default)]
    pub meta_needed: MetaNeeded,
    #[serde(default)]
    pub goal: Goal,
    /// Missing or `null` decodes to an empty polygon; planning rejects it later.
    #[serde(default = "empty_polygon", with = "polygon_coords")]
    pub geometry: Geometry,
    /// Whole-swarm area; carried through planning untouched.
    #[serde(
        default,
        with = "opt_polygon_coords",
        skip_serializing_if = "Option::is_none"
    )]
    pub swarm_geometry: Option<Geometry>,
}

impl Mission {
    pub fn new(description: impl Into<String>, mission_type: MissionType, geometry: Geometry) -> Self {
        Self {
            description: description.into(),
            mission_type,
            area_link: String::new(),
            meta_needed: MetaNeeded::default(),
            goal: Goal::default(),
            geometry,
            swarm_geometry: None,
        }
    }

    /// Copy of this mission with another geometry.
    pub fn with_geometry(&self, geometry: Geometry) -> SubMission {
        Mission {
            geometry,
            ..self.clone()
        }
    }

    /// Replace the geometry with the one stored in a GeoJSON file
    /// (Feature, single-feature FeatureCollection, or bare Geometry).
    pub fn load_features(&mut self, path: impl AsRef<Path>) -> Result<(), PlanError> {
        self.geometry = geojson::load_geometry(path)?;
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D - {}  Geometry - {}", self.description, self.geometry)?;
        if let Some(g) = &self.swarm_geometry {
            write!(f, " SwarmGeometry - {g}")?;
        }
        Ok(())
    }
}

fn empty_polygon() -> Geometry {
    Geometry::Polygon(Polygon::default())
}

mod polygon_coords {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::geojson::{polygon_from_rings, polygon_rings, Rings};
    use crate::geom::Geometry;

    pub fn serialize<S: Serializer>(g: &Geometry, s: S) -> Result<S::Ok, S::Error> {
        match g {
            Geometry::Polygon(p) => polygon_rings(p).serialize(s),
            other => Err(S::Error::custom(format!(
                "mission geometry must be a Polygon, found {}",
                other.kind()
            ))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Geometry, D::Error> {
        match Option::<Rings>::deserialize(d)? {
            Some(rings) => polygon_from_rings(rings)
                .map(Geometry::Polygon)
                .map_err(D::Error::custom),
            None => Ok(super::empty_polygon()),
        }
    }
}

mod opt_polygon_coords {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::geojson::{polygon_from_rings, Rings};
    use crate::geom::Geometry;

    pub fn serialize<S: Serializer>(g: &Option<Geometry>, s: S) -> Result<S::Ok, S::Error> {
        match g {
            Some(g) => super::polygon_coords::serialize(g, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Geometry>, D::Error> {
        match Option::<Rings>::deserialize(d)? {
            Some(rings) => polygon_from_rings(rings)
                .map(|p| Some(Geometry::Polygon(p)))
                .map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
