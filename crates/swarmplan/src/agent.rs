//! Agent records. Plain data; planning reads only the state position.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::mission::Mission;

/// Agent identity (UUID string). Ordered so planning can iterate agents deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        AgentId(s.to_string())
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Agent {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub nick: String,
    #[serde(rename = "URI")]
    pub uri: String,
    #[serde(with = "xyz")]
    pub position: Vector3<f64>,
    pub key: String,
    pub battery: i32,
    pub movement_dimensions: i32,
    pub hardware: Vec<String>,
    pub software: Vec<String>,
}

/// Live state of an agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AgentState {
    #[serde(rename = "ID")]
    pub id: String,
    pub mission: Option<Mission>,
    pub battery: i32,
    #[serde(with = "xyz")]
    pub position: Vector3<f64>,
    pub mission_index: usize,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            uuid: String::new(),
            nick: String::new(),
            uri: String::new(),
            position: Vector3::zeros(),
            key: String::new(),
            battery: 0,
            movement_dimensions: 0,
            hardware: Vec::new(),
            software: Vec::new(),
        }
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            id: String::new(),
            mission: None,
            battery: 0,
            position: Vector3::zeros(),
            mission_index: 0,
        }
    }
}

impl AgentState {
    /// State at a ground position, everything else defaulted.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Vector3::new(x, y, 0.0),
            ..Self::default()
        }
    }

    /// Horizontal position used for distance checks.
    #[inline]
    pub fn location(&self) -> Point {
        Point::new(self.position.x, self.position.y)
    }
}

/// Role of an agent; encoded as `0` (controller) or `1` (context).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AgentType {
    #[default]
    Controller,
    Context,
}

impl TryFrom<u8> for AgentType {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(AgentType::Controller),
            1 => Ok(AgentType::Context),
            other => Err(format!("unknown agent type {other}")),
        }
    }
}

impl From<AgentType> for u8 {
    fn from(t: AgentType) -> Self {
        match t {
            AgentType::Controller => 0,
            AgentType::Context => 1,
        }
    }
}

/// Agent plus its last reported state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AgentHolder {
    pub agent: Agent,
    pub state: AgentState,
    pub last_seen: i64,
    pub agent_type: AgentType,
}

impl AgentHolder {
    pub fn id(&self) -> AgentId {
        AgentId(self.agent.uuid.clone())
    }

    /// The `(id, state)` pair planning operates on.
    pub fn entry(&self) -> (AgentId, AgentState) {
        (self.id(), self.state.clone())
    }
}

/// Positions as `{"X": .., "Y": .., "Z": ..}` objects.
mod xyz {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Xyz {
        x: f64,
        y: f64,
        z: f64,
    }

    pub fn serialize<S: Serializer>(v: &Vector3<f64>, s: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vector3<f64>, D::Error> {
        let Xyz { x, y, z } = Xyz::deserialize(d)?;
        Ok(Vector3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_json_uses_wire_names() {
        let raw = r#"{
            "Agent": {"UUID": "ALL", "Nick": "a1", "Position": {"X": 1.0, "Y": 2.0, "Z": 3.0}},
            "State": {"ID": "s1", "Position": {"X": 10.2, "Y": 56.1, "Z": 30.0}, "MissionIndex": 2},
            "LastSeen": 1700000000,
            "AgentType": 0
        }"#;
        let h: AgentHolder = serde_json::from_str(raw).unwrap();
        assert_eq!(h.id(), AgentId::from("ALL"));
        assert_eq!(h.agent.nick, "a1");
        assert_eq!(h.agent.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(h.state.location(), Point::new(10.2, 56.1));
        assert_eq!(h.state.mission_index, 2);
        assert_eq!(h.last_seen, 1_700_000_000);
        assert_eq!(h.agent_type, AgentType::Controller);
        let (id, state) = h.entry();
        assert_eq!(id.to_string(), "ALL");
        assert_eq!(state.position.z, 30.0);
    }

    #[test]
    fn agent_type_is_an_integer() {
        let raw = r#"{"State": {"Position": {"X": 0.5, "Y": 0.0}}, "AgentType": 1}"#;
        let h: AgentHolder = serde_json::from_str(raw).unwrap();
        assert_eq!(h.agent_type, AgentType::Context);
        assert_eq!(h.state.position.z, 0.0);

        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["AgentType"], 1);
        assert_eq!(v["State"]["Position"], serde_json::json!({"X": 0.5, "Y": 0.0, "Z": 0.0}));

        let err = serde_json::from_str::<AgentHolder>(r#"{"AgentType": 7}"#).unwrap_err();
        assert!(err.to_string().contains("unknown agent type 7"));
    }
}
