// Whitelist-based reduction of a decoded save before serialization.
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// World save (`Level.sav`)
    Server,
    /// Per-player save (`Players/<guid>.sav`)
    Player,
}

impl SaveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveMode::Server => "server",
            SaveMode::Player => "player",
        }
    }

    /// Keys kept under `properties`.
    pub fn top_level_keys(self) -> &'static [&'static str] {
        match self {
            SaveMode::Server => &["worldSaveData", "Timestamp"],
            SaveMode::Player => &["SaveData"],
        }
    }

    /// The one aggregate below `properties` that gets a second pass.
    pub fn nested_aggregate(self) -> &'static str {
        match self {
            SaveMode::Server => "worldSaveData",
            SaveMode::Player => "SaveData",
        }
    }

    pub fn nested_keys(self) -> &'static [&'static str] {
        match self {
            SaveMode::Server => &[
                "GameTimeSaveData",
                "CharacterSaveParameterMap",
                "ItemContainerSaveData",
                "CharacterContainerSaveData",
                "GroupSaveDataMap",
                "BaseCampSaveData",
                "DungeonSaveData",
                "DungeonPointMarkerSaveData",
            ],
            SaveMode::Player => &[
                "PlayerUId",
                "IndividualId",
                "OtomoCharacterContainerId",
                "InventoryInfo",
                "TechnologyPoint",
                "bossTechnologyPoint",
                "PalStorageContainerId",
            ],
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode '{}', expected 'server' or 'player'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for SaveMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(SaveMode::Server),
            "player" => Ok(SaveMode::Player),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Request-level selector: no mode means the raw decoded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSelector {
    #[default]
    Raw,
    Mode(SaveMode),
}

impl ModeSelector {
    pub fn parse(mode: Option<&str>) -> Result<Self, UnknownMode> {
        match mode {
            None => Ok(ModeSelector::Raw),
            Some(s) => s.parse().map(ModeSelector::Mode),
        }
    }
}

/// Returns a copy of `doc` reduced to the whitelist of `mode`.
///
/// Top-level keys other than `properties` are kept. A missing or non-object
/// container leaves that branch as it was.
pub fn pruned(doc: &Value, mode: SaveMode) -> Value {
    let Some(root) = doc.as_object() else {
        return doc.clone();
    };
    let mut out = Map::with_capacity(root.len());
    for (key, val) in root {
        if key == "properties" {
            out.insert(key.clone(), prune_properties(val, mode));
        } else {
            out.insert(key.clone(), val.clone());
        }
    }
    Value::Object(out)
}

fn prune_properties(props: &Value, mode: SaveMode) -> Value {
    let Some(props) = props.as_object() else {
        return props.clone();
    };
    let mut kept = keep_only(props, mode.top_level_keys());
    if let Some(Value::Object(aggregate)) = kept.get_mut(mode.nested_aggregate())
        && let Some(Value::Object(inner)) = aggregate.get("value")
    {
        let reduced = keep_only(inner, mode.nested_keys());
        aggregate.insert("value".to_string(), Value::Object(reduced));
    }
    Value::Object(kept)
}

fn keep_only(map: &Map<String, Value>, allowed: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| allowed.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
