//! Flat, owned records projected out of a decoded save.
//!
//! Every scalar is optional and serializes as `null` when its source path was
//! absent. Collections are always present and default to empty.
//!
//! Non-finite floats serialize as `{"$float": ..}` markers so that the JSON
//! writer can apply the caller's NaN policy to projected output too.
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::json::float_value;

fn float_or_marker<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(f) if !f.is_finite() => float_value(*f).serialize(s),
        Some(f) => s.serialize_f64(*f),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatPoint {
    pub name: Option<String>,
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Character {
    pub nickname: Option<String>,
    pub filtered_nickname: Option<String>,
    pub is_player: Option<bool>,
    pub player_id: Option<String>,
    pub instance_id: Option<String>,
    pub level: Option<i64>,
    pub exp: Option<i64>,
    pub hp: Option<i64>,
    #[serde(serialize_with = "float_or_marker")]
    pub full_stomach: Option<f64>,
    pub stats: Vec<StatPoint>,
    pub group_id: Option<String>,
    pub added_stats: Vec<StatPoint>,
    pub character_id: Option<String>,
    pub gender: Option<String>,
    pub equip_waza: Vec<Value>,
    #[serde(rename = "TalentHP")]
    pub talent_hp: Option<i64>,
    pub talent_shot: Option<i64>,
    pub talent_defense: Option<i64>,
    pub passive_skill_list: Vec<Value>,
    #[serde(rename = "OldOwnerPlayerUIds")]
    pub old_owner_player_uids: Vec<Value>,
    pub container_id: Option<String>,
    pub slot_index: Option<i64>,
    pub friendship_point: Option<i64>,
    #[serde(serialize_with = "float_or_marker")]
    pub friendship_basecamp_sec: Option<f64>,
    /// ISO-8601 with local offset
    pub owned_time: Option<String>,
    #[serde(rename = "OwnerPlayerUId")]
    pub owner_player_uid: Option<String>,
    pub rank: Option<i64>,
    pub rank_hp: Option<i64>,
    pub rank_defense: Option<i64>,
    pub rank_attack: Option<i64>,
    pub rank_craft_speed: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemSlot {
    pub index: Option<i64>,
    pub count: Option<i64>,
    pub item_id: Option<String>,
    // wire name kept as the web client reads it
    #[serde(rename = "DynamidId")]
    pub dynamic_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemContainer {
    pub id: Option<String>,
    pub belong_to_group: Option<String>,
    pub controllable_by_others: Option<bool>,
    pub slot_num: Option<i64>,
    pub slots: Vec<ItemSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharacterSlot {
    pub index: Option<i64>,
    #[serde(rename = "PlayerUId")]
    pub player_uid: Option<String>,
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CharacterContainer {
    pub id: Option<String>,
    pub slot_num: Option<i64>,
    pub slots: Vec<CharacterSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupMember {
    pub player_id: Option<String>,
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub id: Option<String>,
    pub members: Vec<GroupMember>,
    pub name: Option<String>,
    pub base_ids: Vec<Value>,
    pub map_base_ids: Vec<Value>,
    pub camp_level: Option<i64>,
    pub guild_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseCamp {
    pub id: Option<String>,
    pub container_id: Option<String>,
    pub group_id: Option<String>,
    pub owner_instance_id: Option<String>,
    /// `spawn_transform` as decoded (translation, rotation, scale)
    pub coords: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dungeon {
    pub instance_id: Option<String>,
    pub marker_point_id: Option<String>,
    pub dungeon_spawn_area_id: Option<String>,
    pub dungeon_level_name: Option<String>,
    pub boss_state: Option<String>,
    pub enemy_spawner_data_boss_row_name: Option<String>,
    /// raw ticks
    pub disappear_time_at: Option<i64>,
    /// raw ticks
    pub respawn_boss_time_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DungeonMarker {
    pub marker_point_id: Option<String>,
    pub next_respawn_game_time: Option<i64>,
}

/// World-level projection (`mode = server`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerSave {
    pub game_time: Option<i64>,
    pub real_time: Option<i64>,
    pub characters: Vec<Character>,
    pub item_containers: Vec<ItemContainer>,
    pub timestamp: Option<i64>,
    pub character_containers: Vec<CharacterContainer>,
    pub groups: Vec<Group>,
    pub base_camps: Vec<BaseCamp>,
    #[serde(rename = "DungeonSaveData")]
    pub dungeons: Vec<Dungeon>,
    #[serde(rename = "DungeonPointMarkerSaveData")]
    pub dungeon_markers: Vec<DungeonMarker>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerItemContainers {
    pub common_container_id: Option<String>,
    pub drop_slot_container_id: Option<String>,
    pub essential_container_id: Option<String>,
    pub weapon_load_out_container_id: Option<String>,
    pub player_equip_armor_container_id: Option<String>,
    pub food_equip_container_id: Option<String>,
}

/// Per-player projection (`mode = player`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerSave {
    pub player_uid: Option<String>,
    // same logical id, read from `IndividualId`; both are kept
    pub player_uid2: Option<String>,
    pub instance_id: Option<String>,
    pub character_pals_container_id: Option<String>,
    pub item_containers: PlayerItemContainers,
    pub technology_points: Option<i64>,
    pub ancient_technology_points: Option<i64>,
    pub pal_storage_container_id: Option<String>,
}
