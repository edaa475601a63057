// Projections from decoded tree fragments into flat DTOs.
//
// Mappers never fail: every field goes through the safe path reader and
// collapses to `None` (scalars) or an empty Vec (collections) when absent.
use serde_json::Value;

use crate::dto::*;
use crate::path::{list, read};
use crate::ticks::ticks_to_local_iso;

const SAVE_PARAMETER: [&str; 6] = ["value", "RawData", "value", "object", "SaveParameter", "value"];

// Path under a character entry's `SaveParameter.value`.
fn param(rest: &[&'static str]) -> Vec<&'static str> {
    let mut keys = SAVE_PARAMETER.to_vec();
    keys.extend_from_slice(rest);
    keys
}

fn map_stat_point(node: &Value) -> StatPoint {
    StatPoint {
        name: read(node, &["StatusName", "value"]),
        value: read(node, &["StatusPoint", "value"]),
    }
}

fn map_stat_list(node: &Value, list_key: &'static str) -> Vec<StatPoint> {
    list(node, &param(&[list_key, "value", "values"]))
        .iter()
        .map(map_stat_point)
        .collect()
}

/// One `{key, value}` entry of `CharacterSaveParameterMap`.
pub fn map_character(node: &Value) -> Character {
    Character {
        nickname: read(node, &param(&["NickName", "value"])),
        filtered_nickname: read(node, &param(&["FilteredNickName", "value"])),
        is_player: read(node, &param(&["IsPlayer", "value"])),
        player_id: read(node, &["key", "PlayerUId", "value"]),
        instance_id: read(node, &["key", "InstanceId", "value"]),
        level: read(node, &param(&["Level", "value", "value"])),
        exp: read(node, &param(&["Exp", "value"])),
        hp: read(node, &param(&["Hp", "value", "Value", "value"])),
        full_stomach: read(node, &param(&["FullStomach", "value"])),
        stats: map_stat_list(node, "GotStatusPointList"),
        group_id: read(node, &["value", "RawData", "value", "group_id"]),
        added_stats: map_stat_list(node, "GotExStatusPointList"),
        character_id: read(node, &param(&["CharacterID", "value"])),
        gender: read(node, &param(&["Gender", "value", "value"])),
        equip_waza: list(node, &param(&["EquipWaza", "value", "values"])).to_vec(),
        talent_hp: read(node, &param(&["Talent_HP", "value", "value"])),
        talent_shot: read(node, &param(&["Talent_Shot", "value", "value"])),
        talent_defense: read(node, &param(&["Talent_Defense", "value", "value"])),
        passive_skill_list: list(node, &param(&["PassiveSkillList", "value", "values"])).to_vec(),
        old_owner_player_uids: list(node, &param(&["OldOwnerPlayerUIds", "value", "values"]))
            .to_vec(),
        container_id: read(
            node,
            &param(&["SlotId", "value", "ContainerId", "value", "ID", "value"]),
        ),
        slot_index: read(node, &param(&["SlotId", "value", "SlotIndex", "value"])),
        friendship_point: read(node, &param(&["FriendshipPoint", "value"])),
        friendship_basecamp_sec: read(node, &param(&["FriendshipBasecampSec", "value"])),
        owned_time: ticks_to_local_iso(read(node, &param(&["OwnedTime", "value"]))),
        owner_player_uid: read(node, &param(&["OwnerPlayerUId", "value"])),
        rank: read(node, &param(&["Rank", "value", "value"])),
        rank_hp: read(node, &param(&["Rank_HP", "value", "value"])),
        rank_defense: read(node, &param(&["Rank_Defence", "value", "value"])),
        rank_attack: read(node, &param(&["Rank_Attack", "value", "value"])),
        rank_craft_speed: read(node, &param(&["Rank_CraftSpeed", "value", "value"])),
    }
}

pub fn map_item_slot(node: &Value) -> ItemSlot {
    ItemSlot {
        index: read(node, &["RawData", "value", "slot_index"]),
        count: read(node, &["RawData", "value", "count"]),
        item_id: read(node, &["RawData", "value", "item", "static_id"]),
        dynamic_id: read(
            node,
            &[
                "RawData",
                "value",
                "item",
                "dynamic_id",
                "local_id_in_created_world",
            ],
        ),
    }
}

pub fn map_item_container(node: &Value) -> ItemContainer {
    ItemContainer {
        id: read(node, &["key", "ID", "value"]),
        belong_to_group: read(node, &["value", "BelongInfo", "value", "GroupId", "value"]),
        controllable_by_others: read(
            node,
            &["value", "BelongInfo", "value", "bControllableOthers", "value"],
        ),
        slot_num: read(node, &["value", "SlotNum", "value"]),
        slots: list(node, &["value", "Slots", "value", "values"])
            .iter()
            .map(map_item_slot)
            .collect(),
    }
}

pub fn map_character_slot(node: &Value) -> CharacterSlot {
    CharacterSlot {
        index: read(node, &["SlotIndex", "value"]),
        player_uid: read(node, &["RawData", "value", "player_uid"]),
        instance_id: read(node, &["RawData", "value", "instance_id"]),
    }
}

pub fn map_character_container(node: &Value) -> CharacterContainer {
    CharacterContainer {
        id: read(node, &["key", "ID", "value"]),
        slot_num: read(node, &["value", "SlotNum", "value"]),
        slots: list(node, &["value", "Slots", "value", "values"])
            .iter()
            .map(map_character_slot)
            .collect(),
    }
}

pub fn map_group_member(node: &Value) -> GroupMember {
    GroupMember {
        player_id: read(node, &["guid"]),
        instance_id: read(node, &["instance_id"]),
    }
}

pub fn map_group(node: &Value) -> Group {
    let raw = |k: &'static str| ["value", "RawData", "value", k];
    Group {
        id: read(node, &["key"]),
        members: list(node, &raw("individual_character_handle_ids"))
            .iter()
            .map(map_group_member)
            .collect(),
        name: read(node, &raw("group_name")),
        base_ids: list(node, &raw("base_ids")).to_vec(),
        map_base_ids: list(node, &raw("map_object_instance_ids_base_camp_points")).to_vec(),
        camp_level: read(node, &raw("base_camp_level")),
        guild_name: read(node, &raw("guild_name")),
    }
}

pub fn map_base_camp(node: &Value) -> BaseCamp {
    let director = |k: &'static str| ["value", "WorkerDirector", "value", "RawData", "value", k];
    BaseCamp {
        id: read(node, &["key"]),
        container_id: read(node, &director("container_id")),
        group_id: read(node, &["value", "RawData", "value", "group_id_belong_to"]),
        owner_instance_id: read(
            node,
            &["value", "RawData", "value", "owner_map_object_instance_id"],
        ),
        coords: read(node, &director("spawn_transform")),
    }
}

pub fn map_dungeon(node: &Value) -> Dungeon {
    Dungeon {
        instance_id: read(node, &["InstanceId", "value"]),
        marker_point_id: read(node, &["MarkerPointId", "value"]),
        dungeon_spawn_area_id: read(node, &["DungeonSpawnAreaId", "value"]),
        dungeon_level_name: read(node, &["DungeonLevelName", "value"]),
        boss_state: read(node, &["BossState", "value", "value"]),
        enemy_spawner_data_boss_row_name: read(node, &["EnemySpawnerDataBossRowName", "value"]),
        disappear_time_at: read(node, &["DisappearTimeAt", "value", "Ticks", "value"]),
        respawn_boss_time_at: read(node, &["RespawnBossTimeAt", "value", "Ticks", "value"])
            .or_else(|| read(node, &["RespawnBossTimeAt", "value", "ticks", "value"])),
    }
}

pub fn map_dungeon_marker(node: &Value) -> DungeonMarker {
    DungeonMarker {
        marker_point_id: read(node, &["MarkerPointId", "value"]),
        next_respawn_game_time: read(node, &["NextRespawnGameTime", "value", "Ticks", "value"]),
    }
}

fn map_all<T>(items: &[Value], f: fn(&Value) -> T) -> Vec<T> {
    items.iter().map(f).collect()
}

/// Whole-document projection of a world save.
pub fn map_server_save(doc: &Value) -> ServerSave {
    let wsd = |rest: &[&'static str]| {
        let mut keys = vec!["properties", "worldSaveData", "value"];
        keys.extend_from_slice(rest);
        keys
    };
    ServerSave {
        game_time: read(doc, &wsd(&["GameTimeSaveData", "value", "GameDateTimeTicks", "value"])),
        real_time: read(doc, &wsd(&["GameTimeSaveData", "value", "RealDateTimeTicks", "value"])),
        characters: map_all(
            list(doc, &wsd(&["CharacterSaveParameterMap", "value"])),
            map_character,
        ),
        item_containers: map_all(
            list(doc, &wsd(&["ItemContainerSaveData", "value"])),
            map_item_container,
        ),
        timestamp: read(doc, &["properties", "Timestamp", "value"]),
        character_containers: map_all(
            list(doc, &wsd(&["CharacterContainerSaveData", "value"])),
            map_character_container,
        ),
        groups: map_all(list(doc, &wsd(&["GroupSaveDataMap", "value"])), map_group),
        base_camps: map_all(list(doc, &wsd(&["BaseCampSaveData", "value"])), map_base_camp),
        dungeons: map_all(
            list(doc, &wsd(&["DungeonSaveData", "value", "values"])),
            map_dungeon,
        ),
        dungeon_markers: map_all(
            list(doc, &wsd(&["DungeonPointMarkerSaveData", "value", "values"])),
            map_dungeon_marker,
        ),
    }
}

pub fn map_player_item_containers(inventory: &Value) -> PlayerItemContainers {
    let id = |k: &'static str| [k, "value", "ID", "value"];
    PlayerItemContainers {
        common_container_id: read(inventory, &id("CommonContainerId")),
        drop_slot_container_id: read(inventory, &id("DropSlotContainerId")),
        essential_container_id: read(inventory, &id("EssentialContainerId")),
        weapon_load_out_container_id: read(inventory, &id("WeaponLoadOutContainerId")),
        player_equip_armor_container_id: read(inventory, &id("PlayerEquipArmorContainerId")),
        food_equip_container_id: read(inventory, &id("FoodEquipContainerId")),
    }
}

/// Whole-document projection of a player save.
pub fn map_player_save(doc: &Value) -> PlayerSave {
    let sd = |rest: &[&'static str]| {
        let mut keys = vec!["properties", "SaveData", "value"];
        keys.extend_from_slice(rest);
        keys
    };
    let inventory = crate::path::get(doc, &sd(&["InventoryInfo", "value"])).unwrap_or(&Value::Null);
    PlayerSave {
        player_uid: read(doc, &sd(&["PlayerUId", "value"])),
        player_uid2: read(doc, &sd(&["IndividualId", "value", "PlayerUId", "value"])),
        instance_id: read(doc, &sd(&["IndividualId", "value", "InstanceId", "value"])),
        character_pals_container_id: read(
            doc,
            &sd(&["OtomoCharacterContainerId", "value", "ID", "value"]),
        ),
        item_containers: map_player_item_containers(inventory),
        technology_points: read(doc, &sd(&["TechnologyPoint", "value"])),
        ancient_technology_points: read(doc, &sd(&["bossTechnologyPoint", "value"])),
        pal_storage_container_id: read(
            doc,
            &sd(&["PalStorageContainerId", "value", "ID", "value"]),
        ),
    }
}
