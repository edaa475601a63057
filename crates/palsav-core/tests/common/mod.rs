#![allow(dead_code)]

use std::sync::Mutex;

use palsav_core::{
    CodecError, Compression, DecodeOptions, Decoded, Document, SaveCodec, SaveType, json,
};

/// In-memory codec: decodes every input to a fixed document, except inputs
/// starting with `BAD`, and encodes documents as minified JSON.
pub struct FakeCodec {
    doc: Document,
    pub decodes: Mutex<Vec<DecodeOptions>>,
    pub encodes: Mutex<Vec<(SaveType, Compression)>>,
}

impl FakeCodec {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            decodes: Mutex::new(Vec::new()),
            encodes: Mutex::new(Vec::new()),
        }
    }
}

impl SaveCodec for FakeCodec {
    fn decode(&self, data: &[u8], opts: &DecodeOptions) -> Result<Decoded, CodecError> {
        self.decodes.lock().unwrap().push(opts.clone());
        if data.starts_with(b"BAD") {
            return Err(CodecError::Format("not a valid save file".to_string()));
        }
        Ok(Decoded {
            document: self.doc.clone(),
            save_type: SaveType::sniff(data),
        })
    }

    fn encode(
        &self,
        doc: &Document,
        save_type: SaveType,
        compression: Compression,
    ) -> Result<Vec<u8>, CodecError> {
        self.encodes.lock().unwrap().push((save_type, compression));
        let opts = json::JsonOpts::minified(json::NanPolicy::Preserve);
        Ok(json::write_document(doc, &opts).into_bytes())
    }
}

/// A world save with one of everything the server projection reads.
pub fn world_doc() -> Document {
    let pal = pal_entry();
    let mut doc = serde_json::json!({
        "header": { "save_game_class_name": "/Script/Pal.PalWorldSaveGame" },
        "properties": {
            "Version": { "value": 3 },
            "Timestamp": { "value": 638_400_000_000_000_000i64 },
            "worldSaveData": { "value": {
                "GameTimeSaveData": { "value": {
                    "GameDateTimeTicks": { "value": 100 },
                    "RealDateTimeTicks": { "value": 200 }
                }},
                "CharacterSaveParameterMap": { "value": [
                    {
                        "key": {
                            "PlayerUId": { "value": "00000000-0000-0000-0000-000000000001" },
                            "InstanceId": { "value": "aaaaaaaa-0000-0000-0000-000000000001" }
                        },
                        "value": { "RawData": { "value": {
                            "group_id": "99999999-0000-0000-0000-000000000000",
                            "object": { "SaveParameter": { "value": {
                                "NickName": { "value": "Zoe" },
                                "IsPlayer": { "value": true },
                                "Level": { "value": { "type": "None", "value": 42 } },
                                "Exp": { "value": 12345 },
                                "Hp": { "value": { "Value": { "value": 540000 } } },
                                "FullStomach": { "value": 150.5 },
                                "GotStatusPointList": { "value": { "values": [
                                    { "StatusName": { "value": "HP" }, "StatusPoint": { "value": 3 } },
                                    { "StatusName": { "value": "Stamina" } }
                                ]}},
                                "OwnedTime": { "value": 0 }
                            }}}
                        }}}
                    },
                    { "key": {}, "value": {} },
                    pal
                ]},
                "DungeonSaveData": { "value": { "values": [
                    {
                        "InstanceId": { "value": "e0000000-0000-0000-0000-000000000000" },
                        "MarkerPointId": { "value": "m0000000-0000-0000-0000-000000000000" },
                        "DungeonSpawnAreaId": { "value": "Area_07" },
                        "DungeonLevelName": { "value": "PL_Dungeon_Cave_A" },
                        "EnemySpawnerDataBossRowName": { "value": "Boss_SheepBall" },
                        "BossState": { "value": { "type": "EPalDungeonInstanceBossState", "value": "EPalDungeonInstanceBossState::Spawned" } },
                        "DisappearTimeAt": { "value": { "Ticks": { "value": 777 } } },
                        "RespawnBossTimeAt": { "value": { "ticks": { "value": 888 } } }
                    }
                ]}},
                "MapObjectSaveData": { "value": { "values": [1, 2, 3] } },
                "FoliageGridSaveDataMap": { "value": [] }
            }}
        },
        "trailer": "AAAA"
    });
    if let (Some(wsd), Document::Object(more)) = (
        doc["properties"]["worldSaveData"]["value"].as_object_mut(),
        world_collections(),
    ) {
        wsd.extend(more);
    }
    doc
}

/// A pal owned by the player in `world_doc`, with every pal-only field set.
fn pal_entry() -> Document {
    serde_json::json!({
        "key": {
            "PlayerUId": { "value": "00000000-0000-0000-0000-000000000000" },
            "InstanceId": { "value": "aaaaaaaa-0000-0000-0000-000000000002" }
        },
        "value": { "RawData": { "value": {
            "group_id": "99999999-0000-0000-0000-000000000000",
            "object": { "SaveParameter": { "value": {
                "CharacterID": { "value": "SheepBall" },
                "Gender": { "value": { "type": "EPalGenderType", "value": "EPalGenderType::Female" } },
                "EquipWaza": { "value": { "values": ["EPalWazaID::Unique_SheepBall_Roll"] } },
                "Talent_HP": { "value": { "type": "None", "value": 61 } },
                "Talent_Shot": { "value": { "type": "None", "value": 12 } },
                "Talent_Defense": { "value": { "type": "None", "value": 99 } },
                "PassiveSkillList": { "value": { "values": ["CraftSpeed_up1", "Deffence_down1"] } },
                "OldOwnerPlayerUIds": { "value": { "values": ["00000000-0000-0000-0000-000000000001"] } },
                "SlotId": { "value": {
                    "ContainerId": { "value": { "ID": { "value": "b0000000-0000-0000-0000-000000000000" } } },
                    "SlotIndex": { "value": 4 }
                }},
                "FriendshipPoint": { "value": 300 },
                "FriendshipBasecampSec": { "value": 12.25 },
                "OwnerPlayerUId": { "value": "00000000-0000-0000-0000-000000000001" },
                "Rank": { "value": { "type": "None", "value": 2 } },
                "Rank_HP": { "value": { "type": "None", "value": 3 } },
                "Rank_Defence": { "value": { "type": "None", "value": 4 } },
                "Rank_Attack": { "value": { "type": "None", "value": 5 } },
                "Rank_CraftSpeed": { "value": { "type": "None", "value": 6 } },
                "GotExStatusPointList": { "value": { "values": [
                    { "StatusName": { "value": "Work" }, "StatusPoint": { "value": 1 } }
                ]}}
            }}}
        }}}
    })
}

/// Containers, guilds, bases and dungeon markers of `world_doc`.
fn world_collections() -> Document {
    serde_json::json!({
        "CharacterContainerSaveData": { "value": [
            {
                "key": { "ID": { "value": "b0000000-0000-0000-0000-000000000000" } },
                "value": {
                    "SlotNum": { "value": 5 },
                    "Slots": { "value": { "values": [
                        {
                            "SlotIndex": { "value": 4 },
                            "RawData": { "value": {
                                "player_uid": "00000000-0000-0000-0000-000000000000",
                                "instance_id": "aaaaaaaa-0000-0000-0000-000000000002"
                            }}
                        }
                    ]}}
                }
            }
        ]},
        "GroupSaveDataMap": { "value": [
            {
                "key": "99999999-0000-0000-0000-000000000000",
                "value": { "RawData": { "value": {
                    "group_name": "Wool Co",
                    "guild_name": "Shepherds",
                    "base_camp_level": 3,
                    "base_ids": ["f0000000-0000-0000-0000-000000000000"],
                    "map_object_instance_ids_base_camp_points": ["f1000000-0000-0000-0000-000000000000"],
                    "individual_character_handle_ids": [
                        { "guid": "00000000-0000-0000-0000-000000000001", "instance_id": "aaaaaaaa-0000-0000-0000-000000000001" }
                    ]
                }}}
            }
        ]},
        "BaseCampSaveData": { "value": [
            {
                "key": "f0000000-0000-0000-0000-000000000000",
                "value": {
                    "RawData": { "value": {
                        "group_id_belong_to": "99999999-0000-0000-0000-000000000000",
                        "owner_map_object_instance_id": "f1000000-0000-0000-0000-000000000000"
                    }},
                    "WorkerDirector": { "value": { "RawData": { "value": {
                        "container_id": "b1000000-0000-0000-0000-000000000000",
                        "spawn_transform": { "translation": { "x": 1.5, "y": -2.25, "z": 300.0 } }
                    }}}}
                }
            }
        ]},
        "DungeonPointMarkerSaveData": { "value": { "values": [
            {
                "MarkerPointId": { "value": "m0000000-0000-0000-0000-000000000000" },
                "NextRespawnGameTime": { "value": { "Ticks": { "value": 999 } } }
            }
        ]}},
        "ItemContainerSaveData": { "value": [
            {
                "key": { "ID": { "value": "c0000000-0000-0000-0000-000000000001" } },
                "value": {
                    "BelongInfo": { "value": {
                        "GroupId": { "value": "99999999-0000-0000-0000-000000000000" },
                        "bControllableOthers": { "value": false }
                    }},
                    "SlotNum": { "value": 2 },
                    "Slots": { "value": { "values": [
                        { "RawData": { "value": {
                            "slot_index": 0,
                            "count": 5,
                            "item": {
                                "static_id": "Wood",
                                "dynamic_id": { "local_id_in_created_world": "d0000000-0000-0000-0000-000000000000" }
                            }
                        }}},
                        { "RawData": { "value": { "slot_index": 1, "count": 0 } } }
                    ]}}
                }
            }
        ]}
    })
}

/// A player save with the fields the player projection reads.
pub fn player_doc() -> Document {
    serde_json::json!({
        "header": { "save_game_class_name": "/Script/Pal.PalWorldPlayerSaveGame" },
        "properties": {
            "SaveData": { "value": {
                "PlayerUId": { "value": "00000000-0000-0000-0000-000000000001" },
                "IndividualId": { "value": {
                    "PlayerUId": { "value": "00000000-0000-0000-0000-000000000001" },
                    "InstanceId": { "value": "aaaaaaaa-0000-0000-0000-000000000001" }
                }},
                "OtomoCharacterContainerId": { "value": { "ID": { "value": "b0000000-0000-0000-0000-000000000000" } } },
                "InventoryInfo": { "value": {
                    "CommonContainerId": { "value": { "ID": { "value": "c1" } } },
                    "FoodEquipContainerId": { "value": { "ID": { "value": "c6" } } }
                }},
                "TechnologyPoint": { "value": 7 },
                "bossTechnologyPoint": { "value": 2 },
                "RecordData": { "value": { "huge": true } }
            }},
            "Extra": { "value": 1 }
        }
    })
}
