//! Version 1 save records.
//!
//! The first format only stored names, an optional tick per entity and
//! whether combat was running. Entities were implicitly numbered by their
//! position in the list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::{Color, CombatPhase, CombatRules, EntityId, Tick};

use super::save::{
    CombatRecord, EntityRecord, FORMAT_VERSION, PopulationRecord, PositionRecord, SaveFile,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySave {
    pub entities: Vec<LegacyEntity>,
    #[serde(default)]
    pub in_combat: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEntity {
    pub name: String,
    #[serde(default)]
    pub tick: Option<u64>,
}

impl LegacySave {
    /// Upgrades to the current format. Colors come from the default palette
    /// and descriptions and histories start empty.
    pub fn migrate(self) -> SaveFile {
        let entities: Vec<EntityRecord> = self
            .entities
            .iter()
            .enumerate()
            .map(|(index, legacy)| EntityRecord {
                id: EntityId(index as u32 + 1),
                name: legacy.name.clone(),
                color: Color::from_palette(index),
                description: String::new(),
                history: Vec::new(),
            })
            .collect();

        let mut positions: Vec<PositionRecord> = if self.in_combat {
            self.entities
                .iter()
                .enumerate()
                .filter_map(|(index, legacy)| {
                    legacy.tick.map(|tick| PositionRecord {
                        entity: EntityId(index as u32 + 1),
                        tick: Tick(tick),
                    })
                })
                .collect()
        } else {
            if self.entities.iter().any(|e| e.tick.is_some()) {
                tracing::warn!("dropping ticks from a version 1 save that was not in combat");
            }
            Vec::new()
        };
        // Stable sort keeps list order as arrival order within a tick.
        positions.sort_by_key(|p| p.tick);

        SaveFile {
            version: FORMAT_VERSION,
            saved_at: DateTime::<Utc>::UNIX_EPOCH,
            rules: CombatRules::default(),
            population: PopulationRecord {
                next_id: entities.len() as u32 + 1,
                entities,
                selected: None,
            },
            combat: CombatRecord {
                phase: if self.in_combat {
                    CombatPhase::Combat
                } else {
                    CombatPhase::Join
                },
                join_rolls: Vec::new(),
                positions,
            },
        }
    }
}
