//! Versioned save record.
//!
//! The record is a plain mirror of the tracker state: entities with their
//! histories, the selection and id allocator, the combat phase, join rolls and
//! the timeline. Positions are stored in timeline order so that arrival order
//! within a tick survives a round trip.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracker_core::{
    ActionRecord, Color, Combat, CombatPhase, CombatRules, Entity, EntityId, Population, Tick,
    TrackerState,
};

use super::legacy::LegacySave;
use crate::repository::{RepositoryError, Result};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub rules: CombatRules,
    pub population: PopulationRecord,
    pub combat: CombatRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub entities: Vec<EntityRecord>,
    pub selected: Option<EntityId>,
    pub next_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    pub color: Color,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub history: Vec<ActionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRecord {
    pub phase: CombatPhase,
    #[serde(default)]
    pub join_rolls: Vec<JoinRollRecord>,
    #[serde(default)]
    pub positions: Vec<PositionRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRollRecord {
    pub entity: EntityId,
    pub successes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub entity: EntityId,
    pub tick: Tick,
}

impl SaveFile {
    /// Captures a tracker state, stamped with the current time.
    pub fn capture(state: &TrackerState) -> Self {
        let population = &state.population;
        let combat = &state.combat;

        Self {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            rules: combat.rules(),
            population: PopulationRecord {
                entities: population
                    .iter()
                    .map(|entity| EntityRecord {
                        id: entity.id(),
                        name: entity.name().to_string(),
                        color: entity.color(),
                        description: entity.description().to_string(),
                        history: entity.history().to_vec(),
                    })
                    .collect(),
                selected: population.selected(),
                next_id: population.next_id(),
            },
            combat: CombatRecord {
                phase: combat.phase(),
                join_rolls: combat
                    .join_rolls()
                    .iter()
                    .map(|(&entity, &successes)| JoinRollRecord { entity, successes })
                    .collect(),
                positions: combat
                    .positions()
                    .ordered()
                    .map(|(tick, entity)| PositionRecord { entity, tick })
                    .collect(),
            },
        }
    }

    pub fn entity_count(&self) -> usize {
        self.population.entities.len()
    }

    /// Rebuilds the tracker state, rejecting records that reference unknown
    /// entities or contradict the combat phase.
    pub fn into_state(self) -> Result<TrackerState> {
        if self.version != FORMAT_VERSION {
            return Err(RepositoryError::UnsupportedVersion {
                found: self.version,
                supported: FORMAT_VERSION,
            });
        }

        let mut population = Population::new();
        for record in self.population.entities {
            let entity = Entity::new(record.id, &record.name, record.color)
                .map_err(|e| corrupted(format!("entity {}: {}", record.id, e)))?
                .with_description(record.description)
                .with_history(record.history);
            population
                .insert(entity)
                .map_err(|e| corrupted(e.to_string()))?;
        }
        population.reserve_ids_below(self.population.next_id);
        if let Some(selected) = self.population.selected {
            population
                .select(Some(selected))
                .map_err(|e| corrupted(format!("selection: {}", e)))?;
        }

        let mut join_rolls = BTreeMap::new();
        for roll in &self.combat.join_rolls {
            if !population.contains(roll.entity) {
                return Err(corrupted(format!("join roll for unknown {}", roll.entity)));
            }
            if join_rolls.insert(roll.entity, roll.successes).is_some() {
                return Err(corrupted(format!("duplicate join roll for {}", roll.entity)));
            }
        }

        if let Some(stray) = self
            .combat
            .positions
            .iter()
            .find(|p| !population.contains(p.entity))
        {
            return Err(corrupted(format!("position for unknown {}", stray.entity)));
        }
        if self.combat.phase == CombatPhase::Join && !self.combat.positions.is_empty() {
            return Err(corrupted("timeline positions saved during the join phase".into()));
        }

        let combat = Combat::restore(
            self.combat.phase,
            self.rules,
            join_rolls,
            self.combat.positions.iter().map(|p| (p.tick, p.entity)),
        )
        .map_err(|e| corrupted(e.to_string()))?;

        Ok(TrackerState { population, combat })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes any supported format version, migrating older records.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let version = match value.get("version") {
            None => 1,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| corrupted("version is not a number".into()))?,
        };

        match version {
            1 => {
                let legacy: LegacySave = serde_json::from_value(value)?;
                tracing::warn!(
                    "migrating version 1 save ({} entities)",
                    legacy.entities.len()
                );
                Ok(legacy.migrate())
            }
            FORMAT_VERSION => Ok(serde_json::from_value(value)?),
            found => Err(RepositoryError::UnsupportedVersion {
                found,
                supported: FORMAT_VERSION,
            }),
        }
    }
}

fn corrupted(message: String) -> RepositoryError {
    RepositoryError::CorruptedData(message)
}
