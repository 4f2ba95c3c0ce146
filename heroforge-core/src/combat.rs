//! Initiative-ordered combat tracker.
//!
//! Combatants are kept sorted by initiative (highest first, DEX modifier
//! breaking ties). Advancing past the last combatant starts a new round.

use crate::bestiary::NpcDef;
use crate::character::{Ability, CharacterId, CharacterSheet, ContentId, HitPoints};
use crate::dice::{roll_d20_with_rng, Advantage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub Uuid);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("no combatant {0:?}")]
    UnknownCombatant(CombatantId),
}

/// Where a combatant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantSource {
    Character(CharacterId),
    Npc(ContentId),
}

/// How to set a combatant's initiative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiative {
    /// d20 + DEX modifier.
    Roll,
    Given(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub source: CombatantSource,
    pub initiative: i32,
    pub dex_modifier: i8,
    pub armor_class: i32,
    pub hit_points: HitPoints,
}

impl Combatant {
    pub fn is_down(&self) -> bool {
        self.hit_points.current == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogKind {
    Joined,
    Left,
    RoundStart,
    TurnStart,
    Damaged { amount: i32 },
    Healed { amount: i32 },
    Downed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub round: u32,
    pub kind: CombatLogKind,
    pub description: String,
}

// ============================================================================
// Tracker
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatTracker {
    pub round: u32,
    pub turn_index: usize,
    pub combatants: Vec<Combatant>,
    pub log: Vec<CombatLogEntry>,
    /// Copies of each stat block added so far, removed ones included.
    #[serde(default)]
    npc_copies: BTreeMap<ContentId, u32>,
}

impl CombatTracker {
    pub fn new() -> Self {
        Self {
            round: 1,
            turn_index: 0,
            combatants: Vec::new(),
            log: Vec::new(),
            npc_copies: BTreeMap::new(),
        }
    }

    pub fn add_character(&mut self, sheet: &CharacterSheet, initiative: Initiative) -> CombatantId {
        self.add_character_with_rng(sheet, initiative, &mut rand::thread_rng())
    }

    pub fn add_character_with_rng<R: Rng>(
        &mut self,
        sheet: &CharacterSheet,
        initiative: Initiative,
        rng: &mut R,
    ) -> CombatantId {
        let dex = sheet.modifier(Ability::Dexterity);
        self.insert(
            Combatant {
                id: CombatantId::new(),
                name: sheet.name.clone(),
                source: CombatantSource::Character(sheet.id),
                initiative: resolve(initiative, dex, rng),
                dex_modifier: dex,
                armor_class: sheet.armor_class,
                hit_points: sheet.hit_points.clone(),
            },
        )
    }

    /// Add an NPC. Repeated copies of the same stat block are numbered
    /// ("Goblin", "Goblin 2", ...) and numbers are never reused.
    pub fn add_npc(&mut self, npc: &NpcDef, initiative: Initiative) -> CombatantId {
        self.add_npc_with_rng(npc, initiative, &mut rand::thread_rng())
    }

    pub fn add_npc_with_rng<R: Rng>(
        &mut self,
        npc: &NpcDef,
        initiative: Initiative,
        rng: &mut R,
    ) -> CombatantId {
        let dex = npc.dex_modifier();
        let copies = self.npc_copies.entry(npc.id).or_insert(0);
        *copies += 1;
        let name = match *copies {
            1 => npc.name.clone(),
            n => format!("{} {n}", npc.name),
        };
        self.insert(Combatant {
            id: CombatantId::new(),
            name,
            source: CombatantSource::Npc(npc.id),
            initiative: resolve(initiative, dex, rng),
            dex_modifier: dex,
            armor_class: npc.armor_class,
            hit_points: HitPoints::new(npc.hit_points),
        })
    }

    fn insert(&mut self, combatant: Combatant) -> CombatantId {
        let id = combatant.id;
        self.push_log(
            CombatLogKind::Joined,
            format!("{} joins with initiative {}.", combatant.name, combatant.initiative),
        );
        let current = self.current().map(|c| c.id);
        self.combatants.push(combatant);
        self.sort_initiative();
        // The combatant whose turn it is stays current.
        if let Some(current) = current {
            self.turn_index = self.position(current).unwrap_or(0);
        }
        id
    }

    /// Highest initiative first, DEX modifier for ties. The sort is stable so
    /// full ties keep insertion order.
    fn sort_initiative(&mut self) {
        self.combatants.sort_by(|a, b| {
            b.initiative
                .cmp(&a.initiative)
                .then_with(|| b.dex_modifier.cmp(&a.dex_modifier))
        });
    }

    fn position(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn_index)
    }

    /// Advance to the next combatant, wrapping into a new round.
    pub fn next_turn(&mut self) -> Option<&Combatant> {
        if self.combatants.is_empty() {
            return None;
        }
        self.turn_index += 1;
        if self.turn_index >= self.combatants.len() {
            self.turn_index = 0;
            self.round += 1;
            self.push_log(CombatLogKind::RoundStart, format!("Round {} begins.", self.round));
        }
        let name = self.combatants[self.turn_index].name.clone();
        self.push_log(CombatLogKind::TurnStart, format!("{name}'s turn."));
        self.current()
    }

    /// Deal damage, draining temporary HP first. Returns the combatant's
    /// current HP afterwards.
    pub fn damage(&mut self, id: CombatantId, amount: i32) -> Result<i32, CombatError> {
        let combatant = self.get_mut(id)?;
        let was_down = combatant.is_down();
        let dropped = combatant.hit_points.take_damage(amount);
        let (name, current) = (combatant.name.clone(), combatant.hit_points.current);

        self.push_log(
            CombatLogKind::Damaged { amount },
            format!("{name} takes {amount} damage ({current} HP left)."),
        );
        if dropped && !was_down {
            self.push_log(CombatLogKind::Downed, format!("{name} drops to 0 HP."));
        }
        Ok(current)
    }

    /// Heal up to the maximum. Returns the amount restored.
    pub fn heal(&mut self, id: CombatantId, amount: i32) -> Result<i32, CombatError> {
        let combatant = self.get_mut(id)?;
        let restored = combatant.hit_points.heal(amount);
        let name = combatant.name.clone();
        self.push_log(
            CombatLogKind::Healed { amount: restored },
            format!("{name} regains {restored} HP."),
        );
        Ok(restored)
    }

    pub fn add_temp_hp(&mut self, id: CombatantId, amount: i32) -> Result<(), CombatError> {
        self.get_mut(id)?.hit_points.add_temp_hp(amount);
        Ok(())
    }

    /// Remove a combatant. Whoever is acting keeps acting; removing the
    /// acting combatant hands the turn to the next one in order.
    pub fn remove(&mut self, id: CombatantId) -> Result<Combatant, CombatError> {
        let index = self.position(id).ok_or(CombatError::UnknownCombatant(id))?;
        let removed = self.combatants.remove(index);
        self.push_log(CombatLogKind::Left, format!("{} leaves combat.", removed.name));

        if index < self.turn_index {
            self.turn_index -= 1;
        } else if index == self.turn_index && self.turn_index >= self.combatants.len() {
            self.turn_index = 0;
            if !self.combatants.is_empty() {
                self.round += 1;
                self.push_log(CombatLogKind::RoundStart, format!("Round {} begins.", self.round));
            }
        }
        Ok(removed)
    }

    fn get_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, CombatError> {
        self.combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CombatError::UnknownCombatant(id))
    }

    fn push_log(&mut self, kind: CombatLogKind, description: String) {
        tracing::debug!(round = self.round, "{description}");
        self.log.push(CombatLogEntry {
            round: self.round,
            kind,
            description,
        });
    }
}

impl Default for CombatTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve<R: Rng>(initiative: Initiative, dex: i8, rng: &mut R) -> i32 {
    match initiative {
        Initiative::Given(value) => value,
        Initiative::Roll => roll_d20_with_rng(dex as i32, Advantage::Normal, rng).total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bestiary::BUILTIN_NPCS;
    use crate::testing::{sample_fighter, sample_wizard};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn goblin() -> &'static NpcDef {
        BUILTIN_NPCS.iter().find(|n| n.name == "Goblin").unwrap()
    }

    fn names(tracker: &CombatTracker) -> Vec<&str> {
        tracker.combatants.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_initiative_then_dex() {
        let mut tracker = CombatTracker::new();
        let fighter = sample_fighter("Brom");
        let wizard = sample_wizard("Mira");
        tracker.add_character(&fighter, Initiative::Given(12));
        tracker.add_character(&wizard, Initiative::Given(18));
        tracker.add_npc(goblin(), Initiative::Given(12));

        // Goblin's +2 DEX beats the fighter's +1 on the tie.
        assert_eq!(names(&tracker), vec!["Mira", "Goblin", "Brom"]);
    }

    #[test]
    fn test_rolled_initiative_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tracker = CombatTracker::new();
        let id = tracker.add_npc_with_rng(goblin(), Initiative::Roll, &mut rng);
        let initiative = tracker.get(id).unwrap().initiative;
        assert!((3..=22).contains(&initiative));
    }

    #[test]
    fn test_npc_copies_are_numbered() {
        let mut tracker = CombatTracker::new();
        tracker.add_npc(goblin(), Initiative::Given(10));
        tracker.add_npc(goblin(), Initiative::Given(9));
        assert_eq!(names(&tracker), vec!["Goblin", "Goblin 2"]);
    }

    #[test]
    fn test_npc_numbers_not_reused_after_removal() {
        let mut tracker = CombatTracker::new();
        let first = tracker.add_npc(goblin(), Initiative::Given(10));
        tracker.add_npc(goblin(), Initiative::Given(9));
        tracker.remove(first).unwrap();
        tracker.add_npc(goblin(), Initiative::Given(8));
        assert_eq!(names(&tracker), vec!["Goblin 2", "Goblin 3"]);
    }

    #[test]
    fn test_next_turn_wraps_round() {
        let mut tracker = CombatTracker::new();
        tracker.add_npc(goblin(), Initiative::Given(15));
        tracker.add_character(&sample_fighter("Brom"), Initiative::Given(10));

        assert_eq!(tracker.current().unwrap().name, "Goblin");
        assert_eq!(tracker.next_turn().unwrap().name, "Brom");
        assert_eq!(tracker.round, 1);
        assert_eq!(tracker.next_turn().unwrap().name, "Goblin");
        assert_eq!(tracker.round, 2);
        assert!(tracker
            .log
            .iter()
            .any(|e| e.kind == CombatLogKind::RoundStart && e.round == 2));
    }

    #[test]
    fn test_empty_tracker_next_turn() {
        let mut tracker = CombatTracker::new();
        assert!(tracker.next_turn().is_none());
        assert_eq!(tracker.round, 1);
    }

    #[test]
    fn test_late_joiner_keeps_current_turn() {
        let mut tracker = CombatTracker::new();
        tracker.add_npc(goblin(), Initiative::Given(15));
        tracker.add_character(&sample_fighter("Brom"), Initiative::Given(10));
        tracker.next_turn();
        tracker.add_character(&sample_wizard("Mira"), Initiative::Given(20));
        assert_eq!(tracker.current().unwrap().name, "Brom");
    }

    #[test]
    fn test_damage_and_heal_with_temp_hp() {
        let mut tracker = CombatTracker::new();
        let id = tracker.add_npc(goblin(), Initiative::Given(10));
        tracker.add_temp_hp(id, 3).unwrap();

        assert_eq!(tracker.damage(id, 5), Ok(5));
        assert_eq!(tracker.get(id).unwrap().hit_points.temporary, 0);
        assert_eq!(tracker.heal(id, 10), Ok(2));
        assert_eq!(tracker.damage(id, 20), Ok(0));
        assert!(tracker.get(id).unwrap().is_down());
        assert!(tracker.log.iter().any(|e| e.kind == CombatLogKind::Downed));
    }

    #[test]
    fn test_remove_before_current_keeps_pointer() {
        let mut tracker = CombatTracker::new();
        let first = tracker.add_npc(goblin(), Initiative::Given(20));
        tracker.add_character(&sample_fighter("Brom"), Initiative::Given(15));
        tracker.add_character(&sample_wizard("Mira"), Initiative::Given(10));
        tracker.next_turn();
        assert_eq!(tracker.current().unwrap().name, "Brom");

        tracker.remove(first).unwrap();
        assert_eq!(tracker.current().unwrap().name, "Brom");
    }

    #[test]
    fn test_remove_current_passes_turn() {
        let mut tracker = CombatTracker::new();
        tracker.add_npc(goblin(), Initiative::Given(20));
        let brom = tracker.add_character(&sample_fighter("Brom"), Initiative::Given(15));
        tracker.add_character(&sample_wizard("Mira"), Initiative::Given(10));
        tracker.next_turn();

        tracker.remove(brom).unwrap();
        assert_eq!(tracker.current().unwrap().name, "Mira");
        assert_eq!(tracker.round, 1);
    }

    #[test]
    fn test_remove_last_current_wraps() {
        let mut tracker = CombatTracker::new();
        tracker.add_npc(goblin(), Initiative::Given(20));
        let brom = tracker.add_character(&sample_fighter("Brom"), Initiative::Given(15));
        tracker.next_turn();

        tracker.remove(brom).unwrap();
        assert_eq!(tracker.current().unwrap().name, "Goblin");
        assert_eq!(tracker.round, 2);
    }

    #[test]
    fn test_unknown_combatant() {
        let mut tracker = CombatTracker::new();
        let missing = CombatantId::new();
        assert_eq!(
            tracker.damage(missing, 1),
            Err(CombatError::UnknownCombatant(missing))
        );
        assert!(tracker.remove(missing).is_err());
    }
}
