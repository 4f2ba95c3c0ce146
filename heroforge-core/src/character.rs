//! Character sheet types.
//!
//! A `CharacterSheet` holds the player's chosen data (ability scores,
//! proficiencies, inventory, notes) alongside the values derived from it.
//! Derived fields are owned by [`crate::derive::recompute`] and are
//! overwritten every time the sheet changes.

use crate::class_data::SpellcastingProfile;
use crate::dice::DieType;
use crate::items::Item;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier for catalog entries (species, classes, items, spells, NPCs...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(pub Uuid);

impl ContentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Stable id for a built-in entry, derived from its kind and name.
    pub fn builtin(kind: &str, name: &str) -> Self {
        let key = format!("heroforge:{kind}:{}", name.to_lowercase());
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier for one inventory entry on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Look up an ability by full name or abbreviation, ignoring case.
    pub fn from_name(name: &str) -> Option<Ability> {
        let name = name.trim();
        Ability::all().into_iter().find(|a| {
            a.name().eq_ignore_ascii_case(name) || a.abbreviation().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Base ability scores as chosen during creation (species bonuses included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Add a (possibly negative) bonus, keeping the score within 1..=30.
    pub fn apply_bonus(&mut self, ability: Ability, bonus: i8) {
        let value = (self.get(ability) as i16 + bonus as i16).clamp(1, 30);
        self.set(ability, value as u8);
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        crate::derive::ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    pub fn all() -> [Skill; 18] {
        [
            Skill::Athletics,
            Skill::Acrobatics,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Arcana,
            Skill::History,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Perception,
            Skill::Survival,
            Skill::Deception,
            Skill::Intimidation,
            Skill::Performance,
            Skill::Persuasion,
        ]
    }

    /// Match a display name ("Sleight of Hand") or compact name ("sleightofhand").
    pub fn from_name(name: &str) -> Option<Skill> {
        let wanted: String = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Skill::all().into_iter().find(|skill| {
            let candidate: String = skill
                .name()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            candidate == wanted
        })
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Proficiency level for skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProficiencyLevel {
    #[default]
    None,
    Half,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    pub fn bonus(&self, proficiency_bonus: i8) -> i8 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Half => proficiency_bonus / 2,
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expertise => proficiency_bonus * 2,
        }
    }
}

/// Everything a character is proficient with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Proficiencies {
    pub skills: BTreeMap<Skill, ProficiencyLevel>,
    pub saving_throws: BTreeSet<Ability>,
    pub tools: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub weapons: BTreeSet<String>,
    pub armor: BTreeSet<String>,
}

impl Proficiencies {
    pub fn skill_level(&self, skill: Skill) -> ProficiencyLevel {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    /// Grant proficiency without downgrading an existing expertise.
    pub fn grant_skill(&mut self, skill: Skill) {
        let level = self.skills.entry(skill).or_default();
        if matches!(level, ProficiencyLevel::None | ProficiencyLevel::Half) {
            *level = ProficiencyLevel::Proficient;
        }
    }
}

// ============================================================================
// Hit Points
// ============================================================================

/// Hit points tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
    #[serde(default)]
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
            temporary: 0,
        }
    }

    /// Apply damage, draining temporary hit points first. Returns true if
    /// the creature dropped to zero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let mut remaining = amount.max(0);
        let absorbed = self.temporary.min(remaining);
        self.temporary -= absorbed;
        remaining -= absorbed;
        self.current = (self.current - remaining).max(0);
        self.current == 0
    }

    /// Heal up to the maximum, returning the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.current;
        self.current = (self.current + amount.max(0)).min(self.maximum);
        self.current - old
    }

    /// Temporary hit points don't stack; the larger pool wins.
    pub fn add_temp_hp(&mut self, amount: i32) {
        self.temporary = self.temporary.max(amount);
    }
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::new(1)
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Where an inventory entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ItemSource {
    Species,
    Class,
    Background,
    #[default]
    Custom,
}

/// An item held by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub id: EntryId,
    pub item: Item,
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub source: ItemSource,
}

impl InventoryEntry {
    pub fn new(item: Item, quantity: u32, source: ItemSource) -> Self {
        Self {
            id: EntryId::new(),
            item,
            quantity: quantity.max(1),
            equipped: false,
            source,
        }
    }
}

/// Coins carried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub cp: u32,
    pub sp: u32,
    pub ep: u32,
    pub gp: u32,
    pub pp: u32,
}

impl Currency {
    pub fn gold(gp: u32) -> Self {
        Self {
            gp,
            ..Self::default()
        }
    }

    /// Total wealth expressed in gold pieces.
    pub fn total_gp(&self) -> f64 {
        self.cp as f64 / 100.0
            + self.sp as f64 / 10.0
            + self.ep as f64 / 2.0
            + self.gp as f64
            + self.pp as f64 * 10.0
    }
}

// ============================================================================
// Features and Spellcasting
// ============================================================================

/// A class feature, species trait, or background feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
}

impl Feature {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source: source.into(),
        }
    }
}

/// Spell slots at one spell level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub total: u8,
    pub used: u8,
}

impl SlotInfo {
    pub fn available(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }
}

/// A character's spellcasting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellcasting {
    pub ability: Ability,
    #[serde(default)]
    pub save_dc: i8,
    #[serde(default)]
    pub attack_bonus: i8,
    /// Slots keyed by spell level (1..=9).
    #[serde(default)]
    pub slots: BTreeMap<u8, SlotInfo>,
    #[serde(default)]
    pub cantrips: Vec<String>,
    #[serde(default)]
    pub spells_known: Vec<String>,
    #[serde(default)]
    pub spells_prepared: Vec<String>,
}

impl Spellcasting {
    pub fn new(ability: Ability) -> Self {
        Self {
            ability,
            save_dc: 0,
            attack_bonus: 0,
            slots: BTreeMap::new(),
            cantrips: Vec::new(),
            spells_known: Vec::new(),
            spells_prepared: Vec::new(),
        }
    }

    /// Spend one slot of the given level. Returns false if none remain.
    pub fn use_slot(&mut self, level: u8) -> bool {
        match self.slots.get_mut(&level) {
            Some(slot) if slot.available() > 0 => {
                slot.used += 1;
                true
            }
            _ => false,
        }
    }

    pub fn recover_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.used = 0;
        }
    }
}

/// The parts of a class definition a sheet needs to derive its stats.
///
/// Copied onto the sheet at creation so derivation never needs the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSnapshot {
    #[serde(default)]
    pub class_id: Option<ContentId>,
    pub name: String,
    pub hit_die: DieType,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    #[serde(default)]
    pub spellcasting: Option<SpellcastingProfile>,
    /// Casting granted by a subclass, used when the class itself has none.
    #[serde(default)]
    pub subclass_spellcasting: Option<SpellcastingProfile>,
}

impl ClassSnapshot {
    pub fn is_monk(&self) -> bool {
        self.name.eq_ignore_ascii_case("monk")
    }
}

// ============================================================================
// Character Sheet
// ============================================================================

/// Complete character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub player_name: Option<String>,
    pub level: u8,
    #[serde(default)]
    pub experience: u32,

    pub species: String,
    #[serde(default)]
    pub species_id: Option<ContentId>,
    pub class: ClassSnapshot,
    #[serde(default)]
    pub subclass: Option<String>,
    pub background: String,
    #[serde(default)]
    pub background_id: Option<ContentId>,

    pub ability_scores: AbilityScores,
    pub proficiencies: Proficiencies,
    pub hit_points: HitPoints,
    pub speed: u32,

    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,

    #[serde(default)]
    pub backstory: Option<String>,
    #[serde(default)]
    pub notes: String,

    // Derived values, rewritten by `recompute`.
    #[serde(default)]
    pub ability_modifiers: BTreeMap<Ability, i8>,
    #[serde(default)]
    pub proficiency_bonus: i8,
    #[serde(default)]
    pub skills: BTreeMap<Skill, i8>,
    #[serde(default)]
    pub saving_throws: BTreeMap<Ability, i8>,
    #[serde(default)]
    pub armor_class: i32,
    #[serde(default)]
    pub initiative: i8,
    #[serde(default)]
    pub passive_perception: i32,
}

impl CharacterSheet {
    /// A blank level 1 sheet. Call `recompute` before reading derived values.
    pub fn new(name: impl Into<String>, class: ClassSnapshot) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            player_name: None,
            level: 1,
            experience: 0,
            species: String::new(),
            species_id: None,
            class,
            subclass: None,
            background: String::new(),
            background_id: None,
            ability_scores: AbilityScores::default(),
            proficiencies: Proficiencies::default(),
            hit_points: HitPoints::default(),
            speed: 30,
            inventory: Vec::new(),
            currency: Currency::default(),
            features: Vec::new(),
            spellcasting: None,
            backstory: None,
            notes: String::new(),
            ability_modifiers: BTreeMap::new(),
            proficiency_bonus: 2,
            skills: BTreeMap::new(),
            saving_throws: BTreeMap::new(),
            armor_class: 10,
            initiative: 0,
            passive_perception: 10,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        self.ability_scores.modifier(ability)
    }

    pub fn entry(&self, id: EntryId) -> Option<&InventoryEntry> {
        self.inventory.iter().find(|e| e.id == id)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut InventoryEntry> {
        self.inventory.iter_mut().find(|e| e.id == id)
    }

    /// Find an inventory entry by item name, ignoring case.
    pub fn entry_by_name(&self, name: &str) -> Option<&InventoryEntry> {
        self.inventory
            .iter()
            .find(|e| e.item.name.eq_ignore_ascii_case(name))
    }

    pub fn equipped(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.inventory.iter().filter(|e| e.equipped)
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features
            .iter()
            .any(|f| f.name.to_lowercase().contains(&name.to_lowercase()))
    }

    pub fn is_proficient_save(&self, ability: Ability) -> bool {
        self.proficiencies.saving_throws.contains(&ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_from_name() {
        assert_eq!(Ability::from_name("dex"), Some(Ability::Dexterity));
        assert_eq!(Ability::from_name("Wisdom"), Some(Ability::Wisdom));
        assert_eq!(Ability::from_name("luck"), None);
    }

    #[test]
    fn test_skill_from_name() {
        assert_eq!(Skill::from_name("Sleight of Hand"), Some(Skill::SleightOfHand));
        assert_eq!(Skill::from_name("animal_handling"), Some(Skill::AnimalHandling));
        assert_eq!(Skill::from_name("Basket Weaving"), None);
    }

    #[test]
    fn test_apply_bonus_clamps() {
        let mut scores = AbilityScores::new(29, 10, 10, 10, 10, 1);
        scores.apply_bonus(Ability::Strength, 2);
        scores.apply_bonus(Ability::Charisma, -2);
        assert_eq!(scores.strength, 30);
        assert_eq!(scores.charisma, 1);
    }

    #[test]
    fn test_temp_hp_absorbs_damage_first() {
        let mut hp = HitPoints::new(12);
        hp.add_temp_hp(5);
        assert!(!hp.take_damage(8));
        assert_eq!(hp.temporary, 0);
        assert_eq!(hp.current, 9);
        assert!(hp.take_damage(20));
        assert_eq!(hp.current, 0);
    }

    #[test]
    fn test_grant_skill_keeps_expertise() {
        let mut profs = Proficiencies::default();
        profs.skills.insert(Skill::Stealth, ProficiencyLevel::Expertise);
        profs.grant_skill(Skill::Stealth);
        profs.grant_skill(Skill::Arcana);
        assert_eq!(profs.skill_level(Skill::Stealth), ProficiencyLevel::Expertise);
        assert_eq!(profs.skill_level(Skill::Arcana), ProficiencyLevel::Proficient);
    }

    #[test]
    fn test_use_slot() {
        let mut casting = Spellcasting::new(Ability::Intelligence);
        casting.slots.insert(1, SlotInfo { total: 1, used: 0 });
        assert!(casting.use_slot(1));
        assert!(!casting.use_slot(1));
        assert!(!casting.use_slot(2));
        casting.recover_all();
        assert_eq!(casting.slots[&1].available(), 1);
    }

    #[test]
    fn test_builtin_ids_are_stable() {
        assert_eq!(
            ContentId::builtin("item", "Longsword"),
            ContentId::builtin("item", "longsword")
        );
        assert_ne!(
            ContentId::builtin("item", "Longsword"),
            ContentId::builtin("spell", "Longsword")
        );
    }
}
