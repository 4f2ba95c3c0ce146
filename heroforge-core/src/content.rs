//! Content catalogs: species, classes, subclasses, backgrounds, items, spells
//! and NPCs.
//!
//! Built-in SRD entries live in static lists with stable ids; user-authored
//! entries live in [`HeroForgeData`]. [`Catalog`] looks through both, custom
//! entries first, so a custom "Elf" shadows the built-in one.

use crate::bestiary::{NpcDef, BUILTIN_NPCS};
use crate::character::{Ability, ClassSnapshot, ContentId, Skill};
use crate::class_data::{CasterProgression, CharacterClass, SpellcastingProfile};
use crate::dice::DieType;
use crate::items::{self, Item};
use crate::spells::{SpellDef, BUILTIN_SPELLS};
use crate::store::{reduce, Action, HeroForgeData, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ============================================================================
// Content kinds
// ============================================================================

/// The kinds of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentKind {
    Species,
    Class,
    Subclass,
    Background,
    Item,
    Spell,
    Npc,
}

impl ContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Species => "species",
            ContentKind::Class => "class",
            ContentKind::Subclass => "subclass",
            ContentKind::Background => "background",
            ContentKind::Item => "item",
            ContentKind::Spell => "spell",
            ContentKind::Npc => "npc",
        }
    }

    pub fn all() -> [ContentKind; 7] {
        [
            ContentKind::Species,
            ContentKind::Class,
            ContentKind::Subclass,
            ContentKind::Background,
            ContentKind::Item,
            ContentKind::Spell,
            ContentKind::Npc,
        ]
    }

    pub fn from_name(name: &str) -> Option<ContentKind> {
        match name.trim().to_lowercase().as_str() {
            "species" | "race" | "races" => Some(ContentKind::Species),
            "class" | "classes" => Some(ContentKind::Class),
            "subclass" | "subclasses" => Some(ContentKind::Subclass),
            "background" | "backgrounds" => Some(ContentKind::Background),
            "item" | "items" => Some(ContentKind::Item),
            "spell" | "spells" => Some(ContentKind::Spell),
            "npc" | "npcs" | "monster" | "monsters" => Some(ContentKind::Npc),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Creature size categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Size {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl Size {
    pub fn from_name(name: &str) -> Option<Size> {
        match name.trim().to_lowercase().as_str() {
            "tiny" => Some(Size::Tiny),
            "small" => Some(Size::Small),
            "medium" => Some(Size::Medium),
            "large" => Some(Size::Large),
            "huge" => Some(Size::Huge),
            "gargantuan" => Some(Size::Gargantuan),
            _ => None,
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// A named trait or feature without a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl TraitDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A class or subclass feature gained at a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFeature {
    pub level: u8,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDef {
    pub id: ContentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size: Size,
    pub speed: u32,
    #[serde(default)]
    pub ability_bonuses: BTreeMap<Ability, i8>,
    #[serde(default)]
    pub darkvision: Option<u32>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub skill_proficiencies: Vec<Skill>,
    #[serde(default)]
    pub traits: Vec<TraitDef>,
}

impl SpeciesDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ContentId::new(),
            name: name.into(),
            description: String::new(),
            size: Size::Medium,
            speed: 30,
            ability_bonuses: BTreeMap::new(),
            darkvision: None,
            languages: vec!["Common".to_string()],
            skill_proficiencies: Vec::new(),
            traits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    pub id: ContentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub hit_die: DieType,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    #[serde(default)]
    pub skill_options: Vec<Skill>,
    #[serde(default)]
    pub skill_count: u8,
    #[serde(default)]
    pub armor_proficiencies: Vec<String>,
    #[serde(default)]
    pub weapon_proficiencies: Vec<String>,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    #[serde(default)]
    pub spellcasting: Option<SpellcastingProfile>,
    #[serde(default)]
    pub features: Vec<LevelFeature>,
    #[serde(default)]
    pub starting_equipment: Vec<String>,
    #[serde(default = "default_subclass_level")]
    pub subclass_level: u8,
}

fn default_subclass_level() -> u8 {
    3
}

impl ClassDef {
    pub fn new(name: impl Into<String>, hit_die: DieType) -> Self {
        Self {
            id: ContentId::new(),
            name: name.into(),
            description: String::new(),
            hit_die,
            saving_throws: Vec::new(),
            skill_options: Vec::new(),
            skill_count: 2,
            armor_proficiencies: Vec::new(),
            weapon_proficiencies: Vec::new(),
            tool_proficiencies: Vec::new(),
            spellcasting: None,
            features: Vec::new(),
            starting_equipment: Vec::new(),
            subclass_level: default_subclass_level(),
        }
    }

    /// The parts of this class a character sheet carries.
    pub fn snapshot(&self) -> ClassSnapshot {
        ClassSnapshot {
            class_id: Some(self.id),
            name: self.name.clone(),
            hit_die: self.hit_die,
            saving_throws: self.saving_throws.clone(),
            spellcasting: self.spellcasting,
            subclass_spellcasting: None,
        }
    }

    pub fn features_up_to(&self, level: u8) -> impl Iterator<Item = &LevelFeature> {
        self.features.iter().filter(move |f| f.level <= level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubclassDef {
    pub id: ContentId,
    pub name: String,
    pub class_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<LevelFeature>,
    /// Spellcasting granted by the subclass itself (Eldritch Knight, Arcane Trickster).
    #[serde(default)]
    pub spellcasting: Option<SpellcastingProfile>,
}

impl SubclassDef {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: ContentId::new(),
            name: name.into(),
            class_name: class_name.into(),
            description: String::new(),
            features: Vec::new(),
            spellcasting: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDef {
    pub id: ContentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skill_proficiencies: Vec<Skill>,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub feature: Option<TraitDef>,
    #[serde(default)]
    pub gold: u32,
}

impl BackgroundDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ContentId::new(),
            name: name.into(),
            description: String::new(),
            skill_proficiencies: Vec::new(),
            tool_proficiencies: Vec::new(),
            languages: Vec::new(),
            equipment: Vec::new(),
            feature: None,
            gold: 10,
        }
    }
}

// ============================================================================
// Catalog lookup
// ============================================================================

/// Common access to catalog entries.
pub trait CatalogEntry: Clone {
    const KIND: ContentKind;

    fn id(&self) -> ContentId;
    fn name(&self) -> &str;
}

macro_rules! catalog_entry {
    ($ty:ty, $kind:expr) => {
        impl CatalogEntry for $ty {
            const KIND: ContentKind = $kind;

            fn id(&self) -> ContentId {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

catalog_entry!(SpeciesDef, ContentKind::Species);
catalog_entry!(ClassDef, ContentKind::Class);
catalog_entry!(SubclassDef, ContentKind::Subclass);
catalog_entry!(BackgroundDef, ContentKind::Background);
catalog_entry!(Item, ContentKind::Item);
catalog_entry!(SpellDef, ContentKind::Spell);
catalog_entry!(NpcDef, ContentKind::Npc);

fn matches_key<T: CatalogEntry>(entry: &T, key: &str) -> bool {
    let key = key.trim();
    match key.parse::<ContentId>() {
        Ok(id) => entry.id() == id,
        Err(_) => entry.name().eq_ignore_ascii_case(key),
    }
}

fn find_in<'a, 'b: 'a, T: CatalogEntry + 'b>(
    custom: &'a [T],
    builtin: impl IntoIterator<Item = &'b T>,
    key: &str,
) -> Option<&'a T> {
    custom
        .iter()
        .find(|e| matches_key(*e, key))
        .or_else(|| builtin.into_iter().find(|e| matches_key(*e, key)))
}

fn merge_lists<'a, 'b: 'a, T: CatalogEntry + 'b>(
    custom: &'a [T],
    builtin: impl IntoIterator<Item = &'b T>,
) -> Vec<&'a T> {
    let shadowed: BTreeSet<String> = custom.iter().map(|e| e.name().to_lowercase()).collect();
    let mut merged: Vec<&'a T> = custom.iter().collect();
    merged.extend(
        builtin
            .into_iter()
            .filter(|e| !shadowed.contains(&e.name().to_lowercase()))
            .map(|e| -> &'a T { e }),
    );
    merged
}

/// Read-only view over built-in and custom content.
#[derive(Clone, Copy)]
pub struct Catalog<'a> {
    data: &'a HeroForgeData,
}

impl<'a> Catalog<'a> {
    pub fn new(data: &'a HeroForgeData) -> Self {
        Self { data }
    }

    /// Look up a species by id or name.
    pub fn species(&self, key: &str) -> Option<&'a SpeciesDef> {
        find_in(&self.data.custom_species, BUILTIN_SPECIES.iter(), key)
    }

    pub fn class(&self, key: &str) -> Option<&'a ClassDef> {
        find_in(&self.data.custom_classes, BUILTIN_CLASSES.iter(), key)
    }

    pub fn subclass(&self, key: &str) -> Option<&'a SubclassDef> {
        find_in(&self.data.custom_subclasses, BUILTIN_SUBCLASSES.iter(), key)
    }

    pub fn background(&self, key: &str) -> Option<&'a BackgroundDef> {
        find_in(&self.data.custom_backgrounds, BUILTIN_BACKGROUNDS.iter(), key)
    }

    pub fn item(&self, key: &str) -> Option<&'a Item> {
        find_in(&self.data.custom_items, items::all_items(), key)
    }

    pub fn spell(&self, key: &str) -> Option<&'a SpellDef> {
        find_in(&self.data.custom_spells, BUILTIN_SPELLS.iter(), key)
    }

    pub fn npc(&self, key: &str) -> Option<&'a NpcDef> {
        find_in(&self.data.custom_npcs, BUILTIN_NPCS.iter(), key)
    }

    pub fn all_species(&self) -> Vec<&'a SpeciesDef> {
        merge_lists(&self.data.custom_species, BUILTIN_SPECIES.iter())
    }

    pub fn all_classes(&self) -> Vec<&'a ClassDef> {
        merge_lists(&self.data.custom_classes, BUILTIN_CLASSES.iter())
    }

    /// Subclasses available to a class, by class name.
    pub fn subclasses_of(&self, class_name: &str) -> Vec<&'a SubclassDef> {
        merge_lists(&self.data.custom_subclasses, BUILTIN_SUBCLASSES.iter())
            .into_iter()
            .filter(|s| s.class_name.eq_ignore_ascii_case(class_name))
            .collect()
    }

    pub fn all_backgrounds(&self) -> Vec<&'a BackgroundDef> {
        merge_lists(&self.data.custom_backgrounds, BUILTIN_BACKGROUNDS.iter())
    }

    pub fn all_items(&self) -> Vec<&'a Item> {
        merge_lists(&self.data.custom_items, items::all_items())
    }

    pub fn all_spells(&self) -> Vec<&'a SpellDef> {
        merge_lists(&self.data.custom_spells, BUILTIN_SPELLS.iter())
    }

    pub fn all_npcs(&self) -> Vec<&'a NpcDef> {
        merge_lists(&self.data.custom_npcs, BUILTIN_NPCS.iter())
    }

    /// Names of every entry of a kind, custom first.
    pub fn names(&self, kind: ContentKind) -> Vec<String> {
        fn collect<T: CatalogEntry>(entries: Vec<&T>) -> Vec<String> {
            entries.into_iter().map(|e| e.name().to_string()).collect()
        }
        match kind {
            ContentKind::Species => collect(self.all_species()),
            ContentKind::Class => collect(self.all_classes()),
            ContentKind::Subclass => collect(merge_lists(
                &self.data.custom_subclasses,
                BUILTIN_SUBCLASSES.iter(),
            )),
            ContentKind::Background => collect(self.all_backgrounds()),
            ContentKind::Item => collect(self.all_items()),
            ContentKind::Spell => collect(self.all_spells()),
            ContentKind::Npc => collect(self.all_npcs()),
        }
    }
}

// ============================================================================
// Custom content manager
// ============================================================================

/// Stages deletions of custom content so they can be reviewed and undone
/// before being applied together.
#[derive(Debug, Default, Clone)]
pub struct ContentManager {
    marked: BTreeSet<(ContentKind, ContentId)>,
}

impl ContentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an entry for deletion. Returns false if it was already marked.
    pub fn mark(&mut self, kind: ContentKind, id: ContentId) -> bool {
        self.marked.insert((kind, id))
    }

    /// Undo a mark. Returns false if the entry wasn't marked.
    pub fn unmark(&mut self, kind: ContentKind, id: ContentId) -> bool {
        self.marked.remove(&(kind, id))
    }

    pub fn is_marked(&self, kind: ContentKind, id: ContentId) -> bool {
        self.marked.contains(&(kind, id))
    }

    pub fn pending(&self) -> usize {
        self.marked.len()
    }

    /// Delete every marked entry.
    ///
    /// All marks are checked before anything is removed, so a mark that no
    /// longer matches a custom entry leaves `data` untouched.
    pub fn commit(&mut self, data: &mut HeroForgeData) -> Result<usize, StoreError> {
        for (kind, id) in &self.marked {
            if !data.has_custom(*kind, *id) {
                return Err(StoreError::ContentNotFound(*kind, *id));
            }
        }
        let count = self.marked.len();
        for (kind, id) in std::mem::take(&mut self.marked) {
            reduce(data, Action::DeleteContent { kind, id })?;
        }
        Ok(count)
    }
}

// ============================================================================
// Built-in species, subclasses and backgrounds
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn builtin_species(
    name: &str,
    description: &str,
    size: Size,
    speed: u32,
    bonuses: &[(Ability, i8)],
    darkvision: Option<u32>,
    languages: &[&str],
    skills: &[Skill],
    traits: &[(&str, &str)],
) -> SpeciesDef {
    SpeciesDef {
        id: ContentId::builtin("species", name),
        name: name.to_string(),
        description: description.to_string(),
        size,
        speed,
        ability_bonuses: bonuses.iter().copied().collect(),
        darkvision,
        languages: languages.iter().map(|s| s.to_string()).collect(),
        skill_proficiencies: skills.to_vec(),
        traits: traits.iter().map(|(n, d)| TraitDef::new(*n, *d)).collect(),
    }
}

fn builtin_background(
    name: &str,
    description: &str,
    skills: [Skill; 2],
    tools: &[&str],
    equipment: &[&str],
    feature: (&str, &str),
    gold: u32,
) -> BackgroundDef {
    BackgroundDef {
        id: ContentId::builtin("background", name),
        name: name.to_string(),
        description: description.to_string(),
        skill_proficiencies: skills.to_vec(),
        tool_proficiencies: tools.iter().map(|s| s.to_string()).collect(),
        languages: Vec::new(),
        equipment: equipment.iter().map(|s| s.to_string()).collect(),
        feature: Some(TraitDef::new(feature.0, feature.1)),
        gold,
    }
}

fn builtin_subclass(
    name: &str,
    class_name: &str,
    description: &str,
    features: &[(u8, &str, &str)],
    spellcasting: Option<SpellcastingProfile>,
) -> SubclassDef {
    SubclassDef {
        id: ContentId::builtin("subclass", name),
        name: name.to_string(),
        class_name: class_name.to_string(),
        description: description.to_string(),
        features: features
            .iter()
            .map(|(level, n, d)| LevelFeature {
                level: *level,
                name: n.to_string(),
                description: d.to_string(),
            })
            .collect(),
        spellcasting,
    }
}

lazy_static::lazy_static! {
    /// The 9 PHB species.
    pub static ref BUILTIN_SPECIES: Vec<SpeciesDef> = {
        use Ability::*;
        vec![
            builtin_species("Human", "Versatile and ambitious, humans are the most adaptable of all peoples.",
                Size::Medium, 30,
                &[(Strength, 1), (Dexterity, 1), (Constitution, 1), (Intelligence, 1), (Wisdom, 1), (Charisma, 1)],
                None, &["Common"], &[], &[]),
            builtin_species("Elf", "Graceful and long-lived, elves are masters of magic and artistry.",
                Size::Medium, 30, &[(Dexterity, 2)], Some(60), &["Common", "Elvish"],
                &[Skill::Perception],
                &[("Keen Senses", "Proficiency in the Perception skill."),
                  ("Fey Ancestry", "Advantage on saves against being charmed; magic can't put you to sleep."),
                  ("Trance", "You meditate for 4 hours instead of sleeping.")]),
            builtin_species("Dwarf", "Stout and hardy, dwarves are renowned craftsmen and fierce warriors.",
                Size::Medium, 25, &[(Constitution, 2)], Some(60), &["Common", "Dwarvish"], &[],
                &[("Dwarven Resilience", "Advantage on saves against poison and resistance to poison damage."),
                  ("Stonecunning", "Double proficiency on History checks related to stonework.")]),
            builtin_species("Halfling", "Small but brave, halflings are known for their luck and stealth.",
                Size::Small, 25, &[(Dexterity, 2)], None, &["Common", "Halfling"], &[],
                &[("Lucky", "Reroll a natural 1 on an attack roll, ability check, or saving throw."),
                  ("Brave", "Advantage on saves against being frightened."),
                  ("Halfling Nimbleness", "Move through the space of any creature larger than you.")]),
            builtin_species("Half-Orc", "Strong and enduring, half-orcs combine human versatility with orcish might.",
                Size::Medium, 30, &[(Strength, 2), (Constitution, 1)], Some(60), &["Common", "Orc"],
                &[Skill::Intimidation],
                &[("Menacing", "Proficiency in the Intimidation skill."),
                  ("Relentless Endurance", "When reduced to 0 HP but not killed, drop to 1 HP instead once per long rest."),
                  ("Savage Attacks", "Roll one extra weapon damage die on a melee critical hit.")]),
            builtin_species("Half-Elf", "Charismatic and adaptable, half-elves bridge two worlds.",
                Size::Medium, 30, &[(Charisma, 2)], Some(60), &["Common", "Elvish"], &[],
                &[("Fey Ancestry", "Advantage on saves against being charmed; magic can't put you to sleep."),
                  ("Skill Versatility", "Gain proficiency in two skills of your choice.")]),
            builtin_species("Tiefling", "Touched by infernal heritage, tieflings possess innate magical abilities.",
                Size::Medium, 30, &[(Charisma, 2), (Intelligence, 1)], Some(60), &["Common", "Infernal"], &[],
                &[("Hellish Resistance", "Resistance to fire damage."),
                  ("Infernal Legacy", "You know the thaumaturgy cantrip.")]),
            builtin_species("Gnome", "Curious and inventive, gnomes are natural tinkers and illusionists.",
                Size::Small, 25, &[(Intelligence, 2)], Some(60), &["Common", "Gnomish"], &[],
                &[("Gnome Cunning", "Advantage on INT, WIS, and CHA saves against magic.")]),
            builtin_species("Dragonborn", "Proud and powerful, dragonborn carry the blood of dragons.",
                Size::Medium, 30, &[(Strength, 2), (Charisma, 1)], None, &["Common", "Draconic"], &[],
                &[("Draconic Ancestry", "Choose a dragon type that sets your breath weapon and resistance."),
                  ("Breath Weapon", "Exhale destructive energy in a line or cone, 2d6 damage."),
                  ("Damage Resistance", "Resistance to the damage type of your ancestry.")]),
        ]
    };

    /// The 12 PHB classes.
    pub static ref BUILTIN_CLASSES: Vec<ClassDef> =
        CharacterClass::all().iter().map(|c| c.definition()).collect();

    /// A starter set of subclasses.
    pub static ref BUILTIN_SUBCLASSES: Vec<SubclassDef> = vec![
        builtin_subclass("Path of the Berserker", "Barbarian", "A path of untamed fury.",
            &[(3, "Frenzy", "While raging, make a single melee attack as a bonus action.")], None),
        builtin_subclass("College of Lore", "Bard", "Bards who collect knowledge from every source.",
            &[(3, "Cutting Words", "Use Bardic Inspiration to reduce an enemy's roll.")], None),
        builtin_subclass("Life Domain", "Cleric", "Clerics devoted to the positive energy of life.",
            &[(1, "Disciple of Life", "Healing spells restore an extra 2 + spell level hit points.")], None),
        builtin_subclass("Circle of the Land", "Druid", "Mystics and sages who safeguard ancient knowledge.",
            &[(2, "Natural Recovery", "Recover spell slots during a short rest.")], None),
        builtin_subclass("Champion", "Fighter", "Raw physical power honed to deadly perfection.",
            &[(3, "Improved Critical", "Your weapon attacks score a critical hit on a roll of 19 or 20.")], None),
        builtin_subclass("Eldritch Knight", "Fighter", "Fighters who supplement martial mastery with magic.",
            &[(3, "Weapon Bond", "Bond with up to two weapons you can summon as a bonus action.")],
            Some(SpellcastingProfile::new(Ability::Intelligence, CasterProgression::Third))),
        builtin_subclass("Way of the Open Hand", "Monk", "Masters of martial arts combat.",
            &[(3, "Open Hand Technique", "Flurry of Blows can knock prone, push, or deny reactions.")], None),
        builtin_subclass("Oath of Devotion", "Paladin", "Paladins bound to the loftiest ideals of justice.",
            &[(3, "Sacred Weapon", "Imbue a weapon with positive energy, adding CHA to attack rolls.")], None),
        builtin_subclass("Hunter", "Ranger", "Rangers who stand between civilization and the wilds.",
            &[(3, "Hunter's Prey", "Colossus Slayer, Giant Killer, or Horde Breaker.")], None),
        builtin_subclass("Thief", "Rogue", "Burglars, bandits, cutpurses and other criminals.",
            &[(3, "Fast Hands", "Use Cunning Action to make Sleight of Hand checks or use an object.")], None),
        builtin_subclass("Arcane Trickster", "Rogue", "Rogues who enhance stealth and agility with magic.",
            &[(3, "Mage Hand Legerdemain", "Your mage hand is invisible and can pick locks.")],
            Some(SpellcastingProfile::new(Ability::Intelligence, CasterProgression::Third))),
        builtin_subclass("Draconic Bloodline", "Sorcerer", "Innate magic from draconic ancestry.",
            &[(1, "Draconic Resilience", "Your HP maximum increases by 1 per sorcerer level.")], None),
        builtin_subclass("The Fiend", "Warlock", "A pact with a being from the lower planes.",
            &[(1, "Dark One's Blessing", "Gain temporary HP when you reduce a hostile creature to 0 HP.")], None),
        builtin_subclass("School of Evocation", "Wizard", "Wizards who focus on elemental destruction.",
            &[(2, "Sculpt Spells", "Create pockets of safety within your evocation spells.")], None),
    ];

    /// The 13 PHB backgrounds.
    pub static ref BUILTIN_BACKGROUNDS: Vec<BackgroundDef> = vec![
        builtin_background("Acolyte", "You have spent your life in service to a temple.",
            [Skill::Insight, Skill::Religion], &[], &["Holy Symbol"],
            ("Shelter of the Faithful", "You and your companions can receive free healing at temples of your faith."), 15),
        builtin_background("Charlatan", "You have always had a way with people.",
            [Skill::Deception, Skill::SleightOfHand], &["disguise kit", "forgery kit"], &[],
            ("False Identity", "You have a second identity with documentation and acquaintances."), 15),
        builtin_background("Criminal", "You have a history of breaking the law.",
            [Skill::Deception, Skill::Stealth], &["thieves' tools"], &[],
            ("Criminal Contact", "You have a reliable contact in a criminal network."), 15),
        builtin_background("Entertainer", "You thrive in front of an audience.",
            [Skill::Acrobatics, Skill::Performance], &["disguise kit"], &[],
            ("By Popular Demand", "You can always find a place to perform in exchange for lodging."), 15),
        builtin_background("Folk Hero", "You come from a humble background but are destined for greatness.",
            [Skill::AnimalHandling, Skill::Survival], &["vehicles (land)"], &[],
            ("Rustic Hospitality", "Common folk will shelter you and hide you from the law."), 10),
        builtin_background("Guild Artisan", "You are a member of an artisan's guild.",
            [Skill::Insight, Skill::Persuasion], &["artisan's tools"], &[],
            ("Guild Membership", "Your guild offers lodging, support and political connections."), 15),
        builtin_background("Hermit", "You lived in seclusion for a formative part of your life.",
            [Skill::Medicine, Skill::Religion], &["herbalism kit"], &["Herbalism Kit"],
            ("Discovery", "Your seclusion granted you a unique and powerful discovery."), 5),
        builtin_background("Noble", "You understand wealth, power, and privilege.",
            [Skill::History, Skill::Persuasion], &[], &[],
            ("Position of Privilege", "People of high birth welcome you and commoners defer to you."), 25),
        builtin_background("Outlander", "You grew up in the wilds, far from civilization.",
            [Skill::Athletics, Skill::Survival], &["musical instrument"], &["Quarterstaff"],
            ("Wanderer", "You recall geography well and can find food and water for six people."), 10),
        builtin_background("Sage", "You spent years learning the lore of the multiverse.",
            [Skill::Arcana, Skill::History], &[], &[],
            ("Researcher", "When you don't know a piece of lore, you know where to find it."), 10),
        builtin_background("Sailor", "You sailed on a seagoing vessel for years.",
            [Skill::Athletics, Skill::Perception], &["navigator's tools", "vehicles (water)"], &["Rope (50 feet)"],
            ("Ship's Passage", "You can secure free passage on a sailing ship."), 10),
        builtin_background("Soldier", "You trained as a soldier and served in a military.",
            [Skill::Athletics, Skill::Intimidation], &["gaming set", "vehicles (land)"], &[],
            ("Military Rank", "Soldiers loyal to your former organization recognize your authority."), 10),
        builtin_background("Urchin", "You grew up on the streets, alone and poor.",
            [Skill::SleightOfHand, Skill::Stealth], &["disguise kit", "thieves' tools"], &[],
            ("City Secrets", "You know the secret patterns of cities and can travel twice as fast through them."), 10),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_counts() {
        assert_eq!(BUILTIN_SPECIES.len(), 9);
        assert_eq!(BUILTIN_CLASSES.len(), 12);
        assert_eq!(BUILTIN_BACKGROUNDS.len(), 13);
        for subclass in BUILTIN_SUBCLASSES.iter() {
            assert!(
                CharacterClass::from_name(&subclass.class_name).is_some(),
                "{} names unknown class {}",
                subclass.name,
                subclass.class_name
            );
        }
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let data = HeroForgeData::default();
        let catalog = Catalog::new(&data);
        let elf = catalog.species("elf").unwrap();
        assert_eq!(elf.ability_bonuses.get(&Ability::Dexterity), Some(&2));
        let by_id = catalog.species(&elf.id.to_string()).unwrap();
        assert_eq!(by_id.name, "Elf");
        assert!(catalog.class("Wizard").is_some());
        assert!(catalog.item("Shield").is_some());
        assert!(catalog.species("Warforged").is_none());
    }

    #[test]
    fn test_custom_entries_shadow_builtins() {
        let mut data = HeroForgeData::default();
        let mut elf = SpeciesDef::new("Elf");
        elf.speed = 35;
        data.custom_species.push(elf);

        let catalog = Catalog::new(&data);
        assert_eq!(catalog.species("Elf").unwrap().speed, 35);
        let elves = catalog
            .all_species()
            .into_iter()
            .filter(|s| s.name == "Elf")
            .count();
        assert_eq!(elves, 1);
        assert_eq!(catalog.all_species().len(), 9);
    }

    #[test]
    fn test_subclasses_of() {
        let data = HeroForgeData::default();
        let catalog = Catalog::new(&data);
        let fighter: Vec<_> = catalog
            .subclasses_of("fighter")
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert!(fighter.contains(&"Champion"));
        assert!(fighter.contains(&"Eldritch Knight"));
    }

    #[test]
    fn test_content_kind_from_name() {
        assert_eq!(ContentKind::from_name("Species"), Some(ContentKind::Species));
        assert_eq!(ContentKind::from_name("items"), Some(ContentKind::Item));
        assert_eq!(ContentKind::from_name("classes"), Some(ContentKind::Class));
        assert_eq!(ContentKind::from_name("npc"), Some(ContentKind::Npc));
        assert_eq!(ContentKind::from_name("vehicle"), None);
    }

    #[test]
    fn test_manager_mark_undo_commit() {
        let mut data = HeroForgeData::default();
        let kept = SpeciesDef::new("Kenku");
        let doomed = SpeciesDef::new("Tabaxi");
        let (kept_id, doomed_id) = (kept.id, doomed.id);
        data.custom_species.push(kept);
        data.custom_species.push(doomed);

        let mut manager = ContentManager::new();
        assert!(manager.mark(ContentKind::Species, kept_id));
        assert!(manager.mark(ContentKind::Species, doomed_id));
        assert!(manager.unmark(ContentKind::Species, kept_id));
        assert!(!manager.is_marked(ContentKind::Species, kept_id));

        assert_eq!(manager.commit(&mut data).unwrap(), 1);
        assert_eq!(manager.pending(), 0);
        assert_eq!(data.custom_species.len(), 1);
        assert_eq!(data.custom_species[0].id, kept_id);
    }

    #[test]
    fn test_manager_commit_rejects_stale_mark() {
        let mut data = HeroForgeData::default();
        let species = SpeciesDef::new("Kenku");
        let id = species.id;
        data.custom_species.push(species);

        let mut manager = ContentManager::new();
        manager.mark(ContentKind::Species, id);
        manager.mark(ContentKind::Item, ContentId::new());
        assert!(manager.commit(&mut data).is_err());
        assert_eq!(data.custom_species.len(), 1);
    }
}
