//! D&D 5e class data: spellcasting progressions and the 12 PHB classes.
//!
//! Slot tables follow the PHB multiclass spellcaster table. Half and third
//! casters index into the full-caster table at a reduced caster level, and
//! warlocks use the separate Pact Magic table.

use crate::character::{Ability, Skill};
use crate::content::{ClassDef, LevelFeature};
use crate::dice::DieType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Spellcasting progression
// ============================================================================

/// How quickly a class gains spell slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasterProgression {
    Full,
    Half,
    Third,
    Pact,
}

impl CasterProgression {
    pub fn from_name(name: &str) -> Option<CasterProgression> {
        match name.trim().to_lowercase().as_str() {
            "full" => Some(CasterProgression::Full),
            "half" => Some(CasterProgression::Half),
            "third" => Some(CasterProgression::Third),
            "pact" | "warlock" => Some(CasterProgression::Pact),
            _ => None,
        }
    }
}

/// Which ability a class casts with and how its slots progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellcastingProfile {
    pub ability: Ability,
    pub progression: CasterProgression,
}

impl SpellcastingProfile {
    pub fn new(ability: Ability, progression: CasterProgression) -> Self {
        Self {
            ability,
            progression,
        }
    }
}

/// Full-caster slots per spell level (index 0 = 1st level) for caster levels 1-20.
const FULL_CASTER_SLOTS: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

fn full_caster_slots(caster_level: u8) -> BTreeMap<u8, u8> {
    if caster_level == 0 {
        return BTreeMap::new();
    }
    let row = FULL_CASTER_SLOTS[(caster_level.min(20) - 1) as usize];
    row.iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(i, count)| (i as u8 + 1, *count))
        .collect()
}

/// Spell slot totals keyed by spell level for a class level.
pub fn spell_slots_for(progression: CasterProgression, level: u8) -> BTreeMap<u8, u8> {
    let level = level.clamp(1, 20);
    match progression {
        CasterProgression::Full => full_caster_slots(level),
        CasterProgression::Half => {
            if level < 2 {
                BTreeMap::new()
            } else {
                full_caster_slots(level.div_ceil(2))
            }
        }
        CasterProgression::Third => {
            if level < 3 {
                BTreeMap::new()
            } else {
                full_caster_slots(level.div_ceil(3))
            }
        }
        CasterProgression::Pact => {
            let count = match level {
                1 => 1,
                2..=10 => 2,
                11..=16 => 3,
                _ => 4,
            };
            let slot_level = match level {
                1..=2 => 1,
                3..=4 => 2,
                5..=6 => 3,
                7..=8 => 4,
                _ => 5,
            };
            BTreeMap::from([(slot_level, count)])
        }
    }
}

// ============================================================================
// Classes
// ============================================================================

/// The 12 PHB classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

fn feature(level: u8, name: &str, description: &str) -> LevelFeature {
    LevelFeature {
        level,
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

const ALL_SKILLS: [Skill; 18] = [
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
];

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    pub fn hit_die(&self) -> DieType {
        match self {
            CharacterClass::Barbarian => DieType::D12,
            CharacterClass::Fighter | CharacterClass::Paladin | CharacterClass::Ranger => {
                DieType::D10
            }
            CharacterClass::Bard
            | CharacterClass::Cleric
            | CharacterClass::Druid
            | CharacterClass::Monk
            | CharacterClass::Rogue
            | CharacterClass::Warlock => DieType::D8,
            CharacterClass::Sorcerer | CharacterClass::Wizard => DieType::D6,
        }
    }

    pub fn spellcasting(&self) -> Option<SpellcastingProfile> {
        use CasterProgression::*;
        let profile = match self {
            CharacterClass::Bard | CharacterClass::Sorcerer => {
                SpellcastingProfile::new(Ability::Charisma, Full)
            }
            CharacterClass::Cleric | CharacterClass::Druid => {
                SpellcastingProfile::new(Ability::Wisdom, Full)
            }
            CharacterClass::Wizard => SpellcastingProfile::new(Ability::Intelligence, Full),
            CharacterClass::Warlock => SpellcastingProfile::new(Ability::Charisma, Pact),
            CharacterClass::Paladin => SpellcastingProfile::new(Ability::Charisma, Half),
            CharacterClass::Ranger => SpellcastingProfile::new(Ability::Wisdom, Half),
            CharacterClass::Barbarian
            | CharacterClass::Fighter
            | CharacterClass::Monk
            | CharacterClass::Rogue => return None,
        };
        Some(profile)
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "A fierce warrior who can enter a battle rage",
            CharacterClass::Bard => "An inspiring magician whose music weaves magic",
            CharacterClass::Cleric => "A priestly champion who wields divine magic",
            CharacterClass::Druid => "A priest of the Old Faith, wielding nature's power",
            CharacterClass::Fighter => "A master of martial combat, skilled with weapons and armor",
            CharacterClass::Monk => "A master of martial arts, harnessing body and soul",
            CharacterClass::Paladin => "A holy warrior bound to a sacred oath",
            CharacterClass::Ranger => "A warrior who combats threats on the edges of civilization",
            CharacterClass::Rogue => "A scoundrel who uses stealth and trickery",
            CharacterClass::Sorcerer => "A spellcaster who draws on inherent magic",
            CharacterClass::Warlock => {
                "A wielder of magic derived from a bargain with an extraplanar entity"
            }
            CharacterClass::Wizard => "A scholarly magic-user who masters arcane secrets",
        }
    }

    /// Full catalog definition for this class.
    pub fn definition(&self) -> ClassDef {
        let mut def = ClassDef::new(self.name(), self.hit_die());
        def.id = crate::character::ContentId::builtin("class", self.name());
        def.description = self.description().to_string();
        def.spellcasting = self.spellcasting();
        def.subclass_level = 3;

        match self {
            CharacterClass::Barbarian => {
                def.saving_throws = vec![Ability::Strength, Ability::Constitution];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::Intimidation,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Survival,
                ];
                def.armor_proficiencies = strings(&["light armor", "medium armor", "shields"]);
                def.weapon_proficiencies = strings(&["simple weapons", "martial weapons"]);
                def.features = vec![
                    feature(1, "Rage", "Enter a rage as a bonus action. Gain advantage on STR checks and saves, bonus rage damage, and resistance to physical damage."),
                    feature(1, "Unarmored Defense", "While not wearing armor, your AC equals 10 + DEX modifier + CON modifier. You can use a shield and still gain this benefit."),
                    feature(2, "Reckless Attack", "Gain advantage on STR melee attacks this turn; attacks against you have advantage until your next turn."),
                    feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
                ];
                def.starting_equipment = strings(&["Greataxe", "Handaxe", "Javelin", "Backpack"]);
            }
            CharacterClass::Bard => {
                def.saving_throws = vec![Ability::Dexterity, Ability::Charisma];
                def.skill_count = 3;
                def.skill_options = ALL_SKILLS.to_vec();
                def.armor_proficiencies = strings(&["light armor"]);
                def.weapon_proficiencies = strings(&[
                    "simple weapons",
                    "hand crossbows",
                    "longswords",
                    "rapiers",
                    "shortswords",
                ]);
                def.tool_proficiencies = strings(&["three musical instruments"]);
                def.features = vec![
                    feature(1, "Bardic Inspiration", "As a bonus action, give one creature a d6 inspiration die to add to one ability check, attack, or save."),
                    feature(1, "Spellcasting", "You can cast bard spells using Charisma as your spellcasting ability."),
                    feature(2, "Jack of All Trades", "Add half your proficiency bonus to ability checks you aren't proficient in."),
                    feature(3, "Expertise", "Choose two skill proficiencies; your proficiency bonus is doubled for them."),
                ];
                def.starting_equipment = strings(&["Rapier", "Leather Armor", "Dagger", "Backpack"]);
            }
            CharacterClass::Cleric => {
                def.saving_throws = vec![Ability::Wisdom, Ability::Charisma];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::History,
                    Skill::Insight,
                    Skill::Medicine,
                    Skill::Persuasion,
                    Skill::Religion,
                ];
                def.armor_proficiencies = strings(&["light armor", "medium armor", "shields"]);
                def.weapon_proficiencies = strings(&["simple weapons"]);
                def.subclass_level = 1;
                def.features = vec![
                    feature(1, "Spellcasting", "You can cast cleric spells using Wisdom as your spellcasting ability."),
                    feature(1, "Divine Domain", "Choose a divine domain that grants you additional spells and features."),
                    feature(2, "Channel Divinity", "Channel divine energy to fuel magical effects."),
                    feature(5, "Destroy Undead", "Turned undead of low challenge rating are destroyed instantly."),
                ];
                def.starting_equipment =
                    strings(&["Mace", "Scale Mail", "Shield", "Holy Symbol", "Backpack"]);
            }
            CharacterClass::Druid => {
                def.saving_throws = vec![Ability::Intelligence, Ability::Wisdom];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Arcana,
                    Skill::AnimalHandling,
                    Skill::Insight,
                    Skill::Medicine,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Religion,
                    Skill::Survival,
                ];
                def.armor_proficiencies =
                    strings(&["light armor", "medium armor", "shields (nonmetal)"]);
                def.weapon_proficiencies = strings(&[
                    "clubs", "daggers", "darts", "javelins", "maces", "quarterstaffs",
                    "scimitars", "sickles", "slings", "spears",
                ]);
                def.tool_proficiencies = strings(&["herbalism kit"]);
                def.subclass_level = 2;
                def.features = vec![
                    feature(1, "Druidic", "You know Druidic, the secret language of druids."),
                    feature(1, "Spellcasting", "You can cast druid spells using Wisdom as your spellcasting ability."),
                    feature(2, "Wild Shape", "Magically assume the shape of a beast you have seen."),
                ];
                def.starting_equipment =
                    strings(&["Quarterstaff", "Leather Armor", "Herbalism Kit", "Backpack"]);
            }
            CharacterClass::Fighter => {
                def.saving_throws = vec![Ability::Strength, Ability::Constitution];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Acrobatics,
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::History,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Perception,
                    Skill::Survival,
                ];
                def.armor_proficiencies = strings(&["all armor", "shields"]);
                def.weapon_proficiencies = strings(&["simple weapons", "martial weapons"]);
                def.features = vec![
                    feature(1, "Fighting Style", "You adopt a particular style of fighting as your specialty."),
                    feature(1, "Second Wind", "As a bonus action, regain 1d10 + fighter level HP."),
                    feature(2, "Action Surge", "Take one additional action on your turn."),
                    feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
                ];
                def.starting_equipment = strings(&["Chain Mail", "Longsword", "Shield", "Light Crossbow", "Backpack"]);
            }
            CharacterClass::Monk => {
                def.saving_throws = vec![Ability::Strength, Ability::Dexterity];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Acrobatics,
                    Skill::Athletics,
                    Skill::History,
                    Skill::Insight,
                    Skill::Religion,
                    Skill::Stealth,
                ];
                def.weapon_proficiencies = strings(&["simple weapons", "shortswords"]);
                def.features = vec![
                    feature(1, "Unarmored Defense", "While wearing no armor and not wielding a shield, your AC equals 10 + DEX modifier + WIS modifier."),
                    feature(1, "Martial Arts", "You can use DEX for unarmed strikes and monk weapons. Your unarmed strike damage is 1d4."),
                    feature(2, "Ki", "Spend ki points to fuel Flurry of Blows, Patient Defense and Step of the Wind."),
                    feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
                ];
                def.starting_equipment = strings(&["Shortsword", "Dagger", "Backpack"]);
            }
            CharacterClass::Paladin => {
                def.saving_throws = vec![Ability::Wisdom, Ability::Charisma];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Athletics,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Medicine,
                    Skill::Persuasion,
                    Skill::Religion,
                ];
                def.armor_proficiencies = strings(&["all armor", "shields"]);
                def.weapon_proficiencies = strings(&["simple weapons", "martial weapons"]);
                def.features = vec![
                    feature(1, "Divine Sense", "Detect celestials, fiends, and undead within 60 feet."),
                    feature(1, "Lay on Hands", "You have a pool of healing equal to 5 x paladin level to restore with a touch."),
                    feature(2, "Spellcasting", "You can cast paladin spells using Charisma as your spellcasting ability."),
                    feature(2, "Divine Smite", "Expend a spell slot to deal extra radiant damage on a melee hit."),
                    feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
                ];
                def.starting_equipment =
                    strings(&["Chain Mail", "Longsword", "Shield", "Holy Symbol", "Backpack"]);
            }
            CharacterClass::Ranger => {
                def.saving_throws = vec![Ability::Strength, Ability::Dexterity];
                def.skill_count = 3;
                def.skill_options = vec![
                    Skill::AnimalHandling,
                    Skill::Athletics,
                    Skill::Insight,
                    Skill::Investigation,
                    Skill::Nature,
                    Skill::Perception,
                    Skill::Stealth,
                    Skill::Survival,
                ];
                def.armor_proficiencies = strings(&["light armor", "medium armor", "shields"]);
                def.weapon_proficiencies = strings(&["simple weapons", "martial weapons"]);
                def.features = vec![
                    feature(1, "Favored Enemy", "Choose a type of favored enemy. You have advantage on tracking them and recalling information about them."),
                    feature(1, "Natural Explorer", "Choose a favored terrain. You gain benefits when traveling and foraging in that terrain."),
                    feature(2, "Spellcasting", "You can cast ranger spells using Wisdom as your spellcasting ability."),
                    feature(5, "Extra Attack", "Attack twice when you take the Attack action."),
                ];
                def.starting_equipment = strings(&["Scale Mail", "Shortsword", "Longbow", "Arrows (20)", "Backpack"]);
            }
            CharacterClass::Rogue => {
                def.saving_throws = vec![Ability::Dexterity, Ability::Intelligence];
                def.skill_count = 4;
                def.skill_options = vec![
                    Skill::Acrobatics,
                    Skill::Athletics,
                    Skill::Deception,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Investigation,
                    Skill::Perception,
                    Skill::Performance,
                    Skill::Persuasion,
                    Skill::SleightOfHand,
                    Skill::Stealth,
                ];
                def.armor_proficiencies = strings(&["light armor"]);
                def.weapon_proficiencies = strings(&[
                    "simple weapons",
                    "hand crossbows",
                    "longswords",
                    "rapiers",
                    "shortswords",
                ]);
                def.tool_proficiencies = strings(&["thieves' tools"]);
                def.features = vec![
                    feature(1, "Expertise", "Choose two skills to gain expertise in (double proficiency bonus)."),
                    feature(1, "Sneak Attack", "Once per turn, deal extra 1d6 damage when you have advantage or an ally is adjacent to the target."),
                    feature(1, "Thieves' Cant", "You know Thieves' Cant, a secret mix of dialect, jargon, and code."),
                    feature(2, "Cunning Action", "Dash, Disengage, or Hide as a bonus action."),
                    feature(5, "Uncanny Dodge", "Use your reaction to halve the damage of an attack you can see."),
                ];
                def.starting_equipment = strings(&[
                    "Rapier",
                    "Shortbow",
                    "Leather Armor",
                    "Dagger",
                    "Thieves' Tools",
                    "Backpack",
                ]);
            }
            CharacterClass::Sorcerer => {
                def.saving_throws = vec![Ability::Constitution, Ability::Charisma];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Arcana,
                    Skill::Deception,
                    Skill::Insight,
                    Skill::Intimidation,
                    Skill::Persuasion,
                    Skill::Religion,
                ];
                def.weapon_proficiencies = strings(&[
                    "daggers", "darts", "slings", "quarterstaffs", "light crossbows",
                ]);
                def.subclass_level = 1;
                def.features = vec![
                    feature(1, "Spellcasting", "You can cast sorcerer spells using Charisma as your spellcasting ability."),
                    feature(1, "Sorcerous Origin", "Choose a sorcerous origin that describes the source of your innate magical power."),
                    feature(2, "Font of Magic", "Tap into sorcery points to create spell slots or fuel metamagic."),
                    feature(3, "Metamagic", "Twist your spells to suit your needs."),
                ];
                def.starting_equipment =
                    strings(&["Light Crossbow", "Component Pouch", "Dagger", "Backpack"]);
            }
            CharacterClass::Warlock => {
                def.saving_throws = vec![Ability::Wisdom, Ability::Charisma];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Arcana,
                    Skill::Deception,
                    Skill::History,
                    Skill::Intimidation,
                    Skill::Investigation,
                    Skill::Nature,
                    Skill::Religion,
                ];
                def.armor_proficiencies = strings(&["light armor"]);
                def.weapon_proficiencies = strings(&["simple weapons"]);
                def.subclass_level = 1;
                def.features = vec![
                    feature(1, "Otherworldly Patron", "You have struck a bargain with an otherworldly being."),
                    feature(1, "Pact Magic", "You can cast warlock spells using Charisma. Your spell slots recover on a short rest."),
                    feature(2, "Eldritch Invocations", "Fragments of forbidden knowledge grant you lasting magical abilities."),
                    feature(3, "Pact Boon", "Your patron grants a pact of the blade, chain, or tome."),
                ];
                def.starting_equipment = strings(&[
                    "Light Crossbow",
                    "Arcane Focus",
                    "Leather Armor",
                    "Dagger",
                    "Backpack",
                ]);
            }
            CharacterClass::Wizard => {
                def.saving_throws = vec![Ability::Intelligence, Ability::Wisdom];
                def.skill_count = 2;
                def.skill_options = vec![
                    Skill::Arcana,
                    Skill::History,
                    Skill::Insight,
                    Skill::Investigation,
                    Skill::Medicine,
                    Skill::Religion,
                ];
                def.weapon_proficiencies = strings(&[
                    "daggers", "darts", "slings", "quarterstaffs", "light crossbows",
                ]);
                def.subclass_level = 2;
                def.features = vec![
                    feature(1, "Spellcasting", "You can cast wizard spells using Intelligence as your spellcasting ability."),
                    feature(1, "Arcane Recovery", "Once per day during a short rest, recover spell slots with a combined level equal to half your wizard level (rounded up)."),
                    feature(2, "Arcane Tradition", "Choose an arcane tradition shaping your practice of magic."),
                ];
                def.starting_equipment =
                    strings(&["Quarterstaff", "Spellbook", "Component Pouch", "Backpack"]);
            }
        }
        def
    }

    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }

    pub fn from_name(name: &str) -> Option<CharacterClass> {
        CharacterClass::all()
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_classes_have_data() {
        for class in CharacterClass::all() {
            let def = class.definition();
            assert_eq!(def.saving_throws.len(), 2, "{}", def.name);
            assert!(def.skill_count > 0);
            assert!(!def.skill_options.is_empty());
            assert!(def.features.iter().any(|f| f.level == 1));
            for name in &def.starting_equipment {
                assert!(
                    crate::items::find_item(name).is_some(),
                    "{} starts with unknown item {}",
                    def.name,
                    name
                );
            }
        }
    }

    #[test]
    fn test_fighter_data() {
        let def = CharacterClass::Fighter.definition();
        assert_eq!(def.saving_throws, vec![Ability::Strength, Ability::Constitution]);
        assert_eq!(def.hit_die, DieType::D10);
        assert!(def.spellcasting.is_none());
        assert!(def.features.iter().any(|f| f.name == "Second Wind"));
    }

    #[test]
    fn test_rogue_gets_4_skills() {
        assert_eq!(CharacterClass::Rogue.definition().skill_count, 4);
    }

    #[test]
    fn test_full_caster_slots() {
        let slots = spell_slots_for(CasterProgression::Full, 1);
        assert_eq!(slots, BTreeMap::from([(1, 2)]));
        let slots = spell_slots_for(CasterProgression::Full, 5);
        assert_eq!(slots, BTreeMap::from([(1, 4), (2, 3), (3, 2)]));
        let slots = spell_slots_for(CasterProgression::Full, 20);
        assert_eq!(slots.get(&9), Some(&1));
        assert_eq!(slots.get(&7), Some(&2));
    }

    #[test]
    fn test_half_and_third_casters() {
        assert!(spell_slots_for(CasterProgression::Half, 1).is_empty());
        assert_eq!(
            spell_slots_for(CasterProgression::Half, 2),
            BTreeMap::from([(1, 2)])
        );
        assert_eq!(
            spell_slots_for(CasterProgression::Half, 5),
            BTreeMap::from([(1, 4), (2, 2)])
        );
        assert!(spell_slots_for(CasterProgression::Third, 2).is_empty());
        assert_eq!(
            spell_slots_for(CasterProgression::Third, 3),
            BTreeMap::from([(1, 2)])
        );
    }

    #[test]
    fn test_pact_magic() {
        assert_eq!(
            spell_slots_for(CasterProgression::Pact, 1),
            BTreeMap::from([(1, 1)])
        );
        assert_eq!(
            spell_slots_for(CasterProgression::Pact, 5),
            BTreeMap::from([(3, 2)])
        );
        assert_eq!(
            spell_slots_for(CasterProgression::Pact, 17),
            BTreeMap::from([(5, 4)])
        );
    }

    #[test]
    fn test_class_from_name() {
        assert_eq!(CharacterClass::from_name("wizard"), Some(CharacterClass::Wizard));
        assert_eq!(CharacterClass::from_name("Artificer"), None);
    }
}
