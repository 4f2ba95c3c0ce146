//! Spell definitions and the built-in starter spell list.

use crate::character::{Ability, ContentId};
use crate::items::DamageType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schools of magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    #[default]
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SpellSchool {
    pub fn name(&self) -> &'static str {
        match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        }
    }

    pub fn all() -> [SpellSchool; 8] {
        [
            SpellSchool::Abjuration,
            SpellSchool::Conjuration,
            SpellSchool::Divination,
            SpellSchool::Enchantment,
            SpellSchool::Evocation,
            SpellSchool::Illusion,
            SpellSchool::Necromancy,
            SpellSchool::Transmutation,
        ]
    }

    pub fn from_name(name: &str) -> Option<SpellSchool> {
        let name = name.trim();
        SpellSchool::all()
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SpellSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Spell components required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Components {
    pub verbal: bool,
    pub somatic: bool,
    pub material: Option<String>,
}

impl Components {
    pub fn v() -> Self {
        Self {
            verbal: true,
            ..Self::default()
        }
    }

    pub fn vs() -> Self {
        Self {
            verbal: true,
            somatic: true,
            material: None,
        }
    }

    pub fn vsm(material: &str) -> Self {
        Self {
            verbal: true,
            somatic: true,
            material: Some(material.to_string()),
        }
    }

    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.verbal {
            parts.push("V");
        }
        if self.somatic {
            parts.push("S");
        }
        if self.material.is_some() {
            parts.push("M");
        }
        let base = parts.join(", ");
        if let Some(ref mat) = self.material {
            format!("{} ({})", base, mat)
        } else {
            base
        }
    }
}

/// Damage a spell deals on a hit or failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDamage {
    pub dice: String,
    pub damage_type: DamageType,
}

/// A spell definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDef {
    pub id: ContentId,
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    #[serde(default)]
    pub school: SpellSchool,
    #[serde(default)]
    pub casting_time: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub components: Components,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub concentration: bool,
    #[serde(default)]
    pub ritual: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub higher_levels: Option<String>,
    /// Class names that can learn the spell.
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub damage: Option<SpellDamage>,
    #[serde(default)]
    pub save: Option<Ability>,
}

impl SpellDef {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            id: ContentId::new(),
            name: name.into(),
            level: level.min(9),
            school: SpellSchool::default(),
            casting_time: "1 action".to_string(),
            range: "Self".to_string(),
            components: Components::vs(),
            duration: "Instantaneous".to_string(),
            concentration: false,
            ritual: false,
            description: String::new(),
            higher_levels: None,
            classes: Vec::new(),
            damage: None,
            save: None,
        }
    }

    fn builtin(name: &str, level: u8, school: SpellSchool, range: &str) -> Self {
        Self {
            id: ContentId::builtin("spell", name),
            school,
            range: range.to_string(),
            ..Self::new(name, level)
        }
    }

    fn with_classes(mut self, classes: &[&str]) -> Self {
        self.classes = classes.iter().map(|c| c.to_string()).collect();
        self
    }

    fn with_damage(mut self, dice: &str, damage_type: DamageType) -> Self {
        self.damage = Some(SpellDamage {
            dice: dice.to_string(),
            damage_type,
        });
        self
    }

    fn with_save(mut self, ability: Ability) -> Self {
        self.save = Some(ability);
        self
    }

    fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    fn with_duration(mut self, duration: &str, concentration: bool) -> Self {
        self.duration = duration.to_string();
        self.concentration = concentration;
        self
    }

    fn with_casting_time(mut self, casting_time: &str) -> Self {
        self.casting_time = casting_time.to_string();
        self
    }

    fn ritual(mut self) -> Self {
        self.ritual = true;
        self
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn is_available_to(&self, class_name: &str) -> bool {
        self.classes
            .iter()
            .any(|c| c.eq_ignore_ascii_case(class_name))
    }

    /// Cantrip damage dice at a character level (more dice at 5, 11 and 17).
    pub fn cantrip_damage(&self, character_level: u8) -> Option<String> {
        let damage = self.damage.as_ref()?;
        if !self.is_cantrip() {
            return Some(damage.dice.clone());
        }
        let count = match character_level {
            0..=4 => 1,
            5..=10 => 2,
            11..=16 => 3,
            _ => 4,
        };
        match damage.dice.find('d') {
            Some(pos) => Some(format!("{}{}", count, &damage.dice[pos..])),
            None => Some(damage.dice.clone()),
        }
    }
}

lazy_static::lazy_static! {
    /// Starter spell list.
    pub static ref BUILTIN_SPELLS: Vec<SpellDef> = {
        use SpellSchool::*;
        vec![
            // Cantrips
            SpellDef::builtin("Fire Bolt", 0, Evocation, "120 feet")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_damage("1d10", DamageType::Fire)
                .with_description("Make a ranged spell attack. On a hit, the target takes 1d10 fire damage."),
            SpellDef::builtin("Eldritch Blast", 0, Evocation, "120 feet")
                .with_classes(&["Warlock"])
                .with_damage("1d10", DamageType::Force)
                .with_description("A beam of crackling energy. Make a ranged spell attack; on a hit the target takes 1d10 force damage."),
            SpellDef::builtin("Sacred Flame", 0, Evocation, "60 feet")
                .with_classes(&["Cleric"])
                .with_damage("1d8", DamageType::Radiant)
                .with_save(Ability::Dexterity)
                .with_description("The target must succeed on a Dexterity saving throw or take 1d8 radiant damage."),
            SpellDef::builtin("Ray of Frost", 0, Evocation, "60 feet")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_damage("1d8", DamageType::Cold)
                .with_description("On a hit, the target takes 1d8 cold damage and its speed is reduced by 10 feet."),
            SpellDef::builtin("Vicious Mockery", 0, Enchantment, "60 feet")
                .with_classes(&["Bard"])
                .with_components(Components::v())
                .with_damage("1d4", DamageType::Psychic)
                .with_save(Ability::Wisdom)
                .with_description("The target must succeed on a Wisdom saving throw or take 1d4 psychic damage and have disadvantage on its next attack roll."),
            SpellDef::builtin("Produce Flame", 0, Conjuration, "Self")
                .with_classes(&["Druid"])
                .with_damage("1d8", DamageType::Fire)
                .with_duration("10 minutes", false)
                .with_description("A flickering flame appears in your hand. You can hurl it for 1d8 fire damage."),
            SpellDef::builtin("Light", 0, Evocation, "Touch")
                .with_classes(&["Bard", "Cleric", "Sorcerer", "Wizard"])
                .with_components(Components::vsm("a firefly or phosphorescent moss"))
                .with_duration("1 hour", false)
                .with_description("An object you touch sheds bright light in a 20-foot radius."),
            SpellDef::builtin("Mage Hand", 0, Conjuration, "30 feet")
                .with_classes(&["Bard", "Sorcerer", "Warlock", "Wizard"])
                .with_duration("1 minute", false)
                .with_description("A spectral, floating hand appears that can manipulate objects."),

            // 1st level
            SpellDef::builtin("Magic Missile", 1, Evocation, "120 feet")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_damage("3d4+3", DamageType::Force)
                .with_description("Three glowing darts each deal 1d4 + 1 force damage to creatures you can see."),
            SpellDef::builtin("Cure Wounds", 1, Evocation, "Touch")
                .with_classes(&["Bard", "Cleric", "Druid", "Paladin", "Ranger"])
                .with_description("A creature you touch regains 1d8 + your spellcasting modifier hit points."),
            SpellDef::builtin("Healing Word", 1, Evocation, "60 feet")
                .with_classes(&["Bard", "Cleric", "Druid"])
                .with_casting_time("1 bonus action")
                .with_components(Components::v())
                .with_description("A creature you can see regains 1d4 + your spellcasting modifier hit points."),
            SpellDef::builtin("Shield", 1, Abjuration, "Self")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_casting_time("1 reaction")
                .with_duration("1 round", false)
                .with_description("An invisible barrier grants +5 AC until the start of your next turn."),
            SpellDef::builtin("Thunderwave", 1, Evocation, "Self (15-foot cube)")
                .with_classes(&["Bard", "Druid", "Sorcerer", "Wizard"])
                .with_damage("2d8", DamageType::Thunder)
                .with_save(Ability::Constitution)
                .with_description("Each creature in the cube makes a Constitution save, taking 2d8 thunder damage and being pushed 10 feet on a failure."),
            SpellDef::builtin("Burning Hands", 1, Evocation, "Self (15-foot cone)")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_damage("3d6", DamageType::Fire)
                .with_save(Ability::Dexterity)
                .with_description("Each creature in the cone makes a Dexterity save, taking 3d6 fire damage on a failure or half as much on a success."),
            SpellDef::builtin("Bless", 1, Enchantment, "30 feet")
                .with_classes(&["Cleric", "Paladin"])
                .with_components(Components::vsm("a sprinkling of holy water"))
                .with_duration("1 minute", true)
                .with_description("Up to three creatures add 1d4 to attack rolls and saving throws."),
            SpellDef::builtin("Hex", 1, Enchantment, "90 feet")
                .with_classes(&["Warlock"])
                .with_casting_time("1 bonus action")
                .with_damage("1d6", DamageType::Necrotic)
                .with_duration("1 hour", true)
                .with_description("Deal an extra 1d6 necrotic damage to the cursed target whenever you hit it."),
            SpellDef::builtin("Detect Magic", 1, Divination, "Self")
                .with_classes(&["Bard", "Cleric", "Druid", "Paladin", "Ranger", "Sorcerer", "Wizard"])
                .with_duration("10 minutes", true)
                .ritual()
                .with_description("Sense the presence of magic within 30 feet of you."),

            // 2nd level
            SpellDef::builtin("Hold Person", 2, Enchantment, "60 feet")
                .with_classes(&["Bard", "Cleric", "Druid", "Sorcerer", "Warlock", "Wizard"])
                .with_save(Ability::Wisdom)
                .with_duration("1 minute", true)
                .with_description("A humanoid must succeed on a Wisdom saving throw or be paralyzed."),
            SpellDef::builtin("Scorching Ray", 2, Evocation, "120 feet")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_damage("2d6", DamageType::Fire)
                .with_description("Create three rays of fire; each deals 2d6 fire damage on a hit."),
            SpellDef::builtin("Misty Step", 2, Conjuration, "Self")
                .with_classes(&["Sorcerer", "Warlock", "Wizard"])
                .with_casting_time("1 bonus action")
                .with_components(Components::v())
                .with_description("Teleport up to 30 feet to an unoccupied space you can see."),

            // 3rd level
            SpellDef::builtin("Fireball", 3, Evocation, "150 feet")
                .with_classes(&["Sorcerer", "Wizard"])
                .with_components(Components::vsm("a tiny ball of bat guano and sulfur"))
                .with_damage("8d6", DamageType::Fire)
                .with_save(Ability::Dexterity)
                .with_description("Each creature in a 20-foot radius makes a Dexterity save, taking 8d6 fire damage on a failure or half as much on a success."),
            SpellDef::builtin("Counterspell", 3, Abjuration, "60 feet")
                .with_classes(&["Sorcerer", "Warlock", "Wizard"])
                .with_casting_time("1 reaction")
                .with_description("Interrupt a creature in the process of casting a spell."),
        ]
    };
}

/// Look up a built-in spell by name, ignoring case.
pub fn find_spell(name: &str) -> Option<&'static SpellDef> {
    BUILTIN_SPELLS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_spell() {
        let fireball = find_spell("FIREBALL").expect("Fireball should exist");
        assert_eq!(fireball.level, 3);
        assert_eq!(fireball.school, SpellSchool::Evocation);
        assert_eq!(fireball.save, Some(Ability::Dexterity));
        assert!(find_spell("Wish").is_none());
    }

    #[test]
    fn test_cantrip_scaling() {
        let fire_bolt = find_spell("fire bolt").unwrap();
        assert!(fire_bolt.is_cantrip());
        assert_eq!(fire_bolt.cantrip_damage(1).as_deref(), Some("1d10"));
        assert_eq!(fire_bolt.cantrip_damage(5).as_deref(), Some("2d10"));
        assert_eq!(fire_bolt.cantrip_damage(11).as_deref(), Some("3d10"));
        assert_eq!(fire_bolt.cantrip_damage(17).as_deref(), Some("4d10"));
    }

    #[test]
    fn test_spell_classes() {
        let cure_wounds = find_spell("cure wounds").unwrap();
        assert!(cure_wounds.is_available_to("cleric"));
        assert!(!cure_wounds.is_available_to("Wizard"));
    }

    #[test]
    fn test_concentration() {
        assert!(find_spell("Hold Person").unwrap().concentration);
        assert!(!find_spell("Fireball").unwrap().concentration);
        assert!(find_spell("Detect Magic").unwrap().ritual);
    }

    #[test]
    fn test_components_description() {
        assert_eq!(Components::vs().description(), "V, S");
        assert_eq!(
            Components::vsm("a pinch of salt").description(),
            "V, S, M (a pinch of salt)"
        );
    }

    #[test]
    fn test_builtin_dice_parse() {
        for spell in BUILTIN_SPELLS.iter() {
            if let Some(damage) = &spell.damage {
                assert!(
                    crate::dice::DiceSpec::parse(&damage.dice).is_ok(),
                    "{} has bad dice {}",
                    spell.name,
                    damage.dice
                );
            }
        }
    }
}
