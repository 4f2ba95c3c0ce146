//! NPC and monster stat blocks.

use crate::attack_parse::{parse_attack, ParsedAttack};
use crate::character::{Ability, AbilityScores, ContentId};
use crate::content::Size;
use serde::{Deserialize, Serialize};

/// A named action from a stat block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcAction {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NpcAction {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn parsed(&self) -> Option<ParsedAttack> {
        parse_attack(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcDef {
    pub id: ContentId,
    pub name: String,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub creature_type: String,
    #[serde(default)]
    pub alignment: String,
    pub armor_class: i32,
    pub hit_points: i32,
    #[serde(default)]
    pub hit_dice: String,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub ability_scores: AbilityScores,
    #[serde(default)]
    pub challenge_rating: String,
    #[serde(default)]
    pub actions: Vec<NpcAction>,
}

fn default_speed() -> u32 {
    30
}

impl NpcDef {
    pub fn new(name: impl Into<String>, armor_class: i32, hit_points: i32) -> Self {
        Self {
            id: ContentId::new(),
            name: name.into(),
            size: Size::Medium,
            creature_type: "humanoid".to_string(),
            alignment: "unaligned".to_string(),
            armor_class,
            hit_points: hit_points.max(1),
            hit_dice: String::new(),
            speed: default_speed(),
            ability_scores: AbilityScores::default(),
            challenge_rating: "0".to_string(),
            actions: Vec::new(),
        }
    }

    pub fn dex_modifier(&self) -> i8 {
        self.ability_scores.modifier(Ability::Dexterity)
    }

    /// Every action that yields structured attack data.
    pub fn parsed_attacks(&self) -> Vec<(&str, ParsedAttack)> {
        self.actions
            .iter()
            .filter_map(|a| a.parsed().map(|p| (a.name.as_str(), p)))
            .collect()
    }

    /// Look up an action by name, ignoring case.
    pub fn action(&self, name: &str) -> Option<&NpcAction> {
        self.actions
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }
}

#[allow(clippy::too_many_arguments)]
fn builtin_npc(
    name: &str,
    size: Size,
    creature_type: &str,
    alignment: &str,
    armor_class: i32,
    hit_points: i32,
    hit_dice: &str,
    speed: u32,
    scores: [u8; 6],
    challenge_rating: &str,
    actions: &[(&str, &str)],
) -> NpcDef {
    let [str, dex, con, int, wis, cha] = scores;
    NpcDef {
        id: ContentId::builtin("npc", name),
        name: name.to_string(),
        size,
        creature_type: creature_type.to_string(),
        alignment: alignment.to_string(),
        armor_class,
        hit_points,
        hit_dice: hit_dice.to_string(),
        speed,
        ability_scores: AbilityScores::new(str, dex, con, int, wis, cha),
        challenge_rating: challenge_rating.to_string(),
        actions: actions.iter().map(|(n, d)| NpcAction::new(*n, *d)).collect(),
    }
}

lazy_static::lazy_static! {
    /// Common low-level monsters.
    pub static ref BUILTIN_NPCS: Vec<NpcDef> = vec![
        builtin_npc("Goblin", Size::Small, "humanoid (goblinoid)", "neutral evil", 15, 7, "2d6", 30,
            [8, 14, 10, 10, 8, 8], "1/4",
            &[("Scimitar", "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage."),
              ("Shortbow", "Ranged Weapon Attack: +4 to hit, range 80/320 ft., one target. Hit: 5 (1d6 + 2) piercing damage.")]),
        builtin_npc("Orc", Size::Medium, "humanoid (orc)", "chaotic evil", 13, 15, "2d8+6", 30,
            [16, 12, 16, 7, 11, 10], "1/2",
            &[("Greataxe", "Melee Weapon Attack: +5 to hit, reach 5 ft., one target. Hit: 9 (1d12 + 3) slashing damage."),
              ("Javelin", "Melee or Ranged Weapon Attack: +5 to hit, reach 5 ft. or range 30/120 ft., one target. Hit: 6 (1d6 + 3) piercing damage.")]),
        builtin_npc("Wolf", Size::Medium, "beast", "unaligned", 13, 11, "2d8+2", 40,
            [12, 15, 12, 3, 12, 6], "1/4",
            &[("Bite", "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 7 (2d4 + 2) piercing damage. If the target is a creature, it must succeed on a DC 11 Strength saving throw or be knocked prone.")]),
        builtin_npc("Skeleton", Size::Medium, "undead", "lawful evil", 13, 13, "2d8+4", 30,
            [10, 14, 15, 6, 8, 5], "1/4",
            &[("Shortsword", "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) piercing damage."),
              ("Shortbow", "Ranged Weapon Attack: +4 to hit, range 80/320 ft., one target. Hit: 5 (1d6 + 2) piercing damage.")]),
        builtin_npc("Bandit", Size::Medium, "humanoid (any race)", "any non-lawful", 12, 11, "2d8+2", 30,
            [11, 12, 12, 10, 10, 10], "1/8",
            &[("Scimitar", "Melee Weapon Attack: +3 to hit, reach 5 ft., one target. Hit: 4 (1d6 + 1) slashing damage."),
              ("Light Crossbow", "Ranged Weapon Attack: +3 to hit, range 80/320 ft., one target. Hit: 5 (1d8 + 1) piercing damage.")]),
        builtin_npc("Ogre", Size::Large, "giant", "chaotic evil", 11, 59, "7d10+21", 40,
            [19, 8, 16, 5, 7, 7], "2",
            &[("Greatclub", "Melee Weapon Attack: +6 to hit, reach 5 ft., one target. Hit: 13 (2d8 + 4) bludgeoning damage."),
              ("Javelin", "Melee or Ranged Weapon Attack: +6 to hit, reach 5 ft. or range 30/120 ft., one target. Hit: 11 (2d6 + 4) piercing damage.")]),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attack_parse::AttackKind;
    use crate::dice::DiceSpec;

    #[test]
    fn test_every_builtin_action_parses() {
        for npc in BUILTIN_NPCS.iter() {
            assert_eq!(
                npc.parsed_attacks().len(),
                npc.actions.len(),
                "{} has an unparsed action",
                npc.name
            );
        }
    }

    #[test]
    fn test_goblin_scimitar() {
        let goblin = BUILTIN_NPCS.iter().find(|n| n.name == "Goblin").unwrap();
        let attack = goblin.action("scimitar").unwrap().parsed().unwrap();
        assert_eq!(attack.to_hit, Some(4));
        assert_eq!(attack.damage[0].dice, DiceSpec::new(1, 6, 2));
        assert_eq!(goblin.dex_modifier(), 2);
    }

    #[test]
    fn test_melee_or_ranged_javelin() {
        let orc = BUILTIN_NPCS.iter().find(|n| n.name == "Orc").unwrap();
        let attack = orc.action("Javelin").unwrap().parsed().unwrap();
        assert_eq!(attack.kind, Some(AttackKind::MeleeOrRangedWeapon));
        assert_eq!(attack.reach, Some(5));
        assert_eq!(attack.range.unwrap().long, Some(120));
    }
}
