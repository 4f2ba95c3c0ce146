//! Extract structured attack data from monster action text.
//!
//! Stat blocks describe attacks in prose:
//!
//! ```text
//! Melee Weapon Attack: +5 to hit, reach 5 ft., one target.
//! Hit: 7 (1d8 + 3) slashing damage plus 3 (1d6) fire damage.
//! ```
//!
//! [`parse_attack`] pulls out the attack kind, to-hit bonus, reach or range,
//! and each damage component. Text with no header still yields any damage
//! it mentions; text with nothing recognizable yields `None`.

use crate::dice::DiceSpec;
use crate::items::DamageType;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    MeleeWeapon,
    RangedWeapon,
    MeleeOrRangedWeapon,
    MeleeSpell,
    RangedSpell,
}

impl AttackKind {
    pub fn is_melee(&self) -> bool {
        matches!(
            self,
            AttackKind::MeleeWeapon | AttackKind::MeleeOrRangedWeapon | AttackKind::MeleeSpell
        )
    }
}

/// Normal and long range in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRange {
    pub normal: u32,
    pub long: Option<u32>,
}

/// One damage clause, e.g. `7 (1d8 + 3) slashing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageComponent {
    pub average: i32,
    pub dice: DiceSpec,
    /// `None` when the word before "damage" isn't a known damage type.
    pub damage_type: Option<DamageType>,
    /// Follows "or": replaces the clause before it rather than adding to it,
    /// as in a versatile weapon's two-handed damage.
    #[serde(default)]
    pub alternative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAttack {
    pub kind: Option<AttackKind>,
    pub to_hit: Option<i32>,
    pub reach: Option<u32>,
    pub range: Option<AttackRange>,
    pub damage: Vec<DamageComponent>,
}

impl ParsedAttack {
    /// Sum of the listed averages, skipping "or" alternatives.
    pub fn average_damage(&self) -> i32 {
        self.damage
            .iter()
            .filter(|d| !d.alternative)
            .map(|d| d.average)
            .sum()
    }

    pub fn is_attack_roll(&self) -> bool {
        self.to_hit.is_some()
    }
}

// ============================================================================
// Patterns
// ============================================================================

lazy_static::lazy_static! {
    /// "Melee Weapon Attack: +5 to hit"
    static ref HEADER_PATTERN: Regex = Regex::new(
        r"(?ix)
        (?P<reach>melee\s+or\s+ranged|melee|ranged)
        \s+
        (?P<source>weapon|spell)
        \s+attack:\s*
        (?P<sign>[+\-−–])\s*(?P<bonus>\d+)
        \s+to\s+hit
        ",
    )
    .expect("attack header regex");

    /// "reach 10 ft."
    static ref REACH_PATTERN: Regex =
        Regex::new(r"(?i)reach\s+(?P<feet>\d+)\s*ft").expect("reach regex");

    /// "range 80/320 ft." or "range 30 ft."
    static ref RANGE_PATTERN: Regex = Regex::new(
        r"(?i)range\s+(?P<normal>\d+)(?:\s*/\s*(?P<long>\d+))?\s*ft",
    )
    .expect("range regex");

    /// "7 (1d8 + 3) slashing damage" or "1 piercing damage"
    static ref DAMAGE_PATTERN: Regex = Regex::new(
        r"(?ix)
        (?P<average>\d+)
        \s*
        (?:
            \(\s*
            (?P<count>\d+)\s*d\s*(?P<sides>\d+)
            (?:\s*(?P<sign>[+\-−–])\s*(?P<modifier>\d+))?
            \s*\)
        )?
        \s*
        (?P<kind>[a-z]+)
        \s+damage
        ",
    )
    .expect("damage regex");
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

fn is_negative(caps: &Captures<'_>, name: &str) -> bool {
    caps.name(name)
        .is_some_and(|m| matches!(m.as_str(), "-" | "−" | "–"))
}

fn parse_damage(caps: &Captures<'_>, alternative: bool) -> Option<DamageComponent> {
    let average: i32 = number(caps, "average")?;
    let damage_type = DamageType::from_name(&caps["kind"]);

    let dice = match (number::<u32>(caps, "count"), number::<u32>(caps, "sides")) {
        (Some(count), Some(sides)) if sides > 0 => {
            let modifier: i32 = number(caps, "modifier").unwrap_or(0);
            let bonus = if is_negative(caps, "sign") { -modifier } else { modifier };
            DiceSpec::new(count, sides, bonus)
        }
        (Some(_), Some(_)) => return None,
        _ => {
            // A flat amount only counts when it names a real damage type.
            damage_type?;
            DiceSpec::flat(average)
        }
    };

    Some(DamageComponent {
        average,
        dice,
        damage_type,
        alternative,
    })
}

/// Parse one action's text.
pub fn parse_attack(text: &str) -> Option<ParsedAttack> {
    let mut attack = ParsedAttack {
        kind: None,
        to_hit: None,
        reach: None,
        range: None,
        damage: Vec::new(),
    };

    if let Some(caps) = HEADER_PATTERN.captures(text) {
        let reach = caps["reach"].to_lowercase();
        let spell = caps["source"].eq_ignore_ascii_case("spell");
        attack.kind = Some(match (reach.as_str(), spell) {
            ("melee", false) => AttackKind::MeleeWeapon,
            ("ranged", false) => AttackKind::RangedWeapon,
            ("melee", true) => AttackKind::MeleeSpell,
            ("ranged", true) => AttackKind::RangedSpell,
            _ => AttackKind::MeleeOrRangedWeapon,
        });
        let bonus: i32 = number(&caps, "bonus").unwrap_or(0);
        attack.to_hit = Some(if is_negative(&caps, "sign") { -bonus } else { bonus });
    }

    if let Some(caps) = REACH_PATTERN.captures(text) {
        attack.reach = number(&caps, "feet");
    }
    if let Some(caps) = RANGE_PATTERN.captures(text) {
        if let Some(normal) = number(&caps, "normal") {
            attack.range = Some(AttackRange {
                normal,
                long: number(&caps, "long"),
            });
        }
    }

    let mut clause_end = 0;
    for caps in DAMAGE_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let between = text[clause_end..whole.start()].trim_end().to_lowercase();
        let alternative = !attack.damage.is_empty()
            && (between.ends_with(" or") || between.ends_with(",or") || between == "or");
        if let Some(component) = parse_damage(&caps, alternative) {
            attack.damage.push(component);
            clause_end = whole.end();
        }
    }

    if attack.kind.is_none() && attack.damage.is_empty() {
        tracing::debug!(text, "no attack data recognized");
        return None;
    }
    Some(attack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melee_with_rider() {
        let attack = parse_attack(
            "Melee Weapon Attack: +5 to hit, reach 5 ft., one target. \
             Hit: 7 (1d8 + 3) slashing damage plus 3 (1d6) fire damage.",
        )
        .unwrap();
        assert_eq!(attack.kind, Some(AttackKind::MeleeWeapon));
        assert_eq!(attack.to_hit, Some(5));
        assert_eq!(attack.reach, Some(5));
        assert_eq!(attack.range, None);
        assert_eq!(attack.damage.len(), 2);
        assert_eq!(attack.damage[0].average, 7);
        assert_eq!(attack.damage[0].dice, DiceSpec::new(1, 8, 3));
        assert_eq!(attack.damage[0].damage_type, Some(DamageType::Slashing));
        assert_eq!(attack.damage[1].dice, DiceSpec::new(1, 6, 0));
        assert_eq!(attack.damage[1].damage_type, Some(DamageType::Fire));
        assert_eq!(attack.average_damage(), 10);
    }

    #[test]
    fn test_versatile_damage_is_an_alternative() {
        let attack = parse_attack(
            "Melee Weapon Attack: +5 to hit, reach 5 ft., one target. \
             Hit: 7 (1d8 + 3) slashing damage, or 8 (1d10 + 3) slashing damage \
             if used with two hands to make a melee attack.",
        )
        .unwrap();
        assert_eq!(attack.damage.len(), 2);
        assert!(!attack.damage[0].alternative);
        assert!(attack.damage[1].alternative);
        assert_eq!(attack.damage[1].dice, DiceSpec::new(1, 10, 3));
        assert_eq!(attack.average_damage(), 7);
    }

    #[test]
    fn test_ranged_attack() {
        let attack = parse_attack(
            "Ranged Weapon Attack: +4 to hit, range 80/320 ft., one target. \
             Hit: 5 (1d6 + 2) piercing damage.",
        )
        .unwrap();
        assert_eq!(attack.kind, Some(AttackKind::RangedWeapon));
        assert_eq!(
            attack.range,
            Some(AttackRange {
                normal: 80,
                long: Some(320)
            })
        );
        assert!(!attack.kind.unwrap().is_melee());
    }

    #[test]
    fn test_negative_modifiers() {
        let attack = parse_attack(
            "Melee Spell Attack: -1 to hit, reach 5 ft. Hit: 2 (1d6 - 1) necrotic damage.",
        )
        .unwrap();
        assert_eq!(attack.kind, Some(AttackKind::MeleeSpell));
        assert_eq!(attack.to_hit, Some(-1));
        assert_eq!(attack.damage[0].dice, DiceSpec::new(1, 6, -1));
    }

    #[test]
    fn test_flat_damage() {
        let attack =
            parse_attack("Melee Weapon Attack: +2 to hit, reach 5 ft. Hit: 1 piercing damage.")
                .unwrap();
        assert_eq!(attack.damage.len(), 1);
        assert_eq!(attack.damage[0].dice, DiceSpec::flat(1));
    }

    #[test]
    fn test_damage_without_header() {
        let attack = parse_attack(
            "Each creature in a 15-foot cone must make a DC 13 Dexterity saving throw, \
             taking 22 (5d8) fire damage on a failed save.",
        )
        .unwrap();
        assert_eq!(attack.kind, None);
        assert_eq!(attack.to_hit, None);
        assert_eq!(attack.damage[0].dice, DiceSpec::new(5, 8, 0));
    }

    #[test]
    fn test_nothing_recognized() {
        assert!(parse_attack("The goblin can take the Disengage action as a bonus action.").is_none());
        assert!(parse_attack("").is_none());
    }
}
