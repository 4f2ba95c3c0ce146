//! Derived-stat recomputation.
//!
//! [`recompute`] is a pure function from a sheet to a sheet: it reads the
//! player-owned fields (scores, level, proficiencies, equipped items,
//! features, class snapshot) and rewrites every derived field. Running it
//! twice gives the same sheet as running it once.

use crate::character::{Ability, CharacterSheet, SlotInfo, Skill, Spellcasting};
use crate::class_data::{spell_slots_for, CasterProgression, SpellcastingProfile};
use crate::items::{ArmorType, ItemKind};
use std::collections::BTreeMap;

/// `floor((score - 10) / 2)`.
pub fn ability_modifier(score: u8) -> i8 {
    (score as i16 - 10).div_euclid(2) as i8
}

/// +2 at levels 1-4, rising by one every four levels to +6 at 17-20.
pub fn proficiency_bonus(level: u8) -> i8 {
    let level = level.clamp(1, 20);
    2 + ((level - 1) / 4) as i8
}

/// Recompute every derived field of a sheet.
pub fn recompute(sheet: &CharacterSheet) -> CharacterSheet {
    let mut sheet = sheet.clone();
    sheet.level = sheet.level.clamp(1, 20);

    let prof = proficiency_bonus(sheet.level);
    sheet.proficiency_bonus = prof;

    sheet.ability_modifiers = Ability::all()
        .into_iter()
        .map(|a| (a, sheet.modifier(a)))
        .collect();

    sheet.skills = Skill::all()
        .into_iter()
        .map(|skill| {
            let level = sheet.proficiencies.skill_level(skill);
            (skill, sheet.modifier(skill.ability()) + level.bonus(prof))
        })
        .collect();

    sheet.saving_throws = Ability::all()
        .into_iter()
        .map(|a| {
            let bonus = if sheet.is_proficient_save(a) { prof } else { 0 };
            (a, sheet.modifier(a) + bonus)
        })
        .collect();

    sheet.armor_class = armor_class(&sheet);
    sheet.initiative = sheet.modifier(Ability::Dexterity);
    sheet.passive_perception = 10 + sheet.skills[&Skill::Perception] as i32;

    let maximum = max_hit_points(&sheet);
    sheet.hit_points.maximum = maximum;
    sheet.hit_points.current = sheet.hit_points.current.clamp(0, maximum);
    sheet.hit_points.temporary = sheet.hit_points.temporary.max(0);

    sheet.spellcasting = spellcasting(&sheet, prof);
    sheet
}

/// Armor class from equipped armor, shield and Unarmored Defense.
pub fn armor_class(sheet: &CharacterSheet) -> i32 {
    let dex = sheet.modifier(Ability::Dexterity) as i32;

    let body_armor = sheet.equipped().find_map(|e| match &e.item.kind {
        ItemKind::Armor(armor) => Some(armor),
        _ => None,
    });
    let shield_bonus: Option<i32> = sheet.equipped().find_map(|e| match &e.item.kind {
        ItemKind::Shield(shield) => Some(shield.ac_bonus),
        _ => None,
    });

    let base = match body_armor {
        Some(armor) => {
            let dex_bonus = if armor.armor_type == ArmorType::Heavy || !armor.add_dex_modifier {
                0
            } else {
                match armor.max_dex_bonus {
                    Some(cap) => dex.min(cap as i32),
                    None => dex,
                }
            };
            armor.base_ac + dex_bonus
        }
        None if sheet.has_feature("unarmored defense") => {
            if sheet.class.is_monk() {
                if shield_bonus.is_some() {
                    10 + dex
                } else {
                    10 + dex + sheet.modifier(Ability::Wisdom) as i32
                }
            } else {
                10 + dex + sheet.modifier(Ability::Constitution) as i32
            }
        }
        None => 10 + dex,
    };

    base + shield_bonus.unwrap_or(0)
}

/// Hit die maximum at level 1, then the rounded-up average per level, plus
/// CON per level. Each level contributes at least 1.
pub fn max_hit_points(sheet: &CharacterSheet) -> i32 {
    let con = sheet.modifier(Ability::Constitution) as i32;
    let die = sheet.class.hit_die;
    let first = (die.sides() as i32 + con).max(1);
    let later = (die.average_rounded_up() + con).max(1);
    first + later * (sheet.level as i32 - 1)
}

fn active_profile(sheet: &CharacterSheet) -> Option<SpellcastingProfile> {
    sheet
        .class
        .spellcasting
        .or(sheet.class.subclass_spellcasting)
}

fn spellcasting(sheet: &CharacterSheet, prof: i8) -> Option<Spellcasting> {
    let Some(profile) = active_profile(sheet) else {
        return sheet.spellcasting.clone().map(|mut casting| {
            casting.save_dc = 8 + prof + sheet.modifier(casting.ability);
            casting.attack_bonus = prof + sheet.modifier(casting.ability);
            casting
        });
    };

    let mut casting = sheet
        .spellcasting
        .clone()
        .unwrap_or_else(|| Spellcasting::new(profile.ability));
    casting.ability = profile.ability;

    let modifier = sheet.modifier(profile.ability);
    casting.save_dc = 8 + prof + modifier;
    casting.attack_bonus = prof + modifier;

    let previous = std::mem::take(&mut casting.slots);
    // Pact slots all share one level, which rises with the warlock.
    let pact_used = previous.values().map(|s| s.used).max().unwrap_or(0);
    casting.slots = spell_slots_for(profile.progression, sheet.level)
        .into_iter()
        .map(|(level, total)| {
            let used = match profile.progression {
                CasterProgression::Pact => pact_used,
                _ => previous.get(&level).map(|s| s.used).unwrap_or(0),
            };
            (
                level,
                SlotInfo {
                    total,
                    used: used.min(total),
                },
            )
        })
        .collect::<BTreeMap<u8, SlotInfo>>();

    Some(casting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{ClassSnapshot, Feature, InventoryEntry, ItemSource, ProficiencyLevel};
    use crate::class_data::CharacterClass;
    use crate::items::{find_item, Item};

    fn sheet_for(class: CharacterClass) -> CharacterSheet {
        CharacterSheet::new("Test", class.definition().snapshot())
    }

    fn equip(sheet: &mut CharacterSheet, name: &str) {
        let item: Item = find_item(name).unwrap();
        let mut entry = InventoryEntry::new(item, 1, ItemSource::Custom);
        entry.equipped = true;
        sheet.inventory.push(entry);
    }

    #[test]
    fn test_ability_modifier() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(15), 2);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn test_proficiency_bonus() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn test_skills_and_saves() {
        let mut sheet = sheet_for(CharacterClass::Rogue);
        sheet.ability_scores = crate::character::AbilityScores::new(10, 16, 12, 14, 12, 8);
        sheet.proficiencies.skills.insert(Skill::Stealth, ProficiencyLevel::Expertise);
        sheet.proficiencies.skills.insert(Skill::Arcana, ProficiencyLevel::Proficient);
        sheet.proficiencies.skills.insert(Skill::History, ProficiencyLevel::Half);
        sheet.proficiencies.saving_throws.insert(Ability::Dexterity);

        let sheet = recompute(&sheet);
        assert_eq!(sheet.skills[&Skill::Stealth], 3 + 4);
        assert_eq!(sheet.skills[&Skill::Arcana], 2 + 2);
        assert_eq!(sheet.skills[&Skill::History], 2 + 1);
        assert_eq!(sheet.skills[&Skill::Deception], -1);
        assert_eq!(sheet.saving_throws[&Ability::Dexterity], 5);
        assert_eq!(sheet.saving_throws[&Ability::Intelligence], 2);
        assert_eq!(sheet.passive_perception, 11);
        assert_eq!(sheet.initiative, 3);
    }

    #[test]
    fn test_unarmored_ac() {
        let mut sheet = sheet_for(CharacterClass::Wizard);
        sheet.ability_scores.dexterity = 14;
        assert_eq!(recompute(&sheet).armor_class, 12);
    }

    #[test]
    fn test_medium_armor_caps_dex() {
        let mut sheet = sheet_for(CharacterClass::Fighter);
        sheet.ability_scores.dexterity = 18;
        equip(&mut sheet, "Scale Mail");
        assert_eq!(recompute(&sheet).armor_class, 14 + 2);
    }

    #[test]
    fn test_heavy_armor_ignores_dex_even_if_flagged() {
        let mut sheet = sheet_for(CharacterClass::Fighter);
        sheet.ability_scores.dexterity = 16;
        let mut plate = find_item("Plate Armor").unwrap();
        if let ItemKind::Armor(armor) = &mut plate.kind {
            armor.add_dex_modifier = true;
        }
        let mut entry = InventoryEntry::new(plate, 1, ItemSource::Class);
        entry.equipped = true;
        sheet.inventory.push(entry);
        assert_eq!(recompute(&sheet).armor_class, 18);
    }

    #[test]
    fn test_shield_adds_bonus() {
        let mut sheet = sheet_for(CharacterClass::Fighter);
        equip(&mut sheet, "Chain Mail");
        equip(&mut sheet, "Shield");
        assert_eq!(recompute(&sheet).armor_class, 18);
    }

    #[test]
    fn test_barbarian_unarmored_defense_with_shield() {
        let mut sheet = sheet_for(CharacterClass::Barbarian);
        sheet.ability_scores = crate::character::AbilityScores::new(16, 14, 16, 8, 10, 8);
        sheet
            .features
            .push(Feature::new("Unarmored Defense", "", "Barbarian"));
        assert_eq!(recompute(&sheet).armor_class, 10 + 2 + 3);
        equip(&mut sheet, "Shield");
        assert_eq!(recompute(&sheet).armor_class, 10 + 2 + 3 + 2);
    }

    #[test]
    fn test_monk_unarmored_defense_lost_with_shield() {
        let mut sheet = sheet_for(CharacterClass::Monk);
        sheet.ability_scores = crate::character::AbilityScores::new(10, 16, 12, 10, 16, 8);
        sheet.features.push(Feature::new("Unarmored Defense", "", "Monk"));
        assert_eq!(recompute(&sheet).armor_class, 10 + 3 + 3);
        equip(&mut sheet, "Shield");
        assert_eq!(recompute(&sheet).armor_class, 10 + 3 + 2);
    }

    #[test]
    fn test_hit_points() {
        let mut sheet = sheet_for(CharacterClass::Fighter);
        sheet.ability_scores.constitution = 14;
        sheet.hit_points.current = 999;
        let derived = recompute(&sheet);
        assert_eq!(derived.hit_points.maximum, 12);
        assert_eq!(derived.hit_points.current, 12);

        sheet.level = 3;
        assert_eq!(recompute(&sheet).hit_points.maximum, 12 + 2 * 8);
    }

    #[test]
    fn test_hit_points_floor_per_level() {
        let mut sheet = sheet_for(CharacterClass::Wizard);
        sheet.ability_scores.constitution = 1;
        sheet.level = 2;
        assert_eq!(recompute(&sheet).hit_points.maximum, 2);
    }

    #[test]
    fn test_spellcasting_preserves_used_slots() {
        let mut sheet = sheet_for(CharacterClass::Wizard);
        sheet.ability_scores.intelligence = 16;
        let mut sheet = recompute(&sheet);
        let casting = sheet.spellcasting.as_ref().unwrap();
        assert_eq!(casting.save_dc, 13);
        assert_eq!(casting.attack_bonus, 5);
        assert_eq!(casting.slots[&1].total, 2);

        sheet.spellcasting.as_mut().unwrap().use_slot(1);
        sheet.level = 3;
        let sheet = recompute(&sheet);
        let casting = sheet.spellcasting.as_ref().unwrap();
        assert_eq!(casting.slots[&1], SlotInfo { total: 4, used: 1 });
        assert_eq!(casting.slots[&2], SlotInfo { total: 2, used: 0 });
    }

    #[test]
    fn test_used_slots_clamped_to_new_total() {
        let mut sheet = sheet_for(CharacterClass::Cleric);
        let mut casting = Spellcasting::new(Ability::Wisdom);
        casting.slots.insert(1, SlotInfo { total: 4, used: 4 });
        casting.slots.insert(2, SlotInfo { total: 3, used: 2 });
        sheet.spellcasting = Some(casting);
        let sheet = recompute(&sheet);
        let casting = sheet.spellcasting.unwrap();
        assert_eq!(casting.slots[&1], SlotInfo { total: 2, used: 2 });
        assert!(!casting.slots.contains_key(&2));
    }

    #[test]
    fn test_pact_slots_keep_used_count_when_level_rises() {
        let mut sheet = sheet_for(CharacterClass::Warlock);
        sheet.level = 2;
        let mut sheet = recompute(&sheet);
        assert_eq!(sheet.spellcasting.as_ref().unwrap().slots[&1].total, 2);
        sheet.spellcasting.as_mut().unwrap().use_slot(1);

        sheet.level = 3;
        let sheet = recompute(&sheet);
        let casting = sheet.spellcasting.unwrap();
        assert!(!casting.slots.contains_key(&1));
        assert_eq!(casting.slots[&2], SlotInfo { total: 2, used: 1 });
    }

    #[test]
    fn test_subclass_casting() {
        let mut snapshot: ClassSnapshot = CharacterClass::Fighter.definition().snapshot();
        snapshot.subclass_spellcasting = Some(SpellcastingProfile::new(
            Ability::Intelligence,
            crate::class_data::CasterProgression::Third,
        ));
        let mut sheet = CharacterSheet::new("Knight", snapshot);
        sheet.level = 3;
        let sheet = recompute(&sheet);
        assert_eq!(sheet.spellcasting.unwrap().slots[&1].total, 2);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut sheet = sheet_for(CharacterClass::Paladin);
        sheet.level = 6;
        sheet.ability_scores = crate::character::AbilityScores::new(16, 10, 14, 8, 10, 16);
        equip(&mut sheet, "Chain Mail");
        let once = recompute(&sheet);
        assert_eq!(recompute(&once), once);
    }
}
