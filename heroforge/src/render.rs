//! Plain-text rendering for the terminal.

use heroforge_core::attack_parse::{AttackKind, ParsedAttack};
use heroforge_core::character::{Ability, CharacterSheet, Skill};
use heroforge_core::{CharacterId, CombatTracker, Effect, EntryId, HeroForgeData};
use std::fmt::Write;

fn signed(value: impl Into<i32>) -> String {
    format!("{:+}", value.into())
}

/// One line per character for `list`.
pub fn summary(sheet: &CharacterSheet) -> String {
    format!(
        "{} - level {} {} {} (HP {}/{}, AC {})",
        sheet.name,
        sheet.level,
        sheet.species,
        sheet.class.name,
        sheet.hit_points.current,
        sheet.hit_points.maximum,
        sheet.armor_class
    )
}

pub fn sheet(sheet: &CharacterSheet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", sheet.name);
    let subclass = sheet
        .subclass
        .as_deref()
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Level {} {} {}{} | {}",
        sheet.level, sheet.species, sheet.class.name, subclass, sheet.background
    );
    let hp = &sheet.hit_points;
    let temp = if hp.temporary > 0 {
        format!(" (+{} temp)", hp.temporary)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "HP {}/{}{temp}  AC {}  Initiative {}  Speed {} ft.  Proficiency {}",
        hp.current,
        hp.maximum,
        sheet.armor_class,
        signed(sheet.initiative),
        sheet.speed,
        signed(sheet.proficiency_bonus)
    );
    let _ = writeln!(out, "Passive Perception {}", sheet.passive_perception);

    let _ = writeln!(out);
    for ability in Ability::all() {
        let save = sheet.saving_throws.get(&ability).copied().unwrap_or_default();
        let marker = if sheet.is_proficient_save(ability) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{:<4}{:>3} ({})  save {}{marker}",
            ability.abbreviation(),
            sheet.ability_scores.get(ability),
            signed(sheet.modifier(ability)),
            signed(save)
        );
    }

    let _ = writeln!(out, "\nSkills:");
    for skill in Skill::all() {
        let bonus = sheet.skills.get(&skill).copied().unwrap_or_default();
        let _ = writeln!(out, "  {:<16}{}", skill.name(), signed(bonus));
    }

    if !sheet.inventory.is_empty() {
        let _ = writeln!(out, "\nInventory:");
        for entry in &sheet.inventory {
            let equipped = if entry.equipped { " [equipped]" } else { "" };
            let quantity = if entry.quantity > 1 {
                format!(" x{}", entry.quantity)
            } else {
                String::new()
            };
            let _ = writeln!(out, "  {}{quantity}{equipped}", entry.item.name);
        }
    }
    let coins = &sheet.currency;
    let _ = writeln!(
        out,
        "Coins: {} pp, {} gp, {} ep, {} sp, {} cp",
        coins.pp, coins.gp, coins.ep, coins.sp, coins.cp
    );

    if let Some(casting) = &sheet.spellcasting {
        let _ = writeln!(
            out,
            "\nSpellcasting ({}): save DC {}, attack {}",
            casting.ability.abbreviation(),
            casting.save_dc,
            signed(casting.attack_bonus)
        );
        for (level, slot) in &casting.slots {
            let _ = writeln!(out, "  Level {level} slots: {}/{}", slot.available(), slot.total);
        }
        if !casting.cantrips.is_empty() {
            let _ = writeln!(out, "  Cantrips: {}", casting.cantrips.join(", "));
        }
        if !casting.spells_known.is_empty() {
            let _ = writeln!(out, "  Spells: {}", casting.spells_known.join(", "));
        }
    }

    if !sheet.features.is_empty() {
        let _ = writeln!(out, "\nFeatures:");
        for feature in &sheet.features {
            let _ = writeln!(out, "  {} ({})", feature.name, feature.source);
        }
    }
    if !sheet.notes.is_empty() {
        let _ = writeln!(out, "\nNotes:\n{}", sheet.notes);
    }
    out
}

/// A short confirmation for a store effect.
pub fn effect(effect: &Effect, data: &HeroForgeData) -> String {
    let name = |id: CharacterId| {
        data.character(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "character".to_string())
    };
    let item = |id: CharacterId, entry: EntryId| {
        data.character(id)
            .and_then(|c| c.entry(entry))
            .map(|e| e.item.name.clone())
            .unwrap_or_else(|| "item".to_string())
    };
    match effect {
        Effect::CharacterSaved(id) => format!("Saved {}.", name(*id)),
        Effect::CharacterDeleted(_) => "Character deleted.".to_string(),
        Effect::HpChanged {
            id,
            current,
            maximum,
            dropped_to_zero,
        } => {
            let down = if *dropped_to_zero { " and falls unconscious" } else { "" };
            format!("{} is at {current}/{maximum} HP{down}.", name(*id))
        }
        Effect::ItemAdded { id, entry } => format!("{} gains {}.", name(*id), item(*id, *entry)),
        Effect::ItemRemoved { id, .. } => format!("Removed an item from {}.", name(*id)),
        Effect::Unequipped { id, entries } => {
            let names: Vec<String> = entries.iter().map(|e| item(*id, *e)).collect();
            format!("{} unequips {}.", name(*id), names.join(", "))
        }
        Effect::SlotUsed {
            id,
            level,
            remaining,
        } => format!(
            "{} spends a level {level} slot ({remaining} left).",
            name(*id)
        ),
        Effect::ContentSaved { kind, .. } => format!("Saved custom {kind}."),
        Effect::ContentDeleted { kind, .. } => format!("Deleted custom {kind}."),
        Effect::ThemeChanged(theme) => format!("Theme is now {theme:?}."),
        Effect::DataReplaced => format!("Loaded {} characters.", data.characters.len()),
    }
}

fn attack_kind(kind: AttackKind) -> &'static str {
    match kind {
        AttackKind::MeleeWeapon => "Melee weapon attack",
        AttackKind::RangedWeapon => "Ranged weapon attack",
        AttackKind::MeleeOrRangedWeapon => "Melee or ranged weapon attack",
        AttackKind::MeleeSpell => "Melee spell attack",
        AttackKind::RangedSpell => "Ranged spell attack",
    }
}

pub fn attack(attack: &ParsedAttack) -> String {
    let mut out = String::new();
    if let Some(kind) = attack.kind {
        let _ = write!(out, "{}", attack_kind(kind));
        if let Some(to_hit) = attack.to_hit {
            let _ = write!(out, ", {} to hit", signed(to_hit));
        }
        if let Some(reach) = attack.reach {
            let _ = write!(out, ", reach {reach} ft.");
        }
        if let Some(range) = attack.range {
            match range.long {
                Some(long) => {
                    let _ = write!(out, ", range {}/{long} ft.", range.normal);
                }
                None => {
                    let _ = write!(out, ", range {} ft.", range.normal);
                }
            }
        }
        let _ = writeln!(out);
    }
    for component in &attack.damage {
        let damage_type = component
            .damage_type
            .map(|t| t.name().to_lowercase())
            .unwrap_or_else(|| "untyped".to_string());
        let or = if component.alternative { "or " } else { "" };
        let _ = writeln!(
            out,
            "  {or}{} ({}) {damage_type}",
            component.average, component.dice
        );
    }
    if attack.damage.len() > 1 {
        let _ = writeln!(out, "  Average total: {}", attack.average_damage());
    }
    out
}

/// Initiative order with the acting combatant marked.
pub fn initiative(tracker: &CombatTracker) -> String {
    let mut out = format!("Round {}\n", tracker.round);
    for (i, c) in tracker.combatants.iter().enumerate() {
        let marker = if i == tracker.turn_index { ">" } else { " " };
        let down = if c.is_down() { " [down]" } else { "" };
        let _ = writeln!(
            out,
            "{marker} {:>3}  {:<20} AC {:>2}  HP {}/{}{down}",
            c.initiative, c.name, c.armor_class, c.hit_points.current, c.hit_points.maximum
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use heroforge_core::attack_parse::parse_attack;
    use heroforge_core::testing::sample_fighter;
    use heroforge_core::Initiative;

    #[test]
    fn test_sheet_lists_core_stats() {
        let fighter = sample_fighter("Brom");
        let text = sheet(&fighter);
        assert!(text.starts_with("=== Brom ==="));
        assert!(text.contains("AC 18"));
        assert!(text.contains("Chain Mail [equipped]"));
        assert!(summary(&fighter).contains("level 1 Dwarf Fighter"));
    }

    #[test]
    fn test_attack_rendering() {
        let parsed = parse_attack(
            "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage.",
        )
        .unwrap();
        let text = attack(&parsed);
        assert!(text.starts_with("Melee weapon attack, +4 to hit, reach 5 ft."));
        assert!(text.contains("5 (1d6+2) slashing"));
    }

    #[test]
    fn test_initiative_marks_current() {
        let mut tracker = CombatTracker::new();
        tracker.add_character(&sample_fighter("Brom"), Initiative::Given(15));
        tracker.add_character(&sample_fighter("Kara"), Initiative::Given(10));
        let text = initiative(&tracker);
        assert!(text.starts_with("Round 1\n"));
        assert!(text.lines().nth(1).unwrap().starts_with(">  15  Brom"));
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(3), "+3");
        assert_eq!(signed(-1), "-1");
        assert_eq!(signed(0i8), "+0");
    }
}
