//! Equip and unequip with hand and armor-slot exclusivity.
//!
//! A character wears one body armor and has two hands. Equipping an item
//! unequips whatever it conflicts with:
//!
//! | equipping           | unequips                                                    |
//! |---------------------|-------------------------------------------------------------|
//! | body armor          | other body armor                                            |
//! | two-handed weapon   | every other weapon and any shield                           |
//! | shield              | other shields, two-handed weapons, the second of two weapons |
//! | one-handed weapon   | every other weapon (shield stays)                           |
//! | light weapon        | two-handed and non-light weapons; a second light weapon only if a shield is held |
//!
//! Other equippable kinds (gear, tools, wondrous items) don't compete for a
//! slot. Consumables can't be equipped.

use crate::character::{CharacterSheet, EntryId, InventoryEntry};
use crate::items::ItemKind;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EquipError {
    #[error("no inventory entry {0}")]
    NotFound(EntryId),

    #[error("{0} can't be equipped")]
    NotEquippable(String),
}

/// Which slot an item competes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    BodyArmor,
    Shield,
    TwoHanded,
    OneHanded,
    Light,
    Free,
}

fn slot_of(entry: &InventoryEntry) -> Slot {
    match &entry.item.kind {
        ItemKind::Armor(_) => Slot::BodyArmor,
        ItemKind::Shield(_) => Slot::Shield,
        ItemKind::Weapon(w) if w.is_two_handed() => Slot::TwoHanded,
        ItemKind::Weapon(w) if w.is_light() => Slot::Light,
        ItemKind::Weapon(_) => Slot::OneHanded,
        _ => Slot::Free,
    }
}

fn is_weapon(slot: Slot) -> bool {
    matches!(slot, Slot::TwoHanded | Slot::OneHanded | Slot::Light)
}

/// Entries to unequip so `incoming` fits alongside what's already equipped.
fn conflicts(sheet: &CharacterSheet, incoming: EntryId, slot: Slot) -> Vec<EntryId> {
    let others: Vec<(EntryId, Slot)> = sheet
        .equipped()
        .filter(|e| e.id != incoming)
        .map(|e| (e.id, slot_of(e)))
        .collect();
    let shield_held = others.iter().any(|(_, s)| *s == Slot::Shield);

    match slot {
        Slot::Free => Vec::new(),
        Slot::BodyArmor => others
            .iter()
            .filter(|(_, s)| *s == Slot::BodyArmor)
            .map(|(id, _)| *id)
            .collect(),
        Slot::TwoHanded => others
            .iter()
            .filter(|(_, s)| is_weapon(*s) || *s == Slot::Shield)
            .map(|(id, _)| *id)
            .collect(),
        Slot::Shield => {
            let mut out: Vec<EntryId> = others
                .iter()
                .filter(|(_, s)| matches!(s, Slot::Shield | Slot::TwoHanded))
                .map(|(id, _)| *id)
                .collect();
            // Two one-handed weapons leave no hand free: keep the first.
            let one_handed: Vec<EntryId> = others
                .iter()
                .filter(|(_, s)| matches!(s, Slot::OneHanded | Slot::Light))
                .map(|(id, _)| *id)
                .collect();
            out.extend(one_handed.into_iter().skip(1));
            out
        }
        Slot::OneHanded => others
            .iter()
            .filter(|(_, s)| is_weapon(*s))
            .map(|(id, _)| *id)
            .collect(),
        Slot::Light => {
            let mut out: Vec<EntryId> = others
                .iter()
                .filter(|(_, s)| matches!(s, Slot::TwoHanded | Slot::OneHanded))
                .map(|(id, _)| *id)
                .collect();
            let lights: Vec<EntryId> = others
                .iter()
                .filter(|(_, s)| *s == Slot::Light)
                .map(|(id, _)| *id)
                .collect();
            let keep = if shield_held { 0 } else { 1 };
            out.extend(lights.into_iter().skip(keep));
            out
        }
    }
}

/// Equip an inventory entry, unequipping whatever conflicts with it.
///
/// Returns the ids that were unequipped, in inventory order.
pub fn equip(sheet: &mut CharacterSheet, entry_id: EntryId) -> Result<Vec<EntryId>, EquipError> {
    let entry = sheet.entry(entry_id).ok_or(EquipError::NotFound(entry_id))?;
    if !entry.item.is_equippable() {
        return Err(EquipError::NotEquippable(entry.item.name.clone()));
    }
    let name = entry.item.name.clone();
    let removed = conflicts(sheet, entry_id, slot_of(entry));

    for entry in sheet.inventory.iter_mut() {
        if removed.contains(&entry.id) {
            entry.equipped = false;
            tracing::debug!(item = %entry.item.name, replaced_by = %name, "unequipped conflicting item");
        } else if entry.id == entry_id {
            entry.equipped = true;
        }
    }

    Ok(removed)
}

/// Unequip an entry. Returns whether it was equipped before.
pub fn unequip(sheet: &mut CharacterSheet, entry_id: EntryId) -> Result<bool, EquipError> {
    let entry = sheet
        .entry_mut(entry_id)
        .ok_or(EquipError::NotFound(entry_id))?;
    let was_equipped = entry.equipped;
    entry.equipped = false;
    Ok(was_equipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ItemSource;
    use crate::class_data::CharacterClass;
    use crate::items::find_item;

    fn sheet() -> CharacterSheet {
        CharacterSheet::new("Test", CharacterClass::Fighter.definition().snapshot())
    }

    fn add(sheet: &mut CharacterSheet, name: &str) -> EntryId {
        let entry = InventoryEntry::new(find_item(name).unwrap(), 1, ItemSource::Custom);
        let id = entry.id;
        sheet.inventory.push(entry);
        id
    }

    fn equipped_names(sheet: &CharacterSheet) -> Vec<String> {
        sheet.equipped().map(|e| e.item.name.clone()).collect()
    }

    #[test]
    fn test_body_armor_is_exclusive() {
        let mut sheet = sheet();
        let leather = add(&mut sheet, "Leather Armor");
        let plate = add(&mut sheet, "Plate Armor");
        equip(&mut sheet, leather).unwrap();
        let removed = equip(&mut sheet, plate).unwrap();
        assert_eq!(removed, vec![leather]);
        assert_eq!(equipped_names(&sheet), vec!["Plate Armor"]);
    }

    #[test]
    fn test_two_handed_clears_hands() {
        let mut sheet = sheet();
        let sword = add(&mut sheet, "Longsword");
        let shield = add(&mut sheet, "Shield");
        let armor = add(&mut sheet, "Chain Mail");
        let greatsword = add(&mut sheet, "Greatsword");
        equip(&mut sheet, sword).unwrap();
        equip(&mut sheet, shield).unwrap();
        equip(&mut sheet, armor).unwrap();

        let removed = equip(&mut sheet, greatsword).unwrap();
        assert_eq!(removed, vec![sword, shield]);
        assert_eq!(equipped_names(&sheet), vec!["Chain Mail", "Greatsword"]);
    }

    #[test]
    fn test_shield_drops_two_hander() {
        let mut sheet = sheet();
        let greataxe = add(&mut sheet, "Greataxe");
        let shield = add(&mut sheet, "Shield");
        equip(&mut sheet, greataxe).unwrap();
        assert_eq!(equip(&mut sheet, shield).unwrap(), vec![greataxe]);
    }

    #[test]
    fn test_shield_with_dual_wield_keeps_first_weapon() {
        let mut sheet = sheet();
        let first = add(&mut sheet, "Shortsword");
        let second = add(&mut sheet, "Dagger");
        let shield = add(&mut sheet, "Shield");
        equip(&mut sheet, first).unwrap();
        equip(&mut sheet, second).unwrap();
        assert_eq!(equip(&mut sheet, shield).unwrap(), vec![second]);
        assert_eq!(equipped_names(&sheet), vec!["Shortsword", "Shield"]);
    }

    #[test]
    fn test_one_handed_keeps_shield() {
        let mut sheet = sheet();
        let shield = add(&mut sheet, "Shield");
        let mace = add(&mut sheet, "Mace");
        let sword = add(&mut sheet, "Longsword");
        equip(&mut sheet, shield).unwrap();
        equip(&mut sheet, mace).unwrap();
        assert_eq!(equip(&mut sheet, sword).unwrap(), vec![mace]);
        assert_eq!(equipped_names(&sheet), vec!["Shield", "Longsword"]);
    }

    #[test]
    fn test_light_weapons_dual_wield() {
        let mut sheet = sheet();
        let a = add(&mut sheet, "Shortsword");
        let b = add(&mut sheet, "Scimitar");
        let c = add(&mut sheet, "Dagger");
        equip(&mut sheet, a).unwrap();
        assert!(equip(&mut sheet, b).unwrap().is_empty());
        // A third light weapon bumps the older off-hand weapon.
        assert_eq!(equip(&mut sheet, c).unwrap(), vec![b]);
        assert_eq!(equipped_names(&sheet), vec!["Shortsword", "Dagger"]);
    }

    #[test]
    fn test_light_weapon_replaces_non_light() {
        let mut sheet = sheet();
        let sword = add(&mut sheet, "Longsword");
        let dagger = add(&mut sheet, "Dagger");
        equip(&mut sheet, sword).unwrap();
        assert_eq!(equip(&mut sheet, dagger).unwrap(), vec![sword]);
    }

    #[test]
    fn test_light_weapon_with_shield() {
        let mut sheet = sheet();
        let shield = add(&mut sheet, "Shield");
        let a = add(&mut sheet, "Shortsword");
        let b = add(&mut sheet, "Dagger");
        equip(&mut sheet, shield).unwrap();
        equip(&mut sheet, a).unwrap();
        assert_eq!(equip(&mut sheet, b).unwrap(), vec![a]);
        assert_eq!(equipped_names(&sheet), vec!["Shield", "Dagger"]);
    }

    #[test]
    fn test_consumable_rejected() {
        let mut sheet = sheet();
        let potion = add(&mut sheet, "Potion of Healing");
        assert_eq!(
            equip(&mut sheet, potion),
            Err(EquipError::NotEquippable("Potion of Healing".to_string()))
        );
        assert!(!sheet.entry(potion).unwrap().equipped);
    }

    #[test]
    fn test_gear_does_not_conflict() {
        let mut sheet = sheet();
        let sword = add(&mut sheet, "Greatsword");
        let focus = add(&mut sheet, "Arcane Focus");
        equip(&mut sheet, sword).unwrap();
        assert!(equip(&mut sheet, focus).unwrap().is_empty());
    }

    #[test]
    fn test_unequip_and_missing_entry() {
        let mut sheet = sheet();
        let sword = add(&mut sheet, "Longsword");
        equip(&mut sheet, sword).unwrap();
        assert_eq!(unequip(&mut sheet, sword), Ok(true));
        assert_eq!(unequip(&mut sheet, sword), Ok(false));
        let missing = EntryId::new();
        assert_eq!(equip(&mut sheet, missing), Err(EquipError::NotFound(missing)));
    }
}
