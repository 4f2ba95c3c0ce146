//! End-to-end flows through the store: build, equip, cast, rest, save.

use heroforge_core::character::{Ability, ItemSource, Skill};
use heroforge_core::content::SpeciesDef;
use heroforge_core::items::find_item;
use heroforge_core::store::Theme;
use heroforge_core::testing::{sample_fighter, sample_wizard};
use heroforge_core::{
    persist, reduce, Action, Catalog, CharacterBuilder, ContentEntry, ContentKind,
    ContentManager, Effect, HeroForgeData, StoreError,
};
use tempfile::TempDir;

fn party() -> HeroForgeData {
    let mut data = HeroForgeData::default();
    reduce(&mut data, Action::AddCharacter(Box::new(sample_fighter("Brom")))).unwrap();
    reduce(&mut data, Action::AddCharacter(Box::new(sample_wizard("Mira")))).unwrap();
    data
}

#[test]
fn test_two_handed_weapon_frees_hands() {
    let mut data = party();
    let id = data.find_character("Brom").unwrap().id;
    assert_eq!(data.character(id).unwrap().armor_class, 18);

    let greatsword = find_item("Greatsword").unwrap();
    let effects = reduce(
        &mut data,
        Action::AddItem {
            id,
            item: Box::new(greatsword),
            quantity: 1,
            source: ItemSource::Custom,
        },
    )
    .unwrap();
    let entry = match effects[0] {
        Effect::ItemAdded { entry, .. } => entry,
        ref other => panic!("unexpected effect {other:?}"),
    };

    let effects = reduce(&mut data, Action::EquipItem { id, entry }).unwrap();
    let Effect::Unequipped { entries, .. } = &effects[0] else {
        panic!("expected unequip effect, got {effects:?}");
    };
    let sheet = data.character(id).unwrap();
    let names: Vec<&str> = entries
        .iter()
        .map(|e| sheet.entry(*e).unwrap().item.name.as_str())
        .collect();
    assert!(names.contains(&"Longsword"));
    assert!(names.contains(&"Shield"));
    // Shield bonus is gone
    assert_eq!(sheet.armor_class, 16);
}

#[test]
fn test_spell_slots_run_out_and_recover() {
    let mut data = party();
    let id = data.find_character("Mira").unwrap().id;

    reduce(&mut data, Action::UseSpellSlot { id, level: 1 }).unwrap();
    reduce(&mut data, Action::UseSpellSlot { id, level: 1 }).unwrap();
    assert_eq!(
        reduce(&mut data, Action::UseSpellSlot { id, level: 1 }),
        Err(StoreError::NoSlotRemaining(1))
    );

    reduce(&mut data, Action::Damage { id, amount: 3 }).unwrap();
    reduce(&mut data, Action::LongRest(id)).unwrap();

    let sheet = data.character(id).unwrap();
    assert_eq!(sheet.hit_points.current, sheet.hit_points.maximum);
    let slots = &sheet.spellcasting.as_ref().unwrap().slots[&1];
    assert_eq!(slots.available(), 2);
}

#[test]
fn test_level_up_raises_hit_points_and_proficiency() {
    let mut data = party();
    let id = data.find_character("Brom").unwrap().id;
    let before = data.character(id).unwrap().hit_points.maximum;

    reduce(&mut data, Action::SetLevel { id, level: 5 }).unwrap();
    let sheet = data.character(id).unwrap();
    // d10 average 6 plus CON +3, four more levels
    assert_eq!(sheet.hit_points.maximum, before + 4 * 9);
    assert_eq!(sheet.proficiency_bonus, 3);

    assert_eq!(
        reduce(&mut data, Action::SetLevel { id, level: 21 }),
        Err(StoreError::InvalidLevel(21))
    );
}

#[test]
fn test_custom_species_is_buildable_and_staged_delete() {
    let mut data = HeroForgeData::default();
    let mut kenku = SpeciesDef::new("Kenku");
    kenku.ability_bonuses.insert(Ability::Dexterity, 2);
    kenku.ability_bonuses.insert(Ability::Wisdom, 1);
    reduce(&mut data, Action::AddContent(ContentEntry::Species(kenku.clone()))).unwrap();

    let sheet = CharacterBuilder::new()
        .name("Caw")
        .species("kenku")
        .class("Rogue")
        .background("Criminal")
        .standard_array([
            (15, Ability::Dexterity),
            (14, Ability::Constitution),
            (13, Ability::Wisdom),
            (12, Ability::Intelligence),
            (10, Ability::Charisma),
            (8, Ability::Strength),
        ])
        .skills(vec![Skill::Acrobatics, Skill::Athletics, Skill::Perception, Skill::Investigation])
        .build(&Catalog::new(&data))
        .unwrap();
    assert_eq!(sheet.ability_scores.get(Ability::Dexterity), 17);
    assert_eq!(sheet.species_id, Some(kenku.id));

    let mut staged = ContentManager::new();
    assert!(staged.mark(ContentKind::Species, kenku.id));
    assert_eq!(staged.commit(&mut data).unwrap(), 1);
    assert!(Catalog::new(&data).species("Kenku").is_none());
}

#[tokio::test]
async fn test_save_load_and_character_transfer() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("party").join("heroforge.json");

    let mut data = party();
    reduce(&mut data, Action::ToggleTheme).unwrap();
    persist::save(&data, &path).await.unwrap();

    let loaded = persist::load_or_default(&path).await.unwrap();
    assert_eq!(loaded, data);
    assert_eq!(loaded.settings.theme, Theme::Dark);

    // Move one character into an empty store
    let json = persist::export_character(loaded.find_character("Mira").unwrap()).unwrap();
    let mut other = persist::load_or_default(temp_dir.path().join("missing.json"))
        .await
        .unwrap();
    assert!(other.characters.is_empty());

    let imported = persist::import_character(&json).unwrap();
    assert_ne!(imported.id, loaded.find_character("Mira").unwrap().id);
    reduce(&mut other, Action::AddCharacter(Box::new(imported))).unwrap();
    assert_eq!(other.characters[0].name, "Mira");
}

#[test]
fn test_replace_all_from_import() {
    let data = party();
    let json = persist::export_json(&data).unwrap();

    let mut fresh = HeroForgeData::default();
    let imported = persist::import_json(&json).unwrap();
    assert_eq!(
        reduce(&mut fresh, Action::ReplaceAll(Box::new(imported))).unwrap(),
        vec![Effect::DataReplaced]
    );
    assert_eq!(fresh.characters.len(), 2);
    assert_eq!(fresh, data);
}
