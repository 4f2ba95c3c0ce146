//! Drafted content flowing into the rest of the app: model reply to store,
//! store to character builder and combat tracker.

use heroforge_core::attack_parse::parse_attack;
use heroforge_core::character::{Ability, Skill};
use heroforge_core::draft::{draft, redraft};
use heroforge_core::items::DamageType;
use heroforge_core::testing::{sample_fighter, MockModel};
use heroforge_core::{
    reduce, Action, Catalog, CharacterBuilder, CombatTracker, ContentEntry, ContentKind,
    HeroForgeData, Initiative,
};

const TORTLE: &str = r#"```json
{
  "name": "Tortle",
  "description": "Shelled wanderers of the coast.",
  "size": "Medium",
  "speed": "30 ft.",
  "abilityBonuses": { "STR": 2, "WIS": 1, "Luck": 3 },
  "languages": ["Common", "Aquan"],
  "traits": [{ "name": "Natural Armor", "description": "Your shell protects you." }]
}
```"#;

const SAHUAGIN: &str = r#"{
  "name": "Sahuagin Raider",
  "size": "Medium",
  "creatureType": "humanoid",
  "armorClass": 12,
  "hitPoints": 22,
  "hitDice": "4d8+4",
  "speed": 30,
  "abilityScores": { "STR": 13, "DEX": 11, "CON": 12 },
  "challengeRating": 0.5,
  "actions": [
    {
      "name": "Spear",
      "description": "Melee Weapon Attack: +3 to hit, reach 5 ft., one target. Hit: 4 (1d6 + 1) piercing damage."
    }
  ]
}"#;

#[tokio::test]
async fn test_drafted_species_builds_a_character() {
    let model = MockModel::new(vec![TORTLE]);
    let mut data = HeroForgeData::default();

    let entry = draft(&model, ContentKind::Species, "a turtle folk species")
        .await
        .unwrap();
    assert_eq!(entry.name(), "Tortle");
    reduce(&mut data, Action::AddContent(entry)).unwrap();

    let species = &data.custom_species[0];
    assert_eq!(species.speed, 30);
    // Unknown ability keys are dropped
    assert_eq!(species.ability_bonuses.len(), 2);

    let sheet = CharacterBuilder::new()
        .name("Shellby")
        .species("Tortle")
        .class("Fighter")
        .background("Sailor")
        .standard_array([
            (15, Ability::Strength),
            (14, Ability::Constitution),
            (13, Ability::Wisdom),
            (12, Ability::Dexterity),
            (10, Ability::Charisma),
            (8, Ability::Intelligence),
        ])
        .skills(vec![Skill::Insight, Skill::Survival])
        .build(&Catalog::new(&data))
        .unwrap();
    assert_eq!(sheet.ability_scores.get(Ability::Strength), 17);
    assert!(sheet.has_feature("Natural Armor"));

    let calls = model.calls();
    let (system, prompt) = &calls[0];
    assert!(system.contains("species"));
    assert_eq!(prompt, "a turtle folk species");
}

#[tokio::test]
async fn test_drafted_npc_joins_combat() {
    let model = MockModel::new(vec![SAHUAGIN]);
    let mut data = HeroForgeData::default();

    let entry = draft(&model, ContentKind::Npc, "a sea raider").await.unwrap();
    reduce(&mut data, Action::AddContent(entry)).unwrap();

    let catalog = Catalog::new(&data);
    let raider = catalog.npc("Sahuagin Raider").unwrap();
    assert_eq!(raider.challenge_rating, "1/2");
    assert_eq!(raider.hit_dice, "4d8+4");

    let spear = parse_attack(&raider.actions[0].description).unwrap();
    assert_eq!(spear.to_hit, Some(3));
    assert_eq!(spear.average_damage(), 4);

    let mut tracker = CombatTracker::new();
    tracker.add_character(&sample_fighter("Brom"), Initiative::Given(12));
    let first = tracker.add_npc(raider, Initiative::Given(8));
    let second = tracker.add_npc(raider, Initiative::Given(8));
    assert_eq!(tracker.get(second).unwrap().name, "Sahuagin Raider 2");

    tracker.damage(first, 30).unwrap();
    assert!(tracker.get(first).unwrap().is_down());
    assert_eq!(tracker.current().unwrap().name, "Brom");
}

#[tokio::test]
async fn test_redraft_replaces_in_place() {
    let model = MockModel::new(vec![
        r#"{"name": "Stormblade", "type": "weapon", "damageDice": "1d8", "damageType": "slashing", "magical": true}"#,
        r#"{"name": "Stormblade", "damageType": "lightning", "description": "Crackles when drawn."}"#,
    ]);
    let mut data = HeroForgeData::default();

    let first = draft(&model, ContentKind::Item, "a storm sword").await.unwrap();
    let id = first.id();
    reduce(&mut data, Action::AddContent(first)).unwrap();

    let base = data.find_custom(ContentKind::Item, "stormblade").unwrap();
    let revised = redraft(&model, &base, "make it lightning").await.unwrap();
    assert_eq!(revised.id(), id);
    reduce(&mut data, Action::ReplaceContent(revised)).unwrap();

    let ContentEntry::Item(item) = data.find_custom(ContentKind::Item, "Stormblade").unwrap()
    else {
        panic!("expected an item");
    };
    assert!(item.magical);
    let weapon = item.weapon_profile().unwrap();
    assert_eq!(weapon.damage_dice, "1d8");
    assert_eq!(weapon.damage_type, DamageType::Lightning);
    assert_eq!(item.description.as_deref(), Some("Crackles when drawn."));

    // The redraft prompt carries the current entry
    assert!(model.calls()[1].1.contains("\"Stormblade\""));
}

#[tokio::test]
async fn test_failed_draft_leaves_store_alone() {
    let model = MockModel::new(vec![r#"{"description": "nameless"}"#]);
    let data = HeroForgeData::default();
    assert!(draft(&model, ContentKind::Spell, "anything").await.is_err());
    assert!(data.custom_spells.is_empty());
}
