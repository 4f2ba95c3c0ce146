//! Step-by-step character creation.
//!
//! The builder collects choices (name, species, class, background, scores,
//! skills, optional subclass) and [`CharacterBuilder::build`] resolves them
//! against a [`Catalog`], so custom species and classes work the same way as
//! the built-in ones.

use crate::character::{
    Ability, AbilityScores, CharacterSheet, Currency, Feature, InventoryEntry, ItemSource, Skill,
};
use crate::content::{Catalog, ClassDef};
use crate::derive::recompute;
use crate::equipment::equip;
use crate::items::{Item, ItemKind};
use rand::Rng;
use thiserror::Error;

/// Method for determining ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// Standard array: 15, 14, 13, 12, 10, 8
    #[default]
    StandardArray,
    /// Point buy: 27 points, scores 8-15
    PointBuy,
    /// Roll 4d6, drop lowest, 6 times
    Rolled,
    /// Scores typed in directly, checked only for range.
    Manual,
}

impl AbilityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityMethod::StandardArray => "Standard Array",
            AbilityMethod::PointBuy => "Point Buy",
            AbilityMethod::Rolled => "Rolled",
            AbilityMethod::Manual => "Manual",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbilityMethod::StandardArray => "Assign 15, 14, 13, 12, 10, 8 to your abilities",
            AbilityMethod::PointBuy => "Spend 27 points to customize your scores (8-15 range)",
            AbilityMethod::Rolled => "Roll 4d6, drop the lowest die, six times",
            AbilityMethod::Manual => "Enter each score yourself (1-20)",
        }
    }

    pub fn all() -> &'static [AbilityMethod] {
        &[
            AbilityMethod::StandardArray,
            AbilityMethod::PointBuy,
            AbilityMethod::Rolled,
            AbilityMethod::Manual,
        ]
    }
}

/// Standard array values.
pub const STANDARD_ARRAY: [u8; 6] = [15, 14, 13, 12, 10, 8];

/// Point buy costs for each score value.
pub fn point_buy_cost(score: u8) -> Option<u8> {
    match score {
        8 => Some(0),
        9 => Some(1),
        10 => Some(2),
        11 => Some(3),
        12 => Some(4),
        13 => Some(5),
        14 => Some(7),
        15 => Some(9),
        _ => None,
    }
}

/// Total points available for point buy.
pub const POINT_BUY_TOTAL: u8 = 27;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Character name is required")]
    MissingName,
    #[error("Species selection is required")]
    MissingSpecies,
    #[error("Class selection is required")]
    MissingClass,
    #[error("Background selection is required")]
    MissingBackground,
    #[error("Ability scores are required")]
    MissingAbilityScores,
    #[error("Unknown {kind}: {name}")]
    UnknownContent { kind: &'static str, name: String },
    #[error("Level {0} is out of range (1-20)")]
    InvalidLevel(u8),
    #[error("Standard array scores must be a permutation of 15, 14, 13, 12, 10, 8")]
    InvalidStandardArray,
    #[error("{ability} score {score} is out of range ({min}-{max})")]
    ScoreOutOfRange {
        ability: Ability,
        score: u8,
        min: u8,
        max: u8,
    },
    #[error("Total point cost {0} exceeds maximum 27")]
    PointBuyOverBudget(u8),
    #[error("Expected {expected} skills, got {got}")]
    InvalidSkillCount { expected: usize, got: usize },
    #[error("Skill {0} is not available for this class")]
    SkillNotAvailable(Skill),
    #[error("{species} requires {count} bonus ability choices")]
    BonusChoicesRequired { species: String, count: usize },
    #[error("{species} already raises {ability}; pick another ability")]
    BonusChoiceTaken { species: String, ability: Ability },
    #[error("{subclass} is not a {class} subclass")]
    SubclassMismatch { subclass: String, class: String },
    #[error("{class} chooses a subclass at level {level}")]
    SubclassTooEarly { class: String, level: u8 },
    #[error("{spell} is not on the {class} spell list")]
    SpellNotAvailable { spell: String, class: String },
}

/// Species whose flexible +1 bonuses must be chosen, and how many.
fn flexible_bonus_count(species: &str) -> usize {
    if species.eq_ignore_ascii_case("half-elf") {
        2
    } else {
        0
    }
}

/// Builder for creating D&D 5e characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    species: Option<String>,
    class: Option<String>,
    subclass: Option<String>,
    background: Option<String>,
    level: u8,
    ability_scores: Option<AbilityScores>,
    ability_method: AbilityMethod,
    selected_skills: Vec<Skill>,
    bonus_choices: Vec<Ability>,
    cantrips: Vec<String>,
    spells: Vec<String>,
    backstory: Option<String>,
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self {
            level: 1,
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Species by name or id.
    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Class by name or id.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Set ability scores from standard array assignment.
    ///
    /// `assignment` maps each standard array value (15, 14, 13, 12, 10, 8) to an ability.
    pub fn standard_array(mut self, assignment: [(u8, Ability); 6]) -> Self {
        let mut scores = AbilityScores::default();
        for (value, ability) in assignment {
            scores.set(ability, value);
        }
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::StandardArray;
        self
    }

    pub fn point_buy(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::PointBuy;
        self
    }

    pub fn rolled(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::Rolled;
        self
    }

    pub fn manual(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::Manual;
        self
    }

    /// Skills chosen from the class list.
    pub fn skills(mut self, skills: Vec<Skill>) -> Self {
        self.selected_skills = skills;
        self
    }

    /// Abilities that get the species' flexible +1 (Half-Elf picks two).
    pub fn bonus_choices(mut self, abilities: Vec<Ability>) -> Self {
        self.bonus_choices = abilities;
        self
    }

    pub fn cantrips(mut self, cantrips: Vec<String>) -> Self {
        self.cantrips = cantrips;
        self
    }

    pub fn spells(mut self, spells: Vec<String>) -> Self {
        self.spells = spells;
        self
    }

    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = Some(backstory.into());
        self
    }

    /// Build the character, returning an error if any choice is missing or invalid.
    pub fn build(self, catalog: &Catalog) -> Result<CharacterSheet, BuilderError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(BuilderError::MissingName)?
            .to_string();
        let species_key = self.species.as_deref().ok_or(BuilderError::MissingSpecies)?;
        let class_key = self.class.as_deref().ok_or(BuilderError::MissingClass)?;
        let background_key = self
            .background
            .as_deref()
            .ok_or(BuilderError::MissingBackground)?;
        let base_scores = self
            .ability_scores
            .clone()
            .ok_or(BuilderError::MissingAbilityScores)?;

        let species = catalog
            .species(species_key)
            .ok_or_else(|| unknown("species", species_key))?;
        let class = catalog
            .class(class_key)
            .ok_or_else(|| unknown("class", class_key))?;
        let background = catalog
            .background(background_key)
            .ok_or_else(|| unknown("background", background_key))?;

        if !(1..=20).contains(&self.level) {
            return Err(BuilderError::InvalidLevel(self.level));
        }
        validate_scores(&base_scores, self.ability_method)?;
        self.validate_skills(class)?;

        let subclass = match self.subclass.as_deref() {
            Some(key) => {
                let subclass = catalog
                    .subclass(key)
                    .ok_or_else(|| unknown("subclass", key))?;
                if !subclass.class_name.eq_ignore_ascii_case(&class.name) {
                    return Err(BuilderError::SubclassMismatch {
                        subclass: subclass.name.clone(),
                        class: class.name.clone(),
                    });
                }
                if self.level < class.subclass_level {
                    return Err(BuilderError::SubclassTooEarly {
                        class: class.name.clone(),
                        level: class.subclass_level,
                    });
                }
                Some(subclass)
            }
            None => None,
        };

        // Species bonuses, then flexible choices
        let mut scores = base_scores;
        for (ability, bonus) in &species.ability_bonuses {
            scores.apply_bonus(*ability, *bonus);
        }
        let flexible = flexible_bonus_count(&species.name);
        if flexible > 0 {
            let mut choices = self.bonus_choices.clone();
            choices.sort();
            choices.dedup();
            if choices.len() != flexible {
                return Err(BuilderError::BonusChoicesRequired {
                    species: species.name.clone(),
                    count: flexible,
                });
            }
            // Flexible choices must go to abilities without a fixed bonus
            if let Some(ability) = choices
                .iter()
                .find(|a| species.ability_bonuses.contains_key(*a))
            {
                return Err(BuilderError::BonusChoiceTaken {
                    species: species.name.clone(),
                    ability: *ability,
                });
            }
            for ability in choices {
                scores.apply_bonus(ability, 1);
            }
        }

        let mut snapshot = class.snapshot();
        snapshot.subclass_spellcasting = subclass.and_then(|s| s.spellcasting);
        let caster = snapshot.spellcasting.or(snapshot.subclass_spellcasting).is_some();
        self.validate_spells(catalog, class, caster)?;

        let mut sheet = CharacterSheet::new(name, snapshot);
        sheet.level = self.level;
        sheet.ability_scores = scores;
        sheet.species = species.name.clone();
        sheet.species_id = Some(species.id);
        sheet.background = background.name.clone();
        sheet.background_id = Some(background.id);
        sheet.subclass = subclass.map(|s| s.name.clone());
        sheet.speed = species.speed;
        sheet.backstory = self.backstory.clone().filter(|b| !b.trim().is_empty());

        // Proficiencies
        let prof = &mut sheet.proficiencies;
        prof.saving_throws.extend(class.saving_throws.iter().copied());
        for skill in self
            .selected_skills
            .iter()
            .chain(&background.skill_proficiencies)
            .chain(&species.skill_proficiencies)
        {
            prof.grant_skill(*skill);
        }
        prof.armor.extend(class.armor_proficiencies.iter().cloned());
        prof.weapons.extend(class.weapon_proficiencies.iter().cloned());
        prof.tools.extend(class.tool_proficiencies.iter().cloned());
        prof.tools.extend(background.tool_proficiencies.iter().cloned());
        prof.languages.extend(species.languages.iter().cloned());
        prof.languages.extend(background.languages.iter().cloned());

        // Features
        for t in &species.traits {
            sheet
                .features
                .push(Feature::new(&t.name, &t.description, &species.name));
        }
        for f in class.features_up_to(self.level) {
            sheet
                .features
                .push(Feature::new(&f.name, &f.description, &class.name));
        }
        if let Some(subclass) = subclass {
            for f in subclass.features.iter().filter(|f| f.level <= self.level) {
                sheet
                    .features
                    .push(Feature::new(&f.name, &f.description, &subclass.name));
            }
        }
        if let Some(feature) = &background.feature {
            sheet
                .features
                .push(Feature::new(&feature.name, &feature.description, &background.name));
        }

        // Equipment and gold
        for item_name in &class.starting_equipment {
            sheet
                .inventory
                .push(starting_item(catalog, item_name, ItemSource::Class));
        }
        for item_name in &background.equipment {
            sheet
                .inventory
                .push(starting_item(catalog, item_name, ItemSource::Background));
        }
        equip_starting_gear(&mut sheet);
        sheet.currency = Currency::gold(background.gold);

        // Spells
        let mut sheet = recompute(&sheet);
        if let Some(casting) = sheet.spellcasting.as_mut() {
            casting.cantrips = self.cantrips.clone();
            casting.spells_known = self.spells.clone();
        }
        sheet.hit_points.current = sheet.hit_points.maximum;

        tracing::debug!(
            name = %sheet.name,
            species = %sheet.species,
            class = %sheet.class.name,
            level = sheet.level,
            "built character"
        );
        Ok(sheet)
    }

    fn validate_skills(&self, class: &ClassDef) -> Result<(), BuilderError> {
        let expected = class.skill_count as usize;
        let mut chosen = self.selected_skills.clone();
        chosen.sort();
        chosen.dedup();
        if chosen.len() != expected || self.selected_skills.len() != expected {
            return Err(BuilderError::InvalidSkillCount {
                expected,
                got: chosen.len(),
            });
        }
        if let Some(skill) = chosen.iter().find(|s| !class.skill_options.contains(s)) {
            return Err(BuilderError::SkillNotAvailable(*skill));
        }
        Ok(())
    }

    fn validate_spells(
        &self,
        catalog: &Catalog,
        class: &ClassDef,
        caster: bool,
    ) -> Result<(), BuilderError> {
        for spell_name in self.cantrips.iter().chain(&self.spells) {
            let spell = catalog
                .spell(spell_name)
                .ok_or_else(|| unknown("spell", spell_name))?;
            // Subclass casters (Eldritch Knight) draw from another list, so
            // only class casters are held to their own.
            let on_list = spell.is_available_to(&class.name) || class.spellcasting.is_none();
            if !caster || !on_list {
                return Err(BuilderError::SpellNotAvailable {
                    spell: spell.name.clone(),
                    class: class.name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn unknown(kind: &'static str, name: &str) -> BuilderError {
    BuilderError::UnknownContent {
        kind,
        name: name.to_string(),
    }
}

/// Look an equipment name up in the catalog; unknown names become plain gear.
fn starting_item(catalog: &Catalog, name: &str, source: ItemSource) -> InventoryEntry {
    let item = catalog.item(name).cloned().unwrap_or_else(|| {
        tracing::debug!(item = %name, "starting item not in catalog, adding as gear");
        Item::custom(name, ItemKind::Gear)
    });
    InventoryEntry::new(item, 1, source)
}

/// Put on the first body armor and shield and pick up the first weapon.
fn equip_starting_gear(sheet: &mut CharacterSheet) {
    let first = |pred: fn(&Item) -> bool| {
        sheet.inventory.iter().find(|e| pred(&e.item)).map(|e| e.id)
    };
    let picks = [
        first(Item::is_body_armor),
        first(Item::is_weapon),
        first(Item::is_shield),
    ];
    for id in picks.into_iter().flatten() {
        if let Err(e) = equip(sheet, id) {
            tracing::warn!(error = %e, "could not equip starting item");
        }
    }
}

fn validate_scores(scores: &AbilityScores, method: AbilityMethod) -> Result<(), BuilderError> {
    match method {
        AbilityMethod::StandardArray => {
            let mut values: Vec<u8> = Ability::all().iter().map(|a| scores.get(*a)).collect();
            values.sort_unstable_by(|a, b| b.cmp(a));
            if values != STANDARD_ARRAY {
                return Err(BuilderError::InvalidStandardArray);
            }
            Ok(())
        }
        AbilityMethod::PointBuy => validate_point_buy(scores),
        AbilityMethod::Rolled => check_range(scores, 3, 18),
        AbilityMethod::Manual => check_range(scores, 1, 20),
    }
}

fn check_range(scores: &AbilityScores, min: u8, max: u8) -> Result<(), BuilderError> {
    for ability in Ability::all() {
        let score = scores.get(ability);
        if !(min..=max).contains(&score) {
            return Err(BuilderError::ScoreOutOfRange {
                ability,
                score,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Roll 4d6, drop lowest, for ability score generation.
pub fn roll_4d6_drop_lowest<R: Rng>(rng: &mut R) -> u8 {
    let mut rolls: Vec<u8> = (0..4).map(|_| rng.gen_range(1..=6)).collect();
    rolls.sort();
    rolls[1..].iter().sum()
}

/// Roll a full set of ability scores (6 values), highest first.
pub fn roll_ability_scores<R: Rng>(rng: &mut R) -> [u8; 6] {
    let mut scores = [0u8; 6];
    for score in scores.iter_mut() {
        *score = roll_4d6_drop_lowest(rng);
    }
    scores.sort_unstable_by(|a, b| b.cmp(a));
    scores
}

/// Validate point buy scores.
pub fn validate_point_buy(scores: &AbilityScores) -> Result<(), BuilderError> {
    check_range(scores, 8, 15)?;
    let total_cost: u8 = Ability::all()
        .iter()
        .filter_map(|a| point_buy_cost(scores.get(*a)))
        .sum();
    if total_cost > POINT_BUY_TOTAL {
        return Err(BuilderError::PointBuyOverBudget(total_cost));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::ProficiencyLevel;
    use crate::store::HeroForgeData;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fighter_array() -> [(u8, Ability); 6] {
        [
            (15, Ability::Strength),
            (14, Ability::Constitution),
            (13, Ability::Dexterity),
            (12, Ability::Wisdom),
            (10, Ability::Charisma),
            (8, Ability::Intelligence),
        ]
    }

    fn fighter() -> CharacterBuilder {
        CharacterBuilder::new()
            .name("Thorin")
            .species("Dwarf")
            .class("Fighter")
            .background("Soldier")
            .standard_array(fighter_array())
            .skills(vec![Skill::Perception, Skill::Survival])
    }

    #[test]
    fn test_build_fighter() {
        let data = HeroForgeData::default();
        let sheet = fighter().build(&Catalog::new(&data)).unwrap();

        assert_eq!(sheet.name, "Thorin");
        assert_eq!(sheet.species, "Dwarf");
        assert_eq!(sheet.class.name, "Fighter");
        assert_eq!(sheet.level, 1);
        // Dwarf +2 CON on top of 14
        assert_eq!(sheet.ability_scores.constitution, 16);
        assert_eq!(sheet.hit_points.maximum, 13);
        assert_eq!(sheet.hit_points.current, sheet.hit_points.maximum);
        assert!(sheet.is_proficient_save(Ability::Strength));
        assert_eq!(
            sheet.proficiencies.skill_level(Skill::Athletics),
            ProficiencyLevel::Proficient
        );
        assert!(sheet.spellcasting.is_none());
        assert!(sheet.has_feature("Second Wind"));
        assert!(sheet.currency.gp > 0);
    }

    #[test]
    fn test_starting_equipment_tagged_and_equipped() {
        let data = HeroForgeData::default();
        let sheet = fighter()
            .background("Sailor")
            .build(&Catalog::new(&data))
            .unwrap();

        assert!(sheet
            .inventory
            .iter()
            .any(|e| e.source == ItemSource::Class));
        assert!(sheet
            .inventory
            .iter()
            .any(|e| e.source == ItemSource::Background));
        let equipped: Vec<_> = sheet.equipped().collect();
        assert!(equipped.iter().any(|e| e.item.is_body_armor()));
        assert!(equipped.iter().filter(|e| e.item.is_body_armor()).count() <= 1);
    }

    #[test]
    fn test_build_wizard_with_spells() {
        let data = HeroForgeData::default();
        let sheet = CharacterBuilder::new()
            .name("Elara")
            .species("Elf")
            .class("Wizard")
            .background("Sage")
            .standard_array([
                (15, Ability::Intelligence),
                (14, Ability::Dexterity),
                (13, Ability::Constitution),
                (12, Ability::Wisdom),
                (10, Ability::Charisma),
                (8, Ability::Strength),
            ])
            .skills(vec![Skill::Arcana, Skill::Investigation])
            .cantrips(vec!["Fire Bolt".to_string()])
            .spells(vec!["Magic Missile".to_string()])
            .build(&Catalog::new(&data))
            .unwrap();

        let casting = sheet.spellcasting.as_ref().unwrap();
        assert_eq!(casting.ability, Ability::Intelligence);
        // INT 15 (+2), proficiency +2
        assert_eq!(casting.save_dc, 12);
        assert_eq!(casting.slots[&1].total, 2);
        assert_eq!(casting.cantrips, vec!["Fire Bolt".to_string()]);
    }

    #[test]
    fn test_spell_off_list_rejected() {
        let data = HeroForgeData::default();
        let err = fighter()
            .cantrips(vec!["Fire Bolt".to_string()])
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert!(matches!(err, BuilderError::SpellNotAvailable { .. }));
    }

    #[test]
    fn test_missing_name_error() {
        let data = HeroForgeData::default();
        let err = fighter().name("  ").build(&Catalog::new(&data)).unwrap_err();
        assert_eq!(err, BuilderError::MissingName);
    }

    #[test]
    fn test_unknown_species() {
        let data = HeroForgeData::default();
        let err = fighter()
            .species("Warforged")
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert!(matches!(err, BuilderError::UnknownContent { kind: "species", .. }));
    }

    #[test]
    fn test_wrong_skill_count_error() {
        let data = HeroForgeData::default();
        let err = fighter()
            .skills(vec![Skill::Perception])
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::InvalidSkillCount {
                expected: 2,
                got: 1
            }
        );

        let err = fighter()
            .skills(vec![Skill::Perception, Skill::Perception])
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidSkillCount { .. }));
    }

    #[test]
    fn test_skill_not_on_class_list() {
        let data = HeroForgeData::default();
        let err = fighter()
            .skills(vec![Skill::Perception, Skill::Arcana])
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert_eq!(err, BuilderError::SkillNotAvailable(Skill::Arcana));
    }

    #[test]
    fn test_standard_array_must_be_permutation() {
        let data = HeroForgeData::default();
        let err = fighter()
            .standard_array([
                (15, Ability::Strength),
                (15, Ability::Constitution),
                (13, Ability::Dexterity),
                (12, Ability::Wisdom),
                (10, Ability::Charisma),
                (8, Ability::Intelligence),
            ])
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert_eq!(err, BuilderError::InvalidStandardArray);
    }

    #[test]
    fn test_point_buy_validation() {
        let valid = AbilityScores::new(15, 15, 15, 8, 8, 8);
        assert!(validate_point_buy(&valid).is_ok());

        let over = AbilityScores::new(15, 15, 15, 15, 8, 8);
        assert_eq!(validate_point_buy(&over), Err(BuilderError::PointBuyOverBudget(36)));

        let out_of_range = AbilityScores::new(16, 8, 8, 8, 8, 8);
        assert!(matches!(
            validate_point_buy(&out_of_range),
            Err(BuilderError::ScoreOutOfRange { score: 16, .. })
        ));
    }

    #[test]
    fn test_roll_4d6_drop_lowest() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let score = roll_4d6_drop_lowest(&mut rng);
            assert!((3..=18).contains(&score));
        }
        let scores = roll_ability_scores(&mut rng);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_half_elf_needs_choices() {
        let data = HeroForgeData::default();
        let base = fighter().species("Half-Elf");
        let err = base.clone().build(&Catalog::new(&data)).unwrap_err();
        assert!(matches!(err, BuilderError::BonusChoicesRequired { count: 2, .. }));

        let sheet = base
            .bonus_choices(vec![Ability::Strength, Ability::Constitution])
            .build(&Catalog::new(&data))
            .unwrap();
        assert_eq!(sheet.ability_scores.strength, 16);
        assert_eq!(sheet.ability_scores.charisma, 12);
    }

    #[test]
    fn test_half_elf_choices_skip_charisma() {
        let data = HeroForgeData::default();
        let err = fighter()
            .species("Half-Elf")
            .bonus_choices(vec![Ability::Strength, Ability::Charisma])
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::BonusChoiceTaken {
                species: "Half-Elf".to_string(),
                ability: Ability::Charisma,
            }
        );
    }

    #[test]
    fn test_subclass_rules() {
        let data = HeroForgeData::default();
        let err = fighter()
            .subclass("Champion")
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert!(matches!(err, BuilderError::SubclassTooEarly { level: 3, .. }));

        let err = fighter()
            .level(3)
            .subclass("School of Evocation")
            .build(&Catalog::new(&data))
            .unwrap_err();
        assert!(matches!(err, BuilderError::SubclassMismatch { .. }));

        let sheet = fighter()
            .level(3)
            .subclass("Eldritch Knight")
            .build(&Catalog::new(&data))
            .unwrap();
        assert_eq!(sheet.subclass.as_deref(), Some("Eldritch Knight"));
        let casting = sheet.spellcasting.as_ref().unwrap();
        assert_eq!(casting.ability, Ability::Intelligence);
        assert_eq!(casting.slots[&1].total, 2);
    }

    #[test]
    fn test_custom_species_from_store() {
        let mut data = HeroForgeData::default();
        let mut kenku = crate::content::SpeciesDef::new("Kenku");
        kenku.ability_bonuses.insert(Ability::Dexterity, 2);
        kenku.speed = 35;
        data.custom_species.push(kenku);

        let sheet = fighter()
            .species("kenku")
            .build(&Catalog::new(&data))
            .unwrap();
        assert_eq!(sheet.speed, 35);
        assert_eq!(sheet.ability_scores.dexterity, 15);
    }

    #[test]
    fn test_build_with_backstory() {
        let data = HeroForgeData::default();
        let sheet = fighter()
            .backstory("Raised in the mountain halls.")
            .build(&Catalog::new(&data))
            .unwrap();
        assert_eq!(
            sheet.backstory.as_deref(),
            Some("Raised in the mountain halls.")
        );
    }
}
