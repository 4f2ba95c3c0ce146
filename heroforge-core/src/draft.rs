//! AI-drafted content.
//!
//! A [`TextModel`] is asked for a JSON stub describing one catalog entry. The
//! reply is unfenced, parsed, and merged field by field into a typed
//! definition. Merging is lenient: absent or mistyped fields keep the base
//! value, and enum values outside the known lists are dropped with a warning.
//! Only a missing `name` fails the draft.

use crate::bestiary::{NpcAction, NpcDef};
use crate::character::{Ability, Skill};
use crate::class_data::{CasterProgression, SpellcastingProfile};
use crate::content::{
    BackgroundDef, ClassDef, ContentKind, LevelFeature, Size, SpeciesDef, SubclassDef, TraitDef,
};
use crate::dice::{DiceSpec, DieType};
use crate::items::{
    ArmorProfile, ArmorType, DamageType, Item, ItemKind, ShieldProfile, WeaponCategory,
    WeaponProfile, WeaponProperty, WeaponRange,
};
use crate::spells::{Components, SpellDamage, SpellDef, SpellSchool};
use crate::store::ContentEntry;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("model request failed: {0}")]
    Model(String),

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response must be a JSON object")]
    NotAnObject,

    #[error("draft has no name")]
    MissingName,
}

/// A model that turns a system prompt and a user prompt into text.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DraftError>;
}

#[async_trait]
impl TextModel for claude::Claude {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DraftError> {
        let request = claude::Request::new(vec![claude::Message::user(prompt)])
            .with_system(system)
            .with_max_tokens(2048);
        let response = claude::Claude::complete(self, request)
            .await
            .map_err(|e| DraftError::Model(e.to_string()))?;
        Ok(response.text())
    }
}

// ============================================================================
// Prompts
// ============================================================================

const PROMPT_PREAMBLE: &str = "You write D&D 5th edition homebrew content. Reply with a single \
JSON object and nothing else. Use exactly the field names shown. Omit fields you have no value for.";

fn shape(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Species => {
            r#"{"name": string, "description": string, "size": "Tiny"|"Small"|"Medium"|"Large",
"speed": number, "abilityBonuses": {"Strength": number, ...}, "darkvision": number,
"languages": [string], "skillProficiencies": [skill name], "traits": [{"name": string, "description": string}]}"#
        }
        ContentKind::Class => {
            r#"{"name": string, "description": string, "hitDie": 6|8|10|12,
"savingThrows": [ability name], "skillOptions": [skill name], "skillCount": number,
"armorProficiencies": [string], "weaponProficiencies": [string], "toolProficiencies": [string],
"spellcasting": {"ability": ability name, "progression": "full"|"half"|"third"|"pact"},
"features": [{"level": number, "name": string, "description": string}],
"startingEquipment": [item name], "subclassLevel": number}"#
        }
        ContentKind::Subclass => {
            r#"{"name": string, "className": string, "description": string,
"features": [{"level": number, "name": string, "description": string}],
"spellcasting": {"ability": ability name, "progression": "third"}}"#
        }
        ContentKind::Background => {
            r#"{"name": string, "description": string, "skillProficiencies": [skill name],
"toolProficiencies": [string], "languages": [string], "equipment": [item name],
"feature": {"name": string, "description": string}, "gold": number}"#
        }
        ContentKind::Item => {
            r#"{"name": string, "description": string, "type": "weapon"|"armor"|"shield"|"gear"|"tool"|"consumable"|"wondrous",
"weight": number, "valueGp": number, "magical": boolean,
"damageDice": "1d8", "damageType": damage type, "category": "simple"|"martial", "properties": [string],
"range": {"normal": number, "long": number},
"armorType": "light"|"medium"|"heavy", "baseAc": number, "addDexModifier": boolean, "maxDexBonus": number,
"strengthRequirement": number, "stealthDisadvantage": boolean, "acBonus": number}"#
        }
        ContentKind::Spell => {
            r#"{"name": string, "level": 0-9, "school": school name, "castingTime": string, "range": string,
"components": {"verbal": boolean, "somatic": boolean, "material": string}, "duration": string,
"concentration": boolean, "ritual": boolean, "description": string, "higherLevels": string,
"classes": [class name], "damage": {"dice": "8d6", "damageType": damage type}, "save": ability name}"#
        }
        ContentKind::Npc => {
            r#"{"name": string, "size": size, "creatureType": string, "alignment": string,
"armorClass": number, "hitPoints": number, "hitDice": "2d8+2", "speed": number,
"abilityScores": {"strength": number, "dexterity": number, "constitution": number,
"intelligence": number, "wisdom": number, "charisma": number}, "challengeRating": string,
"actions": [{"name": string, "description": "Melee Weapon Attack: +4 to hit, reach 5 ft., one target. Hit: 5 (1d6 + 2) slashing damage."}]}"#
        }
    }
}

/// The system prompt for drafting one kind of content.
pub fn system_prompt(kind: ContentKind) -> String {
    format!(
        "{PROMPT_PREAMBLE}\n\nYou are drafting a {}. The JSON shape is:\n{}",
        kind.label(),
        shape(kind)
    )
}

// ============================================================================
// Parsing
// ============================================================================

/// Remove a surrounding triple-backtick fence (with or without a `json` tag)
/// and any chatter outside it.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let body = trimmed[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let end = body.rfind("```").unwrap_or(body.len());
    body[..end].trim()
}

/// Ask the model for a new entry of `kind`.
pub async fn draft<M: TextModel + ?Sized>(
    model: &M,
    kind: ContentKind,
    request: &str,
) -> Result<ContentEntry, DraftError> {
    tracing::info!(kind = %kind, "requesting draft");
    let reply = model.complete(&system_prompt(kind), request).await?;
    parse_draft(kind, &reply)
}

/// Ask the model to fill in an existing entry. The entry keeps its id.
pub async fn redraft<M: TextModel + ?Sized>(
    model: &M,
    base: &ContentEntry,
    request: &str,
) -> Result<ContentEntry, DraftError> {
    let kind = base.kind();
    tracing::info!(kind = %kind, name = %base.name(), "requesting redraft");
    let prompt = format!(
        "{request}\n\nThe current entry is:\n{}",
        serde_json::to_string_pretty(base)?
    );
    let reply = model.complete(&system_prompt(kind), &prompt).await?;
    merge_draft(base, &reply)
}

/// Build a fresh entry from a model reply.
pub fn parse_draft(kind: ContentKind, reply: &str) -> Result<ContentEntry, DraftError> {
    let base = match kind {
        ContentKind::Species => ContentEntry::Species(SpeciesDef::new("")),
        ContentKind::Class => ContentEntry::Class(ClassDef::new("", DieType::D8)),
        ContentKind::Subclass => ContentEntry::Subclass(SubclassDef::new("", "")),
        ContentKind::Background => ContentEntry::Background(BackgroundDef::new("")),
        ContentKind::Item => ContentEntry::Item(Item::custom("", ItemKind::Gear)),
        ContentKind::Spell => ContentEntry::Spell(SpellDef::new("", 0)),
        ContentKind::Npc => ContentEntry::Npc(NpcDef::new("", 10, 1)),
    };
    merge_draft(&base, reply)
}

/// Merge a model reply over `base`. Fields the reply doesn't supply keep
/// their base values.
pub fn merge_draft(base: &ContentEntry, reply: &str) -> Result<ContentEntry, DraftError> {
    let value: Value = serde_json::from_str(strip_code_fences(reply))?;
    let object = value.as_object().ok_or(DraftError::NotAnObject)?;
    let fields = Fields(object);
    let name = fields.string("name").ok_or(DraftError::MissingName)?;

    let merged = match base.clone() {
        ContentEntry::Species(def) => ContentEntry::Species(merge_species(def, &fields)),
        ContentEntry::Class(def) => ContentEntry::Class(merge_class(def, &fields)),
        ContentEntry::Subclass(def) => ContentEntry::Subclass(merge_subclass(def, &fields)),
        ContentEntry::Background(def) => ContentEntry::Background(merge_background(def, &fields)),
        ContentEntry::Item(item) => ContentEntry::Item(merge_item(item, &fields)),
        ContentEntry::Spell(def) => ContentEntry::Spell(merge_spell(def, &fields)),
        ContentEntry::Npc(def) => ContentEntry::Npc(merge_npc(def, &fields)),
    };
    let merged = merged.with_name(name);
    tracing::debug!(kind = %merged.kind(), name = %merged.name(), "merged draft");
    Ok(merged)
}

// ============================================================================
// Field access
// ============================================================================

/// Typed, forgiving reads over a JSON object.
struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn string(&self, key: &str) -> Option<String> {
        let s = self.get(key)?.as_str()?.trim();
        (!s.is_empty()).then(|| s.to_string())
    }

    /// Accepts both numbers and numeric strings ("30 ft." reads as 30).
    fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => {
                let digits: String = s
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '-')
                    .collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }

    fn uint(&self, key: &str) -> Option<u32> {
        self.int(key).and_then(|n| u32::try_from(n).ok())
    }

    fn float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64().filter(|f| *f >= 0.0)
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    fn strings(&self, key: &str) -> Option<Vec<String>> {
        let array = self.get(key)?.as_array()?;
        Some(
            array
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    fn object(&self, key: &str) -> Option<Fields<'a>> {
        self.get(key)?.as_object().map(Fields)
    }

    fn objects(&self, key: &str) -> Option<Vec<Fields<'a>>> {
        let array = self.get(key)?.as_array()?;
        Some(array.iter().filter_map(|v| v.as_object()).map(Fields).collect())
    }

    /// A single allow-listed value. Unknown values are dropped.
    fn allowed<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let raw = self.string(key)?;
        let parsed = parse(&raw);
        if parsed.is_none() {
            tracing::warn!(field = key, value = %raw, "dropping unknown value");
        }
        parsed
    }

    /// A list of allow-listed values. Unknown entries are dropped.
    fn allowed_list<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
        let raw = self.strings(key)?;
        Some(
            raw.iter()
                .filter_map(|s| {
                    let parsed = parse(s);
                    if parsed.is_none() {
                        tracing::warn!(field = key, value = %s, "dropping unknown value");
                    }
                    parsed
                })
                .collect(),
        )
    }

    fn traits(&self, key: &str) -> Option<Vec<TraitDef>> {
        Some(
            self.objects(key)?
                .iter()
                .filter_map(|t| {
                    Some(TraitDef::new(
                        t.string("name")?,
                        t.string("description").unwrap_or_default(),
                    ))
                })
                .collect(),
        )
    }

    fn level_features(&self, key: &str) -> Option<Vec<LevelFeature>> {
        Some(
            self.objects(key)?
                .iter()
                .filter_map(|f| {
                    Some(LevelFeature {
                        level: f.uint("level").unwrap_or(1).clamp(1, 20) as u8,
                        name: f.string("name")?,
                        description: f.string("description").unwrap_or_default(),
                    })
                })
                .collect(),
        )
    }

    fn spellcasting(&self, key: &str) -> Option<SpellcastingProfile> {
        let casting = self.object(key)?;
        let ability = casting.allowed("ability", Ability::from_name)?;
        let progression = casting
            .allowed("progression", CasterProgression::from_name)
            .unwrap_or(CasterProgression::Full);
        Some(SpellcastingProfile::new(ability, progression))
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn clamp_u8(n: u32, max: u8) -> u8 {
    n.min(max as u32) as u8
}

// ============================================================================
// Per-kind merges
// ============================================================================

fn merge_species(mut def: SpeciesDef, f: &Fields) -> SpeciesDef {
    set(&mut def.description, f.string("description"));
    set(&mut def.size, f.allowed("size", Size::from_name));
    set(&mut def.speed, f.uint("speed"));
    if let Some(bonuses) = f.object("abilityBonuses") {
        def.ability_bonuses = bonuses
            .0
            .iter()
            .filter_map(|(key, value)| {
                let ability = Ability::from_name(key);
                if ability.is_none() {
                    tracing::warn!(field = "abilityBonuses", value = %key, "dropping unknown ability");
                }
                Some((ability?, value.as_i64()?.clamp(-4, 4) as i8))
            })
            .collect();
    }
    if f.get("darkvision").is_some() {
        def.darkvision = f.uint("darkvision").filter(|d| *d > 0);
    }
    set(&mut def.languages, f.strings("languages"));
    set(
        &mut def.skill_proficiencies,
        f.allowed_list("skillProficiencies", Skill::from_name),
    );
    set(&mut def.traits, f.traits("traits"));
    def
}

fn merge_class(mut def: ClassDef, f: &Fields) -> ClassDef {
    set(&mut def.description, f.string("description"));
    let hit_die = f
        .uint("hitDie")
        .or_else(|| f.string("hitDie").and_then(|s| s.trim_start_matches(['d', 'D']).parse().ok()));
    if let Some(sides) = hit_die {
        match sides {
            6 | 8 | 10 | 12 => set(&mut def.hit_die, DieType::from_sides(sides)),
            other => tracing::warn!(field = "hitDie", value = other, "dropping unknown hit die"),
        }
    }
    set(&mut def.saving_throws, f.allowed_list("savingThrows", Ability::from_name));
    set(&mut def.skill_options, f.allowed_list("skillOptions", Skill::from_name));
    set(&mut def.skill_count, f.uint("skillCount").map(|n| clamp_u8(n, 18)));
    set(&mut def.armor_proficiencies, f.strings("armorProficiencies"));
    set(&mut def.weapon_proficiencies, f.strings("weaponProficiencies"));
    set(&mut def.tool_proficiencies, f.strings("toolProficiencies"));
    if f.get("spellcasting").is_some() {
        def.spellcasting = f.spellcasting("spellcasting");
    }
    set(&mut def.features, f.level_features("features"));
    set(&mut def.starting_equipment, f.strings("startingEquipment"));
    set(
        &mut def.subclass_level,
        f.uint("subclassLevel").map(|n| clamp_u8(n, 20).max(1)),
    );
    def
}

fn merge_subclass(mut def: SubclassDef, f: &Fields) -> SubclassDef {
    set(&mut def.class_name, f.string("className"));
    set(&mut def.description, f.string("description"));
    set(&mut def.features, f.level_features("features"));
    if f.get("spellcasting").is_some() {
        def.spellcasting = f.spellcasting("spellcasting");
    }
    def
}

fn merge_background(mut def: BackgroundDef, f: &Fields) -> BackgroundDef {
    set(&mut def.description, f.string("description"));
    set(
        &mut def.skill_proficiencies,
        f.allowed_list("skillProficiencies", Skill::from_name),
    );
    set(&mut def.tool_proficiencies, f.strings("toolProficiencies"));
    set(&mut def.languages, f.strings("languages"));
    set(&mut def.equipment, f.strings("equipment"));
    if let Some(feature) = f.object("feature") {
        def.feature = feature.string("name").map(|name| {
            TraitDef::new(name, feature.string("description").unwrap_or_default())
        });
    }
    set(&mut def.gold, f.uint("gold"));
    def
}

fn merge_item(mut item: Item, f: &Fields) -> Item {
    if let Some(description) = f.string("description") {
        item.description = Some(description);
    }
    set(&mut item.weight, f.float("weight"));
    set(&mut item.value_gp, f.float("valueGp"));
    set(&mut item.magical, f.bool("magical"));

    let requested = f.string("type").map(|t| t.to_lowercase());
    let kind_name = requested.as_deref().unwrap_or(item.kind.label());
    item.kind = match kind_name {
        "weapon" => ItemKind::Weapon(merge_weapon(item.weapon_profile().cloned(), f)),
        "armor" => ItemKind::Armor(merge_armor(item.armor_profile().cloned(), f)),
        "shield" => {
            let mut shield = match &item.kind {
                ItemKind::Shield(s) => *s,
                _ => ShieldProfile::default(),
            };
            set(&mut shield.ac_bonus, f.int("acBonus").map(|n| n.clamp(0, 5) as i32));
            ItemKind::Shield(shield)
        }
        "gear" => ItemKind::Gear,
        "tool" => ItemKind::Tool,
        "consumable" | "potion" => ItemKind::Consumable,
        "wondrous" | "wondrous item" => ItemKind::Wondrous,
        other => {
            tracing::warn!(field = "type", value = %other, "dropping unknown item type");
            item.kind.clone()
        }
    };
    item
}

fn merge_weapon(base: Option<WeaponProfile>, f: &Fields) -> WeaponProfile {
    let mut weapon = base.unwrap_or(WeaponProfile {
        damage_dice: "1d6".to_string(),
        damage_type: DamageType::Bludgeoning,
        category: WeaponCategory::Simple,
        properties: Vec::new(),
        range: None,
    });
    if let Some(dice) = f.string("damageDice") {
        match DiceSpec::parse(&dice) {
            Ok(spec) => weapon.damage_dice = spec.to_string(),
            Err(_) => tracing::warn!(field = "damageDice", value = %dice, "dropping invalid dice"),
        }
    }
    set(&mut weapon.damage_type, f.allowed("damageType", DamageType::from_name));
    set(
        &mut weapon.category,
        f.allowed("category", |s| match s.to_lowercase().as_str() {
            "simple" => Some(WeaponCategory::Simple),
            "martial" => Some(WeaponCategory::Martial),
            _ => None,
        }),
    );
    set(&mut weapon.properties, f.allowed_list("properties", WeaponProperty::from_name));
    if let Some(range) = f.object("range") {
        weapon.range = range.uint("normal").map(|normal| WeaponRange {
            normal,
            long: range.uint("long").unwrap_or(normal).max(normal),
        });
    }
    weapon
}

fn merge_armor(base: Option<ArmorProfile>, f: &Fields) -> ArmorProfile {
    let mut armor = base.unwrap_or(ArmorProfile {
        armor_type: ArmorType::Light,
        base_ac: 11,
        add_dex_modifier: true,
        max_dex_bonus: None,
        strength_requirement: None,
        stealth_disadvantage: false,
    });
    set(&mut armor.armor_type, f.allowed("armorType", ArmorType::from_name));
    set(&mut armor.base_ac, f.int("baseAc").map(|n| n.clamp(10, 20) as i32));
    set(&mut armor.add_dex_modifier, f.bool("addDexModifier"));
    if f.get("maxDexBonus").is_some() {
        armor.max_dex_bonus = f.int("maxDexBonus").map(|n| n.clamp(0, 10) as i8);
    }
    if f.get("strengthRequirement").is_some() {
        armor.strength_requirement = f.uint("strengthRequirement").map(|n| clamp_u8(n, 30));
    }
    set(&mut armor.stealth_disadvantage, f.bool("stealthDisadvantage"));
    armor
}

fn merge_spell(mut def: SpellDef, f: &Fields) -> SpellDef {
    set(&mut def.level, f.uint("level").map(|n| clamp_u8(n, 9)));
    set(&mut def.school, f.allowed("school", SpellSchool::from_name));
    set(&mut def.casting_time, f.string("castingTime"));
    set(&mut def.range, f.string("range"));
    set(&mut def.components, components(f));
    set(&mut def.duration, f.string("duration"));
    set(&mut def.concentration, f.bool("concentration"));
    set(&mut def.ritual, f.bool("ritual"));
    set(&mut def.description, f.string("description"));
    if let Some(higher) = f.string("higherLevels") {
        def.higher_levels = Some(higher);
    }
    set(&mut def.classes, f.strings("classes"));
    if let Some(damage) = f.object("damage") {
        let dice = damage
            .string("dice")
            .and_then(|d| DiceSpec::parse(&d).ok())
            .map(|spec| spec.to_string());
        let damage_type = damage.allowed("damageType", DamageType::from_name);
        def.damage = match (dice, damage_type) {
            (Some(dice), Some(damage_type)) => Some(SpellDamage { dice, damage_type }),
            _ => {
                tracing::warn!(field = "damage", "dropping incomplete spell damage");
                None
            }
        };
    }
    if f.get("save").is_some() {
        def.save = f.allowed("save", Ability::from_name);
    }
    def
}

/// Components as an object, or as the "V, S, M (a pinch of salt)" shorthand.
fn components(f: &Fields) -> Option<Components> {
    if let Some(c) = f.object("components") {
        return Some(Components {
            verbal: c.bool("verbal").unwrap_or(false),
            somatic: c.bool("somatic").unwrap_or(false),
            material: c.string("material"),
        });
    }
    let text = f.string("components")?;
    let (flags, material) = match text.split_once('(') {
        Some((flags, rest)) => (flags, Some(rest.trim_end_matches(')').trim().to_string())),
        None => (text.as_str(), None),
    };
    let flags: Vec<String> = flags
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .collect();
    let has = |flag: &str| flags.iter().any(|x| x == flag);
    Some(Components {
        verbal: has("V"),
        somatic: has("S"),
        material: material.filter(|_| has("M")),
    })
}

fn merge_npc(mut def: NpcDef, f: &Fields) -> NpcDef {
    set(&mut def.size, f.allowed("size", Size::from_name));
    set(&mut def.creature_type, f.string("creatureType"));
    set(&mut def.alignment, f.string("alignment"));
    set(&mut def.armor_class, f.int("armorClass").map(|n| n.clamp(1, 30) as i32));
    set(&mut def.hit_points, f.int("hitPoints").map(|n| n.clamp(1, 1000) as i32));
    if let Some(dice) = f.string("hitDice") {
        match DiceSpec::parse(&dice) {
            Ok(spec) => def.hit_dice = spec.to_string(),
            Err(_) => tracing::warn!(field = "hitDice", value = %dice, "dropping invalid dice"),
        }
    }
    set(&mut def.speed, f.uint("speed"));
    if let Some(scores) = f.object("abilityScores") {
        let mut merged = def.ability_scores;
        for (key, value) in scores.0.iter() {
            match (Ability::from_name(key), value.as_u64()) {
                (Some(ability), Some(score)) => merged.set(ability, score.clamp(1, 30) as u8),
                _ => tracing::warn!(field = "abilityScores", value = %key, "dropping ability score"),
            }
        }
        def.ability_scores = merged;
    }
    let challenge = f
        .string("challengeRating")
        .or_else(|| f.get("challengeRating")?.as_f64().map(format_challenge));
    set(&mut def.challenge_rating, challenge);
    if let Some(actions) = f.objects("actions") {
        def.actions = actions
            .iter()
            .filter_map(|a| {
                Some(NpcAction::new(
                    a.string("name")?,
                    a.string("description").unwrap_or_default(),
                ))
            })
            .collect();
    }
    def
}

fn format_challenge(cr: f64) -> String {
    match cr {
        c if c == 0.125 => "1/8".to_string(),
        c if c == 0.25 => "1/4".to_string(),
        c if c == 0.5 => "1/2".to_string(),
        c => format!("{}", c.round() as i64),
    }
}

impl ContentEntry {
    fn with_name(mut self, name: String) -> Self {
        match &mut self {
            ContentEntry::Species(v) => v.name = name,
            ContentEntry::Class(v) => v.name = name,
            ContentEntry::Subclass(v) => v.name = name,
            ContentEntry::Background(v) => v.name = name,
            ContentEntry::Item(v) => v.name = name,
            ContentEntry::Spell(v) => v.name = name,
            ContentEntry::Npc(v) => v.name = name,
        }
        self
    }
}
