//! Item model and the standard D&D 5e item catalog.
//!
//! Items are shared between the built-in catalog, custom content and
//! character inventories. Weapon and armor details live in `ItemKind` so the
//! equip rules and AC derivation can match on them directly.

use crate::character::ContentId;
use serde::{Deserialize, Serialize};

/// Damage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Acid,
    Bludgeoning,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Piercing,
    Poison,
    Psychic,
    Radiant,
    Slashing,
    Thunder,
}

impl DamageType {
    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Acid => "acid",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Cold => "cold",
            DamageType::Fire => "fire",
            DamageType::Force => "force",
            DamageType::Lightning => "lightning",
            DamageType::Necrotic => "necrotic",
            DamageType::Piercing => "piercing",
            DamageType::Poison => "poison",
            DamageType::Psychic => "psychic",
            DamageType::Radiant => "radiant",
            DamageType::Slashing => "slashing",
            DamageType::Thunder => "thunder",
        }
    }

    pub fn all() -> [DamageType; 13] {
        [
            DamageType::Acid,
            DamageType::Bludgeoning,
            DamageType::Cold,
            DamageType::Fire,
            DamageType::Force,
            DamageType::Lightning,
            DamageType::Necrotic,
            DamageType::Piercing,
            DamageType::Poison,
            DamageType::Psychic,
            DamageType::Radiant,
            DamageType::Slashing,
            DamageType::Thunder,
        ]
    }

    pub fn from_name(name: &str) -> Option<DamageType> {
        let name = name.trim();
        DamageType::all()
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

/// Body armor weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorType {
    Light,
    Medium,
    Heavy,
}

impl ArmorType {
    pub fn from_name(name: &str) -> Option<ArmorType> {
        match name.trim().to_lowercase().as_str() {
            "light" => Some(ArmorType::Light),
            "medium" => Some(ArmorType::Medium),
            "heavy" => Some(ArmorType::Heavy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeaponCategory {
    #[default]
    Simple,
    Martial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponProperty {
    Ammunition,
    Finesse,
    Heavy,
    Light,
    Loading,
    Reach,
    Thrown,
    TwoHanded,
    Versatile(String),
}

impl WeaponProperty {
    /// Parse a property name; versatile damage defaults to one die step up.
    pub fn from_name(name: &str) -> Option<WeaponProperty> {
        let lower = name.trim().to_lowercase().replace(['-', '_'], " ");
        let property = match lower.as_str() {
            "ammunition" => WeaponProperty::Ammunition,
            "finesse" => WeaponProperty::Finesse,
            "heavy" => WeaponProperty::Heavy,
            "light" => WeaponProperty::Light,
            "loading" => WeaponProperty::Loading,
            "reach" => WeaponProperty::Reach,
            "thrown" => WeaponProperty::Thrown,
            "two handed" | "twohanded" => WeaponProperty::TwoHanded,
            other => {
                let dice = other.strip_prefix("versatile")?.trim();
                let dice = dice.trim_start_matches('(').trim_end_matches(')').trim();
                WeaponProperty::Versatile(dice.to_string())
            }
        };
        Some(property)
    }
}

/// Weapon range in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRange {
    pub normal: u32,
    pub long: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponProfile {
    pub damage_dice: String,
    pub damage_type: DamageType,
    #[serde(default)]
    pub category: WeaponCategory,
    #[serde(default)]
    pub properties: Vec<WeaponProperty>,
    #[serde(default)]
    pub range: Option<WeaponRange>,
}

impl WeaponProfile {
    pub fn has(&self, property: &WeaponProperty) -> bool {
        self.properties.contains(property)
    }

    pub fn is_two_handed(&self) -> bool {
        self.has(&WeaponProperty::TwoHanded)
    }

    pub fn is_light(&self) -> bool {
        self.has(&WeaponProperty::Light)
    }

    pub fn is_finesse(&self) -> bool {
        self.has(&WeaponProperty::Finesse)
    }

    pub fn versatile_damage(&self) -> Option<&str> {
        self.properties.iter().find_map(|p| match p {
            WeaponProperty::Versatile(dice) => Some(dice.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorProfile {
    pub armor_type: ArmorType,
    pub base_ac: i32,
    #[serde(default = "default_true")]
    pub add_dex_modifier: bool,
    #[serde(default)]
    pub max_dex_bonus: Option<i8>,
    #[serde(default)]
    pub strength_requirement: Option<u8>,
    #[serde(default)]
    pub stealth_disadvantage: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldProfile {
    pub ac_bonus: i32,
}

impl Default for ShieldProfile {
    fn default() -> Self {
        Self { ac_bonus: 2 }
    }
}

/// What an item is, with the mechanics each kind needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    Weapon(WeaponProfile),
    Armor(ArmorProfile),
    Shield(ShieldProfile),
    Gear,
    Tool,
    Consumable,
    Wondrous,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Weapon(_) => "weapon",
            ItemKind::Armor(_) => "armor",
            ItemKind::Shield(_) => "shield",
            ItemKind::Gear => "gear",
            ItemKind::Tool => "tool",
            ItemKind::Consumable => "consumable",
            ItemKind::Wondrous => "wondrous",
        }
    }
}

/// An item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ContentId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub value_gp: f64,
    #[serde(default)]
    pub magical: bool,
    pub kind: ItemKind,
}

impl Item {
    /// A built-in item with a stable id.
    pub fn standard(name: impl Into<String>, kind: ItemKind) -> Self {
        let name = name.into();
        Self {
            id: ContentId::builtin("item", &name),
            name,
            description: None,
            weight: 0.0,
            value_gp: 0.0,
            magical: false,
            kind,
        }
    }

    /// A custom item with a fresh id.
    pub fn custom(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ContentId::new(),
            ..Self::standard(name, kind)
        }
    }

    pub fn weapon(
        name: impl Into<String>,
        damage_dice: impl Into<String>,
        damage_type: DamageType,
    ) -> Self {
        Self::standard(
            name,
            ItemKind::Weapon(WeaponProfile {
                damage_dice: damage_dice.into(),
                damage_type,
                category: WeaponCategory::Simple,
                properties: Vec::new(),
                range: None,
            }),
        )
    }

    pub fn armor(name: impl Into<String>, armor_type: ArmorType, base_ac: i32) -> Self {
        let max_dex_bonus = match armor_type {
            ArmorType::Medium => Some(2),
            ArmorType::Light | ArmorType::Heavy => None,
        };
        Self::standard(
            name,
            ItemKind::Armor(ArmorProfile {
                armor_type,
                base_ac,
                add_dex_modifier: armor_type != ArmorType::Heavy,
                max_dex_bonus,
                strength_requirement: None,
                stealth_disadvantage: false,
            }),
        )
    }

    pub fn gear(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::standard(name, ItemKind::Gear).with_description(description)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_value(mut self, value_gp: f64) -> Self {
        self.value_gp = value_gp;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn martial(mut self) -> Self {
        if let ItemKind::Weapon(weapon) = &mut self.kind {
            weapon.category = WeaponCategory::Martial;
        }
        self
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        if let ItemKind::Weapon(weapon) = &mut self.kind {
            weapon.properties = properties;
        }
        self
    }

    pub fn with_range(mut self, normal: u32, long: u32) -> Self {
        if let ItemKind::Weapon(weapon) = &mut self.kind {
            weapon.range = Some(WeaponRange { normal, long });
        }
        self
    }

    pub fn with_strength_requirement(mut self, strength: u8) -> Self {
        if let ItemKind::Armor(armor) = &mut self.kind {
            armor.strength_requirement = Some(strength);
        }
        self
    }

    pub fn with_stealth_disadvantage(mut self) -> Self {
        if let ItemKind::Armor(armor) = &mut self.kind {
            armor.stealth_disadvantage = true;
        }
        self
    }

    pub fn weapon_profile(&self) -> Option<&WeaponProfile> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn armor_profile(&self) -> Option<&ArmorProfile> {
        match &self.kind {
            ItemKind::Armor(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon(_))
    }

    pub fn is_body_armor(&self) -> bool {
        matches!(self.kind, ItemKind::Armor(_))
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.kind, ItemKind::Shield(_))
    }

    pub fn is_two_handed(&self) -> bool {
        self.weapon_profile().is_some_and(|w| w.is_two_handed())
    }

    pub fn is_light_weapon(&self) -> bool {
        self.weapon_profile()
            .is_some_and(|w| w.is_light() && !w.is_two_handed())
    }

    /// Consumables are used, not worn or wielded.
    pub fn is_equippable(&self) -> bool {
        !matches!(self.kind, ItemKind::Consumable)
    }
}

/// Find a standard item by name, ignoring case.
pub fn find_item(name: &str) -> Option<Item> {
    WEAPONS
        .iter()
        .chain(ARMORS.iter())
        .chain(GEAR.iter())
        .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
}

/// Every standard item.
pub fn all_items() -> impl Iterator<Item = &'static Item> {
    WEAPONS.iter().chain(ARMORS.iter()).chain(GEAR.iter())
}

// ============================================================================
// Standard catalog
// ============================================================================

lazy_static::lazy_static! {
    /// Standard weapons.
    pub static ref WEAPONS: Vec<Item> = {
        use DamageType::*;
        use WeaponProperty::*;
        vec![
            // Simple melee
            Item::weapon("Club", "1d4", Bludgeoning).with_weight(2.0).with_value(0.1)
                .with_properties(vec![Light]),
            Item::weapon("Dagger", "1d4", Piercing).with_weight(1.0).with_value(2.0)
                .with_properties(vec![Finesse, Light, Thrown]).with_range(20, 60),
            Item::weapon("Greatclub", "1d8", Bludgeoning).with_weight(10.0).with_value(0.2)
                .with_properties(vec![TwoHanded]),
            Item::weapon("Handaxe", "1d6", Slashing).with_weight(2.0).with_value(5.0)
                .with_properties(vec![Light, Thrown]).with_range(20, 60),
            Item::weapon("Javelin", "1d6", Piercing).with_weight(2.0).with_value(0.5)
                .with_properties(vec![Thrown]).with_range(30, 120),
            Item::weapon("Light Hammer", "1d4", Bludgeoning).with_weight(2.0).with_value(2.0)
                .with_properties(vec![Light, Thrown]).with_range(20, 60),
            Item::weapon("Mace", "1d6", Bludgeoning).with_weight(4.0).with_value(5.0),
            Item::weapon("Quarterstaff", "1d6", Bludgeoning).with_weight(4.0).with_value(0.2)
                .with_properties(vec![Versatile("1d8".to_string())]),
            Item::weapon("Sickle", "1d4", Slashing).with_weight(2.0).with_value(1.0)
                .with_properties(vec![Light]),
            Item::weapon("Spear", "1d6", Piercing).with_weight(3.0).with_value(1.0)
                .with_properties(vec![Thrown, Versatile("1d8".to_string())]).with_range(20, 60),

            // Martial melee
            Item::weapon("Battleaxe", "1d8", Slashing).martial().with_weight(4.0).with_value(10.0)
                .with_properties(vec![Versatile("1d10".to_string())]),
            Item::weapon("Glaive", "1d10", Slashing).martial().with_weight(6.0).with_value(20.0)
                .with_properties(vec![Heavy, Reach, TwoHanded]),
            Item::weapon("Greataxe", "1d12", Slashing).martial().with_weight(7.0).with_value(30.0)
                .with_properties(vec![Heavy, TwoHanded]),
            Item::weapon("Greatsword", "2d6", Slashing).martial().with_weight(6.0).with_value(50.0)
                .with_properties(vec![Heavy, TwoHanded]),
            Item::weapon("Longsword", "1d8", Slashing).martial().with_weight(3.0).with_value(15.0)
                .with_properties(vec![Versatile("1d10".to_string())]),
            Item::weapon("Maul", "2d6", Bludgeoning).martial().with_weight(10.0).with_value(10.0)
                .with_properties(vec![Heavy, TwoHanded]),
            Item::weapon("Rapier", "1d8", Piercing).martial().with_weight(2.0).with_value(25.0)
                .with_properties(vec![Finesse]),
            Item::weapon("Scimitar", "1d6", Slashing).martial().with_weight(3.0).with_value(25.0)
                .with_properties(vec![Finesse, Light]),
            Item::weapon("Shortsword", "1d6", Piercing).martial().with_weight(2.0).with_value(10.0)
                .with_properties(vec![Finesse, Light]),
            Item::weapon("Warhammer", "1d8", Bludgeoning).martial().with_weight(2.0).with_value(15.0)
                .with_properties(vec![Versatile("1d10".to_string())]),

            // Ranged
            Item::weapon("Light Crossbow", "1d8", Piercing).with_weight(5.0).with_value(25.0)
                .with_properties(vec![Ammunition, Loading, TwoHanded]).with_range(80, 320),
            Item::weapon("Shortbow", "1d6", Piercing).with_weight(2.0).with_value(25.0)
                .with_properties(vec![Ammunition, TwoHanded]).with_range(80, 320),
            Item::weapon("Hand Crossbow", "1d6", Piercing).martial().with_weight(3.0).with_value(75.0)
                .with_properties(vec![Ammunition, Light, Loading]).with_range(30, 120),
            Item::weapon("Longbow", "1d8", Piercing).martial().with_weight(2.0).with_value(50.0)
                .with_properties(vec![Ammunition, Heavy, TwoHanded]).with_range(150, 600),
        ]
    };

    /// Standard body armor and the shield.
    pub static ref ARMORS: Vec<Item> = vec![
        Item::armor("Padded Armor", ArmorType::Light, 11).with_weight(8.0).with_value(5.0)
            .with_stealth_disadvantage(),
        Item::armor("Leather Armor", ArmorType::Light, 11).with_weight(10.0).with_value(10.0),
        Item::armor("Studded Leather", ArmorType::Light, 12).with_weight(13.0).with_value(45.0),
        Item::armor("Hide Armor", ArmorType::Medium, 12).with_weight(12.0).with_value(10.0),
        Item::armor("Chain Shirt", ArmorType::Medium, 13).with_weight(20.0).with_value(50.0),
        Item::armor("Scale Mail", ArmorType::Medium, 14).with_weight(45.0).with_value(50.0)
            .with_stealth_disadvantage(),
        Item::armor("Breastplate", ArmorType::Medium, 14).with_weight(20.0).with_value(400.0),
        Item::armor("Half Plate", ArmorType::Medium, 15).with_weight(40.0).with_value(750.0)
            .with_stealth_disadvantage(),
        Item::armor("Ring Mail", ArmorType::Heavy, 14).with_weight(40.0).with_value(30.0)
            .with_stealth_disadvantage(),
        Item::armor("Chain Mail", ArmorType::Heavy, 16).with_weight(55.0).with_value(75.0)
            .with_strength_requirement(13).with_stealth_disadvantage(),
        Item::armor("Splint Armor", ArmorType::Heavy, 17).with_weight(60.0).with_value(200.0)
            .with_strength_requirement(15).with_stealth_disadvantage(),
        Item::armor("Plate Armor", ArmorType::Heavy, 18).with_weight(65.0).with_value(1500.0)
            .with_strength_requirement(15).with_stealth_disadvantage(),
        Item::standard("Shield", ItemKind::Shield(ShieldProfile::default()))
            .with_weight(6.0).with_value(10.0)
            .with_description("A wooden or metal shield. +2 AC when equipped."),
    ];

    /// Adventuring gear, tools and consumables.
    pub static ref GEAR: Vec<Item> = vec![
        Item::gear("Backpack", "A leather pack for carrying gear.").with_weight(5.0).with_value(2.0),
        Item::gear("Bedroll", "A padded roll for sleeping outdoors.").with_weight(7.0).with_value(1.0),
        Item::gear("Rope (50 feet)", "Hemp rope, 50 feet.").with_weight(10.0).with_value(1.0),
        Item::gear("Torch", "Bright light in a 20-foot radius for 1 hour.").with_weight(1.0).with_value(0.01),
        Item::gear("Rations (1 day)", "Trail rations for one day.").with_weight(2.0).with_value(0.5),
        Item::gear("Waterskin", "Holds 4 pints of liquid.").with_weight(5.0).with_value(0.2),
        Item::gear("Holy Symbol", "A religious focus for spellcasting.").with_weight(1.0).with_value(5.0),
        Item::gear("Arcane Focus", "A crystal or orb used as a spellcasting focus.").with_weight(1.0).with_value(10.0),
        Item::gear("Component Pouch", "A small pouch of spell components.").with_weight(2.0).with_value(25.0),
        Item::gear("Spellbook", "A leather-bound tome of arcane formulae.").with_weight(3.0).with_value(50.0),
        Item::gear("Arrows (20)", "A quiver of 20 arrows.").with_weight(1.0).with_value(1.0),
        Item::gear("Bolts (20)", "A case of 20 crossbow bolts.").with_weight(1.5).with_value(1.0),
        Item::standard("Thieves' Tools", ItemKind::Tool).with_weight(1.0).with_value(25.0)
            .with_description("Required for picking locks and disarming traps."),
        Item::standard("Herbalism Kit", ItemKind::Tool).with_weight(3.0).with_value(5.0),
        Item::standard("Potion of Healing", ItemKind::Consumable).with_weight(0.5).with_value(50.0)
            .with_description("Regain 2d4 + 2 hit points."),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_item_case_insensitive() {
        let longsword = find_item("longsword").unwrap();
        let weapon = longsword.weapon_profile().unwrap();
        assert_eq!(weapon.damage_dice, "1d8");
        assert_eq!(weapon.versatile_damage(), Some("1d10"));
        assert!(find_item("Vorpal Spoon").is_none());
    }

    #[test]
    fn test_armor_defaults() {
        let plate = find_item("Plate Armor").unwrap();
        let armor = plate.armor_profile().unwrap();
        assert_eq!(armor.base_ac, 18);
        assert_eq!(armor.armor_type, ArmorType::Heavy);
        assert!(!armor.add_dex_modifier);

        let scale = find_item("Scale Mail").unwrap();
        assert_eq!(scale.armor_profile().unwrap().max_dex_bonus, Some(2));
    }

    #[test]
    fn test_hand_classification() {
        assert!(find_item("Greatsword").unwrap().is_two_handed());
        assert!(find_item("Shortsword").unwrap().is_light_weapon());
        assert!(!find_item("Longsword").unwrap().is_light_weapon());
        assert!(find_item("Shield").unwrap().is_shield());
        assert!(!find_item("Potion of Healing").unwrap().is_equippable());
    }

    #[test]
    fn test_weapon_property_from_name() {
        assert_eq!(
            WeaponProperty::from_name("Two-Handed"),
            Some(WeaponProperty::TwoHanded)
        );
        assert_eq!(
            WeaponProperty::from_name("versatile (1d10)"),
            Some(WeaponProperty::Versatile("1d10".to_string()))
        );
        assert_eq!(WeaponProperty::from_name("sparkly"), None);
    }

    #[test]
    fn test_item_kind_json_shape() {
        let plate = find_item("Plate Armor").unwrap();
        let json = serde_json::to_value(&plate).unwrap();
        assert_eq!(json["kind"]["type"], "armor");
        assert_eq!(json["kind"]["armorType"], "Heavy");
        assert_eq!(json["kind"]["addDexModifier"], false);
    }
}
