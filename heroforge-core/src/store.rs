//! The data store and its reducer.
//!
//! All state lives in one [`HeroForgeData`]. Changes go through
//! [`reduce`], which applies an [`Action`] and returns the [`Effect`]s it
//! produced. A failed action returns an error and leaves the data untouched:
//! character edits work on a copy of the sheet that is only written back
//! after the edit and the following [`recompute`] succeed.

use crate::bestiary::NpcDef;
use crate::character::{
    Ability, CharacterId, CharacterSheet, ContentId, EntryId, InventoryEntry, ItemSource,
};
use crate::content::{BackgroundDef, CatalogEntry, ClassDef, ContentKind, SpeciesDef, SubclassDef};
use crate::derive::recompute;
use crate::equipment::{self, EquipError};
use crate::items::Item;
use crate::spells::SpellDef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version written into new data files.
pub const DATA_VERSION: u32 = 1;

// ============================================================================
// Data
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
}

/// Everything HeroForge persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroForgeData {
    pub version: u32,
    pub characters: Vec<CharacterSheet>,
    pub custom_species: Vec<SpeciesDef>,
    pub custom_classes: Vec<ClassDef>,
    pub custom_subclasses: Vec<SubclassDef>,
    pub custom_backgrounds: Vec<BackgroundDef>,
    pub custom_items: Vec<Item>,
    pub custom_spells: Vec<SpellDef>,
    pub custom_npcs: Vec<NpcDef>,
    pub settings: Settings,
}

impl Default for HeroForgeData {
    fn default() -> Self {
        Self {
            version: DATA_VERSION,
            characters: Vec::new(),
            custom_species: Vec::new(),
            custom_classes: Vec::new(),
            custom_subclasses: Vec::new(),
            custom_backgrounds: Vec::new(),
            custom_items: Vec::new(),
            custom_spells: Vec::new(),
            custom_npcs: Vec::new(),
            settings: Settings::default(),
        }
    }
}

fn contains_id<T: CatalogEntry>(entries: &[T], id: ContentId) -> bool {
    entries.iter().any(|e| e.id() == id)
}

fn remove_id<T: CatalogEntry>(entries: &mut Vec<T>, id: ContentId) -> bool {
    let before = entries.len();
    entries.retain(|e| e.id() != id);
    entries.len() != before
}

impl HeroForgeData {
    pub fn character(&self, id: CharacterId) -> Option<&CharacterSheet> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Find a character by id, or by name ignoring case.
    pub fn find_character(&self, key: &str) -> Option<&CharacterSheet> {
        let key = key.trim();
        match key.parse::<CharacterId>() {
            Ok(id) => self.character(id),
            Err(_) => self
                .characters
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(key)),
        }
    }

    /// Whether a custom entry of this kind and id exists.
    pub fn has_custom(&self, kind: ContentKind, id: ContentId) -> bool {
        match kind {
            ContentKind::Species => contains_id(&self.custom_species, id),
            ContentKind::Class => contains_id(&self.custom_classes, id),
            ContentKind::Subclass => contains_id(&self.custom_subclasses, id),
            ContentKind::Background => contains_id(&self.custom_backgrounds, id),
            ContentKind::Item => contains_id(&self.custom_items, id),
            ContentKind::Spell => contains_id(&self.custom_spells, id),
            ContentKind::Npc => contains_id(&self.custom_npcs, id),
        }
    }

    /// All custom entries of one kind.
    pub fn custom_entries(&self, kind: ContentKind) -> Vec<ContentEntry> {
        fn wrap<T: Clone>(entries: &[T], f: fn(T) -> ContentEntry) -> Vec<ContentEntry> {
            entries.iter().cloned().map(f).collect()
        }
        match kind {
            ContentKind::Species => wrap(&self.custom_species, ContentEntry::Species),
            ContentKind::Class => wrap(&self.custom_classes, ContentEntry::Class),
            ContentKind::Subclass => wrap(&self.custom_subclasses, ContentEntry::Subclass),
            ContentKind::Background => wrap(&self.custom_backgrounds, ContentEntry::Background),
            ContentKind::Item => wrap(&self.custom_items, ContentEntry::Item),
            ContentKind::Spell => wrap(&self.custom_spells, ContentEntry::Spell),
            ContentKind::Npc => wrap(&self.custom_npcs, ContentEntry::Npc),
        }
    }

    /// A custom entry by name, ignoring case.
    pub fn find_custom(&self, kind: ContentKind, name: &str) -> Option<ContentEntry> {
        let name = name.trim();
        self.custom_entries(kind)
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    fn remove_custom(&mut self, kind: ContentKind, id: ContentId) -> bool {
        match kind {
            ContentKind::Species => remove_id(&mut self.custom_species, id),
            ContentKind::Class => remove_id(&mut self.custom_classes, id),
            ContentKind::Subclass => remove_id(&mut self.custom_subclasses, id),
            ContentKind::Background => remove_id(&mut self.custom_backgrounds, id),
            ContentKind::Item => remove_id(&mut self.custom_items, id),
            ContentKind::Spell => remove_id(&mut self.custom_spells, id),
            ContentKind::Npc => remove_id(&mut self.custom_npcs, id),
        }
    }

    fn upsert(&mut self, entry: ContentEntry) {
        fn put<T: CatalogEntry>(entries: &mut Vec<T>, value: T) {
            match entries.iter_mut().find(|e| e.id() == value.id()) {
                Some(existing) => *existing = value,
                None => entries.push(value),
            }
        }
        match entry {
            ContentEntry::Species(v) => put(&mut self.custom_species, v),
            ContentEntry::Class(v) => put(&mut self.custom_classes, v),
            ContentEntry::Subclass(v) => put(&mut self.custom_subclasses, v),
            ContentEntry::Background(v) => put(&mut self.custom_backgrounds, v),
            ContentEntry::Item(v) => put(&mut self.custom_items, v),
            ContentEntry::Spell(v) => put(&mut self.custom_spells, v),
            ContentEntry::Npc(v) => put(&mut self.custom_npcs, v),
        }
    }
}

/// One custom content entry of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "lowercase")]
pub enum ContentEntry {
    Species(SpeciesDef),
    Class(ClassDef),
    Subclass(SubclassDef),
    Background(BackgroundDef),
    Item(Item),
    Spell(SpellDef),
    Npc(NpcDef),
}

impl ContentEntry {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentEntry::Species(_) => SpeciesDef::KIND,
            ContentEntry::Class(_) => ClassDef::KIND,
            ContentEntry::Subclass(_) => SubclassDef::KIND,
            ContentEntry::Background(_) => BackgroundDef::KIND,
            ContentEntry::Item(_) => Item::KIND,
            ContentEntry::Spell(_) => SpellDef::KIND,
            ContentEntry::Npc(_) => NpcDef::KIND,
        }
    }

    pub fn id(&self) -> ContentId {
        match self {
            ContentEntry::Species(v) => v.id,
            ContentEntry::Class(v) => v.id,
            ContentEntry::Subclass(v) => v.id,
            ContentEntry::Background(v) => v.id,
            ContentEntry::Item(v) => v.id,
            ContentEntry::Spell(v) => v.id,
            ContentEntry::Npc(v) => v.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ContentEntry::Species(v) => &v.name,
            ContentEntry::Class(v) => &v.name,
            ContentEntry::Subclass(v) => &v.name,
            ContentEntry::Background(v) => &v.name,
            ContentEntry::Item(v) => &v.name,
            ContentEntry::Spell(v) => &v.name,
            ContentEntry::Npc(v) => &v.name,
        }
    }
}

// ============================================================================
// Actions and effects
// ============================================================================

/// Every change the store accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    AddCharacter(Box<CharacterSheet>),
    UpdateCharacter(Box<CharacterSheet>),
    DeleteCharacter(CharacterId),
    SetAbilityScore {
        id: CharacterId,
        ability: Ability,
        score: u8,
    },
    SetLevel {
        id: CharacterId,
        level: u8,
    },
    Damage {
        id: CharacterId,
        amount: i32,
    },
    Heal {
        id: CharacterId,
        amount: i32,
    },
    SetTempHp {
        id: CharacterId,
        amount: i32,
    },
    SetNotes {
        id: CharacterId,
        notes: String,
    },
    AddItem {
        id: CharacterId,
        item: Box<Item>,
        quantity: u32,
        source: ItemSource,
    },
    /// Remove `quantity` of an entry, or the whole entry when `None`.
    RemoveItem {
        id: CharacterId,
        entry: EntryId,
        quantity: Option<u32>,
    },
    EquipItem {
        id: CharacterId,
        entry: EntryId,
    },
    UnequipItem {
        id: CharacterId,
        entry: EntryId,
    },
    UseSpellSlot {
        id: CharacterId,
        level: u8,
    },
    LongRest(CharacterId),
    AddContent(ContentEntry),
    ReplaceContent(ContentEntry),
    DeleteContent {
        kind: ContentKind,
        id: ContentId,
    },
    ToggleTheme,
    ReplaceAll(Box<HeroForgeData>),
}

/// What an action did, for callers that report or react to changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    CharacterSaved(CharacterId),
    CharacterDeleted(CharacterId),
    HpChanged {
        id: CharacterId,
        current: i32,
        maximum: i32,
        dropped_to_zero: bool,
    },
    ItemAdded {
        id: CharacterId,
        entry: EntryId,
    },
    ItemRemoved {
        id: CharacterId,
        entry: EntryId,
    },
    Unequipped {
        id: CharacterId,
        entries: Vec<EntryId>,
    },
    SlotUsed {
        id: CharacterId,
        level: u8,
        remaining: u8,
    },
    ContentSaved {
        kind: ContentKind,
        id: ContentId,
    },
    ContentDeleted {
        kind: ContentKind,
        id: ContentId,
    },
    ThemeChanged(Theme),
    DataReplaced,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("a character with id {0} already exists")]
    DuplicateCharacter(CharacterId),

    #[error("inventory entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("no custom {0} with id {1}")]
    ContentNotFound(ContentKind, ContentId),

    #[error("a custom {0} with id {1} already exists")]
    DuplicateContent(ContentKind, ContentId),

    #[error("ability score {0} is out of range (1-30)")]
    InvalidScore(u8),

    #[error("level {0} is out of range (1-20)")]
    InvalidLevel(u8),

    #[error("{0} has no spellcasting")]
    NotASpellcaster(String),

    #[error("no level {0} spell slots remaining")]
    NoSlotRemaining(u8),

    #[error(transparent)]
    Equip(#[from] EquipError),
}

// ============================================================================
// Reducer
// ============================================================================

/// Apply an action to the data.
pub fn reduce(data: &mut HeroForgeData, action: Action) -> Result<Vec<Effect>, StoreError> {
    tracing::debug!(?action, "reduce");
    match action {
        Action::AddCharacter(sheet) => {
            if data.character(sheet.id).is_some() {
                return Err(StoreError::DuplicateCharacter(sheet.id));
            }
            let sheet = recompute(&sheet);
            let id = sheet.id;
            data.characters.push(sheet);
            Ok(vec![Effect::CharacterSaved(id)])
        }
        Action::UpdateCharacter(sheet) => {
            let id = sheet.id;
            let slot = data
                .characters
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(StoreError::CharacterNotFound(id))?;
            *slot = recompute(&sheet);
            Ok(vec![Effect::CharacterSaved(id)])
        }
        Action::DeleteCharacter(id) => {
            let before = data.characters.len();
            data.characters.retain(|c| c.id != id);
            if data.characters.len() == before {
                return Err(StoreError::CharacterNotFound(id));
            }
            Ok(vec![Effect::CharacterDeleted(id)])
        }
        Action::SetAbilityScore { id, ability, score } => {
            if !(1..=30).contains(&score) {
                return Err(StoreError::InvalidScore(score));
            }
            edit_character(data, id, |sheet| {
                sheet.ability_scores.set(ability, score);
                Ok(Vec::new())
            })
        }
        Action::SetLevel { id, level } => {
            if !(1..=20).contains(&level) {
                return Err(StoreError::InvalidLevel(level));
            }
            edit_character(data, id, |sheet| {
                sheet.level = level;
                Ok(Vec::new())
            })
        }
        Action::Damage { id, amount } => edit_character(data, id, |sheet| {
            let dropped_to_zero = sheet.hit_points.take_damage(amount);
            Ok(vec![hp_changed(sheet, dropped_to_zero)])
        }),
        Action::Heal { id, amount } => edit_character(data, id, |sheet| {
            sheet.hit_points.heal(amount);
            Ok(vec![hp_changed(sheet, false)])
        }),
        Action::SetTempHp { id, amount } => edit_character(data, id, |sheet| {
            sheet.hit_points.temporary = amount.max(0);
            Ok(vec![hp_changed(sheet, false)])
        }),
        Action::SetNotes { id, notes } => edit_character(data, id, |sheet| {
            sheet.notes = notes;
            Ok(Vec::new())
        }),
        Action::AddItem {
            id,
            item,
            quantity,
            source,
        } => edit_character(data, id, |sheet| {
            let entry = InventoryEntry::new(*item, quantity, source);
            let entry_id = entry.id;
            sheet.inventory.push(entry);
            Ok(vec![Effect::ItemAdded { id, entry: entry_id }])
        }),
        Action::RemoveItem {
            id,
            entry,
            quantity,
        } => edit_character(data, id, |sheet| {
            let held = sheet
                .entry_mut(entry)
                .ok_or(StoreError::EntryNotFound(entry))?;
            match quantity {
                Some(n) if n < held.quantity => {
                    held.quantity -= n;
                    Ok(Vec::new())
                }
                _ => {
                    sheet.inventory.retain(|e| e.id != entry);
                    Ok(vec![Effect::ItemRemoved { id, entry }])
                }
            }
        }),
        Action::EquipItem { id, entry } => edit_character(data, id, |sheet| {
            let entries = equipment::equip(sheet, entry)?;
            if entries.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![Effect::Unequipped { id, entries }])
            }
        }),
        Action::UnequipItem { id, entry } => edit_character(data, id, |sheet| {
            equipment::unequip(sheet, entry)?;
            Ok(Vec::new())
        }),
        Action::UseSpellSlot { id, level } => edit_character(data, id, |sheet| {
            let name = sheet.name.clone();
            let casting = sheet
                .spellcasting
                .as_mut()
                .ok_or(StoreError::NotASpellcaster(name))?;
            if !casting.use_slot(level) {
                return Err(StoreError::NoSlotRemaining(level));
            }
            let remaining = casting.slots.get(&level).map(|s| s.available()).unwrap_or(0);
            Ok(vec![Effect::SlotUsed {
                id,
                level,
                remaining,
            }])
        }),
        Action::LongRest(id) => edit_character(data, id, |sheet| {
            sheet.hit_points.current = sheet.hit_points.maximum;
            sheet.hit_points.temporary = 0;
            if let Some(casting) = sheet.spellcasting.as_mut() {
                casting.recover_all();
            }
            Ok(vec![hp_changed(sheet, false)])
        }),
        Action::AddContent(entry) => {
            let (kind, id) = (entry.kind(), entry.id());
            if data.has_custom(kind, id) {
                return Err(StoreError::DuplicateContent(kind, id));
            }
            data.upsert(entry);
            Ok(vec![Effect::ContentSaved { kind, id }])
        }
        Action::ReplaceContent(entry) => {
            let (kind, id) = (entry.kind(), entry.id());
            if !data.has_custom(kind, id) {
                return Err(StoreError::ContentNotFound(kind, id));
            }
            data.upsert(entry);
            Ok(vec![Effect::ContentSaved { kind, id }])
        }
        Action::DeleteContent { kind, id } => {
            if !data.remove_custom(kind, id) {
                return Err(StoreError::ContentNotFound(kind, id));
            }
            Ok(vec![Effect::ContentDeleted { kind, id }])
        }
        Action::ToggleTheme => {
            data.settings.theme = data.settings.theme.toggled();
            Ok(vec![Effect::ThemeChanged(data.settings.theme)])
        }
        Action::ReplaceAll(replacement) => {
            *data = *replacement;
            data.characters = data.characters.iter().map(recompute).collect();
            Ok(vec![Effect::DataReplaced])
        }
    }
}

/// Run `edit` on a copy of a character, recompute, and write it back.
fn edit_character<F>(
    data: &mut HeroForgeData,
    id: CharacterId,
    edit: F,
) -> Result<Vec<Effect>, StoreError>
where
    F: FnOnce(&mut CharacterSheet) -> Result<Vec<Effect>, StoreError>,
{
    let slot = data
        .characters
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(StoreError::CharacterNotFound(id))?;

    let mut sheet = slot.clone();
    let mut effects = edit(&mut sheet)?;
    *slot = recompute(&sheet);
    effects.push(Effect::CharacterSaved(id));
    Ok(effects)
}

fn hp_changed(sheet: &CharacterSheet, dropped_to_zero: bool) -> Effect {
    Effect::HpChanged {
        id: sheet.id,
        current: sheet.hit_points.current,
        maximum: sheet.hit_points.maximum,
        dropped_to_zero,
    }
}
