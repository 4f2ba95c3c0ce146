//! D&D 5e character creation and campaign management.
//!
//! This crate provides:
//! - Character sheets with a pure derived-stats pipeline ([`recompute`])
//! - Equip rules for armor, shields and hands
//! - Built-in SRD catalogs plus user-authored content
//! - A single data store mutated through [`reduce`]
//! - JSON export/import, a combat tracker, and AI-drafted content
//!
//! # Quick Start
//!
//! ```ignore
//! use heroforge_core::{reduce, Action, Catalog, CharacterBuilder, HeroForgeData};
//! use heroforge_core::character::{Ability, Skill};
//!
//! let mut data = HeroForgeData::default();
//! let sheet = CharacterBuilder::new()
//!     .name("Thorin")
//!     .species("Dwarf")
//!     .class("Fighter")
//!     .background("Soldier")
//!     .standard_array([
//!         (15, Ability::Strength),
//!         (14, Ability::Constitution),
//!         (13, Ability::Dexterity),
//!         (12, Ability::Wisdom),
//!         (10, Ability::Charisma),
//!         (8, Ability::Intelligence),
//!     ])
//!     .skills(vec![Skill::Athletics, Skill::Perception])
//!     .build(&Catalog::new(&data))?;
//!
//! reduce(&mut data, Action::AddCharacter(Box::new(sheet)))?;
//! let json = heroforge_core::persist::export_json(&data)?;
//! ```

pub mod attack_parse;
pub mod bestiary;
pub mod character;
pub mod character_builder;
pub mod class_data;
pub mod combat;
pub mod config;
pub mod content;
pub mod derive;
pub mod dice;
pub mod draft;
pub mod equipment;
pub mod items;
pub mod persist;
pub mod spells;
pub mod store;
pub mod testing;

// Primary public API
pub use character::{CharacterId, CharacterSheet, ContentId, EntryId};
pub use character_builder::{AbilityMethod, BuilderError, CharacterBuilder};
pub use combat::{CombatTracker, Initiative};
pub use config::HeroForgeConfig;
pub use content::{Catalog, ContentKind, ContentManager};
pub use derive::recompute;
pub use dice::{DiceError, DiceSpec};
pub use draft::{DraftError, TextModel};
pub use equipment::EquipError;
pub use persist::PersistError;
pub use store::{reduce, Action, ContentEntry, Effect, HeroForgeData, StoreError};
