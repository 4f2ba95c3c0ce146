//! Testing utilities.
//!
//! - `sample_fighter` / `sample_wizard` build ready-made characters from the
//!   built-in catalog
//! - `MockModel` stands in for the AI model with scripted replies

use crate::character::{Ability, CharacterSheet, Skill};
use crate::character_builder::CharacterBuilder;
use crate::content::Catalog;
use crate::draft::{DraftError, TextModel};
use crate::store::HeroForgeData;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A level 1 dwarf fighter in chain mail with longsword and shield.
pub fn sample_fighter(name: &str) -> CharacterSheet {
    let data = HeroForgeData::default();
    CharacterBuilder::new()
        .name(name)
        .species("Dwarf")
        .class("Fighter")
        .background("Soldier")
        .standard_array([
            (15, Ability::Strength),
            (14, Ability::Constitution),
            (13, Ability::Dexterity),
            (12, Ability::Wisdom),
            (10, Ability::Charisma),
            (8, Ability::Intelligence),
        ])
        .skills(vec![Skill::Perception, Skill::Survival])
        .build(&Catalog::new(&data))
        .expect("sample fighter should build")
}

/// A level 1 elf wizard with a couple of spells.
pub fn sample_wizard(name: &str) -> CharacterSheet {
    let data = HeroForgeData::default();
    CharacterBuilder::new()
        .name(name)
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
        .skills(vec![Skill::Investigation, Skill::Insight])
        .cantrips(vec!["Fire Bolt".to_string()])
        .spells(vec!["Magic Missile".to_string(), "Shield".to_string()])
        .build(&Catalog::new(&data))
        .expect("sample wizard should build")
}

/// A model that returns scripted replies in order and records every call.
pub struct MockModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockModel {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A model whose first call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(message.to_string())])),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue another reply.
    pub fn push_reply(&self, reply: &str) {
        self.lock_replies().push_back(Ok(reply.to_string()));
    }

    /// Every `(system, prompt)` pair received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.replies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, DraftError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((system.to_string(), prompt.to_string()));
        }
        match self.lock_replies().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(DraftError::Model(message)),
            None => Err(DraftError::Model("no scripted replies left".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_characters() {
        let fighter = sample_fighter("Brom");
        assert_eq!(fighter.modifier(Ability::Dexterity), 1);
        // Chain mail 16 + shield 2
        assert_eq!(fighter.armor_class, 18);

        let wizard = sample_wizard("Mira");
        assert!(wizard.spellcasting.is_some());
        assert_eq!(wizard.modifier(Ability::Dexterity), 3);
    }

    #[tokio::test]
    async fn test_mock_model_replays_in_order() {
        let model = MockModel::new(vec!["one"]);
        model.push_reply("two");
        assert_eq!(model.complete("s", "a").await.unwrap(), "one");
        assert_eq!(model.complete("s", "b").await.unwrap(), "two");
        assert!(model.complete("s", "c").await.is_err());
        assert_eq!(model.calls().len(), 3);
    }
}
