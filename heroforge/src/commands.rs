//! Command handlers. Every change goes through `reduce` and is saved
//! straight away.

use crate::render;
use crate::{
    Command, ContentCommand, DraftArgs, HpChange, ItemCommand, MethodArg, NewArgs, SlotCommand,
};
use anyhow::{anyhow, bail, Context};
use heroforge_core::attack_parse::parse_attack;
use heroforge_core::character::{Ability, AbilityScores, CharacterSheet, ItemSource, Skill};
use heroforge_core::character_builder::roll_ability_scores;
use heroforge_core::combat::CombatantId;
use heroforge_core::dice::{self, Advantage};
use heroforge_core::items::{Item, ItemKind};
use heroforge_core::{
    draft, persist, reduce, Action, Catalog, CharacterBuilder, CombatTracker, ContentKind,
    ContentManager, Effect, HeroForgeConfig, HeroForgeData, Initiative,
};
use std::io::{self, BufRead, Write};

pub(crate) struct App {
    config: HeroForgeConfig,
    data: HeroForgeData,
}

impl App {
    pub(crate) async fn open(config: HeroForgeConfig) -> anyhow::Result<Self> {
        let data = persist::load_or_default(&config.data_path)
            .await
            .with_context(|| format!("loading {}", config.data_path.display()))?;
        tracing::debug!(path = %config.data_path.display(), characters = data.characters.len(), "data loaded");
        Ok(Self { config, data })
    }

    /// Apply an action, save, and print what changed.
    async fn apply(&mut self, action: Action) -> anyhow::Result<Vec<Effect>> {
        let effects = reduce(&mut self.data, action)?;
        persist::save(&self.data, &self.config.data_path)
            .await
            .with_context(|| format!("saving {}", self.config.data_path.display()))?;
        for effect in &effects {
            println!("{}", render::effect(effect, &self.data));
        }
        Ok(effects)
    }

    fn character(&self, key: &str) -> anyhow::Result<&CharacterSheet> {
        self.data
            .find_character(key)
            .ok_or_else(|| anyhow!("no character named '{key}'"))
    }

    pub(crate) async fn run(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::New(args) => self.new_character(args).await,
            Command::List => {
                if self.data.characters.is_empty() {
                    println!("No characters yet. Create one with `heroforge new`.");
                }
                for sheet in &self.data.characters {
                    println!("{}", render::summary(sheet));
                }
                Ok(())
            }
            Command::Sheet { character } => {
                print!("{}", render::sheet(self.character(&character)?));
                Ok(())
            }
            Command::Delete { character } => {
                let id = self.character(&character)?.id;
                self.apply(Action::DeleteCharacter(id)).await.map(drop)
            }
            Command::Roll { notation, adv, dis } => {
                let advantage = match (adv, dis) {
                    (true, _) => Advantage::Advantage,
                    (_, true) => Advantage::Disadvantage,
                    _ => Advantage::Normal,
                };
                let result = dice::roll_with_advantage(&notation, advantage)?;
                println!("{notation}: {result}");
                if result.natural_20 {
                    println!("Natural 20!");
                } else if result.natural_1 {
                    println!("Natural 1.");
                }
                Ok(())
            }
            Command::Hp { character, change } => {
                let id = self.character(&character)?.id;
                let action = match change {
                    HpChange::Damage { amount } => Action::Damage { id, amount },
                    HpChange::Heal { amount } => Action::Heal { id, amount },
                    HpChange::Temp { amount } => Action::SetTempHp { id, amount },
                };
                self.apply(action).await.map(drop)
            }
            Command::Level { character, level } => {
                let id = self.character(&character)?.id;
                self.apply(Action::SetLevel { id, level }).await.map(drop)
            }
            Command::Score {
                character,
                ability,
                score,
            } => {
                let id = self.character(&character)?.id;
                self.apply(Action::SetAbilityScore { id, ability, score })
                    .await
                    .map(drop)
            }
            Command::Notes { character, text } => {
                let id = self.character(&character)?.id;
                self.apply(Action::SetNotes { id, notes: text }).await.map(drop)
            }
            Command::Item(command) => self.item(command).await,
            Command::Slot(command) => self.slot(command).await,
            Command::Content(command) => self.content(command).await,
            Command::Attack { text } => {
                match parse_attack(&text) {
                    Some(attack) => print!("{}", render::attack(&attack)),
                    None => println!("No attack or damage found."),
                }
                Ok(())
            }
            Command::Combat { characters, npcs } => self.combat(&characters, &npcs),
            Command::Draft(args) => self.draft(args).await,
            Command::Theme => self.apply(Action::ToggleTheme).await.map(drop),
            Command::Export { character, out } => {
                let json = match &character {
                    Some(key) => persist::export_character(self.character(key)?)?,
                    None => persist::export_json(&self.data)?,
                };
                match out {
                    Some(path) => {
                        tokio::fs::write(&path, json)
                            .await
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("Exported to {}", path.display());
                    }
                    None => println!("{json}"),
                }
                Ok(())
            }
            Command::Import { path, character } => {
                let json = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                let action = if character {
                    Action::AddCharacter(Box::new(persist::import_character(&json)?))
                } else {
                    Action::ReplaceAll(Box::new(persist::import_json(&json)?))
                };
                self.apply(action).await.map(drop)
            }
        }
    }

    // ========================================================================
    // Character creation
    // ========================================================================

    async fn new_character(&mut self, args: NewArgs) -> anyhow::Result<()> {
        let skills = args
            .skills
            .iter()
            .map(|s| Skill::from_name(s).ok_or_else(|| anyhow!("unknown skill '{s}'")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut builder = CharacterBuilder::new()
            .name(args.name)
            .species(args.species)
            .class(args.class)
            .background(args.background)
            .level(args.level)
            .skills(skills)
            .bonus_choices(args.bonus)
            .cantrips(args.cantrips)
            .spells(args.spells);
        if let Some(subclass) = args.subclass {
            builder = builder.subclass(subclass);
        }
        if let Some(backstory) = args.backstory {
            builder = builder.backstory(backstory);
        }

        let scores = match (args.method, args.scores.as_slice()) {
            (MethodArg::Rolled, []) => {
                let rolled = roll_ability_scores(&mut rand::thread_rng());
                println!("Rolled: {rolled:?}");
                rolled
            }
            (_, scores) => <[u8; 6]>::try_from(scores)
                .map_err(|_| anyhow!("--scores needs six values in STR,DEX,CON,INT,WIS,CHA order"))?,
        };
        let [st, dx, cn, it, ws, ch] = scores;
        let ability_scores = AbilityScores::new(st, dx, cn, it, ws, ch);
        builder = match args.method {
            MethodArg::Standard => {
                let abilities = Ability::all();
                builder.standard_array(std::array::from_fn(|i| (scores[i], abilities[i])))
            }
            MethodArg::PointBuy => builder.point_buy(ability_scores),
            MethodArg::Rolled => builder.rolled(ability_scores),
            MethodArg::Manual => builder.manual(ability_scores),
        };

        let sheet = builder.build(&Catalog::new(&self.data))?;
        tracing::info!(name = %sheet.name, class = %sheet.class.name, "character created");
        self.apply(Action::AddCharacter(Box::new(sheet))).await?;
        Ok(())
    }

    // ========================================================================
    // Inventory and slots
    // ========================================================================

    async fn item(&mut self, command: ItemCommand) -> anyhow::Result<()> {
        match command {
            ItemCommand::Add {
                character,
                item,
                quantity,
            } => {
                let id = self.character(&character)?.id;
                let item = match Catalog::new(&self.data).item(&item) {
                    Some(found) => found.clone(),
                    None => {
                        println!("'{item}' is not in the catalog; adding it as gear.");
                        Item::custom(item, ItemKind::Gear)
                    }
                };
                self.apply(Action::AddItem {
                    id,
                    item: Box::new(item),
                    quantity,
                    source: ItemSource::Custom,
                })
                .await
                .map(drop)
            }
            ItemCommand::Remove {
                character,
                item,
                quantity,
            } => {
                let (id, entry) = self.entry(&character, &item)?;
                self.apply(Action::RemoveItem { id, entry, quantity })
                    .await
                    .map(drop)
            }
            ItemCommand::Equip { character, item } => {
                let (id, entry) = self.entry(&character, &item)?;
                self.apply(Action::EquipItem { id, entry }).await.map(drop)
            }
            ItemCommand::Unequip { character, item } => {
                let (id, entry) = self.entry(&character, &item)?;
                self.apply(Action::UnequipItem { id, entry }).await.map(drop)
            }
        }
    }

    fn entry(
        &self,
        character: &str,
        item: &str,
    ) -> anyhow::Result<(heroforge_core::CharacterId, heroforge_core::EntryId)> {
        let sheet = self.character(character)?;
        let entry = sheet
            .entry_by_name(item)
            .ok_or_else(|| anyhow!("{} has no '{item}'", sheet.name))?;
        Ok((sheet.id, entry.id))
    }

    async fn slot(&mut self, command: SlotCommand) -> anyhow::Result<()> {
        match command {
            SlotCommand::Use { character, level } => {
                let id = self.character(&character)?.id;
                self.apply(Action::UseSpellSlot { id, level }).await.map(drop)
            }
            SlotCommand::Rest { character } => {
                let id = self.character(&character)?.id;
                self.apply(Action::LongRest(id)).await?;
                println!("{} finishes a long rest.", self.character(&character)?.name);
                Ok(())
            }
        }
    }

    // ========================================================================
    // Content
    // ========================================================================

    async fn content(&mut self, command: ContentCommand) -> anyhow::Result<()> {
        match command {
            ContentCommand::List { kind, custom } => {
                let names = if custom {
                    self.data
                        .custom_entries(kind)
                        .iter()
                        .map(|e| e.name().to_string())
                        .collect()
                } else {
                    Catalog::new(&self.data).names(kind)
                };
                if names.is_empty() {
                    println!("No {kind} entries.");
                }
                for name in names {
                    println!("{name}");
                }
                Ok(())
            }
            ContentCommand::Show { kind, name } => {
                let json = self.content_json(kind, &name)?;
                println!("{json}");
                Ok(())
            }
            ContentCommand::Delete { kind, names } => {
                let mut staged = ContentManager::new();
                for name in &names {
                    let entry = self
                        .data
                        .find_custom(kind, name)
                        .ok_or_else(|| anyhow!("no custom {kind} named '{name}'"))?;
                    staged.mark(kind, entry.id());
                }
                let removed = staged.commit(&mut self.data)?;
                persist::save(&self.data, &self.config.data_path).await?;
                println!("Deleted {removed} custom {kind} entries.");
                Ok(())
            }
        }
    }

    fn content_json(&self, kind: ContentKind, name: &str) -> anyhow::Result<String> {
        let catalog = Catalog::new(&self.data);
        let json = match kind {
            ContentKind::Species => catalog.species(name).map(serde_json::to_string_pretty),
            ContentKind::Class => catalog.class(name).map(serde_json::to_string_pretty),
            ContentKind::Subclass => catalog.subclass(name).map(serde_json::to_string_pretty),
            ContentKind::Background => catalog.background(name).map(serde_json::to_string_pretty),
            ContentKind::Item => catalog.item(name).map(serde_json::to_string_pretty),
            ContentKind::Spell => catalog.spell(name).map(serde_json::to_string_pretty),
            ContentKind::Npc => catalog.npc(name).map(serde_json::to_string_pretty),
        };
        Ok(json.ok_or_else(|| anyhow!("no {kind} named '{name}'"))??)
    }

    async fn draft(&mut self, args: DraftArgs) -> anyhow::Result<()> {
        let model = self
            .config
            .claude()
            .context("drafting needs ANTHROPIC_API_KEY")?;

        let (entry, existing) = match &args.base {
            Some(name) => {
                let base = self
                    .data
                    .find_custom(args.kind, name)
                    .ok_or_else(|| anyhow!("no custom {} named '{name}'", args.kind))?;
                (draft::redraft(&model, &base, &args.request).await?, true)
            }
            None => (draft::draft(&model, args.kind, &args.request).await?, false),
        };

        println!("{}", serde_json::to_string_pretty(&entry)?);
        if args.save {
            let action = if existing {
                Action::ReplaceContent(entry)
            } else {
                Action::AddContent(entry)
            };
            self.apply(action).await?;
        }
        Ok(())
    }

    // ========================================================================
    // Combat
    // ========================================================================

    fn combat(&self, characters: &[String], npcs: &[String]) -> anyhow::Result<()> {
        let catalog = Catalog::new(&self.data);
        let mut tracker = CombatTracker::new();
        for key in characters {
            tracker.add_character(self.character(key)?, Initiative::Roll);
        }
        for key in npcs {
            let npc = catalog
                .npc(key)
                .ok_or_else(|| anyhow!("no creature named '{key}'"))?;
            tracker.add_npc(npc, Initiative::Roll);
        }
        if tracker.combatants.is_empty() {
            bail!("add at least one --character or --npc");
        }

        println!("=== Combat ===");
        print!("{}", render::initiative(&tracker));
        println!();
        println!("Commands:");
        println!("  next                 - End the current turn");
        println!("  dmg <name> <amount>  - Deal damage");
        println!("  heal <name> <amount> - Restore hit points");
        println!("  temp <name> <amount> - Grant temporary hit points");
        println!("  remove <name>        - Remove a combatant");
        println!("  list                 - Show initiative order");
        println!("  log                  - Show the combat log");
        println!("  quit                 - End combat");
        println!();

        let mut logged = tracker.log.len();
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        for line in stdin.lock().lines() {
            let line = line?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            let result = match parts.as_slice() {
                [] => continue,
                ["quit"] | ["exit"] => break,
                ["next"] => {
                    tracker.next_turn();
                    Ok(())
                }
                ["list"] => {
                    print!("{}", render::initiative(&tracker));
                    Ok(())
                }
                ["log"] => {
                    for entry in &tracker.log {
                        println!("[round {}] {}", entry.round, entry.description);
                    }
                    Ok(())
                }
                ["remove", name @ ..] => find_combatant(&tracker, &name.join(" "))
                    .and_then(|id| tracker.remove(id).map(drop).map_err(Into::into)),
                [verb @ ("dmg" | "heal" | "temp"), name @ .., amount] => {
                    apply_hp(&mut tracker, verb, &name.join(" "), amount)
                }
                _ => Err(anyhow!("unrecognized command '{line}'")),
            };
            match result {
                Ok(()) => {
                    for entry in &tracker.log[logged.min(tracker.log.len())..] {
                        println!("{}", entry.description);
                    }
                    logged = tracker.log.len();
                }
                Err(e) => println!("[ERROR] {e}"),
            }
            stdout.flush()?;
            if tracker.combatants.is_empty() {
                println!("No combatants remain.");
                break;
            }
        }
        Ok(())
    }
}

fn find_combatant(tracker: &CombatTracker, name: &str) -> anyhow::Result<CombatantId> {
    tracker
        .combatants
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            let lower = name.to_lowercase();
            tracker
                .combatants
                .iter()
                .find(|c| c.name.to_lowercase().starts_with(&lower))
        })
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("no combatant named '{name}'"))
}

fn apply_hp(
    tracker: &mut CombatTracker,
    verb: &str,
    name: &str,
    amount: &str,
) -> anyhow::Result<()> {
    let amount: i32 = amount
        .parse()
        .with_context(|| format!("'{amount}' is not a number"))?;
    let id = find_combatant(tracker, name)?;
    match verb {
        "dmg" => tracker.damage(id, amount).map(drop)?,
        "heal" => tracker.heal(id, amount).map(drop)?,
        _ => {
            tracker.add_temp_hp(id, amount)?;
            if let Some(c) = tracker.get(id) {
                println!("{} has {} temporary hit points.", c.name, c.hit_points.temporary);
            }
        }
    }
    Ok(())
}
