//! HeroForge command-line interface.
//!
//! Builds characters, manages inventory and spell slots, tracks combat and
//! drafts custom content with an AI model. All data lives in one JSON file,
//! `heroforge.json` by default or `$HEROFORGE_DATA`:
//!
//! ```bash
//! heroforge new --name Thorin --species Dwarf --class Fighter --background Soldier \
//!     --scores 15,13,14,8,12,10 --skills Athletics,Perception
//! heroforge item equip Thorin Longsword
//! heroforge combat --character Thorin --npc Goblin --npc Goblin
//! ```

mod commands;
mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};
use heroforge_core::character::Ability;
use heroforge_core::{ContentKind, HeroForgeConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// D&D 5e character builder and campaign manager
#[derive(Parser, Debug)]
#[command(name = "heroforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data file to read and write
    #[arg(short = 'd', long = "data", global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a character
    New(NewArgs),
    /// List saved characters
    List,
    /// Show a character sheet
    Sheet { character: String },
    /// Delete a character
    Delete { character: String },
    /// Roll dice, e.g. `2d6+3` or `4d6kh3`
    Roll {
        notation: String,
        #[arg(long, conflicts_with = "dis")]
        adv: bool,
        #[arg(long)]
        dis: bool,
    },
    /// Change hit points
    Hp {
        character: String,
        #[command(subcommand)]
        change: HpChange,
    },
    /// Set a character's level
    Level { character: String, level: u8 },
    /// Set one base ability score
    Score {
        character: String,
        #[arg(value_parser = parse_ability)]
        ability: Ability,
        score: u8,
    },
    /// Replace a character's notes
    Notes { character: String, text: String },
    /// Manage inventory
    #[command(subcommand)]
    Item(ItemCommand),
    /// Spend and recover spell slots
    #[command(subcommand)]
    Slot(SlotCommand),
    /// Browse and remove content
    #[command(subcommand)]
    Content(ContentCommand),
    /// Parse a monster attack description
    Attack { text: String },
    /// Run an initiative tracker on stdin
    Combat {
        /// Character to add (repeatable)
        #[arg(short = 'c', long = "character")]
        characters: Vec<String>,
        /// Creature to add (repeatable)
        #[arg(short = 'n', long = "npc")]
        npcs: Vec<String>,
    },
    /// Draft custom content with the AI model
    Draft(DraftArgs),
    /// Switch between light and dark theme
    Theme,
    /// Export all data, or one character
    Export {
        /// Export only this character
        #[arg(short = 'c', long = "character")]
        character: Option<String>,
        /// Output file; stdout when omitted
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
    /// Import a data file, or a single exported character
    Import {
        path: PathBuf,
        /// The file holds one exported character
        #[arg(short = 'c', long = "character")]
        character: bool,
    },
}

#[derive(Args, Debug)]
struct NewArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    species: String,
    #[arg(long)]
    class: String,
    #[arg(long)]
    subclass: Option<String>,
    #[arg(long)]
    background: String,
    #[arg(long, default_value_t = 1)]
    level: u8,
    #[arg(long, value_enum, default_value_t = MethodArg::Standard)]
    method: MethodArg,
    /// Six scores in STR,DEX,CON,INT,WIS,CHA order. Omit with `--method rolled` to roll them.
    #[arg(long, value_delimiter = ',')]
    scores: Vec<u8>,
    #[arg(long, value_delimiter = ',')]
    skills: Vec<String>,
    /// Abilities for flexible species bonuses
    #[arg(long = "bonus", value_delimiter = ',', value_parser = parse_ability)]
    bonus: Vec<Ability>,
    #[arg(long, value_delimiter = ',')]
    cantrips: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    spells: Vec<String>,
    #[arg(long)]
    backstory: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MethodArg {
    Standard,
    PointBuy,
    Rolled,
    Manual,
}

#[derive(Subcommand, Debug)]
enum HpChange {
    Damage { amount: i32 },
    Heal { amount: i32 },
    Temp { amount: i32 },
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    /// Add an item from the catalog, or a custom gear item
    Add {
        character: String,
        item: String,
        #[arg(short = 'q', long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove an item, or some of a stack
    Remove {
        character: String,
        item: String,
        #[arg(short = 'q', long)]
        quantity: Option<u32>,
    },
    Equip { character: String, item: String },
    Unequip { character: String, item: String },
}

#[derive(Subcommand, Debug)]
enum SlotCommand {
    /// Spend a slot of the given level
    Use { character: String, level: u8 },
    /// Long rest: recover slots and hit points
    Rest { character: String },
}

#[derive(Subcommand, Debug)]
enum ContentCommand {
    /// List built-in and custom entries of a kind
    List {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        /// Only custom entries
        #[arg(long)]
        custom: bool,
    },
    /// Print one entry as JSON
    Show {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        name: String,
    },
    /// Delete custom entries
    Delete {
        #[arg(value_parser = parse_kind)]
        kind: ContentKind,
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(value_parser = parse_kind)]
    kind: ContentKind,
    /// What to create, in plain words
    request: String,
    /// Revise this existing custom entry instead of starting fresh
    #[arg(long)]
    base: Option<String>,
    /// Save the result to the custom catalog
    #[arg(long)]
    save: bool,
}

fn parse_kind(s: &str) -> Result<ContentKind, String> {
    ContentKind::from_name(s).ok_or_else(|| {
        let kinds: Vec<&str> = ContentKind::all().iter().map(|k| k.label()).collect();
        format!("unknown content kind '{s}' (expected one of: {})", kinds.join(", "))
    })
}

fn parse_ability(s: &str) -> Result<Ability, String> {
    Ability::from_name(s).ok_or_else(|| format!("unknown ability '{s}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heroforge=info,heroforge_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = HeroForgeConfig::from_env();
    if let Some(path) = cli.data {
        config = config.with_data_path(path);
    }

    let mut app = commands::App::open(config).await?;
    app.run(cli.command).await
}
