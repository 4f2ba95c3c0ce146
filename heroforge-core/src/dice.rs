//! Dice notation and rolling.
//!
//! `DiceSpec` is the single-term form stored on sheets and content
//! (`2d6+3`, `1d8-1`, a flat `5`). `DiceExpression` covers multi-term
//! notation such as `2d6+1d4+3` or `4d6kh3`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Most dice a single term may roll.
pub const MAX_DICE: u32 = 1000;
/// Largest die accepted in notation.
pub const MAX_SIDES: u32 = 1000;

/// Error type for dice parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("Too many dice: {0} (at most {MAX_DICE})")]
    TooManyDice(u32),
    #[error("No dice specified")]
    NoDice,
    #[error("Cannot keep {keep} dice when only rolling {count} (in {notation})")]
    InvalidKeepCount {
        keep: u32,
        count: u32,
        notation: String,
    },
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Combine two advantage states (advantage + disadvantage = normal).
    pub fn combine(self, other: Advantage) -> Advantage {
        match (self, other) {
            (Advantage::Normal, x) | (x, Advantage::Normal) => x,
            (Advantage::Advantage, Advantage::Disadvantage)
            | (Advantage::Disadvantage, Advantage::Advantage) => Advantage::Normal,
            (x, _) => x,
        }
    }
}

/// Standard D&D die types, used for hit dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }

    /// Fixed hit point gain per level: half the die plus one.
    pub fn average_rounded_up(&self) -> i32 {
        self.sides() as i32 / 2 + 1
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

// ============================================================================
// Single-term dice
// ============================================================================

/// One `NdS+B` term. A flat number parses to zero dice with a bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceSpec {
    pub num_dice: u32,
    pub die_sides: u32,
    pub bonus: i32,
}

impl DiceSpec {
    pub fn new(num_dice: u32, die_sides: u32, bonus: i32) -> Self {
        Self {
            num_dice,
            die_sides,
            bonus,
        }
    }

    pub fn flat(bonus: i32) -> Self {
        Self::new(0, 0, bonus)
    }

    /// Parse `2d6+3`, `1d8-1`, `d20`, or a bare integer such as `5`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let compact: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(DiceError::NoDice);
        }
        let invalid = || DiceError::InvalidNotation(notation.trim().to_string());

        let Some(d_pos) = compact.find('d') else {
            let bonus = compact.parse::<i32>().map_err(|_| invalid())?;
            return Ok(Self::flat(bonus));
        };

        let count_str = &compact[..d_pos];
        let num_dice = if count_str.is_empty() {
            1
        } else {
            count_str.parse::<u32>().map_err(|_| invalid())?
        };
        if num_dice > MAX_DICE {
            return Err(DiceError::TooManyDice(num_dice));
        }

        let rest = &compact[d_pos + 1..];
        let (sides_str, bonus) = match rest.find(['+', '-']) {
            Some(pos) => (
                &rest[..pos],
                rest[pos..].parse::<i32>().map_err(|_| invalid())?,
            ),
            None => (rest, 0),
        };

        let die_sides = sides_str.parse::<u32>().map_err(|_| invalid())?;
        if die_sides == 0 || die_sides > MAX_SIDES {
            return Err(DiceError::InvalidDieSize(die_sides));
        }

        Ok(Self::new(num_dice, die_sides, bonus))
    }

    pub fn min(&self) -> i32 {
        clamp_total(i64::from(self.num_dice) + i64::from(self.bonus))
    }

    pub fn max(&self) -> i32 {
        clamp_total(i64::from(self.num_dice) * i64::from(self.die_sides) + i64::from(self.bonus))
    }

    /// Expected value, rounded down the way stat blocks print it.
    pub fn average(&self) -> i32 {
        let dice = self.num_dice as f64 * (self.die_sides as f64 + 1.0) / 2.0;
        (dice + self.bonus as f64).floor() as i32
    }

    pub fn roll(&self) -> SpecRoll {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> SpecRoll {
        let rolls: Vec<u32> = (0..self.num_dice)
            .map(|_| rng.gen_range(1..=self.die_sides.max(1)))
            .collect();
        let total = clamp_total(sum_rolls(&rolls) + i64::from(self.bonus));
        SpecRoll { rolls, total }
    }
}

fn sum_rolls(rolls: &[u32]) -> i64 {
    rolls.iter().map(|&r| i64::from(r)).sum()
}

fn clamp_total(total: i64) -> i32 {
    total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl FromStr for DiceSpec {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceSpec::parse(s)
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_dice == 0 {
            return write!(f, "{}", self.bonus);
        }
        write!(f, "{}d{}", self.num_dice, self.die_sides)?;
        match self.bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{b}"),
            b => write!(f, "{b}"),
        }
    }
}

/// Result of rolling a `DiceSpec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRoll {
    pub rolls: Vec<u32>,
    pub total: i32,
}

// ============================================================================
// d20 rolls
// ============================================================================

/// A d20 test, possibly rolled twice for advantage or disadvantage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    pub rolls: Vec<u32>,
    pub kept: u32,
    pub modifier: i32,
    pub total: i32,
}

impl D20Roll {
    pub fn is_critical(&self) -> bool {
        self.kept == 20
    }

    pub fn is_fumble(&self) -> bool {
        self.kept == 1
    }
}

pub fn roll_d20(modifier: i32, advantage: Advantage) -> D20Roll {
    roll_d20_with_rng(modifier, advantage, &mut rand::thread_rng())
}

pub fn roll_d20_with_rng<R: Rng>(modifier: i32, advantage: Advantage, rng: &mut R) -> D20Roll {
    let first = rng.gen_range(1..=20u32);
    let (rolls, kept) = match advantage {
        Advantage::Normal => (vec![first], first),
        Advantage::Advantage => {
            let second = rng.gen_range(1..=20u32);
            (vec![first, second], first.max(second))
        }
        Advantage::Disadvantage => {
            let second = rng.gen_range(1..=20u32);
            (vec![first, second], first.min(second))
        }
    };
    D20Roll {
        rolls,
        kept,
        modifier,
        total: modifier.saturating_add(kept as i32),
    }
}

// ============================================================================
// Multi-term expressions
// ============================================================================

/// Which dice of a term count toward the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keep {
    Highest(u32),
    Lowest(u32),
}

/// One dice term of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub sides: u32,
    pub keep: Option<Keep>,
    pub negative: bool,
}

/// A complete dice expression (e.g., `2d6+1d4+3`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub terms: Vec<DiceTerm>,
    pub modifier: i32,
    pub original: String,
}

impl DiceExpression {
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let original = notation.trim().to_lowercase();
        if original.is_empty() {
            return Err(DiceError::NoDice);
        }

        let mut terms = Vec::new();
        let mut modifier = 0i32;
        let mut current = String::new();
        let mut negative = false;

        for ch in original.chars().filter(|c| !c.is_whitespace()) {
            if ch == '+' || ch == '-' {
                if !current.is_empty() {
                    Self::push_term(&current, negative, &mut terms, &mut modifier)?;
                    current.clear();
                }
                negative = ch == '-';
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            Self::push_term(&current, negative, &mut terms, &mut modifier)?;
        }

        if terms.is_empty() && modifier == 0 {
            return Err(DiceError::NoDice);
        }

        Ok(Self {
            terms,
            modifier,
            original,
        })
    }

    fn push_term(
        chunk: &str,
        negative: bool,
        terms: &mut Vec<DiceTerm>,
        modifier: &mut i32,
    ) -> Result<(), DiceError> {
        let invalid = || DiceError::InvalidNotation(chunk.to_string());

        let Some(d_pos) = chunk.find('d') else {
            let value: i32 = chunk.parse().map_err(|_| invalid())?;
            *modifier = if negative {
                modifier.saturating_sub(value)
            } else {
                modifier.saturating_add(value)
            };
            return Ok(());
        };

        let count = match &chunk[..d_pos] {
            "" => 1,
            n => n.parse::<u32>().map_err(|_| invalid())?,
        };
        if count > MAX_DICE {
            return Err(DiceError::TooManyDice(count));
        }
        let rest = &chunk[d_pos + 1..];

        let (sides_str, keep) = if let Some(pos) = rest.find("kh") {
            let n = rest[pos + 2..].parse().map_err(|_| invalid())?;
            (&rest[..pos], Some(Keep::Highest(n)))
        } else if let Some(pos) = rest.find("kl") {
            let n = rest[pos + 2..].parse().map_err(|_| invalid())?;
            (&rest[..pos], Some(Keep::Lowest(n)))
        } else {
            (rest, None)
        };

        let sides: u32 = sides_str.parse().map_err(|_| invalid())?;
        if sides == 0 || sides > MAX_SIDES {
            return Err(DiceError::InvalidDieSize(sides));
        }
        if let Some(Keep::Highest(n) | Keep::Lowest(n)) = keep {
            if n > count {
                return Err(DiceError::InvalidKeepCount {
                    keep: n,
                    count,
                    notation: chunk.to_string(),
                });
            }
        }

        terms.push(DiceTerm {
            count,
            sides,
            keep,
            negative,
        });
        Ok(())
    }

    pub fn roll(&self) -> RollResult {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> RollResult {
        let term_results: Vec<TermResult> = self
            .terms
            .iter()
            .map(|term| {
                let rolls: Vec<u32> = (0..term.count)
                    .map(|_| rng.gen_range(1..=term.sides))
                    .collect();
                let mut kept = rolls.clone();
                match term.keep {
                    Some(Keep::Highest(n)) => {
                        kept.sort_by(|a, b| b.cmp(a));
                        kept.truncate(n as usize);
                    }
                    Some(Keep::Lowest(n)) => {
                        kept.sort();
                        kept.truncate(n as usize);
                    }
                    None => {}
                }
                let sum = clamp_total(sum_rolls(&kept));
                TermResult {
                    sides: term.sides,
                    rolls,
                    kept,
                    subtotal: if term.negative { -sum } else { sum },
                }
            })
            .collect();

        let total = clamp_total(
            term_results.iter().map(|t| i64::from(t.subtotal)).sum::<i64>()
                + i64::from(self.modifier),
        );

        // Natural 20/1 only means something for a lone d20.
        let natural = match term_results.as_slice() {
            [only] if only.sides == 20 && only.rolls.len() == 1 => only.rolls.first().copied(),
            _ => None,
        };

        RollResult {
            terms: term_results,
            modifier: self.modifier,
            total,
            natural_20: natural == Some(20),
            natural_1: natural == Some(1),
        }
    }

    fn is_single_d20(&self) -> bool {
        matches!(
            self.terms.as_slice(),
            [DiceTerm { count: 1, sides: 20, keep: None, negative: false }]
        )
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Dice rolled for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermResult {
    pub sides: u32,
    pub rolls: Vec<u32>,
    pub kept: Vec<u32>,
    pub subtotal: i32,
}

/// Complete result of rolling an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub terms: Vec<TermResult>,
    pub modifier: i32,
    pub total: i32,
    pub natural_20: bool,
    pub natural_1: bool,
}

impl RollResult {
    /// Dice faces for display, dropped dice in parentheses.
    pub fn dice_display(&self) -> String {
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|t| {
                let mut remaining = t.kept.clone();
                let shown: Vec<String> = t
                    .rolls
                    .iter()
                    .map(|roll| match remaining.iter().position(|k| k == roll) {
                        Some(i) => {
                            remaining.swap_remove(i);
                            roll.to_string()
                        }
                        None => format!("({roll})"),
                    })
                    .collect();
                format!("[{}]", shown.join(", "))
            })
            .collect();

        let dice = parts.join(" + ");
        match self.modifier {
            0 => dice,
            m if m > 0 => format!("{dice} + {m}"),
            m => format!("{dice} - {}", m.abs()),
        }
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total)
    }
}

/// Roll dice from a notation string.
pub fn roll(notation: &str) -> Result<RollResult, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll())
}

/// Roll a d20-based notation (`1d20+5`) with advantage or disadvantage.
///
/// Anything other than a single d20 plus modifier is rolled normally.
pub fn roll_with_advantage(notation: &str, advantage: Advantage) -> Result<RollResult, DiceError> {
    let expr = DiceExpression::parse(notation)?;
    if advantage == Advantage::Normal || !expr.is_single_d20() {
        return Ok(expr.roll());
    }
    let d20 = roll_d20(expr.modifier, advantage);
    Ok(RollResult {
        terms: vec![TermResult {
            sides: 20,
            rolls: d20.rolls.clone(),
            kept: vec![d20.kept],
            subtotal: d20.kept as i32,
        }],
        modifier: expr.modifier,
        total: d20.total,
        natural_20: d20.is_critical(),
        natural_1: d20.is_fumble(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spec_parse() {
        assert_eq!(DiceSpec::parse("2d6+3").unwrap(), DiceSpec::new(2, 6, 3));
        assert_eq!(DiceSpec::parse("1d8-1").unwrap(), DiceSpec::new(1, 8, -1));
        assert_eq!(DiceSpec::parse("5").unwrap(), DiceSpec::new(0, 0, 5));
        assert_eq!(DiceSpec::parse("d20").unwrap(), DiceSpec::new(1, 20, 0));
        assert_eq!(DiceSpec::parse(" 1D10 + 2 ").unwrap(), DiceSpec::new(1, 10, 2));
    }

    #[test]
    fn test_spec_parse_errors() {
        assert_eq!(DiceSpec::parse(""), Err(DiceError::NoDice));
        assert!(matches!(
            DiceSpec::parse("2d"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceSpec::parse("2d6+x"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert_eq!(DiceSpec::parse("1d0"), Err(DiceError::InvalidDieSize(0)));
    }

    #[test]
    fn test_oversized_notation_is_rejected() {
        assert_eq!(
            DiceSpec::parse("100000d100000"),
            Err(DiceError::TooManyDice(100000))
        );
        assert_eq!(
            DiceSpec::parse("10d100000"),
            Err(DiceError::InvalidDieSize(100000))
        );
        assert_eq!(
            DiceExpression::parse("50000000d1000"),
            Err(DiceError::TooManyDice(50000000))
        );
        assert!(matches!(
            DiceExpression::parse("2d6+1d5000"),
            Err(DiceError::InvalidDieSize(5000))
        ));
        assert!(DiceExpression::parse("1000d1000").is_ok());
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let spec = DiceSpec::new(u32::MAX, u32::MAX, i32::MAX);
        assert_eq!(spec.max(), i32::MAX);
        assert_eq!(DiceSpec::new(1, 6, i32::MAX).min(), i32::MAX);

        let expr = DiceExpression::parse("1d6+2000000000+2000000000").unwrap();
        assert_eq!(expr.modifier, i32::MAX);
        assert_eq!(expr.roll().total, i32::MAX);

        let adv = roll_with_advantage("1d20+2147483647", Advantage::Advantage).unwrap();
        assert_eq!(adv.total, i32::MAX);

        let mut rng = StdRng::seed_from_u64(3);
        let big = DiceExpression::parse("1000d1000").unwrap().roll_with_rng(&mut rng);
        assert!((1000..=1_000_000).contains(&big.total));
    }

    #[test]
    fn test_spec_display() {
        assert_eq!(DiceSpec::new(2, 6, 3).to_string(), "2d6+3");
        assert_eq!(DiceSpec::new(1, 8, -1).to_string(), "1d8-1");
        assert_eq!(DiceSpec::flat(5).to_string(), "5");
    }

    #[test]
    fn test_spec_average() {
        assert_eq!(DiceSpec::new(1, 8, 3).average(), 7);
        assert_eq!(DiceSpec::new(2, 6, 0).average(), 7);
        assert_eq!(DiceSpec::new(1, 6, 0).average(), 3);
    }

    #[test]
    fn test_spec_roll_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let spec = DiceSpec::new(2, 6, 3);
        for _ in 0..200 {
            let roll = spec.roll_with_rng(&mut rng);
            assert_eq!(roll.rolls.len(), 2);
            assert!((spec.min()..=spec.max()).contains(&roll.total));
        }
    }

    #[test]
    fn test_d20_advantage_keeps_higher() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let adv = roll_d20_with_rng(3, Advantage::Advantage, &mut rng);
            assert_eq!(adv.rolls.len(), 2);
            assert_eq!(adv.kept, *adv.rolls.iter().max().unwrap());
            assert_eq!(adv.total, adv.kept as i32 + 3);

            let dis = roll_d20_with_rng(0, Advantage::Disadvantage, &mut rng);
            assert_eq!(dis.kept, *dis.rolls.iter().min().unwrap());
        }
    }

    #[test]
    fn test_expression_parse() {
        let expr = DiceExpression::parse("2d6+1d4+3").unwrap();
        assert_eq!(expr.terms.len(), 2);
        assert_eq!(expr.modifier, 3);

        let expr = DiceExpression::parse("4d6kh3").unwrap();
        assert_eq!(expr.terms[0].keep, Some(Keep::Highest(3)));

        assert!(matches!(
            DiceExpression::parse("4d6kh5"),
            Err(DiceError::InvalidKeepCount { keep: 5, count: 4, .. })
        ));
    }

    #[test]
    fn test_keep_highest_roll() {
        let mut rng = StdRng::seed_from_u64(3);
        let expr = DiceExpression::parse("4d6kh3").unwrap();
        for _ in 0..100 {
            let result = expr.roll_with_rng(&mut rng);
            assert_eq!(result.terms[0].rolls.len(), 4);
            assert_eq!(result.terms[0].kept.len(), 3);
            assert!((3..=18).contains(&result.total));
        }
    }

    #[test]
    fn test_roll_with_advantage_range() {
        for _ in 0..100 {
            let result = roll_with_advantage("1d20+5", Advantage::Advantage).unwrap();
            assert!((6..=25).contains(&result.total));
        }
    }

    #[test]
    fn test_advantage_combine() {
        assert_eq!(
            Advantage::Normal.combine(Advantage::Advantage),
            Advantage::Advantage
        );
        assert_eq!(
            Advantage::Advantage.combine(Advantage::Disadvantage),
            Advantage::Normal
        );
        assert_eq!(
            Advantage::Disadvantage.combine(Advantage::Disadvantage),
            Advantage::Disadvantage
        );
    }

    #[test]
    fn test_hit_die_average() {
        assert_eq!(DieType::D8.average_rounded_up(), 5);
        assert_eq!(DieType::D12.average_rounded_up(), 7);
    }
}
