//! Dice formulas and rollers.
//!
//! Supports formulas like "2d6", "1d6+2", "d10", "1d6/2" and "3d6 - 1", and
//! plain decimal constants such as "0.5". Rolls go through a [`DiceRoller`]
//! so callers can inject a deterministic source.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    #[error("Empty dice formula")]
    Empty,
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    #[error("Dice count must be between 1 and {}", MAX_DICE_COUNT)]
    InvalidDiceCount,
    #[error("Die size must be between 2 and {}", MAX_DIE_SIZE)]
    InvalidDieSize,
    #[error("Division by zero in '{0}'")]
    DivisionByZero(String),
}

/// Source of individual die results.
pub trait DiceRoller {
    /// Roll one die with `sides` faces, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

// Roller backed by rand. Thread-local by default, seedable for replays.
pub struct RandomRoller<R = ThreadRng> {
    rng: R,
}

impl RandomRoller {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomRoller<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> DiceRoller for RandomRoller<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Replays a fixed list of die faces, cycling when exhausted. Values are
/// clamped into the die's range.
#[derive(Debug, Clone)]
pub struct SequenceRoller {
    values: VecDeque<u32>,
}

impl SequenceRoller {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl DiceRoller for SequenceRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let value = self.values.pop_front().unwrap_or(1);
        self.values.push_back(value);
        value.clamp(1, sides.max(1))
    }
}

// True when the text contains at least one dice term such as "d6" or "2D10".
pub fn formula_has_dice(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| {
        (*b == b'd' || *b == b'D') && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Atom {
    Dice { count: u32, sides: u32 },
    Constant(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scale {
    Mul(f64),
    Div(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub negative: bool,
    pub atom: Atom,
    pub scale: Vec<Scale>,
}

impl Term {
    fn apply_scale(&self, value: f64) -> f64 {
        self.scale.iter().fold(value, |acc, s| match s {
            Scale::Mul(n) => acc * n,
            Scale::Div(n) => acc / n,
        })
    }

    fn signed(&self, value: f64) -> f64 {
        if self.negative { -value } else { value }
    }
}

/// A parsed dice formula: a signed sum of terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceFormula {
    pub terms: Vec<Term>,
}

fn parse_number(text: &str) -> Result<f64, DiceParseError> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(DiceParseError::InvalidFormat(format!(
            "Invalid number: '{text}'"
        )));
    }
    text.parse::<f64>()
        .map_err(|_| DiceParseError::InvalidFormat(format!("Invalid number: '{text}'")))
}

// Upper limits for a single dice group, so a roll stays small and its sum fits.
pub const MAX_DICE_COUNT: u32 = 1000;
pub const MAX_DIE_SIZE: u32 = 1000;

fn parse_atom(text: &str) -> Result<Atom, DiceParseError> {
    let Some(d_pos) = text.find('d') else {
        return Ok(Atom::Constant(parse_number(text)?));
    };

    let count_str = &text[..d_pos];
    let count: u32 = if count_str.is_empty() {
        1 // "d6" means "1d6"
    } else {
        count_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid dice count: '{count_str}'"))
        })?
    };
    if count == 0 || count > MAX_DICE_COUNT {
        return Err(DiceParseError::InvalidDiceCount);
    }

    let sides_str = &text[d_pos + 1..];
    let sides: u32 = sides_str.parse().map_err(|_| {
        DiceParseError::InvalidFormat(format!("Invalid die size: '{sides_str}'"))
    })?;
    if !(2..=MAX_DIE_SIZE).contains(&sides) {
        return Err(DiceParseError::InvalidDieSize);
    }
    Ok(Atom::Dice { count, sides })
}

fn parse_term(text: &str, negative: bool) -> Result<Term, DiceParseError> {
    // Split on '*' and '/', keeping the operator of each trailing factor.
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut op = None;
    for (i, c) in text.char_indices() {
        if c == '*' || c == '/' {
            pieces.push((op, &text[start..i]));
            op = Some(c);
            start = i + 1;
        }
    }
    pieces.push((op, &text[start..]));

    let mut pieces = pieces.into_iter();
    let atom = match pieces.next() {
        Some((None, head)) => parse_atom(head)?,
        _ => return Err(DiceParseError::InvalidFormat(text.to_string())),
    };

    let mut scale = Vec::new();
    for (op, factor) in pieces {
        let n = parse_number(factor)?;
        match op {
            Some('*') => scale.push(Scale::Mul(n)),
            Some('/') if n == 0.0 => return Err(DiceParseError::DivisionByZero(text.to_string())),
            Some('/') => scale.push(Scale::Div(n)),
            _ => return Err(DiceParseError::InvalidFormat(text.to_string())),
        }
    }

    Ok(Term {
        negative,
        atom,
        scale,
    })
}

impl DiceFormula {
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let mut terms = Vec::new();
        let mut negative = false;
        let mut start = 0;
        for (i, c) in input.char_indices() {
            if c == '+' || c == '-' {
                if i == 0 {
                    negative = c == '-';
                    start = 1;
                    continue;
                }
                terms.push(parse_term(&input[start..i], negative)?);
                negative = c == '-';
                start = i + 1;
            }
        }
        terms.push(parse_term(&input[start..], negative)?);

        Ok(Self { terms })
    }

    pub fn has_dice(&self) -> bool {
        self.terms
            .iter()
            .any(|t| matches!(t.atom, Atom::Dice { .. }))
    }

    pub fn roll(&self, roller: &mut dyn DiceRoller) -> DiceRollResult {
        let mut rolls = Vec::new();
        let mut total = 0.0;
        for term in &self.terms {
            let value = match term.atom {
                Atom::Dice { count, sides } => {
                    let mut sum = 0u64;
                    for _ in 0..count {
                        let value = roller.roll_die(sides);
                        rolls.push(DieRoll { sides, value });
                        sum += u64::from(value);
                    }
                    sum as f64
                }
                Atom::Constant(n) => n,
            };
            total += term.signed(term.apply_scale(value));
        }

        DiceRollResult {
            formula: self.to_string(),
            rolls,
            total,
        }
    }

    // Lowest and highest totals the formula can produce.
    pub fn min_total(&self) -> f64 {
        self.bound(true)
    }

    pub fn max_total(&self) -> f64 {
        self.bound(false)
    }

    fn bound(&self, low: bool) -> f64 {
        self.terms
            .iter()
            .map(|term| {
                let (min, max) = match term.atom {
                    Atom::Dice { count, sides } => {
                        (f64::from(count), f64::from(count) * f64::from(sides))
                    }
                    Atom::Constant(n) => (n, n),
                };
                // A negated term contributes its opposite extreme.
                let pick_min = low != term.negative;
                term.signed(term.apply_scale(if pick_min { min } else { max }))
            })
            .sum()
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            match term.atom {
                Atom::Dice { count, sides } => write!(f, "{count}d{sides}")?,
                Atom::Constant(n) => write!(f, "{n}")?,
            }
            for s in &term.scale {
                match s {
                    Scale::Mul(n) => write!(f, "*{n}")?,
                    Scale::Div(n) => write!(f, "/{n}")?,
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieRoll {
    pub sides: u32,
    pub value: u32,
}

/// Result of rolling a formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    pub formula: String,
    pub rolls: Vec<DieRoll>,
    pub total: f64,
}

impl DiceRollResult {
    // e.g. "2d6 [4, 5] = 9"
    pub fn breakdown(&self) -> String {
        let faces: Vec<String> = self.rolls.iter().map(|r| r.value.to_string()).collect();
        if faces.is_empty() {
            format!("{} = {}", self.formula, self.total)
        } else {
            format!("{} [{}] = {}", self.formula, faces.join(", "), self.total)
        }
    }
}

// Evaluate a formula to its total. None when the text is not a usable formula.
pub fn evaluate(text: &str, roller: &mut dyn DiceRoller) -> Option<DiceRollResult> {
    match DiceFormula::parse(text) {
        Ok(formula) => {
            let result = formula.roll(roller);
            result.total.is_finite().then_some(result)
        }
        Err(e) => {
            log::debug!("Could not evaluate dice formula '{text}': {e}");
            None
        }
    }
}

// Structure to hold the result of a d10 check roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRoll {
    pub dice_results: Vec<u32>,
    pub die_total: i32,
    pub critical_success: bool,
    pub fumble: bool,
}

// Roll a d10 check. A natural 10 explodes: roll again and add, for as long as
// tens keep coming. A natural 1 on the first die is a fumble.
pub fn roll_check(roller: &mut dyn DiceRoller) -> CheckRoll {
    let mut dice_results = Vec::new();
    let mut die_result = roller.roll_die(10);
    dice_results.push(die_result);
    let fumble = die_result == 1;
    let critical_success = die_result == 10;

    while die_result == 10 {
        die_result = roller.roll_die(10);
        dice_results.push(die_result);
    }

    let die_total = dice_results.iter().map(|d| *d as i32).sum();
    CheckRoll {
        dice_results,
        die_total,
        critical_success,
        fumble,
    }
}
