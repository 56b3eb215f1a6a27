// item.rs
// Item records and the routines each record type carries (roll, accel,
// humanity cost).
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::actor::{ActorId, SkillSource};
use crate::dice::{self, CheckRoll, DiceRollResult, DiceRoller, formula_has_dice};
use crate::error::ItemError;
use crate::lookups::{
    Availability, AttackType, Concealability, CyberdeckType, ProgramClass, Reliability, Stat,
    WeaponType,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: Option<ActorId>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub weight: f64,
    pub data: ItemData,
}

// One variant per record type; the `type` tag picks which fields exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemData {
    Weapon(Weapon),
    Armor(Armor),
    Skill(Skill),
    Cyberware(Cyberware),
    Cyberdeck(Cyberdeck),
    Program(Program),
    Vehicle(Vehicle),
    Misc,
    #[serde(other)]
    Unknown,
}

impl ItemData {
    pub fn type_tag(&self) -> &'static str {
        match self {
            ItemData::Weapon(_) => "weapon",
            ItemData::Armor(_) => "armor",
            ItemData::Skill(_) => "skill",
            ItemData::Cyberware(_) => "cyberware",
            ItemData::Cyberdeck(_) => "cyberdeck",
            ItemData::Program(_) => "program",
            ItemData::Vehicle(_) => "vehicle",
            ItemData::Misc => "misc",
            ItemData::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weapon {
    pub weapon_type: WeaponType,
    pub attack_type: AttackType,
    pub accuracy: i32,
    pub concealability: Concealability,
    pub availability: Availability,
    pub damage: String,
    pub shots: u32,
    pub shots_left: u32,
    pub rof: u32,
    pub reliability: Reliability,
    pub range: u32,
    pub attack_skill: String,
}

impl Weapon {
    // A melee weapon can't keep a ranged attack type; it drops back to a plain melee attack.
    pub fn set_weapon_type(&mut self, weapon_type: WeaponType) {
        self.weapon_type = weapon_type;
        if weapon_type == WeaponType::Melee && !self.attack_type.is_melee() {
            self.attack_type = AttackType::Melee;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Armor {
    // Body location -> stopping power
    pub coverage: BTreeMap<String, u32>,
    pub encumbrance: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub stat: Stat,
    pub level: i32,
    pub is_role_skill: bool,
    pub martial: bool,
}

// Humanity cost is either a fixed number or a dice formula like "2d6".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HumanityCost {
    Fixed(f64),
    Formula(String),
}

impl Default for HumanityCost {
    fn default() -> Self {
        HumanityCost::Fixed(0.0)
    }
}

impl std::fmt::Display for HumanityCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HumanityCost::Fixed(n) => write!(f, "{n}"),
            HumanityCost::Formula(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cyberware {
    pub humanity_cost: HumanityCost,
    pub humanity_loss: f64,
    pub surgery: String,
    pub cyberware_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cyberdeck {
    pub deck_type: CyberdeckType,
    pub memory: u32,
    pub speed: i32,
    pub data_walls: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Program {
    pub program_class: ProgramClass,
    pub strength: i32,
    pub mu: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Speed {
    pub value: i32,
    pub max: i32,
    pub acceleration: i32,
    pub deceleration: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub speed: Speed,
    pub sdp: u32,
    pub sp: u32,
}

// Where a humanity loss value came from. Only `value` is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LossSource {
    Rolled(DiceRollResult),
    // Looked like dice but produced no total.
    Unevaluated(String),
    Fixed,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanityLoss {
    pub value: f64,
    pub source: LossSource,
}

impl HumanityLoss {
    pub fn describe(&self) -> String {
        match &self.source {
            LossSource::Rolled(result) => format!("Humanity loss: {}", result.breakdown()),
            LossSource::Unevaluated(text) => {
                format!("Humanity loss: could not roll '{text}', using {}", self.value)
            }
            LossSource::Fixed => format!("Humanity loss: {}", self.value),
            LossSource::Invalid(text) => {
                format!("Humanity loss: '{text}' is not a number, using {}", self.value)
            }
        }
    }
}

// Plain number parsing for humanity cost text. Blank text counts as zero and
// 0x/0o/0b prefixes are read as integers. Infinity and NaN are rejected
// because the loss is stored as a JSON number.
fn parse_fixed(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let radix = match trimmed.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn resolve_humanity_cost(cost: &HumanityCost, roller: &mut dyn DiceRoller) -> HumanityLoss {
    match cost {
        HumanityCost::Fixed(n) if n.is_finite() => HumanityLoss {
            value: *n,
            source: LossSource::Fixed,
        },
        HumanityCost::Fixed(n) => HumanityLoss {
            value: 0.0,
            source: LossSource::Invalid(n.to_string()),
        },
        HumanityCost::Formula(text) if formula_has_dice(text) => match dice::evaluate(text, roller)
        {
            Some(result) => HumanityLoss {
                value: result.total,
                source: LossSource::Rolled(result),
            },
            None => HumanityLoss {
                value: 0.0,
                source: LossSource::Unevaluated(text.clone()),
            },
        },
        HumanityCost::Formula(text) => match parse_fixed(text) {
            Some(value) => HumanityLoss {
                value,
                source: LossSource::Fixed,
            },
            None => HumanityLoss {
                value: 0.0,
                source: LossSource::Invalid(text.clone()),
            },
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollReport {
    pub label: String,
    pub check: CheckRoll,
    pub modifiers: Vec<(String, i32)>,
    pub total: i32,
}

impl RollReport {
    fn new(label: String, check: CheckRoll, modifiers: Vec<(String, i32)>) -> Self {
        let total = check.die_total + modifiers.iter().map(|(_, m)| m).sum::<i32>();
        Self {
            label,
            check,
            modifiers,
            total,
        }
    }

    // e.g. "Minami 10 attack: d10 [7] + WA 1 + REF 8 + Handgun 4 = 20"
    pub fn describe(&self) -> String {
        let faces: Vec<String> = self
            .check
            .dice_results
            .iter()
            .map(|d| d.to_string())
            .collect();
        let mut text = format!("{}: d10 [{}]", self.label, faces.join(", "));
        for (name, value) in &self.modifiers {
            text.push_str(&format!(" + {name} {value}"));
        }
        text.push_str(&format!(" = {}", self.total));
        if self.check.fumble {
            text.push_str(" (fumble)");
        } else if self.check.critical_success {
            text.push_str(" (critical)");
        }
        text
    }
}

impl Item {
    pub fn new(name: impl Into<String>, data: ItemData) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            owner: None,
            cost: 0.0,
            weight: 0.0,
            data,
        }
    }

    pub fn owned_by(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn type_tag(&self) -> &'static str {
        self.data.type_tag()
    }

    // Weapons roll to hit, skills roll a check. Nothing else rolls.
    pub fn roll(
        &self,
        owner: Option<&dyn SkillSource>,
        roller: &mut dyn DiceRoller,
    ) -> Result<RollReport, ItemError> {
        match &self.data {
            ItemData::Weapon(weapon) => {
                let mut modifiers = vec![("WA".to_string(), weapon.accuracy)];
                if let Some(owner) = owner {
                    modifiers.push(("REF".to_string(), owner.stat(Stat::Ref)));
                    if let Some(level) = owner.skill_level(&weapon.attack_skill) {
                        modifiers.push((weapon.attack_skill.clone(), level));
                    }
                }
                let check = dice::roll_check(roller);
                Ok(RollReport::new(
                    format!("{} attack", self.name),
                    check,
                    modifiers,
                ))
            }
            ItemData::Skill(skill) => {
                let mut modifiers = Vec::new();
                if let Some(owner) = owner {
                    modifiers.push((skill.stat.to_string().to_uppercase(), owner.stat(skill.stat)));
                }
                modifiers.push(("Level".to_string(), skill.level));
                let check = dice::roll_check(roller);
                Ok(RollReport::new(self.name.clone(), check, modifiers))
            }
            other => Err(ItemError::NotRollable(other.type_tag())),
        }
    }

    // Speed up by the vehicle's acceleration, or slow down by its deceleration.
    // The result stays within [0, max].
    pub fn accel(&mut self, decelerate: bool) -> Result<Speed, ItemError> {
        match &mut self.data {
            ItemData::Vehicle(vehicle) => {
                let speed = &mut vehicle.speed;
                let next = if decelerate {
                    speed.value - speed.deceleration
                } else {
                    speed.value + speed.acceleration
                };
                speed.value = next.clamp(0, speed.max.max(0));
                Ok(*speed)
            }
            other => Err(ItemError::NotAVehicle(other.type_tag())),
        }
    }

    pub fn humanity_cost(&self) -> Option<&HumanityCost> {
        match &self.data {
            ItemData::Cyberware(cyberware) => Some(&cyberware.humanity_cost),
            _ => None,
        }
    }

    pub fn humanity_loss(&self) -> Option<f64> {
        match &self.data {
            ItemData::Cyberware(cyberware) => Some(cyberware.humanity_loss),
            _ => None,
        }
    }

    // None for records without humanity fields.
    pub fn resolve_humanity_loss(&self, roller: &mut dyn DiceRoller) -> Option<HumanityLoss> {
        self.humanity_cost()
            .map(|cost| resolve_humanity_cost(cost, roller))
    }

    // Returns false when the record has no humanity-loss field.
    pub fn set_humanity_loss(&mut self, value: f64) -> bool {
        match &mut self.data {
            ItemData::Cyberware(cyberware) => {
                cyberware.humanity_loss = value;
                true
            }
            _ => false,
        }
    }
}
