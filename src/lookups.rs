// lookups.rs
// Option tables for the item sheet. Record fields store the display label of
// each enum, so the option lists handed to the renderer are label lists too.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum WeaponType {
    #[default]
    Pistol,
    #[serde(rename = "SMG")]
    #[strum(serialize = "SMG")]
    Submachinegun,
    Shotgun,
    Rifle,
    Heavy,
    Melee,
    Exotic,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum AttackType {
    // Ranged
    #[default]
    Single,
    Burst,
    FullAuto,
    Suppressive,
    Area,
    // Melee
    Melee,
    Strike,
    Kick,
    Block,
    Dodge,
    Disarm,
    Throw,
    Hold,
    Escape,
    Choke,
    Sweep,
    Grapple,
    Ram,
}

impl AttackType {
    pub fn is_melee(&self) -> bool {
        !matches!(
            self,
            AttackType::Single
                | AttackType::Burst
                | AttackType::FullAuto
                | AttackType::Suppressive
                | AttackType::Area
        )
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum Concealability {
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Pocket,
    #[default]
    #[serde(rename = "J")]
    #[strum(serialize = "J")]
    Jacket,
    #[serde(rename = "L")]
    #[strum(serialize = "L")]
    LongCoat,
    #[serde(rename = "N")]
    #[strum(serialize = "N")]
    NoHide,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum Availability {
    #[serde(rename = "E")]
    #[strum(serialize = "E")]
    Excellent,
    #[default]
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    Common,
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Poor,
    #[serde(rename = "R")]
    #[strum(serialize = "R")]
    Rare,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum Reliability {
    #[serde(rename = "VR")]
    #[strum(serialize = "VR")]
    VeryReliable,
    #[default]
    #[serde(rename = "ST")]
    #[strum(serialize = "ST")]
    Standard,
    #[serde(rename = "UR")]
    #[strum(serialize = "UR")]
    Unreliable,
}

// Character stats. Skills name the stat they are based on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stat {
    Int,
    #[default]
    Ref,
    Tech,
    Cool,
    Attr,
    Luck,
    Ma,
    Bt,
    Emp,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum CyberdeckType {
    #[default]
    Desktop,
    Portable,
    Cellular,
    Cyberterminal,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
pub enum ProgramClass {
    Intrusion,
    Decryption,
    Detection,
    AntiSystem,
    AntiProgram,
    AntiPersonnel,
    Evasion,
    Stealth,
    Protection,
    #[default]
    Utility,
    Demon,
}

// Stock lookups, built on first use.
pub static STANDARD_LOOKUPS: Lazy<Lookups> = Lazy::new(Lookups::standard);

fn labels<T: IntoEnumIterator + ToString>() -> Vec<String> {
    T::iter().map(|v| v.to_string()).collect()
}

fn sorted_labels<T: IntoEnumIterator + ToString>() -> Vec<String> {
    let mut labels = labels::<T>();
    labels.sort();
    labels
}

/// Option tables the view adapter draws from.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it after
/// construction. The only configurable part is the weapon type to attack
/// skill table, which house rules may override from settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookups {
    attack_skills: BTreeMap<WeaponType, Vec<String>>,
}

impl Default for Lookups {
    fn default() -> Self {
        Self::standard()
    }
}

impl Lookups {
    pub fn standard() -> Self {
        let attack_skills = WeaponType::iter()
            .map(|weapon_type| {
                let skills: &[&str] = match weapon_type {
                    WeaponType::Pistol => &["Handgun"],
                    WeaponType::Submachinegun => &["Submachinegun"],
                    WeaponType::Shotgun | WeaponType::Rifle => &["Rifle"],
                    WeaponType::Heavy => &["HeavyWeapons"],
                    WeaponType::Melee => &["Fencing", "Melee"],
                    WeaponType::Exotic => &[],
                };
                (
                    weapon_type,
                    skills.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect();
        Self { attack_skills }
    }

    // Replace the skill list of every weapon type present in `overrides`.
    pub fn with_attack_skills(mut self, overrides: &BTreeMap<WeaponType, Vec<String>>) -> Self {
        for (weapon_type, skills) in overrides {
            self.attack_skills.insert(*weapon_type, skills.clone());
        }
        self
    }

    pub fn weapon_types_sorted(&self) -> Vec<String> {
        sorted_labels::<WeaponType>()
    }

    pub fn attack_types_sorted(&self) -> Vec<String> {
        sorted_labels::<AttackType>()
    }

    pub fn melee_attack_types_sorted(&self) -> Vec<String> {
        let mut melee: Vec<String> = AttackType::iter()
            .filter(AttackType::is_melee)
            .map(|a| a.to_string())
            .collect();
        melee.sort();
        melee
    }

    // Melee weapons only offer melee attacks.
    pub fn attack_types_for(&self, weapon_type: WeaponType) -> Vec<String> {
        if weapon_type == WeaponType::Melee {
            self.melee_attack_types_sorted()
        } else {
            self.attack_types_sorted()
        }
    }

    pub fn concealabilities(&self) -> Vec<String> {
        labels::<Concealability>()
    }

    pub fn availabilities(&self) -> Vec<String> {
        labels::<Availability>()
    }

    pub fn reliabilities(&self) -> Vec<String> {
        labels::<Reliability>()
    }

    // Skill identifiers (unlocalized) for a weapon type. Empty when the type has none.
    pub fn attack_skills_for(&self, weapon_type: WeaponType) -> &[String] {
        self.attack_skills
            .get(&weapon_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stat_names(&self) -> Vec<String> {
        labels::<Stat>()
    }

    pub fn cyberdeck_types(&self) -> Vec<String> {
        labels::<CyberdeckType>()
    }

    pub fn program_classes(&self) -> Vec<String> {
        labels::<ProgramClass>()
    }
}
