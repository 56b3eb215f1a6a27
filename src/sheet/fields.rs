// sheet/fields.rs
// Record fields the sheet can edit by stepping through an option list.
use serde::Serialize;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::ItemError;
use crate::item::ItemData;

use super::ItemView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum SheetField {
    WeaponType,
    AttackType,
    Concealability,
    Availability,
    Reliability,
    AttackSkill,
    Stat,
    DeckType,
    ProgramClass,
}

fn parse<T: FromStr>(field: SheetField, value: &str) -> Result<T, ItemError> {
    value.parse().map_err(|_| ItemError::InvalidOption {
        field: field.label(),
        value: value.to_string(),
    })
}

impl SheetField {
    // Same wording as the detail lines, so the renderer can mark the focused one.
    pub fn label(&self) -> &'static str {
        match self {
            SheetField::WeaponType => "Weapon type",
            SheetField::AttackType => "Attack type",
            SheetField::Concealability => "Concealability",
            SheetField::Availability => "Availability",
            SheetField::Reliability => "Reliability",
            SheetField::AttackSkill => "Attack skill",
            SheetField::Stat => "Stat",
            SheetField::DeckType => "Deck type",
            SheetField::ProgramClass => "Class",
        }
    }

    pub fn options<'a>(&self, view: &'a ItemView) -> Option<&'a [String]> {
        match self {
            SheetField::WeaponType => view.weapon_types.as_deref(),
            SheetField::AttackType => view.attack_types.as_deref(),
            SheetField::Concealability => view.concealabilities.as_deref(),
            SheetField::Availability => view.availabilities.as_deref(),
            SheetField::Reliability => view.reliabilities.as_deref(),
            SheetField::AttackSkill => view.attack_skills.as_deref(),
            SheetField::Stat => view.stats.as_deref(),
            SheetField::DeckType => view.cyberdeck_types.as_deref(),
            SheetField::ProgramClass => view.program_classes.as_deref(),
        }
    }

    // The record's current value as an option label, or None when the record
    // type has no such field.
    pub fn value(&self, data: &ItemData) -> Option<String> {
        match (self, data) {
            (SheetField::WeaponType, ItemData::Weapon(w)) => Some(w.weapon_type.to_string()),
            (SheetField::AttackType, ItemData::Weapon(w)) => Some(w.attack_type.to_string()),
            (SheetField::Concealability, ItemData::Weapon(w)) => Some(w.concealability.to_string()),
            (SheetField::Availability, ItemData::Weapon(w)) => Some(w.availability.to_string()),
            (SheetField::Reliability, ItemData::Weapon(w)) => Some(w.reliability.to_string()),
            (SheetField::AttackSkill, ItemData::Weapon(w)) => Some(w.attack_skill.clone()),
            (SheetField::Stat, ItemData::Skill(s)) => Some(s.stat.to_string()),
            (SheetField::DeckType, ItemData::Cyberdeck(d)) => Some(d.deck_type.to_string()),
            (SheetField::ProgramClass, ItemData::Program(p)) => Some(p.program_class.to_string()),
            _ => None,
        }
    }

    pub fn set(&self, data: &mut ItemData, value: &str) -> Result<(), ItemError> {
        let field = *self;
        match (field, data) {
            (SheetField::WeaponType, ItemData::Weapon(w)) => {
                w.set_weapon_type(parse(field, value)?)
            }
            (SheetField::AttackType, ItemData::Weapon(w)) => w.attack_type = parse(field, value)?,
            (SheetField::Concealability, ItemData::Weapon(w)) => {
                w.concealability = parse(field, value)?
            }
            (SheetField::Availability, ItemData::Weapon(w)) => {
                w.availability = parse(field, value)?
            }
            (SheetField::Reliability, ItemData::Weapon(w)) => w.reliability = parse(field, value)?,
            (SheetField::AttackSkill, ItemData::Weapon(w)) => w.attack_skill = value.to_string(),
            (SheetField::Stat, ItemData::Skill(s)) => s.stat = parse(field, value)?,
            (SheetField::DeckType, ItemData::Cyberdeck(d)) => d.deck_type = parse(field, value)?,
            (SheetField::ProgramClass, ItemData::Program(p)) => {
                p.program_class = parse(field, value)?
            }
            (field, data) => {
                return Err(ItemError::NoSuchField {
                    field: field.label(),
                    item_type: data.type_tag(),
                });
            }
        }
        Ok(())
    }
}

// Fields the record has and the view offers at least one option for, in
// sheet order.
pub fn editable_fields(view: &ItemView) -> Vec<SheetField> {
    SheetField::iter()
        .filter(|field| field.value(&view.item.data).is_some())
        .filter(|field| field.options(view).is_some_and(|options| !options.is_empty()))
        .collect()
}
