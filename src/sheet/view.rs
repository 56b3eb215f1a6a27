// sheet/view.rs
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::actor::SkillSource;
use crate::item::{Item, ItemData, Weapon};
use crate::localization::Localizer;
use crate::lookups::Lookups;

use super::{SheetField, SheetTab};

/// How record types pick their augmentation.
///
/// `Exclusive` gives each type only its own fields. `FallThrough` reproduces
/// the legacy chain where armor, skill, cyberdeck and program each also
/// receive the augmentation of every type after them in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchMode {
    #[default]
    Exclusive,
    FallThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Weapon,
    Armor,
    Skill,
    Cyberdeck,
    Program,
}

const FALL_THROUGH_CHAIN: [Stage; 4] = [Stage::Armor, Stage::Skill, Stage::Cyberdeck, Stage::Program];

// Template-ready data for one item. Optional lists are left out entirely when
// the record type doesn't use them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub item: Item,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub editable: bool,
    pub active_tab: SheetTab,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused_field: Option<SheetField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concealabilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availabilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliabilities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cyberdeck_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_classes: Option<Vec<String>>,
}

impl ItemView {
    pub(crate) fn base(item: &Item, owner: Option<&dyn SkillSource>) -> Self {
        Self {
            item: item.clone(),
            actor: owner.map(|o| o.name().to_string()),
            editable: false,
            active_tab: SheetTab::default(),
            focused_field: None,
            weapon_types: None,
            attack_types: None,
            concealabilities: None,
            availabilities: None,
            reliabilities: None,
            attack_skills: None,
            stats: None,
            cyberdeck_types: None,
            program_classes: None,
        }
    }

    // True when any type-specific list is present.
    pub fn has_options(&self) -> bool {
        self.weapon_types.is_some()
            || self.attack_types.is_some()
            || self.concealabilities.is_some()
            || self.availabilities.is_some()
            || self.reliabilities.is_some()
            || self.attack_skills.is_some()
            || self.stats.is_some()
            || self.cyberdeck_types.is_some()
            || self.program_classes.is_some()
    }
}

/// Turns a record (and its owner, when there is one) into an [`ItemView`].
/// Never touches the record itself.
#[derive(Debug, Clone)]
pub struct ViewAdapter {
    lookups: Arc<Lookups>,
    localizer: Arc<Localizer>,
    dispatch: DispatchMode,
}

impl ViewAdapter {
    pub fn new(lookups: Arc<Lookups>, localizer: Arc<Localizer>, dispatch: DispatchMode) -> Self {
        Self {
            lookups,
            localizer,
            dispatch,
        }
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    fn stages(&self, data: &ItemData) -> Vec<Stage> {
        let entry = match data {
            ItemData::Weapon(_) => return vec![Stage::Weapon],
            ItemData::Armor(_) => Stage::Armor,
            ItemData::Skill(_) => Stage::Skill,
            ItemData::Cyberdeck(_) => Stage::Cyberdeck,
            ItemData::Program(_) => Stage::Program,
            ItemData::Cyberware(_) | ItemData::Vehicle(_) | ItemData::Misc | ItemData::Unknown => {
                return Vec::new();
            }
        };
        match self.dispatch {
            DispatchMode::Exclusive => vec![entry],
            DispatchMode::FallThrough => FALL_THROUGH_CHAIN
                .iter()
                .skip_while(|stage| **stage != entry)
                .copied()
                .collect(),
        }
    }

    pub fn view(&self, item: &Item, owner: Option<&dyn SkillSource>) -> ItemView {
        let mut view = ItemView::base(item, owner);
        for stage in self.stages(&item.data) {
            match stage {
                Stage::Weapon => {
                    if let ItemData::Weapon(weapon) = &item.data {
                        self.prepare_weapon(&mut view, weapon, owner);
                    }
                }
                Stage::Armor => {}
                Stage::Skill => view.stats = Some(self.lookups.stat_names()),
                Stage::Cyberdeck => view.cyberdeck_types = Some(self.lookups.cyberdeck_types()),
                Stage::Program => view.program_classes = Some(self.lookups.program_classes()),
            }
        }
        view
    }

    fn prepare_weapon(&self, view: &mut ItemView, weapon: &Weapon, owner: Option<&dyn SkillSource>) {
        view.weapon_types = Some(self.lookups.weapon_types_sorted());
        view.attack_types = Some(self.lookups.attack_types_for(weapon.weapon_type));
        view.concealabilities = Some(self.lookups.concealabilities());
        view.availabilities = Some(self.lookups.availabilities());
        view.reliabilities = Some(self.lookups.reliabilities());
        view.attack_skills = Some(self.attack_skills(weapon, owner));
    }

    // Fixed skills for the weapon type plus the owner's trained martial arts.
    // With nothing to offer and an owner present, fall back to every skill the
    // owner knows, sorted.
    pub fn attack_skills(&self, weapon: &Weapon, owner: Option<&dyn SkillSource>) -> Vec<String> {
        let mut skills: Vec<String> = self
            .lookups
            .attack_skills_for(weapon.weapon_type)
            .iter()
            .map(|skill| self.localizer.skill(skill))
            .collect();
        if let Some(owner) = owner {
            skills.extend(owner.trained_martials());
            if skills.is_empty() {
                skills = owner.learned_skill_names();
                skills.sort();
            }
        }
        skills
    }
}
