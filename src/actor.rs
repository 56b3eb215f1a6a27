// actor.rs
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::item::{Item, ItemData, Skill};
use crate::lookups::Stat;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

// The character that owns items. Skills are items too and live in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: ActorId,
    pub name: String,
    #[serde(default)]
    pub stats: BTreeMap<Stat, i32>,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            stats: BTreeMap::new(),
        }
    }

    pub fn with_stat(mut self, stat: Stat, value: i32) -> Self {
        self.stats.insert(stat, value);
        self
    }
}

/// What the item sheet needs to know about an owning actor.
pub trait SkillSource {
    fn name(&self) -> &str;

    /// Martial art skills the actor has at least one level in.
    fn trained_martials(&self) -> Vec<String>;

    /// Names of every skill the actor has, trained or not, in no particular order.
    fn learned_skill_names(&self) -> Vec<String>;

    fn stat(&self, stat: Stat) -> i32;

    fn skill_level(&self, skill: &str) -> Option<i32>;
}

// An actor together with the items it owns, borrowed from the store.
#[derive(Debug, Clone)]
pub struct Owner<'a> {
    pub actor: &'a Actor,
    pub items: Vec<&'a Item>,
}

impl<'a> Owner<'a> {
    pub fn new(actor: &'a Actor, items: Vec<&'a Item>) -> Self {
        Self { actor, items }
    }

    pub fn skills(&self) -> impl Iterator<Item = (&'a Item, &'a Skill)> + '_ {
        self.items.iter().filter_map(|&item| match &item.data {
            ItemData::Skill(skill) => Some((item, skill)),
            _ => None,
        })
    }
}

fn same_skill(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl SkillSource for Owner<'_> {
    fn name(&self) -> &str {
        &self.actor.name
    }

    fn trained_martials(&self) -> Vec<String> {
        self.skills()
            .filter(|(_, skill)| skill.martial && skill.level > 0)
            .map(|(item, _)| item.name.clone())
            .collect()
    }

    fn learned_skill_names(&self) -> Vec<String> {
        self.skills().map(|(item, _)| item.name.clone()).collect()
    }

    fn stat(&self, stat: Stat) -> i32 {
        self.actor.stats.get(&stat).copied().unwrap_or(0)
    }

    fn skill_level(&self, skill: &str) -> Option<i32> {
        self.skills()
            .find(|(item, _)| same_skill(&item.name, skill))
            .map(|(_, s)| s.level)
    }
}
