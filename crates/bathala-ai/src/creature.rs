use crate::personality::Archetype;
use bathala_core::model::element::Element;
use serde::{Deserialize, Serialize};

/// Identity and base stats of the creature an AI drives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub name: String,
    pub base_damage: u32,
    pub base_block: u32,
    pub element: Element,
    #[serde(default)]
    pub abilities: Vec<String>,
}

impl CreatureProfile {
    pub fn new(name: impl Into<String>, base_damage: u32, base_block: u32, element: Element) -> Self {
        Self {
            name: name.into(),
            base_damage,
            base_block,
            element,
            abilities: Vec::new(),
        }
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn archetype(&self) -> Archetype {
        Archetype::for_creature(&self.name)
    }

    /// Ability used by the status action; "hex" when none is listed.
    pub fn status_ability(&self) -> &str {
        self.abilities.first().map(String::as_str).unwrap_or("hex")
    }
}
