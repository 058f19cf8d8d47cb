use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Elemental tag carried by every card.
///
/// The declaration order is significant: it is the fixed enumeration order used
/// to break frequency ties.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Element {
    Fire = 0,
    Water = 1,
    Earth = 2,
    Air = 3,
    Neutral = 4,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Neutral,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Element::Fire),
            1 => Some(Element::Water),
            2 => Some(Element::Earth),
            3 => Some(Element::Air),
            4 => Some(Element::Neutral),
            _ => None,
        }
    }

    /// The element that best offsets `self`.
    pub const fn counter(self) -> Element {
        match self {
            Element::Fire => Element::Water,
            Element::Water => Element::Fire,
            Element::Earth => Element::Air,
            Element::Air => Element::Earth,
            Element::Neutral => Element::Neutral,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        Element::ALL
            .iter()
            .copied()
            .find(|element| element.name() == lowered)
            .ok_or_else(|| format!("unknown element '{lowered}'"))
    }
}

/// Per-element counts for a group of cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementTally {
    counts: [u8; Element::COUNT],
}

impl ElementTally {
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        let mut tally = Self::default();
        for element in elements {
            tally.add(element);
        }
        tally
    }

    pub fn add(&mut self, element: Element) {
        let slot = &mut self.counts[element.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn count(&self, element: Element) -> u8 {
        self.counts[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&count| count as u32).sum()
    }

    /// True when at least one element is present and every entry shares it.
    pub fn is_pure(&self, element: Element) -> bool {
        let total = self.total();
        total > 0 && self.count(element) as u32 == total
    }

    /// Most frequent element, ties resolved by enumeration order.
    pub fn dominant(&self) -> Option<Element> {
        let mut best: Option<(Element, u8)> = None;
        for element in Element::ALL {
            let count = self.count(element);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((element, count)),
            }
        }
        best.map(|(element, _)| element)
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, ElementTally};

    #[test]
    fn counters_pair_up() {
        assert_eq!(Element::Fire.counter(), Element::Water);
        assert_eq!(Element::Water.counter(), Element::Fire);
        assert_eq!(Element::Earth.counter(), Element::Air);
        assert_eq!(Element::Air.counter(), Element::Earth);
        assert_eq!(Element::Neutral.counter(), Element::Neutral);
        for element in Element::ALL {
            assert_eq!(element.counter().counter(), element);
        }
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("Earth".parse::<Element>(), Ok(Element::Earth));
        assert!("lightning".parse::<Element>().is_err());
    }

    #[test]
    fn dominant_prefers_enumeration_order_on_ties() {
        let tally = ElementTally::from_elements([Element::Air, Element::Water, Element::Air, Element::Water]);
        assert_eq!(tally.dominant(), Some(Element::Water));
        assert_eq!(ElementTally::default().dominant(), None);
    }

    #[test]
    fn purity_requires_every_entry() {
        let pure = ElementTally::from_elements([Element::Air; 3]);
        assert!(pure.is_pure(Element::Air));
        let mixed = ElementTally::from_elements([Element::Air, Element::Neutral]);
        assert!(!mixed.is_pure(Element::Air));
    }
}
