use super::profile::Archetype;

const ROSTER: &[(&str, Archetype)] = &[
    ("tikbalang", Archetype::Chaotic),
    ("dwende", Archetype::Cautious),
    ("kapre", Archetype::Elemental),
    ("sigbin", Archetype::Aggressive),
    ("tiyanak", Archetype::Cautious),
    ("manananggal", Archetype::Adaptive),
    ("aswang", Archetype::Aggressive),
    ("duwende chief", Archetype::Calculating),
    ("bakunawa", Archetype::Adaptive),
    ("forest goblin", Archetype::Cautious),
    ("fire elemental", Archetype::Elemental),
    ("shadow beast", Archetype::Aggressive),
    ("ancient dragon", Archetype::Adaptive),
];

impl Archetype {
    /// Archetype a named creature fights with; unknown names calculate.
    pub fn for_creature(name: &str) -> Archetype {
        let wanted = name.trim().to_ascii_lowercase();
        ROSTER
            .iter()
            .find(|(creature, _)| *creature == wanted)
            .map(|(_, archetype)| *archetype)
            .unwrap_or(Archetype::Calculating)
    }
}

#[cfg(test)]
mod tests {
    use super::Archetype;

    #[test]
    fn known_creatures_map_to_their_archetype() {
        assert_eq!(Archetype::for_creature("Tikbalang"), Archetype::Chaotic);
        assert_eq!(Archetype::for_creature("Duwende Chief"), Archetype::Calculating);
        assert_eq!(Archetype::for_creature("  kapre "), Archetype::Elemental);
    }

    #[test]
    fn unknown_creatures_calculate() {
        assert_eq!(Archetype::for_creature("Minotaur"), Archetype::Calculating);
        assert_eq!(Archetype::for_creature(""), Archetype::Calculating);
    }
}
