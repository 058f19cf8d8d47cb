use super::scoring::{Factor, ScoreBreakdown};
use crate::personality::Archetype;
use bathala_core::model::element::Element;
use serde::Serialize;
use std::fmt::Write as _;

/// Why a decision was made, kept structured with the text rendered from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reasoning {
    pub archetype: Archetype,
    pub breakdown: Option<ScoreBreakdown>,
    pub dominant: Option<Factor>,
    pub bluff: bool,
    pub counter_element: Option<Element>,
    pub text: String,
}

impl Reasoning {
    pub(crate) fn explain(
        archetype: Archetype,
        choice: &str,
        breakdown: ScoreBreakdown,
        bluff: bool,
        counter_element: Option<Element>,
    ) -> Self {
        let dominant = breakdown.dominant();
        let mut text = format!(
            "{} creature {}: {choice}; {dominant} dominates (",
            capitalised(archetype),
            phrase(archetype),
        );
        for (index, (factor, value)) in breakdown.contributions().iter().enumerate() {
            if index > 0 {
                text.push_str(", ");
            }
            let _ = write!(text, "{factor} {value:+.3}");
        }
        let _ = write!(text, "; utility {:.3})", breakdown.utility());
        if let Some(element) = counter_element {
            let _ = write!(text, "; countering with {element}");
        }
        if bluff {
            text.push_str("; bluffing with a weaker play");
        }

        Self {
            archetype,
            breakdown: Some(breakdown),
            dominant: Some(dominant),
            bluff,
            counter_element,
            text,
        }
    }

    pub(crate) fn pass(archetype: Archetype) -> Self {
        Self {
            archetype,
            breakdown: None,
            dominant: None,
            bluff: false,
            counter_element: None,
            text: format!(
                "{} creature {}: nothing playable, passing",
                capitalised(archetype),
                phrase(archetype)
            ),
        }
    }
}

fn phrase(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::Cautious => "guards its life",
        Archetype::Aggressive => "presses the attack",
        Archetype::Calculating => "weighs the numbers",
        Archetype::Elemental => "channels elemental synergy",
        Archetype::Chaotic => "follows its whims",
        Archetype::Adaptive => "reads the opponent",
    }
}

fn capitalised(archetype: Archetype) -> String {
    let label = archetype.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_carries_the_numbers() {
        let breakdown = ScoreBreakdown {
            damage: 0.1,
            defense: 0.25,
            risk: 0.02,
            affinity: 0.0,
            counter: -0.05,
            archetype: 0.0,
        };
        let reasoning = Reasoning::explain(
            Archetype::Cautious,
            "defend",
            breakdown,
            false,
            Some(Element::Water),
        );
        assert_eq!(reasoning.dominant, Some(Factor::Defense));
        assert!(reasoning.text.starts_with("Cautious creature guards its life: defend;"));
        assert!(reasoning.text.contains("defense dominates"));
        assert!(reasoning.text.contains("defense +0.250"));
        assert!(reasoning.text.contains("counter -0.050"));
        assert!(reasoning.text.contains("utility 0.320"));
        assert!(reasoning.text.contains("countering with water"));
        assert!(!reasoning.text.contains("bluffing"));
    }

    #[test]
    fn pass_has_no_breakdown() {
        let reasoning = Reasoning::pass(Archetype::Chaotic);
        assert!(reasoning.breakdown.is_none());
        assert_eq!(
            reasoning.text,
            "Chaotic creature follows its whims: nothing playable, passing"
        );
    }
}
