mod profile;
mod roster;

pub use profile::{Archetype, PersonalityProfile};
pub(crate) use profile::unit;
