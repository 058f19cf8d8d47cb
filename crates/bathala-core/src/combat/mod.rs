//! Read-only combat snapshot handed to the AI each turn.

mod action;
mod state;

pub use action::FixedAction;
pub use state::{CombatError, CombatState, CombatantState, Side};
