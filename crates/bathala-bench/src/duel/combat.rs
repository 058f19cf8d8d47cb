use super::RunnerError;
use crate::config::{CreatureConfig, PlayerConfig};
use bathala_ai::{CandidateMode, CreatureAi, Effect, Observation};
use bathala_core::combat::{CombatState, CombatantState, Side};
use bathala_core::eval::{HandEvaluator, SpecialEffect};
use bathala_core::model::card::Card;
use bathala_core::model::deck::{Deck, DeckTheme};
use bathala_core::model::hand::Hand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEAL_AMOUNT: i32 = 5;
const CREATURE_DECK_SALT: u64 = 0xB47A_1A00_C0DE_0001;

pub(crate) struct CombatSetup<'a> {
    pub player: &'a PlayerConfig,
    pub creature: &'a CreatureConfig,
    pub max_turns: u32,
    pub hand_size: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatOutcome {
    pub winner: Side,
    /// Turn limit reached; counted as a player win.
    pub timed_out: bool,
    pub turns: u32,
    pub player_health: i32,
    pub ai_health: i32,
    pub ai_damage_dealt: u32,
    pub player_damage_dealt: u32,
    pub decisions: u32,
    pub bluffs: u32,
    pub passes: u32,
}

/// Endless themed deck: reshuffles a fresh copy when empty, skipping cards
/// still held in hand.
struct DrawPile {
    theme: DeckTheme,
    rng: StdRng,
    pile: Vec<Card>,
}

impl DrawPile {
    fn new(theme: DeckTheme, seed: u64) -> Self {
        Self {
            theme,
            rng: StdRng::seed_from_u64(seed),
            pile: Vec::new(),
        }
    }

    fn refill(&mut self, hand: &mut Hand, size: usize) {
        while hand.len() < size {
            if self.pile.is_empty() {
                let mut deck = Deck::themed(self.theme, &mut self.rng);
                let remaining = deck.remaining();
                self.pile = deck
                    .draw(remaining)
                    .into_iter()
                    .filter(|card| !holds_slot(hand, card))
                    .collect();
            }
            match self.pile.pop() {
                Some(card) => hand.add(card),
                None => break,
            }
        }
    }
}

/// Themed reshuffles recolour cards, so a held card blocks its rank and suit.
fn holds_slot(hand: &Hand, card: &Card) -> bool {
    hand.iter().any(|held| held.rank == card.rank && held.suit == card.suit)
}

/// Damage goes through block first; returns what reached health.
fn strike(target: &mut CombatantState, damage: u32) -> u32 {
    let damage = i32::try_from(damage).unwrap_or(i32::MAX);
    let absorbed = damage.min(target.block);
    target.block -= absorbed;
    let through = damage - absorbed;
    let dealt = through.min(target.health);
    target.health -= dealt;
    dealt as u32
}

fn heal(target: &mut CombatantState) {
    target.health = (target.health + HEAL_AMOUNT).min(target.max_health);
}

fn add_block(target: &mut CombatantState, block: u32) {
    let block = i32::try_from(block).unwrap_or(i32::MAX);
    target.block = target.block.saturating_add(block);
}

/// Plays one combat: the AI acts, then the scripted player answers with its
/// best subset and the AI observes that play.
pub(crate) fn play_combat<R: Rng>(
    ai: &mut CreatureAi<R>,
    setup: &CombatSetup<'_>,
) -> Result<CombatOutcome, RunnerError> {
    let mut player = CombatantState::full(setup.player.health);
    let mut creature = CombatantState::full(setup.creature.health);
    let mut player_pile = DrawPile::new(setup.player.theme, setup.seed);
    let mut creature_pile = DrawPile::new(
        setup.creature.deck_theme(),
        setup.seed ^ CREATURE_DECK_SALT,
    );
    let mut player_hand = Hand::new();
    let mut creature_hand = Hand::new();
    let holds_cards = setup.creature.mode == CandidateMode::CardSubsets;

    let mut outcome = CombatOutcome {
        winner: Side::Player,
        timed_out: true,
        turns: setup.max_turns,
        player_health: 0,
        ai_health: 0,
        ai_damage_dealt: 0,
        player_damage_dealt: 0,
        decisions: 0,
        bluffs: 0,
        passes: 0,
    };

    for turn in 1..=setup.max_turns {
        creature.block = 0;
        if holds_cards {
            creature_pile.refill(&mut creature_hand, setup.hand_size);
        }
        let state =
            CombatState::new(player, creature, turn).with_hand(creature_hand.cards().to_vec());
        let decision = ai.decide(&state)?;
        outcome.decisions += 1;
        outcome.bluffs += u32::from(decision.bluff);
        outcome.passes += u32::from(decision.is_pass());

        outcome.ai_damage_dealt += strike(&mut player, decision.estimated_damage);
        add_block(&mut creature, decision.estimated_block);
        if decision.effects.contains(&Effect::Hand(SpecialEffect::Heal)) {
            heal(&mut creature);
        }
        creature_hand.remove_all(decision.cards());
        if player.is_defeated() {
            outcome.winner = Side::Ai;
            outcome.timed_out = false;
            outcome.turns = turn;
            break;
        }

        player.block = 0;
        player_pile.refill(&mut player_hand, setup.hand_size);
        let best = HandEvaluator::best_subset(player_hand.cards())?;
        outcome.player_damage_dealt += strike(&mut creature, best.evaluation.damage);
        add_block(&mut player, best.evaluation.block);
        if best.evaluation.has_effect(SpecialEffect::Heal) {
            heal(&mut player);
        }
        player_hand.remove_all(&best.cards);

        let observed =
            CombatState::new(player, creature, turn).with_hand(creature_hand.cards().to_vec());
        ai.record_opponent_action(&Observation::Cards(best.cards), turn, &observed)?;
        if creature.is_defeated() {
            outcome.timed_out = false;
            outcome.turns = turn;
            break;
        }
    }

    outcome.player_health = player.health;
    outcome.ai_health = creature.health;
    Ok(outcome)
}
