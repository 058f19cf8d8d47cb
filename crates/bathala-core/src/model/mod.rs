pub mod card;
pub mod deck;
pub mod element;
pub mod hand;
pub mod rank;
pub mod suit;
