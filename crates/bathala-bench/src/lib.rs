pub mod config;
pub mod duel;
pub mod logging;
pub mod report;
