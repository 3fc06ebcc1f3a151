pub mod cli;
pub mod commands;
pub mod formatting;
pub mod notifier;
pub mod roster;
