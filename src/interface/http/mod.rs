pub mod envelope;
pub mod players_handler;
