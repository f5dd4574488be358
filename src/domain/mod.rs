pub mod errors;
pub mod player;
