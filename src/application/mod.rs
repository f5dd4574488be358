pub mod dto;
pub mod player_service;
