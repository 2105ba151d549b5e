// Library exports for the coin duel engine
// The game binary and the replay tool are thin layers over these modules

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod game;
pub mod game_log;
pub mod greedy;
pub mod moves;
pub mod render;
pub mod replay;
pub mod search;
pub mod types;
