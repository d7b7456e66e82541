mod bot_controller;
mod candidates;
mod difficulty;
mod evaluator;
mod search_config;
mod transposition;
mod zobrist;

pub use bot_controller::{AiSearchResult, BotInput, TIME_CHECK_INTERVAL, WIN_SCORE, compute_move};
pub use difficulty::{DepthPolicy, Difficulty};
pub use evaluator::evaluate;
pub use search_config::SearchConfig;
