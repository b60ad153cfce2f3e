pub mod card;
pub mod config;
pub mod deck;
pub mod document;
pub mod error;
pub mod fetch;
pub mod lookback;
pub mod normalize;
pub mod pipeline;
pub mod platform;
pub mod pool;
pub mod protocol;
pub mod scheduler;
pub mod sections;
pub mod shuffle;
pub mod state;
