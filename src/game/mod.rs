pub mod dice;
pub mod formation;
pub mod outcome;
pub mod rewards;
pub mod scoring;
pub mod types;
