pub mod bot;
pub mod config;
pub mod dice;
pub mod error;
pub mod help;
pub mod logic;
pub mod parser;
pub mod roll;

pub use logic::{evaluate, evaluate_with};
