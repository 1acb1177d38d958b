// Data models and display helpers shared by the engine library and its CLI.
pub mod models;
pub mod utils;
