// Engine library root

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod normalize;
pub mod services;
