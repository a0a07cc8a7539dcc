pub mod common;
pub mod config;
pub mod error;
pub mod frontier;
pub mod map;
pub mod script;
pub mod search;
pub mod stat;
