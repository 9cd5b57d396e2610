//! `stockctl-cli`
//!
//! Thin terminal shell around the product service: configuration, prompts,
//! number parsing and the menu loop.

pub mod config;
pub mod input;
pub mod interrupt;
pub mod menu;

pub use config::Config;
pub use menu::{Menu, MenuCommand};
