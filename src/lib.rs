pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod testing;

pub use application::error::{ApplicationError, Result};
