pub mod app;
pub mod calculator;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod output;
pub mod render;
pub mod utils;

#[cfg(test)]
mod tests;
