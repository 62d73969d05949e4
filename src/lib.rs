pub mod adb;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod output;
pub mod progress;
pub mod transfer;
pub mod utils;

#[cfg(test)]
pub mod testing;



#[cfg(test)]
mod error_test;
