pub mod calendar;
pub mod config;
pub mod console;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod output;
pub mod session;
pub mod stats;
