//! CryptoTrendBot
//!
//! A Telegram bot that tracks crypto market trends with AI-generated
//! analysis and alerts subscribers on qualifying signal changes.

pub mod analysis;
pub mod bot;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod scanner;
pub mod store;
pub mod types;
