//! Core library for the reward-swap-client project.
//!
//! The binary (`main.rs`) wires configuration, the ledger connection and
//! the [`swap_client::SwapClient`] together; everything that talks to the
//! node sits behind the [`dex::Ledger`] trait.

pub mod config;
pub mod dex;
pub mod errors;
pub mod models;
pub mod swap_client;
pub mod utils;
