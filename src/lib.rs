//! Virtual-coin merch service: authenticate, inspect balance and history,
//! send coins to other users and spend them on catalog items.

pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod merch;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
