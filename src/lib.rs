//! Client for the movie review system program: account schemas, instruction
//! builders, PDA helpers, an RPC-backed data-access service, and an HTTP
//! server exposing the dashboard API and the review-submission action.

pub mod chain;
pub mod cluster;
pub mod config;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod server;
pub mod service;
pub mod state;
pub mod validation;

pub use error::{Error, Result};
