pub mod audit;
pub mod cli;
pub mod config;
pub mod context;
pub mod crypto;
pub mod errors;
pub mod storage;
pub mod vault;
