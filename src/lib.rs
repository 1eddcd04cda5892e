pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod fileenc;
pub mod sharding;
pub mod storage;
pub mod vault;
