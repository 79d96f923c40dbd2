//! Command implementations

pub mod export;
pub mod init;
pub mod preview;
pub mod validate;
