//! CLI command implementations for the gatehouse binary.

pub mod password;
pub mod serve;
pub mod token;
