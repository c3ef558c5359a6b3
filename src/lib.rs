//! reel library exports for testing

pub mod catalog;
pub mod cli;
pub mod core;

#[cfg(test)]
pub mod test_support;
