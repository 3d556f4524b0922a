// Integration tests for grantsync

pub mod cli;
pub mod helpers;
pub mod integration;
pub mod unit;
