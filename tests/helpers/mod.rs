pub mod catalog;
pub mod cli;
