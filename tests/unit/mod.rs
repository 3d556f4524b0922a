pub mod grammar;
pub mod policy;
