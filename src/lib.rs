pub mod instruction;
pub mod core;
pub mod warrior;
pub mod mars;
pub mod warriors;
pub mod tactics;
