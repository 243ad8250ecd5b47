pub mod alias;
pub mod color;
pub mod command;
pub mod condition;
pub mod container;
pub mod file_formats;
pub mod ingredient;
pub mod liquor;
pub mod recipe;
pub mod scenario;
