pub mod analysis;
pub mod catalog;
pub mod container;
pub mod contents;
pub mod error;
pub mod logger;
pub mod recognition;
pub mod scenario;
pub mod serving;
pub mod shake;
pub mod simulation;
