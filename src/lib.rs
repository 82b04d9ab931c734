pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod grid;
pub mod replay;
pub mod session;
pub mod solvers;

pub use error::{Error, Result};
