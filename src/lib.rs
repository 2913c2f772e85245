pub mod cli;
pub mod config;
pub mod crew;
pub mod error;
pub mod observe;
pub mod pipelines;
pub mod tools;
