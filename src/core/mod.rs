//! Core modules of the svn command-execution layer.

pub mod classify;
pub mod command;
pub mod credentials;
pub mod error;
pub mod repos;
pub mod runner;
pub mod transcript;
pub mod update;
