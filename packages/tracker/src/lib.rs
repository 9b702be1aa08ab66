// Federal IT Title Tracker - Core
//
// Daily jobs that poll USAJobs and GitHub, classify and aggregate what they
// find, and publish static JSON documents for the dashboard.
//
// Pure logic lives in domains/*; HTTP clients, snapshot files and scheduling
// live in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
