//! navgate kernel library
//!
//! Permission-driven navigation for the facility console: decides which
//! menu entries a user may see and which route to open after login.
//! The `navgate` binary is a thin CLI over this library.

pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod permissions;
