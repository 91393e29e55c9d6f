//! Core types and definitions for the STARMAP galaxy runtime.
//!
//! This crate defines the vocabulary shared by the simulation crate:
//! identifiers, galaxy records, hecs components, input definitions,
//! configuration, errors and renderer-facing snapshots.
//! It holds no algorithms beyond small record helpers.

pub mod components;
pub mod config;
pub mod constants;
pub mod defs;
pub mod entities;
pub mod enums;
pub mod error;
pub mod flags;
pub mod state;
pub mod types;
