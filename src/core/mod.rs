//! # Core Application Logic
//!
//! This module contains the search screen's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (screen data)  │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │  Effect
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   search   │      │  storage   │
//!     │  Adapter   │      │   (OMDb)   │      │ (download) │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and the rendering policy (`ScreenView`)
//! - [`action`]: The `Action` enum, the `Effect` enum and `update()`
//! - [`config`]: Config file loading and resolution

pub mod action;
pub mod config;
pub mod state;
