//! Dioxus components and browser glue for the flow monitoring dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the D3.js flow chart via `js_sys::eval()`
//! - `state`: Reactive AppState with Dioxus Signals
//! - `storage`: token storage over `localStorage` / `sessionStorage`
//! - `snapshot`: the per-scope data fetched on every poll
//! - `components`: sidebar tree, tables, cards, forms

pub mod components;
pub mod js_bridge;
pub mod snapshot;
pub mod state;
pub mod storage;
