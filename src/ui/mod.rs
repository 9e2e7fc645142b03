//! Terminal rendering for the dashboard and detail views.
//!
//! All placement and color decisions are made by pure helpers
//! ([`tooltip`], [`theme`]); the render functions only lay widgets out.

pub mod common;
pub mod dashboard;
pub mod detail;
pub mod theme;
pub mod tooltip;

pub use theme::Theme;
pub use tooltip::TooltipState;
