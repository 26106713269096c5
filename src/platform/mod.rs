//! Platform collaborators
//!
//! Handles the parts of the browser the simulation reports to but never
//! depends on:
//! - Viewport scaling on resize
//! - Analytics for the final score

pub mod analytics;
pub mod viewport;

pub use analytics::{
    Analytics, AnalyticsError, AnalyticsEvent, LogAnalytics, report_quietly,
};
pub use viewport::Viewport;
