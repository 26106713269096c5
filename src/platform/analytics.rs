//! Analytics collaborator
//!
//! Receives the final score once per run. Failures are logged and dropped;
//! gameplay never waits on or reacts to analytics.

use std::fmt;

/// A single analytics event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub category: &'static str,
    pub label: &'static str,
    pub value: u32,
}

impl AnalyticsEvent {
    pub fn final_score(score: u32) -> Self {
        Self {
            category: "game",
            label: "final_score",
            value: score,
        }
    }
}

/// Why an event could not be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// No analytics backend on the page
    Unavailable,
    /// Backend rejected or threw
    Rejected(String),
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::Unavailable => write!(f, "analytics backend unavailable"),
            AnalyticsError::Rejected(reason) => write!(f, "analytics event rejected: {}", reason),
        }
    }
}

impl std::error::Error for AnalyticsError {}

/// Something that can receive analytics events
pub trait Analytics {
    fn report(&mut self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Deliver an event, logging and discarding any failure
pub fn report_quietly(analytics: &mut dyn Analytics, event: &AnalyticsEvent) {
    if let Err(e) = analytics.report(event) {
        log::warn!("Dropped analytics event {}/{}: {}", event.category, event.label, e);
    }
}

/// Writes events to the log; used natively
#[derive(Debug, Default)]
pub struct LogAnalytics;

impl Analytics for LogAnalytics {
    fn report(&mut self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        log::info!(
            "analytics: category={} label={} value={}",
            event.category,
            event.label,
            event.value
        );
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod gtag {
    use wasm_bindgen::prelude::*;

    use super::{Analytics, AnalyticsError, AnalyticsEvent};

    #[wasm_bindgen(inline_js = "
        export function send_gtag_event(category, label, value) {
            if (typeof gtag !== 'function') {
                return 'unavailable';
            }
            try {
                gtag('event', label, { event_category: category, event_label: label, value: value });
                return '';
            } catch (e) {
                return String(e);
            }
        }
    ")]
    extern "C" {
        fn send_gtag_event(category: &str, label: &str, value: u32) -> String;
    }

    /// Google Analytics `gtag` on the hosting page
    #[derive(Debug, Default)]
    pub struct GtagAnalytics;

    impl Analytics for GtagAnalytics {
        fn report(&mut self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
            match send_gtag_event(event.category, event.label, event.value).as_str() {
                "" => Ok(()),
                "unavailable" => Err(AnalyticsError::Unavailable),
                reason => Err(AnalyticsError::Rejected(reason.to_string())),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use gtag::GtagAnalytics;
