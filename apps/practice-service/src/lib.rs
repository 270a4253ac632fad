//! Practice flows for the tutoring app: grading attempts, starting and
//! completing sessions, and reporting progress.
//!
//! Storage is reached only through [`store::PracticeStore`]; every flow takes
//! the current time as an argument.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use practice_core::{SessionComposer, Sm2};

use crate::config::ServiceConfig;
use crate::store::PracticeStore;

/// Shared application state
pub struct AppState<S: PracticeStore> {
    pub store: Arc<S>,
    pub config: Arc<ServiceConfig>,
}

impl<S: PracticeStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: PracticeStore> AppState<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Scheduler configured from the service settings.
    pub fn scheduler(&self) -> Sm2 {
        Sm2::with_retry_window(self.config.settings.short_retry_window_minutes)
    }

    /// Session composer configured from the service settings.
    pub fn composer(&self) -> SessionComposer {
        SessionComposer::from_settings(&self.config.settings)
    }
}
