//! Core infrastructure for the GPBoost estimator layer.
//!
//! - [`types`]: small shared enumerations
//! - [`constants`]: hyperparameter defaults and engine vocabulary
//! - [`error`]: the crate error type
//! - [`traits`]: the engine, dataset and booster seams

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{GPBoostError, Result};
pub use traits::{Booster, Engine, TrainingData};
pub use types::*;

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initialize logging for the crate.
///
/// Installs `env_logger` once per process. `RUST_LOG` defaults to `info`
/// when unset. A logger installed by the host application is left alone.
pub fn initialize_logging() {
    LOGGING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "info");
        }
        if env_logger::try_init().is_ok() {
            log::debug!("gpboost-estimator logging initialized");
        }
    });
}
