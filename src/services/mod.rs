// RephraseAI Core Services

pub mod text_processor;
pub mod config_store;
pub mod detectors;
pub mod humanize;
pub mod analysis;

pub use text_processor::*;
pub use config_store::*;
pub use detectors::*;

pub use analysis::{build_report, reconcile, ReconcileError};
pub use humanize::{humanize, Humanizer};
