//! # MVVM Application Core
//!
//! The analysis client split along MVVM lines: pure models, a service
//! layer for the wire, a session view model owning the state machine, and
//! a thin controller/view pair on top. All components are designed with
//! clear separation of concerns and testability.

pub mod controller;
pub mod input;
pub mod models;
pub mod services;
pub mod session;
pub mod view;

// Re-export core types
pub use controller::{AppController, LineSource, ScriptedLineSource, StdinLineSource};
pub use input::{InputController, ValidationError};
pub use models::{AnalysisReport, FeatureVector, MlLabel, Query, SessionState, Verdict};
pub use services::{
    AnalysisError, AnalysisService, ClassifierClient, ClassifierOutcome, RequestSeq,
};
pub use session::AnalysisSession;
pub use view::ReportView;
