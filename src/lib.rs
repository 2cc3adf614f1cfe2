//! # Phishline - Terminal Client for ML Phishing-URL Analysis
//!
//! Submits URLs to a remote classification service and renders the
//! verdict, the model confidence and the feature vector the model saw.
//! Built with clean MVVM architecture for maintainability and testability.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   submit    ┌──────────────────┐   dispatch   ┌─────────────┐
//! │   Input     │────────────►│ AnalysisSession  │─────────────►│ Classifier  │
//! │ Controller  │             │                  │              │  Service    │
//! │ - URL text  │             │ - Idle/Loading/  │   outcomes   │ - reqwest   │
//! │ - validation│             │   Succeeded/     │◄─────────────│ - tokio     │
//! └─────────────┘             │   Failed         │   (tagged)   │   tasks     │
//!                             └──────────────────┘              └─────────────┘
//!                                      │ state
//!                                      ▼
//!                               ┌──────────────┐
//!                               │  ReportView  │
//!                               │ - verdict    │
//!                               │ - confidence │
//!                               │ - features   │
//!                               └──────────────┘
//! ```
//!
//! Responses are tagged with the sequence number of the request that
//! produced them; only the newest request's outcome may settle the
//! session, so rapid resubmissions never leave a stale result behind.

pub mod cmd_args;
pub mod config;
pub mod profile;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
