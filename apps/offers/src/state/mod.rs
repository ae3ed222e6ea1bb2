//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐          ┌──────────────────────────────┐        │
//! │  │   AppContext     │          │  VisitorSession               │        │
//! │  │                  │          │                               │        │
//! │  │  AppConfig       │          │  Option<SessionDiscount>      │        │
//! │  │  Database (pool) │          │  one per visitor              │        │
//! │  └──────────────────┘          └──────────────────────────────┘        │
//! │                                                                         │
//! │  • AppContext: one per process, read-only after init                   │
//! │  • VisitorSession: owned by the caller, serializable for storage       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod context;
mod session;

pub use context::AppContext;
pub use session::VisitorSession;
