//! BookGPT Gateway - HTTP surface for book chat and transformation workflows
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     BookGPT Gateway                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /api/chat             POST /api/mission-vision      │
//! │  POST /api/chat/stream      POST /api/stakeholder-motivation
//! │                             POST .../revise               │
//! │                         │                                 │
//! │              ┌──────────▼──────────┐                      │
//! │              │ Generation Pipeline │  (bookgpt-core)      │
//! │              └──────────┬──────────┘                      │
//! │                         │                                 │
//! │       ┌─────────────────┼─────────────────┐               │
//! │  ┌────▼────┐      ┌─────▼────┐      ┌─────▼─────┐         │
//! │  │ Gemini  │ ───► │  OpenAI  │ ───► │ Fallback  │         │
//! │  └─────────┘      └──────────┘      └───────────┘         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every generation endpoint answers `success: true` unless the request
//! itself is invalid; an added `source` field tells provider output apart
//! from fallback content.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayState};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3004;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";
