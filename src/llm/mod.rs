//! LLM transcript-cleanup module.
//!
//! This module provides:
//! * [`Enhancer`] — async trait implemented by all enhancer backends.
//! * [`ApiEnhancer`] — OpenAI-compatible REST API backend.
//! * [`FallbackEnhancer`] — wraps any enhancer; returns the input on failure.
//! * [`EnhanceError`] — error variants for enhancement operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use flowkey::config::EnhancerConfig;
//! use flowkey::llm::{ApiEnhancer, Enhancer, FallbackEnhancer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = EnhancerConfig::default();
//!
//!     // Build an enhancer that never fails (falls back to the input).
//!     let enhancer = FallbackEnhancer::new(ApiEnhancer::from_config(&config));
//!
//!     let cleaned = enhancer.enhance("uh hello world i guess").await.unwrap();
//!     println!("{cleaned}");
//! }
//! ```

pub mod enhancer;
pub mod fallback;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use enhancer::{ApiEnhancer, EnhanceError, Enhancer};
pub use fallback::FallbackEnhancer;
