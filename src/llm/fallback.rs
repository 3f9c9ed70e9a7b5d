//! Fallback enhancer — wraps any [`Enhancer`] and returns the input on error.
//!
//! When the underlying LLM call fails for any reason (`Request`, `Timeout`,
//! `Parse`, `EmptyResponse`) [`FallbackEnhancer`] silently returns the
//! original transcript instead of propagating the error.  This keeps the
//! pipeline functional even when Ollama is not running or the API is
//! unreachable, and it is what gives the enhancer its contract of never
//! losing text.

use async_trait::async_trait;

use crate::llm::enhancer::{EnhanceError, Enhancer};

// ---------------------------------------------------------------------------
// FallbackEnhancer
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`Enhancer`] that never returns an
/// error — on failure it returns the input unchanged.
///
/// # Example
/// ```rust
/// use flowkey::llm::{ApiEnhancer, FallbackEnhancer};
/// use flowkey::config::EnhancerConfig;
///
/// let inner = ApiEnhancer::from_config(&EnhancerConfig::default());
/// let enhancer = FallbackEnhancer::new(inner);
/// // `enhancer` now implements Enhancer and is safe to use even when the
/// // LLM backend is unavailable.
/// ```
pub struct FallbackEnhancer<E: Enhancer> {
    inner: E,
}

impl<E: Enhancer> FallbackEnhancer<E> {
    /// Wrap `inner` with fallback behaviour.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped enhancer.
    pub fn inner(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: Enhancer + Send + Sync> Enhancer for FallbackEnhancer<E> {
    /// Attempt enhancement; return `text` unchanged if any error occurs.
    ///
    /// This implementation **never** returns `Err(_)`.
    async fn enhance(&self, text: &str) -> Result<String, EnhanceError> {
        match self.inner.enhance(text).await {
            Ok(cleaned) => Ok(cleaned),
            Err(_err) => {
                log::warn!(
                    "enhancement failed — keeping raw transcript (len={})",
                    text.len()
                );
                Ok(text.to_string())
            }
        }
    }

    fn status(&self) -> String {
        self.inner.status()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
