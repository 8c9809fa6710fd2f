// SPDX-FileCopyrightText: 2026 Moodo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional grammar correction: a pure text-to-text filter over the
//! LanguageTool HTTP API.
//!
//! Disabled by default. Failures never block ingestion -- the dispatcher
//! falls back to the uncorrected text.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moodo_config::model::GrammarConfig;
use moodo_core::MoodoError;
use serde::Deserialize;

/// A text-to-text correction filter.
#[async_trait]
pub trait GrammarCorrector: Send + Sync {
    async fn correct(&self, text: &str) -> Result<String, MoodoError>;
}

/// The no-op pass-through used when correction is disabled.
pub struct NoopCorrector;

#[async_trait]
impl GrammarCorrector for NoopCorrector {
    async fn correct(&self, text: &str) -> Result<String, MoodoError> {
        Ok(text.to_string())
    }
}

/// LanguageTool-backed corrector.
pub struct LanguageToolCorrector {
    client: reqwest::Client,
    endpoint: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct LtResponse {
    #[serde(default)]
    matches: Vec<LtMatch>,
}

#[derive(Debug, Deserialize)]
struct LtMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
}

#[derive(Debug, Deserialize)]
struct LtReplacement {
    value: String,
}

impl LanguageToolCorrector {
    pub fn new(config: &GrammarConfig) -> Result<Self, MoodoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MoodoError::Grammar {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl GrammarCorrector for LanguageToolCorrector {
    async fn correct(&self, text: &str) -> Result<String, MoodoError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await
            .map_err(|e| MoodoError::Grammar {
                message: format!("LanguageTool request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let parsed: LtResponse = response.json().await.map_err(|e| MoodoError::Grammar {
            message: format!("LanguageTool response malformed: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(apply_matches(text, &parsed.matches))
    }
}

/// Apply LanguageTool matches using each match's first replacement.
///
/// Matches are applied right-to-left so earlier offsets stay valid.
/// Offsets and lengths are counted in characters.
fn apply_matches(text: &str, matches: &[LtMatch]) -> String {
    let mut chars: Vec<char> = text.chars().collect();

    let mut ordered: Vec<&LtMatch> = matches.iter().collect();
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));

    for m in ordered {
        let Some(replacement) = m.replacements.first() else {
            continue;
        };
        if m.offset + m.length > chars.len() {
            continue;
        }
        chars.splice(m.offset..m.offset + m.length, replacement.value.chars());
    }

    chars.into_iter().collect()
}

/// Build the corrector the config asks for.
pub fn corrector_from_config(
    config: &GrammarConfig,
) -> Result<Arc<dyn GrammarCorrector>, MoodoError> {
    if config.enabled {
        Ok(Arc::new(LanguageToolCorrector::new(config)?))
    } else {
        Ok(Arc::new(NoopCorrector))
    }
}
