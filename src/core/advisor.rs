use crate::domain::model::Dependency;
use crate::domain::ports::{GenerationRequest, TextGenerator};
use crate::utils::error::AppError;
use std::sync::Arc;

pub type SharedTextGenerator = Arc<dyn TextGenerator>;

const CURE_TEMPERATURE: f32 = 0.4;

/// Why a best-effort generation fell back to placeholder text.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradedReason {
    ClientUnavailable(String),
    Transport(String),
    Upstream(String),
    EmptyResponse,
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradedReason::ClientUnavailable(reason) => write!(f, "client unavailable: {}", reason),
            DegradedReason::Transport(reason) => write!(f, "transport failure: {}", reason),
            DegradedReason::Upstream(reason) => write!(f, "upstream failure: {}", reason),
            DegradedReason::EmptyResponse => write!(f, "empty response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    Generated(String),
    Degraded(DegradedReason),
}

impl Advisory {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Advisory::Degraded(_))
    }

    /// Generated text, or the placeholder built from the degradation reason.
    pub fn text_or_else<F>(self, placeholder: F) -> String
    where
        F: FnOnce(&DegradedReason) -> String,
    {
        match self {
            Advisory::Generated(text) => text,
            Advisory::Degraded(reason) => placeholder(&reason),
        }
    }
}

/// Runs one generation and folds every failure into `Advisory::Degraded`.
pub async fn generate_best_effort(
    generator: &Dependency<SharedTextGenerator>,
    request: GenerationRequest,
    purpose: &str,
) -> Advisory {
    let client = match generator {
        Dependency::Ready(client) => client,
        Dependency::Unavailable { reason } => {
            tracing::warn!(purpose, %reason, "Text generation skipped, client not initialized");
            return Advisory::Degraded(DegradedReason::ClientUnavailable(reason.clone()));
        }
    };

    match client.generate(&request).await {
        Ok(text) if text.trim().is_empty() => {
            tracing::warn!(purpose, "Text generation returned no text");
            Advisory::Degraded(DegradedReason::EmptyResponse)
        }
        Ok(text) => Advisory::Generated(text),
        Err(e) if e.is_transport() => {
            tracing::error!(purpose, error = %e, "Text generation transport error");
            Advisory::Degraded(DegradedReason::Transport(e.to_string()))
        }
        Err(e) => {
            tracing::error!(purpose, error = %e, category = ?e.category(), "Text generation failed");
            Advisory::Degraded(DegradedReason::Upstream(describe(&e)))
        }
    }
}

/// Short reason safe to show to callers; upstream bodies stay in the logs.
fn describe(err: &AppError) -> String {
    match err {
        AppError::Upstream { service, status, .. } => format!("{} returned status {}", service, status),
        other => other.to_string(),
    }
}

pub fn cure_prompt(disease: &str, language: &str) -> String {
    format!(
        "You are an agricultural expert. The detected plant disease is '{disease}'. \
         Provide the cure and preventive measures. \
         The output must be in the specified language: '{language}'. \
         Structure the response clearly with headings for 'Cure' and 'Prevention'. \
         Use simple language appropriate for a rural farmer."
    )
}

pub fn cure_placeholder(disease: &str, reason: &DegradedReason) -> String {
    match reason {
        DegradedReason::ClientUnavailable(_) => format!(
            "Error: AI text service not initialized. Cannot generate cure steps for {}.",
            disease
        ),
        DegradedReason::Transport(_) => format!(
            "Error connecting to AI service for cure. Please check network connection. Disease: {}",
            disease
        ),
        DegradedReason::Upstream(_) | DegradedReason::EmptyResponse => {
            format!("An unknown error occurred while fetching cure for {}.", disease)
        }
    }
}

/// Localized cure and prevention advice for a detected disease.
pub struct CureAdvisor {
    generator: Dependency<SharedTextGenerator>,
}

impl CureAdvisor {
    pub fn new(generator: Dependency<SharedTextGenerator>) -> Self {
        Self { generator }
    }

    /// `disease` is the raw class label, not the display form.
    pub async fn advise(&self, disease: &str, language: &str) -> Advisory {
        let request = GenerationRequest::new(cure_prompt(disease, language)).with_temperature(CURE_TEMPERATURE);
        generate_best_effort(&self.generator, request, "cure").await
    }
}
