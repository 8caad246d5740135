//! Compose article use case
//!
//! Runs a collaboration session and, when it yields a draft, asks the provider
//! cascade for a cover illustration derived from that draft. A cascade failure
//! never discards the draft.

use crate::ports::progress::{CascadeProgress, CollaborationProgress, NoProgress};
use crate::use_cases::collaborate::{CollaborateError, CollaborateInput, CollaborationController};
use crate::use_cases::generate_media::ProviderCascade;
use draftloop_domain::{
    CascadeResult, CollaborationResult, MediaRequest, PromptTemplate, TerminationReason,
};
use serde::Serialize;
use tracing::{info, warn};

/// Input for the ComposeArticle use case
#[derive(Debug, Clone)]
pub struct ComposeArticleInput {
    pub collaboration: CollaborateInput,
    /// Skip the illustration step entirely when false
    pub illustrate: bool,
    pub illustration_style: Option<String>,
    pub image_size: Option<String>,
}

impl ComposeArticleInput {
    pub fn new(collaboration: CollaborateInput) -> Self {
        Self {
            collaboration,
            illustrate: true,
            illustration_style: None,
            image_size: None,
        }
    }

    pub fn without_illustration(mut self) -> Self {
        self.illustrate = false;
        self
    }

    pub fn with_illustration_style(mut self, style: impl Into<String>) -> Self {
        self.illustration_style = Some(style.into());
        self
    }

    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = Some(size.into());
        self
    }
}

/// Output of the ComposeArticle use case
#[derive(Debug, Clone, Serialize)]
pub struct ArticleOutput {
    pub collaboration: CollaborationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illustration: Option<CascadeResult>,
    /// Why the cascade could not run, if it was attempted and errored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illustration_error: Option<String>,
}

/// Use case pairing the collaboration loop with a cover illustration
pub struct ComposeArticleUseCase {
    controller: CollaborationController,
    cascade: ProviderCascade,
}

impl ComposeArticleUseCase {
    pub fn new(controller: CollaborationController, cascade: ProviderCascade) -> Self {
        Self {
            controller,
            cascade,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: ComposeArticleInput) -> Result<ArticleOutput, CollaborateError> {
        self.execute_with_progress(input, &NoProgress, &NoProgress)
            .await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ComposeArticleInput,
        collaboration_progress: &dyn CollaborationProgress,
        cascade_progress: &dyn CascadeProgress,
    ) -> Result<ArticleOutput, CollaborateError> {
        let collaboration = self
            .controller
            .run_with_progress(input.collaboration.clone(), collaboration_progress)
            .await?;

        let mut output = ArticleOutput {
            collaboration,
            illustration: None,
            illustration_error: None,
        };

        if !input.illustrate {
            return Ok(output);
        }
        if output.collaboration.termination_reason == TerminationReason::Cancelled {
            info!("Collaboration was cancelled, skipping illustration");
            return Ok(output);
        }
        let Some(draft) = output.collaboration.draft.as_ref() else {
            info!("No draft produced, skipping illustration");
            return Ok(output);
        };

        let prompt = PromptTemplate::illustration_prompt(draft, input.illustration_style.as_deref());
        let mut request = MediaRequest::image(prompt);
        if let Some(size) = input.image_size {
            request = request.with_size(size);
        }

        match self
            .cascade
            .generate_with_progress(&request, cascade_progress)
            .await
        {
            Ok(result) => {
                if !result.is_success() {
                    warn!("Illustration failed: {}", result.outcome.detail);
                }
                output.illustration = Some(result);
            }
            Err(e) => {
                warn!("Illustration cascade did not run: {}", e);
                output.illustration_error = Some(e.to_string());
            }
        }

        Ok(output)
    }
}
