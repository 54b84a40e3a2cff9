//! Viability-gated persistence of community recipe submissions.

use std::sync::Arc;

use crate::ai::{assess_recipe_viability, AiClient, FlowConfig};
use crate::error::SubmitError;
use crate::store::{RecordStore, StoredRecord};
use crate::types::{SubmitOutcome, SubmittedRecipe};

/// Stores a submission only if the viability check accepts it.
pub struct SubmissionGate {
    ai_client: Arc<dyn AiClient>,
    config: FlowConfig,
    store: Arc<dyn RecordStore<SubmittedRecipe>>,
}

impl SubmissionGate {
    pub fn new(
        ai_client: Arc<dyn AiClient>,
        config: FlowConfig,
        store: Arc<dyn RecordStore<SubmittedRecipe>>,
    ) -> Self {
        Self {
            ai_client,
            config,
            store,
        }
    }

    /// Check the recipe and append it to the store when viable.
    ///
    /// The `viability_check` switch only governs the stand-alone check; the
    /// gate always scores submissions. A store failure after a viable verdict is reported as
    /// [`SubmitError::Persistence`]; nothing is retried or rolled back.
    pub async fn submit(&self, submission: SubmittedRecipe) -> Result<SubmitOutcome, SubmitError> {
        let assessment = assess_recipe_viability(
            self.ai_client.as_ref(),
            self.config.viability_schema,
            &submission.name,
            &submission.ingredients,
            &submission.instructions,
        )
        .await?;

        if !assessment.is_viable() {
            tracing::info!(recipe = %submission.name, "Submission rejected as not viable");
            return Ok(SubmitOutcome { was_viable: false });
        }

        let name = submission.name.clone();
        let stored = self.store.append(submission).await.map_err(|e| {
            tracing::error!(recipe = %name, error = %e, "Viable submission could not be stored");
            e
        })?;

        tracing::info!(recipe = %name, id = %stored.id, "Submission accepted");
        Ok(SubmitOutcome { was_viable: true })
    }

    /// Accepted submissions, oldest first.
    pub async fn list(&self) -> Result<Vec<StoredRecord<SubmittedRecipe>>, SubmitError> {
        Ok(self.store.list_all().await?)
    }
}
