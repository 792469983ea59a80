use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sitegen_core::project::ProjectId;

use crate::error::Error;
use crate::server::SharedContext;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub project_id: ProjectId,
    pub message: String,
}

pub async fn generate(
    State(context): State<SharedContext>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, Error> {
    let Json(request) = payload.map_err(|e| Error::Validation(e.body_text()))?;

    let bundle = context.generator.generate(&request.description).await?;

    Ok(Json(GenerateResponse {
        project_id: bundle.id,
        message: "Project generated successfully".to_string(),
    }))
}
