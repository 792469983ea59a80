use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;
use sitegen_core::accounts::Credentials;

use super::StatusResponse;
use crate::error::Error;
use crate::server::SharedContext;
use crate::store::SignupOutcome;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

pub async fn signup(
    State(context): State<SharedContext>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Json<StatusResponse>, Error> {
    let Form(form) = form.map_err(|e| Error::Validation(e.body_text()))?;

    let credentials = match Credentials::new(&form.username, &form.password) {
        Ok(credentials) => credentials,
        Err(message) => return Ok(Json(StatusResponse::failed(&message))),
    };

    // Hashing and the insert both block
    let username = credentials.username.clone();
    let outcome = context
        .store
        .blocking(move |store| store.signup(&credentials))
        .await?;

    let response = match outcome {
        SignupOutcome::Created => {
            log::info!("Created user {username}");
            StatusResponse::ok("Signup successful!")
        }
        SignupOutcome::UsernameTaken => StatusResponse::failed("Username already exists"),
    };

    Ok(Json(response))
}

pub async fn login(
    State(context): State<SharedContext>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Json<StatusResponse>, Error> {
    let Form(form) = form.map_err(|e| Error::Validation(e.body_text()))?;

    let Ok(credentials) = Credentials::new(&form.username, &form.password) else {
        return Ok(Json(StatusResponse::failed("Invalid credentials")));
    };

    let valid = context
        .store
        .blocking(move |store| store.login(&credentials))
        .await?;

    if valid {
        Ok(Json(StatusResponse::ok("Login successful!")))
    } else {
        Ok(Json(StatusResponse::failed("Invalid credentials")))
    }
}
