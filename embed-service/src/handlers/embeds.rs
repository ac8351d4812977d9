use crate::models::{Requester, Visualization};
use crate::services::access::{decide, AccessDecision, DenialReason};
use crate::services::metrics::record_access_decision;
use crate::services::vizjson::{auth_tokens_json, escape_javascript, VizJson};
use crate::startup::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use service_core::error::AppError;

#[derive(Template)]
#[template(path = "embed.html")]
pub struct EmbedTemplate {
    pub title: String,
    /// Empty when the visualization has no description.
    pub description: String,
    /// Vizjson, already escaped for a single-quoted script literal.
    pub vizjson: String,
    /// Token list, already escaped for a single-quoted script literal.
    pub auth_tokens: String,
}

#[derive(Template)]
#[template(path = "embed_error.html")]
pub struct EmbedErrorTemplate {
    pub heading: &'static str,
    pub message: &'static str,
}

#[derive(Template)]
#[template(path = "password_protected.html")]
pub struct PasswordProtectedTemplate {
    pub visualization_id: String,
    pub vector: bool,
    pub password_error: bool,
}

/// Any `vector` value other than the literal `true` means a raster embed.
fn vector_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbedParams {
    pub vector: Option<String>,
}

impl EmbedParams {
    pub fn vector(&self) -> bool {
        vector_flag(self.vector.as_deref())
    }
}

/// Password submission. Accepted as a urlencoded body or as query parameters;
/// body fields win when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct ProtectedEmbedForm {
    pub password: Option<String>,
    pub vector: Option<String>,
}

impl ProtectedEmbedForm {
    pub fn merge(self, fallback: ProtectedEmbedForm) -> Self {
        Self {
            password: self.password.or(fallback.password),
            vector: self.vector.or(fallback.vector),
        }
    }

    pub fn vector(&self) -> bool {
        vector_flag(self.vector.as_deref())
    }
}

/// `GET /embed/:visualization_id`
pub async fn show_embed(
    State(state): State<AppState>,
    Path(visualization_id): Path<String>,
    requester: Requester,
    Query(params): Query<EmbedParams>,
) -> Result<Response, AppError> {
    let Some(visualization) = state.visualizations.find_by_id(&visualization_id).await? else {
        return not_found(&visualization_id);
    };

    let decision = decide(&visualization, &requester, None);
    render_decision(&visualization, &requester, decision, params.vector(), false)
}

/// `POST /embed/:visualization_id/protected`
pub async fn show_protected_embed(
    State(state): State<AppState>,
    Path(visualization_id): Path<String>,
    requester: Requester,
    Query(query): Query<ProtectedEmbedForm>,
    body: Option<Form<ProtectedEmbedForm>>,
) -> Result<Response, AppError> {
    // A bare POST, or one with a non-form body, counts as no password.
    let form = match body {
        Some(Form(body)) => body.merge(query),
        None => query,
    };

    let Some(visualization) = state.visualizations.find_by_id(&visualization_id).await? else {
        return not_found(&visualization_id);
    };

    let decision = decide(&visualization, &requester, form.password.as_deref());
    render_decision(&visualization, &requester, decision, form.vector(), true)
}

fn render_decision(
    visualization: &Visualization,
    requester: &Requester,
    decision: AccessDecision,
    vector: bool,
    password_submitted: bool,
) -> Result<Response, AppError> {
    record_access_decision(decision.outcome());
    tracing::info!(
        visualization_id = %visualization.id,
        privacy = %visualization.privacy,
        authenticated = requester.is_authenticated(),
        outcome = decision.outcome(),
        "Embed access decided"
    );

    match decision {
        AccessDecision::Granted { auth_tokens } => {
            let vizjson = VizJson::for_visualization(visualization, vector)
                .to_json()
                .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to build vizjson: {}", e)))?;
            let tokens = auth_tokens_json(&auth_tokens).map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to serialize auth tokens: {}", e))
            })?;

            let page = EmbedTemplate {
                title: visualization.name.clone(),
                description: visualization.description.clone().unwrap_or_default(),
                vizjson: escape_javascript(&vizjson),
                auth_tokens: escape_javascript(&tokens),
            };

            let mut response = render(StatusCode::OK, &page)?;
            if !auth_tokens.is_empty() {
                response
                    .headers_mut()
                    .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            }
            Ok(response)
        }
        AccessDecision::Denied(DenialReason::Private) => render(
            StatusCode::FORBIDDEN,
            &EmbedErrorTemplate {
                heading: "This map is private",
                message: "Only the owner and people it has been shared with can see it.",
            },
        ),
        AccessDecision::Denied(DenialReason::PasswordRequired)
        | AccessDecision::Denied(DenialReason::InvalidPassword) => render(
            StatusCode::FORBIDDEN,
            &PasswordProtectedTemplate {
                visualization_id: visualization.id.clone(),
                vector,
                password_error: password_submitted,
            },
        ),
    }
}

fn not_found(visualization_id: &str) -> Result<Response, AppError> {
    tracing::info!(visualization_id = %visualization_id, "Embed requested for unknown visualization");
    render(
        StatusCode::NOT_FOUND,
        &EmbedErrorTemplate {
            heading: "Map not found",
            message: "The map you are looking for does not exist or has been deleted.",
        },
    )
}

fn render<T: Template>(status: StatusCode, template: &T) -> Result<Response, AppError> {
    let html = template
        .render()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to render template: {}", e)))?;
    Ok((status, Html(html)).into_response())
}
