//! JSON endpoints that drive the hosted form session.
//!
//! Each handler performs exactly one form operation. Input the form
//! rejects is not an HTTP error: the reply is the usual form view and the
//! rejection travels in its notifications.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::form::{DraftField, EventDraft, FieldSpec, FormMode, Notification, FORM_FIELDS};
use crate::models::{Category, Event};
use crate::state::{AppState, FormSession};
use crate::utils::error::AppError;
use crate::utils::response::success;

/// Everything a front end needs to render the form.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub mode: FormMode,
    pub submit_label: &'static str,
    pub can_cancel: bool,
    pub fields: &'static [FieldSpec],
    pub categories: Vec<Category>,
    pub draft: EventDraft,
    pub displayed_button_color: String,
    pub displayed_button_secondary_color: String,
    pub new_image_url: String,
    pub new_video_url: String,
    pub notifications: Vec<Notification>,
}

impl FormView {
    fn capture(form: &FormSession) -> Self {
        let draft = form.draft();
        Self {
            mode: form.mode(),
            submit_label: form.mode().submit_label(),
            can_cancel: form.can_cancel(),
            fields: FORM_FIELDS,
            categories: form.categories().to_vec(),
            draft: draft.clone(),
            displayed_button_color: draft.displayed_button_color().to_string(),
            displayed_button_secondary_color: draft
                .displayed_button_secondary_color()
                .to_string(),
            new_image_url: form.new_image_url().to_string(),
            new_video_url: form.new_video_url().to_string(),
            notifications: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ValueBody {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct UrlBody {
    pub url: String,
}

/// Runs `op`, then replies with the resulting view.
///
/// `op` reports whether the form accepted the interaction, which only
/// picks the envelope message.
fn respond<F>(
    state: &AppState,
    op: F,
    accepted: &str,
    rejected: &str,
) -> Result<Response, AppError>
where
    F: FnOnce(&mut FormSession) -> bool,
{
    let ((ok, mut view), notifications) = state.with_form(|form| {
        let ok = op(form);
        (ok, FormView::capture(form))
    })?;
    view.notifications = notifications;

    Ok(success(view, if ok { accepted } else { rejected }))
}

pub async fn show_form(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(&state, |_| true, "Event form", "Event form")
}

pub async fn update_field(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(body): Json<ValueBody>,
) -> Result<Response, AppError> {
    let field: DraftField = key
        .parse()
        .map_err(|_| AppError::NotFound(format!("Form field '{}' does not exist", key)))?;

    respond(
        &state,
        |form| form.update(field, &body.value).is_ok(),
        "Field updated",
        "Field rejected",
    )
}

pub async fn seed_form(
    State(state): State<AppState>,
    Json(event): Json<Event>,
) -> Result<Response, AppError> {
    let ((outcome, mut view), notifications) = state.with_form(|form| {
        let outcome = form.reseed(&event);
        (outcome, FormView::capture(form))
    })?;
    outcome?;
    view.notifications = notifications;

    Ok(success(view, "Form seeded from event"))
}

pub async fn set_image_input(
    State(state): State<AppState>,
    Json(body): Json<ValueBody>,
) -> Result<Response, AppError> {
    respond(
        &state,
        |form| {
            form.set_new_image_url(body.value);
            true
        },
        "Image input updated",
        "Image input updated",
    )
}

pub async fn add_image(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(
        &state,
        |form| form.add_image().is_ok(),
        "Image added",
        "Image rejected",
    )
}

pub async fn remove_image(
    State(state): State<AppState>,
    Json(body): Json<UrlBody>,
) -> Result<Response, AppError> {
    respond(
        &state,
        |form| {
            form.remove_image(&body.url);
            true
        },
        "Image removed",
        "Image removed",
    )
}

pub async fn set_video_input(
    State(state): State<AppState>,
    Json(body): Json<ValueBody>,
) -> Result<Response, AppError> {
    respond(
        &state,
        |form| {
            form.set_new_video_url(body.value);
            true
        },
        "Video input updated",
        "Video input updated",
    )
}

pub async fn add_video(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(
        &state,
        |form| form.add_video().is_ok(),
        "Video added",
        "Video rejected",
    )
}

pub async fn remove_video(
    State(state): State<AppState>,
    Json(body): Json<UrlBody>,
) -> Result<Response, AppError> {
    respond(
        &state,
        |form| {
            form.remove_video(&body.url);
            true
        },
        "Video removed",
        "Video removed",
    )
}

pub async fn submit_form(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(
        &state,
        |form| form.submit().is_ok(),
        "Event draft submitted",
        "Event draft incomplete",
    )
}

/// Cancelling discards the session and starts over with an empty form.
pub async fn cancel_form(State(state): State<AppState>) -> Result<Response, AppError> {
    respond(
        &state,
        |form| {
            let cancelled = form.cancel();
            *form = state.fresh_form();
            cancelled
        },
        "Event form cancelled",
        "Event form reset",
    )
}
