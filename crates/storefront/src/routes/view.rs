//! Panel visibility route handlers.
//!
//! The visitor's [`ViewState`] lives in the session under
//! [`keys::VIEW_STATE`]; a missing entry means every panel is closed.

use axum::{Json, extract::Path};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::session::keys;
use crate::view::{Panel, PanelAction, ViewState};

async fn load(session: &Session) -> Result<ViewState> {
    Ok(session
        .get::<ViewState>(keys::VIEW_STATE)
        .await?
        .unwrap_or_default())
}

#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<ViewState>> {
    Ok(Json(load(&session).await?))
}

/// Open, close or toggle one panel and return the new view state.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Path((panel, action)): Path<(String, String)>,
) -> Result<Json<ViewState>> {
    let panel: Panel = panel
        .parse()
        .map_err(|e: crate::view::ViewError| AppError::NotFound(e.to_string()))?;
    let action: PanelAction = action
        .parse()
        .map_err(|e: crate::view::ViewError| AppError::NotFound(e.to_string()))?;

    let mut view = load(&session).await?;
    view.apply(panel, action);
    session.insert(keys::VIEW_STATE, view).await?;

    Ok(Json(view))
}
