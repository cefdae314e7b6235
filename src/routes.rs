use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::model::StoryId;
use crate::store::StoryStore;
use crate::views::{
    story_list, CardState, CardView, DetailView, ImageBlock, Presentation, SummaryBlock,
};

pub struct AppState {
    pub store: Arc<StoryStore>,
    pub site_title: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/story/:id", get(story_page))
        .route("/story/:id/body", get(story_body))
        .route("/card/:id", get(card))
        .route("/refresh", post(refresh))
        .route("/refresh/status", get(refresh_status))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub site_title: String,
    pub cards: Vec<CardView>,
}

#[derive(Template)]
#[template(path = "card.html")]
pub struct CardTemplate {
    pub card: CardView,
}

#[derive(Template)]
#[template(path = "story.html")]
pub struct StoryPageTemplate {
    pub site_title: String,
    pub id: StoryId,
}

#[derive(Template)]
#[template(path = "story_body.html")]
pub struct StoryBodyTemplate {
    pub story: DetailView,
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub site_title: String,
}

#[derive(Template)]
#[template(path = "refresh_button.html")]
pub struct RefreshButtonTemplate {
    pub refreshing: bool,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => AppError::Render(err).into_response(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("story {0} not found")]
    NotFound(StoryId),

    #[error("failed to render template: {0}")]
    Render(#[from] askama::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, format!("Error: {}", self)).into_response()
    }
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stories = state.store.ensure_loaded().await;

    HtmlTemplate(IndexTemplate {
        site_title: state.site_title.clone(),
        cards: story_list(&stories),
    })
}

pub async fn about(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    HtmlTemplate(AboutTemplate {
        site_title: state.site_title.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CardQuery {
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub lead: bool,
}

pub async fn card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StoryId>,
    Query(query): Query<CardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let story = state.store.find(id).await.ok_or(AppError::NotFound(id))?;

    Ok(HtmlTemplate(CardTemplate {
        card: CardView::new(
            &story,
            Presentation::from_lead(query.lead),
            CardState::from_expanded(query.expanded),
        ),
    }))
}

pub async fn story_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StoryId>,
) -> impl IntoResponse {
    HtmlTemplate(StoryPageTemplate {
        site_title: state.site_title.clone(),
        id,
    })
}

/// Fetches one story's full payload. Any failure keeps the loading placeholder.
pub async fn story_body(State(state): State<Arc<AppState>>, Path(id): Path<StoryId>) -> Response {
    match state.store.client().fetch_story(id).await {
        Ok(story) => HtmlTemplate(StoryBodyTemplate {
            story: DetailView::from(&story),
        })
        .into_response(),
        Err(e) => {
            warn!("Fetching story {} failed: {}", id, e);
            HtmlTemplate(LoadingTemplate).into_response()
        }
    }
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.clone();
    tokio::spawn(async move {
        match store.refresh().await {
            Ok(Some(count)) => info!("Manual refresh loaded {} stories", count),
            Ok(None) => {}
            Err(e) => warn!("Manual refresh failed: {}", e),
        }
    });

    HtmlTemplate(RefreshButtonTemplate { refreshing: true })
}

pub async fn refresh_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let refreshing = state.store.is_refreshing();
    HtmlTemplate(RefreshButtonTemplate { refreshing })
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
