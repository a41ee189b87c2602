use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, State},
    http::{
        Extensions, HeaderMap, StatusCode,
        header::{REFERER, USER_AGENT},
    },
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use uuid::Uuid;

use crate::{
    application::{
        error::HttpError,
        links::{ClickContext, LinkService, LinkServiceError},
        portfolio::PortfolioService,
        repos::{HealthRepo, RepoError},
    },
    presentation::views::{
        LinksPageView, LinksTemplate, PortfolioTemplate, PortfolioView, render_error_response,
        render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

const FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Clone)]
pub struct HttpState {
    pub portfolio: PortfolioService,
    pub links: LinkService,
    pub health: Arc<dyn HealthRepo>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/links", get(links_page))
        .route("/l/{id}", get(follow_link))
        .route("/api/portfolio", get(portfolio_json))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    match state.portfolio.snapshot().await {
        Ok(snapshot) => {
            let view = PortfolioView::from(&snapshot);
            render_template_response(PortfolioTemplate { view }, StatusCode::OK)
        }
        Err(err) => repo_error_page("infra::http::public::index", err),
    }
}

async fn links_page(State(state): State<HttpState>) -> Response {
    let loaded = tokio::try_join!(state.portfolio.profile(), async {
        state.links.active_links().await.map_err(|err| match err {
            LinkServiceError::Repo(repo) => repo,
            LinkServiceError::NotFound => RepoError::NotFound,
        })
    });

    match loaded {
        Ok((profile, links)) => {
            let view = LinksPageView::new(&profile, &links);
            render_template_response(LinksTemplate { view }, StatusCode::OK)
        }
        Err(err) => repo_error_page("infra::http::public::links_page", err),
    }
}

async fn follow_link(
    State(state): State<HttpState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Response {
    let context = ClickContext {
        client: client_address(&headers, &extensions),
        user_agent: header_text(&headers, USER_AGENT.as_str()),
        referrer: header_text(&headers, REFERER.as_str()),
    };

    match state.links.record_click(id, context).await {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(LinkServiceError::NotFound) => render_error_response(
            "infra::http::public::follow_link",
            StatusCode::NOT_FOUND,
            format!("link {id} is missing or hidden"),
        ),
        Err(LinkServiceError::Repo(err)) => {
            repo_error_page("infra::http::public::follow_link", err)
        }
    }
}

async fn portfolio_json(State(state): State<HttpState>) -> Response {
    match state.portfolio.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.health_check().await)
}

async fn fallback() -> Response {
    render_error_response(
        "infra::http::public::fallback",
        StatusCode::NOT_FOUND,
        "no route matched",
    )
}

fn repo_error_page(source: &'static str, err: RepoError) -> Response {
    let status = match err {
        RepoError::NotFound => StatusCode::NOT_FOUND,
        RepoError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    render_error_response(source, status, err.to_string())
}

/// First hop of `X-Forwarded-For`, else the socket peer.
fn client_address(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    forwarded.or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    })
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
