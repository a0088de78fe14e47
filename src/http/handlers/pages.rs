//! Human-facing read views.

use axum::http::header;
use axum::response::{Html, IntoResponse, Response};

use crate::blog::{DateScope, Entry, ListQuery};
use crate::http::context::RequestContext;
use crate::http::response::{AppError, HTML_CONTENT_TYPE};
use crate::http::server::AppState;
use crate::http::views;

fn html(body: String) -> Response {
    ([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], Html(body)).into_response()
}

fn newest_first(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.published.cmp(&a.published));
    entries
}

fn page_count(state: &AppState) -> usize {
    let per_page = state.config.blog.per_page;
    state.repository.count().div_ceil(per_page)
}

pub fn home(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let entries = state
        .repository
        .all(ListQuery::new(state.config.blog.per_page));
    let pages = page_count(state);
    Ok(html(views::home(&state.config.blog, &ctx.title, &entries, 1, pages)))
}

pub fn page(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let page: usize = ctx.param("page")?.parse().map_err(|_| AppError::NotFound)?;
    if page == 0 {
        return Err(AppError::NotFound);
    }

    let per_page = state.config.blog.per_page;
    let offset = (page - 1).checked_mul(per_page).ok_or(AppError::NotFound)?;
    let entries = state
        .repository
        .all(ListQuery::new(per_page).offset(offset));
    if entries.is_empty() {
        return Err(AppError::NotFound);
    }

    let pages = page_count(state);
    Ok(html(views::home(&state.config.blog, &ctx.title, &entries, page, pages)))
}

pub fn tag(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let tag = ctx.param("tag")?.to_string();
    let entries = state.repository.tagged(&tag);
    if entries.is_empty() {
        return Err(AppError::NotFound);
    }

    ctx.prefix_title(&format!("{} | ", tag));
    Ok(html(views::list(&state.config.blog, &ctx.title, &entries)))
}

fn archive(
    state: &AppState,
    ctx: &mut RequestContext,
    scope: DateScope,
    title_format: &str,
) -> Result<Response, AppError> {
    let entries = newest_first(state.repository.circa(scope));
    let first = entries.first().ok_or(AppError::NotFound)?;

    let prefix = first.published.format(title_format).to_string();
    ctx.prefix_title(&prefix.replacen(" 0", " ", 1));
    Ok(html(views::list(&state.config.blog, &ctx.title, &entries)))
}

pub fn year(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let scope = DateScope::parse(ctx.param("year")?, None, None).ok_or(AppError::NotFound)?;
    archive(state, ctx, scope, "%Y | ")
}

pub fn month(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let scope = DateScope::parse(ctx.param("year")?, Some(ctx.param("month")?), None)
        .ok_or(AppError::NotFound)?;
    archive(state, ctx, scope, "%Y %B | ")
}

pub fn day(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let scope = ctx.day_scope()?;
    archive(state, ctx, scope, "%Y %B %d | ")
}

pub fn entry(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let scope = ctx.day_scope()?;
    let entry = state
        .repository
        .find_by_slug(scope, ctx.param("slug")?)
        .ok_or(AppError::NotFound)?;

    ctx.prefix_title(&format!("{} | ", entry.title));
    Ok(html(views::entry(&state.config.blog, &ctx.title, &entry)))
}
