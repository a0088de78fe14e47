//! AtomPub collection and member handlers.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use sha1::{Digest, Sha1};

use crate::atom::codec::timestamp;
use crate::atom::{ENTRY_CONTENT_TYPE, FEED_CONTENT_TYPE, SERVICE_CONTENT_TYPE};
use crate::blog::{derive_slug, Entry, ListQuery, NewEntry, Order};
use crate::http::context::RequestContext;
use crate::http::response::AppError;
use crate::http::server::AppState;

/// Entries in the collection feed.
pub const FEED_SIZE: usize = 10;

/// Client-proposed slug for a new member.
pub const SLUG_HEADER: &str = "slug";

/// Quoted hex SHA-1 over the concatenated parts.
fn etag<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha1::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    format!("\"{}\"", hex::encode(hasher.finalize()))
}

fn request_url(state: &AppState, ctx: &RequestContext) -> String {
    format!("{}{}", state.config.blog.base_url(), ctx.request_uri)
}

/// `Some(304)` when the client already holds this representation.
fn not_modified(ctx: &RequestContext, tag: &str) -> Option<Response> {
    let held = ctx.header(header::IF_NONE_MATCH.as_str())?;
    let matches = held
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == tag || candidate == "*");
    matches.then(|| {
        (StatusCode::NOT_MODIFIED, [(header::ETAG, tag.to_string())]).into_response()
    })
}

fn xml_response(status: StatusCode, content_type: &'static str, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

fn find_member(state: &AppState, ctx: &RequestContext) -> Result<Entry, AppError> {
    let scope = ctx.day_scope()?;
    state
        .repository
        .find_by_slug(scope, ctx.param("slug")?)
        .ok_or(AppError::NotFound)
}

pub fn service(state: &AppState, _ctx: &mut RequestContext) -> Result<Response, AppError> {
    let body = state.codec.encode_service()?;
    Ok(xml_response(StatusCode::OK, SERVICE_CONTENT_TYPE, body))
}

/// `GET /atom/`: the latest entries by update time.
pub fn feed(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    let entries = state
        .repository
        .all(ListQuery::new(FEED_SIZE).order(Order::UpdatedDesc));

    let url = request_url(state, ctx);
    let stamps: Vec<String> = entries.iter().map(|e| timestamp(&e.updated)).collect();
    let tag = etag(std::iter::once(url.as_str()).chain(stamps.iter().map(String::as_str)));
    if let Some(response) = not_modified(ctx, &tag) {
        return Ok(response);
    }

    let body = state.codec.encode_feed(&entries, ctx.now)?;
    let mut response = xml_response(StatusCode::OK, FEED_CONTENT_TYPE, body);
    if let Ok(value) = HeaderValue::from_str(&tag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    Ok(response)
}

/// `POST /atom/`: create a member from an Atom entry document.
pub fn create(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    ctx.require_authorization(&state.auth)?;

    let fields = state.codec.decode_entry(ctx.body_text()?, ctx.now)?;
    let now = state.config.blog.localize(ctx.now);
    let published = fields.published.unwrap_or(now);
    let slug = derive_slug(
        ctx.header(SLUG_HEADER),
        fields.title.as_deref().unwrap_or_default(),
        &published,
    );

    let entry = state.repository.save(NewEntry::from_fields(fields, slug, now)?)?;
    tracing::info!(id = %entry.id, path = %entry.path(), "Entry created");

    let body = state.codec.encode_entry(&entry)?;
    let mut response = xml_response(StatusCode::CREATED, ENTRY_CONTENT_TYPE, body);
    if let Ok(location) = HeaderValue::from_str(&state.codec.entry_url(&entry)) {
        response.headers_mut().insert(header::LOCATION, location);
    }
    Ok(response)
}

/// `GET /atom/:year/:month/:day/:slug`.
pub fn show(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    ctx.require_authorization(&state.auth)?;
    let entry = find_member(state, ctx)?;

    let url = request_url(state, ctx);
    let tag = etag([url.as_str(), timestamp(&entry.updated).as_str()]);
    if let Some(response) = not_modified(ctx, &tag) {
        return Ok(response);
    }

    let body = state.codec.encode_entry(&entry)?;
    let mut response = xml_response(StatusCode::OK, ENTRY_CONTENT_TYPE, body);
    if let Ok(value) = HeaderValue::from_str(&tag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    Ok(response)
}

/// `PUT /atom/:year/:month/:day/:slug`: overwrite the fields present in the body.
pub fn update(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    ctx.require_authorization(&state.auth)?;
    let entry = find_member(state, ctx)?;

    let fields = state.codec.decode_entry(ctx.body_text()?, ctx.now)?;
    let entry = state.repository.update(&entry, fields)?;
    tracing::info!(id = %entry.id, path = %entry.path(), "Entry updated");

    let body = state.codec.encode_entry(&entry)?;
    Ok(xml_response(StatusCode::OK, ENTRY_CONTENT_TYPE, body))
}

/// `DELETE /atom/:year/:month/:day/:slug`.
pub fn delete(state: &AppState, ctx: &mut RequestContext) -> Result<Response, AppError> {
    ctx.require_authorization(&state.auth)?;
    let entry = find_member(state, ctx)?;

    state.repository.destroy(&entry)?;
    tracing::info!(id = %entry.id, path = %entry.path(), "Entry deleted");
    Ok(StatusCode::OK.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_is_quoted_hex() {
        let tag = etag(["https://example.com/atom/", "2024-03-05T14:05:00Z"]);
        assert!(tag.starts_with('"') && tag.ends_with('"'));
        assert_eq!(tag.len(), 42);
        assert_eq!(tag, etag(["https://example.com/atom/2024-03-05T14:05:00Z"]));
        assert_ne!(tag, etag(["https://example.com/atom/", "2024-03-05T14:06:00Z"]));
    }
}
