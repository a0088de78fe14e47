//! Endpoint handlers.
//!
//! Each handler takes the shared state and the request context and either
//! produces a response or an [`AppError`] for the dispatcher to render.

pub mod atom;
pub mod pages;

use axum::response::Response;

use crate::http::context::RequestContext;
use crate::http::response::AppError;
use crate::http::routes::Endpoint;
use crate::http::server::AppState;

pub fn handle(
    endpoint: Endpoint,
    state: &AppState,
    ctx: &mut RequestContext,
) -> Result<Response, AppError> {
    match endpoint {
        Endpoint::Home => pages::home(state, ctx),
        Endpoint::Page => pages::page(state, ctx),
        Endpoint::Tag => pages::tag(state, ctx),
        Endpoint::Year => pages::year(state, ctx),
        Endpoint::Month => pages::month(state, ctx),
        Endpoint::Day => pages::day(state, ctx),
        Endpoint::Entry => pages::entry(state, ctx),
        Endpoint::Service => atom::service(state, ctx),
        Endpoint::Feed => atom::feed(state, ctx),
        Endpoint::CreateEntry => atom::create(state, ctx),
        Endpoint::ShowEntry => atom::show(state, ctx),
        Endpoint::UpdateEntry => atom::update(state, ctx),
        Endpoint::DeleteEntry => atom::delete(state, ctx),
    }
}
