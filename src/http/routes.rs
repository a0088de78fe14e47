//! The blog's route table.

use crate::routing::{Router, RoutingError};

/// What a matched route does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Home,
    Page,
    Tag,
    Year,
    Month,
    Day,
    Entry,
    Service,
    Feed,
    CreateEntry,
    ShowEntry,
    UpdateEntry,
    DeleteEntry,
}

impl Endpoint {
    /// Whether the request must carry a valid WSSE token.
    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Endpoint::CreateEntry
                | Endpoint::ShowEntry
                | Endpoint::UpdateEntry
                | Endpoint::DeleteEntry
        )
    }

    /// Whether the handler reads the request body.
    pub fn takes_body(self) -> bool {
        matches!(self, Endpoint::CreateEntry | Endpoint::UpdateEntry)
    }
}

/// Routes in match order.
pub fn blog_routes() -> Result<Router<Endpoint>, RoutingError> {
    Router::new()
        .get("/", Endpoint::Home)?
        .get("/page/:page", Endpoint::Page)?
        .get("/tag/:tag", Endpoint::Tag)?
        .get("/:year/", Endpoint::Year)?
        .get("/:year/:month/", Endpoint::Month)?
        .get("/:year/:month/:day/", Endpoint::Day)?
        .get("/:year/:month/:day/:slug", Endpoint::Entry)?
        .get("/service", Endpoint::Service)?
        .get("/atom/", Endpoint::Feed)?
        .post("/atom/", Endpoint::CreateEntry)?
        .get("/atom/:year/:month/:day/:slug", Endpoint::ShowEntry)?
        .put("/atom/:year/:month/:day/:slug", Endpoint::UpdateEntry)?
        .delete("/atom/:year/:month/:day/:slug", Endpoint::DeleteEntry)
}
