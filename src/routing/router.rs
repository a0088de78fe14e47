//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the first route matching verb and full path
//! - Bind captures to named parameters
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan (route tables here are a dozen entries)
//! - HEAD is answered by GET routes
//! - Explicit NoMatch (`None`) rather than silent default

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::{PathPattern, PatternSource, RoutingError};

/// Named parameters extracted from a matched path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// Bind captures in order; a later duplicate name overwrites an earlier one.
    pub fn from_captures(captures: Vec<(String, String)>) -> Self {
        let mut values = HashMap::with_capacity(captures.len());
        for (name, value) in captures {
            values.insert(name, value);
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug)]
struct Route<T> {
    method: Method,
    pattern: PathPattern,
    target: T,
}

/// A matched route.
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    pub target: &'a T,
    pub params: Params,
}

/// Ordered route table.
#[derive(Debug)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. The pattern is compiled here, not per request.
    pub fn route(
        mut self,
        method: Method,
        pattern: impl Into<PatternSource>,
        target: T,
    ) -> Result<Self, RoutingError> {
        let pattern = PathPattern::compile(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            target,
        });
        Ok(self)
    }

    pub fn get(self, pattern: impl Into<PatternSource>, target: T) -> Result<Self, RoutingError> {
        self.route(Method::GET, pattern, target)
    }

    pub fn post(self, pattern: impl Into<PatternSource>, target: T) -> Result<Self, RoutingError> {
        self.route(Method::POST, pattern, target)
    }

    pub fn put(self, pattern: impl Into<PatternSource>, target: T) -> Result<Self, RoutingError> {
        self.route(Method::PUT, pattern, target)
    }

    pub fn delete(self, pattern: impl Into<PatternSource>, target: T) -> Result<Self, RoutingError> {
        self.route(Method::DELETE, pattern, target)
    }

    /// Find the first route (in registration order) matching the verb and full path.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let method = if method == Method::HEAD {
            &Method::GET
        } else {
            method
        };

        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.pattern.captures(path).map(|captures| RouteMatch {
                    target: &route.target,
                    params: Params::from_captures(captures),
                })
            })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
