//! Request dispatch.
//!
//! # Responsibilities
//! - Hold the ordered translation rules
//! - Select exactly one handling path per request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins; unmatched requests pass through

use axum::body::Body;
use axum::http::{Method, Request};

use crate::routing::matcher::{AndMatcher, Matcher, MethodMatcher, PathMatcher};

/// Handling path chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// PUT rewritten into fetch-id then POST to the collection.
    Upsert,
    /// Form-encoded password grant translated to the backend's JSON login.
    Login,
    /// Forwarded unchanged.
    PassThrough,
}

impl Route {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Upsert => "upsert",
            Route::Login => "login",
            Route::PassThrough => "passthrough",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct Rule {
    matcher: Box<dyn Matcher>,
    route: Route,
}

/// Routes each request to a transformer or to plain forwarding.
#[derive(Debug)]
pub struct Dispatcher {
    rules: Vec<Rule>,
}

impl Dispatcher {
    /// Build the rule set for the given login endpoint path.
    pub fn new(login_path: impl Into<String>) -> Self {
        let rules = vec![
            Rule {
                matcher: Box::new(MethodMatcher::new(Method::PUT)),
                route: Route::Upsert,
            },
            Rule {
                matcher: Box::new(AndMatcher::new(vec![
                    Box::new(MethodMatcher::new(Method::POST)),
                    Box::new(PathMatcher::new(login_path)),
                ])),
                route: Route::Login,
            },
        ];
        Self { rules }
    }

    /// Select the route for `req`. Never touches the body.
    pub fn dispatch(&self, req: &Request<Body>) -> Route {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(req))
            .map(|rule| rule.route)
            .unwrap_or(Route::PassThrough)
    }
}
