//! Route groups mounted onto the application router.

pub mod health;

use axum::Router;

/// A group of routes that knows how to bind itself onto a router.
pub trait RouteGroup {
    /// Registers this group's routes on `router` and returns the result.
    fn configure(&self, router: Router) -> Router;
}
