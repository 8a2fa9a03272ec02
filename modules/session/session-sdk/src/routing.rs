//! Routing collaborator.

/// Client-side router as seen by the access guards and the login flow.
pub trait Router: Send + Sync {
    /// Current location: path plus query, e.g. `/patients/7?tab=notes`.
    fn current_location(&self) -> String;

    /// Navigate, pushing a new history entry.
    fn navigate(&self, to: &str);

    /// Navigate, replacing the current history entry.
    fn replace(&self, to: &str);
}
