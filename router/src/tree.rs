//! Router composition.

use crate::procedure::Procedure;
use std::collections::HashMap;

/// One named entry in a router: a procedure leaf or a nested router.
#[derive(Debug, Clone)]
pub enum Route {
    /// A callable procedure.
    Procedure(Procedure),
    /// A nested router, addressed through its name as a path segment.
    Router(Router),
}

/// A named collection of procedures and nested routers.
///
/// Composition is pure structural aggregation: entries are stored as
/// given, with no merging and no collision detection (inserting a
/// duplicate name replaces the earlier entry, as a plain map insert
/// does). Routers are composed once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: HashMap<String, Route>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Adds a procedure under `name`.
    pub fn procedure(mut self, name: impl Into<String>, procedure: Procedure) -> Self {
        self.routes.insert(name.into(), Route::Procedure(procedure));
        self
    }

    /// Nests a router under `name`.
    pub fn nest(mut self, name: impl Into<String>, router: Router) -> Self {
        self.routes.insert(name.into(), Route::Router(router));
        self
    }

    /// Iterates the entries at this level.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    /// Number of entries at this level.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether this level has no entries.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::Procedure;
    use crate::validator::NoParams;

    fn ping() -> Procedure {
        Procedure::builder()
            .input(NoParams)
            .resolve(|_: Option<()>| async move { Ok("pong") })
    }

    #[test]
    fn test_composition_preserves_entries() {
        let router = Router::new()
            .procedure("ping", ping())
            .nest("nested", Router::new().procedure("ping", ping()));

        assert_eq!(router.len(), 2);
        let names: Vec<&str> = {
            let mut names: Vec<&str> = router.routes().map(|(name, _)| name).collect();
            names.sort_unstable();
            names
        };
        assert_eq!(names, vec!["nested", "ping"]);
    }

    #[test]
    fn test_duplicate_name_replaces_earlier_entry() {
        // No collision detection by contract: last insert wins.
        let router = Router::new()
            .procedure("ping", ping())
            .nest("ping", Router::new());

        assert_eq!(router.len(), 1);
        let (_, route) = router.routes().next().unwrap();
        assert!(matches!(route, Route::Router(_)));
    }

    #[test]
    fn test_empty_router() {
        let router = Router::new();
        assert!(router.is_empty());
    }
}
