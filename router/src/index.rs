//! Flattened dotted-path lookup, built once per composed router.

use crate::procedure::Procedure;
use crate::tree::{Route, Router};
use std::collections::HashMap;

/// Dotted-path to procedure lookup table.
///
/// Built exactly once from a composed router, so dispatch never walks
/// the tree and unknown-method detection is a single map probe.
#[derive(Debug)]
pub struct PathIndex {
    procedures: HashMap<String, Procedure>,
}

impl PathIndex {
    /// Flattens `router` into a path table.
    pub fn build(router: &Router) -> Self {
        let mut procedures = HashMap::new();
        collect(router, None, &mut procedures);
        Self { procedures }
    }

    /// Looks up a procedure by its dotted path.
    pub fn lookup(&self, path: &str) -> Option<&Procedure> {
        self.procedures.get(path)
    }

    /// Number of addressable procedures.
    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    /// Whether the index holds no procedures.
    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    /// Iterates the addressable paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }
}

fn collect(router: &Router, prefix: Option<&str>, out: &mut HashMap<String, Procedure>) {
    for (name, route) in router.routes() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_string(),
        };
        match route {
            Route::Procedure(procedure) => {
                out.insert(path, procedure.clone());
            }
            Route::Router(nested) => collect(nested, Some(&path), out),
        }
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
    fn test_flattens_top_level_procedures() {
        let router = Router::new().procedure("echo", ping());
        let index = PathIndex::build(&router);

        assert_eq!(index.len(), 1);
        assert!(index.lookup("echo").is_some());
    }

    #[test]
    fn test_flattens_nested_paths() {
        let router = Router::new().nest(
            "users",
            Router::new().procedure("getById", ping()).procedure("list", ping()),
        );
        let index = PathIndex::build(&router);

        assert_eq!(index.len(), 2);
        assert!(index.lookup("users.getById").is_some());
        assert!(index.lookup("users.list").is_some());
        assert!(index.lookup("users").is_none());
        assert!(index.lookup("getById").is_none());
    }

    #[test]
    fn test_flattens_to_depth_four() {
        let router = Router::new().nest(
            "a",
            Router::new().nest(
                "b",
                Router::new().nest("c", Router::new().procedure("d", ping())),
            ),
        );
        let index = PathIndex::build(&router);

        assert_eq!(index.len(), 1);
        assert!(index.lookup("a.b.c.d").is_some());
        assert!(index.lookup("a.b.c").is_none());
    }

    #[test]
    fn test_unknown_path_is_absent() {
        let router = Router::new().procedure("echo", ping());
        let index = PathIndex::build(&router);

        assert!(index.lookup("users.delete").is_none());
    }

    #[test]
    fn test_empty_router_yields_empty_index() {
        let index = PathIndex::build(&Router::new());
        assert!(index.is_empty());
    }
}
