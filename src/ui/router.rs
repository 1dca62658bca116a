use std::fmt;

/// Pages reachable by path. Each path maps to exactly one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Menu,
    Home,
    ForkJoin,
    BehaviorSubject,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Menu,
        Route::Home,
        Route::ForkJoin,
        Route::BehaviorSubject,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Menu => "/",
            Route::Home => "/home",
            Route::ForkJoin => "/forkjoin",
            Route::BehaviorSubject => "/behavorsubject",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Menu => "Operations",
            Route::Home => "Home",
            Route::ForkJoin => "Products, categories and users",
            Route::BehaviorSubject => "Product list",
        }
    }

    /// Resolve a path, ignoring a trailing slash. `/behaviorsubject` is
    /// accepted as a spelling of the product list route.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };
        match normalized {
            "/" => Some(Route::Menu),
            "/home" => Some(Route::Home),
            "/forkjoin" => Some(Route::ForkJoin),
            "/behavorsubject" | "/behaviorsubject" => Some(Route::BehaviorSubject),
            _ => None,
        }
    }

    pub fn known_paths() -> Vec<&'static str> {
        Route::ALL.iter().map(Route::path).collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_resolves_from_its_path() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_trailing_slash_and_alias() {
        assert_eq!(Route::from_path("/forkjoin/"), Some(Route::ForkJoin));
        assert_eq!(
            Route::from_path("/behaviorsubject"),
            Some(Route::BehaviorSubject)
        );
        assert_eq!(Route::from_path("//"), Some(Route::Menu));
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(Route::from_path("/checkout"), None);
        assert_eq!(Route::from_path(""), None);
        assert_eq!(Route::from_path("home"), None);
    }

    #[test]
    fn test_known_paths_listing() {
        assert_eq!(
            Route::known_paths(),
            vec!["/", "/home", "/forkjoin", "/behavorsubject"]
        );
        assert_eq!(Route::ForkJoin.to_string(), "/forkjoin");
    }
}
