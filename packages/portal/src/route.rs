//! Hash routes: `#/home`, `#/modules`, `#/about` and `#/module/{id}`.

use std::fmt;

/// A page of the portal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Landing page with counts and recent uploads.
    #[default]
    Home,
    /// Module directory.
    Modules,
    /// About page.
    About,
    /// One module's resources, by module id.
    Module(String),
}

impl Route {
    /// Parses a location hash. The leading `#` and trailing slashes are
    /// optional; anything unrecognized is [`Route::Home`].
    #[must_use]
    pub fn parse(hash: &str) -> Self {
        let path = hash.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.trim_start_matches('/').trim_end_matches('/');

        match path {
            "modules" => Self::Modules,
            "about" => Self::About,
            _ => path
                .strip_prefix("module/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map_or(Self::Home, |id| Self::Module(id.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("#/home"),
            Self::Modules => f.write_str("#/modules"),
            Self::About => f.write_str("#/about"),
            Self::Module(id) => write!(f, "#/module/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("#/home"), Route::Home);
        assert_eq!(Route::parse("#/modules"), Route::Modules);
        assert_eq!(Route::parse("#/about"), Route::About);
        assert_eq!(Route::parse("#/module/cs101"), Route::Module("cs101".to_string()));
    }

    #[test]
    fn hash_and_slashes_are_optional() {
        assert_eq!(Route::parse("/modules"), Route::Modules);
        assert_eq!(Route::parse("modules/"), Route::Modules);
        assert_eq!(Route::parse("module/dyn-ee101"), Route::Module("dyn-ee101".to_string()));
    }

    #[test]
    fn unknown_routes_fall_back_to_home() {
        for hash in ["", "#", "#/", "#/nope", "#/module/", "#/module/a/b"] {
            assert_eq!(Route::parse(hash), Route::Home, "{hash}");
        }
    }

    #[test]
    fn display_round_trips() {
        for route in [
            Route::Home,
            Route::Modules,
            Route::About,
            Route::Module("ma201".to_string()),
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }
}
