//! Route table and output path mapping.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A logical site path, e.g. `/` or `/demo/fashion`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route(String);

/// Errors raised while building routes and route tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Invalid route {route:?}: {reason}")]
    Invalid { route: String, reason: &'static str },

    #[error("Duplicate route: {0}")]
    Duplicate(Route),

    #[error("Routes {first} and {second} both map to {path}")]
    Collision {
        first: Route,
        second: Route,
        path: String,
    },

    #[error("Route {document} writes {path}, which route {nested} needs as a directory")]
    Nested {
        document: Route,
        nested: Route,
        path: String,
    },
}

impl Route {
    /// Parse and validate a route string.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let invalid = |reason| RouteError::Invalid {
            route: raw.to_string(),
            reason,
        };

        if !raw.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if raw == "/" {
            return Ok(Self(raw.to_string()));
        }
        if raw.ends_with('/') {
            return Err(invalid("must not end with '/'"));
        }

        let segments: Vec<&str> = raw[1..].split('/').collect();
        for segment in &segments {
            if segment.is_empty() {
                return Err(invalid("contains an empty segment"));
            }
            if *segment == "." || *segment == ".." {
                return Err(invalid("contains a relative segment"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                return Err(invalid("segments may only contain [A-Za-z0-9._-]"));
            }
        }

        // `/index` would overwrite the root document, `/a/index` is what hosts serve for `/a/`
        if segments.last() == Some(&"index") {
            return Err(invalid("last segment must not be 'index'"));
        }

        Ok(Self(raw.to_string()))
    }

    /// The route as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the site root.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path segments, empty for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Output document path, relative to the output root.
    ///
    /// `/` maps to `index.html`, `/a/b` maps to `a/b.html`.
    pub fn output_path(&self) -> PathBuf {
        if self.is_root() {
            return PathBuf::from("index.html");
        }

        let mut path: PathBuf = self.segments().collect();
        let file_name = format!("{}.html", self.segments().last().unwrap_or("index"));
        path.set_file_name(file_name);
        path
    }

    /// Public URL of the route under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Route::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Ordered set of routes to prerender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, rejecting duplicates and output path collisions.
    ///
    /// Paths are compared case-insensitively. Besides two routes sharing a
    /// document, a route's document may not sit where another route's output
    /// needs a directory (`/a` and `/a.html/b`).
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        let mut documents: HashMap<String, &Route> = HashMap::new();
        let mut directories: HashMap<String, &Route> = HashMap::new();

        for route in &routes {
            let segments: Vec<String> = route.segments().map(str::to_lowercase).collect();
            let document = if segments.is_empty() {
                "index.html".to_string()
            } else {
                format!("{}.html", segments.join("/"))
            };

            if let Some(first) = documents.get(&document) {
                if *first == route {
                    return Err(RouteError::Duplicate(route.clone()));
                }
                return Err(RouteError::Collision {
                    first: (*first).clone(),
                    second: route.clone(),
                    path: route.output_path().display().to_string(),
                });
            }
            if let Some(nested) = directories.get(&document) {
                return Err(RouteError::Nested {
                    document: route.clone(),
                    nested: (*nested).clone(),
                    path: route.output_path().display().to_string(),
                });
            }

            for depth in 1..segments.len() {
                let directory = segments[..depth].join("/");
                if let Some(owner) = documents.get(&directory) {
                    return Err(RouteError::Nested {
                        document: (*owner).clone(),
                        nested: route.clone(),
                        path: owner.output_path().display().to_string(),
                    });
                }
                directories.entry(directory).or_insert(route);
            }

            documents.insert(document, route);
        }

        Ok(Self { routes })
    }

    /// Parse and validate a list of route strings.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, RouteError> {
        let routes = raw
            .iter()
            .map(|r| Route::parse(r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(routes)
    }

    /// Routes shipped with the agency site: home, legal pages and demo showcases.
    pub fn site_default() -> Self {
        Self {
            routes: SITE_ROUTES.iter().map(|r| Route(r.to_string())).collect(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn contains(&self, route: &Route) -> bool {
        self.routes.contains(route)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::site_default()
    }
}

const SITE_ROUTES: &[&str] = &[
    "/",
    "/privacy-policy",
    "/terms-of-service",
    "/legal-notice",
    "/demo/fashion",
    "/demo/restaurant",
    "/demo/real-estate",
    "/demo/fitness",
];
