//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every static route builds a call descriptor
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::BridgeConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("route #{0} has no name")]
    UnnamedRoute(usize),

    #[error("duplicate route name {0:?}")]
    DuplicateName(String),

    #[error("route {route:?}: path {path:?} {reason}")]
    InvalidPath {
        route: String,
        path: String,
        reason: &'static str,
    },

    #[error("route {route:?}: path {path:?} is already bound")]
    DuplicatePath { route: String, path: String },

    #[error("route {route:?}: missing {field}")]
    MissingField { route: String, field: &'static str },

    #[error("route {route:?}: {message}")]
    InvalidParams { route: String, message: String },
}

pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut names = HashSet::new();
    let mut paths = HashSet::new();

    for (i, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::UnnamedRoute(i));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        if let Err(reason) = check_path(&route.path) {
            errors.push(ValidationError::InvalidPath {
                route: route.name.clone(),
                path: route.path.clone(),
                reason,
            });
        } else if !paths.insert(capture_shape(&route.path)) {
            errors.push(ValidationError::DuplicatePath {
                route: route.name.clone(),
                path: route.path.clone(),
            });
        }

        if route.dynamic {
            continue;
        }

        for (field, value) in [("service", &route.service), ("method", &route.method)] {
            if value.is_empty() {
                errors.push(ValidationError::MissingField {
                    route: route.name.clone(),
                    field,
                });
            }
        }

        if let Err(e) = route.descriptor() {
            errors.push(ValidationError::InvalidParams {
                route: route.name.clone(),
                message: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reject path syntax the router would refuse at startup.
fn check_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("must start with '/'");
    }
    let segments: Vec<&str> = path[1..].split('/').collect();
    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err("uses ':' or '*' captures; write '{name}' or '{*name}'");
        }
        if !segment.contains(['{', '}']) {
            continue;
        }
        let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
            return Err("has a capture that does not span a whole segment");
        };
        let (catch_all, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err("has an invalid capture name");
        }
        if catch_all && i + 1 != segments.len() {
            return Err("has a catch-all capture before the last segment");
        }
    }
    Ok(())
}

/// Path with capture names erased, so `/a/{x}` and `/a/{y}` collide.
fn capture_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix("{*") {
            Some(_) => "{*}",
            None if segment.starts_with('{') => "{}",
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(name: &str, path: &str) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            path: path.into(),
            service: "com.example.S".into(),
            method: "m".into(),
            params: vec!["a:int".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = BridgeConfig::default();
        config.routes.push(route("a", "/a"));
        config.routes.push(RouteConfig {
            name: "dyn".into(),
            path: "/rpc".into(),
            dynamic: true,
            ..Default::default()
        });
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = BridgeConfig::default();
        config.timeouts.request_secs = 0;
        config.routes.push(route("a", "/a"));
        config.routes.push(route("a", "/a"));
        config.routes.push(route("b", "nope"));
        let mut bad_params = route("c", "/c");
        bad_params.params = vec!["id:".into()];
        bad_params.method.clear();
        config.routes.push(bad_params);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::DuplicateName("a".into())));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicatePath { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidPath { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingField { field: "method", .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidParams { .. })));
    }

    #[test]
    fn test_router_path_syntax() {
        for path in ["/user/:id", "/a/*rest", "/b/{x", "/c/x{id}", "/d/{}", "/e/{*rest}/tail"] {
            let mut config = BridgeConfig::default();
            config.routes.push(route("r", path));
            let errors = validate_config(&config).unwrap_err();
            assert!(
                matches!(errors.as_slice(), [ValidationError::InvalidPath { .. }]),
                "{path}: {errors:?}"
            );
        }

        let mut config = BridgeConfig::default();
        config.routes.push(route("id", "/user/{id}"));
        config.routes.push(route("rest", "/files/{*rest}"));
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_conflicting_captures() {
        let mut config = BridgeConfig::default();
        config.routes.push(route("x", "/a/{x}"));
        config.routes.push(route("y", "/a/{y}"));
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors.as_slice(), [ValidationError::DuplicatePath { .. }]));
    }
}
