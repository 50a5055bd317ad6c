//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one handler per configured route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Bridge each request into an RPC call and format the reply

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::bridge::descriptor::dynamic_descriptor;
use crate::bridge::{
    ArgumentGetter, BridgeError, CallDescriptor, RequestSnapshot, ResponseFormatter, RpcTarget,
    TypedValue,
};
use crate::config::validation::validate_config;
use crate::config::{BridgeConfig, ConfigError, RouteConfig};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response;
use crate::observability::metrics;
use crate::rpc::{RpcCall, RpcInvoker};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<dyn RpcInvoker>,
    pub max_body_size: usize,
}

/// How a route obtains its call shape.
#[derive(Debug)]
enum CallShape {
    Static {
        target: RpcTarget,
        descriptor: Arc<CallDescriptor>,
    },
    /// Built from `x-dubbo-*` headers on every request.
    Dynamic { ignore_null_map_pairs: bool },
}

/// A configured route, compiled once at startup.
#[derive(Debug)]
struct BridgeRoute {
    name: String,
    shape: CallShape,
    formatter: ResponseFormatter,
    request_envelope: bool,
    attachment_prefix: String,
}

impl BridgeRoute {
    fn compile(route: &RouteConfig, config: &BridgeConfig) -> Result<Self, BridgeError> {
        let shape = if route.dynamic {
            CallShape::Dynamic {
                ignore_null_map_pairs: route.ignore_null_map_pairs,
            }
        } else {
            CallShape::Static {
                target: route.target(),
                descriptor: Arc::new(route.descriptor()?),
            }
        };

        Ok(Self {
            name: route.name.clone(),
            shape,
            formatter: ResponseFormatter::new(route.response_flavor(&config.bridge)),
            request_envelope: route.request_envelope(&config.bridge),
            attachment_prefix: config.bridge.attachment_prefix.clone(),
        })
    }

    /// Turn one buffered request into an RPC call.
    fn build_call(&self, request: &RequestSnapshot<'_>) -> Result<RpcCall, BridgeError> {
        let (target, descriptor) = match &self.shape {
            CallShape::Static { target, descriptor } => (target.clone(), descriptor.clone()),
            CallShape::Dynamic {
                ignore_null_map_pairs,
            } => {
                let (target, descriptor) = dynamic_descriptor(request, *ignore_null_map_pairs)?;
                (target, Arc::new(descriptor))
            }
        };

        let getter = if self.request_envelope {
            ArgumentGetter::from_envelope(&descriptor, request)?
        } else {
            ArgumentGetter::new(&descriptor, request, Some(&self.attachment_prefix))?
        };
        let arguments = getter.arguments(&descriptor)?;

        tracing::debug!(
            route = %self.name,
            service = %target.service,
            method = %target.method,
            resolver = getter.resolver().kind(),
            "Arguments built"
        );

        Ok(RpcCall {
            target,
            parameter_types: descriptor.parameter_types(),
            arguments,
            attachments: getter.into_attachments(),
        })
    }
}

/// HTTP server for the bridge.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
}

impl HttpServer {
    /// Validate the config, compile every route and build the router.
    pub fn new(config: BridgeConfig, invoker: Arc<dyn RpcInvoker>) -> Result<Self, BridgeError> {
        validate_config(&config).map_err(|errors| {
            BridgeError::ConfigurationError(ConfigError::Validation(errors).to_string())
        })?;

        let routes = config
            .routes
            .iter()
            .map(|route| {
                let compiled = BridgeRoute::compile(route, &config)?;
                Ok((route.path.clone(), Arc::new(compiled)))
            })
            .collect::<Result<HashMap<_, _>, BridgeError>>()?;

        let state = AppState {
            invoker,
            max_body_size: config.security.max_body_size,
        };

        let router = Self::build_router(&config, routes, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &BridgeConfig,
        routes: HashMap<String, Arc<BridgeRoute>>,
        state: AppState,
    ) -> Router {
        let mut router = Router::new();
        for (path, route) in routes {
            router = router.route(
                &path,
                any(move |State(state): State<AppState>, request: Request<Body>| {
                    let route = route.clone();
                    async move { bridge_handler(state, route, request).await }
                }),
            );
        }

        router
            .fallback(not_found)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Bridge one HTTP request to one RPC call.
async fn bridge_handler(state: AppState, route: Arc<BridgeRoute>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, route = %route.name, error = %e, "Request body rejected");
            metrics::record_request(&route.name, "body_rejected", 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let snapshot = RequestSnapshot::new(&parts.method, &parts.uri, &parts.headers, &body);
    let call = match route.build_call(&snapshot) {
        Ok(call) => call,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                route = %route.name,
                kind = e.kind(),
                error = %e,
                "Failed to build RPC arguments"
            );
            metrics::record_argument_error(e.kind());
            let response = response::argument_failure(&route.formatter, &e);
            metrics::record_request(&route.name, "rejected", response.status().as_u16(), start_time);
            return response;
        }
    };

    match state.invoker.invoke(call).await {
        Ok(reply) => {
            let formatted = route.formatter.format(reply.value.as_ref(), reply.kind);
            let response = response::formatted(formatted, StatusCode::OK);
            tracing::debug!(
                request_id = %request_id,
                route = %route.name,
                kind = reply.kind.as_str(),
                result = reply.value.as_ref().map_or("absent", TypedValue::kind),
                status = %response.status(),
                "RPC reply formatted"
            );
            metrics::record_request(&route.name, reply.kind.as_str(), response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, route = %route.name, error = %e, "RPC invocation failed");
            let response = response::invoke_failure(&e);
            metrics::record_request(&route.name, "failed", response.status().as_u16(), start_time);
            response
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "No matching route found")
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
