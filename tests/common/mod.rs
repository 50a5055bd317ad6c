//! Shared utilities for integration testing.

use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use futures_util::future::{self, BoxFuture, FutureExt};
use tower::ServiceExt;

use dubbo_bridge::config::{BridgeConfig, RouteConfig};
use dubbo_bridge::rpc::{InvokeError, RpcCall, RpcInvoker, RpcReply};
use dubbo_bridge::HttpServer;

type ReplyFn = dyn Fn(&RpcCall) -> Result<RpcReply, InvokeError> + Send + Sync;

/// Invoker that records every call and answers with a scripted reply.
#[derive(Clone)]
pub struct ScriptedInvoker {
    calls: Arc<Mutex<Vec<RpcCall>>>,
    reply: Arc<ReplyFn>,
}

impl ScriptedInvoker {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&RpcCall) -> Result<RpcReply, InvokeError> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(reply),
        }
    }

    /// Replies with the first argument (or absent).
    pub fn echo_first() -> Self {
        Self::new(|call| Ok(RpcReply::normal(call.arguments.first().cloned().flatten())))
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RpcInvoker for ScriptedInvoker {
    fn invoke(&self, call: RpcCall) -> BoxFuture<'static, Result<RpcReply, InvokeError>> {
        let reply = (self.reply)(&call);
        self.calls.lock().unwrap().push(call);
        future::ready(reply).boxed()
    }
}

/// A static route with sensible defaults.
pub fn route(name: &str, path: &str, params: &[&str]) -> RouteConfig {
    RouteConfig {
        name: name.into(),
        path: path.into(),
        service: "com.example.DemoService".into(),
        method: name.into(),
        params: params.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}

pub fn config(routes: Vec<RouteConfig>) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.routes = routes;
    config
}

pub fn router(config: BridgeConfig, invoker: &ScriptedInvoker) -> Router {
    HttpServer::new(config, Arc::new(invoker.clone()))
        .expect("routes compile")
        .router()
}

/// Send one request through the router and collect the response body.
pub async fn send(router: &Router, request: Request<Body>) -> (Response<Body>, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (Response::from_parts(parts, Body::empty()), bytes)
}
