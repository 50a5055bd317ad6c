//! Loopback invoker: replies with the decoded call instead of reaching a provider.

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::bridge::TypedValue;
use crate::rpc::{InvokeError, RpcCall, RpcInvoker, RpcReply};

/// Echoes each call back as `{service, method, arguments, attachments}`.
///
/// Useful for checking how requests are bridged before a provider exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackInvoker;

impl LoopbackInvoker {
    fn describe(call: RpcCall) -> TypedValue {
        let arguments = call
            .arguments
            .into_iter()
            .map(|arg| arg.unwrap_or(TypedValue::Null))
            .collect();
        let mut attachments: Vec<_> = call.attachments.into_iter().collect();
        attachments.sort();

        TypedValue::Map(vec![
            (TypedValue::from("service"), TypedValue::String(call.target.service)),
            (TypedValue::from("method"), TypedValue::String(call.target.method)),
            (
                TypedValue::from("types"),
                TypedValue::List(call.parameter_types.into_iter().map(TypedValue::String).collect()),
            ),
            (TypedValue::from("arguments"), TypedValue::List(arguments)),
            (
                TypedValue::from("attachments"),
                TypedValue::Map(
                    attachments
                        .into_iter()
                        .map(|(k, v)| (TypedValue::String(k), TypedValue::String(v)))
                        .collect(),
                ),
            ),
        ])
    }
}

impl RpcInvoker for LoopbackInvoker {
    fn invoke(&self, call: RpcCall) -> BoxFuture<'static, Result<RpcReply, InvokeError>> {
        tracing::debug!(
            service = %call.target.service,
            method = %call.target.method,
            "Loopback invocation"
        );
        future::ready(Ok(RpcReply::normal(Some(Self::describe(call))))).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::RpcTarget;
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_loopback_echoes_call() {
        let call = RpcCall {
            target: RpcTarget {
                service: "com.example.Echo".into(),
                method: "echo".into(),
                ..Default::default()
            },
            parameter_types: vec!["int".into(), "java.lang.String".into()],
            arguments: vec![Some(TypedValue::Integer(1)), None],
            attachments: HashMap::from([("x-nsf-a".to_string(), "b".to_string())]),
        };

        let reply = LoopbackInvoker.invoke(call).await.unwrap();
        assert_eq!(reply.kind, crate::bridge::ReplyKind::Normal);
        assert_eq!(
            reply.value.unwrap().to_json(),
            json!({
                "service": "com.example.Echo",
                "method": "echo",
                "types": ["int", "java.lang.String"],
                "arguments": [1, null],
                "attachments": {"x-nsf-a": "b"},
            })
        );
    }
}
