use serde::Serialize;
use serde_json::{Map, Value, json};

/// Route of an inbound lifecycle event, parsed from the gateway's
/// `routeKey` field.
///
/// Arbitrary route strings become `Custom` carrying the literal key as
/// data, so downstream dispatch is a match instead of string-built names.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteKey {
    Connect,
    Disconnect,
    Default,
    Custom(String),
}

impl RouteKey {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "$connect" => RouteKey::Connect,
            "$disconnect" => RouteKey::Disconnect,
            "$default" => RouteKey::Default,
            other => RouteKey::Custom(other.to_string()),
        }
    }
}

/// An inbound lifecycle event as consumed by the dispatcher.
///
/// Transient: decoded from the raw gateway event, consumed once, never
/// persisted. Missing context fields decode to empty strings rather than
/// failing, matching the gateway's lenient event shape.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub connection_id: String,
    pub route_key: RouteKey,
    pub raw_route_key: String,
    pub user_id: Option<i64>,
    pub body: Option<String>,
}

impl LifecycleEvent {
    /// Decodes the gateway event shape:
    ///
    /// ```json
    /// {
    ///   "requestContext": {
    ///     "connectionId": "...",
    ///     "routeKey": "$connect",
    ///     "authorizer": { "userId": 7 }
    ///   },
    ///   "body": "{...}"
    /// }
    /// ```
    pub fn from_value(event: &Value) -> Self {
        let context = event.get("requestContext");

        let connection_id = context
            .and_then(|ctx| ctx.get("connectionId"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let raw_route_key = context
            .and_then(|ctx| ctx.get("routeKey"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let user_id = context
            .and_then(|ctx| ctx.get("authorizer"))
            .and_then(|auth| auth.get("userId"))
            .and_then(Value::as_i64);

        let body = event
            .get("body")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            connection_id,
            route_key: RouteKey::parse(&raw_route_key),
            raw_route_key,
            user_id,
            body,
        }
    }

    /// The message payload carried in `body`. A missing or malformed body
    /// parses to an empty object, never an error.
    pub fn parsed_body(&self) -> Value {
        self.body
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// The response returned to the gateway for every lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn ok(message: &str) -> Self {
        Self {
            status_code: 200,
            body: json!({ "message": message }).to_string(),
        }
    }

    pub fn internal_error() -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": "Internal server error" }).to_string(),
        }
    }
}
