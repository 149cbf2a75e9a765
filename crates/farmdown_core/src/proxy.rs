//! Same-origin proxy for the `/auth/*` endpoints.
//!
//! Requests are forwarded to the upstream API with their method, body and
//! `Authorization` header intact. The upstream answer is handed back as is;
//! the proxy only makes up a response of its own when it cannot reach the
//! upstream or cannot make sense of a JSON body.

use serde_json::{Value, json};

use crate::config::ApiConfig;
use crate::transport::{HttpRequest, Method, Transport, find_header};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

impl ProxyResponse {
    fn message(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Register,
    Login,
    Logout,
    Profile,
    Password,
}

impl Route {
    fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/auth/register" => Some(Route::Register),
            "/auth/login" => Some(Route::Login),
            "/auth/logout" => Some(Route::Logout),
            "/auth/profile" => Some(Route::Profile),
            "/auth/password" => Some(Route::Password),
            _ => None,
        }
    }

    fn upstream_path(self) -> &'static str {
        match self {
            Route::Register => "/auth/register",
            Route::Login => "/auth/login",
            Route::Logout => "/auth/logout",
            Route::Profile => "/auth/profile",
            Route::Password => "/auth/password",
        }
    }

    fn allows(self, method: Method) -> bool {
        match self {
            Route::Register | Route::Login | Route::Logout => method == Method::Post,
            Route::Profile => matches!(method, Method::Get | Method::Put),
            Route::Password => method == Method::Put,
        }
    }

    fn requires_auth(self) -> bool {
        matches!(self, Route::Logout | Route::Profile | Route::Password)
    }
}

pub struct AuthProxy<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> AuthProxy<T> {
    pub fn new(config: &ApiConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base().to_string(),
        }
    }

    pub fn handle(&self, request: &ProxyRequest) -> ProxyResponse {
        let Some(route) = Route::from_path(&request.path) else {
            return ProxyResponse::message(404, "Not found");
        };
        if !route.allows(request.method) {
            return ProxyResponse::message(405, "Method not allowed");
        }

        let authorization = request
            .header("Authorization")
            .filter(|value| !value.trim().is_empty());
        if route.requires_auth() && authorization.is_none() {
            return ProxyResponse::message(401, "Unauthorized");
        }

        let body = match request.body.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => Some(value.to_string()),
                Err(e) => {
                    tracing::warn!(path = %request.path, "unparseable request body: {e}");
                    return internal_error();
                }
            },
            None => None,
        };

        let mut upstream = HttpRequest::new(
            request.method,
            format!("{}{}", self.base_url, route.upstream_path()),
        );
        upstream.set_header("Content-Type", "application/json");
        upstream.set_header("Accept", "application/json");
        if let Some(authorization) = authorization {
            upstream.set_header("Authorization", authorization);
        }
        upstream.body = body;

        let response = match self.transport.send(&upstream) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(path = %request.path, "upstream unreachable: {e}");
                return internal_error();
            }
        };

        if let Err(e) = serde_json::from_str::<Value>(&response.body) {
            tracing::warn!(
                path = %request.path,
                status = response.status,
                "upstream answered with non-JSON body: {e}"
            );
            return internal_error();
        }

        tracing::debug!(path = %request.path, status = response.status, "proxied auth request");
        ProxyResponse {
            status: response.status,
            body: response.body,
        }
    }
}

fn internal_error() -> ProxyResponse {
    ProxyResponse::message(500, "Internal server error")
}
