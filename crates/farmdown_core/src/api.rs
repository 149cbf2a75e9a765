//! Typed client for the farm REST API.
//!
//! Responses are decoded once, here, into concrete schemas. Authentication
//! state comes from an injected [`SessionStore`]; a 401 from the server clears
//! it and surfaces as [`ApiError::Unauthorized`] so the caller can send the
//! user back to the login entry point.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::session::{AuthSession, AuthUser, SessionError, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized, sign in again at {login_path}")]
    Unauthorized { login_path: String },
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// HTTP status behind the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The `{ data, meta, links }` wrapper every API response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub links: Option<Value>,
}

/// A payload that may or may not be wrapped in a `data` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeWrapped<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> MaybeWrapped<T> {
    pub fn into_inner(self) -> T {
        match self {
            MaybeWrapped::Wrapped { data } | MaybeWrapped::Bare(data) => data,
        }
    }
}

/// AI analysis of a soil sample or a lab analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub success: bool,
    pub ai_analysis: Option<String>,
    pub analysis: Option<String>,
    pub generated_at: Option<String>,
    pub error: Option<String>,
}

impl AiAnalysis {
    /// The markdown body, whichever field the endpoint filled in.
    pub fn text(&self) -> Option<&str> {
        self.ai_analysis
            .as_deref()
            .or(self.analysis.as_deref())
            .filter(|text| !text.is_empty())
    }

    /// Decode a payload that may be wrapped in up to two `data` layers.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let payload: MaybeWrapped<MaybeWrapped<AiAnalysis>> = serde_json::from_str(body)?;
        Ok(payload.into_inner().into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRecommendationRequest {
    pub field_id: u64,
    pub soil_id: u64,
    pub plant_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropRecommendation {
    pub success: bool,
    pub recommendation: Option<String>,
    pub plant_name: Option<String>,
    pub field_name: Option<String>,
    pub generated_at: Option<String>,
    pub error: Option<String>,
}

impl CropRecommendation {
    pub fn text(&self) -> Option<&str> {
        self.recommendation.as_deref().filter(|text| !text.is_empty())
    }
}

/// Fields and plants a crop recommendation can be requested for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropRecommendationOptions {
    pub fields: Vec<FieldOption>,
    pub plants: Vec<PlantOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub area_ha: Option<f64>,
    #[serde(default)]
    pub soils: Vec<SoilOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilOption {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sampled_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantOption {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Profile fields to change; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AuthSuccess {
    user: AuthUser,
    token: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Map<String, Value>>,
}

impl ErrorBody {
    /// `message`, else the first validation error, if any.
    fn into_message(self) -> Option<String> {
        if let Some(message) = self.message {
            return Some(message);
        }
        self.errors?
            .into_iter()
            .next()
            .and_then(|(_, v)| v.get(0).and_then(Value::as_str).map(str::to_string))
    }
}

pub struct ApiClient<T, S> {
    transport: T,
    session: S,
    base_url: String,
    login_path: String,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    pub fn new(config: &ApiConfig, transport: T, session: S) -> Self {
        Self {
            transport,
            session,
            base_url: config.base().to_string(),
            login_path: config.login_path.clone(),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Issue a request and decode the `data` of the response envelope.
    pub fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        let response = self.send(method, endpoint, body)?;
        let envelope: Envelope<R> = serde_json::from_str(&response.body)?;
        Ok(envelope.data)
    }

    /// Like [`call`](Self::call), for endpoints that may skip the envelope.
    fn call_lenient<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<R, ApiError> {
        let response = self.send(method, endpoint, body)?;
        let payload: MaybeWrapped<R> = serde_json::from_str(&response.body)?;
        Ok(payload.into_inner())
    }

    fn send(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::new(method, format!("{}{}", self.base_url, endpoint));
        request.default_header("Content-Type", "application/json");
        request.default_header("Accept", "application/json");
        if let Some(token) = self.session.token() {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request.body = Some(body.to_string());
        }

        tracing::debug!(%method, endpoint, "calling API");
        let response = self.transport.send(&request).inspect_err(|e| {
            tracing::warn!(%method, endpoint, "API request failed: {e}");
        })?;

        if response.status == 401 {
            tracing::info!(endpoint, "API rejected the session, signing out");
            // The caller still has to be sent to login if the store can't be cleared
            if let Err(e) = self.session.clear() {
                tracing::warn!(endpoint, "failed to clear rejected session: {e}");
            }
            return Err(ApiError::Unauthorized {
                login_path: self.login_path.clone(),
            });
        }

        if !response.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| format!("API error: {}", response.status));
            tracing::warn!(endpoint, status = response.status, "API error");
            return Err(ApiError::Status {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }

    pub fn analysis_ai(&self, analysis_id: u64) -> Result<AiAnalysis, ApiError> {
        self.ai_analysis(&format!("/analyses/{analysis_id}/ai-analysis"))
    }

    pub fn soil_ai(&self, soil_id: u64) -> Result<AiAnalysis, ApiError> {
        self.ai_analysis(&format!("/soils/{soil_id}/ai-analysis"))
    }

    fn ai_analysis(&self, endpoint: &str) -> Result<AiAnalysis, ApiError> {
        let response = self.send(Method::Get, endpoint, None)?;
        Ok(AiAnalysis::from_json(&response.body)?)
    }

    pub fn crop_recommendation(
        &self,
        request: &CropRecommendationRequest,
    ) -> Result<CropRecommendation, ApiError> {
        let body = serde_json::to_value(request)?;
        self.call_lenient(Method::Post, "/crop-recommendation", Some(body))
    }

    pub fn crop_recommendation_options(&self) -> Result<CropRecommendationOptions, ApiError> {
        self.call_lenient(Method::Get, "/crop-recommendation/options", None)
    }

    /// Sign in and store the session.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthUser, ApiError> {
        let body = serde_json::to_value(Credentials { email, password })?;
        self.authenticate("/auth/login", body)
    }

    /// Create an account and sign in as it.
    pub fn register(&self, registration: &Registration) -> Result<AuthUser, ApiError> {
        let body = serde_json::to_value(registration)?;
        self.authenticate("/auth/register", body)
    }

    fn authenticate(&self, endpoint: &str, body: Value) -> Result<AuthUser, ApiError> {
        let success: AuthSuccess = self.call_lenient(Method::Post, endpoint, Some(body))?;
        let user = success.user.clone();
        self.session.set(AuthSession {
            user: success.user,
            token: success.token,
        })?;
        tracing::info!(user_id = user.id, endpoint, "signed in");
        Ok(user)
    }

    /// Sign out upstream. The local session is cleared even if that fails.
    pub fn logout(&self) -> Result<(), ApiError> {
        let result = self.send(Method::Post, "/auth/logout", None);
        if let Err(e) = &result {
            tracing::warn!("logout request failed: {e}");
        }
        self.session.clear()?;
        result.map(|_| ())
    }

    pub fn profile(&self) -> Result<AuthUser, ApiError> {
        self.call_lenient(Method::Get, "/auth/profile", None)
    }

    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<AuthUser, ApiError> {
        let body = serde_json::to_value(update)?;
        self.call_lenient(Method::Put, "/auth/profile", Some(body))
    }

    /// Change the password. Returns the server's confirmation message.
    pub fn update_password(&self, update: &PasswordUpdate) -> Result<String, ApiError> {
        let body = serde_json::to_value(update)?;
        let response = self.send(Method::Put, "/auth/password", Some(body))?;
        let reply: MessageBody = serde_json::from_str(&response.body)?;
        Ok(reply.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::sync::Arc;

    /// Replays canned responses and records what was sent.
    #[derive(Default)]
    struct FakeTransport {
        responses: RefCell<Vec<Result<HttpResponse, TransportError>>>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            let fake = Self::default();
            fake.responses.borrow_mut().push(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
            fake
        }

        fn failing() -> Self {
            let fake = Self::default();
            fake.responses
                .borrow_mut()
                .push(Err(TransportError("connection refused".to_string())));
            fake
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            self.responses.borrow_mut().remove(0)
        }
    }

    fn config() -> ApiConfig {
        ApiConfig {
            base_url: "http://api.test/api/".to_string(),
            ..ApiConfig::default()
        }
    }

    fn signed_in() -> Arc<MemorySessionStore> {
        let store = Arc::new(MemorySessionStore::new());
        store
            .set(AuthSession {
                user: AuthUser {
                    id: 1,
                    name: "Aziz".to_string(),
                    email: "aziz@example.com".to_string(),
                },
                token: "secret".to_string(),
            })
            .unwrap();
        store
    }

    #[test]
    fn sends_bearer_and_json_headers() {
        let transport = FakeTransport::replying(200, r##"{"data": {"success": true, "ai_analysis": "# Hi"}}"##);
        let client = ApiClient::new(&config(), &transport, signed_in());

        let analysis = client.analysis_ai(5).unwrap();
        assert_eq!(analysis.text(), Some("# Hi"));

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].url, "http://api.test/api/analyses/5/ai-analysis");
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].header("authorization"), Some("Bearer secret"));
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
    }

    #[test]
    fn no_token_no_authorization_header() {
        let transport = FakeTransport::replying(200, r#"{"success": true, "analysis": "x"}"#);
        let client = ApiClient::new(&config(), &transport, MemorySessionStore::new());

        assert_eq!(client.soil_ai(3).unwrap().text(), Some("x"));
        assert_eq!(transport.sent.borrow()[0].header("Authorization"), None);
    }

    #[test]
    fn unauthorized_clears_session() {
        let transport = FakeTransport::replying(401, r#"{"message": "Unauthenticated."}"#);
        let store = signed_in();
        let client = ApiClient::new(&config(), &transport, Arc::clone(&store));

        let err = client.soil_ai(1).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { ref login_path } if login_path == "/auth/login"));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn non_success_carries_status() {
        let transport = FakeTransport::replying(500, "<html>oops</html>");
        let client = ApiClient::new(&config(), &transport, signed_in());

        let err = client.soil_ai(1).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "API error: 500");
        assert!(client.session().get().is_some());
    }

    #[test]
    fn validation_message_is_surfaced() {
        let transport = FakeTransport::replying(
            422,
            r#"{"errors": {"email": ["The email field is required."]}}"#,
        );
        let client = ApiClient::new(&config(), &transport, MemorySessionStore::new());

        let err = client.login("", "pw").unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "The email field is required.");
    }

    #[test]
    fn transport_failure() {
        let transport = FakeTransport::failing();
        let client = ApiClient::new(&config(), &transport, MemorySessionStore::new());
        assert!(matches!(client.soil_ai(1), Err(ApiError::Transport(_))));
    }

    #[test]
    fn envelope_call_decodes_data() {
        let transport = FakeTransport::replying(
            200,
            r#"{"data": [{"id": 1}, {"id": 2}], "meta": {"total": 2}, "links": null}"#,
        );
        let client = ApiClient::new(&config(), &transport, MemorySessionStore::new());

        let fields: Vec<Value> = client.call(Method::Get, "/fields", None).unwrap();
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn login_stores_session() {
        let transport = FakeTransport::replying(
            200,
            r#"{"message": "ok", "data": {"user": {"id": 9, "name": "Malika", "email": "m@example.com"}, "token": "t9", "token_type": "Bearer"}}"#,
        );
        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new(&config(), &transport, Arc::clone(&store));

        let user = client.login("m@example.com", "pw").unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(store.token().as_deref(), Some("t9"));

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "m@example.com");
    }

    #[test]
    fn login_accepts_bare_payload() {
        let transport = FakeTransport::replying(
            200,
            r#"{"user": {"id": 2, "name": "B", "email": "b@example.com"}, "token": "t2"}"#,
        );
        let client = ApiClient::new(&config(), &transport, MemorySessionStore::new());
        assert_eq!(client.login("b@example.com", "pw").unwrap().id, 2);
    }

    #[test]
    fn logout_clears_even_on_failure() {
        let transport = FakeTransport::failing();
        let store = signed_in();
        let client = ApiClient::new(&config(), &transport, Arc::clone(&store));

        assert!(client.logout().is_err());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn crop_recommendation_posts_ids() {
        let transport = FakeTransport::replying(
            200,
            r###"{"data": {"success": true, "recommendation": "## Bug'doy", "plant_name": "Bug'doy"}}"###,
        );
        let client = ApiClient::new(&config(), &transport, signed_in());

        let result = client
            .crop_recommendation(&CropRecommendationRequest {
                field_id: 1,
                soil_id: 2,
                plant_id: 3,
            })
            .unwrap();
        assert_eq!(result.text(), Some("## Bug'doy"));

        let body: Value =
            serde_json::from_str(transport.sent.borrow()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"field_id": 1, "soil_id": 2, "plant_id": 3}));
    }

    #[test]
    fn analysis_payload_shapes() {
        let bare = AiAnalysis::from_json(r#"{"success": true, "analysis": "a"}"#).unwrap();
        let once = AiAnalysis::from_json(r#"{"data": {"success": true, "analysis": "a"}}"#).unwrap();
        let twice =
            AiAnalysis::from_json(r#"{"data": {"data": {"success": true, "analysis": "a"}}}"#).unwrap();
        assert_eq!(bare, once);
        assert_eq!(once, twice);
        assert_eq!(AiAnalysis::from_json(r#"{"success": false}"#).unwrap().text(), None);
    }

    /// Holds a session it can never clear.
    struct StuckStore(MemorySessionStore);

    impl SessionStore for StuckStore {
        fn get(&self) -> Option<AuthSession> {
            self.0.get()
        }

        fn set(&self, session: AuthSession) -> Result<(), SessionError> {
            self.0.set(session)
        }

        fn clear(&self) -> Result<(), SessionError> {
            Err(SessionError::Io {
                path: "s.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn subscribe(&self, listener: crate::session::Listener) -> crate::session::SubscriptionId {
            self.0.subscribe(listener)
        }

        fn unsubscribe(&self, id: crate::session::SubscriptionId) -> bool {
            self.0.unsubscribe(id)
        }
    }

    #[test]
    fn unauthorized_survives_failed_clear() {
        let transport = FakeTransport::replying(401, "{}");
        let client = ApiClient::new(&config(), &transport, StuckStore(MemorySessionStore::new()));

        let err = client.soil_ai(1).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn register_stores_session() {
        let transport = FakeTransport::replying(
            201,
            r#"{"message": "Registered", "data": {"user": {"id": 4, "name": "Dilnoza", "email": "d@example.com"}, "token": "t4", "token_type": "Bearer"}}"#,
        );
        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new(&config(), &transport, Arc::clone(&store));

        let user = client
            .register(&Registration {
                name: "Dilnoza".to_string(),
                email: "d@example.com".to_string(),
                password: "hunter22".to_string(),
                password_confirmation: "hunter22".to_string(),
            })
            .unwrap();
        assert_eq!(user.name, "Dilnoza");
        assert_eq!(store.token().as_deref(), Some("t4"));

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://api.test/api/auth/register");
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "Dilnoza",
                "email": "d@example.com",
                "password": "hunter22",
                "password_confirmation": "hunter22"
            })
        );
    }

    #[test]
    fn update_profile_sends_only_changed_fields() {
        let transport = FakeTransport::replying(
            200,
            r#"{"message": "Updated", "data": {"id": 1, "name": "Aziz R.", "email": "aziz@example.com"}}"#,
        );
        let client = ApiClient::new(&config(), &transport, signed_in());

        let user = client
            .update_profile(&ProfileUpdate {
                name: Some("Aziz R.".to_string()),
                email: None,
            })
            .unwrap();
        assert_eq!(user.name, "Aziz R.");

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url, "http://api.test/api/auth/profile");
        assert_eq!(sent[0].header("Authorization"), Some("Bearer secret"));
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Aziz R."}));
    }

    #[test]
    fn update_password_returns_message() {
        let transport =
            FakeTransport::replying(200, r#"{"message": "Password updated successfully"}"#);
        let client = ApiClient::new(&config(), &transport, signed_in());

        let message = client
            .update_password(&PasswordUpdate {
                current_password: "old".to_string(),
                password: "new-pass".to_string(),
                password_confirmation: "new-pass".to_string(),
            })
            .unwrap();
        assert_eq!(message, "Password updated successfully");

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].url, "http://api.test/api/auth/password");
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["current_password"], "old");
        assert_eq!(body["password_confirmation"], "new-pass");
    }

    #[test]
    fn update_password_rejection_is_surfaced() {
        let transport = FakeTransport::replying(
            422,
            r#"{"errors": {"current_password": ["The current password is incorrect."]}}"#,
        );
        let client = ApiClient::new(&config(), &transport, signed_in());

        let err = client
            .update_password(&PasswordUpdate {
                current_password: "wrong".to_string(),
                password: "x".to_string(),
                password_confirmation: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "The current password is incorrect.");
    }

    #[test]
    fn crop_recommendation_options_decode() {
        let transport = FakeTransport::replying(
            200,
            r#"{"data": {
                "fields": [{"id": 7, "name": "Shimoliy dala", "area_ha": 12.5,
                            "soils": [{"id": 3, "field_id": 7, "name": null, "sampled_at": "2024-05-01"}]}],
                "plants": [{"id": 2, "name": "Paxta", "description": null}]
            }}"#,
        );
        let client = ApiClient::new(&config(), &transport, signed_in());

        let options = client.crop_recommendation_options().unwrap();
        assert_eq!(
            options,
            CropRecommendationOptions {
                fields: vec![FieldOption {
                    id: 7,
                    name: "Shimoliy dala".to_string(),
                    area_ha: Some(12.5),
                    soils: vec![SoilOption {
                        id: 3,
                        name: None,
                        sampled_at: Some("2024-05-01".to_string()),
                    }],
                }],
                plants: vec![PlantOption {
                    id: 2,
                    name: "Paxta".to_string(),
                    description: None,
                }],
            }
        );

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].url, "http://api.test/api/crop-recommendation/options");
    }

    #[test]
    fn crop_recommendation_options_tolerate_missing_lists() {
        let transport = FakeTransport::replying(200, r#"{"plants": []}"#);
        let client = ApiClient::new(&config(), &transport, signed_in());
        assert_eq!(
            client.crop_recommendation_options().unwrap(),
            CropRecommendationOptions::default()
        );
    }
}
