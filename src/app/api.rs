//! HTTP client for the booking backend.
//!
//! Every call goes through [`ApiClient`], which attaches the bearer token for its
//! session kind and intercepts session expiry. The actual I/O sits behind the
//! [`Transport`] trait: the browser build uses the Fetch API, tests script
//! responses.

use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cancel::CancelToken;
use super::models::*;
use super::session::{SessionKind, SessionLoss, TokenStore};

/// Body message the backend sends with a 401 when a JWT has expired
pub const EXPIRED_TOKEN_MESSAGE: &str = "Expired JWT Token";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("You are not logged in")]
    MissingToken,
    #[error("Your session has expired")]
    ExpiredToken,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Not found")]
    NotFound,
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Error for a non-success response
    pub fn from_response(response: &RawResponse) -> Self {
        let message = extract_message(&response.body);
        match response.status {
            401 => ApiError::Unauthorized(message.unwrap_or_else(|| "Unauthorized".into())),
            403 => ApiError::Forbidden(message.unwrap_or_else(|| "Forbidden".into())),
            404 => ApiError::NotFound,
            status => ApiError::Http {
                status,
                message: message.unwrap_or_else(|| format!("Request failed ({status})")),
            },
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

/// Human readable message from an error body.
///
/// Looks at `message`, `error`, `hydra:description` and `detail`, in that order.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "hydra:description", "detail"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str())
        .map(str::to_string)
}

// =============================================================================
// Transport
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// File picked in an `<input type="file">`
#[derive(Clone, Debug, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PartValue {
    Text(String),
    File(FileUpload),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(name: &str, file: FileUpload) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::File(file),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Json {
        body: String,
        content_type: &'static str,
    },
    Multipart(Vec<FormPart>),
}

#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub cancel: Option<CancelToken>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a request and returns the raw status and body.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Side effects of losing a session (flash message + navigation to login)
pub trait SessionHooks {
    fn session_lost(&self, kind: SessionKind, loss: SessionLoss);
}

// =============================================================================
// Client
// =============================================================================

/// Which token, if any, a client attaches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// Public endpoints: no header
    Anonymous,
    /// Header when a token is stored; nothing happens when it is not
    Optional(SessionKind),
    /// Requests are never sent without a token
    Required(SessionKind),
}

impl AuthMode {
    fn kind(&self) -> Option<SessionKind> {
        match self {
            AuthMode::Anonymous => None,
            AuthMode::Optional(kind) | AuthMode::Required(kind) => Some(*kind),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    mode: AuthMode,
    tokens: Rc<dyn TokenStore>,
    transport: Rc<dyn Transport>,
    hooks: Option<Rc<dyn SessionHooks>>,
    cancel: Option<CancelToken>,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url
            && self.mode == other.mode
            && Rc::ptr_eq(&self.transport, &other.transport)
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        tokens: Rc<dyn TokenStore>,
        transport: Rc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mode: AuthMode::Anonymous,
            tokens,
            transport,
            hooks: None,
            cancel: None,
        }
    }

    pub fn with_mode(mut self, mode: AuthMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hooks(mut self, hooks: Rc<dyn SessionHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Same client without session side effects; the caller reports failures itself
    pub fn quiet(mut self) -> Self {
        self.hooks = None;
        self
    }

    /// Bind every request of this client to `token`
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn tokens(&self) -> &Rc<dyn TokenStore> {
        &self.tokens
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn lose_session(&self, kind: SessionKind, loss: SessionLoss) {
        if let Some(hooks) = &self.hooks {
            hooks.session_lost(kind, loss);
        }
    }

    /// Send a request through the interceptors.
    ///
    /// Non-2xx responses become errors; a 401 carrying the expired-token message
    /// clears the stored token first.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<RawResponse, ApiError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ApiError::Cancelled);
        }

        let token = self.mode.kind().and_then(|kind| self.tokens.get(kind));
        if let (AuthMode::Required(kind), None) = (self.mode, &token) {
            tracing::debug!("No {} token, not sending {}", kind.storage_key(), path);
            self.lose_session(kind, SessionLoss::Missing);
            return Err(ApiError::MissingToken);
        }

        let mut headers = vec![(
            "Accept".to_string(),
            "application/ld+json, application/json".to_string(),
        )];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let request = ApiRequest {
            method,
            url: self.url(path),
            headers,
            body,
            cancel: self.cancel.clone(),
        };
        let response = self.transport.send(request).await?;

        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ApiError::Cancelled);
        }

        if response.is_success() {
            return Ok(response);
        }

        if response.status == 401
            && extract_message(&response.body).as_deref() == Some(EXPIRED_TOKEN_MESSAGE)
        {
            if let Some(kind) = self.mode.kind() {
                tracing::warn!("{} token expired", kind.storage_key());
                self.tokens.clear(kind);
                self.lose_session(kind, SessionLoss::Expired);
            }
            return Err(ApiError::ExpiredToken);
        }

        let err = ApiError::from_response(&response);
        tracing::debug!("{} {} failed: {}", method.as_str(), path, err);
        Err(err)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::Get, path, RequestBody::Empty).await?;
        decode(&response)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, json_body(body)?).await?;
        decode(&response)
    }

    async fn send_ignoring_body<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(method, path, json_body(body)?).await.map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::Delete, path, RequestBody::Empty)
            .await
            .map(|_| ())
    }

    // ---- auth ----

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.send_json(Method::Post, "/login", credentials).await
    }

    pub async fn admin_login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.send_json(Method::Post, "/admin/login", credentials)
            .await
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.send_ignoring_body(Method::Post, "/register", registration)
            .await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        self.send_ignoring_body(Method::Post, "/password-reset-request", &body)
            .await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<(), ApiError> {
        self.send_ignoring_body(Method::Post, "/reset-password", reset)
            .await
    }

    pub async fn validate_token(&self, admin: bool) -> Result<TokenValidation, ApiError> {
        self.send_json(
            Method::Post,
            "/validate-token",
            &TokenValidationRequest { admin },
        )
        .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send_ignoring_body(Method::Post, "/logout", &serde_json::json!({}))
            .await
    }

    // ---- current user ----

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json("/user_info").await
    }

    pub async fn upload_profile_image(&self, file: FileUpload) -> Result<UploadResponse, ApiError> {
        let body = RequestBody::Multipart(vec![FormPart::file("image", file)]);
        let response = self.send(Method::Post, "/upload-image", body).await?;
        decode(&response)
    }

    pub async fn delete_profile_image(&self, user_id: EntityId) -> Result<(), ApiError> {
        self.delete(&format!("/delete-image/{user_id}")).await
    }

    // ---- riads ----

    pub async fn riads(&self) -> Result<Collection<Riad>, ApiError> {
        self.get_json("/riads").await
    }

    pub async fn riad(&self, id: EntityId) -> Result<Riad, ApiError> {
        self.get_json(&format!("/riads/{id}")).await
    }

    pub async fn create_riad(&self, form: &RiadForm) -> Result<Riad, ApiError> {
        self.send_json(Method::Post, "/riads", form).await
    }

    pub async fn update_riad(&self, id: EntityId, form: &RiadForm) -> Result<(), ApiError> {
        self.send_ignoring_body(Method::Put, &format!("/riads/{id}"), form)
            .await
    }

    pub async fn delete_riad(&self, id: EntityId) -> Result<(), ApiError> {
        self.delete(&format!("/riads/{id}")).await
    }

    // ---- rooms ----

    pub async fn rooms(&self) -> Result<Collection<Room>, ApiError> {
        self.get_json("/rooms").await
    }

    pub async fn room(&self, id: EntityId) -> Result<Room, ApiError> {
        self.get_json(&format!("/rooms/{id}")).await
    }

    /// Rooms are created as multipart so the first photo can ride along
    pub async fn create_room(
        &self,
        room: &RoomUpdate,
        image: Option<FileUpload>,
    ) -> Result<(), ApiError> {
        let mut parts = vec![
            FormPart::text("name", &room.name),
            FormPart::text("description", &room.description),
            FormPart::text("nb_personne", room.nb_personne.to_string()),
            FormPart::text("price", room.price.to_string()),
            FormPart::text("id_riad", &room.id_riad),
        ];
        if let Some(file) = image {
            parts.push(FormPart::file("imageFile", file));
        }
        self.send(Method::Post, "/rooms", RequestBody::Multipart(parts))
            .await
            .map(|_| ())
    }

    pub async fn update_room(&self, id: EntityId, room: &RoomUpdate) -> Result<(), ApiError> {
        self.send_ignoring_body(Method::Put, &format!("/rooms/{id}"), room)
            .await
    }

    pub async fn delete_room(&self, id: EntityId) -> Result<(), ApiError> {
        self.delete(&format!("/rooms/{id}")).await
    }

    // ---- images ----

    pub async fn upload_riad_image(
        &self,
        riad_id: EntityId,
        file: FileUpload,
    ) -> Result<(), ApiError> {
        let name = file.file_name.clone();
        let parts = vec![
            FormPart::file("imageFile", file),
            FormPart::text("riad", format!("/api/riads/{riad_id}")),
            FormPart::text("imageName", name),
        ];
        self.send(Method::Post, "/riad_images", RequestBody::Multipart(parts))
            .await
            .map(|_| ())
    }

    pub async fn delete_riad_image(&self, image_id: EntityId) -> Result<(), ApiError> {
        self.delete(&format!("/riad_images/{image_id}")).await
    }

    pub async fn upload_room_image(
        &self,
        room_id: EntityId,
        file: FileUpload,
    ) -> Result<(), ApiError> {
        let parts = vec![
            FormPart::file("imageFile", file),
            FormPart::text("room", format!("/api/rooms/{room_id}")),
        ];
        self.send(Method::Post, "/room_images", RequestBody::Multipart(parts))
            .await
            .map(|_| ())
    }

    pub async fn delete_room_image(&self, image_id: EntityId) -> Result<(), ApiError> {
        self.delete(&format!("/room_images/{image_id}")).await
    }

    // ---- users ----

    pub async fn users(&self) -> Result<Collection<User>, ApiError> {
        self.get_json("/users").await
    }

    pub async fn user(&self, id: EntityId) -> Result<User, ApiError> {
        self.get_json(&format!("/users/{id}")).await
    }

    pub async fn update_user(&self, id: EntityId, update: &UserUpdate) -> Result<(), ApiError> {
        self.send_ignoring_body(Method::Put, &format!("/users/{id}"), update)
            .await
    }

    pub async fn delete_user(&self, id: EntityId) -> Result<(), ApiError> {
        self.delete(&format!("/users/{id}")).await
    }

    // ---- reservations ----

    pub async fn reservations(&self) -> Result<Collection<Reservation>, ApiError> {
        self.get_json("/reservations").await
    }

    pub async fn create_reservation(&self, reservation: &Reservation) -> Result<(), ApiError> {
        let body = RequestBody::Json {
            body: serde_json::to_string(reservation).map_err(|e| ApiError::Decode(e.to_string()))?,
            content_type: "application/ld+json",
        };
        self.send(Method::Post, "/reservations", body)
            .await
            .map(|_| ())
    }
}

fn json_body<B: Serialize>(body: &B) -> Result<RequestBody, ApiError> {
    Ok(RequestBody::Json {
        body: serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?,
        content_type: "application/json",
    })
}

fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

// =============================================================================
// Browser transport
// =============================================================================

/// Fetch API transport (client-side only)
#[derive(Clone, Copy, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        let js_err = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{:?}", e));

        let window = web_sys::window().ok_or_else(|| ApiError::Network("No window".into()))?;
        let headers = Headers::new().map_err(js_err)?;
        for (name, value) in &request.headers {
            headers.set(name, value).map_err(js_err)?;
        }

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());

        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json { body, content_type } => {
                headers.set("Content-Type", content_type).map_err(js_err)?;
                opts.set_body(&wasm_bindgen::JsValue::from_str(body));
            }
            RequestBody::Multipart(parts) => {
                // The browser sets the multipart boundary itself
                opts.set_body(&multipart_form(parts)?);
            }
        }
        opts.set_headers(&headers);

        if let Some(signal) = request.cancel.as_ref().and_then(CancelToken::abort_signal) {
            opts.set_signal(Some(&signal));
        }

        let req = Request::new_with_str_and_init(&request.url, &opts).map_err(js_err)?;

        let resp_value = match JsFuture::from(window.fetch_with_request(&req)).await {
            Ok(v) => v,
            Err(_) if request.cancel.as_ref().is_some_and(CancelToken::is_cancelled) => {
                return Err(ApiError::Cancelled)
            }
            Err(e) => return Err(js_err(e)),
        };
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Network("Not a Response".into()))?;

        let text = JsFuture::from(resp.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;

        Ok(RawResponse {
            status: resp.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn multipart_form(parts: &[FormPart]) -> Result<web_sys::FormData, ApiError> {
    use web_sys::{Blob, BlobPropertyBag, FormData};

    let js_err = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{:?}", e));
    let form = FormData::new().map_err(js_err)?;

    for part in parts {
        match &part.value {
            PartValue::Text(text) => form.append_with_str(&part.name, text).map_err(js_err)?,
            PartValue::File(file) => {
                let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
                let chunks = js_sys::Array::of1(&bytes);
                let props = BlobPropertyBag::new();
                if let Some(ct) = &file.content_type {
                    props.set_type(ct);
                }
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &props)
                    .map_err(js_err)?;
                form.append_with_blob_and_filename(&part.name, &blob, &file.file_name)
                    .map_err(js_err)?;
            }
        }
    }
    Ok(form)
}

/// SSR stub - returns error (should not be called during SSR)
#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, _request: ApiRequest) -> Result<RawResponse, ApiError> {
        Err(ApiError::Network(
            "fetch is only available in browser".to_string(),
        ))
    }
}

/// GET JSON from the hosting origin (client-side only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    let window = web_sys::window().ok_or("No window")?;
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("{:?}", e))?;

    let resp: Response = resp_value.dyn_into().map_err(|_| "Not a Response")?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    let json = JsFuture::from(resp.json().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("{:?}", e))?;

    serde_wasm_bindgen::from_value(json).map_err(|e| format!("{:?}", e))
}

/// SSR stub - returns error (should not be called during SSR)
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_json<T: DeserializeOwned>(_url: &str) -> Result<T, String> {
    Err("fetch_json is only available in browser".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_taken_from_known_fields() {
        assert_eq!(
            extract_message(r#"{"code":401,"message":"Expired JWT Token"}"#).as_deref(),
            Some("Expired JWT Token")
        );
        assert_eq!(
            extract_message(r#"{"hydra:description":"name: This value should not be blank."}"#)
                .as_deref(),
            Some("name: This value should not be blank.")
        );
        assert_eq!(extract_message(r#"{"detail":"Nope"}"#).as_deref(), Some("Nope"));
        assert_eq!(extract_message("<html>oops</html>"), None);
    }

    #[test]
    fn status_maps_to_error_variant() {
        let resp = |status, body: &str| RawResponse {
            status,
            body: body.to_string(),
        };
        assert_eq!(
            ApiError::from_response(&resp(401, r#"{"message":"Invalid credentials."}"#)),
            ApiError::Unauthorized("Invalid credentials.".into())
        );
        assert_eq!(
            ApiError::from_response(&resp(403, "")),
            ApiError::Forbidden("Forbidden".into())
        );
        assert_eq!(ApiError::from_response(&resp(404, "")), ApiError::NotFound);
        assert_eq!(
            ApiError::from_response(&resp(500, "")),
            ApiError::Http {
                status: 500,
                message: "Request failed (500)".into()
            }
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = ApiRequest {
            method: Method::Get,
            url: "/api/riads".into(),
            headers: vec![("Authorization".into(), "Bearer x".into())],
            body: RequestBody::Empty,
            cancel: None,
        };
        assert_eq!(req.header("authorization"), Some("Bearer x"));
        assert_eq!(req.header("content-type"), None);
    }
}
