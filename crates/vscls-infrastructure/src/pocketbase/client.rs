//! PocketBaseClient - REST client for the session collection.

use super::dto::{AuthWithPasswordRequest, AuthWithPasswordResponse, ErrorResponse, ListResponse};
use super::filter::identity_filter;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tokio::sync::RwLock;
use vscls_core::auth::AuthState;
use vscls_core::config::BackendSettings;
use vscls_core::session::{SessionBackend, SessionDraft, SessionRecord};
use vscls_core::{Result, VsclsError};

const URL_HINT: &str = "check backend.url in config.toml";

/// Client for one PocketBase collection.
///
/// Holds a single [`AuthState`]: authentication takes the write lock for the
/// whole exchange, record calls share a read lock just long enough to copy
/// the token.
pub struct PocketBaseClient {
    client: Client,
    base_url: String,
    collection: String,
    auth_collection: Option<String>,
    page_size: u32,
    state: RwLock<AuthState>,
}

impl PocketBaseClient {
    /// Creates a client from the `[backend]` settings.
    ///
    /// Fails with a `Config` error when the URL is not http(s) or a
    /// collection name is not a plain identifier.
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let base_url = settings.url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| {
            VsclsError::config(format!(
                "Invalid backend URL '{}': {} ({})",
                settings.url, e, URL_HINT
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(VsclsError::config(format!(
                "Backend URL '{}' must start with http:// or https:// ({})",
                settings.url, URL_HINT
            )));
        }

        validate_collection(&settings.collection)?;
        if let Some(auth_collection) = &settings.auth_collection {
            validate_collection(auth_collection)?;
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            collection: settings.collection.clone(),
            auth_collection: settings.auth_collection.clone(),
            page_size: settings.page_size.max(1),
            state: RwLock::new(AuthState::Unauthenticated),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the authentication state.
    pub async fn auth_state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    fn auth_url(&self) -> String {
        match &self.auth_collection {
            Some(collection) => format!(
                "{}/api/collections/{}/auth-with-password",
                self.base_url, collection
            ),
            None => format!("{}/api/admins/auth-with-password", self.base_url),
        }
    }

    fn records_url(&self) -> String {
        format!("{}/api/collections/{}/records", self.base_url, self.collection)
    }

    fn record_url(&self, id: &str) -> Result<String> {
        validate_record_id(id)?;
        Ok(format!("{}/{}", self.records_url(), id))
    }

    async fn request_token(&self, identifier: &str, secret: &str) -> Result<String> {
        let url = self.auth_url();
        let response = self
            .client
            .post(&url)
            .json(&AuthWithPasswordRequest {
                identity: identifier,
                password: secret,
            })
            .send()
            .await
            .map_err(|err| {
                VsclsError::auth(format!(
                    "Could not reach {} ({}): {}",
                    self.base_url, URL_HINT, err
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VsclsError::auth(format!(
                "Login rejected by {} ({}): {}",
                self.base_url,
                status,
                error_message(&body)
            )));
        }

        let parsed: AuthWithPasswordResponse = response
            .json()
            .await
            .map_err(|err| VsclsError::auth(format!("Unreadable login response: {}", err)))?;

        parsed
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| VsclsError::auth("Login response did not contain a token"))
    }

    async fn token(&self) -> Result<String> {
        self.state
            .read()
            .await
            .token()
            .map(str::to_string)
            .ok_or_else(|| VsclsError::auth("Not authenticated; log in before calling the backend"))
    }

    /// Sends an authenticated request and maps non-2xx statuses to errors.
    async fn execute(&self, builder: RequestBuilder, record_id: Option<&str>) -> Result<Response> {
        let token = self.token().await?;
        let response = builder
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|err| {
                VsclsError::transport(format!(
                    "Request to {} failed ({}): {}",
                    self.base_url, URL_HINT, err
                ))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = map_http_error(status, &body, record_id);
        if err.is_auth() {
            // The token is no longer accepted; later calls must log in again
            *self.state.write().await = AuthState::Failed {
                reason: err.to_string(),
            };
        }
        Err(err)
    }

    async fn fetch_page(&self, filter: Option<String>) -> Result<Vec<SessionRecord>> {
        let mut query = vec![
            ("page", "1".to_string()),
            ("perPage", self.page_size.to_string()),
        ];
        if let Some(filter) = filter {
            query.push(("filter", filter));
        }

        let response = self
            .execute(self.client.get(self.records_url()).query(&query), None)
            .await?;
        let page: ListResponse<SessionRecord> = response
            .json()
            .await
            .map_err(|err| VsclsError::transport(format!("Failed to parse record list: {}", err)))?;

        if let Some(total) = page.total_items
            && total > page.items.len() as i64
        {
            tracing::warn!(
                "[PocketBase] {} holds {} records but only {} fit in one page; the rest are not shown",
                self.collection,
                total,
                page.items.len()
            );
        }

        Ok(page.items)
    }

    async fn parse_record(response: Response) -> Result<SessionRecord> {
        response
            .json()
            .await
            .map_err(|err| VsclsError::transport(format!("Failed to parse record: {}", err)))
    }
}

#[async_trait]
impl SessionBackend for PocketBaseClient {
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<()> {
        let mut state = self.state.write().await;
        *state = AuthState::Authenticating;

        match self.request_token(identifier, secret).await {
            Ok(token) => {
                tracing::info!("[PocketBase] Authenticated to {}", self.base_url);
                *state = AuthState::Authenticated { token };
                Ok(())
            }
            Err(err) => {
                tracing::warn!("[PocketBase] Authentication failed: {}", err);
                *state = AuthState::Failed {
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<SessionRecord>> {
        self.fetch_page(None).await
    }

    async fn find_by_identity(
        &self,
        machine_id: &str,
        project_name: &str,
        device_name: &str,
    ) -> Result<Vec<SessionRecord>> {
        let filter = identity_filter(machine_id, project_name, device_name)?;
        tracing::debug!("[PocketBase] Looking up records with filter {}", filter);
        self.fetch_page(Some(filter)).await
    }

    async fn create(&self, draft: &SessionDraft) -> Result<SessionRecord> {
        let response = self
            .execute(self.client.post(self.records_url()).json(draft), None)
            .await?;
        let record = Self::parse_record(response).await?;
        tracing::info!("[PocketBase] Created session record {}", record.id);
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &SessionDraft) -> Result<SessionRecord> {
        let url = self.record_url(id)?;
        let response = self.execute(self.client.patch(url).json(draft), Some(id)).await?;
        let record = Self::parse_record(response).await?;
        tracing::info!("[PocketBase] Updated session record {}", record.id);
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.record_url(id)?;
        self.execute(self.client.delete(url), Some(id)).await?;
        tracing::info!("[PocketBase] Deleted session record {}", id);
        Ok(())
    }
}

fn validate_collection(name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(VsclsError::config(format!(
            "'{}' is not a valid collection name",
            name
        )));
    }
    Ok(())
}

fn validate_record_id(id: &str) -> Result<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(VsclsError::validation(format!("'{}' is not a valid record id", id)));
    }
    Ok(())
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|err| err.describe())
        .unwrap_or_else(|_| body.trim().to_string())
}

fn map_http_error(status: StatusCode, body: &str, record_id: Option<&str>) -> VsclsError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            VsclsError::auth(format!("{}: {} (the login may have expired)", status, message))
        }
        StatusCode::NOT_FOUND => match record_id {
            Some(id) => VsclsError::not_found("session", id),
            None => VsclsError::transport(format!(
                "{}: {} (does the collection exist?)",
                status, message
            )),
        },
        StatusCode::BAD_REQUEST => VsclsError::validation(message),
        _ => VsclsError::transport(format!("{}: {}", status, message)),
    }
}
