//! HTTP wrapper over the hosted identity service.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;
use uuid::Uuid;

use lessonhub_core::config::identity::IdentityConfig;
use lessonhub_core::error::AppError;
use lessonhub_core::events::SessionEvent;
use lessonhub_core::result::AppResult;
use lessonhub_core::traits::{AuthSession, IdentityProvider};

/// Generic credential-failure message. Unknown account and wrong password
/// are deliberately indistinguishable.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Session payload returned by the identity service.
#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    user: UserPayload,
}

/// Principal payload embedded in a session response.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Uuid,
    email: String,
}

/// Identity provider backed by the hosted identity REST API.
///
/// Tracks the current session locally and mirrors every change onto the
/// session event channel so the tracker sees HTTP and in-memory providers
/// identically.
#[derive(Debug)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    current: Mutex<Option<AuthSession>>,
    events: broadcast::Sender<SessionEvent>,
}

impl HttpIdentityProvider {
    /// Create a provider from configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    lessonhub_core::error::ErrorKind::Configuration,
                    "Failed to build identity HTTP client",
                    e,
                )
            })?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            current: Mutex::new(None),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn establish(&self, payload: SessionPayload) -> AuthSession {
        let session = AuthSession {
            principal_id: payload.user.id,
            email: payload.user.email,
            access_token: payload.access_token,
        };

        *self.current.lock().await = Some(session.clone());
        let _ = self.events.send(SessionEvent::SignedIn {
            principal_id: session.principal_id,
            email: session.email.clone(),
        });

        session
    }

    async fn parse_session(&self, response: reqwest::Response) -> AppResult<SessionPayload> {
        response.json::<SessionPayload>().await.map_err(|e| {
            AppError::with_source(
                lessonhub_core::error::ErrorKind::ExternalService,
                "Malformed identity service response",
                e,
            )
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn create_account(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let response = self
            .client
            .post(self.endpoint("/signup"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    lessonhub_core::error::ErrorKind::ExternalService,
                    "Identity service unreachable",
                    e,
                )
            })?;

        if response.status() == reqwest::StatusCode::CONFLICT
            || response.status() == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(AppError::conflict("An account with this email already exists"));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Account creation failed with status {}",
                response.status()
            )));
        }

        let payload = self.parse_session(response).await?;
        debug!(principal_id = %payload.user.id, "Account created");
        Ok(self.establish(payload).await)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let response = self
            .client
            .post(self.endpoint("/token?grant_type=password"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    lessonhub_core::error::ErrorKind::ExternalService,
                    "Identity service unreachable",
                    e,
                )
            })?;

        // Any client-side rejection maps to the same message; the response
        // never reveals whether the account exists.
        if response.status().is_client_error() {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }
        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Authentication failed with status {}",
                response.status()
            )));
        }

        let payload = self.parse_session(response).await?;
        Ok(self.establish(payload).await)
    }

    async fn current_session(&self) -> AppResult<Option<AuthSession>> {
        Ok(self.current.lock().await.clone())
    }

    async fn end_session(&self) -> AppResult<()> {
        let session = self.current.lock().await.take();

        if let Some(session) = session {
            let _ = self
                .client
                .post(self.endpoint("/logout"))
                .header("apikey", &self.api_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;

            let _ = self.events.send(SessionEvent::SignedOut {
                principal_id: session.principal_id,
            });
        }

        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.endpoint("/recover"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    lessonhub_core::error::ErrorKind::ExternalService,
                    "Identity service unreachable",
                    e,
                )
            })?;

        // The service answers 2xx for unknown addresses too; only a
        // server-side failure surfaces.
        if response.status().is_server_error() {
            return Err(AppError::external_service(format!(
                "Password reset request failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> AppResult<()> {
        let session = self
            .current
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::authentication("No active session"))?;

        let response = self
            .client
            .put(self.endpoint("/user"))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .json(&serde_json::json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    lessonhub_core::error::ErrorKind::ExternalService,
                    "Identity service unreachable",
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Password update failed with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
