use chrono::{Duration, Utc};
use futures::future::join_all;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::{code_for_fcm_error, code_for_http_status, FCMError};
use crate::models::*;

/// Default FCM HTTP v1 API host
pub const FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

/// Upper bound on tokens in a single multicast request
pub const MAX_MULTICAST_TOKENS: usize = 500;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Firebase Cloud Messaging Client
///
/// Manages OAuth2 token generation, caching, and message delivery through the
/// FCM HTTP v1 API. A single instance is meant to be shared for the lifetime of
/// the process; the only internal state is the access token cache.
pub struct FCMClient {
    pub project_id: String,
    pub credentials: Arc<ServiceAccountKey>,
    endpoint: String,
    token_cache: Arc<Mutex<Option<TokenCache>>>,
    http_client: reqwest::Client,
}

impl FCMClient {
    /// Create new FCM client for the project named in the service account key
    pub fn new(credentials: ServiceAccountKey) -> Self {
        Self {
            project_id: credentials.project_id.clone(),
            credentials: Arc::new(credentials),
            endpoint: FCM_ENDPOINT.to_string(),
            token_cache: Arc::new(Mutex::new(None)),
            http_client: reqwest::Client::new(),
        }
    }

    /// Load a service account JSON file and build a client from it.
    ///
    /// The private key is parsed eagerly so bad credentials surface at startup.
    pub fn from_service_account_file(path: impl AsRef<Path>) -> Result<Self, FCMError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| FCMError::CredentialFileError(format!("{}: {}", path.display(), e)))?;
        let credentials: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| FCMError::CredentialFileError(format!("{}: {}", path.display(), e)))?;

        EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| FCMError::KeyParseError(e.to_string()))?;

        Ok(Self::new(credentials))
    }

    /// Override the project messages are sent under
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Override the FCM API host (e.g. an emulator or local stub)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Send one message to a device token or topic.
    ///
    /// Returns the message name assigned by FCM,
    /// e.g. `projects/<project>/messages/<id>`.
    pub async fn send_message(&self, message: &Message) -> Result<String, FCMError> {
        let content = validate_message(message)?;
        let access_token = self.get_access_token().await?;

        let name = self.post_message(&access_token, content).await?;
        debug!("FCM message accepted: {}", name);
        Ok(name)
    }

    /// Send the same notification to every token in the message.
    ///
    /// One request is issued per token, concurrently. Per-token failures are
    /// recorded in the returned batch; only request-level problems (bad token
    /// list, credentials) are returned as errors.
    pub async fn send_each_for_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, FCMError> {
        let tokens = token_list(message.tokens.as_ref())?;
        let notification = parse_notification(message.notification.as_ref())?;

        let access_token = self.get_access_token().await?;
        let access_token = access_token.as_str();

        let sends = tokens.into_iter().map(|token| {
            let notification = notification.clone();
            async move {
                let result = match validate_token(token) {
                    Ok(()) => {
                        let content = FcmMessageContent {
                            token: Some(token),
                            topic: None,
                            notification,
                        };
                        self.post_message(access_token, content).await
                    }
                    Err(e) => Err(e),
                };

                match result {
                    Ok(name) => SendResponse::delivered(name),
                    Err(e) => {
                        warn!(
                            "FCM multicast delivery failed for token {}: {}",
                            token_prefix(token),
                            e
                        );
                        SendResponse::failed(e)
                    }
                }
            }
        });

        let batch = BatchResponse::from_responses(join_all(sends).await);
        debug!(
            "FCM multicast finished: {} delivered, {} failed",
            batch.success_count, batch.failure_count
        );
        Ok(batch)
    }

    async fn post_message(
        &self,
        access_token: &str,
        content: FcmMessageContent<'_>,
    ) -> Result<String, FCMError> {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.project_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&FcmMessage { message: content })
            .send()
            .await
            .map_err(|e| FCMError::SendRequestError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let fcm_response: FcmApiResponse = response
                .json()
                .await
                .map_err(|e| FCMError::ResponseParseError(e.to_string()))?;
            return Ok(fcm_response.name);
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(parse_api_error(status.as_u16(), &error_text))
    }

    /// Get access token from service account (with caching)
    pub async fn get_access_token(&self) -> Result<String, FCMError> {
        // Held across the refresh so concurrent sends wait for one exchange
        let mut cache = self.token_cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Utc::now().timestamp() + TOKEN_REFRESH_MARGIN_SECS {
                return Ok(cached.access_token.clone());
            }
        }

        debug!(
            "Requesting FCM access token for {}",
            self.credentials.client_email
        );

        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| FCMError::KeyParseError(e.to_string()))?;

        let mut header = Header::new(Algorithm::RS256);
        if !self.credentials.private_key_id.is_empty() {
            header.kid = Some(self.credentials.private_key_id.clone());
        }

        let assertion = encode(&header, &claims, &encoding_key)
            .map_err(|e| FCMError::JwtEncodeError(e.to_string()))?;

        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| FCMError::TokenError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("FCM access token request rejected: {} {}", status, body);
            return Err(FCMError::TokenRequestFailed(status.to_string()));
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| FCMError::TokenParseError(e.to_string()))?;

        *cache = Some(TokenCache {
            access_token: token_response.access_token.clone(),
            expires_at: Utc::now().timestamp() + token_response.expires_in,
        });

        Ok(token_response.access_token)
    }
}

/// Checks addressing and produces the wire payload for a message.
fn validate_message(message: &Message) -> Result<FcmMessageContent<'_>, FCMError> {
    let token = string_field(message.token.as_ref(), "registration token")?;
    let topic = string_field(message.topic.as_ref(), "topic")?;

    let (token, topic) = match (token, topic) {
        (Some(token), None) => {
            validate_token(token)?;
            (Some(token), None)
        }
        (None, Some(topic)) => (None, Some(normalize_topic(topic)?)),
        _ => {
            return Err(FCMError::InvalidArgument(
                "Exactly one of topic, token or condition is required".to_string(),
            ))
        }
    };

    Ok(FcmMessageContent {
        token,
        topic,
        notification: parse_notification(message.notification.as_ref())?,
    })
}

/// Reads a caller-supplied field that has to be a string when present.
fn string_field<'a>(value: Option<&'a Value>, name: &str) -> Result<Option<&'a str>, FCMError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(FCMError::InvalidArgument(format!(
            "{} must be a string",
            name
        ))),
    }
}

fn parse_notification(value: Option<&Value>) -> Result<Option<Notification>, FCMError> {
    let fields = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(FCMError::InvalidArgument(
                "notification must be a non-null object".to_string(),
            ))
        }
    };

    Ok(Some(Notification {
        title: string_field(fields.get("title"), "notification.title")?.map(str::to_string),
        body: string_field(fields.get("body"), "notification.body")?.map(str::to_string),
    }))
}

fn token_list(value: Option<&Value>) -> Result<Vec<&str>, FCMError> {
    let tokens = match value {
        Some(Value::Array(tokens)) if !tokens.is_empty() => tokens,
        _ => {
            return Err(FCMError::InvalidArgument(
                "tokens must be a non-empty array".to_string(),
            ))
        }
    };
    if tokens.len() > MAX_MULTICAST_TOKENS {
        return Err(FCMError::InvalidArgument(format!(
            "tokens list must not contain more than {} items",
            MAX_MULTICAST_TOKENS
        )));
    }

    tokens
        .iter()
        .map(|token| {
            token.as_str().ok_or_else(|| {
                FCMError::InvalidArgument("tokens must be an array of strings".to_string())
            })
        })
        .collect()
}

fn validate_token(token: &str) -> Result<(), FCMError> {
    if token.is_empty() {
        return Err(FCMError::InvalidArgument(
            "registration token must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

/// Strips an optional `/topics/` prefix and checks the remaining name.
fn normalize_topic(topic: &str) -> Result<&str, FCMError> {
    let name = topic.strip_prefix("/topics/").unwrap_or(topic);
    let bare = name.strip_prefix("private/").unwrap_or(name);

    let valid = !bare.is_empty()
        && bare
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%'));

    if valid {
        Ok(name)
    } else {
        Err(FCMError::InvalidArgument("Malformed topic name".to_string()))
    }
}

/// Turns a non-2xx FCM response into an `ApiError` with a stable code.
pub(crate) fn parse_api_error(status: u16, body: &str) -> FCMError {
    match serde_json::from_str::<FcmErrorEnvelope>(body) {
        Ok(envelope) => {
            let error = envelope.error;
            let fcm_code = error
                .details
                .iter()
                .filter(|d| {
                    d.type_url
                        .as_deref()
                        .map_or(true, |t| t.ends_with("google.firebase.fcm.v1.FcmError"))
                })
                .find_map(|d| d.error_code.as_deref())
                .or(error.status.as_deref());

            let code = fcm_code
                .and_then(code_for_fcm_error)
                .unwrap_or_else(|| code_for_http_status(status));
            let message = error
                .message
                .unwrap_or_else(|| format!("FCM request failed with status {}", status));

            FCMError::ApiError(code.to_string(), message)
        }
        Err(_) => {
            let message = if body.is_empty() {
                format!("FCM request failed with status {}", status)
            } else {
                format!("Unexpected FCM response with status {}: {}", status, body)
            };
            FCMError::ApiError(code_for_http_status(status).to_string(), message)
        }
    }
}

fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
