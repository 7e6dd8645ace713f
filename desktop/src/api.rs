use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::SessionStore;
use crate::types::{Account, Me, Note, NoteUpdate, Prefs, RefreshedToken, TokenPair};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client bound to one account. Protected calls attach the stored
/// access token and, on a 401, refresh and retry exactly once before giving
/// up, even if the refreshed token is also rejected.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn SessionStore>,
    email: String,
}

impl ApiClient {
    pub fn new(base_url: &str, email: &str, store: Arc<dyn SessionStore>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            store,
            email: email.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // --- account lifecycle ---

    pub async fn signup(&self, name: Option<&str>, password: &str) -> Result<Account, Error> {
        let resp = self
            .http
            .post(self.url("/auth/signup")?)
            .json(&json!({ "name": name, "email": self.email, "password": password }))
            .send()
            .await?;
        into_json(resp).await
    }

    /// Authenticate and persist the token pair for this account.
    pub async fn login(&self, password: &str) -> Result<(), Error> {
        let resp = self
            .http
            .post(self.url("/auth/login")?)
            .json(&json!({ "email": self.email, "password": password }))
            .send()
            .await?;
        let pair: TokenPair = into_json(resp).await?;
        self.store.set_access(&self.email, &pair.access_token)?;
        self.store.set_refresh(&self.email, &pair.refresh_token)?;
        debug!(email = %self.email, "session stored");
        Ok(())
    }

    /// Drop the locally stored session. The server keeps no session state,
    /// so there is nothing to revoke remotely.
    pub fn logout(&self) -> Result<(), Error> {
        self.store.clear(&self.email)
    }

    // --- protected calls ---

    pub async fn me(&self) -> Result<Me, Error> {
        let resp = self.send_authorized(Method::GET, "/me", None).await?;
        into_json(resp).await
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>, Error> {
        let resp = self.send_authorized(Method::GET, "/notes", None).await?;
        into_json(resp).await
    }

    pub async fn create_note(&self, title: &str, body: &str, done: bool) -> Result<Note, Error> {
        let payload = json!({ "title": title, "body": body, "done": done });
        let resp = self
            .send_authorized(Method::POST, "/notes", Some(payload))
            .await?;
        into_json(resp).await
    }

    pub async fn update_note(&self, id: i64, update: &NoteUpdate) -> Result<Note, Error> {
        let payload = serde_json::to_value(update).expect("NoteUpdate serializes");
        let resp = self
            .send_authorized(Method::PATCH, &format!("/notes/{id}"), Some(payload))
            .await?;
        into_json(resp).await
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), Error> {
        let resp = self
            .send_authorized(Method::DELETE, &format!("/notes/{id}"), None)
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(api_error(resp).await)
        }
    }

    pub async fn get_prefs(&self) -> Result<Prefs, Error> {
        let resp = self.send_authorized(Method::GET, "/prefs", None).await?;
        into_json(resp).await
    }

    pub async fn set_prefs(&self, sleep_minutes: i32) -> Result<Prefs, Error> {
        let payload = json!({ "sleep_minutes": sleep_minutes });
        let resp = self
            .send_authorized(Method::PUT, "/prefs", Some(payload))
            .await?;
        into_json(resp).await
    }

    // --- transparent refresh ---

    /// One attempt, at most one refresh, one retry. Without a stored access
    /// token this fails before touching the network. Statuses other than
    /// 401 come back untouched and never trigger a refresh.
    async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, Error> {
        let access = self
            .store
            .get_access(&self.email)?
            .ok_or(Error::Unauthenticated)?;

        let first = self.request(method.clone(), path, body.as_ref(), &access).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        warn!(path, "access token rejected; refreshing once");
        match self.refresh_access().await? {
            Some(fresh) => self.request(method, path, body.as_ref(), &fresh).await,
            // The refresh was refused; the original 401 is the answer.
            None => Ok(first),
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        access: &str,
    ) -> Result<Response, Error> {
        let mut req = self.http.request(method, self.url(path)?).bearer_auth(access);
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    /// Exchange the stored refresh token for a new access token and persist
    /// it. `Ok(None)` means the server refused; the caller surfaces its
    /// original 401.
    async fn refresh_access(&self) -> Result<Option<String>, Error> {
        let refresh = self
            .store
            .get_refresh(&self.email)?
            .ok_or(Error::Unauthenticated)?;

        let resp = self
            .http
            .post(self.url("/auth/refresh")?)
            .json(&json!({ "refresh_token": refresh }))
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Ok(None);
        }
        let Ok(body) = resp.json::<RefreshedToken>().await else {
            return Ok(None);
        };

        self.store.set_access(&self.email, &body.access_token)?;
        debug!(email = %self.email, "access token refreshed");
        Ok(Some(body.access_token))
    }
}

async fn into_json<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    if resp.status().is_success() {
        Ok(resp.json().await?)
    } else {
        Err(api_error(resp).await)
    }
}

async fn api_error(resp: Response) -> Error {
    let status = resp.status().as_u16();
    let message = resp.text().await.unwrap_or_default();
    Error::Api { status, message }
}
