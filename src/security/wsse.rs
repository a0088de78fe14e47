//! WSSE `UsernameToken` digest authentication.
//!
//! # Responsibilities
//! - Parse the `X-WSSE` header into a [`Credential`]
//! - Verify username, freshness of `Created`, and the SHA-1 password digest
//! - Build credentials for clients (`atompub-cli`, tests)
//!
//! # Design Decisions
//! - Failures are reported internally as [`WsseError`] and flattened to a bool
//!   at the boundary; clients only ever see a plain 401
//! - `Created` must lie in `[now - 60s, now]`
//! - Nonces are not remembered: a captured header can be replayed until it
//!   leaves the 60 second window

use std::fmt;
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rand::RngCore;
use regex::Regex;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

/// Request header carrying the token.
pub const WSSE_HEADER: &str = "x-wsse";

/// How long a `Created` timestamp stays acceptable.
pub const REPLAY_WINDOW_SECS: i64 = 60;

const TOKEN_PREFIX: &str = "UsernameToken";

static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"]*)"|([^,]*))"#).expect("valid wsse parameter regex")
});

/// Why a token was refused. Never shown to clients.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WsseError {
    #[error("no X-WSSE header")]
    Missing,
    #[error("malformed token: {0}")]
    Malformed(&'static str),
    #[error("unknown username")]
    UnknownUser,
    #[error("created timestamp outside the replay window")]
    Stale,
    #[error("password digest mismatch")]
    DigestMismatch,
}

/// A parsed `UsernameToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    /// Base64.
    pub nonce: String,
    /// ISO-8601, exactly as sent.
    pub created: String,
    /// Base64.
    pub password_digest: String,
}

impl Credential {
    /// Parse a header value such as
    /// `UsernameToken Username="u", PasswordDigest="..", Nonce="..", Created=".."`.
    pub fn parse(header: &str) -> Result<Self, WsseError> {
        let params = header
            .strip_prefix(TOKEN_PREFIX)
            .ok_or(WsseError::Malformed("missing UsernameToken prefix"))?;

        let mut username = None;
        let mut nonce = None;
        let mut created = None;
        let mut password_digest = None;

        for caps in PARAM_RE.captures_iter(params) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            match &caps[1] {
                "Username" => username = Some(value),
                "Nonce" => nonce = Some(value),
                "Created" => created = Some(value),
                "PasswordDigest" => password_digest = Some(value),
                _ => {}
            }
        }

        Ok(Self {
            username: username.ok_or(WsseError::Malformed("missing Username"))?,
            nonce: nonce.ok_or(WsseError::Malformed("missing Nonce"))?,
            created: created.ok_or(WsseError::Malformed("missing Created"))?,
            password_digest: password_digest
                .ok_or(WsseError::Malformed("missing PasswordDigest"))?,
        })
    }

    /// Build a credential for `username`/`password` with the given nonce and time.
    pub fn issue(username: &str, password: &str, nonce: &[u8], created: DateTime<Utc>) -> Self {
        let created = created.to_rfc3339_opts(SecondsFormat::Secs, true);
        let digest = password_digest(nonce, &created, password);
        Self {
            username: username.to_string(),
            nonce: STANDARD.encode(nonce),
            created,
            password_digest: STANDARD.encode(digest),
        }
    }

    /// Same as [`Credential::issue`] with a fresh random nonce and the current time.
    pub fn issue_now(username: &str, password: &str) -> Self {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::issue(username, password, &nonce, Utc::now())
    }

    /// Render as an `X-WSSE` header value.
    pub fn to_header(&self) -> String {
        format!(
            r#"UsernameToken Username="{}", PasswordDigest="{}", Nonce="{}", Created="{}""#,
            self.username, self.password_digest, self.nonce, self.created
        )
    }
}

/// `SHA1(nonce ++ created ++ password)`.
pub fn password_digest(nonce: &[u8], created: &str, password: &str) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(nonce);
    hasher.update(created.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Verifies tokens against the single configured account.
#[derive(Clone)]
pub struct WsseAuthenticator {
    username: String,
    password: String,
}

impl fmt::Debug for WsseAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsseAuthenticator")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl WsseAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Check a header value, stopping at the first failed step.
    pub fn check(&self, header: Option<&str>, now: DateTime<Utc>) -> Result<(), WsseError> {
        let credential = Credential::parse(header.ok_or(WsseError::Missing)?)?;

        if credential.username != self.username {
            return Err(WsseError::UnknownUser);
        }

        let created = DateTime::parse_from_rfc3339(&credential.created)
            .map_err(|_| WsseError::Malformed("Created is not ISO-8601"))?;
        let age = now.signed_duration_since(created.with_timezone(&Utc));
        if age < TimeDelta::zero() || age >= TimeDelta::seconds(REPLAY_WINDOW_SECS) {
            return Err(WsseError::Stale);
        }

        let nonce = STANDARD
            .decode(&credential.nonce)
            .map_err(|_| WsseError::Malformed("Nonce is not base64"))?;
        let presented = STANDARD
            .decode(&credential.password_digest)
            .map_err(|_| WsseError::Malformed("PasswordDigest is not base64"))?;
        let expected = password_digest(&nonce, &credential.created, &self.password);

        let matches: bool = expected.as_slice().ct_eq(presented.as_slice()).into();
        if !matches {
            return Err(WsseError::DigestMismatch);
        }
        Ok(())
    }

    /// `true` when the header authenticates the configured user at `now`.
    pub fn verify(&self, header: Option<&str>, now: DateTime<Utc>) -> bool {
        match self.check(header, now) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(%reason, "WSSE verification failed");
                false
            }
        }
    }
}
