//! Resolve connection strings into [Endpoint] descriptors.
//!
//! The resolver never reads ambient state: the process environment and the hosted
//! application's config vars are passed in as plain maps.
use crate::{
    Result, SyncError, CURRENT_HOST_ALIAS, DEFAULT_PORT, LEGACY_HOST_ALIAS, LOCAL_HOST,
    LOCAL_URL_ENV, REMOTE_URL_KEYS,
};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// A network reachable mongodb database.
///
/// Created once from a connection string through [Endpoint::parse], and never changed.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: u16,
    database: String,
    username: Option<String>,
    password: Option<String>,
}

impl Endpoint {
    /// Parse connection string `raw` in form `scheme://[user:password@]host[:port]/database`.
    ///
    /// The legacy hosting hostname is rewritten before parsing, see [normalize_alias].
    pub fn parse(raw: &str) -> Result<Endpoint> {
        let normalized = normalize_alias(raw);
        let invalid = |reason: String| SyncError::InvalidEndpoint {
            url: redact_url(raw),
            reason,
        };

        let url = Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
        let host = match url.host_str() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => return Err(invalid("missing host".to_string())),
        };
        let database = decode(url.path().trim_matches('/')).map_err(invalid)?;
        if database.is_empty() {
            return Err(invalid("missing database name".to_string()));
        }
        let username = match url.username() {
            "" => None,
            u => Some(decode(u).map_err(invalid)?),
        };
        let password = url.password().map(decode).transpose().map_err(invalid)?;

        Ok(Endpoint {
            scheme: url.scheme().to_string(),
            host,
            port: url.port().unwrap_or(DEFAULT_PORT),
            database,
            username,
            password,
        })
    }

    /// url scheme, normally `mongodb`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// server host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// server port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// user name to authenticate with, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// password to authenticate with, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Check if `other` points to the same host, port and database.
    pub fn same_target(&self, other: &Endpoint) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
            && self.port == other.port
            && self.database == other.database
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:{}/{}",
            self.scheme, self.host, self.port, self.database
        )
    }
}

// credentials stay out of debug output.
impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Rewrite the legacy hosting hostname to its current form.
///
/// # Example
/// ```
/// use mongo_transfer::normalize_alias;
/// assert_eq!(
///     normalize_alias("mongodb://u:p@local.mongohq.com:27017/app"),
///     "mongodb://u:p@mongohq.com:27017/app"
/// );
/// ```
pub fn normalize_alias(raw: &str) -> String {
    raw.replace(LEGACY_HOST_ALIAS, CURRENT_HOST_ALIAS)
}

/// Resolve the hosted database of `app` from its config `vars`.
///
/// The first present key of `MONGO_URL`, `MONGOHQ_URL` and `MONGOLAB_URI` is used.
pub fn resolve_remote(app: &str, vars: &HashMap<String, String>) -> Result<Endpoint> {
    let url = REMOTE_URL_KEYS
        .iter()
        .find_map(|key| vars.get(*key))
        .ok_or_else(|| SyncError::ConfigurationMissing {
            app: app.to_string(),
        })?;
    Endpoint::parse(url)
}

/// Resolve the local database of `app`.
///
/// `MONGO_URL` in `env` overrides the default `mongodb://localhost:27017/<app>`.
pub fn resolve_local(app: &str, env: &HashMap<String, String>) -> Result<Endpoint> {
    match env.get(LOCAL_URL_ENV) {
        Some(url) => Endpoint::parse(url),
        None => Endpoint::parse(&format!(
            "mongodb://{}:{}/{}",
            LOCAL_HOST, DEFAULT_PORT, app
        )),
    }
}

/// percent-decode one url component, it must be valid utf-8 afterwards.
fn decode(component: &str) -> std::result::Result<String, String> {
    percent_decode_str(component)
        .decode_utf8()
        .map(|c| c.into_owned())
        .map_err(|e| format!("invalid percent-encoding: {}", e))
}

/// hide password of `raw` connection string, used in error messages.
fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            // only fails for urls which can't have credentials at all.
            let _ = url.set_password(Some("****"));
            url.to_string()
        }
        Ok(url) => url.to_string(),
        Err(_) => match (raw.find("://"), raw.rfind('@')) {
            (Some(start), Some(at)) if at > start => {
                format!("{}****{}", &raw[..start + 3], &raw[at..])
            }
            _ => raw.to_string(),
        },
    }
}
