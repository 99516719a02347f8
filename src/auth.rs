use base64::Engine;
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use std::fmt;

/// Adds credentials to an outgoing request.
///
/// Called once per request, right before it is handed to the transport.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), crate::Error>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authenticate(&self, _: &mut HeaderMap) -> Result<(), crate::Error> {
        Ok(())
    }
}

/// Sends a caller-managed bearer token. Refreshing it is the caller's job.
#[derive(Clone)]
pub struct BearerToken {
    value: HeaderValue,
}

impl BearerToken {
    pub fn new(token: &str) -> Result<Self, crate::Error> {
        if token.is_empty() {
            return Err(schemas::MissingArgument("bearer_token").into());
        }
        Ok(Self {
            value: sensitive(format!("Bearer {token}"))?,
        })
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").finish_non_exhaustive()
    }
}

impl Authenticator for BearerToken {
    fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), crate::Error> {
        headers.insert(AUTHORIZATION, self.value.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct Basic {
    value: HeaderValue,
}

impl Basic {
    pub fn new(username: &str, password: &str) -> Result<Self, crate::Error> {
        check_credential("username", username)?;
        check_credential("password", password)?;
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        Ok(Self {
            value: sensitive(format!("Basic {encoded}"))?,
        })
    }
}

impl fmt::Debug for Basic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Basic").finish_non_exhaustive()
    }
}

impl Authenticator for Basic {
    fn authenticate(&self, headers: &mut HeaderMap) -> Result<(), crate::Error> {
        headers.insert(AUTHORIZATION, self.value.clone());
        Ok(())
    }
}

// Values copied from a credentials file sometimes keep their braces or quotes.
fn check_credential(name: &'static str, value: &str) -> Result<(), crate::Error> {
    if value.is_empty() {
        return Err(schemas::MissingArgument(name).into());
    }
    let wrapped = |open: char, close: char| value.starts_with(open) && value.ends_with(close);
    if wrapped('{', '}') || wrapped('"', '"') {
        return Err(crate::Error::Config(format!(
            "{name} must not start or end with curly brackets or quotes"
        )));
    }
    Ok(())
}

fn sensitive(value: String) -> Result<HeaderValue, crate::Error> {
    let mut value = HeaderValue::try_from(value)
        .map_err(|e| crate::Error::Config(format!("invalid credential: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}
