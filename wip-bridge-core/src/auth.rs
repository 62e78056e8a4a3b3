use crate::contract::RequestSigner;
use crate::error::SignError;

/// `Authorization: Bearer <token>` signing, used for the upstream API.
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl RequestSigner for BearerToken {
    fn authorization(
        &self,
        _method: &str,
        _url: &str,
        _form_params: &[(String, String)],
    ) -> Result<String, SignError> {
        if self.token.trim().is_empty() {
            return Err(SignError::Key("bearer token is empty".to_string()));
        }
        Ok(format!("Bearer {}", self.token))
    }
}
