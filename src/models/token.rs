/// Bearer token pair returned by the OAuth token endpoint.
/// The refresh token is absent on refresh-grant responses.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}
