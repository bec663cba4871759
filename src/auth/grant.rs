//! Grant types sent to the HubSpot token endpoint.

// self
use crate::_prelude::*;

/// OAuth 2.0 grant types exercised against the HubSpot token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code grant, always paired with PKCE.
	AuthorizationCode,
	/// Refresh Token grant used when the stored access token has expired.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
		}
	}

	/// Human-readable label used when the provider rejects the grant.
	pub fn failure_label(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "Token exchange",
			GrantType::RefreshToken => "Refresh",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
