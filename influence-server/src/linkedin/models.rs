//! LinkedIn OAuth and UGC API request/response structures

use serde::{Deserialize, Serialize};

/// Authorization code exchange request (RFC 6749 Section 4.1.3)
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Missing when LinkedIn answers 2xx with an error payload
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// OpenID Connect userinfo response
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    /// Member identifier
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Identity of the authenticated member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
}

impl From<UserInfo> for UserIdentity {
    fn from(info: UserInfo) -> Self {
        let display_name = match info.name.filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => [info.given_name, info.family_name]
                .into_iter()
                .flatten()
                .filter(|part| !part.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Self {
            id: info.sub,
            display_name,
        }
    }
}

/// Body of a `POST /v2/ugcPosts` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcPost<'a> {
    pub author: String,
    pub lifecycle_state: &'static str,
    pub specific_content: SpecificContent<'a>,
    pub visibility: Visibility,
}

#[derive(Debug, Serialize)]
pub struct SpecificContent<'a> {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    pub share_content: ShareContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareContent<'a> {
    pub share_commentary: ShareCommentary<'a>,
    pub share_media_category: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ShareCommentary<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    pub member_network_visibility: &'static str,
}

impl<'a> UgcPost<'a> {
    /// A public text-only post authored by the given member
    pub fn public_text(member_id: &str, text: &'a str) -> Self {
        Self {
            author: format!("urn:li:person:{}", member_id),
            lifecycle_state: "PUBLISHED",
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: ShareCommentary { text },
                    share_media_category: "NONE",
                },
            },
            visibility: Visibility {
                member_network_visibility: "PUBLIC",
            },
        }
    }
}

/// Optional body of a successful UGC post creation
#[derive(Debug, Default, Deserialize)]
pub struct UgcPostCreated {
    #[serde(default)]
    pub id: Option<String>,
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    /// Created share URN, when LinkedIn reports one
    pub id: Option<String>,
}
