//! Object key conventions shared by every storage consumer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Terraform files that are never offered for translation and never overwritten.
pub const RESERVED_FILENAMES: [&str; 3] = ["main.tf", "terraform.tfvars", "terraform.tfstate"];

/// File name that `download_all` places under the credentials sub-directory.
pub const CREDENTIAL_FILENAME: &str = "credential.json";

/// Cloud platform a set of Terraform files targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    Aws,
    Gcp,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Aws => "aws",
            Platform::Gcp => "gcp",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(Platform::Aws),
            "gcp" => Ok(Platform::Gcp),
            other => Err(format!("unsupported platform '{other}' (expected aws or gcp)")),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

/// Final `/`-separated segment of a key.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// True for keys whose final segment is one of [`RESERVED_FILENAMES`].
pub fn is_reserved(key: &str) -> bool {
    RESERVED_FILENAMES.contains(&file_name(key))
}

/// True for "directory marker" keys.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// Prefix under which a user's files for one platform live:
/// `<users_prefix>/<user>/<platform>/`.
pub fn user_prefix(users_prefix: &str, user: &str, platform: Platform) -> String {
    format!(
        "{}/{}/{}/",
        users_prefix.trim_end_matches('/'),
        user,
        platform
    )
}

/// Derive the translated artifact's key from a source key.
///
/// The first path segment equal to the source platform is replaced. Keys with no
/// such segment fall back to replacing the first literal occurrence of the token.
pub fn derive_target_key(source_key: &str, from: Platform, to: Platform) -> String {
    let from_token = from.as_str();
    let mut replaced = false;
    let segments: Vec<&str> = source_key
        .split('/')
        .map(|segment| {
            if !replaced && segment == from_token {
                replaced = true;
                to.as_str()
            } else {
                segment
            }
        })
        .collect();

    if replaced {
        segments.join("/")
    } else {
        source_key.replacen(from_token, to.as_str(), 1)
    }
}

/// Check that a user identifier is safe to embed in object keys and local paths.
pub fn validate_user(user: &str) -> Result<(), String> {
    if user.trim().is_empty() {
        return Err("user_email must not be empty".to_string());
    }
    if user.contains('/') || user.contains('\\') || user.contains("..") {
        return Err(format!("user_email '{user}' contains a path separator"));
    }
    if user.chars().any(char::is_control) {
        return Err("user_email contains control characters".to_string());
    }
    Ok(())
}
