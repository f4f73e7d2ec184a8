use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use uuid::Uuid;

// --- Identity ---

/// Role
///
/// The closed set of principals the hospital system knows about. Serialized in
/// lowercase to match the backend (`"admin"`, `"doctor"`, ...). Any other value
/// fails to decode, which makes an unknown role fail closed during session restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Patient,
}

impl Role {
    /// Every role, in the order the registration form offers them.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Doctor, Role::Nurse, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Patient => "patient",
        }
    }

    /// Colour of the profile badge shown next to the user's name.
    pub fn badge_color(&self) -> &'static str {
        match self {
            Role::Admin => "red",
            Role::Doctor => "blue",
            Role::Nurse => "green",
            Role::Patient => "purple",
        }
    }

    /// Avatar glyph shown inside the profile badge.
    pub fn avatar(&self) -> &'static str {
        match self {
            Role::Admin => "👨‍💼",
            Role::Doctor => "👨‍⚕️",
            Role::Nurse => "👩‍⚕️",
            Role::Patient => "🏥",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "nurse" => Ok(Role::Nurse),
            "patient" => Ok(Role::Patient),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Identity
///
/// The authenticated principal as returned by `GET /auth/me` and inside the login
/// response. Treated as immutable for the duration of a session: it is replaced
/// wholesale on login and dropped on logout, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    // Display name.
    pub full_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

/// lenient_timestamp
///
/// The backend stores timestamps in a document store that strips the UTC offset,
/// so `created_at` arrives either as RFC 3339 or as a naive ISO string. Naive values
/// are read as UTC; anything unparseable becomes `None` instead of failing the
/// whole identity.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

// --- Request Payloads ---

/// LoginRequest
///
/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// RegisterRequest
///
/// Body of `POST /auth/register`. The password is only passed through to the
/// backend; it is never stored or logged by the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// --- Responses ---

/// LoginResponse
///
/// Successful `POST /auth/login` result: the identity plus its bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub user: Identity,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
