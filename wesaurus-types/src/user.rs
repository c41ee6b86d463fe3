use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A registered account as exposed to clients. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub date_created: String, // ISO 8601 string for simplicity
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthToken {
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settings {
    pub id: i32,
    pub user_id: i32,
    pub dark_mode: bool,
}

/// Partial settings update. A field counts as supplied when present and non-null,
/// so `{"dark_mode": false}` is a real update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
}
