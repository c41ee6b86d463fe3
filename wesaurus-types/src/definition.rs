use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Definition {
    pub id: i32,
    pub author_id: i32,
    pub word_id: i32,
    pub text: String,
    pub like_count: i32,
    pub date_created: String,
    /// Text of the defined word, present when the listing joined it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub word_text: Option<String>,
}

/// Body of `POST /api/definitions`. The author is always the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewDefinition {
    pub word_id: Option<i32>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DefinitionPatch {
    pub text: Option<String>,
}

/// Query string filters for `GET /api/definitions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DefinitionQuery {
    pub word_id: Option<i32>,
    pub author_id: Option<i32>,
}
