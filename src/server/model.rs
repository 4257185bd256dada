use serde::{Deserialize, Serialize};

use crate::{cluster::Cluster, service::MovieService};

#[derive(Clone)]
pub struct AppState {
    pub service: MovieService,
    pub cluster: Cluster,
    pub action_icon: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDto {
    pub error: String,
}

/// Unsigned transaction for the caller's wallet to sign and send.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionDto {
    pub transaction: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub user: String,
    pub name: String,
    pub director: String,
    pub hero: String,
    pub release_year: i64,
}

/// A review targets a movie by address or by name.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub user: String,
    pub movie: Option<String>,
    pub movie_name: Option<String>,
    pub rating: i64,
    pub comment: String,
    pub reviewer_name: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReviewRequest {
    pub user: String,
    pub movie: Option<String>,
    pub movie_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReviewFilter {
    pub reviewer: Option<String>,
    pub movie: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub cluster: String,
    pub program_id: String,
}

// Action (blink) payloads.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionGetResponse {
    pub icon: String,
    pub label: String,
    pub title: String,
    pub description: String,
    pub links: ActionLinks,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkedAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub href: String,
    pub parameters: Vec<ActionParameter>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionParameter {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<i64>,
    pub required: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActionPostRequest {
    pub account: String,
    pub data: Option<ReviewActionData>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReviewActionData {
    pub reviewer_name: String,
    pub rating: NumberInput,
    pub comment: String,
}

/// Wallet clients submit numeric form fields either as JSON numbers or strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum NumberInput {
    Number(i64),
    Text(String),
}

impl NumberInput {
    pub fn value(&self) -> Option<i64> {
        match self {
            NumberInput::Number(n) => Some(*n),
            NumberInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionPostResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub transaction: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionsJson {
    pub rules: Vec<ActionRule>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}
