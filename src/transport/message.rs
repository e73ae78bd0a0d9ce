use serde::{Deserialize, Serialize};

/// Query parameters of `GET /chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatParams {
    pub message: Option<String>,
}

/// Query parameters of `GET /echo`.
#[derive(Debug, Default, Deserialize)]
pub struct EchoParams {
    #[serde(default)]
    pub input: String,
}

/// Body of `GET /echo`: the input and a few derivations of it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub normal: String,
    pub shouty: String,
    pub char_count: usize,
    pub backwards: String,
}

impl EchoResponse {
    pub fn from_input(input: &str) -> Self {
        Self {
            normal: input.to_string(),
            shouty: input.to_uppercase(),
            char_count: input.chars().count(),
            backwards: input.chars().rev().collect(),
        }
    }
}

/// Body of `GET /json`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleJson {
    pub text: String,
    pub numbers: Vec<u32>,
}

impl Default for SampleJson {
    fn default() -> Self {
        Self {
            text: "hi".to_string(),
            numbers: vec![1, 2, 3],
        }
    }
}
