use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ScrapeRequest {
    pub repo_url: String,
}

#[derive(Serialize)]
pub struct ScrapeResponse {
    pub directory_structure: String,
    pub code_content: String,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    pub message: String,
}

#[derive(Deserialize)]
pub struct AnalyzeFileRequest {
    pub repo_url: String,
    pub file_name: String,
}

#[derive(Serialize)]
pub struct AnalysisReport {
    pub repo_url: String,
    pub analysis: String,
}

#[derive(Serialize)]
pub struct ReadmeReport {
    pub repo_url: String,
    pub readme: String,
}
