use serde::Serialize;
use reqwest::Client;
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{Result, AppError};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const MODEL: &str = "deepseek/deepseek-chat-v3-0324";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build HTTP client")
});

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

pub async fn call_openrouter(api_key: &str, system_prompt: &str, user_prompt: &str) -> Result<String> {
    let body = ChatRequest {
        model: MODEL.into(),
        messages: vec![
            Message {
                role: "system".into(),
                content: system_prompt.into(),
            },
            Message {
                role: "user".into(),
                content: user_prompt.into(),
            },
        ],
    };

    let res = CLIENT
        .post(OPENROUTER_URL)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await?;

    let json: serde_json::Value = res.json().await?;
    let reply = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AppError::Llm("Invalid response format from LLM".to_string()))?
        .to_string();

    Ok(reply)
}

pub const REPO_ANALYST_ROLE: &str = "You are an AI specialized in analyzing GitHub repositories.";
pub const FILE_ANALYST_ROLE: &str = "You are an AI specializing in code analysis.";
pub const README_AUTHOR_ROLE: &str =
    "You are an expert at creating well-structured, professional README files for software projects.";

pub fn build_repo_analysis_prompt(directory_structure: &str, code_content: &str) -> String {
    format!(
        "Analyze the following GitHub repository and provide insights on what the code is doing \
         overall, code structure, tech stacks used, and explain the function performed by all \
         the files in short.\n\nDirectory Structure:\n{directory_structure}\n\nCode Content:\n{code_content}"
    )
}

pub fn build_file_analysis_prompt(
    directory_structure: &str,
    code_content: &str,
    file_name: &str,
) -> String {
    format!(
        "Here is the directory structure and extracted code content from a GitHub repository:\
         \n\nDirectory Structure:\n{directory_structure}\n\nCode Content:\n{code_content}\
         \n\nNow, analyze the file \"{file_name}\" in detail. Explain its functionality, key \
         logic, dependencies, and its interaction with other files in the project."
    )
}

pub fn build_readme_prompt(directory_structure: &str, code_content: &str) -> String {
    format!(
        "Generate a professional and structured README.md for the following GitHub repository.\
         \n\nDirectory Structure:\n```\n{directory_structure}\n```\
         \n\nCode Content:\n```\n{code_content}\n```\
         \n\nInclude a project title, a short description, the main features, the technologies \
         used, installation commands in code blocks, a usage guide, an overview of the project \
         structure, contribution guidelines, and the license. Use proper Markdown formatting \
         throughout."
    )
}
