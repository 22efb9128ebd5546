use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use std::time::Instant;
use tracing::{error, info};

use crate::error::{Result, AppError};
use crate::api::models::{
    AnalysisReport, AnalyzeFileRequest, ReadmeReport, ScrapeRequest, ScrapeResponse, ServiceInfo,
};
use crate::api::response::{self, ApiResponse};
use crate::llm::{
    build_file_analysis_prompt, build_readme_prompt, build_repo_analysis_prompt, call_openrouter,
    FILE_ANALYST_ROLE, README_AUTHOR_ROLE, REPO_ANALYST_ROLE,
};
use crate::scraper::{validate_repo_url, RepoSnapshot};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/scrape", post(scrape_handler))
        .route("/analyze-repo", post(analyze_repo_handler))
        .route("/analyze-file", post(analyze_file_handler))
        .route("/generate-readme", post(generate_readme_handler))
        .layer(
            // Wildcard origins cannot be combined with credentials, so mirror
            // whatever the request sends instead
            CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true),
        )
        .with_state(app_state)
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Service is running. Use POST /scrape endpoint with repo_url parameter."
            .to_string(),
    })
}

async fn scrape_handler(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>> {
    info!("Received request to scrape: {}", req.repo_url);
    let start = Instant::now();

    let snapshot = scrape_repo(&state, &req.repo_url).await?;

    info!("Scrape completed in {:?}", start.elapsed());
    Ok(Json(ScrapeResponse {
        directory_structure: snapshot.directory_structure,
        code_content: snapshot.code_content,
    }))
}

async fn analyze_repo_handler(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<AnalysisReport>>> {
    info!("Received request to analyze: {}", req.repo_url);

    let api_key = openrouter_key(&state)?;
    let snapshot = scrape_repo(&state, &req.repo_url).await?;
    let prompt = build_repo_analysis_prompt(&snapshot.directory_structure, &snapshot.code_content);
    let analysis = call_openrouter(&api_key, REPO_ANALYST_ROLE, &prompt).await?;

    Ok(response::success(
        "Repository analysis completed.",
        AnalysisReport {
            repo_url: req.repo_url,
            analysis,
        },
    ))
}

async fn analyze_file_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeFileRequest>,
) -> Result<Json<ApiResponse<AnalysisReport>>> {
    info!(
        "Received request to analyze file {} of {}",
        req.file_name, req.repo_url
    );

    let api_key = openrouter_key(&state)?;
    let snapshot = scrape_repo(&state, &req.repo_url).await?;
    let prompt = build_file_analysis_prompt(
        &snapshot.directory_structure,
        &snapshot.code_content,
        &req.file_name,
    );
    let analysis = call_openrouter(&api_key, FILE_ANALYST_ROLE, &prompt).await?;

    Ok(response::success(
        format!("Detailed analysis of {}.", req.file_name),
        AnalysisReport {
            repo_url: req.repo_url,
            analysis,
        },
    ))
}

async fn generate_readme_handler(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRequest>,
) -> Result<Json<ApiResponse<ReadmeReport>>> {
    info!("Received request to generate README for: {}", req.repo_url);

    let api_key = openrouter_key(&state)?;
    let snapshot = scrape_repo(&state, &req.repo_url).await?;
    let prompt = build_readme_prompt(&snapshot.directory_structure, &snapshot.code_content);
    let readme = call_openrouter(&api_key, README_AUTHOR_ROLE, &prompt).await?;

    Ok(response::success(
        "README generated.",
        ReadmeReport {
            repo_url: req.repo_url,
            readme,
        },
    ))
}

/// Validate first so invalid input never reaches the browser, then run the
/// full automation sequence.
async fn scrape_repo(state: &AppState, repo_url: &str) -> Result<RepoSnapshot> {
    validate_repo_url(repo_url)?;

    match state.scraper.scrape(repo_url).await {
        Ok(snapshot) => Ok(snapshot),
        Err(e) => {
            error!("Scraping failed for {}: {}", repo_url, e);
            Err(e)
        }
    }
}

fn openrouter_key(state: &AppState) -> Result<String> {
    state
        .config
        .openrouter_api_key
        .clone()
        .ok_or_else(|| AppError::Config("OPENROUTER_API_KEY is not set".to_string()))
}
