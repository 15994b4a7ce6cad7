//! HTTP client for the Genkit flow server that backs the AI advisor.
//!
//! Flows are invoked with `POST {base_url}/{flow}` and a `{"data": ...}`
//! body; the server answers `{"result": ...}`.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::advisory::{
    validate_description, AdvisoryError, AdvisoryService, CategorySuggestion, FinancialTips,
};

pub const SUGGEST_CATEGORY_FLOW: &str = "suggestExpenseCategoryFlow";
pub const FINANCIAL_TIPS_FLOW: &str = "getFinancialTipsFlow";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const EXPECTED_TIPS: std::ops::RangeInclusive<usize> = 3..=5;

#[derive(Serialize)]
struct FlowRequest<T> {
    data: T,
}

#[derive(Deserialize)]
struct FlowResponse<T> {
    result: T,
}

#[derive(Serialize)]
struct SuggestCategoryInput<'a> {
    description: &'a str,
}

#[derive(Deserialize)]
struct SuggestCategoryOutput {
    category: String,
    confidence: f64,
}

#[derive(Deserialize)]
struct FinancialTipsOutput {
    tips: Vec<String>,
}

#[derive(Clone)]
pub struct GenkitClient {
    http: Client,
    base_url: String,
}

impl GenkitClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn run_flow<I, O>(&self, flow: &str, input: I) -> Result<O, AdvisoryError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, flow);
        debug!("Calling advisor flow {}", url);

        let response = self
            .http
            .post(&url)
            .json(&FlowRequest { data: input })
            .send()
            .await
            .map_err(|e| AdvisoryError::Unavailable(format!("{}: {}", flow, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Unavailable(format!(
                "{} answered {}: {}",
                flow,
                status,
                body.trim()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdvisoryError::Unavailable(format!("{}: {}", flow, e)))?;
        let parsed: FlowResponse<O> = serde_json::from_slice(&body)
            .map_err(|e| AdvisoryError::MalformedResponse(format!("{}: {}", flow, e)))?;
        Ok(parsed.result)
    }
}

#[async_trait]
impl AdvisoryService for GenkitClient {
    async fn suggest_category(&self, description: &str) -> Result<CategorySuggestion, AdvisoryError> {
        let description = validate_description(description)?;
        let output: SuggestCategoryOutput = self
            .run_flow(SUGGEST_CATEGORY_FLOW, SuggestCategoryInput { description })
            .await?;

        let category = output.category.trim().to_string();
        if category.is_empty() {
            return Err(AdvisoryError::MalformedResponse(
                "suggested category is empty".to_string(),
            ));
        }
        Ok(CategorySuggestion {
            category,
            confidence: output.confidence.clamp(0.0, 1.0),
        })
    }

    async fn financial_tips(&self) -> Result<FinancialTips, AdvisoryError> {
        let output: FinancialTipsOutput = self.run_flow(FINANCIAL_TIPS_FLOW, ()).await?;

        let tips: Vec<String> = output
            .tips
            .into_iter()
            .map(|tip| tip.trim().to_string())
            .filter(|tip| !tip.is_empty())
            .collect();
        if !EXPECTED_TIPS.contains(&tips.len()) {
            warn!("Advisor returned {} tips, expected 3 to 5", tips.len());
        }
        Ok(FinancialTips { tips })
    }
}
