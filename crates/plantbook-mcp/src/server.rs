//! MCP server implementation with tool definitions

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde_json::Value;
use tracing::Instrument;

use plantbook_client::PlantProvider;
use plantbook_core::config::PlantbookConfig;
use plantbook_eval::{compare_conditions, render_care_summary, SensorReading, UnitSystem};

use crate::lenient;

// ── Input schemas ────────────────────────────────────────────────────────
//
// Every argument is `Option` and decoded leniently, so that a missing or
// wrong-typed value is reported as an error-flagged tool result rather than
// a JSON-RPC invalid-params fault.

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchPlantsInput {
    #[schemars(description = "Plant name to search for (common or scientific name)")]
    #[serde(default, deserialize_with = "lenient::string")]
    #[schemars(with = "Option<String>")]
    pub query: Option<String>,
    #[schemars(description = "Maximum number of results (optional, default: 10)")]
    #[serde(default, deserialize_with = "lenient::number")]
    #[schemars(with = "Option<f64>")]
    pub limit: Option<f64>,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetPlantCareInput {
    #[schemars(description = "Plant ID (pid) from search results")]
    #[serde(default, deserialize_with = "lenient::string")]
    #[schemars(with = "Option<String>")]
    pub pid: Option<String>,
    #[schemars(description = "Preferred language code (e.g., 'en', 'de', 'es'), optional")]
    #[serde(default, deserialize_with = "lenient::string")]
    #[schemars(with = "Option<String>")]
    pub language: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct GetCareSummaryInput {
    #[schemars(description = "Plant ID (pid) from search results")]
    #[serde(default, deserialize_with = "lenient::string")]
    #[schemars(with = "Option<String>")]
    pub pid: Option<String>,
    #[schemars(description = "Use metric units (default: true)")]
    #[serde(default, deserialize_with = "lenient::boolean")]
    #[schemars(with = "Option<bool>")]
    pub metric: Option<bool>,
}

#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct CompareConditionsInput {
    #[schemars(description = "Plant ID (pid) from search results")]
    #[serde(default, deserialize_with = "lenient::string")]
    #[schemars(with = "Option<String>")]
    pub pid: Option<String>,
    #[schemars(
        description = "Current sensor readings: moisture (soil %, 0-100), temperature (Celsius), \
                       light_lux (lux), humidity (%, 0-100). All keys optional."
    )]
    #[serde(default)]
    pub current_conditions: Option<Value>,
}

// ── Settings ─────────────────────────────────────────────────────────────

/// Per-server tool behaviour taken from configuration
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub default_language: String,
    pub default_search_limit: usize,
    pub strict_conditions: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            default_language: "en".into(),
            default_search_limit: 10,
            strict_conditions: false,
        }
    }
}

impl ToolSettings {
    pub fn from_config(config: &PlantbookConfig) -> Self {
        Self {
            default_language: config.api.default_language.clone(),
            default_search_limit: config.tools.default_search_limit.max(1),
            strict_conditions: config.tools.strict_conditions,
        }
    }
}

// ── MCP Server ───────────────────────────────────────────────────────────

pub const TOOL_COUNT: usize = 4;

#[derive(Clone)]
pub struct PlantbookMcp {
    provider: Arc<dyn PlantProvider>,
    settings: ToolSettings,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PlantbookMcp {
    pub fn new(provider: Arc<dyn PlantProvider>, settings: ToolSettings) -> Self {
        Self {
            provider,
            settings,
            tool_router: Self::tool_router(),
        }
    }

    // ── Tools ────────────────────────────────────────────────────────────

    #[tool(
        description = "Search for plants by common name or scientific name in the OpenPlantbook database"
    )]
    pub async fn search_plants(
        &self,
        Parameters(input): Parameters<SearchPlantsInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run_search(input)
            .instrument(tool_span("search_plants"))
            .await
    }

    #[tool(
        description = "Get detailed care requirements for a specific plant including moisture, temperature, light, and humidity ranges"
    )]
    pub async fn get_plant_care(
        &self,
        Parameters(input): Parameters<GetPlantCareInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run_plant_care(input)
            .instrument(tool_span("get_plant_care"))
            .await
    }

    #[tool(
        description = "Get a human-readable summary of plant care requirements with interpreted ranges"
    )]
    pub async fn get_care_summary(
        &self,
        Parameters(input): Parameters<GetCareSummaryInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run_care_summary(input)
            .instrument(tool_span("get_care_summary"))
            .await
    }

    #[tool(
        description = "Compare actual sensor readings against ideal plant care ranges and identify issues"
    )]
    pub async fn compare_conditions(
        &self,
        Parameters(input): Parameters<CompareConditionsInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run_compare(input)
            .instrument(tool_span("compare_conditions"))
            .await
    }
}

impl PlantbookMcp {
    async fn run_search(&self, input: SearchPlantsInput) -> Result<CallToolResult, McpError> {
        let Some(query) = required(input.query) else {
            tracing::warn!("invalid query parameter");
            return failure("query parameter is required and must be a string");
        };
        let limit = input
            .limit
            .filter(|l| l.is_finite() && *l >= 1.0)
            .map(|l| l as usize)
            .unwrap_or(self.settings.default_search_limit);

        tracing::info!(query = %query, limit, "searching plants");

        let results = match self.provider.search(&query, limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(error = %e, "search failed");
                return failure(format!("search failed: {e}"));
            }
        };

        tracing::info!(count = results.len(), "search completed");
        match serde_json::to_string_pretty(&results) {
            Ok(json) => success(json),
            Err(e) => {
                tracing::error!(error = %e, "failed to marshal results");
                failure("failed to format results")
            }
        }
    }

    async fn run_plant_care(&self, input: GetPlantCareInput) -> Result<CallToolResult, McpError> {
        let Some(pid) = required(input.pid) else {
            tracing::warn!("invalid pid parameter");
            return failure("pid parameter is required and must be a string");
        };
        let language = required(input.language)
            .unwrap_or_else(|| self.settings.default_language.clone());

        tracing::info!(pid = %pid, language = %language, "getting plant details");

        let details = match self.provider.details(&pid, &language).await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(error = %e, "failed to get plant details");
                return failure(format!("failed to get plant details: {e}"));
            }
        };

        match serde_json::to_string_pretty(&details) {
            Ok(json) => success(json),
            Err(e) => {
                tracing::error!(error = %e, "failed to marshal details");
                failure("failed to format details")
            }
        }
    }

    async fn run_care_summary(
        &self,
        input: GetCareSummaryInput,
    ) -> Result<CallToolResult, McpError> {
        let Some(pid) = required(input.pid) else {
            tracing::warn!("invalid pid parameter");
            return failure("pid parameter is required and must be a string");
        };
        let units = UnitSystem::from_metric_flag(input.metric.unwrap_or(true));

        tracing::info!(pid = %pid, ?units, "generating care summary");

        let details = match self
            .provider
            .details(&pid, &self.settings.default_language)
            .await
        {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(error = %e, "failed to get plant details");
                return failure(format!("failed to get plant details: {e}"));
            }
        };

        success(render_care_summary(&details, units))
    }

    async fn run_compare(&self, input: CompareConditionsInput) -> Result<CallToolResult, McpError> {
        let Some(pid) = required(input.pid) else {
            tracing::warn!("invalid pid parameter");
            return failure("pid parameter is required and must be a string");
        };
        let Some(Value::Object(conditions)) = input.current_conditions else {
            tracing::warn!("invalid current_conditions parameter");
            return failure("current_conditions parameter is required and must be an object");
        };

        let reading = if self.settings.strict_conditions {
            match SensorReading::from_json_strict(&conditions) {
                Ok(reading) => reading,
                Err(e) => {
                    tracing::warn!(error = %e, "rejected sensor readings");
                    return failure(format!("invalid current_conditions: {e}"));
                }
            }
        } else {
            SensorReading::from_json(&conditions)
        };

        tracing::info!(pid = %pid, ?reading, "comparing conditions");

        let details = match self
            .provider
            .details(&pid, &self.settings.default_language)
            .await
        {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(error = %e, "failed to get plant details");
                return failure(format!("failed to get plant details: {e}"));
            }
        };

        let report = compare_conditions(&details, &reading);
        tracing::info!(issues = report.issue_count(), "comparison completed");
        success(report.to_string())
    }
}

/// Span attached to one tool invocation
fn tool_span(tool: &'static str) -> tracing::Span {
    tracing::info_span!("tool_call", tool = tool, request_id = %uuid::Uuid::new_v4())
}

/// A present, non-blank string argument, trimmed
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn success(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

fn failure(message: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(message.into())]))
}

#[tool_handler]
impl ServerHandler for PlantbookMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Open Plantbook plant care lookups. Use search_plants to find a plant id (pid), \
                 then get_plant_care for raw care ranges, get_care_summary for a readable \
                 summary, or compare_conditions to check sensor readings against the ideal ranges."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required(None), None);
        assert_eq!(required(Some("   ".into())), None);
        assert_eq!(required(Some(" basil ".into())), Some("basil".into()));
    }

    #[test]
    fn settings_from_config() {
        let mut config = PlantbookConfig::default();
        config.api.default_language = "de".into();
        config.tools.default_search_limit = 0;
        config.tools.strict_conditions = true;

        let settings = ToolSettings::from_config(&config);
        assert_eq!(settings.default_language, "de");
        assert_eq!(settings.default_search_limit, 1);
        assert!(settings.strict_conditions);
    }

    #[test]
    fn tool_router_registers_all_tools() {
        let router = PlantbookMcp::tool_router();
        let mut names: Vec<String> = router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "compare_conditions",
                "get_care_summary",
                "get_plant_care",
                "search_plants"
            ]
        );
        assert_eq!(names.len(), TOOL_COUNT);
    }
}
