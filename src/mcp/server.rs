//! YADA MCP Server Implementation
//!
//! Implements the MCP server with all YADA tools.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::models::{BasicFoodCreate, CompositeFoodCreate};
use crate::tools::status::StatusTracker;
use crate::tools::{foods, log, profile};
use crate::tracker::Tracker;

/// YADA MCP Service
///
/// Every tool call takes the one tracker lock for its whole duration.
#[derive(Clone)]
pub struct YadaService {
    status_tracker: Arc<StatusTracker>,
    tracker: Arc<Mutex<Tracker>>,
    tool_router: ToolRouter<YadaService>,
}

impl YadaService {
    pub fn new(data_dir: PathBuf, tracker: Tracker) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(data_dir)),
            tracker: Arc::new(Mutex::new(tracker)),
            tool_router: Self::tool_router(),
        }
    }

    fn tracker(&self) -> Result<MutexGuard<'_, Tracker>, McpError> {
        self.tracker
            .lock()
            .map_err(|e| McpError::internal_error(format!("Tracker lock poisoned: {}", e), None))
    }
}

fn tool_error(message: String) -> McpError {
    McpError::internal_error(message, None)
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddBasicFoodParams {
    /// Unique food ID (case-insensitive)
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Calories per serving (non-negative whole number)
    pub calories: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCompositeFoodParams {
    pub id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Ingredient food ID -> servings of that ingredient per serving
    pub ingredients: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodIdParams {
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    /// Substring of the ID or a keyword; empty matches everything
    #[serde(default)]
    pub keyword: String,
    /// "basic", "composite" or "all"
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    /// "basic", "composite" or "all"
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateCaloriesParams {
    pub food_id: String,
    #[serde(default = "default_servings")]
    pub servings: f64,
}

fn default_servings() -> f64 { 1.0 }

// ============================================================================
// Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogEntryParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
    pub food_id: String,
    pub servings: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklyCaloriesParams {
    /// First of the seven days, YYYY-MM-DD
    pub start_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodFrequencyParams {
    /// Inclusive range start, YYYY-MM-DD
    pub start_date: String,
    /// Inclusive range end, YYYY-MM-DD
    pub end_date: String,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    /// "male" or "female"
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: i64,
    /// sedentary, light, moderate or active
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
    /// harris-benedict or mifflin-st-jeor; omitted keeps the current method
    pub calorie_method: Option<String>,
}

fn default_activity_level() -> String {
    "sedentary".to_string()
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl YadaService {
    // --- Status ---

    #[tool(description = "Get the current status of the YADA service including build info, data directory, catalog and log counts, and process information")]
    fn yada_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        json_result(&self.status_tracker.get_status(&tracker))
    }

    #[tool(description = "Get step-by-step instructions for building the food catalog and logging consumption. Call this when starting a new food logging session.")]
    fn log_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::LOG_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(LOG_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "Add a basic food with a fixed number of calories per serving")]
    fn add_basic_food(
        &self,
        Parameters(p): Parameters<AddBasicFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let data = BasicFoodCreate {
            id: p.id,
            keywords: p.keywords,
            calories: p.calories,
        };
        let mut tracker = self.tracker()?;
        let result = foods::add_basic_food(&mut tracker, data).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Add a composite food made of servings of existing foods. Every ingredient must already exist.")]
    fn add_composite_food(
        &self,
        Parameters(p): Parameters<AddCompositeFoodParams>,
    ) -> Result<CallToolResult, McpError> {
        let data = CompositeFoodCreate {
            id: p.id,
            keywords: p.keywords,
            ingredients: p.ingredients,
        };
        let mut tracker = self.tracker()?;
        let result = foods::add_composite_food(&mut tracker, data).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a food by ID with its ingredients and calories per serving")]
    fn get_food(
        &self,
        Parameters(p): Parameters<FoodIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        match foods::get_food(&tracker, &p.id) {
            Some(detail) => json_result(&detail),
            None => json_result(&serde_json::json!({ "error": "Food not found", "id": p.id })),
        }
    }

    #[tool(description = "Delete a food. Composites and log entries that use it stop resolving until it is added again.")]
    fn delete_food(
        &self,
        Parameters(p): Parameters<FoodIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = foods::delete_food(&mut tracker, &p.id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Search foods by case-insensitive substring of the ID or any keyword")]
    fn search_foods(
        &self,
        Parameters(p): Parameters<SearchFoodsParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result =
            foods::search_foods(&tracker, &p.keyword, p.kind.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List all foods, optionally only basic or only composite")]
    fn list_foods(
        &self,
        Parameters(p): Parameters<ListFoodsParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = foods::list_foods(&tracker, p.kind.as_deref()).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Calculate the calories in a number of servings of a food, resolving composite foods recursively")]
    fn calculate_calories(
        &self,
        Parameters(p): Parameters<CalculateCaloriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result =
            foods::calculate_calories(&tracker, &p.food_id, p.servings).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Daily Log ---

    #[tool(description = "Log servings of a food on a date (YYYY-MM-DD)")]
    fn log_food(
        &self,
        Parameters(p): Parameters<LogEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result =
            log::log_food(&mut tracker, &p.date, &p.food_id, p.servings).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Remove the first entry on a date matching the food and servings exactly")]
    fn remove_log_entry(
        &self,
        Parameters(p): Parameters<LogEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = log::remove_log_entry(&mut tracker, &p.date, &p.food_id, p.servings)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Remove every entry logged on a date")]
    fn clear_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = log::clear_day(&mut tracker, &p.date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Show the entries and total calories for a date")]
    fn view_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = log::view_day(&tracker, &p.date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Daily calorie totals for seven consecutive days starting at a date")]
    fn weekly_calories(
        &self,
        Parameters(p): Parameters<WeeklyCaloriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = log::weekly_calories(&tracker, &p.start_date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Total servings per food over an inclusive date range, most eaten first")]
    fn food_frequency(
        &self,
        Parameters(p): Parameters<FoodFrequencyParams>,
    ) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result =
            log::food_frequency(&tracker, &p.start_date, &p.end_date).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List all dates that have at least one logged entry")]
    fn list_logged_dates(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        json_result(&log::list_logged_dates(&tracker))
    }

    #[tool(description = "Undo the most recent log change (log, remove or clear). Catalog and profile changes are not undoable.")]
    fn undo(&self) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        json_result(&log::undo(&mut tracker))
    }

    // --- Profile ---

    #[tool(description = "Set the user profile used for the daily calorie target")]
    fn set_profile(
        &self,
        Parameters(p): Parameters<SetProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = profile::set_profile(
            &mut tracker,
            &p.gender,
            p.height_cm,
            p.weight_kg,
            p.age,
            &p.activity_level,
            p.calorie_method.as_deref(),
        )
        .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the user profile and the calorie formula in effect")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        json_result(&profile::get_profile(&tracker))
    }

    #[tool(description = "Compute BMR and the daily calorie target for the current profile")]
    fn target_calories(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = profile::target_calories(&tracker).map_err(tool_error)?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for YadaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "yada".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Yet Another Diet Assistant".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Yet Another Diet Assistant (YADA) - food catalog, recursive calorie \
                 resolution and daily intake log. \
                 IMPORTANT: Call log_instructions before logging food. \
                 Foods: add_basic_food/add_composite_food/get_food/delete_food/search_foods/\
                 list_foods, calculate_calories. \
                 Log: log_food/remove_log_entry/clear_day/view_day, weekly_calories, \
                 food_frequency, list_logged_dates, undo. \
                 Profile: set_profile/get_profile, target_calories. \
                 Dates are YYYY-MM-DD. Food IDs are case-insensitive."
                    .into(),
            ),
        }
    }
}
