use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ListResourcesResult, PaginatedRequestParams,
        ProtocolVersion, RawResource, ReadResourceRequestParams, ReadResourceResult,
        ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use outlay_core::{ExpenseStore, NewExpense, StorageError};

use crate::catalog::CategoryCatalog;

pub const CATEGORIES_URI: &str = "expense://categories";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddExpenseRequest {
    /// Amount spent. Must be a finite number.
    pub amount: f64,
    /// Category the entry is grouped under. Case-sensitive, must not be empty.
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub note: String,
    /// Entry date as DD-MM-YYYY. Defaults to the current date when omitted.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListExpensesRequest {
    /// Inclusive lower bound, DD-MM-YYYY.
    pub start_date: String,
    /// Inclusive upper bound, DD-MM-YYYY.
    pub end_date: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SummarizeRequest {
    /// Inclusive lower bound, DD-MM-YYYY.
    pub start_date: String,
    /// Inclusive upper bound, DD-MM-YYYY.
    pub end_date: String,
    /// When set, only this exact category is summarized.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddExpenseResponse {
    status: &'static str,
    id: i64,
}

/// MCP surface over an [`ExpenseStore`]. The service is protocol plumbing
/// only: arguments arrive already parsed, results are serialized back, and
/// all ledger semantics live behind the store trait.
#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn ExpenseStore>,
    catalog: CategoryCatalog,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ExpenseService {
    pub fn new(store: Arc<dyn ExpenseStore>, catalog: CategoryCatalog) -> Self {
        Self {
            store,
            catalog,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Add a new expense entry to the ledger. If date is not provided it defaults to the current date."
    )]
    async fn add_expense(
        &self,
        Parameters(req): Parameters<AddExpenseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let entry = NewExpense {
            amount: req.amount,
            category: req.category,
            subcategory: req.subcategory,
            note: req.note,
            date: req.date,
        };
        let id = self.store.insert(&entry).map_err(storage_error)?;
        Ok(CallToolResult::success(vec![Content::json(
            &AddExpenseResponse { status: "ok", id },
        )?]))
    }

    #[tool(
        description = "List all expenses between start_date and end_date (inclusive), oldest entry first."
    )]
    async fn list_expenses(
        &self,
        Parameters(req): Parameters<ListExpensesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .store
            .list(&req.start_date, &req.end_date)
            .map_err(storage_error)?;
        Ok(CallToolResult::success(vec![Content::json(&rows)?]))
    }

    #[tool(
        description = "Summarize expenses by category within an inclusive date range. If category is not provided, all categories are summarized."
    )]
    async fn summarize(
        &self,
        Parameters(req): Parameters<SummarizeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .store
            .summarize(&req.start_date, &req.end_date, req.category.as_deref())
            .map_err(storage_error)?;
        Ok(CallToolResult::success(vec![Content::json(&rows)?]))
    }
}

fn storage_error(e: StorageError) -> McpError {
    match e {
        StorageError::InvalidAmount(_) | StorageError::EmptyCategory => {
            McpError::invalid_params(e.to_string(), None)
        }
        _ => McpError::internal_error(e.to_string(), None),
    }
}

#[tool_handler]
impl ServerHandler for ExpenseService {
    fn get_info(&self) -> ServerInfo {
        let capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        ServerInfo::new(capabilities)
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_instructions(
                "Persistent expense ledger. Use add_expense to record entries, \
                 list_expenses to fetch a date range, and summarize for per-category \
                 totals. The expense://categories resource lists known categories.",
            )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut categories = RawResource::new(CATEGORIES_URI, "categories");
        categories.mime_type = Some("application/json".to_string());
        Ok(ListResourcesResult {
            meta: None,
            resources: vec![categories.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParams { uri, .. }: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if uri != CATEGORIES_URI {
            return Err(McpError::resource_not_found(
                "unknown resource",
                Some(serde_json::json!({ "uri": uri })),
            ));
        }
        let body = self
            .catalog
            .read()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult::new(vec![ResourceContents::text(
            body, uri,
        )]))
    }
}
