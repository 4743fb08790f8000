//! Usage analytics over the document store and the activity log.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use crate::error::Result;
use crate::mcp::handler::{get_optional_string_arg, get_string_arg, ToolArgs, ToolHandler};
use crate::mcp::protocol::Tool;
use crate::service::ActivityEntry;
use crate::tools::ToolContext;

/// Maximum number of entries returned by the `queries` report.
pub const QUERY_HISTORY_LIMIT: usize = 100;

/// Report selected by `metric_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    System,
    Employee,
    Documents,
    Queries,
}

impl FromStr for MetricType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "system" => Ok(MetricType::System),
            "employee" => Ok(MetricType::Employee),
            "documents" => Ok(MetricType::Documents),
            "queries" => Ok(MetricType::Queries),
            _ => Err(()),
        }
    }
}

fn invalid_metric(metric_type: &str) -> Value {
    json!({ "error": format!("Invalid metric type: {}", metric_type) })
}

fn count_query_types(entries: &[&ActivityEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.query_type.clone()).or_insert(0) += 1;
    }
    counts
}

/// Analytics reporting tool.
pub struct GetAnalyticsTool {
    ctx: ToolContext,
}

impl GetAnalyticsTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    async fn system(&self) -> Value {
        let entries = self.ctx.activity.entries().await;
        let employees: HashSet<&str> = entries.iter().map(|e| e.employee_id.as_str()).collect();

        json!({
            "total_documents": self.ctx.documents.len().await,
            "total_queries": entries.len(),
            "active_employees": employees.len(),
            "timestamp": Utc::now().to_rfc3339(),
        })
    }

    async fn employee(&self, employee_id: &str) -> Value {
        let entries = self.ctx.activity.entries().await;
        let mine: Vec<&ActivityEntry> = entries
            .iter()
            .filter(|e| e.employee_id == employee_id)
            .collect();
        let last_activity = mine.iter().map(|e| e.timestamp).max();

        json!({
            "employee_id": employee_id,
            "total_queries": mine.len(),
            "query_types": count_query_types(&mine),
            "last_activity": last_activity.map(|t| t.to_rfc3339()),
        })
    }

    async fn documents(&self) -> Value {
        let documents: Vec<Value> = self
            .ctx
            .documents
            .all()
            .await
            .into_iter()
            .map(|doc| {
                json!({
                    "id": doc.id,
                    "title": doc.title,
                    "category": doc.category,
                    "tags": doc.tags,
                })
            })
            .collect();

        json!({ "documents": documents })
    }

    async fn queries(&self, employee_id: Option<&str>, date_range: Option<&str>) -> Value {
        let day = date_range.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
        let entries = self.ctx.activity.entries().await;

        let mut matching: Vec<&ActivityEntry> = entries
            .iter()
            .filter(|e| employee_id.map_or(true, |id| e.employee_id == id))
            .filter(|e| day.map_or(true, |d| e.timestamp.date_naive() == d))
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let distribution = count_query_types(&matching);
        let total = matching.len();
        matching.truncate(QUERY_HISTORY_LIMIT);

        json!({
            "total_queries": total,
            "queries": matching,
            "query_type_distribution": distribution,
        })
    }
}

#[async_trait]
impl ToolHandler for GetAnalyticsTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "get_analytics".to_string(),
            description: "Get system analytics and employee activity data".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "metric_type": {
                        "type": "string",
                        "enum": ["system", "employee", "documents", "queries"]
                    },
                    "employee_id": {"type": "string", "description": "Optional specific employee ID"},
                    "date_range": {"type": "string", "description": "Optional date range filter"}
                },
                "required": ["metric_type"]
            }),
        }
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let metric_type = get_string_arg(&args, "metric_type")?;
        let employee_id = get_optional_string_arg(&args, "employee_id");
        let date_range = get_optional_string_arg(&args, "date_range");

        let report = match (metric_type.parse::<MetricType>(), employee_id.as_deref()) {
            (Ok(MetricType::System), _) => self.system().await,
            (Ok(MetricType::Employee), Some(id)) if !id.is_empty() => self.employee(id).await,
            (Ok(MetricType::Documents), _) => self.documents().await,
            (Ok(MetricType::Queries), id) => self.queries(id, date_range.as_deref()).await,
            _ => invalid_metric(&metric_type),
        };
        Ok(report)
    }
}
