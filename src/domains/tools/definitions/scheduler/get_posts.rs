//! List scheduled and published posts from Postiz by calendar window.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::POSTS_PATH;
use crate::core::client::{ApiClient, Platform};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{Tool, Validate};

/// Earliest year the calendar accepts.
const MIN_YEAR: i32 = 2022;

/// Calendar window to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    #[default]
    Month,
}

impl CalendarView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

fn default_week() -> u32 {
    1
}

fn default_day() -> u32 {
    1
}

/// Parameters for `get_posts`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPostsParams {
    #[schemars(description = "Display mode (\"month\", \"week\", \"day\")")]
    #[serde(default)]
    pub display: CalendarView,

    #[schemars(description = "Year (2022 or later)", range(min = 2022))]
    #[serde(default)]
    pub year: Option<i32>,

    #[schemars(
        description = "Month number (1-12), required for monthly/weekly view",
        range(min = 1, max = 12)
    )]
    #[serde(default)]
    pub month: Option<u32>,

    #[schemars(
        description = "Week number (1-52), required for weekly/daily view",
        range(min = 1, max = 52)
    )]
    #[serde(default = "default_week")]
    pub week: u32,

    #[schemars(description = "Day of week (0-6), required for daily view", range(min = 0, max = 6))]
    #[serde(default = "default_day")]
    pub day: u32,
}

impl Validate for GetPostsParams {
    fn validate(&self) -> ToolResult<()> {
        if !self.year.is_some_and(|year| year >= MIN_YEAR) {
            return Err(ToolError::invalid_arguments(
                "year is required and must be 2022 or later",
            ));
        }

        let view = self.display;
        if view == CalendarView::Day && self.day > 6 {
            return Err(ToolError::invalid_arguments(
                "day is required for daily view and must be between 0-6",
            ));
        }
        if matches!(view, CalendarView::Week | CalendarView::Day) && !(1..=52).contains(&self.week)
        {
            return Err(ToolError::invalid_arguments(
                "week is required for weekly/daily view and must be between 1-52",
            ));
        }
        if matches!(view, CalendarView::Month | CalendarView::Week)
            && !self.month.is_some_and(|month| (1..=12).contains(&month))
        {
            return Err(ToolError::invalid_arguments(
                "month is required for monthly/weekly view and must be between 1-12",
            ));
        }
        Ok(())
    }
}

impl GetPostsParams {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("display", self.display.as_str().to_string())];
        if let Some(year) = self.year {
            query.push(("year", year.to_string()));
        }
        if let Some(month) = self.month {
            query.push(("month", month.to_string()));
        }
        query.push(("week", self.week.to_string()));
        query.push(("day", self.day.to_string()));
        query
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetPostsTool;

#[async_trait]
impl Tool for GetPostsTool {
    type Params = GetPostsParams;
    const NAME: &'static str = "get_posts";

    fn description(&self) -> Cow<'static, str> {
        "Retrieve scheduled and published posts from Postiz with flexible date filtering (daily, weekly, or monthly view)".into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        "Failed to get posts".into()
    }

    #[instrument(skip_all, fields(display = params.display.as_str()))]
    async fn call(&self, client: &ApiClient, params: GetPostsParams) -> ToolResult<Value> {
        let query = params.query();
        debug!(?query, "Listing posts");
        let request = client
            .request(Platform::Scheduler, Method::GET, POSTS_PATH)?
            .query(&query);
        Ok(client.send(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{args, client};
    use crate::domains::tools::handlers::{ToolHandler, TypedTool};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(value: Value) -> GetPostsParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_year_required() {
        let err = params(json!({ "display": "week", "month": 3 }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "year is required and must be 2022 or later");

        let err = params(json!({ "year": 2021, "month": 3 })).validate().unwrap_err();
        assert!(err.to_string().starts_with("year is required"));
    }

    #[test]
    fn test_month_view_requires_month() {
        let err = params(json!({ "year": 2025 })).validate().unwrap_err();
        assert!(err.to_string().starts_with("month is required"));
        assert!(params(json!({ "year": 2025, "month": 12 })).validate().is_ok());
    }

    #[test]
    fn test_day_view_rules() {
        let err = params(json!({ "display": "day", "year": 2025, "day": 7 }))
            .validate()
            .unwrap_err();
        assert!(err.to_string().starts_with("day is required"));

        let err = params(json!({ "display": "day", "year": 2025, "week": 53 }))
            .validate()
            .unwrap_err();
        assert!(err.to_string().starts_with("week is required"));

        // Day view needs no month.
        assert!(params(json!({ "display": "day", "year": 2025 })).validate().is_ok());
    }

    #[test]
    fn test_query_always_carries_week_and_day() {
        let query = params(json!({ "year": 2025, "month": 2 })).query();
        assert_eq!(
            query,
            vec![
                ("display", "month".to_string()),
                ("year", "2025".to_string()),
                ("month", "2".to_string()),
                ("week", "1".to_string()),
                ("day", "1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_sends_calendar_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v1/posts"))
            .and(query_param("display", "week"))
            .and(query_param("year", "2025"))
            .and(query_param("month", "6"))
            .and(query_param("week", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "posts": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let value = TypedTool::new(GetPostsTool)
            .handle(
                &client(&server.uri()),
                args(json!({ "display": "week", "year": 2025, "month": 6, "week": 24 })),
            )
            .await
            .unwrap();
        assert_eq!(value, json!({ "posts": [] }));
    }
}
