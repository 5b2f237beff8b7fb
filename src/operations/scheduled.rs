use crate::domain::ports::Operation;
use crate::operations::EmptyOutput;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_arn, validate_length, validate_range};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduledQueryState {
    Enabled,
    Disabled,
    /// A state this client does not know about yet.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListScheduledQueries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Operation for ListScheduledQueries {
    const NAME: &'static str = "ListScheduledQueries";
    type Output = ListScheduledQueriesOutput;

    fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_results {
            validate_range("MaxResults", max, 1, 1000)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListScheduledQueriesOutput {
    pub scheduled_queries: Vec<ScheduledQuerySummary>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledQuerySummary {
    pub arn: String,
    pub name: String,
    pub state: ScheduledQueryState,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize_option")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize_option")]
    pub previous_invocation_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize_option")]
    pub next_invocation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_run_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeScheduledQuery {
    pub scheduled_query_arn: String,
}

impl Operation for DescribeScheduledQuery {
    const NAME: &'static str = "DescribeScheduledQuery";
    type Output = DescribeScheduledQueryOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ScheduledQueryArn", &self.scheduled_query_arn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeScheduledQueryOutput {
    pub scheduled_query: ScheduledQueryDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduledQueryDescription {
    pub arn: String,
    pub name: String,
    pub query_string: String,
    pub state: ScheduledQueryState,
    pub schedule_configuration: ScheduleConfiguration,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize_option")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize_option")]
    pub previous_invocation_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "epoch_seconds::deserialize_option")]
    pub next_invocation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_query_execution_role_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleConfiguration {
    pub schedule_expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecuteScheduledQuery {
    pub scheduled_query_arn: String,
    #[serde(serialize_with = "epoch_seconds::serialize")]
    pub invocation_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

impl Operation for ExecuteScheduledQuery {
    const NAME: &'static str = "ExecuteScheduledQuery";
    type Output = EmptyOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ScheduledQueryArn", &self.scheduled_query_arn)?;
        if let Some(token) = &self.client_token {
            validate_length("ClientToken", token, 32, 128)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateScheduledQuery {
    pub scheduled_query_arn: String,
    pub state: ScheduledQueryState,
}

impl Operation for UpdateScheduledQuery {
    const NAME: &'static str = "UpdateScheduledQuery";
    type Output = EmptyOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ScheduledQueryArn", &self.scheduled_query_arn)?;
        if self.state == ScheduledQueryState::Unknown {
            return Err(ClientError::validation("State", "must be ENABLED or DISABLED"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteScheduledQuery {
    pub scheduled_query_arn: String,
}

impl Operation for DeleteScheduledQuery {
    const NAME: &'static str = "DeleteScheduledQuery";
    type Output = EmptyOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ScheduledQueryArn", &self.scheduled_query_arn)
    }
}

/// awsJson timestamps travel as fractional epoch seconds.
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.timestamp_millis() as f64 / 1000.0)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        Ok(secs.and_then(|secs| {
            let nanos = (secs.fract() * 1e9).round() as u32;
            DateTime::from_timestamp(secs.trunc() as i64, nanos)
        }))
    }
}
