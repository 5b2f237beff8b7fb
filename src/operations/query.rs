use crate::domain::ports::Operation;
use crate::utils::error::Result;
use crate::utils::validation::{validate_length, validate_range};
use serde::{Deserialize, Serialize};

const MAX_QUERY_LENGTH: usize = 262_144;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Query {
    pub query_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<i32>,
}

impl Query {
    pub fn new(query_string: impl Into<String>) -> Self {
        Self {
            query_string: query_string.into(),
            ..Default::default()
        }
    }

    pub fn with_max_rows(mut self, max_rows: i32) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_next_token(mut self, next_token: impl Into<String>) -> Self {
        self.next_token = Some(next_token.into());
        self
    }

    pub fn with_client_token(mut self, client_token: impl Into<String>) -> Self {
        self.client_token = Some(client_token.into());
        self
    }
}

impl Operation for Query {
    const NAME: &'static str = "Query";
    type Output = QueryOutput;

    fn validate(&self) -> Result<()> {
        validate_length("QueryString", &self.query_string, 1, MAX_QUERY_LENGTH)?;
        if let Some(token) = &self.client_token {
            validate_length("ClientToken", token, 32, 128)?;
        }
        if let Some(token) = &self.next_token {
            validate_length("NextToken", token, 1, 2048)?;
        }
        if let Some(max_rows) = self.max_rows {
            validate_range("MaxRows", max_rows, 1, 1000)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueryOutput {
    pub query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub rows: Vec<Row>,
    pub column_info: Vec<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_status: Option<QueryStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Row {
    pub data: Vec<Datum>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Datum {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series_value: Option<Vec<TimeSeriesDataPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_value: Option<Vec<Datum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_value: Option<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value: Option<bool>,
}

impl Datum {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self {
            scalar_value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn null() -> Self {
        Self {
            null_value: Some(true),
            ..Default::default()
        }
    }

    /// Flattens the value into a single cell of text.
    pub fn to_text(&self) -> String {
        if let Some(value) = &self.scalar_value {
            return value.clone();
        }
        if let Some(points) = &self.time_series_value {
            let items: Vec<String> = points
                .iter()
                .map(|p| format!("{}={}", p.time, p.value.to_text()))
                .collect();
            return format!("[{}]", items.join(", "));
        }
        if let Some(values) = &self.array_value {
            let items: Vec<String> = values.iter().map(Datum::to_text).collect();
            return format!("[{}]", items.join(", "));
        }
        if let Some(row) = &self.row_value {
            let items: Vec<String> = row.data.iter().map(Datum::to_text).collect();
            return format!("({})", items.join(", "));
        }
        String::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TimeSeriesDataPoint {
    pub time: String,
    pub value: Datum,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub r#type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ColumnType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar_type: Option<ScalarType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_column_info: Option<Box<ColumnInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series_measure_value_column_info: Option<Box<ColumnInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_column_info: Option<Vec<ColumnInfo>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalarType {
    Varchar,
    Boolean,
    Bigint,
    Double,
    Timestamp,
    Date,
    Time,
    IntervalDayToSecond,
    IntervalYearToMonth,
    Integer,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueryStatus {
    pub progress_percentage: Option<f64>,
    pub cumulative_bytes_scanned: Option<i64>,
    pub cumulative_bytes_metered: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CancelQuery {
    pub query_id: String,
}

impl CancelQuery {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
        }
    }
}

impl Operation for CancelQuery {
    const NAME: &'static str = "CancelQuery";
    type Output = CancelQueryOutput;

    fn validate(&self) -> Result<()> {
        validate_length("QueryId", &self.query_id, 1, 64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CancelQueryOutput {
    pub cancellation_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrepareQuery {
    pub query_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_only: Option<bool>,
}

impl Operation for PrepareQuery {
    const NAME: &'static str = "PrepareQuery";
    type Output = PrepareQueryOutput;

    fn validate(&self) -> Result<()> {
        validate_length("QueryString", &self.query_string, 1, MAX_QUERY_LENGTH)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrepareQueryOutput {
    pub query_string: String,
    pub columns: Vec<SelectColumn>,
    pub parameters: Vec<ParameterMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SelectColumn {
    pub name: Option<String>,
    pub r#type: Option<ColumnType>,
    pub database_name: Option<String>,
    pub table_name: Option<String>,
    pub aliased: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParameterMapping {
    pub name: String,
    pub r#type: ColumnType,
}
