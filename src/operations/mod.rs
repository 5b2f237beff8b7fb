//! Request and response models for the Timestream Query API.
//!
//! Every request implements [`Operation`](crate::domain::ports::Operation).
//! Optional fields are `Option`s that are left out of the payload when `None`
//! and always sent when `Some`, even if the value is empty.

pub mod account;
pub mod endpoints;
pub mod query;
pub mod scheduled;
pub mod tags;

pub use account::{
    AccountSettingsOutput, DescribeAccountSettings, QueryPricingModel, UpdateAccountSettings,
};
pub use endpoints::{DescribeEndpoints, DescribeEndpointsOutput};
pub use query::{
    CancelQuery, CancelQueryOutput, ColumnInfo, Datum, PrepareQuery, PrepareQueryOutput, Query,
    QueryOutput, QueryStatus, Row, ScalarType, TimeSeriesDataPoint,
};
pub use scheduled::{
    DeleteScheduledQuery, DescribeScheduledQuery, DescribeScheduledQueryOutput,
    ExecuteScheduledQuery, ListScheduledQueries, ListScheduledQueriesOutput,
    ScheduledQueryState, UpdateScheduledQuery,
};
pub use tags::{ListTagsForResource, ListTagsForResourceOutput, Tag, TagResource, UntagResource};

use serde::{Deserialize, Serialize};

/// Output of operations that return nothing on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyOutput {}
