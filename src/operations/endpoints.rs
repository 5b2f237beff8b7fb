use crate::domain::ports::Operation;
use serde::{Deserialize, Serialize};

pub use crate::domain::model::Endpoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescribeEndpoints {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeEndpointsOutput {
    pub endpoints: Vec<Endpoint>,
}

impl Operation for DescribeEndpoints {
    const NAME: &'static str = "DescribeEndpoints";
    const USES_ENDPOINT_DISCOVERY: bool = false;
    type Output = DescribeEndpointsOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_endpoints_wire_format() {
        assert_eq!(
            serde_json::to_string(&DescribeEndpoints::default()).unwrap(),
            "{}"
        );

        let output: DescribeEndpointsOutput = serde_json::from_str(
            r#"{"Endpoints":[{"Address":"query-cell2.timestream.us-east-1.amazonaws.com","CachePeriodInMinutes":1440}]}"#,
        )
        .unwrap();
        assert_eq!(output.endpoints.len(), 1);
        assert_eq!(output.endpoints[0].cache_period_in_minutes, 1440);
    }
}
