use crate::domain::ports::Operation;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::validate_range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryPricingModel {
    BytesScanned,
    ComputeUnits,
    /// A pricing model this client does not know about yet.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescribeAccountSettings {}

impl Operation for DescribeAccountSettings {
    const NAME: &'static str = "DescribeAccountSettings";
    type Output = AccountSettingsOutput;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAccountSettings {
    #[serde(rename = "MaxQueryTCU", skip_serializing_if = "Option::is_none")]
    pub max_query_tcu: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_pricing_model: Option<QueryPricingModel>,
}

impl Operation for UpdateAccountSettings {
    const NAME: &'static str = "UpdateAccountSettings";
    type Output = AccountSettingsOutput;

    fn validate(&self) -> Result<()> {
        if self.max_query_tcu.is_none() && self.query_pricing_model.is_none() {
            return Err(ClientError::validation(
                "UpdateAccountSettings",
                "at least one of MaxQueryTCU or QueryPricingModel must be set",
            ));
        }
        if let Some(tcu) = self.max_query_tcu {
            validate_range("MaxQueryTCU", tcu, 4, 1000)?;
        }
        if self.query_pricing_model == Some(QueryPricingModel::Unknown) {
            return Err(ClientError::validation(
                "QueryPricingModel",
                "must be BYTES_SCANNED or COMPUTE_UNITS",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountSettingsOutput {
    #[serde(rename = "MaxQueryTCU")]
    pub max_query_tcu: Option<i32>,
    pub query_pricing_model: Option<QueryPricingModel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_account_settings_payload() {
        let request = UpdateAccountSettings {
            max_query_tcu: Some(8),
            query_pricing_model: None,
        };
        assert!(request.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"MaxQueryTCU": 8})
        );

        let request = UpdateAccountSettings {
            max_query_tcu: None,
            query_pricing_model: Some(QueryPricingModel::ComputeUnits),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"QueryPricingModel": "COMPUTE_UNITS"})
        );
    }

    #[test]
    fn test_update_account_settings_requires_a_field() {
        assert!(UpdateAccountSettings::default().validate().is_err());
        assert!(UpdateAccountSettings {
            max_query_tcu: Some(2),
            query_pricing_model: None,
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_unknown_pricing_model_is_tolerated_in_responses() {
        let output: AccountSettingsOutput = serde_json::from_value(json!({
            "MaxQueryTCU": 4,
            "QueryPricingModel": "SOMETHING_NEW"
        }))
        .unwrap();
        assert_eq!(output.query_pricing_model, Some(QueryPricingModel::Unknown));
        assert_eq!(output.max_query_tcu, Some(4));

        let request = UpdateAccountSettings {
            max_query_tcu: None,
            query_pricing_model: Some(QueryPricingModel::Unknown),
        };
        assert!(request.validate().is_err());
    }
}
