use crate::domain::ports::Operation;
use crate::operations::EmptyOutput;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_arn, validate_length, validate_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTagsForResource {
    #[serde(rename = "ResourceARN")]
    pub resource_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl Operation for ListTagsForResource {
    const NAME: &'static str = "ListTagsForResource";
    type Output = ListTagsForResourceOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ResourceARN", &self.resource_arn)?;
        if let Some(max) = self.max_results {
            validate_range("MaxResults", max, 1, 200)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListTagsForResourceOutput {
    pub tags: Vec<Tag>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResource {
    #[serde(rename = "ResourceARN")]
    pub resource_arn: String,
    pub tags: Vec<Tag>,
}

impl Operation for TagResource {
    const NAME: &'static str = "TagResource";
    type Output = EmptyOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ResourceARN", &self.resource_arn)?;
        if self.tags.len() > 200 {
            return Err(ClientError::validation("Tags", "at most 200 tags are allowed"));
        }
        for tag in &self.tags {
            validate_length("Tags.Key", &tag.key, 1, 128)?;
            validate_length("Tags.Value", &tag.value, 0, 256)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UntagResource {
    #[serde(rename = "ResourceARN")]
    pub resource_arn: String,
    pub tag_keys: Vec<String>,
}

impl Operation for UntagResource {
    const NAME: &'static str = "UntagResource";
    type Output = EmptyOutput;

    fn validate(&self) -> Result<()> {
        validate_arn("ResourceARN", &self.resource_arn)?;
        for key in &self.tag_keys {
            validate_length("TagKeys", key, 1, 128)?;
        }
        Ok(())
    }
}
