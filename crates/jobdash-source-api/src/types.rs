//! Upstream record types for the Jenkins JSON tree API
//!
//! Every field tolerates null, absence and a wrong type, falling back to its
//! default, so one malformed record never fails a whole listing. The
//! normalizer applies the remaining defaults.

use serde::de::DeserializeOwned;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};
use serde_json::Value;

/// `_class` tag of a folder container (CloudBees folder plugin).
pub const FOLDER_CLASS: &str = "com.cloudbees.hudson.plugins.folder.Folder";

/// Listing returned for one folder path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFolderNode {
    #[serde(default, deserialize_with = "lenient_list")]
    pub jobs: Vec<RawJob>,
}

/// One entry of a folder listing. Folders and jobs share the shape; folders
/// carry no build data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawJob {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(rename = "_class")]
    #[serde(default, deserialize_with = "lenient")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub buildable: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub color: Option<String>,
    #[serde(rename = "inQueue")]
    #[serde(default, deserialize_with = "lenient")]
    pub in_queue: Option<bool>,
    #[serde(rename = "lastBuild")]
    #[serde(default, deserialize_with = "lenient")]
    pub last_build: Option<BuildRef>,
    #[serde(rename = "lastSuccessfulBuild")]
    #[serde(default, deserialize_with = "lenient")]
    pub last_successful_build: Option<BuildRef>,
    #[serde(rename = "lastFailedBuild")]
    #[serde(default, deserialize_with = "lenient")]
    pub last_failed_build: Option<BuildRef>,
    #[serde(default, deserialize_with = "lenient_optional_list")]
    pub builds: Option<Vec<RawBuild>>,
}

impl RawJob {
    pub fn is_folder(&self) -> bool {
        self.class.as_deref() == Some(FOLDER_CLASS)
    }

    pub fn builds(&self) -> &[RawBuild] {
        self.builds.as_deref().unwrap_or(&[])
    }
}

/// Reads a field, using its default when the value has the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Reads a list, dropping entries that are not records. Anything other than
/// an array reads as absent.
fn lenient_optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient_optional_list(deserializer)?.unwrap_or_default())
}

/// Summary of a notable build (last, last successful, last failed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildRef {
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// One record of the recent build window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBuild {
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<i64>,
}
