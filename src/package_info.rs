use serde::{ Deserialize, Deserializer, Serialize };
use serde_json::Value;
use std::fmt;

/// One package record as served by the AUR RPC.
///
/// Only `ID` and `NumVotes` are required. Every other key may be missing or
/// `null` and falls back to the zero value of its type.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "URL", default, deserialize_with = "null_as_default")]
    pub url: String, // Project homepage
    #[serde(rename = "Description", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "Version", default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(rename = "FirstSubmitted", default, deserialize_with = "null_as_default")]
    pub first_submitted: i64, // Unix timestamp
    #[serde(rename = "License", default, deserialize_with = "null_as_default")]
    pub license: String,
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "OutOfDate", default, deserialize_with = "flag_present")]
    pub out_of_date: bool,
    #[serde(rename = "LastModified", default, deserialize_with = "null_as_default")]
    pub last_modified: i64, // Unix timestamp
    #[serde(rename = "Maintainer", default, deserialize_with = "null_as_default")]
    pub maintainer: String, // Empty when orphaned
    #[serde(rename = "CategoryID", default, deserialize_with = "null_as_default")]
    pub category_id: i64,
    #[serde(rename = "URLPath", default, deserialize_with = "null_as_default")]
    pub download_path: String, // Relative path of the source tarball
    #[serde(rename = "NumVotes")]
    pub num_votes: u64,
}

impl PackageInfo {
    pub fn is_orphaned(&self) -> bool {
        self.maintainer.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where D: Deserializer<'de>, T: Default + Deserialize<'de>
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// The service sends the flagging timestamp, or null when not flagged.
fn flag_present<'de, D>(deserializer: D) -> Result<bool, D::Error> where D: Deserializer<'de> {
    Ok(!matches!(Value::deserialize(deserializer)?, Value::Null | Value::Bool(false)))
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package [ {} ]:", self.name)?;
        writeln!(f, "  URL            : {}", self.url)?;
        writeln!(f, "  Description    : {}", self.description)?;
        writeln!(f, "  Version        : {}", self.version)?;
        writeln!(f, "  FirstSubmitted : {}", self.first_submitted)?;
        writeln!(f, "  License        : {}", self.license)?;
        writeln!(f, "  ID             : {}", self.id)?;
        writeln!(f, "  OutOfDate      : {}", self.out_of_date)?;
        writeln!(f, "  LastModified   : {}", self.last_modified)?;
        writeln!(f, "  Maintainer     : {}", self.maintainer)?;
        writeln!(f, "  CategoryID     : {}", self.category_id)?;
        writeln!(f, "  URLPath        : {}", self.download_path)?;
        write!(f, "  NumVotes       : {}", self.num_votes)
    }
}
