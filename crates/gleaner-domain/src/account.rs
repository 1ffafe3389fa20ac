//! CRM accounts and submission status

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A CRM account results can be assigned to
///
/// Read-only within Gleaner; fetched from the account endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier (numeric ids are accepted and kept as text)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name
    pub name: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Tri-state outcome of the last CRM submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrmStatus {
    /// Nothing sent since the last extraction (or a send is in flight)
    #[default]
    Idle,
    /// Last send was acknowledged with a 2xx
    Success,
    /// Last send failed; sending again is allowed
    Error,
}

impl fmt::Display for CrmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrmStatus::Idle => "idle",
            CrmStatus::Success => "success",
            CrmStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserialize() {
        let accounts: Vec<Account> =
            serde_json::from_str(r#"[{"id": "a-1", "name": "ACME"}, {"id": 42, "name": "Globex"}]"#)
                .unwrap();
        assert_eq!(accounts[0].id, "a-1");
        assert_eq!(accounts[1].id, "42");
        assert_eq!(accounts[1].name, "Globex");
    }

    #[test]
    fn test_crm_status_default() {
        assert_eq!(CrmStatus::default(), CrmStatus::Idle);
        assert_eq!(CrmStatus::Error.to_string(), "error");
    }
}
