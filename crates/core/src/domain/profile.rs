use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPANY_NAME: &str = "N/A";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub logo_url: String,
    pub description: String,
}

impl CompanyProfile {
    /// Builds a profile from whatever fields the provider returned, filling the
    /// gaps with display defaults.
    pub fn from_parts(
        name: Option<String>,
        logo_url: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            name: name.unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            logo_url: logo_url.unwrap_or_default(),
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }
}
