//! openBD API response models.
//!
//! `GET /get?isbn=` returns a JSON array with one element per requested ISBN;
//! an element is `null` when openBD has no entry. Only the `summary` block and
//! the parts of the ONIX record we map are modeled.

use serde::Deserialize;

/// One element of the `/get` response array
#[derive(Debug, Default, Deserialize)]
pub struct OpenBdItem {
    #[serde(default)]
    pub summary: OpenBdSummary,
    #[serde(default)]
    pub onix: OpenBdOnix,
}

/// Flattened bibliographic summary
#[derive(Debug, Default, Deserialize)]
pub struct OpenBdSummary {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    /// `YYYYMMDD`, `YYYYMM` or `YYYY`
    pub pubdate: Option<String>,
    pub cover: Option<String>,
}

/// ONIX record, limited to the blocks we read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OpenBdOnix {
    #[serde(default)]
    pub descriptive_detail: DescriptiveDetail,
    #[serde(default)]
    pub collateral_detail: CollateralDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescriptiveDetail {
    #[serde(default)]
    pub extent: Vec<Extent>,
}

/// Physical extent entry. `ExtentUnit` `"03"` means pages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Extent {
    pub extent_unit: Option<String>,
    pub extent_value: Option<TextOrNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollateralDetail {
    #[serde(default)]
    pub text_content: Vec<TextContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextContent {
    pub text: Option<String>,
    // Note: TextType and ContentAudience exist but the first block is used as-is
}

/// ONIX values are usually strings but some feeds emit bare numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(u64),
}

impl TextOrNumber {
    /// Interpret the value as a non-negative integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(n) => u32::try_from(*n).ok(),
        }
    }
}
