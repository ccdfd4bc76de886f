use serde::Serialize;

/// Outcome of a single diagnostic check.
///
/// Only built through [`CheckResult::pass`] and [`CheckResult::fail`], so a
/// passing result never carries a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, details: Option<String>) -> Self {
        Self {
            name: name.into(),
            ok: true,
            details,
            fix: None,
        }
    }

    pub fn fail(name: impl Into<String>, details: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ok: false,
            details: Some(details.into()),
            fix: Some(fix.into()),
        }
    }
}
