use serde::Serialize;

/// Why a query found nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Miss {
    /// The symbol does not appear anywhere in the project
    Symbol,
    /// The named file or class does not exist
    Container,
    /// The container exists but does not hold the symbol
    SymbolInContainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "miss", rename_all = "snake_case")]
pub enum Status {
    Found,
    NotFound(Miss),
    Failed,
}

/// Result of one query: text for the caller, a one-line summary, and a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub text: String,
    pub summary: String,
    pub status: Status,
}

impl ToolOutput {
    pub fn found(text: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            summary: summary.into(),
            status: Status::Found,
        }
    }

    /// A miss whose summary repeats the text
    pub fn not_found(miss: Miss, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            summary: text.clone(),
            text,
            status: Status::NotFound(miss),
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            summary: text.clone(),
            text,
            status: Status::Failed,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn success(&self) -> bool {
        self.status == Status::Found
    }

    /// `(text, summary, success)`
    pub fn into_parts(self) -> (String, String, bool) {
        let success = self.success();
        (self.text, self.summary, success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts() {
        let (text, summary, success) = ToolOutput::found("body", "short").into_parts();
        assert_eq!(text, "body");
        assert_eq!(summary, "short");
        assert!(success);

        let miss = ToolOutput::not_found(Miss::Container, "gone");
        assert_eq!(miss.summary, "gone");
        assert!(!miss.success());
        assert!(!ToolOutput::failed("boom").success());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(Status::NotFound(Miss::SymbolInContainer)).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["miss"], "symbol_in_container");

        let json = serde_json::to_value(Status::Found).unwrap();
        assert_eq!(json["status"], "found");
    }
}
