//! Wire records for the server's custom requests.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::TextDocumentIdentifier;

use crate::build::BuildStatus;

/// Parameters of the custom `textDocument/build` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParams {
    pub text_document: TextDocumentIdentifier,
}

/// Response of the custom `textDocument/build` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub status: BuildStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Url;

    #[test]
    fn build_params_use_camel_case() {
        let json = r#"{"textDocument": {"uri": "file:///main.tex"}}"#;
        let params: BuildParams = serde_json::from_str(json).expect("valid params");
        assert_eq!(
            params.text_document.uri,
            Url::parse("file:///main.tex").expect("valid URI")
        );
    }

    #[test]
    fn build_result_carries_the_status_code() {
        let result = BuildResult {
            status: BuildStatus::Error,
        };
        assert_eq!(
            serde_json::to_string(&result).expect("json"),
            r#"{"status":1}"#
        );
    }
}
