//! Messages exchanged with the parse worker
//!
//! All payloads are JSON-serializable. On the wire a request reads
//! `{"type": "parse", "data": {"text": ..., "requestId": 3}}` and a response
//! `{"type": "parsed", "requestId": 3, "result": "[...]"}`.

use serde::{Deserialize, Serialize};

/// Monotonic id assigned by the client to each parse request
pub type RequestId = u64;

/// Client → worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum WorkerRequest {
    /// One-time backend setup; `wasm_url` locates the parser module
    Init { wasm_url: String },
    Parse { text: String, request_id: RequestId },
    Shutdown,
}

/// Worker → client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum WorkerResponse {
    Initialized,
    Parsed {
        request_id: RequestId,
        /// Serialized forest, normally a JSON array
        result: String,
    },
    /// `request_id` is absent for initialization failures
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_wire_shape() {
        let msg = WorkerRequest::Init {
            wasm_url: "/usr/lib/sevenmark/parse".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "init", "data": {"wasmUrl": "/usr/lib/sevenmark/parse"}})
        );
    }

    #[test]
    fn test_parse_wire_shape() {
        let msg = WorkerRequest::Parse {
            text: "'''bold'''".to_string(),
            request_id: 7,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "parse", "data": {"text": "'''bold'''", "requestId": 7}})
        );
    }

    #[test]
    fn test_response_wire_shapes() {
        assert_eq!(
            serde_json::to_value(WorkerResponse::Initialized).unwrap(),
            json!({"type": "initialized"})
        );
        assert_eq!(
            serde_json::to_value(WorkerResponse::Parsed {
                request_id: 2,
                result: "[]".to_string()
            })
            .unwrap(),
            json!({"type": "parsed", "requestId": 2, "result": "[]"})
        );
    }

    #[test]
    fn test_error_without_request_id() {
        let parsed: WorkerResponse =
            serde_json::from_value(json!({"type": "error", "error": "module missing"})).unwrap();
        assert_eq!(
            parsed,
            WorkerResponse::Error {
                request_id: None,
                error: "module missing".to_string()
            }
        );
    }
}
