//! Line-delimited JSON tool host.
//!
//! Each input line is `{"id": ..., "tool": "...", "params": {...}}`. Each
//! request produces exactly one output line, `{"id": ..., "ok": <output>}` or
//! `{"id": ..., "error": "<message>"}`, in input order. A failing tool or a
//! malformed line never stops the loop; only end of input or an I/O error does.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::tools::ToolRegistry;

#[derive(Debug, Deserialize)]
struct HostRequest {
    #[serde(default)]
    id: Value,
    tool: String,
    #[serde(default)]
    params: Value,
}

/// Handle one raw request line and build its response.
pub async fn handle_line(registry: &ToolRegistry, line: &str) -> Value {
    let request: HostRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Malformed request line");
            return json!({ "id": Value::Null, "error": format!("Invalid request: {e}") });
        }
    };

    match registry.invoke(&request.tool, request.params).await {
        Ok(output) => json!({ "id": request.id, "ok": output }),
        Err(e) => {
            warn!(tool = %request.tool, error = %e, "Tool call failed");
            json!({ "id": request.id, "error": format!("{e:#}") })
        }
    }
}

/// Serve requests from `reader` until end of input, writing responses to `writer`.
/// Returns the number of requests handled.
pub async fn serve<R, W>(registry: &ToolRegistry, mut reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled = 0usize;

    info!(tools = registry.len(), "Tool host listening on stdin");

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(registry, line.trim()).await,
            Err(e) => {
                warn!(error = %e, "Request line is not valid UTF-8");
                json!({ "id": Value::Null, "error": format!("Invalid request: {e}") })
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;

        handled += 1;
        debug!(handled, "Response written");
    }

    info!(handled, "Input closed; tool host stopping");
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;
    use crate::tools::build_default_registry;
    use otagent_sources::stub::{StubReply, StubTransport};
    use otagent_sources::OpenTargetsClient;
    use std::sync::Arc;

    fn registry() -> ToolRegistry {
        let stub = StubTransport::new()
            .on(
                "SearchEntity",
                json!({ "queryString": "asthma", "entityNames": ["disease"], "size": 1 }),
                StubReply::Data(json!({ "search": { "total": 1, "hits": [
                    { "id": "MONDO_0004979", "name": "asthma", "entity": "disease", "score": 9.1 }
                ]}})),
            )
            .on(
                "SearchEntity",
                json!({ "queryString": "zzz", "entityNames": ["disease"], "size": 1 }),
                StubReply::Data(json!({ "search": { "total": 0, "hits": [] } })),
            );
        let client = OpenTargetsClient::with_transport(Arc::new(stub));
        build_default_registry(client, &ToolsConfig::default())
    }

    #[tokio::test]
    async fn test_serve_answers_in_order_and_survives_errors() {
        let input = concat!(
            r#"{"id": 1, "tool": "search_disease_by_name", "params": {"disease_name": "zzz"}}"#, "\n",
            "\n",
            "not json\n",
            r#"{"id": "b", "tool": "no_such_tool"}"#, "\n",
            r#"{"id": 2, "tool": "search_disease_by_name", "params": {"disease_name": "asthma"}}"#, "\n",
        );
        let mut output = Vec::new();

        let handled = serve(&registry(), input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(handled, 4);

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 4);

        assert_eq!(responses[0]["id"], 1);
        assert!(responses[0]["error"].as_str().unwrap().contains("zzz"));
        assert!(responses[1]["id"].is_null());
        assert!(responses[1]["error"].as_str().unwrap().starts_with("Invalid request"));
        assert_eq!(responses[2]["id"], "b");
        assert!(responses[2]["error"].as_str().unwrap().contains("Unknown tool"));
        assert_eq!(responses[3], json!({ "id": 2, "ok": "MONDO_0004979" }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_gets_error_and_loop_continues() {
        let mut input: Vec<u8> = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(
            br#"{"id": 3, "tool": "search_disease_by_name", "params": {"disease_name": "asthma"}}"#,
        );
        let mut output = Vec::new();

        let handled = serve(&registry(), input.as_slice(), &mut output).await.unwrap();
        assert_eq!(handled, 2);

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert!(responses[0]["id"].is_null());
        assert!(responses[0]["error"].as_str().unwrap().starts_with("Invalid request"));
        assert_eq!(responses[1], json!({ "id": 3, "ok": "MONDO_0004979" }));
    }

    #[tokio::test]
    async fn test_missing_params_reported_as_error() {
        let response = handle_line(&registry(), r#"{"id": 7, "tool": "get_target_drugs"}"#).await;
        assert_eq!(response["id"], 7);
        assert!(response["error"].as_str().unwrap().contains("target_ids"));
    }
}
