use crate::commands::CommandRegistry;
use crate::host::{EditorOptions, MemoryHost};
use crate::protocol::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Run the server: read JSON-RPC from stdin, write responses to stdout.
pub async fn run(defaults: EditorOptions) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    tracing::info!("sparrow-keys server ready, reading from stdin");
    serve(reader, &mut stdout, defaults).await
}

/// Handle line-delimited requests from `reader` until end of input.
pub async fn serve<R, W>(
    reader: R,
    writer: &mut W,
    defaults: EditorOptions,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let registry = CommandRegistry::new();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                let resp = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                write_response(writer, &resp).await?;
                continue;
            }
        };

        if let Some(resp) = handle_request(&request, &registry, defaults).await {
            write_response(writer, &resp).await?;
        }
    }

    Ok(())
}

async fn handle_request(
    req: &JsonRpcRequest,
    registry: &CommandRegistry,
    defaults: EditorOptions,
) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let result = InitializeResult {
                server_info: ServerInfo {
                    name: "sparrow-keys".into(),
                    version: env!("CARGO_PKG_VERSION").into(),
                },
                capabilities: ServerCapabilities {
                    commands: registry.definitions().into_iter().map(|d| d.name).collect(),
                },
            };
            Some(JsonRpcResponse::from_result(req.id.clone(), &result))
        }

        // Notifications: no response expected
        "notifications/initialized" | "initialized" => None,

        "commands/list" => {
            let result = CommandsListResult {
                commands: registry.definitions(),
            };
            Some(JsonRpcResponse::from_result(req.id.clone(), &result))
        }

        "commands/execute" => Some(execute(req, registry, defaults).await),

        _ => {
            tracing::debug!("Unknown method: {}", req.method);
            Some(JsonRpcResponse::error(
                req.id.clone(),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", req.method),
            ))
        }
    }
}

async fn execute(
    req: &JsonRpcRequest,
    registry: &CommandRegistry,
    defaults: EditorOptions,
) -> JsonRpcResponse {
    let params: ExecuteParams = match serde_json::from_value(req.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return JsonRpcResponse::error(
                req.id.clone(),
                INVALID_PARAMS,
                format!("Invalid parameters: {e}"),
            );
        }
    };

    let original = params.document.text.clone();
    let mut host = MemoryHost::new(
        params.document.text,
        params.document.language_id,
        params.document.file_name,
    )
    .with_selections(params.selections)
    .with_options(params.options.unwrap_or(defaults))
    .with_clipboard(params.clipboard.unwrap_or_default());

    match registry.run(&params.command, &mut host).await {
        Ok(_) => {
            let (text, host_commands) = host.into_parts();
            let result = ExecuteResult {
                changed: text != original,
                text,
                host_commands,
            };
            JsonRpcResponse::from_result(req.id.clone(), &result)
        }
        Err(e @ crate::commands::CommandError::UnknownCommand(_)) => {
            JsonRpcResponse::error(req.id.clone(), INVALID_PARAMS, e.to_string())
        }
        Err(e) => {
            tracing::warn!(command = %params.command, "{e}");
            JsonRpcResponse::error(req.id.clone(), INTERNAL_ERROR, e.to_string())
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    resp: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(resp)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
