//! JSON-lines invoke channel.
//!
//! Each input line is `{"id": <any>, "cmd": "<name>", "args": {...}}`; each
//! reply is `{"id": <same>, "ok": true, "data": ...}` or
//! `{"id": <same>, "ok": false, "error": {"code", "message", "retryable"}}`.
//! Invocations run one at a time and replies come back in request order.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::{
    annotations::dialog::DialogEdit,
    commands,
    core::errors::{AppError, AppResult},
    upload::files::FileSlot,
    AppState,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    #[serde(default)]
    pub id: Value,
    pub cmd: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize)]
pub struct InvocationReply {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AppError>,
}

impl InvocationReply {
    fn from_result(id: Value, result: AppResult<Value>) -> Self {
        match result {
            Ok(data) => Self {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                id,
                ok: false,
                data: None,
                error: Some(err),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectFileArgs {
    slot: FileSlot,
    file_path: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PathArgs {
    path: String,
}

#[derive(Debug, Deserialize)]
struct EditArgs {
    edit: DialogEdit,
}

#[derive(Debug, Default, Deserialize)]
struct ListRecordsArgs {
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Deserialize)]
struct SelectRecordArgs {
    id: String,
}

fn parse_args<T: DeserializeOwned>(cmd: &str, raw: Value) -> AppResult<T> {
    let raw = if raw.is_null() {
        Value::Object(Default::default())
    } else {
        raw
    };
    serde_json::from_value(raw)
        .map_err(|err| AppError::InvalidInput(format!("bad arguments for `{cmd}`: {err}")))
}

fn to_data<T: Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|err| AppError::Internal(err.to_string()))
}

pub async fn dispatch(state: &AppState, cmd: &str, args: Value) -> AppResult<Value> {
    match cmd {
        "select_file" => {
            let args: SelectFileArgs = parse_args(cmd, args)?;
            to_data(
                commands::upload::select_file(
                    state,
                    args.slot,
                    args.file_path,
                    args.mime_type,
                    args.display_name,
                )
                .await?,
            )
        }
        "upload_state" => to_data(commands::upload::upload_state(state).await?),
        "advance" => to_data(commands::upload::advance(state).await?),
        "reset" => to_data(commands::upload::reset(state).await?),
        "submit" => to_data(commands::upload::submit(state).await?),
        "get_tree" => to_data(commands::annotations::get_tree(state).await?),
        "toggle_node" => {
            let args: PathArgs = parse_args(cmd, args)?;
            to_data(commands::annotations::toggle_node(state, args.path).await?)
        }
        "click_node" => {
            let args: PathArgs = parse_args(cmd, args)?;
            to_data(commands::annotations::click_node(state, args.path).await?)
        }
        "dialog_state" => to_data(commands::annotations::dialog_state(state).await?),
        "edit_dialog" => {
            let args: EditArgs = parse_args(cmd, args)?;
            to_data(commands::annotations::edit_dialog(state, args.edit).await?)
        }
        "save_annotation" => to_data(commands::annotations::save_annotation(state).await?),
        "close_dialog" => to_data(commands::annotations::close_dialog(state).await?),
        "get_metadata" => to_data(commands::annotations::get_metadata(state).await?),
        "list_records" => {
            let args: ListRecordsArgs = parse_args(cmd, args)?;
            to_data(commands::dashboard::list_records(state, args.refresh).await?)
        }
        "dashboard_state" => to_data(commands::dashboard::dashboard_state(state).await?),
        "select_record" => {
            let args: SelectRecordArgs = parse_args(cmd, args)?;
            to_data(commands::dashboard::select_record(state, args.id).await?)
        }
        "drain_notices" => to_data(commands::dashboard::drain_notices(state).await?),
        other => Err(AppError::NotFound(format!("command `{other}`"))),
    }
}

async fn handle(state: &AppState, invocation: Invocation) -> InvocationReply {
    debug!(cmd = %invocation.cmd, "invoke");
    let result = dispatch(state, &invocation.cmd, invocation.args).await;
    if let Err(err) = &result {
        warn!(cmd = %invocation.cmd, code = err.code(), error = %err, "command failed");
    }
    InvocationReply::from_result(invocation.id, result)
}

async fn write_reply<W>(writer: &mut W, reply: &InvocationReply) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(reply)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Serves invocations until `reader` hits EOF. Each line is handled to
/// completion before the next one is read, so commands apply in the order they
/// were sent.
pub async fn serve<R, W>(state: AppState, reader: R, mut writer: W) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Invocation>(&line) {
            Ok(invocation) => handle(&state, invocation).await,
            Err(err) => InvocationReply::from_result(
                Value::Null,
                Err(AppError::InvalidInput(format!("malformed invocation: {err}"))),
            ),
        };
        write_reply(&mut writer, &reply).await?;
    }
    Ok(())
}
