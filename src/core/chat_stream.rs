//! Streaming transport for `models/{model}:streamGenerateContent`.
//!
//! The service owns the sending half of an unbounded channel; the UI loop
//! drains the receiving half between frames. Every event is tagged with the
//! stream id it belongs to so the controller can drop stale events.

use futures_util::StreamExt;
use memchr::memchr;
use tokio::sync::mpsc;

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::utils::url::construct_stream_url;

#[derive(Clone, Debug)]
pub enum StreamMessage {
    Chunk(String),
    Error(String),
    End,
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn handle_data_payload(
    payload: &str,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) -> bool {
    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(response) => {
            if let Some(delta) = response.text_delta() {
                if !delta.is_empty() {
                    let _ = tx.send((StreamMessage::Chunk(delta), stream_id));
                }
            }
            false
        }
        Err(_) => {
            if payload.trim().is_empty() {
                return false;
            }

            let formatted_error = format_api_error(payload);
            let _ = tx.send((StreamMessage::Error(formatted_error), stream_id));
            let _ = tx.send((StreamMessage::End, stream_id));
            true
        }
    }
}

fn process_sse_line(
    line: &str,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
) -> bool {
    extract_data_payload(line)
        .map(|payload| handle_data_payload(payload, tx, stream_id))
        .unwrap_or(false)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let message = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })?;

    let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
    let status = value.pointer("/error/status").and_then(|v| v.as_str());
    match status {
        Some(status) if !status.is_empty() => Some(format!("{} ({})", collapsed.trim(), status)),
        _ => Some(collapsed.trim().to_string()),
    }
}

fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error:\n```\n<empty>\n```".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            if let Some(summary) = extract_error_summary(&json_value) {
                if !summary.is_empty() {
                    return format!("API Error: {}\n```json\n{}\n```", summary, pretty_json);
                }
            }
            return format!("API Error:\n```json\n{}\n```", pretty_json);
        }
    }

    format!("API Error:\n```\n{}\n```", trimmed)
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub contents: Vec<Content>,
    pub stream_id: u64,
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Starts one streamed exchange. The task runs to completion or
    /// failure; there is no cancellation and no timeout. Every stream
    /// terminates with `StreamMessage::End`.
    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let StreamParams {
                client,
                base_url,
                api_key,
                model,
                contents,
                stream_id,
            } = params;

            let request = GenerateContentRequest { contents };
            let url = construct_stream_url(&base_url, &model);

            match client
                .post(url)
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => {
                    if !response.status().is_success() {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "<no body>".to_string());
                        tracing::error!(%status, "streamGenerateContent request rejected");
                        let _ = tx.send((
                            StreamMessage::Error(format_api_error(&error_text)),
                            stream_id,
                        ));
                        let _ = tx.send((StreamMessage::End, stream_id));
                        return;
                    }

                    let mut stream = response.bytes_stream();
                    let mut buffer: Vec<u8> = Vec::new();

                    while let Some(chunk) = stream.next().await {
                        match chunk {
                            Ok(chunk_bytes) => {
                                buffer.extend_from_slice(&chunk_bytes);

                                while let Some(newline_pos) = memchr(b'\n', &buffer) {
                                    let line = match std::str::from_utf8(&buffer[..newline_pos]) {
                                        Ok(s) => s.trim().to_string(),
                                        Err(e) => {
                                            tracing::warn!("invalid UTF-8 in stream: {e}");
                                            buffer.drain(..=newline_pos);
                                            continue;
                                        }
                                    };

                                    let should_end = process_sse_line(&line, &tx, stream_id);
                                    buffer.drain(..=newline_pos);
                                    if should_end {
                                        return;
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::error!("stream transport failed: {e}");
                                let _ = tx.send((
                                    StreamMessage::Error(format_api_error(&e.to_string())),
                                    stream_id,
                                ));
                                let _ = tx.send((StreamMessage::End, stream_id));
                                return;
                            }
                        }
                    }

                    let _ = tx.send((StreamMessage::End, stream_id));
                }
                Err(e) => {
                    tracing::error!("streamGenerateContent send failed: {e}");
                    let _ = tx.send((
                        StreamMessage::Error(format_api_error(&e.to_string())),
                        stream_id,
                    ));
                    let _ = tx.send((StreamMessage::End, stream_id));
                }
            }
        });
    }
}
