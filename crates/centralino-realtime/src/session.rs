use crate::config::SessionConfig;
use crate::error::RealtimeError;
use crate::events::{parse_server_event, ServerEvent};
use crate::tools::ToolRegistry;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

/// Default capacity for the per-session event broadcast channel.
const DEFAULT_EVENT_BROADCAST_CAPACITY: usize = 256;

/// Default capacity for the command channel feeding the session loop.
const DEFAULT_COMMAND_CAPACITY: usize = 64;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Event emitted by a running session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A chunk of model speech (PCM bytes) to publish into the room.
    AssistantAudio(Vec<u8>),
    /// Completed transcript of a model turn.
    AssistantTranscript(String),
    /// Completed transcript of a caller turn.
    CallerTranscript(String),
    SpeechStarted,
    SpeechStopped,
    /// A tool finished; the output has already been returned to the model.
    ToolCompleted { name: String },
    Error(String),
    Closed,
}

enum Command {
    AppendAudio(Vec<u8>),
    CreateResponse,
    Close,
}

/// Command-side handle to a running [`RealtimeSession`].
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Streams a chunk of caller PCM audio into the model's input buffer.
    pub async fn append_audio(&self, pcm: Vec<u8>) -> Result<(), RealtimeError> {
        self.cmd_tx
            .send(Command::AppendAudio(pcm))
            .await
            .map_err(|_| RealtimeError::ChannelClosed)
    }

    /// Asks the model to produce a response now. Used once after session
    /// start so the agent greets the caller without waiting for speech.
    pub async fn create_response(&self) -> Result<(), RealtimeError> {
        self.cmd_tx
            .send(Command::CreateResponse)
            .await
            .map_err(|_| RealtimeError::ChannelClosed)
    }

    /// Closes the session from the agent side.
    pub async fn close(&self) -> Result<(), RealtimeError> {
        self.cmd_tx
            .send(Command::Close)
            .await
            .map_err(|_| RealtimeError::ChannelClosed)
    }

    /// Subscribes to events from this session.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }
}

/// A live websocket session with the speech-to-speech model.
pub struct RealtimeSession {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    registry: ToolRegistry,
    event_tx: broadcast::Sender<SessionEvent>,
    cmd_rx: mpsc::Receiver<Command>,
}

impl RealtimeSession {
    /// Connects to the provider, pushes the session configuration, and
    /// returns the session plus its command handle.
    pub async fn connect(
        config: &SessionConfig,
        api_key: &str,
        registry: ToolRegistry,
    ) -> Result<(Self, SessionHandle), RealtimeError> {
        let endpoint = config.endpoint_url();
        info!(endpoint = %endpoint, model = %config.model, "connecting realtime session");

        let mut request = endpoint
            .as_str()
            .into_client_request()
            .map_err(|e| RealtimeError::Handshake(format!("bad endpoint {endpoint}: {e}")))?;

        let bearer = format!("Bearer {api_key}");
        let headers = request.headers_mut();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| RealtimeError::Handshake(format!("invalid api key header: {e}")))?,
        );
        headers.insert("OpenAI-Beta", HeaderValue::from_static("realtime=v1"));

        let (mut ws, _response) = connect_async(request).await?;
        debug!("realtime websocket connected");

        let update = config.session_update(&registry);
        ws.send(Message::Text(update.to_string().into())).await?;
        debug!(tools = registry.len(), "sent session.update");

        let (event_tx, _) = broadcast::channel(DEFAULT_EVENT_BROADCAST_CAPACITY);
        let (cmd_tx, cmd_rx) = mpsc::channel(DEFAULT_COMMAND_CAPACITY);

        let handle = SessionHandle {
            cmd_tx,
            event_tx: event_tx.clone(),
        };

        Ok((
            Self {
                ws,
                registry,
                event_tx,
                cmd_rx,
            },
            handle,
        ))
    }

    /// Drives the session until the server closes the socket or the handle
    /// sends [`SessionHandle::close`].
    pub async fn run(self) -> Result<(), RealtimeError> {
        let RealtimeSession {
            ws,
            registry,
            event_tx,
            mut cmd_rx,
        } = self;
        let (mut ws_tx, mut ws_rx) = ws.split();
        let mut assistant_transcript = String::new();

        loop {
            tokio::select! {
                command = cmd_rx.recv() => {
                    match command {
                        Some(Command::AppendAudio(pcm)) => {
                            let event = json!({
                                "type": "input_audio_buffer.append",
                                "audio": B64.encode(&pcm),
                            });
                            send_json(&mut ws_tx, &event).await?;
                        }
                        Some(Command::CreateResponse) => {
                            send_json(&mut ws_tx, &json!({"type": "response.create"})).await?;
                        }
                        Some(Command::Close) | None => {
                            let _ = ws_tx.close().await;
                            let _ = event_tx.send(SessionEvent::Closed);
                            return Ok(());
                        }
                    }
                }
                frame = ws_rx.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            handle_server_text(
                                text.as_str(),
                                &mut ws_tx,
                                &registry,
                                &event_tx,
                                &mut assistant_transcript,
                            )
                            .await?;
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("realtime session closed by server");
                            let _ = event_tx.send(SessionEvent::Closed);
                            return Ok(());
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            let _ = event_tx.send(SessionEvent::Closed);
                            return Err(RealtimeError::WebSocket(e));
                        }
                    }
                }
            }
        }
    }
}

async fn handle_server_text(
    text: &str,
    ws_tx: &mut WsSink,
    registry: &ToolRegistry,
    event_tx: &broadcast::Sender<SessionEvent>,
    assistant_transcript: &mut String,
) -> Result<(), RealtimeError> {
    let event = match parse_server_event(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "undecodable server event");
            return Ok(());
        }
    };

    match event {
        ServerEvent::SessionCreated => debug!("session created"),
        ServerEvent::SessionUpdated => debug!("session configuration acknowledged"),
        ServerEvent::AudioDelta(pcm) => {
            let _ = event_tx.send(SessionEvent::AssistantAudio(pcm));
        }
        ServerEvent::AssistantTranscriptDelta(delta) => {
            assistant_transcript.push_str(&delta);
        }
        ServerEvent::CallerTranscript(text) => {
            let _ = event_tx.send(SessionEvent::CallerTranscript(text));
        }
        ServerEvent::SpeechStarted => {
            let _ = event_tx.send(SessionEvent::SpeechStarted);
        }
        ServerEvent::SpeechStopped => {
            let _ = event_tx.send(SessionEvent::SpeechStopped);
        }
        ServerEvent::FunctionCall {
            name,
            call_id,
            arguments,
        } => {
            handle_function_call(&name, &call_id, arguments, ws_tx, registry, event_tx).await?;
        }
        ServerEvent::ResponseDone => {
            if !assistant_transcript.is_empty() {
                let transcript = std::mem::take(assistant_transcript);
                let _ = event_tx.send(SessionEvent::AssistantTranscript(transcript));
            }
        }
        ServerEvent::Error(message) => {
            warn!(error = %message, "realtime session error event");
            let _ = event_tx.send(SessionEvent::Error(message));
        }
        ServerEvent::Other(kind) => trace!(kind = %kind, "ignored server event"),
    }

    Ok(())
}

/// Runs a model-invoked tool and returns its output to the conversation.
///
/// Handler failures are reported back to the model as an error-shaped output
/// rather than tearing down the session.
async fn handle_function_call(
    name: &str,
    call_id: &str,
    arguments: Value,
    ws_tx: &mut WsSink,
    registry: &ToolRegistry,
    event_tx: &broadcast::Sender<SessionEvent>,
) -> Result<(), RealtimeError> {
    info!(tool = name, call_id, "model invoked tool");

    let output = match registry.dispatch(name, arguments).await {
        Ok(value) => value,
        Err(e) => {
            warn!(tool = name, error = %e, "tool invocation failed");
            json!({"error": e.to_string()})
        }
    };

    for reply in function_call_reply(call_id, &output) {
        send_json(ws_tx, &reply).await?;
    }

    let _ = event_tx.send(SessionEvent::ToolCompleted {
        name: name.to_string(),
    });
    Ok(())
}

async fn send_json(ws_tx: &mut WsSink, payload: &Value) -> Result<(), RealtimeError> {
    ws_tx.send(Message::Text(payload.to_string().into())).await?;
    Ok(())
}

/// The two events that return a tool output to the model: the
/// `function_call_output` conversation item, then a fresh `response.create`
/// so the model speaks the result.
fn function_call_reply(call_id: &str, output: &Value) -> [Value; 2] {
    [
        json!({
            "type": "conversation.item.create",
            "item": {
                "type": "function_call_output",
                "call_id": call_id,
                "output": output.to_string(),
            }
        }),
        json!({"type": "response.create"}),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_call_reply_frames_item_then_response() {
        let output = json!({"message": "Queued. Thank you."});
        let [item, response] = function_call_reply("call_42", &output);

        assert_eq!(item["type"], "conversation.item.create");
        assert_eq!(item["item"]["type"], "function_call_output");
        assert_eq!(item["item"]["call_id"], "call_42");

        // The output travels as a JSON string, exactly as produced.
        let embedded: Value =
            serde_json::from_str(item["item"]["output"].as_str().unwrap()).unwrap();
        assert_eq!(embedded, output);

        assert_eq!(response["type"], "response.create");
    }
}
