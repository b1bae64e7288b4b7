//! HTTP surface — the form UI page and the JSON API behind its buttons.
//!
//! One axum router over shared [`AppState`]. Each button on the page maps to
//! one handler; handlers stay thin and delegate to the domain modules.
//! Section-level failures come back inside a 200 body (partial results over
//! total failure); only transport-level problems get error statuses.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat;
use crate::compose::{Composer, InputBundle, QueryMode, UploadedFile};
use crate::session::ChatSession;
use crate::speech::{SpeechController, SpeechState};

/// Shared state behind every handler. The session lock is a tokio mutex —
/// it is held across the completion call, which serializes chat turns the
/// way the original single-threaded UI did.
pub struct AppState {
    pub composer: Composer,
    pub session: tokio::sync::Mutex<ChatSession>,
    pub speech: SpeechController,
}

impl AppState {
    pub fn new(composer: Composer, speech: SpeechController) -> Self {
        Self {
            composer,
            session: tokio::sync::Mutex::new(ChatSession::new()),
            speech,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/compose", post(compose))
        .route("/api/chat", post(chat_turn))
        .route("/api/speech/speak", post(speech_speak))
        .route("/api/speech/pause", post(speech_pause))
        .route("/api/speech/resume", post(speech_resume))
        .with_state(state)
}

// ── Wire shapes ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TextResponse {
    response: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Deserialize)]
struct SpeakRequest {
    text: String,
}

#[derive(Serialize)]
struct SpeechReply {
    state: SpeechState,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Submit button: multipart form in, one aggregate response string out.
async fn compose(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TextResponse>, (StatusCode, String)> {
    let mut bundle = InputBundle::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "query" => bundle.query = Some(field.text().await.map_err(bad_request)?),
            "mode" => bundle.mode = QueryMode::parse(&field.text().await.map_err(bad_request)?),
            "cite_details" => {
                bundle.citation_details = Some(field.text().await.map_err(bad_request)?)
            }
            "citation_style" => {
                bundle.citation_style = field.text().await.map_err(bad_request)?
            }
            "country" => bundle.country = Some(field.text().await.map_err(bad_request)?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_request)?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    bundle.file = Some(UploadedFile { name: file_name, bytes: bytes.to_vec() });
                }
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    let mut session = state.session.lock().await;
    let response = state.composer.compose(&bundle, &mut session).await;
    Ok(Json(TextResponse { response }))
}

/// Chat button: one conversational turn against the shared session.
async fn chat_turn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<TextResponse> {
    let mut session = state.session.lock().await;
    let response = match chat::respond(
        &mut session,
        state.composer.llm(),
        &req.message,
        req.country.as_deref(),
    )
    .await
    {
        Ok(reply) => reply,
        Err(e) => format!("Error contacting the assistant: {e}"),
    };
    Json(TextResponse { response })
}

async fn speech_speak(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Json<SpeechReply> {
    Json(SpeechReply { state: state.speech.speak(&req.text) })
}

async fn speech_pause(State(state): State<Arc<AppState>>) -> Json<SpeechReply> {
    Json(SpeechReply { state: state.speech.pause() })
}

async fn speech_resume(State(state): State<Arc<AppState>>) -> Json<SpeechReply> {
    Json(SpeechReply { state: state.speech.resume() })
}

fn bad_request(e: axum::extract::multipart::MultipartError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, format!("malformed form data: {e}"))
}

// ── Page ──────────────────────────────────────────────────────────────────────

/// The whole UI: one form, one output box, four buttons.
const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Research Assistant</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #0f0f0f; color: #e0e0e0;
      max-width: 760px; margin: 0 auto; padding: 2rem 1rem;
    }
    h1 { font-size: 1.4rem; margin-bottom: 1rem; }
    label { display: block; font-size: 0.85rem; color: #999; margin: 0.8rem 0 0.25rem; }
    input[type=text], select, textarea {
      width: 100%; padding: 0.5rem; border-radius: 8px;
      border: 1px solid #333; background: #1a1a1a; color: #e0e0e0;
    }
    .row { display: flex; gap: 0.75rem; }
    .row > div { flex: 1; }
    button {
      margin: 1rem 0.5rem 0 0; padding: 0.5rem 1.2rem;
      border-radius: 8px; border: none; background: #2a2a3a; color: #c0c0e0;
      cursor: pointer; transition: background 0.15s;
    }
    button:hover { background: #3a3a5a; }
    #output {
      margin-top: 1rem; min-height: 14rem; white-space: pre-wrap;
      padding: 0.75rem; border: 1px solid #333; border-radius: 8px;
      background: #1a1a1a; font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <h1>Research Assistant</h1>

  <label for="query">Research query</label>
  <input type="text" id="query" placeholder="Enter research topic..." />

  <div class="row">
    <div>
      <label for="mode">Query mode</label>
      <select id="mode">
        <option value="search">Search articles</option>
        <option value="chat">Ask the assistant</option>
      </select>
    </div>
    <div>
      <label for="country">Filter by country</label>
      <select id="country">
        <option>All</option><option>Canada</option><option>USA</option>
        <option>UK</option><option>Australia</option><option>Germany</option>
        <option>China</option>
      </select>
    </div>
  </div>

  <div class="row">
    <div>
      <label for="cite">Cite paper (Title, Author, Year)</label>
      <input type="text" id="cite" placeholder="e.g. AI Ethics, John Doe, 2023" />
    </div>
    <div>
      <label for="style">Citation format</label>
      <select id="style">
        <option>APA</option><option>MLA</option><option>Chicago</option>
      </select>
    </div>
  </div>

  <label for="file">Upload file (PDF/TXT)</label>
  <input type="file" id="file" accept=".pdf,.txt" />

  <div>
    <button id="submit">Submit</button>
    <button id="speak">Read aloud</button>
    <button id="pause">Pause</button>
    <button id="resume">Resume</button>
  </div>

  <div id="output"></div>

  <script>
    const out = document.getElementById('output');

    document.getElementById('submit').addEventListener('click', async () => {
      const form = new FormData();
      form.append('query', document.getElementById('query').value);
      form.append('mode', document.getElementById('mode').value);
      form.append('country', document.getElementById('country').value);
      form.append('cite_details', document.getElementById('cite').value);
      form.append('citation_style', document.getElementById('style').value);
      const file = document.getElementById('file').files[0];
      if (file) form.append('file', file, file.name);

      const resp = await fetch('/api/compose', { method: 'POST', body: form });
      const data = await resp.json();
      out.textContent = data.response;
    });

    const post = (url, body) => fetch(url, {
      method: 'POST',
      headers: body ? { 'Content-Type': 'application/json' } : {},
      body: body ? JSON.stringify(body) : undefined,
    });

    document.getElementById('speak').addEventListener('click', () =>
      post('/api/speech/speak', { text: out.textContent }));
    document.getElementById('pause').addEventListener('click', () =>
      post('/api/speech/pause'));
    document.getElementById('resume').addEventListener('click', () =>
      post('/api/speech/resume'));
  </script>
</body>
</html>
"#;
