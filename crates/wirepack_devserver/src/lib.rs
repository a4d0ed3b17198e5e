mod reload;
mod watcher;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use rustc_hash::FxHashMap;
use tokio::sync::{mpsc, Mutex, RwLock};

use wirepack::{Bundler, FileSystem, OutputAsset};

pub use reload::{ReloadHub, ReloadMessage};
pub use watcher::FileWatcher;

/// Quiet window after the first change notification; everything else queued
/// in that window folds into the same rebuild.
const DEBOUNCE: Duration = Duration::from_millis(50);

const WS_ROUTE: &str = "/__wirepack_ws";

#[derive(Debug, Clone)]
pub struct DevServerConfig {
  pub host: String,
  pub port: u16,
  pub static_dir: Option<PathBuf>,
}

impl DevServerConfig {
  pub fn from_options(options: &wirepack::NormalizedBundlerOptions) -> Self {
    Self {
      host: options.host.clone(),
      port: options.port,
      static_dir: options.static_dir.as_deref().map(|dir| options.resolve_against_cwd(dir)),
    }
  }
}

/// Lifecycle of the server, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
  Idle,
  Building,
  Serving,
  Stopped,
}

#[derive(Clone)]
struct StateCell(Arc<Mutex<ServerState>>);

impl StateCell {
  fn new() -> Self {
    Self(Arc::new(Mutex::new(ServerState::Idle)))
  }

  async fn set(&self, next: ServerState) {
    let mut current = self.0.lock().await;
    tracing::debug!(from = ?*current, to = ?next, "server state");
    *current = next;
  }
}

type AssetMap = Arc<RwLock<FxHashMap<String, String>>>;

#[derive(Clone)]
struct AppState {
  /// Last successful build, keyed by filename. Swapped wholesale after a
  /// rebuild; a failed rebuild leaves it untouched.
  assets: AssetMap,
  hub: Arc<ReloadHub>,
  static_dir: Option<PathBuf>,
}

pub struct DevServer<F: FileSystem + Clone + 'static> {
  bundler: Bundler<F>,
  config: DevServerConfig,
}

impl<F: FileSystem + Clone + 'static> DevServer<F> {
  pub fn new(bundler: Bundler<F>, config: DevServerConfig) -> Self {
    Self { bundler, config }
  }

  /// Runs until ctrl-c. The initial build happens before the port is bound,
  /// so the first request ever answered already has assets behind it; bind
  /// failure is fatal.
  pub async fn serve(mut self) -> anyhow::Result<()> {
    let state = StateCell::new();

    state.set(ServerState::Building).await;
    let output = self.bundler.write()?;
    let assets: AssetMap = Arc::new(RwLock::new(to_asset_map(&output.assets)));
    for warning in &output.warnings {
      tracing::warn!("{warning}");
    }

    let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("dev server listening on http://{addr}");

    let options = Arc::clone(self.bundler.options());
    let (tx, rx) = mpsc::channel(256);
    let _watcher = FileWatcher::new(&options.cwd, options.out_dir(), tx)?;

    let hub = Arc::new(ReloadHub::new());
    tokio::spawn(rebuild_loop(
      self.bundler,
      rx,
      Arc::clone(&assets),
      Arc::clone(&hub),
      state.clone(),
    ));

    let app = Router::new()
      .route(WS_ROUTE, get(ws_handler))
      .fallback(get(serve_handler))
      .with_state(AppState { assets, hub, static_dir: self.config.static_dir.clone() });

    state.set(ServerState::Serving).await;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(state)).await?;

    Ok(())
  }
}

async fn shutdown_signal(state: StateCell) {
  let _ = tokio::signal::ctrl_c().await;
  state.set(ServerState::Stopped).await;
  tracing::info!("shutting down");
}

/// One iteration per rebuild: take the first change, drain everything else
/// queued behind it, build once. Changes arriving while the build runs sit
/// in the channel and trigger exactly one follow-up iteration.
async fn rebuild_loop<F: FileSystem + Clone>(
  mut bundler: Bundler<F>,
  mut rx: mpsc::Receiver<PathBuf>,
  assets: AssetMap,
  hub: Arc<ReloadHub>,
  state: StateCell,
) {
  while let Some(first) = rx.recv().await {
    let changed = drain_changes(&mut rx, first).await;
    state.set(ServerState::Building).await;
    tracing::info!(files = changed.len(), "change detected, rebuilding");

    match bundler.write() {
      Ok(output) => {
        *assets.write().await = to_asset_map(&output.assets);
        for warning in &output.warnings {
          tracing::warn!("{warning}");
        }
        hub.broadcast(ReloadMessage::Reload);
      }
      Err(err) => {
        // Last good build stays up; clients see the failure in the console
        tracing::error!("rebuild failed: {err}");
        hub.broadcast(ReloadMessage::BuildError { message: err.to_string() });
      }
    }

    state.set(ServerState::Serving).await;
  }
}

async fn drain_changes(rx: &mut mpsc::Receiver<PathBuf>, first: PathBuf) -> Vec<PathBuf> {
  let mut changed = vec![first];
  tokio::time::sleep(DEBOUNCE).await;
  while let Ok(path) = rx.try_recv() {
    changed.push(path);
  }
  changed
}

fn to_asset_map(assets: &[OutputAsset]) -> FxHashMap<String, String> {
  assets.iter().map(|asset| (asset.filename.clone(), asset.content.clone())).collect()
}

// axum handlers must be async even when the upgrade itself is not
#[allow(clippy::unused_async)]
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
  ws.on_upgrade(|socket| reload_socket(socket, state))
}

async fn reload_socket(socket: WebSocket, state: AppState) {
  tracing::debug!(clients = state.hub.client_count() + 1, "reload client connected");

  let (mut sender, mut receiver) = socket.split();
  let mut rx = state.hub.subscribe();

  let forward = async move {
    while let Ok(message) = rx.recv().await {
      let Ok(json) = serde_json::to_string(&message) else {
        continue;
      };
      if sender.send(Message::Text(json.into())).await.is_err() {
        break;
      }
    }
  };

  let drain = async move {
    while let Some(Ok(message)) = receiver.next().await {
      if matches!(message, Message::Close(_)) {
        break;
      }
    }
  };

  tokio::select! {
    () = forward => {},
    () = drain => {},
  }

  tracing::debug!("reload client disconnected");
}

async fn serve_handler(State(state): State<AppState>, uri: Uri) -> Response {
  let path = uri.path().trim_start_matches('/');
  let path = if path.is_empty() { "index.html" } else { path };

  if let Some(content) = state.assets.read().await.get(path) {
    return asset_response(path, content);
  }

  if let Some(dir) = &state.static_dir {
    if let Some(response) = serve_static_file(dir, path).await {
      return response;
    }
  }

  // SPA routes fall back to the rendered page
  if let Some(content) = state.assets.read().await.get("index.html") {
    return asset_response("index.html", content);
  }

  (StatusCode::NOT_FOUND, format!("Not found: /{path}")).into_response()
}

fn asset_response(path: &str, content: &str) -> Response {
  let content_type = guess_content_type(Path::new(path));

  let body = if path.ends_with(".html") {
    inject_reload_client(content)
  } else {
    content.to_string()
  };

  ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn serve_static_file(dir: &Path, path: &str) -> Option<Response> {
  if path.split('/').any(|segment| segment == "..") {
    return None;
  }

  let file_path = dir.join(path);
  let content = tokio::fs::read(&file_path).await.ok()?;
  let content_type = guess_content_type(&file_path);

  Some(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

fn guess_content_type(path: &Path) -> &'static str {
  match path.extension().and_then(|ext| ext.to_str()) {
    Some("html") => "text/html; charset=utf-8",
    Some("css") => "text/css; charset=utf-8",
    Some("js" | "mjs") => "application/javascript; charset=utf-8",
    Some("json" | "map") => "application/json; charset=utf-8",
    Some("png") => "image/png",
    Some("jpg" | "jpeg") => "image/jpeg",
    Some("gif") => "image/gif",
    Some("svg") => "image/svg+xml",
    Some("woff") => "font/woff",
    Some("woff2") => "font/woff2",
    _ => "application/octet-stream",
  }
}

/// Appended to every served HTML page, never to the artifacts on disk.
fn inject_reload_client(html: &str) -> String {
  let script = format!("<script>\n{RELOAD_CLIENT}</script>");
  if let Some(position) = html.find("</body>") {
    let mut page = String::with_capacity(html.len() + script.len() + 1);
    page.push_str(&html[..position]);
    page.push_str(&script);
    page.push('\n');
    page.push_str(&html[position..]);
    page
  } else {
    let mut page = html.to_string();
    page.push('\n');
    page.push_str(&script);
    page.push('\n');
    page
  }
}

const RELOAD_CLIENT: &str = r"(function () {
  if (typeof window === 'undefined') return;

  var protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
  var ws = new WebSocket(protocol + '//' + window.location.host + '/__wirepack_ws');

  ws.onmessage = function (event) {
    var message = JSON.parse(event.data);
    if (message.type === 'reload') {
      window.location.reload();
    } else if (message.type === 'build-error') {
      console.error('[wirepack] build failed:\n' + message.message);
    }
  };

  ws.onclose = function () {
    setTimeout(function () { window.location.reload(); }, 1000);
  };
})();
";

#[cfg(test)]
mod tests {
  use super::*;

  use wirepack::{BundlerOptions, MemoryFileSystem};

  #[tokio::test(start_paused = true)]
  async fn failed_rebuild_keeps_last_good_assets() {
    let fs = MemoryFileSystem::new([("/app/src/index.js", "module.exports = 1;")]);
    let options = BundlerOptions { cwd: Some("/app".into()), ..BundlerOptions::default() };
    let mut bundler = Bundler::with_file_system(options, fs.clone()).unwrap();

    let output = bundler.write().unwrap();
    let assets: AssetMap = Arc::new(RwLock::new(to_asset_map(&output.assets)));
    let good = assets.read().await.clone();
    assert!(good.contains_key("main.js"));

    // Break the next build, then announce the change
    fs.add_file(Path::new("/app/src/index.js"), b"require('./missing');");
    let (tx, rx) = mpsc::channel(256);
    tx.send(PathBuf::from("src/index.js")).await.unwrap();
    drop(tx);

    let hub = Arc::new(ReloadHub::new());
    let mut messages = hub.subscribe();

    rebuild_loop(bundler, rx, Arc::clone(&assets), Arc::clone(&hub), StateCell::new()).await;

    // Prior artifacts stay served; clients are told why the rebuild failed
    assert_eq!(*assets.read().await, good);
    let message = messages.recv().await.unwrap();
    assert!(matches!(message, ReloadMessage::BuildError { .. }));
  }

  #[tokio::test(start_paused = true)]
  async fn queued_changes_coalesce_into_one_rebuild() {
    let (tx, mut rx) = mpsc::channel(256);

    // Three notifications land while a build is in flight
    tx.send(PathBuf::from("src/a.js")).await.unwrap();
    tx.send(PathBuf::from("src/b.js")).await.unwrap();
    tx.send(PathBuf::from("src/a.js")).await.unwrap();

    let first = rx.recv().await.unwrap();
    let changed = drain_changes(&mut rx, first).await;

    assert_eq!(changed.len(), 3);
    // Nothing left to trigger a second rebuild
    assert!(rx.try_recv().is_err());
  }

  #[test]
  fn reload_client_lands_before_body_close() {
    let page = inject_reload_client("<html><body><p>hi</p></body></html>");
    let script_at = page.find("<script>").unwrap();
    assert!(script_at < page.find("</body>").unwrap());
    assert!(page.contains("__wirepack_ws"));
  }

  #[test]
  fn static_lookup_rejects_parent_traversal() {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let response =
      runtime.block_on(serve_static_file(Path::new("/tmp"), "../etc/passwd"));
    assert!(response.is_none());
  }

  #[test]
  fn content_types_cover_the_emitted_assets() {
    assert_eq!(guess_content_type(Path::new("main.js")), "application/javascript; charset=utf-8");
    assert_eq!(guess_content_type(Path::new("index.html")), "text/html; charset=utf-8");
    assert_eq!(guess_content_type(Path::new("logo.bin")), "application/octet-stream");
  }
}
