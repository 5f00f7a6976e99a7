use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashdeck::{config, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flashdeck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let flashcards_dir = config::load_flashcards_dir();
  if let Err(e) = std::fs::create_dir_all(&flashcards_dir) {
    tracing::warn!("Failed to create {}: {}", flashcards_dir.display(), e);
  }

  let app = handlers::router(AppState::new(flashcards_dir));

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::server_port());

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
