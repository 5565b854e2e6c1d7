//! Web server module
//!
//! Serves the letter archive as server-rendered pages plus a small JSON API,
//! optionally mounted under a base path.

pub mod http;
pub mod pages;

use anyhow::{Context, Result};
use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::letters::LetterRepository;
use crate::types::Letter;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub letters: Arc<dyn LetterRepository>,
}

impl ServerState {
    pub fn new(config: Config, letters: Arc<dyn LetterRepository>) -> Self {
        Self {
            config: Arc::new(config),
            letters,
        }
    }

    /// Normalized mount prefix ("" at the root)
    pub fn base_path(&self) -> String {
        self.config.server.normalized_base_path()
    }

    /// Letters for the archive view: shuffle wins over a category filter,
    /// an empty category means all letters. `limit` caps the result and
    /// replaces the configured shuffle size.
    pub fn archive_letters(
        &self,
        category: Option<&str>,
        shuffle: bool,
        limit: Option<usize>,
    ) -> Vec<Letter> {
        if shuffle {
            return self
                .letters
                .sample_shuffled(limit.unwrap_or(self.config.letters.shuffle_limit));
        }

        let mut letters = match category.filter(|c| !c.is_empty()) {
            Some(category) => self.letters.list_by_category(category),
            None => self.letters.list_all(),
        };
        if let Some(limit) = limit {
            letters.truncate(limit);
        }
        letters
    }
}

/// Build the application router
pub fn router(state: ServerState) -> Router {
    let base_path = state.base_path();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/letters", get(http::list_letters_handler).post(http::create_letter_handler))
        .route("/api/letters/recent", get(http::recent_letters_handler))
        .route("/api/categories", get(http::categories_handler))
        .route("/api/status", get(http::status_handler))
        .layer(cors);

    let site = Router::new()
        .route("/", get(pages::home_page))
        .route("/letters", get(pages::letters_page))
        .route("/letters/", get(pages::letters_page))
        .route("/write", get(pages::write_page).post(pages::submit_letter))
        .route("/write/", get(pages::write_page).post(pages::submit_letter))
        .merge(api);

    let app = if base_path.is_empty() {
        site
    } else {
        let home = base_path.clone();
        Router::new()
            .route("/", get(move || {
                let home = home.clone();
                async move { Redirect::permanent(&home) }
            }))
            .route(&format!("{}/", base_path), get(pages::home_page))
            .nest(&base_path, site)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the web server and run until Ctrl+C / SIGTERM
pub async fn start(config: Config, letters: Arc<dyn LetterRepository>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = ServerState::new(config, letters);
    let base_path = state.base_path();
    let letter_count = state.letters.len();
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("     Dear Failure");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("✓ Letters in archive: {}", letter_count);
    println!("✓ Listening on http://{}{}", addr, pages::href(&base_path, "/"));
    println!();

    info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
