use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use event_form::config::Config;
use event_form::form::EventDraft;
use event_form::routes::create_routes;
use event_form::state::AppState;

const DEFAULT_LOG_FILTER: &str = "event_form=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "Event form server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let categories = config.load_categories()?;

    let (submissions, mut received) = mpsc::unbounded_channel::<EventDraft>();
    tokio::spawn(async move {
        while let Some(draft) = received.recv().await {
            tracing::info!(
                title = %draft.title(),
                event_date = %draft.event_date(),
                images = draft.images().len(),
                videos = draft.video_urls().len(),
                "Event draft received"
            );
        }
    });

    let state = AppState::new(categories, config.url_policy, submissions);
    let app = create_routes(state, &config);

    tracing::info!(url_policy = config.url_policy.as_str(), "Event form ready");
    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
