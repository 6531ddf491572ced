//! `ProjectHub` client - command line entry point
//!
//! Signs in with `PROJECTHUB_EMAIL` / `PROJECTHUB_PASSWORD`, loads the first
//! page of the owned and joined projects and, when arguments are given,
//! searches for them.

use std::sync::Arc;

use projecthub_application::session::DEFAULT_EXPIRY_BUFFER_SECS;
use projecthub_application::{
    AppEvent, AuthenticatedTransport, CollectionKind, CollectionSnapshot, EventBus,
    InMemorySessionStore, Login, Logout, PaginatedCollectionStore, SearchDebouncer,
    TokenStatus,
};
use projecthub_domain::LoginCredentials;
use projecthub_infrastructure::{ClientSettings, ReqwestHttpClient, init_telemetry};
use tokio::sync::broadcast::{self, error::RecvError};

const EMAIL_VAR: &str = "PROJECTHUB_EMAIL";
const PASSWORD_VAR: &str = "PROJECTHUB_PASSWORD";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ClientSettings::load()?;
    init_telemetry(&settings.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %settings.api.base_url,
        "starting ProjectHub client"
    );

    let http = Arc::new(ReqwestHttpClient::new(&settings.api)?);
    let session = Arc::new(InMemorySessionStore::new());
    let events = EventBus::new();
    let transport = Arc::new(AuthenticatedTransport::new(
        http,
        session.clone(),
        events.clone(),
    ));
    let store = Arc::new(PaginatedCollectionStore::new(
        transport.clone(),
        settings.collections.store_options(),
    ));
    let event_log = tokio::spawn(log_events(events.subscribe()));

    let email = std::env::var(EMAIL_VAR).map_err(|_| format!("{EMAIL_VAR} is not set"))?;
    let password = std::env::var(PASSWORD_VAR).map_err(|_| format!("{PASSWORD_VAR} is not set"))?;
    let user = Login::new(transport.clone())
        .execute(LoginCredentials::new(email, password))
        .await?;
    println!("Signed in as {} <{}>", user.full_name, user.email);
    println!(
        "Access token: {}",
        TokenStatus::of_session(session.as_ref(), DEFAULT_EXPIRY_BUFFER_SECS).display_message()
    );

    for kind in CollectionKind::ALL {
        match store.load_more(kind).await {
            Ok(_) => print_collection(kind, &store.snapshot(kind)),
            Err(error) if error.is_session_expired() => return Err(error.into()),
            Err(error) => eprintln!("{error}"),
        }
    }

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !query.trim().is_empty() {
        let debouncer = SearchDebouncer::new(store.clone(), settings.collections.search_debounce());
        debouncer.input(&query);
        debouncer.flush().await;
        if !session.is_signed_in() {
            return Err("session expired during search".into());
        }
        let results = store.search_results();
        println!("\nSearch {:?}: {} match(es)", query.trim(), results.items.len());
        for project in &results.items {
            println!("  {:<36}  {}", project.id, project.name);
        }
    }

    Logout::new(session, events).execute();
    event_log.abort();
    Ok(())
}

fn print_collection(kind: CollectionKind, snapshot: &CollectionSnapshot) {
    println!("\n{} projects ({:?}):", kind, snapshot.phase);
    for project in &snapshot.items {
        println!("  {:<36}  {:<6}  {}", project.id, project.role, project.name);
    }
    if snapshot.has_more {
        println!("  ... more available");
    }
}

async fn log_events(mut rx: broadcast::Receiver<AppEvent>) {
    loop {
        match rx.recv().await {
            Ok(AppEvent::SessionExpired) => {
                tracing::warn!("session expired, sign in again");
            }
            Ok(event) => tracing::debug!(?event, "event"),
            Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "event log lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
