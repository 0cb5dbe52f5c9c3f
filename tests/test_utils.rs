#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use contact_backend::{
    entities::contact_me::ContactNotification,
    errors::NotifyError,
    limiter::clock::ManualClock,
    repositories::{memory::InMemorySubmissionRepo, notifier::ContactNotifier},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

/// Notifier that counts calls and can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, _notification: &ContactNotification) -> Result<String, NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(NotifyError::Transport("mail relay unreachable".into()))
        } else {
            Ok("recorded".into())
        }
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub store: InMemorySubmissionRepo,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: ManualClock,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(RecordingNotifier::default()).await
    }

    pub async fn spawn_with(notifier: RecordingNotifier) -> Self {
        let config = test_config();
        let store = InMemorySubmissionRepo::new();
        let notifier = Arc::new(notifier);
        let clock = ManualClock::default();

        let state = web::Data::new(AppState::new(
            &config,
            Arc::new(store.clone()),
            notifier.clone(),
            Arc::new(clock.clone()),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(server_state.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .disable_signals()
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            store,
            notifier,
            clock,
        }
    }

    pub async fn submit_from(&self, client_ip: &str, form: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/contact", self.address))
            .header("x-forwarded-for", client_ip)
            .header("user-agent", "integration-tests")
            .json(form)
            .send()
            .await
            .expect("Failed to submit contact form")
    }

    pub async fn stats(&self) -> Value {
        self.client
            .get(format!("{}/api/contact/stats", self.address))
            .send()
            .await
            .expect("Failed to fetch stats")
            .json()
            .await
            .expect("Stats response was not JSON")
    }

    pub fn notifications_sent(&self) -> usize {
        self.notifier.calls.load(Ordering::SeqCst)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Contact Backend Test".to_string(),
        port: 0,
        worker_count: 1,
        trust_x_forwarded_for: true,
        rate_limit_max_requests: 5,
        rate_limit_window_minutes: 15,
        notify_timeout_secs: 2,
        ..AppConfig::default()
    }
}

pub fn valid_form() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "Hello! I would like to know more about your plans."
    })
}
