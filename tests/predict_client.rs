use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zdashboard::config::{Config, Layout};
use zdashboard::models::Severity;
use zdashboard::presenter::{INCIDENT_STATUS, NO_INCIDENTS_TEXT};
use zdashboard::requester::{CycleOutcome, SampleDownloader};
use zdashboard::ui::TableRow;
use zdashboard::upload::SelectedFile;
use zdashboard::{DashboardService, RequestError, TerminalDashboard};

const ANALYSIS_BODY: &str = r#"{
    "total_packets": 1234,
    "normal_count": 1100,
    "attack_count": 134,
    "trends": {"labels": ["0:00", "1:00", "2:00"], "attack": [40, 50, 44], "normal": [400, 350, 350]},
    "detected_incidents": [
        {"id": 17, "protocol_type": "tcp", "service": "private", "src_bytes": 0, "dst_bytes": 0, "flag": "S0"},
        {"id": 23, "protocol_type": "udp", "service": "domain_u", "src_bytes": 45, "dst_bytes": 0, "flag": "SF"}
    ]
}"#;

/// Champ multipart reçu : (nom, nom de fichier, taille)
type ReceivedField = (String, String, usize);

#[derive(Clone)]
struct MockBackend {
    reply: Arc<Mutex<(StatusCode, &'static str)>>,
    fields: Arc<Mutex<Vec<ReceivedField>>>,
    sample: Option<&'static str>,
}

impl MockBackend {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            reply: Arc::new(Mutex::new((status, body))),
            fields: Arc::new(Mutex::new(Vec::new())),
            sample: None,
        }
    }

    fn fields(&self) -> Vec<ReceivedField> {
        self.fields.lock().unwrap().clone()
    }
}

async fn predict(State(backend): State<MockBackend>, mut multipart: Multipart) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().unwrap_or("").to_string();
        let size = field.bytes().await.map(|data| data.len()).unwrap_or(0);
        backend.fields.lock().unwrap().push((name, file_name, size));
    }

    let (status, body) = *backend.reply.lock().unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn download_sample(State(backend): State<MockBackend>) -> impl IntoResponse {
    match backend.sample {
        Some(csv) => (StatusCode::OK, csv),
        None => (StatusCode::NOT_FOUND, "Sample not found. Run setup_dataset.py first."),
    }
}

async fn spawn_backend(backend: MockBackend) -> String {
    let app = Router::new()
        .route("/predict", post(predict))
        .route("/download_sample", get(download_sample))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn config_for(server_url: String) -> Config {
    let mut config = Config::default();
    config.server_url = server_url;
    config.counter_duration_ms = 40;
    config.frame_interval_ms = 5;
    config.request_timeout_secs = 5;
    config.layout = Layout::Full;
    config
}

#[tokio::test]
async fn test_uploaded_file_is_analyzed_and_rendered() {
    let backend = MockBackend::new(StatusCode::OK, ANALYSIS_BODY);
    let config = config_for(spawn_backend(backend.clone()).await);

    let dashboard = TerminalDashboard::new();
    let mut service = DashboardService::from_config(dashboard.bind(config.layout.sections()), &config);
    service
        .upload()
        .select_files(vec![SelectedFile::new("capture.csv", b"duration,protocol_type\n0,tcp\n".to_vec())]);

    let outcome = service.analyze().await;
    service.settle().await;

    assert!(outcome.is_success());
    assert_eq!(backend.fields(), vec![("file".to_string(), "capture.csv".to_string(), 29)]);

    let screen = dashboard.snapshot();
    assert_eq!(screen.counters, ["1,234".to_string(), "1,100".to_string(), "134".to_string()]);
    assert!(screen.visible.stats && screen.visible.graph && screen.visible.table);
    assert!(screen.trigger_enabled);
    assert_eq!(screen.rows.len(), 2);
    for row in &screen.rows {
        assert!(matches!(row, TableRow::Cells(cells) if cells.last().map(String::as_str) == Some(INCIDENT_STATUS)));
    }

    let (_, chart) = screen.chart.expect("courbe absente");
    assert_eq!(chart.labels.len(), 3);
    assert_eq!(chart.series.len(), 2);
    assert_eq!(screen.status.map(|(severity, _)| severity), Some(Severity::Success));
}

#[tokio::test]
async fn test_no_file_sends_empty_file_field() {
    let backend = MockBackend::new(
        StatusCode::OK,
        r#"{"total_packets": 0, "normal_count": 0, "attack_count": 0, "detected_incidents": []}"#,
    );
    let config = config_for(spawn_backend(backend.clone()).await);

    let dashboard = TerminalDashboard::new();
    let mut service = DashboardService::from_config(dashboard.bind(config.layout.sections()), &config);

    assert!(service.analyze().await.is_success());
    service.settle().await;

    assert_eq!(backend.fields(), vec![("file".to_string(), String::new(), 0)]);

    let screen = dashboard.snapshot();
    assert_eq!(
        screen.rows,
        vec![TableRow::Placeholder { text: NO_INCIDENTS_TEXT.to_string(), span: 7 }]
    );
    // Pas de tendances dans la réponse : pas de courbe, sans erreur
    assert!(screen.chart.is_none());
}

#[tokio::test]
async fn test_error_payload_is_reported_without_rendering() {
    let backend = MockBackend::new(
        StatusCode::BAD_REQUEST,
        r#"{"error": "Invalid CSV. Missing: ['flag']"}"#,
    );
    let config = config_for(spawn_backend(backend).await);

    let dashboard = TerminalDashboard::new();
    let mut service = DashboardService::from_config(dashboard.bind(config.layout.sections()), &config);

    let outcome = service.analyze().await;
    service.settle().await;

    assert!(matches!(outcome, CycleOutcome::Rejected(ref message) if message == "Invalid CSV. Missing: ['flag']"));

    let screen = dashboard.snapshot();
    assert!(screen.trigger_enabled);
    assert!(!screen.visible.stats && !screen.visible.graph && !screen.visible.table);
    assert!(screen.counters.iter().all(String::is_empty));
    assert_eq!(
        screen.status,
        Some((Severity::Error, "Invalid CSV. Missing: ['flag']".to_string()))
    );
}

#[tokio::test]
async fn test_non_json_body_is_a_failure() {
    let backend = MockBackend::new(StatusCode::INTERNAL_SERVER_ERROR, "<h1>Internal Server Error</h1>");
    let config = config_for(spawn_backend(backend).await);

    let dashboard = TerminalDashboard::new();
    let mut service = DashboardService::from_config(dashboard.bind(config.layout.sections()), &config);

    let outcome = service.analyze().await;
    assert!(matches!(outcome, CycleOutcome::Failed(RequestError::Decode { status: 500, .. })));
    assert!(dashboard.snapshot().trigger_enabled);
}

#[tokio::test]
async fn test_unreachable_server_restores_trigger() {
    // Réserver un port puis le libérer : plus personne n'écoute
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config_for(format!("http://{}", addr));
    let dashboard = TerminalDashboard::new();
    let mut service = DashboardService::from_config(dashboard.bind(config.layout.sections()), &config);

    let outcome = service.analyze().await;
    assert!(matches!(outcome, CycleOutcome::Failed(RequestError::Transport(_))));

    let screen = dashboard.snapshot();
    assert!(screen.trigger_enabled);
    assert_eq!(screen.trigger_label, "Analyze Traffic");
    assert_eq!(screen.status.map(|(severity, _)| severity), Some(Severity::Error));
    assert!(!screen.visible.stats);
}

#[tokio::test]
async fn test_sample_download() {
    let mut backend = MockBackend::new(StatusCode::OK, "{}");
    backend.sample = Some("duration,protocol_type,service,src_bytes,dst_bytes,flag\n0,tcp,http,181,5450,SF\n");
    let config = config_for(spawn_backend(backend).await);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("traffic_data.csv");

    let downloader = SampleDownloader::new(config.sample_url(), Duration::from_secs(5));
    let size = downloader.download(&dest).await.unwrap();

    let content = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(size, content.len());
    assert!(content.starts_with("duration,protocol_type"));
}

#[tokio::test]
async fn test_missing_sample_is_an_error() {
    let config = config_for(spawn_backend(MockBackend::new(StatusCode::OK, "{}")).await);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("traffic_data.csv");

    let downloader = SampleDownloader::new(config.sample_url(), Duration::from_secs(5));
    let result = downloader.download(&dest).await;

    assert!(matches!(result, Err(RequestError::Status(404))));
    assert!(!dest.exists());
}
