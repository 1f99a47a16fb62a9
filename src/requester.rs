use crate::error::{RequestError, RequestResult};
use crate::models::{AnalysisResult, Severity};
use crate::notifier::Notifier;
use crate::ui::TriggerControl;
use crate::upload::SelectedFile;
use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Nom du champ multipart transportant le fichier
pub const FILE_FIELD: &str = "file";

pub const READY_LABEL: &str = "Analyze Traffic";
pub const BUSY_LABEL: &str = "Analyzing...";
pub const PENDING_MESSAGE: &str = "Analyzing Network Traffic... (Please Wait)";
pub const CONNECTION_FAILURE_MESSAGE: &str = "Server Error. Check connection.";
pub const SUCCESS_MESSAGE: &str = "Analysis complete";

/// Accès au service d'analyse
#[async_trait]
pub trait PredictTransport: Send + Sync {
    /// Envoie une requête d'analyse ; `None` demande le jeu de données du serveur
    async fn predict(&self, file: Option<&SelectedFile>) -> RequestResult<AnalysisResult>;
}

/// Client HTTP du point d'entrée `/predict`
pub struct HttpTransport {
    http_client: Client,
    predict_url: String,
}

impl HttpTransport {
    pub fn new(predict_url: impl Into<String>, timeout: Duration) -> Self {
        // Créer un client HTTP avec un timeout raisonnable
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zdashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client: client,
            predict_url: predict_url.into(),
        }
    }

    /// Corps multipart : toujours un champ `file`, vide si aucun fichier n'est choisi
    fn build_form(file: Option<&SelectedFile>) -> RequestResult<Form> {
        let part = match file {
            Some(file) => Part::bytes(file.content.clone()).file_name(file.name.clone()),
            None => Part::bytes(Vec::new()).file_name(String::new()),
        };
        let part = part.mime_str("application/octet-stream")?;

        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[async_trait]
impl PredictTransport for HttpTransport {
    async fn predict(&self, file: Option<&SelectedFile>) -> RequestResult<AnalysisResult> {
        let form = Self::build_form(file)?;

        let response = self
            .http_client
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await?;

        // Le corps est interprété quel que soit le code HTTP : le service signale
        // ses échecs via le champ `error`
        let status = response.status();
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|source| RequestError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}

/// Issue d'un cycle d'analyse
#[derive(Debug)]
pub enum CycleOutcome {
    /// Analyse réussie, résultat à afficher
    Success(AnalysisResult),
    /// Le service a répondu avec un message d'erreur
    Rejected(String),
    /// La requête n'a pas abouti
    Failed(RequestError),
    /// Une analyse est déjà en cours
    Busy,
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Success(_))
    }
}

/// Remet le bouton dans son état prêt, une seule fois, quelle que soit l'issue
struct TriggerGuard<'a> {
    trigger: Option<&'a Arc<dyn TriggerControl>>,
    in_flight: &'a AtomicBool,
}

impl<'a> TriggerGuard<'a> {
    fn engage(trigger: Option<&'a Arc<dyn TriggerControl>>, in_flight: &'a AtomicBool) -> Self {
        if let Some(trigger) = trigger {
            trigger.set_enabled(false);
            trigger.set_label(BUSY_LABEL);
        }
        Self { trigger, in_flight }
    }
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        if let Some(trigger) = self.trigger {
            trigger.set_enabled(true);
            trigger.set_label(READY_LABEL);
        }
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

pub struct AnalysisRequester {
    transport: Arc<dyn PredictTransport>,
    trigger: Option<Arc<dyn TriggerControl>>,
    notifier: Notifier,
    in_flight: AtomicBool,
}

impl AnalysisRequester {
    pub fn new(
        transport: Arc<dyn PredictTransport>,
        trigger: Option<Arc<dyn TriggerControl>>,
        notifier: Notifier,
    ) -> Self {
        if let Some(trigger) = &trigger {
            trigger.set_enabled(true);
            trigger.set_label(READY_LABEL);
        }

        Self {
            transport,
            trigger,
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Lance un cycle d'analyse : une requête, une issue
    pub async fn run(&self, file: Option<&SelectedFile>) -> CycleOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!("Analyse déjà en cours, demande ignorée");
            return CycleOutcome::Busy;
        }

        let guard = TriggerGuard::engage(self.trigger.as_ref(), &self.in_flight);
        self.notifier.hold(PENDING_MESSAGE);

        match file {
            Some(file) => info!("Envoi de {} ({} octets) pour analyse", file.name, file.content.len()),
            None => info!("Aucun fichier choisi, analyse du jeu de données du serveur"),
        }

        let response = self.transport.predict(file).await;
        drop(guard);

        match response {
            Err(e) => {
                error!("Requête d'analyse impossible: {}", e);
                self.notifier.notify(Severity::Error, CONNECTION_FAILURE_MESSAGE);
                CycleOutcome::Failed(e)
            }
            Ok(result) => match result.failure_message() {
                Some(message) => {
                    self.notifier.notify(Severity::Error, &message);
                    CycleOutcome::Rejected(message)
                }
                None => {
                    self.notifier.notify(Severity::Success, SUCCESS_MESSAGE);
                    CycleOutcome::Success(result)
                }
            },
        }
    }
}

/// Téléchargement du jeu de données d'exemple du serveur
pub struct SampleDownloader {
    http_client: Client,
    sample_url: String,
}

impl SampleDownloader {
    pub fn new(sample_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client: client,
            sample_url: sample_url.into(),
        }
    }

    /// Écrit le jeu de données dans `dest` et renvoie sa taille en octets
    pub async fn download(&self, dest: &Path) -> RequestResult<usize> {
        info!("Téléchargement du jeu de données depuis {}", self.sample_url);

        let response = self.http_client.get(&self.sample_url).send().await?;
        if !response.status().is_success() {
            warn!("Jeu de données introuvable (HTTP {})", response.status());
            return Err(RequestError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        tokio::fs::write(dest, &body).await?;

        info!("Jeu de données enregistré dans {} ({} octets)", dest.display(), body.len());
        Ok(body.len())
    }
}
