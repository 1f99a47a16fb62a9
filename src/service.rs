use crate::animation::{resolve_locale, FrameSource, TokioFrames};
use crate::config::Config;
use crate::logger::AnalysisJournal;
use crate::notifier::Notifier;
use crate::presenter::ResultPresenter;
use crate::requester::{AnalysisRequester, CycleOutcome, HttpTransport, PredictTransport};
use crate::ui::UiHandles;
use crate::upload::UploadController;
use std::sync::Arc;

/// Tableau de bord complet : sélection, requête, rendu et messages
pub struct DashboardService {
    upload: UploadController,
    requester: AnalysisRequester,
    presenter: ResultPresenter,
    journal: Option<Arc<AnalysisJournal>>,
}

impl DashboardService {
    pub fn new(
        ui: UiHandles,
        config: &Config,
        transport: Arc<dyn PredictTransport>,
        frames: Arc<dyn FrameSource>,
    ) -> Self {
        let notifier = Notifier::new(ui.status.clone(), config.toast_duration());
        let upload = UploadController::new(ui.file_label.clone());
        let requester = AnalysisRequester::new(transport, ui.trigger.clone(), notifier);
        let presenter = ResultPresenter::new(
            ui,
            config.layout.sections(),
            frames,
            config.counter_duration(),
            resolve_locale(&config.locale),
        );

        Self {
            upload,
            requester,
            presenter,
            journal: None,
        }
    }

    /// Service branché sur le vrai serveur d'analyse
    pub fn from_config(ui: UiHandles, config: &Config) -> Self {
        let transport = HttpTransport::new(config.predict_url(), config.request_timeout());
        let frames = TokioFrames::new(config.frame_interval());
        Self::new(ui, config, Arc::new(transport), Arc::new(frames))
    }

    pub fn with_journal(mut self, journal: Arc<AnalysisJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn upload(&mut self) -> &mut UploadController {
        &mut self.upload
    }

    pub fn is_busy(&self) -> bool {
        self.requester.is_busy()
    }

    /// Un cycle complet : requête puis rendu si l'analyse a réussi
    pub async fn analyze(&mut self) -> CycleOutcome {
        let selected = self.upload.selected();
        let outcome = self.requester.run(selected).await;

        if let CycleOutcome::Success(result) = &outcome {
            self.presenter.present(result);
        }

        if let Some(journal) = &self.journal {
            journal.record(&outcome, selected.map(|file| file.name.as_str()));
        }

        outcome
    }

    /// Attend la fin des animations en cours
    pub async fn settle(&mut self) {
        self.presenter.settle().await;
    }
}
