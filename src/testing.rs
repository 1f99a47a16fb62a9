//! Doublures de test enregistrant chaque appel (affichage et transport)

use crate::error::{RequestError, RequestResult};
use crate::models::{AnalysisResult, Severity};
use crate::requester::PredictTransport;
use crate::ui::{
    ChartInstance, ChartSpec, ChartSurface, Emphasis, IncidentTable, SectionToggle, StatusRegion,
    TableRow, TextSlot, TriggerControl, UiHandles,
};
use crate::upload::SelectedFile;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingTrigger {
    pub events: Mutex<Vec<String>>,
}

impl RecordingTrigger {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Nombre de fois où le bouton a été réactivé
    pub fn enable_count(&self) -> usize {
        self.events().iter().filter(|e| *e == "enabled").count()
    }
}

impl TriggerControl for RecordingTrigger {
    fn set_enabled(&self, enabled: bool) {
        let event = if enabled { "enabled" } else { "disabled" };
        self.events.lock().unwrap().push(event.to_string());
    }

    fn set_label(&self, label: &str) {
        self.events.lock().unwrap().push(format!("label:{}", label));
    }
}

#[derive(Default)]
pub struct RecordingText {
    pub history: Mutex<Vec<String>>,
    pub emphasis: Mutex<Option<Emphasis>>,
}

impl RecordingText {
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history().last().cloned()
    }
}

impl TextSlot for RecordingText {
    fn set_text(&self, text: &str) {
        self.history.lock().unwrap().push(text.to_string());
    }

    fn set_emphasis(&self, emphasis: Emphasis) {
        *self.emphasis.lock().unwrap() = Some(emphasis);
    }
}

#[derive(Default)]
pub struct RecordingStatus {
    pub current: Mutex<Option<(Severity, String)>>,
    pub shown: Mutex<Vec<(Severity, String)>>,
}

impl RecordingStatus {
    pub fn current(&self) -> Option<(Severity, String)> {
        self.current.lock().unwrap().clone()
    }

    pub fn shown(&self) -> Vec<(Severity, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl StatusRegion for RecordingStatus {
    fn show(&self, severity: Severity, message: &str) {
        *self.current.lock().unwrap() = Some((severity, message.to_string()));
        self.shown.lock().unwrap().push((severity, message.to_string()));
    }

    fn hide(&self) {
        *self.current.lock().unwrap() = None;
    }
}

/// Surface de courbe qui compte les instances vivantes
#[derive(Default)]
pub struct RecordingChart {
    pub created: Mutex<Vec<ChartSpec>>,
    pub live: Arc<AtomicUsize>,
    pub destroyed: Arc<AtomicUsize>,
}

impl RecordingChart {
    pub fn created(&self) -> Vec<ChartSpec> {
        self.created.lock().unwrap().clone()
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }
}

struct RecordedInstance {
    live: Arc<AtomicUsize>,
    destroyed: Arc<AtomicUsize>,
}

impl ChartInstance for RecordedInstance {
    fn destroy(self: Box<Self>) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

impl ChartSurface for RecordingChart {
    fn create_chart(&self, spec: ChartSpec) -> Box<dyn ChartInstance> {
        // Une seule instance vivante à la fois
        assert_eq!(self.live.load(Ordering::SeqCst), 0, "courbe précédente non détruite");
        self.live.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(spec);
        Box::new(RecordedInstance {
            live: Arc::clone(&self.live),
            destroyed: Arc::clone(&self.destroyed),
        })
    }
}

#[derive(Default)]
pub struct RecordingTable {
    pub rows: Mutex<Vec<TableRow>>,
    pub clears: AtomicUsize,
}

impl RecordingTable {
    pub fn rows(&self) -> Vec<TableRow> {
        self.rows.lock().unwrap().clone()
    }
}

impl IncidentTable for RecordingTable {
    fn clear_rows(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().clear();
    }

    fn push_row(&self, row: TableRow) {
        self.rows.lock().unwrap().push(row);
    }
}

#[derive(Default)]
pub struct RecordingSection {
    pub reveals: AtomicUsize,
}

impl RecordingSection {
    pub fn revealed(&self) -> bool {
        self.reveals.load(Ordering::SeqCst) > 0
    }
}

impl SectionToggle for RecordingSection {
    fn reveal(&self) {
        self.reveals.fetch_add(1, Ordering::SeqCst);
    }
}

/// Jeu complet de doublures, avec les poignées correspondantes
#[derive(Default)]
pub struct RecordingUi {
    pub trigger: Arc<RecordingTrigger>,
    pub file_label: Arc<RecordingText>,
    pub total: Arc<RecordingText>,
    pub normal: Arc<RecordingText>,
    pub attack: Arc<RecordingText>,
    pub status: Arc<RecordingStatus>,
    pub chart: Arc<RecordingChart>,
    pub table: Arc<RecordingTable>,
    pub stats_section: Arc<RecordingSection>,
    pub graph_section: Arc<RecordingSection>,
    pub table_section: Arc<RecordingSection>,
}

impl RecordingUi {
    pub fn handles(&self) -> UiHandles {
        UiHandles {
            trigger: Some(self.trigger.clone()),
            file_label: Some(self.file_label.clone()),
            total_counter: Some(self.total.clone()),
            normal_counter: Some(self.normal.clone()),
            attack_counter: Some(self.attack.clone()),
            status: Some(self.status.clone()),
            chart: Some(self.chart.clone()),
            table: Some(self.table.clone()),
            stats_section: Some(self.stats_section.clone()),
            graph_section: Some(self.graph_section.clone()),
            table_section: Some(self.table_section.clone()),
        }
    }
}

/// Réponse préparée à l'avance pour `ScriptedTransport`
#[derive(Clone)]
pub enum Scripted {
    Body(&'static str),
    Unreachable,
}

/// Transport renvoyant des réponses scriptées, la dernière étant répétée
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    received: Mutex<Vec<Option<String>>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Noms des fichiers reçus, `None` pour une requête sans fichier
    pub fn received(&self) -> Vec<Option<String>> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictTransport for ScriptedTransport {
    async fn predict(&self, file: Option<&SelectedFile>) -> RequestResult<AnalysisResult> {
        self.received.lock().unwrap().push(file.map(|f| f.name.clone()));

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            }
        };

        match reply.unwrap_or(Scripted::Unreachable) {
            Scripted::Body(body) => serde_json::from_str(body)
                .map_err(|source| RequestError::Decode { status: 200, source }),
            Scripted::Unreachable => Err(RequestError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connexion refusée",
            ))),
        }
    }
}
