//! Rendu d'un résultat d'analyse réussi
//!
//! Compteurs, courbe et tableau sont indépendants : chacun ignore sa section si
//! la donnée ou la poignée d'affichage manque.

use crate::animation::{animate_counter, FrameSource};
use crate::config::Sections;
use crate::models::{format_bytes, AnalysisResult, Incident, Trends};
use crate::ui::{
    ChartInstance, ChartSpec, CounterKind, Series, SeriesStyle, TableRow, UiHandles,
};
use futures::future::join_all;
use log::{debug, warn};
use num_format::{Locale, ToFormattedString};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Statut affiché pour chaque incident, quelle que soit la connexion
pub const INCIDENT_STATUS: &str = "INTERRUPTED";
pub const NO_INCIDENTS_TEXT: &str = "No incidents detected";
pub const TABLE_COLUMNS: [&str; 7] = [
    "ID",
    "Protocol",
    "Service",
    "Src Bytes",
    "Dst Bytes",
    "Flag",
    "Status",
];
pub const ATTACK_SERIES: &str = "Threats Detected";
pub const NORMAL_SERIES: &str = "Normal Traffic";

pub struct ResultPresenter {
    ui: UiHandles,
    sections: Sections,
    frames: Arc<dyn FrameSource>,
    counter_duration: Duration,
    locale: Locale,
    /// Seule instance de courbe vivante
    chart: Option<Box<dyn ChartInstance>>,
    animations: Vec<JoinHandle<()>>,
}

impl ResultPresenter {
    pub fn new(
        ui: UiHandles,
        sections: Sections,
        frames: Arc<dyn FrameSource>,
        counter_duration: Duration,
        locale: Locale,
    ) -> Self {
        Self {
            ui,
            sections,
            frames,
            counter_duration,
            locale,
            chart: None,
            animations: Vec::new(),
        }
    }

    /// Affiche un résultat d'analyse sans erreur
    pub fn present(&mut self, result: &AnalysisResult) {
        self.reveal_sections();

        if self.sections.stats {
            self.animate_counters(result);
        }
        if self.sections.graph {
            match &result.trends {
                Some(trends) => self.render_chart(trends),
                None => debug!("Aucune tendance dans la réponse, courbe ignorée"),
            }
        }
        if self.sections.table {
            match &result.detected_incidents {
                Some(incidents) => self.render_table(incidents),
                None => debug!("Aucun incident dans la réponse, tableau ignoré"),
            }
        }
    }

    /// Attend la fin des animations lancées par le dernier rendu
    pub async fn settle(&mut self) {
        for joined in join_all(self.animations.drain(..)).await {
            if let Err(e) = joined {
                warn!("Animation de compteur interrompue: {}", e);
            }
        }
    }

    fn reveal_sections(&self) {
        let toggles = [
            (self.sections.stats, &self.ui.stats_section),
            (self.sections.graph, &self.ui.graph_section),
            (self.sections.table, &self.ui.table_section),
        ];

        for (enabled, toggle) in toggles {
            if let (true, Some(toggle)) = (enabled, toggle) {
                toggle.reveal();
            }
        }
    }

    fn animate_counters(&mut self, result: &AnalysisResult) {
        // Les animations précédentes sont abandonnées, pas annulées
        self.animations.clear();

        let runtime = tokio::runtime::Handle::try_current().ok();

        for kind in CounterKind::ALL {
            let target = match kind {
                CounterKind::Total => result.total_packets,
                CounterKind::Normal => result.normal_count,
                CounterKind::Attack => result.attack_count,
            };
            let (Some(slot), Some(target)) = (self.ui.counter(kind), target) else {
                continue;
            };

            let Some(runtime) = &runtime else {
                // Sans runtime, pas d'animation : valeur finale directement
                slot.set_text(&target.to_formatted_string(&self.locale));
                continue;
            };

            let slot = Arc::clone(slot);
            let frames = Arc::clone(&self.frames);
            let duration = self.counter_duration;
            let locale = self.locale;
            self.animations.push(runtime.spawn(async move {
                animate_counter(slot.as_ref(), target, duration, frames.clock(), locale).await;
            }));
        }
    }

    fn render_chart(&mut self, trends: &Trends) {
        let Some(surface) = &self.ui.chart else {
            return;
        };
        debug_assert!(trends.is_aligned(), "séries de tendance de longueurs différentes");

        // Détruire l'ancienne courbe avant d'en créer une nouvelle
        if let Some(previous) = self.chart.take() {
            previous.destroy();
        }

        let mut series = vec![Series {
            name: ATTACK_SERIES.to_string(),
            values: trends.attack.clone(),
            style: SeriesStyle::SmoothArea,
        }];
        if let Some(normal) = &trends.normal {
            series.push(Series {
                name: NORMAL_SERIES.to_string(),
                values: normal.clone(),
                style: SeriesStyle::Line,
            });
        }

        self.chart = Some(surface.create_chart(ChartSpec {
            labels: trends.labels.clone(),
            series,
        }));
    }

    fn render_table(&self, incidents: &[Incident]) {
        let Some(table) = &self.ui.table else {
            return;
        };

        table.clear_rows();
        if incidents.is_empty() {
            table.push_row(TableRow::Placeholder {
                text: NO_INCIDENTS_TEXT.to_string(),
                span: TABLE_COLUMNS.len(),
            });
            return;
        }

        for incident in incidents {
            table.push_row(TableRow::Cells(incident_cells(incident)));
        }
    }
}

/// Cellules d'une ligne d'incident, dans l'ordre de `TABLE_COLUMNS`
pub fn incident_cells(incident: &Incident) -> Vec<String> {
    vec![
        incident.id.to_string(),
        incident.protocol_type.clone(),
        incident.service.clone(),
        format_bytes(incident.src_bytes),
        format_bytes(incident.dst_bytes),
        incident.flag.clone(),
        INCIDENT_STATUS.to_string(),
    ]
}
