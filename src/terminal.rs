//! Tableau de bord dans le terminal
//!
//! `TerminalDashboard` fournit toutes les poignées d'affichage. Chaque poignée
//! modifie un état d'écran partagé ; le rendu est une fonction pure de cet état,
//! redessinée périodiquement en mode animé ou une seule fois en mode simple.

use crate::config::Sections;
use crate::models::Severity;
use crate::ui::{
    ChartInstance, ChartSpec, ChartSurface, CounterKind, Emphasis, IncidentTable, SectionToggle,
    StatusRegion, TableRow, TextSlot, TriggerControl, UiHandles,
};
use crate::presenter::TABLE_COLUMNS;
use log::error;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

const WIDTH: usize = 68;
const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const COUNTER_NAMES: [&str; 3] = ["Total Packets", "Normal", "Attacks"];

/// État de l'écran, modifié par les poignées
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub trigger_label: String,
    pub trigger_enabled: bool,
    pub file_label: String,
    pub file_highlighted: bool,
    pub counters: [String; 3],
    pub status: Option<(Severity, String)>,
    pub chart: Option<(u64, ChartSpec)>,
    pub rows: Vec<TableRow>,
    pub visible: Sections,
    dirty: bool,
    next_chart_id: u64,
}

impl Screen {
    /// Rendu texte complet du tableau de bord
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "─".repeat(WIDTH + 2);

        out.push_str(&format!("┌{}┐\n", rule));
        push_line(&mut out, "ZDashboard - Analyse du trafic réseau");
        out.push_str(&format!("├{}┤\n", rule));

        let marker = if self.file_highlighted { " ●" } else { "" };
        push_line(&mut out, &format!("Fichier : {}{}", self.file_label, marker));

        let button = if self.trigger_enabled {
            format!("[ {} ]", self.trigger_label)
        } else {
            format!("( {} )", self.trigger_label)
        };
        push_line(&mut out, &button);

        if let Some((severity, message)) = &self.status {
            let icon = match severity {
                Severity::Info => "…",
                Severity::Success => "✔",
                Severity::Error => "✘",
            };
            push_line(&mut out, &format!("{} {}", icon, message));
        }

        if self.visible.stats {
            out.push_str(&format!("├{}┤\n", rule));
            let stats = COUNTER_NAMES
                .iter()
                .zip(self.counters.iter())
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect::<Vec<_>>()
                .join("   ");
            push_line(&mut out, &stats);
        }

        if self.visible.graph {
            if let Some((_, spec)) = &self.chart {
                out.push_str(&format!("├{}┤\n", rule));
                render_chart(&mut out, spec);
            }
        }

        out.push_str(&format!("└{}┘\n", rule));

        if self.visible.table && !self.rows.is_empty() {
            out.push_str(&render_table(&self.rows));
        }

        out
    }
}

fn push_line(out: &mut String, text: &str) {
    let text: String = text.chars().take(WIDTH).collect();
    out.push_str(&format!("│ {:<width$} │\n", text, width = WIDTH));
}

fn render_chart(out: &mut String, spec: &ChartSpec) {
    let max = spec
        .series
        .iter()
        .flat_map(|series| series.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let plot_width = WIDTH - 18;
    for series in &spec.series {
        let line = format!(
            "{:<16}  {}",
            series.name,
            sparkline(&series.values, max, plot_width)
        );
        push_line(out, &line);
    }

    if let (Some(first), Some(last)) = (spec.labels.first(), spec.labels.last()) {
        let axis = format!("{:<16}  {}", format!("max {}", max), first);
        let gap = plot_width.saturating_sub(first.chars().count() + last.chars().count());
        push_line(out, &format!("{}{}{}", axis, " ".repeat(gap), last));
    }
}

/// Une colonne par point (ou par groupe de points si la série est trop longue)
pub fn sparkline(values: &[f64], max: f64, width: usize) -> String {
    downsample(values, width)
        .into_iter()
        .map(|value| {
            if max <= 0.0 || !value.is_finite() || value <= 0.0 {
                return LEVELS[0];
            }
            let level = ((value / max) * 8.0).round().clamp(1.0, 8.0) as usize;
            LEVELS[level]
        })
        .collect()
}

fn downsample(values: &[f64], width: usize) -> Vec<f64> {
    if width == 0 || values.len() <= width {
        return values.to_vec();
    }
    let chunk = (values.len() + width - 1) / width;
    values
        .chunks(chunk)
        .map(|chunk| chunk.iter().copied().fold(f64::MIN, f64::max))
        .collect()
}

fn render_table(rows: &[TableRow]) -> String {
    let mut widths: Vec<usize> = TABLE_COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        if let TableRow::Cells(cells) = row {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let border = |left: &str, mid: &str, right: &str| {
        let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, parts.join(mid), right)
    };
    let cells_line = |cells: &[String]| {
        let parts: Vec<String> = widths
            .iter()
            .zip(cells)
            .map(|(w, cell)| format!(" {:<width$} ", cell, width = *w))
            .collect();
        format!("│{}│\n", parts.join("│"))
    };

    let mut out = String::new();
    out.push_str(&border("┌", "┬", "┐"));
    let header: Vec<String> = TABLE_COLUMNS.iter().map(|c| c.to_string()).collect();
    out.push_str(&cells_line(&header));
    out.push_str(&border("├", "┼", "┤"));

    for row in rows {
        match row {
            TableRow::Cells(cells) => out.push_str(&cells_line(cells)),
            TableRow::Placeholder { text, span } => {
                // La ligne occupe toutes les colonnes fusionnées
                let span = (*span).clamp(1, widths.len());
                let inner: usize =
                    widths.iter().take(span).map(|w| w + 2).sum::<usize>() + span - 1;
                out.push_str(&format!("│{:^width$}│\n", text, width = inner));
            }
        }
    }
    out.push_str(&border("└", "┴", "┘"));

    out
}

type SharedScreen = Arc<Mutex<Screen>>;

fn update(screen: &SharedScreen, apply: impl FnOnce(&mut Screen)) {
    match screen.lock() {
        Ok(mut screen) => {
            apply(&mut screen);
            screen.dirty = true;
        }
        Err(e) => error!("Écran du tableau de bord inaccessible: {}", e),
    }
}

/// Tableau de bord terminal partagé par toutes les poignées
#[derive(Clone, Default)]
pub struct TerminalDashboard {
    screen: SharedScreen,
}

impl TerminalDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construit les poignées d'affichage pour les sections activées
    pub fn bind(&self, sections: Sections) -> UiHandles {
        let counter = |kind: CounterKind| -> Option<Arc<dyn TextSlot>> {
            sections.stats.then(|| {
                Arc::new(TerminalCounter { screen: self.screen.clone(), kind }) as Arc<dyn TextSlot>
            })
        };
        let section = |enabled: bool, which: SectionKind| -> Option<Arc<dyn SectionToggle>> {
            enabled.then(|| {
                Arc::new(TerminalSection { screen: self.screen.clone(), which }) as Arc<dyn SectionToggle>
            })
        };

        UiHandles {
            trigger: Some(Arc::new(TerminalTrigger { screen: self.screen.clone() })),
            file_label: Some(Arc::new(TerminalFileLabel { screen: self.screen.clone() })),
            total_counter: counter(CounterKind::Total),
            normal_counter: counter(CounterKind::Normal),
            attack_counter: counter(CounterKind::Attack),
            status: Some(Arc::new(TerminalStatus { screen: self.screen.clone() })),
            chart: sections.graph.then(|| {
                Arc::new(TerminalChartSurface { screen: self.screen.clone() }) as Arc<dyn ChartSurface>
            }),
            table: sections.table.then(|| {
                Arc::new(TerminalTable { screen: self.screen.clone() }) as Arc<dyn IncidentTable>
            }),
            stats_section: section(sections.stats, SectionKind::Stats),
            graph_section: section(sections.graph, SectionKind::Graph),
            table_section: section(sections.table, SectionKind::Table),
        }
    }

    /// Copie de l'état courant de l'écran
    pub fn snapshot(&self) -> Screen {
        match self.screen.lock() {
            Ok(screen) => screen.clone(),
            Err(e) => e.into_inner().clone(),
        }
    }

    pub fn render(&self) -> String {
        self.snapshot().render()
    }

    /// Affiche l'écran une fois, à la suite de la sortie existante
    pub fn print(&self) {
        println!("{}", self.render());
    }

    /// Redessine l'écran à chaque changement, jusqu'à l'arrêt de la tâche
    pub fn spawn_refresh(&self, period: Duration) -> JoinHandle<()> {
        let screen = Arc::clone(&self.screen);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;

                let frame = {
                    let Ok(mut screen) = screen.lock() else {
                        break;
                    };
                    if !screen.dirty {
                        continue;
                    }
                    screen.dirty = false;
                    screen.render()
                };

                // Effacer l'écran (compatible avec la plupart des terminaux)
                let mut stdout = std::io::stdout();
                let _ = write!(stdout, "\x1B[2J\x1B[1;1H{}", frame);
                let _ = stdout.flush();
            }
        })
    }
}

struct TerminalTrigger {
    screen: SharedScreen,
}

impl TriggerControl for TerminalTrigger {
    fn set_enabled(&self, enabled: bool) {
        update(&self.screen, |s| s.trigger_enabled = enabled);
    }

    fn set_label(&self, label: &str) {
        update(&self.screen, |s| s.trigger_label = label.to_string());
    }
}

struct TerminalFileLabel {
    screen: SharedScreen,
}

impl TextSlot for TerminalFileLabel {
    fn set_text(&self, text: &str) {
        update(&self.screen, |s| s.file_label = text.to_string());
    }

    fn set_emphasis(&self, emphasis: Emphasis) {
        update(&self.screen, |s| s.file_highlighted = emphasis == Emphasis::Highlighted);
    }
}

struct TerminalCounter {
    screen: SharedScreen,
    kind: CounterKind,
}

impl TextSlot for TerminalCounter {
    fn set_text(&self, text: &str) {
        let index = self.kind.index();
        update(&self.screen, |s| s.counters[index] = text.to_string());
    }
}

struct TerminalStatus {
    screen: SharedScreen,
}

impl StatusRegion for TerminalStatus {
    fn show(&self, severity: Severity, message: &str) {
        update(&self.screen, |s| s.status = Some((severity, message.to_string())));
    }

    fn hide(&self) {
        update(&self.screen, |s| s.status = None);
    }
}

struct TerminalChartSurface {
    screen: SharedScreen,
}

impl ChartSurface for TerminalChartSurface {
    fn create_chart(&self, spec: ChartSpec) -> Box<dyn ChartInstance> {
        let mut id = 0;
        update(&self.screen, |s| {
            s.next_chart_id += 1;
            id = s.next_chart_id;
            s.chart = Some((id, spec));
        });
        Box::new(TerminalChart { screen: self.screen.clone(), id })
    }
}

struct TerminalChart {
    screen: SharedScreen,
    id: u64,
}

impl ChartInstance for TerminalChart {
    fn destroy(self: Box<Self>) {
        let id = self.id;
        update(&self.screen, |s| {
            if matches!(&s.chart, Some((current, _)) if *current == id) {
                s.chart = None;
            }
        });
    }
}

struct TerminalTable {
    screen: SharedScreen,
}

impl IncidentTable for TerminalTable {
    fn clear_rows(&self) {
        update(&self.screen, |s| s.rows.clear());
    }

    fn push_row(&self, row: TableRow) {
        update(&self.screen, |s| s.rows.push(row));
    }
}

#[derive(Clone, Copy)]
enum SectionKind {
    Stats,
    Graph,
    Table,
}

struct TerminalSection {
    screen: SharedScreen,
    which: SectionKind,
}

impl SectionToggle for TerminalSection {
    fn reveal(&self) {
        let which = self.which;
        update(&self.screen, |s| match which {
            SectionKind::Stats => s.visible.stats = true,
            SectionKind::Graph => s.visible.graph = true,
            SectionKind::Table => s.visible.table = true,
        });
    }
}
