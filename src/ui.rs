//! Poignées d'affichage du tableau de bord
//!
//! Chaque élément de l'interface (bouton d'analyse, compteurs, zone de statut,
//! courbe, tableau des incidents, sections) est représenté par un trait. Les
//! poignées sont rassemblées une seule fois dans `UiHandles` puis passées aux
//! composants. Une poignée absente signifie que la variante de page ne possède
//! pas cet élément : les composants l'ignorent sans erreur.

use crate::models::Severity;
use std::sync::Arc;

/// Bouton déclenchant une analyse
pub trait TriggerControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
    fn set_label(&self, label: &str);
}

/// Mise en valeur d'une étiquette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Highlighted,
}

/// Zone de texte simple (étiquette de fichier, compteur)
pub trait TextSlot: Send + Sync {
    fn set_text(&self, text: &str);

    fn set_emphasis(&self, _emphasis: Emphasis) {}
}

/// Zone d'affichage des messages de statut
pub trait StatusRegion: Send + Sync {
    fn show(&self, severity: Severity, message: &str);
    fn hide(&self);
}

/// Style de tracé d'une série
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    /// Aire lissée sous la courbe
    SmoothArea,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

/// Description complète d'une courbe à dessiner
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

/// Instance de courbe vivante, détruite avant d'en créer une nouvelle
pub trait ChartInstance: Send {
    fn destroy(self: Box<Self>);
}

/// Surface capable de créer des courbes
pub trait ChartSurface: Send + Sync {
    fn create_chart(&self, spec: ChartSpec) -> Box<dyn ChartInstance>;
}

/// Ligne du tableau des incidents
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    /// Ligne unique occupant toutes les colonnes
    Placeholder { text: String, span: usize },
    Cells(Vec<String>),
}

pub trait IncidentTable: Send + Sync {
    fn clear_rows(&self);
    fn push_row(&self, row: TableRow);
}

/// Conteneur de section masqué par défaut
pub trait SectionToggle: Send + Sync {
    fn reveal(&self);
}

/// Compteurs affichés en tête du tableau de bord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Total,
    Normal,
    Attack,
}

impl CounterKind {
    pub const ALL: [CounterKind; 3] = [CounterKind::Total, CounterKind::Normal, CounterKind::Attack];

    pub fn index(&self) -> usize {
        match self {
            CounterKind::Total => 0,
            CounterKind::Normal => 1,
            CounterKind::Attack => 2,
        }
    }
}

/// Ensemble des poignées d'affichage, construit une fois au démarrage
#[derive(Clone, Default)]
pub struct UiHandles {
    pub trigger: Option<Arc<dyn TriggerControl>>,
    pub file_label: Option<Arc<dyn TextSlot>>,
    pub total_counter: Option<Arc<dyn TextSlot>>,
    pub normal_counter: Option<Arc<dyn TextSlot>>,
    pub attack_counter: Option<Arc<dyn TextSlot>>,
    pub status: Option<Arc<dyn StatusRegion>>,
    pub chart: Option<Arc<dyn ChartSurface>>,
    pub table: Option<Arc<dyn IncidentTable>>,
    pub stats_section: Option<Arc<dyn SectionToggle>>,
    pub graph_section: Option<Arc<dyn SectionToggle>>,
    pub table_section: Option<Arc<dyn SectionToggle>>,
}

impl UiHandles {
    pub fn counter(&self, kind: CounterKind) -> Option<&Arc<dyn TextSlot>> {
        match kind {
            CounterKind::Total => self.total_counter.as_ref(),
            CounterKind::Normal => self.normal_counter.as_ref(),
            CounterKind::Attack => self.attack_counter.as_ref(),
        }
    }
}
