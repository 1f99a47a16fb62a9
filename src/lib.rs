//! Bibliothèque zdashboard : client du service d'analyse de trafic réseau
//!
//! Cette bibliothèque envoie un fichier de trafic (CSV) au point d'entrée `/predict`
//! du service de détection, puis affiche le résultat : compteurs animés, courbe
//! des attaques et journal des incidents détectés.
//!
//! Toute la surface d'affichage passe par les poignées de `ui::UiHandles`, ce qui
//! permet de brancher le tableau de bord terminal ou des doublures de test.

// Modules principaux
pub mod models;   // Structures de données échangées avec le service
pub mod config;   // Configuration du client
pub mod error;    // Erreurs de requête
pub mod log_mode; // Modes de journalisation
pub mod logger;   // Journal des cycles d'analyse

// Composants du tableau de bord
pub mod ui;        // Poignées d'affichage
pub mod upload;    // Sélection du fichier
pub mod requester; // Requête d'analyse
pub mod animation; // Animation des compteurs
pub mod presenter; // Rendu des résultats
pub mod notifier;  // Messages temporaires
pub mod terminal;  // Rendu dans le terminal
pub mod service;   // Orchestration d'un cycle complet
pub mod cli;       // Interface en ligne de commande

#[cfg(test)]
mod testing;

// Re-export des structures principales pour faciliter l'utilisation
pub use models::{AnalysisResult, Incident, Trends, Severity};
pub use config::{Config, Layout, Sections};
pub use error::RequestError;
pub use requester::{AnalysisRequester, CycleOutcome, HttpTransport, PredictTransport, SampleDownloader};
pub use presenter::ResultPresenter;
pub use service::DashboardService;
pub use terminal::TerminalDashboard;
