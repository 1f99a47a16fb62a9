use crate::log_mode::LogMode;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Variable d'environnement permettant de choisir un autre fichier de configuration
pub const CONFIG_ENV_VAR: &str = "ZDASHBOARD_CONFIG";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Adresse de base du service d'analyse
    pub server_url: String,

    /// Chemin du point d'entrée d'analyse
    pub predict_path: String,

    /// Chemin du jeu de données d'exemple
    pub sample_path: String,

    /// Délai maximal (en secondes) d'une requête d'analyse
    pub request_timeout_secs: u64,

    /// Durée (en millisecondes) de l'animation des compteurs
    pub counter_duration_ms: u64,

    /// Durée (en millisecondes) d'affichage d'un message temporaire
    pub toast_duration_ms: u64,

    /// Intervalle entre deux images d'animation
    pub frame_interval_ms: u64,

    /// Locale utilisée pour grouper les chiffres des compteurs
    pub locale: String,

    /// Sections affichées par le tableau de bord
    pub layout: Layout,

    /// Niveau de log
    pub log_level: String,

    /// Mode de journalisation
    pub log_mode: LogMode,

    /// Fichier du journal des analyses (mode `File`)
    pub journal_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: "http://127.0.0.1:5000".to_string(),
            predict_path: "/predict".to_string(),
            sample_path: "/download_sample".to_string(),
            request_timeout_secs: 120,
            counter_duration_ms: 1000,
            toast_duration_ms: 3000,
            frame_interval_ms: 16,
            locale: "en".to_string(),
            layout: Layout::Full,
            log_level: "info".to_string(),
            log_mode: LogMode::Stderr,
            journal_file: "zdashboard-analyses.log".to_string(),
        }
    }
}

/// Variante de page : quelles sections de résultats sont câblées
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Compteurs + courbe
    Chart,
    /// Compteurs + journal des incidents
    Table,
    /// Tout
    Full,
}

impl Layout {
    pub fn sections(&self) -> Sections {
        match self {
            Layout::Chart => Sections { stats: true, graph: true, table: false },
            Layout::Table => Sections { stats: true, graph: false, table: true },
            Layout::Full => Sections { stats: true, graph: true, table: true },
        }
    }
}

/// Sections de résultats activées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections {
    pub stats: bool,
    pub graph: bool,
    pub table: bool,
}

impl Config {
    /// Emplacement du fichier de configuration
    pub fn path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }

        match std::env::var("HOME") {
            Ok(home) => Path::new(&home)
                .join(".config")
                .join("zdashboard")
                .join(CONFIG_FILE_NAME),
            Err(_) => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    /// Charge la configuration depuis l'emplacement par défaut
    pub fn load() -> Result<Self, Box<dyn Error>> {
        Self::load_from(&Self::path())
    }

    /// Charge la configuration depuis un fichier, en le créant s'il n'existe pas
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            // Créer la configuration par défaut si elle n'existe pas
            let default_config = Config::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;

        Ok(config)
    }

    /// Sauvegarde la configuration dans un fichier
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let config_json = serde_json::to_string_pretty(self)?;
        fs::write(path, config_json)?;

        Ok(())
    }

    pub fn predict_url(&self) -> String {
        join_url(&self.server_url, &self.predict_path)
    }

    pub fn sample_url(&self) -> String {
        join_url(&self.server_url, &self.sample_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        // Un intervalle nul ferait tourner l'animation à vide
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
