use crate::config::Config;
use crate::log_mode::LogMode;
use crate::requester::CycleOutcome;
use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Journal des cycles d'analyse
///
/// En mode `File`, chaque cycle ajoute une ligne horodatée au fichier. En mode
/// `Stderr`, la même ligne passe par le crate `log`.
pub struct AnalysisJournal {
    log_file: Mutex<Option<File>>,
    log_path: String,
    log_mode: LogMode,
}

impl AnalysisJournal {
    pub fn new(log_path: String) -> Self {
        Self::new_with_mode(log_path, LogMode::File)
    }

    pub fn new_with_mode(log_path: String, log_mode: LogMode) -> Self {
        let file = if log_mode == LogMode::File {
            // Créer le répertoire si nécessaire
            if let Some(parent) = Path::new(&log_path).parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        error!("Erreur lors de la création du répertoire du journal: {}", e);
                    }
                }
            }
            open_append(&log_path)
        } else {
            None
        };

        Self {
            log_file: Mutex::new(file),
            log_path,
            log_mode,
        }
    }

    /// Journal partagé, selon le mode de la configuration
    pub fn from_config(config: &Config) -> Arc<Self> {
        Arc::new(Self::new_with_mode(config.journal_file.clone(), config.log_mode))
    }

    /// Enregistre l'issue d'un cycle d'analyse
    pub fn record(&self, outcome: &CycleOutcome, file_name: Option<&str>) {
        let timestamp: DateTime<Local> = SystemTime::now().into();
        let formatted_time = timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let source = file_name.unwrap_or("<jeu de données du serveur>");

        let (kind, details) = match outcome {
            CycleOutcome::Success(result) => (
                "SUCCESS",
                format!(
                    "paquets={} normal={} attaques={} incidents={}",
                    display_count(result.total_packets),
                    display_count(result.normal_count),
                    display_count(result.attack_count),
                    result.detected_incidents.as_ref().map_or(0, Vec::len)
                ),
            ),
            CycleOutcome::Rejected(message) => ("REJECTED", message.clone()),
            CycleOutcome::Failed(e) => ("FAILED", e.to_string()),
            CycleOutcome::Busy => ("BUSY", "analyse déjà en cours".to_string()),
        };

        let log_entry = format!("[{}] [{}] [Fichier: {}] {}", formatted_time, kind, source, details);

        match self.log_mode {
            LogMode::File => {
                self.write_to_log(&format!("{}\n", log_entry));
            }
            LogMode::Stderr => match outcome {
                CycleOutcome::Success(_) => info!("{}", log_entry),
                _ => warn!("{}", log_entry),
            },
        }
    }

    fn write_to_log(&self, message: &str) {
        let mut log_file_guard = match self.log_file.lock() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Erreur lors de l'acquisition du verrou du journal: {}", e);
                return;
            }
        };

        if let Some(file) = log_file_guard.as_mut() {
            if let Err(e) = file.write_all(message.as_bytes()) {
                error!("Erreur lors de l'écriture dans le journal: {}", e);

                // Essayer de réouvrir le fichier
                *log_file_guard = open_append(&self.log_path);
            }
        }
    }
}

fn open_append(path: &str) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            error!("Erreur lors de l'ouverture du journal {}: {}", path, e);
            None
        }
    }
}

fn display_count(count: Option<u64>) -> String {
    count.map_or_else(|| "-".to_string(), |c| c.to_string())
}
