use serde::{Deserialize, Serialize};

/// Mode de journalisation utilisé par le client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogMode {
    /// Journal sur la sortie d'erreur uniquement
    Stderr,
    /// Sortie d'erreur + journal des analyses dans un fichier local
    File,
}

impl Default for LogMode {
    fn default() -> Self {
        LogMode::Stderr
    }
}
