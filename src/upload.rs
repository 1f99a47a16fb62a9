//! Sélection du fichier de trafic à analyser
//!
//! Aucune validation (type, taille, contenu) n'est faite ici : c'est le service
//! qui décide. L'absence de fichier est un état valide qui demande au service
//! d'utiliser son jeu de données par défaut.

use crate::ui::{Emphasis, TextSlot};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Texte de l'étiquette quand aucun fichier n'est choisi
pub const NO_FILE_LABEL: &str = "Choose CSV File";

/// Fichier choisi par l'utilisateur
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self { name: name.into(), content }
    }

    /// Lit un fichier depuis le disque
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self { name, content })
    }
}

pub struct UploadController {
    selected: Option<SelectedFile>,
    label: Option<Arc<dyn TextSlot>>,
}

impl UploadController {
    pub fn new(label: Option<Arc<dyn TextSlot>>) -> Self {
        let controller = Self { selected: None, label };
        controller.refresh_label(Emphasis::Normal);
        controller
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    /// Changement explicite via le sélecteur de fichiers
    pub fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.selected = files.into_iter().next();
        match &self.selected {
            Some(file) => {
                info!("Fichier sélectionné: {} ({} octets)", file.name, file.content.len());
                self.refresh_label(Emphasis::Highlighted);
            }
            None => {
                debug!("Sélection vidée, le jeu de données du serveur sera utilisé");
                self.refresh_label(Emphasis::Normal);
            }
        }
    }

    /// Glisser-déposer : la liste déposée remplace la sélection, seul le premier fichier compte
    pub fn drop_files(&mut self, files: Vec<SelectedFile>) {
        if files.is_empty() {
            return;
        }
        if files.len() > 1 {
            debug!("{} fichiers déposés, seul le premier est utilisé", files.len());
        }
        self.select_files(files);
    }

    fn refresh_label(&self, emphasis: Emphasis) {
        if let Some(label) = &self.label {
            let text = self.selected.as_ref().map_or(NO_FILE_LABEL, |file| file.name.as_str());
            label.set_text(text);
            label.set_emphasis(emphasis);
        }
    }
}

/// Découpe une ligne collée dans le terminal en chemins de fichiers
///
/// Un fichier glissé sur un terminal y est collé sous forme de chemin, parfois
/// entre guillemets, avec des espaces échappés ou un préfixe `file://`.
pub fn parse_dropped_paths(line: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = line.trim().chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '\'') | (None, '"') => quote = Some(c),
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(to_path(&current));
                    current.clear();
                }
            }
            (_, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(to_path(&current));
    }

    paths
}

// Les URI `file://` sont encodées en pourcentage (`%20` pour une espace)
fn to_path(token: &str) -> PathBuf {
    if token.starts_with("file://") {
        if let Some(path) = Url::parse(token).ok().and_then(|uri| uri.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(token.strip_prefix("file://").unwrap_or(token))
}
