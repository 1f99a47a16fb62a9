//! Module de gestion des messages de statut
//!
//! Un message est visible dès l'appel puis masqué automatiquement après un
//! délai fixe. Un numéro de génération empêche le minuteur d'un ancien message
//! de masquer un message plus récent.

use crate::models::Severity;
use crate::ui::StatusRegion;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct Notifier {
    region: Option<Arc<dyn StatusRegion>>,
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new(region: Option<Arc<dyn StatusRegion>>, delay: Duration) -> Self {
        Self {
            region,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Affiche un message temporaire
    pub fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => error!("{}", message),
            Severity::Success => info!("{}", message),
            Severity::Info => debug!("{}", message),
        }

        let Some(region) = &self.region else {
            return;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        region.show(severity, message);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("Aucun runtime tokio, le message ne sera pas masqué automatiquement");
                return;
            }
        };

        let region = Arc::clone(region);
        let current = Arc::clone(&self.generation);
        let delay = self.delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == generation {
                region.hide();
            }
        });
    }

    /// Affiche un message neutre qui reste visible jusqu'au prochain appel
    pub fn hold(&self, message: &str) {
        debug!("{}", message);
        if let Some(region) = &self.region {
            self.generation.fetch_add(1, Ordering::SeqCst);
            region.show(Severity::Info, message);
        }
    }
}
