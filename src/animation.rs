//! Animation des compteurs
//!
//! La valeur affichée est une fonction pure du temps écoulé depuis la première
//! image. Les images sont fournies par une `FrameClock` interchangeable : un
//! intervalle tokio en production, une horloge scriptée dans les tests.

use crate::ui::TextSlot;
use async_trait::async_trait;
use num_format::{Locale, ToFormattedString};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Source d'images pour une animation
#[async_trait]
pub trait FrameClock: Send {
    /// Attend l'image suivante et renvoie son horodatage
    async fn next_frame(&mut self) -> Instant;
}

/// Fabrique d'horloges : chaque animation possède la sienne
pub trait FrameSource: Send + Sync {
    fn clock(&self) -> Box<dyn FrameClock>;
}

/// Images cadencées par un intervalle tokio (~60 Hz par défaut)
pub struct TokioFrames {
    period: Duration,
}

impl TokioFrames {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for TokioFrames {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl FrameSource for TokioFrames {
    fn clock(&self) -> Box<dyn FrameClock> {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Box::new(IntervalClock { interval })
    }
}

struct IntervalClock {
    interval: tokio::time::Interval,
}

#[async_trait]
impl FrameClock for IntervalClock {
    async fn next_frame(&mut self) -> Instant {
        self.interval.tick().await.into_std()
    }
}

/// Progression de l'animation, bornée à [0, 1]
pub fn progress_ratio(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Valeur entière affichée après `elapsed`, de 0 jusqu'à `target`
pub fn counter_value(target: u64, elapsed: Duration, duration: Duration) -> u64 {
    let progress = progress_ratio(elapsed, duration);
    if progress >= 1.0 {
        return target;
    }
    ((progress * target as f64).floor() as u64).min(target)
}

/// Anime un compteur de 0 à `target`, puis s'arrête de lui-même
pub async fn animate_counter(
    slot: &dyn TextSlot,
    target: u64,
    duration: Duration,
    mut clock: Box<dyn FrameClock>,
    locale: Locale,
) {
    let mut origin: Option<Instant> = None;

    loop {
        let now = clock.next_frame().await;
        let start = *origin.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);

        let value = counter_value(target, elapsed, duration);
        slot.set_text(&value.to_formatted_string(&locale));

        if progress_ratio(elapsed, duration) >= 1.0 {
            break;
        }
    }
}

/// Résout une locale par son nom, `en` par défaut
pub fn resolve_locale(name: &str) -> Locale {
    match Locale::from_name(name) {
        Ok(locale) => locale,
        Err(_) => {
            log::warn!("Locale inconnue '{}', utilisation de 'en'", name);
            Locale::en
        }
    }
}
