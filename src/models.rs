use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Niveau de gravité d'un message affiché à l'utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Message neutre (analyse en cours, etc.)
    Info,
    /// Analyse terminée avec succès
    Success,
    /// Échec de l'analyse
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// Résultat d'une analyse renvoyé par le service `/predict`
///
/// Tous les champs sont optionnels : une section absente ou mal formée est
/// simplement ignorée au rendu, elle ne fait pas échouer l'analyse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Toute valeur « vraie » signale un échec, pas seulement une chaîne
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_packets: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub normal_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub attack_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub trends: Option<Trends>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub detected_incidents: Option<Vec<Incident>>,
}

impl AnalysisResult {
    /// Message d'erreur du service, si l'analyse a échoué côté serveur
    ///
    /// `null`, `false`, `0` et la chaîne vide ne comptent pas comme une erreur.
    /// Une valeur qui n'est pas une chaîne est rendue sous sa forme JSON.
    pub fn failure_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(message) if message.is_empty() => None,
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Séries temporelles attaques / trafic normal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub labels: Vec<String>,
    pub attack: Vec<f64>,
    /// Absente dans certaines réponses
    #[serde(default)]
    pub normal: Option<Vec<f64>>,
}

impl Trends {
    /// Vérifie que chaque série a autant de points que d'étiquettes
    pub fn is_aligned(&self) -> bool {
        self.attack.len() == self.labels.len()
            && self
                .normal
                .as_ref()
                .map_or(true, |normal| normal.len() == self.labels.len())
    }
}

/// Incident détecté (une connexion classée comme attaque)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: i64,
    pub protocol_type: String,
    pub service: String,
    pub src_bytes: f64,
    pub dst_bytes: f64,
    pub flag: String,
}

/// Formate un nombre d'octets sans partie décimale inutile
pub fn format_bytes(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// Une valeur présente mais de forme inattendue est traitée comme absente
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

// Un enregistrement mal formé est écarté sans perdre les autres
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let records = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(records)) => records,
        _ => return Ok(None),
    };

    let total = records.len();
    let parsed: Vec<T> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if parsed.len() < total {
        warn!("{} incident(s) mal formé(s) ignoré(s)", total - parsed.len());
    }

    Ok(Some(parsed))
}
