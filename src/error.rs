use thiserror::Error;

/// Erreurs pouvant survenir lors d'un échange avec le service d'analyse
#[derive(Error, Debug)]
pub enum RequestError {
    /// La requête n'a pas pu aboutir (serveur injoignable, délai dépassé...)
    #[error("échec de la connexion au service: {0}")]
    Transport(#[from] reqwest::Error),

    /// Le corps de la réponse n'est pas un JSON exploitable
    #[error("réponse illisible (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Code HTTP inattendu
    #[error("réponse HTTP inattendue: {0}")]
    Status(u16),

    #[error("erreur d'entrée/sortie: {0}")]
    Io(#[from] std::io::Error),
}

pub type RequestResult<T> = Result<T, RequestError>;
