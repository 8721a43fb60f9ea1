//! src/reglages.rs
//!
//! Réglages d’exécution (sans noyau, sans I/O).
//!
//! Rôle : porter la précision demandée et le filtre du journal,
//! avec garde-fous sur la précision (anti-gel).

use tracing::warn;

/// Précision par défaut (chiffres significatifs).
pub const PRECISION_DEFAUT: u32 = 20;

/// Garde-fou : au-delà, les séries deviennent trop lentes.
pub const PRECISION_MAX: u32 = 10_000;

/// Filtre du journal quand rien n’est précisé.
pub const FILTRE_LOG_DEFAUT: &str = "warn";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub precision: u32,
    pub filtre_log: String,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
            filtre_log: FILTRE_LOG_DEFAUT.to_string(),
        }
    }
}

impl Reglages {
    pub fn new(precision: u32, filtre_log: impl Into<String>) -> Self {
        let mut r = Self {
            filtre_log: filtre_log.into(),
            ..Self::default()
        };
        r.set_precision(precision);
        r
    }

    /// Borne la précision dans 1..=PRECISION_MAX.
    pub fn set_precision(&mut self, precision: u32) {
        let retenue = precision.clamp(1, PRECISION_MAX);
        if retenue != precision {
            warn!(demandee = precision, retenue, "précision hors bornes, ajustée");
        }
        self.precision = retenue;
    }
}
