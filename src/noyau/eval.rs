//! Noyau : évaluation (point d’entrée)
//!
//! texte -> (trim, '=' initial retiré) -> jetons -> shunting-yard à p
//!
//! Chaque opération arrondit à p : `1/3*3` à 5 chiffres donne 0.99999.
//! Seules les fonctions transcendantes gardent des chiffres en interne.
//!
//! Toute erreur est rendue, jamais propagée en panique.

use std::fmt;

use tracing::debug;

use super::decimal::{Decimal, Precision};
use super::erreur::ErreurCalcul;
use super::jetons::{format_tokens, tokenize};
use super::rpn::evaluer_jetons;

/// Résultat destiné à l’appelant : valeur, ou message d’erreur.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultatEval {
    Valeur(Decimal),
    Erreur(String),
}

impl ResultatEval {
    pub fn est_erreur(&self) -> bool {
        matches!(self, ResultatEval::Erreur(_))
    }

    /// La valeur, seulement si le drapeau d’erreur n’est pas levé.
    pub fn valeur(&self) -> Option<&Decimal> {
        match self {
            ResultatEval::Valeur(v) => Some(v),
            ResultatEval::Erreur(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ResultatEval::Valeur(_) => None,
            ResultatEval::Erreur(m) => Some(m),
        }
    }
}

impl From<Result<Decimal, ErreurCalcul>> for ResultatEval {
    fn from(r: Result<Decimal, ErreurCalcul>) -> Self {
        match r {
            Ok(v) => ResultatEval::Valeur(v),
            Err(e) => ResultatEval::Erreur(e.to_string()),
        }
    }
}

impl fmt::Display for ResultatEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultatEval::Valeur(v) => write!(f, "{v}"),
            ResultatEval::Erreur(m) => write!(f, "error: {m}"),
        }
    }
}

/// API Rust : évalue `expression` avec `precision` chiffres significatifs.
pub fn evaluer(expression: &str, precision: u32) -> Result<Decimal, ErreurCalcul> {
    let p = Precision::new(precision)?;

    let s = expression.trim();
    let s = s.strip_prefix('=').unwrap_or(s);
    if s.trim().is_empty() {
        return Err(ErreurCalcul::Entree("Expression is blank".into()));
    }

    let jetons = tokenize(s)?;
    debug!(jetons = %format_tokens(&jetons), precision, "jetons");

    let valeur = evaluer_jetons(&jetons, p)?;
    debug!(%valeur, "résultat");
    Ok(valeur)
}

/// API publique (hôte) : valeur ou message, avec drapeau d’erreur.
pub fn eval_expression(expression: &str, precision: u32) -> ResultatEval {
    evaluer(expression, precision).into()
}
