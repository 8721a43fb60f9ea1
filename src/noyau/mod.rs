//! Noyau de calcul en précision arbitraire
//!
//! Organisation interne :
//! - erreur.rs        : ErreurCalcul (thiserror) + familles
//! - jetons.rs        : tokenisation (enums fermés : opérateurs, fonctions, constantes)
//! - decimal.rs       : Decimal (mantisse × 10^exposant) + Precision explicite
//! - transcendantes.rs: π, exp, ln, trig, hyperboliques, √, puissance
//! - calcul.rs        : répartition opérateur/fonction → primitive + factorielle
//! - rpn.rs           : shunting-yard évalué (récursion sur les arguments de fonction)
//! - eval.rs          : point d’entrée (précision, ResultatEval)
//!
//! Aucun état global : la précision traverse chaque appel.

pub mod calcul;
pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod jetons;
pub mod rpn;
pub mod transcendantes;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use decimal::{Decimal, Precision};
pub use erreur::{ErreurCalcul, GenreErreur};
pub use eval::{eval_expression, evaluer, ResultatEval};
