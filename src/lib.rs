// src/lib.rs
//
// calculating-paper : évaluateur d’expressions en précision arbitraire
// - noyau    : jetons, shunting-yard, décimal, fonctions
// - reglages : précision + filtre du journal

pub mod noyau;
pub mod reglages;

pub use noyau::{eval_expression, evaluer, Decimal, ErreurCalcul, GenreErreur, ResultatEval};
pub use reglages::Reglages;
