// src/noyau/calcul.rs
//
// Backend arithmétique : opérateur / fonction / constante → primitive décimale.
// Toujours à la précision fournie par l’appelant (aucun état partagé).

use num_bigint::BigInt;
use num_traits::One;

use super::decimal::{nb_chiffres, Decimal, Precision};
use super::erreur::ErreurCalcul;
use super::jetons::{Constante, Fonction, Operateur};
use super::transcendantes as tr;

/// n! accepté jusqu’à cette borne (au-delà : erreur de domaine).
pub const FACTORIELLE_MAX: u64 = 1_000_000;

const GARDE_FACTORIELLE: u32 = 10;

pub fn operation_binaire(
    op: Operateur,
    a: &Decimal,
    b: &Decimal,
    p: Precision,
) -> Result<Decimal, ErreurCalcul> {
    match op {
        Operateur::Plus => Ok(a.add(b, p)),
        Operateur::Moins => Ok(a.sub(b, p)),
        Operateur::Fois => a.mul(b, p),
        Operateur::Slash | Operateur::Obelus => a.div(b, p),
        Operateur::Caret => tr::puissance(a, b, p),
    }
}

pub fn appliquer_fonction(f: Fonction, x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    match f {
        Fonction::Sin => tr::sin(x, p),
        Fonction::Cos => tr::cos(x, p),
        Fonction::Tan => tr::tan(x, p),
        Fonction::Arcsin => tr::arcsin(x, p),
        Fonction::Arccos => tr::arccos(x, p),
        Fonction::Arctan => tr::arctan(x, p),
        Fonction::Sinh => tr::sinh(x, p),
        Fonction::Cosh => tr::cosh(x, p),
        Fonction::Tanh => tr::tanh(x, p),
        Fonction::Racine => tr::racine(x, p),
        Fonction::Log => tr::log10(x, p),
        Fonction::Ln => tr::ln(x, p),
        Fonction::Exp => tr::exp(x, p),
    }
}

pub fn constante(c: Constante, p: Precision) -> Result<Decimal, ErreurCalcul> {
    match c {
        Constante::Pi => Ok(tr::pi(p)),
        Constante::E => tr::exp(&Decimal::un(), p),
    }
}

/// n! pour n entier, 0 ≤ n ≤ FACTORIELLE_MAX.
///
/// Produit exact tant qu’il tient dans ~2× la précision de travail,
/// ensuite produits arrondis (les petites factorielles restent exactes).
pub fn factorielle(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_negatif() {
        return Err(ErreurCalcul::Domaine(format!(
            "Factorial of negative number: {x}"
        )));
    }
    if !x.est_entier() {
        return Err(ErreurCalcul::Domaine(format!(
            "Factorial of non-integer: {x}"
        )));
    }
    let n = x
        .vers_i64()
        .map(|n| n as u64)
        .filter(|n| *n <= FACTORIELLE_MAX)
        .ok_or_else(|| {
            ErreurCalcul::Domaine(format!(
                "Factorial argument too large: {x} (max {FACTORIELLE_MAX})"
            ))
        })?;

    let wp = p.plus(GARDE_FACTORIELLE + nb_chiffres(&BigInt::from(n)) as u32);
    // ≈ 2·wp chiffres décimaux (log2(10) ≈ 10/3)
    let bits_max = 2 * wp.chiffres() as u64 * 10 / 3 + 1;

    let mut acc = BigInt::one();
    let mut exposant: i64 = 0;
    for i in 2..=n {
        acc *= i;
        if acc.bits() > bits_max {
            let arrondi = Decimal::new(acc, exposant).arrondi(wp);
            exposant = arrondi.exposant();
            acc = arrondi.mantisse().clone();
        }
    }

    Ok(Decimal::new(acc, exposant).arrondi(p))
}
