// src/noyau/transcendantes.rs
//
// Fonctions transcendantes en précision arbitraire
// -----------------------------------------------
// - π      : Machin sur entiers scalés
// - exp    : réduction par moitiés + Taylor + carrés successifs
// - ln     : réduction décimale/binaire + série atanh
// - sin/cos: réduction modulo 2π + Taylor
// - arctan : réciproque + demi-angle + série
// - √      : racine entière de la mantisse scalée
//
// Chaque fonction calcule avec GARDE chiffres de plus puis arrondit à `p`.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::decimal::{nb_chiffres, pow10, Decimal, Precision};
use super::erreur::ErreurCalcul;

const GARDE: u32 = 10;

/// exp(x) refusé au-delà de |x| ≥ 10^16.
const EXP_ORDRE_MAX: i64 = 15;

/// sin/cos/tan refusés au-delà de |x| ≥ 10^1001 (réduction trop coûteuse).
const TRIG_ORDRE_MAX: i64 = 1000;

/// Exposant décimal maximal d’un résultat de puissance.
const ORDRE_RESULTAT_MAX: u128 = 1_000_000_000_000_000;

/// Au-delà, l’exposant entier passe par exp(b·ln a).
const PUISSANCE_ENTIERE_MAX: u64 = 1_000_000_000;

fn negligeable(terme: &Decimal, somme: &Decimal, p: Precision) -> bool {
    terme.est_zero()
        || (!somme.est_zero() && terme.ordre() < somme.ordre() - p.chiffres() as i64 - 2)
}

fn deux() -> Decimal {
    Decimal::entier(2)
}

/* ------------------------ π (Machin) ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut q_pow = q; // q^(2k+1)
    let mut sum = BigInt::zero();

    loop {
        let term = scale / (&q_pow * BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }

        if k % 2 == 0 {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q2;
        k += 1;
    }

    sum
}

/// π = 16·atan(1/5) − 4·atan(1/239)
pub fn pi(p: Precision) -> Decimal {
    let chiffres = p.plus(GARDE).chiffres();
    let scale = pow10(chiffres);

    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);
    let pi = BigInt::from(16) * a - BigInt::from(4) * b;

    Decimal::new(pi, -(chiffres as i64)).arrondi(p)
}

/* ------------------------ exp / ln ------------------------ */

fn serie_exp(r: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let mut somme = Decimal::un();
    let mut terme = Decimal::un();
    for k in 1u64.. {
        terme = terme.mul(r, p)?.div_entier(k, p);
        if negligeable(&terme, &somme, p) {
            break;
        }
        somme = somme.add(&terme, p);
    }
    Ok(somme)
}

pub fn exp(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::un());
    }
    if x.ordre() > EXP_ORDRE_MAX {
        return Err(ErreurCalcul::Domaine(format!(
            "exp overflow: argument {x} out of range"
        )));
    }

    // x = r·2^n avec |r| ≤ 0.001, puis n carrés (chacun coûte ~0.3 chiffre)
    let approx = x.vers_f64().abs();
    let moities = if approx > 1e-3 {
        (approx / 1e-3).log2().ceil() as u32
    } else {
        0
    };
    let wp = p.plus(GARDE + moities / 3 + 1);

    let r = x.div(&Decimal::from(BigInt::from(2).pow(moities)), wp)?;
    let mut y = serie_exp(&r, wp)?;
    for _ in 0..moities {
        y = y.mul(&y, wp)?;
    }
    Ok(y.arrondi(p))
}

/// atanh(u) = u + u^3/3 + u^5/5 + ... (|u| petit)
fn atanh_serie(u: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if u.est_zero() {
        return Ok(Decimal::zero());
    }
    let u2 = u.mul(u, p)?;
    let mut puissance = u.clone();
    let mut somme = u.clone();
    for k in 1u64.. {
        puissance = puissance.mul(&u2, p)?;
        let terme = puissance.div_entier(2 * k + 1, p);
        if negligeable(&terme, &somme, p) {
            break;
        }
        somme = somme.add(&terme, p);
    }
    Ok(somme)
}

/// ln(z) = 2·atanh((z−1)/(z+1)), pour z proche de 1.
fn ln_proche_de_un(z: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let un = Decimal::un();
    let u = z.sub(&un, p).div(&z.add(&un, p), p)?;
    atanh_serie(&u, p)?.mul(&deux(), p)
}

/// ln 2 = 2·atanh(1/3)
fn ln2(p: Precision) -> Result<Decimal, ErreurCalcul> {
    atanh_serie(&Decimal::un().div_entier(3, p), p)?.mul(&deux(), p)
}

/// ln 10 = 3·ln 2 + ln(1.25) = 3·ln 2 + 2·atanh(1/9)
fn ln10(p: Precision) -> Result<Decimal, ErreurCalcul> {
    let trois_ln2 = ln2(p)?.mul(&Decimal::entier(3), p)?;
    let ln_5_4 = atanh_serie(&Decimal::un().div_entier(9, p), p)?.mul(&deux(), p)?;
    Ok(trois_ln2.add(&ln_5_4, p))
}

pub fn ln(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if !x.est_positif() {
        return Err(ErreurCalcul::Domaine(format!("ln undefined for {x}")));
    }
    let un = Decimal::un();
    if *x == un {
        return Ok(Decimal::zero());
    }
    let wp = p.plus(GARDE);

    // proche de 1 : série directe (pas de compensation k·ln 10 − …)
    let demi = Decimal::new(BigInt::from(5), -1);
    if x.sub(&un, wp).abs() < demi {
        return Ok(ln_proche_de_un(x, wp)?.arrondi(p));
    }

    // x = y·10^k, y ∈ [1, 10) ; puis y = z·2^j, z ∈ [0.75, 1.5]
    let k = x.ordre();
    let wpk = wp.plus(nb_chiffres(&BigInt::from(k)) as u32);
    let mut y = Decimal::new(x.mantisse().clone(), x.exposant() - k);

    let borne = Decimal::new(BigInt::from(15), -1);
    let mut j: i64 = 0;
    while y > borne {
        y = y.div_entier(2, wpk);
        j += 1;
    }

    let mut res = ln_proche_de_un(&y, wpk)?;
    if j != 0 {
        res = res.add(&ln2(wpk)?.mul(&Decimal::entier(j), wpk)?, wpk);
    }
    if k != 0 {
        res = res.add(&ln10(wpk)?.mul(&Decimal::entier(k), wpk)?, wpk);
    }
    Ok(res.arrondi(p))
}

/// Logarithme décimal ; exact pour les puissances de dix.
pub fn log10(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if !x.est_positif() {
        return Err(ErreurCalcul::Domaine(format!("log undefined for {x}")));
    }
    if x.mantisse().is_one() {
        return Ok(Decimal::entier(x.exposant()));
    }
    let wp = p.plus(GARDE);
    Ok(ln(x, wp)?.div(&ln10(wp)?, wp)?.arrondi(p))
}

/* ------------------------ √ ------------------------ */

pub fn racine(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_negatif() {
        return Err(ErreurCalcul::Domaine(format!("√ undefined for {x}")));
    }
    if x.est_zero() {
        return Ok(Decimal::zero());
    }

    // mantisse scalée : au moins 2(p+2) chiffres, exposant pair
    let voulu = 2 * (p.chiffres() as u64 + 2);
    let mut decalage = voulu.saturating_sub(nb_chiffres(x.mantisse())) as i64;
    if (x.exposant() - decalage).rem_euclid(2) != 0 {
        decalage += 1;
    }

    let m = x.mantisse() * pow10(decalage as u32);
    let mut r = m.sqrt();
    let mut exposant = (x.exposant() - decalage) / 2;
    if &r * &r != m {
        // chiffre collant : racine non exacte
        r = r * 10u32 + 1u32;
        exposant -= 1;
    }
    Ok(Decimal::new(r, exposant).arrondi(p))
}

/* ------------------------ Trigonométrie ------------------------ */

/// x − k·2π, k entier le plus proche. Renvoie aussi la précision de travail.
fn reduire_angle(x: &Decimal, p: Precision) -> Result<(Decimal, Precision), ErreurCalcul> {
    if x.ordre() > TRIG_ORDRE_MAX {
        return Err(ErreurCalcul::Domaine(format!(
            "trigonometric argument too large: {x}"
        )));
    }
    let wp = p.plus(GARDE + x.ordre().max(0) as u32);
    let tau = pi(wp).mul(&deux(), wp)?;
    let k = x.div(&tau, wp)?.arrondi_entier();
    if k.is_zero() {
        return Ok((x.arrondi(wp), wp));
    }
    let r = x.sub(&tau.mul(&Decimal::from(k), wp)?, wp);
    Ok((r, wp))
}

fn serie_sin(r: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if r.est_zero() {
        return Ok(Decimal::zero());
    }
    let r2 = r.mul(r, p)?;
    let mut terme = r.clone();
    let mut somme = r.clone();
    for k in 1u64.. {
        terme = terme.mul(&r2, p)?.div_entier((2 * k) * (2 * k + 1), p).neg();
        if negligeable(&terme, &somme, p) {
            break;
        }
        somme = somme.add(&terme, p);
    }
    Ok(somme)
}

fn serie_cos(r: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let r2 = r.mul(r, p)?;
    let mut terme = Decimal::un();
    let mut somme = Decimal::un();
    for k in 1u64.. {
        terme = terme.mul(&r2, p)?.div_entier((2 * k - 1) * (2 * k), p).neg();
        if negligeable(&terme, &somme, p) {
            break;
        }
        somme = somme.add(&terme, p);
    }
    Ok(somme)
}

pub fn sin(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let (r, wp) = reduire_angle(x, p)?;
    Ok(serie_sin(&r, wp)?.arrondi(p))
}

pub fn cos(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::un());
    }
    let (r, wp) = reduire_angle(x, p)?;
    Ok(serie_cos(&r, wp)?.arrondi(p))
}

pub fn tan(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let (r, wp) = reduire_angle(x, p)?;
    let c = serie_cos(&r, wp)?;
    if c.est_zero() {
        return Err(ErreurCalcul::Domaine(format!("tan undefined for {x}")));
    }
    Ok(serie_sin(&r, wp)?.div(&c, wp)?.arrondi(p))
}

/// |y| ≤ 1 : demi-angles jusqu’à |y| ≤ 0.1, puis série.
fn arctan_reduit(y: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let un = Decimal::un();
    let seuil = Decimal::new(BigInt::one(), -1);

    // atan(y) = 2·atan(y / (1 + √(1+y²)))
    let mut y = y.clone();
    let mut doublements = 0u32;
    while y.abs() > seuil {
        let rac = racine(&un.add(&y.mul(&y, p)?, p), p)?;
        y = y.div(&un.add(&rac, p), p)?;
        doublements += 1;
    }

    let y2 = y.mul(&y, p)?;
    let mut puissance = y.clone();
    let mut somme = y.clone();
    for k in 1u64.. {
        puissance = puissance.mul(&y2, p)?.neg();
        let terme = puissance.div_entier(2 * k + 1, p);
        if negligeable(&terme, &somme, p) {
            break;
        }
        somme = somme.add(&terme, p);
    }

    somme.mul(&Decimal::from(BigInt::from(2).pow(doublements)), p)
}

pub fn arctan(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let wp = p.plus(GARDE);
    let un = Decimal::un();

    if x.abs() > un {
        // atan(x) = ±π/2 − atan(1/x)
        let demi_pi = pi(wp).div_entier(2, wp);
        let a = arctan_reduit(&un.div(x, wp)?, wp)?;
        let res = if x.est_negatif() {
            demi_pi.neg().sub(&a, wp)
        } else {
            demi_pi.sub(&a, wp)
        };
        return Ok(res.arrondi(p));
    }

    Ok(arctan_reduit(x, wp)?.arrondi(p))
}

pub fn arcsin(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let un = Decimal::un();
    let ax = x.abs();
    if ax > un {
        return Err(ErreurCalcul::Domaine(format!("arcsin undefined for {x}")));
    }
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let wp = p.plus(GARDE);

    if ax == un {
        let demi_pi = pi(wp).div_entier(2, wp);
        let v = if x.est_negatif() { demi_pi.neg() } else { demi_pi };
        return Ok(v.arrondi(p));
    }

    // asin(x) = atan(x / √((1−x)(1+x)))
    let cos = racine(&un.sub(x, wp).mul(&un.add(x, wp), wp)?, wp)?;
    let q = x.div(&cos, wp)?;
    Ok(arctan(&q, wp)?.arrondi(p))
}

pub fn arccos(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let un = Decimal::un();
    if x.abs() > un {
        return Err(ErreurCalcul::Domaine(format!("arccos undefined for {x}")));
    }
    if *x == un {
        return Ok(Decimal::zero());
    }
    if *x == un.neg() {
        return Ok(pi(p));
    }
    let wp = p.plus(GARDE);
    let demi_pi = pi(wp).div_entier(2, wp);
    if x.est_zero() {
        return Ok(demi_pi.arrondi(p));
    }
    let a = arcsin(x, wp)?;
    Ok(demi_pi.sub(&a, wp).arrondi(p))
}

/* ------------------------ Hyperboliques ------------------------ */

fn serie_sinh(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let x2 = x.mul(x, p)?;
    let mut terme = x.clone();
    let mut somme = x.clone();
    for k in 1u64.. {
        terme = terme.mul(&x2, p)?.div_entier((2 * k) * (2 * k + 1), p);
        if negligeable(&terme, &somme, p) {
            break;
        }
        somme = somme.add(&terme, p);
    }
    Ok(somme)
}

pub fn sinh(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let wp = p.plus(GARDE);
    // |x| < 1 : série (évite la compensation e^x − e^−x)
    if x.abs() < Decimal::un() {
        return Ok(serie_sinh(x, wp)?.arrondi(p));
    }
    let ex = exp(x, wp)?;
    let inv = Decimal::un().div(&ex, wp)?;
    Ok(ex.sub(&inv, wp).div_entier(2, wp).arrondi(p))
}

pub fn cosh(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::un());
    }
    let wp = p.plus(GARDE);
    let ex = exp(x, wp)?;
    let inv = Decimal::un().div(&ex, wp)?;
    Ok(ex.add(&inv, wp).div_entier(2, wp).arrondi(p))
}

pub fn tanh(x: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if x.est_zero() {
        return Ok(Decimal::zero());
    }
    let wp = p.plus(GARDE);
    // 1 − tanh|x| ≈ 2e^(−2|x|) < 10^(−wp) : saturation
    if x.abs().vers_f64() > 1.2 * wp.chiffres() as f64 {
        let un = Decimal::un();
        return Ok(if x.est_negatif() { un.neg() } else { un });
    }
    let s = sinh(x, wp)?;
    let c = cosh(x, wp)?;
    Ok(s.div(&c, wp)?.arrondi(p))
}

/* ------------------------ Puissance ------------------------ */

/// a^b réel. Exposant entier : carrés successifs ; sinon exp(b·ln a).
pub fn puissance(a: &Decimal, b: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
    if b.est_zero() {
        return Ok(Decimal::un());
    }
    if a.est_zero() {
        return if b.est_negatif() {
            Err(ErreurCalcul::DivisionParZero)
        } else {
            Ok(Decimal::zero())
        };
    }
    if let Some(n) = b
        .vers_i64()
        .filter(|n| n.unsigned_abs() <= PUISSANCE_ENTIERE_MAX)
    {
        return puissance_entiere(a, n, p);
    }
    if a.est_negatif() && !b.est_entier() {
        return Err(ErreurCalcul::Domaine(format!(
            "({a})^({b}) is not a real number"
        )));
    }

    let wp = p.plus(GARDE + 2 + b.ordre().clamp(0, 64) as u32);
    let l = ln(&a.abs(), wp)?;
    let v = exp(&b.mul(&l, wp)?, wp)?;

    // base négative, exposant entier (grand) : signe selon la parité
    let impair = b.exposant() == 0 && !(b.mantisse() % 2u32).is_zero();
    let v = if a.est_negatif() && impair { v.neg() } else { v };
    Ok(v.arrondi(p))
}

fn puissance_entiere(a: &Decimal, n: i64, p: Precision) -> Result<Decimal, ErreurCalcul> {
    let e = n.unsigned_abs();
    let ordre_estime = (a.ordre().unsigned_abs() as u128 + 1) * e as u128;
    if ordre_estime > ORDRE_RESULTAT_MAX {
        return Err(ErreurCalcul::Domaine(format!("({a})^{n} overflow")));
    }

    let wp = p.plus(GARDE + nb_chiffres(&BigInt::from(e)) as u32);
    let mut acc = Decimal::un();
    let mut base = a.clone();
    let mut reste = e;
    while reste > 0 {
        if reste & 1 == 1 {
            acc = acc.mul(&base, wp)?;
        }
        reste >>= 1;
        if reste > 0 {
            base = base.mul(&base, wp)?;
        }
    }

    if n < 0 {
        acc = Decimal::un().div(&acc, wp)?;
    }
    Ok(acc.arrondi(p))
}
