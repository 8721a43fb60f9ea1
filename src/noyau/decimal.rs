// src/noyau/decimal.rs
//
// Décimal à précision arbitraire : valeur = mantisse × 10^exposant.
// - forme normalisée : pas de zéro final dans la mantisse, zéro = 0×10^0
//   (donc égalité structurelle == égalité numérique)
// - chaque opération reçoit sa Precision explicitement : aucun état global
// - arrondi au plus proche, égalité vers l’extérieur (half-up)

use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, ToPrimitive, Zero};

use super::erreur::ErreurCalcul;

/// |exposant| maximal d’un littéral (`1E…`).
pub const EXPOSANT_LITTERAL_MAX: i64 = 1_000_000_000_000_000;

/// |exposant| maximal après ×, ÷ : la somme de deux exposants tient dans un i64.
pub const EXPOSANT_MAX: i64 = 1_000_000_000_000_000_000;

/* ------------------------ Outils entiers ------------------------ */

pub fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// Nombre de chiffres décimaux de |n| (1 pour zéro).
///
/// Estimation par la taille binaire (2^(bits−1) ≤ |n|), puis correction
/// par comparaison avec une puissance de dix.
pub fn nb_chiffres(n: &BigInt) -> u64 {
    let m = n.magnitude();
    if m.is_zero() {
        return 1;
    }
    let estime = ((m.bits() - 1) as f64 * std::f64::consts::LOG10_2 - 1e-6)
        .floor()
        .max(0.0) as u64;
    let mut chiffres = estime + 1;
    while *m >= BigUint::from(10u32).pow(chiffres as u32) {
        chiffres += 1;
    }
    chiffres
}

fn exposant_borne(exposant: Option<i64>) -> Result<i64, ErreurCalcul> {
    exposant
        .filter(|e| e.unsigned_abs() <= EXPOSANT_MAX as u64)
        .ok_or_else(|| ErreurCalcul::Domaine("Decimal exponent overflow".into()))
}

/// Arrondit une mantisse à `chiffres` chiffres significatifs (half-up).
fn arrondi_brut(mantisse: BigInt, exposant: i64, chiffres: u32) -> (BigInt, i64) {
    let n = nb_chiffres(&mantisse);
    if n <= chiffres as u64 {
        return (mantisse, exposant);
    }

    let retire = (n - chiffres as u64) as u32;
    let diviseur = pow10(retire);
    let mut q = &mantisse / &diviseur;
    let r = &mantisse % &diviseur;

    if r.abs() * 2u32 >= diviseur {
        if mantisse.is_negative() {
            q -= 1u32;
        } else {
            q += 1u32;
        }
    }

    (q, exposant + retire as i64)
}

/* ------------------------ Précision ------------------------ */

/// Nombre de chiffres significatifs d’un calcul (≥ 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u32);

impl Precision {
    pub fn new(chiffres: u32) -> Result<Self, ErreurCalcul> {
        if chiffres == 0 {
            return Err(ErreurCalcul::Entree("Precision must be at least 1".into()));
        }
        Ok(Self(chiffres))
    }

    pub fn chiffres(self) -> u32 {
        self.0
    }

    /// Précision de travail avec chiffres de garde.
    pub fn plus(self, extra: u32) -> Self {
        Self(self.0.saturating_add(extra))
    }
}

/* ------------------------ Décimal ------------------------ */

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantisse: BigInt,
    exposant: i64,
}

impl Decimal {
    pub fn new(mut mantisse: BigInt, mut exposant: i64) -> Self {
        if mantisse.is_zero() {
            return Self::zero();
        }
        let dix = BigInt::from(10);
        while (&mantisse % &dix).is_zero() {
            mantisse /= &dix;
            exposant += 1;
        }
        Self { mantisse, exposant }
    }

    fn arrondi_de(mantisse: BigInt, exposant: i64, p: Precision) -> Self {
        let (m, e) = arrondi_brut(mantisse, exposant, p.chiffres());
        Self::new(m, e)
    }

    pub fn zero() -> Self {
        Self {
            mantisse: BigInt::zero(),
            exposant: 0,
        }
    }

    pub fn un() -> Self {
        Self::entier(1)
    }

    pub fn entier(n: i64) -> Self {
        Self::new(BigInt::from(n), 0)
    }

    pub fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    pub fn exposant(&self) -> i64 {
        self.exposant
    }

    pub fn est_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn est_negatif(&self) -> bool {
        self.mantisse.is_negative()
    }

    pub fn est_positif(&self) -> bool {
        self.mantisse.is_positive()
    }

    /// Vrai si la valeur est entière (forme normalisée : exposant ≥ 0).
    pub fn est_entier(&self) -> bool {
        self.exposant >= 0
    }

    /// Exposant décimal du premier chiffre : 123 → 2, 0.05 → -2.
    pub fn ordre(&self) -> i64 {
        self.exposant + nb_chiffres(&self.mantisse) as i64 - 1
    }

    pub fn neg(&self) -> Self {
        Self {
            mantisse: -&self.mantisse,
            exposant: self.exposant,
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            mantisse: self.mantisse.abs(),
            exposant: self.exposant,
        }
    }

    /// Conversion exacte vers i64 (entier seulement, sinon None).
    pub fn vers_i64(&self) -> Option<i64> {
        if !self.est_entier() || self.exposant > 18 {
            return None;
        }
        (&self.mantisse * pow10(self.exposant as u32)).to_i64()
    }

    /// Approximation flottante (estimations de bornes seulement).
    pub fn vers_f64(&self) -> f64 {
        format!("{}e{}", self.mantisse, self.exposant)
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Entier le plus proche (half-up).
    pub fn arrondi_entier(&self) -> BigInt {
        if self.exposant >= 0 {
            return &self.mantisse * pow10(self.exposant as u32);
        }
        if self.ordre() < -1 {
            return BigInt::zero();
        }
        let diviseur = pow10((-self.exposant) as u32);
        let mut q = &self.mantisse / &diviseur;
        let r = &self.mantisse % &diviseur;
        if r.abs() * 2u32 >= diviseur {
            if self.est_negatif() {
                q -= 1u32;
            } else {
                q += 1u32;
            }
        }
        q
    }

    pub fn arrondi(&self, p: Precision) -> Self {
        Self::arrondi_de(self.mantisse.clone(), self.exposant, p)
    }

    pub fn add(&self, autre: &Decimal, p: Precision) -> Decimal {
        if self.est_zero() {
            return autre.arrondi(p);
        }
        if autre.est_zero() {
            return self.arrondi(p);
        }

        // opérande négligeable : pas d’alignement sur un écart d’exposant géant
        let marge = p.chiffres() as i64 + 2;
        if self.ordre() - autre.ordre() > marge {
            return self.arrondi(p);
        }
        if autre.ordre() - self.ordre() > marge {
            return autre.arrondi(p);
        }

        let e = self.exposant.min(autre.exposant);
        let a = &self.mantisse * pow10((self.exposant - e) as u32);
        let b = &autre.mantisse * pow10((autre.exposant - e) as u32);
        Self::arrondi_de(a + b, e, p)
    }

    pub fn sub(&self, autre: &Decimal, p: Precision) -> Decimal {
        self.add(&autre.neg(), p)
    }

    /// Produit arrondi ; `Domaine` si l’exposant sort de ±EXPOSANT_MAX.
    pub fn mul(&self, autre: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
        if self.est_zero() || autre.est_zero() {
            return Ok(Decimal::zero());
        }
        let exposant = exposant_borne(self.exposant.checked_add(autre.exposant))?;
        Ok(Self::arrondi_de(
            &self.mantisse * &autre.mantisse,
            exposant,
            p,
        ))
    }

    pub fn div(&self, autre: &Decimal, p: Precision) -> Result<Decimal, ErreurCalcul> {
        if autre.est_zero() {
            return Err(ErreurCalcul::DivisionParZero);
        }
        if self.est_zero() {
            return Ok(Decimal::zero());
        }
        let exposant = exposant_borne(self.exposant.checked_sub(autre.exposant))?;
        Ok(self.div_brut(autre, exposant, p))
    }

    /// Division par un entier strictement positif.
    pub fn div_entier(&self, n: u64, p: Precision) -> Decimal {
        debug_assert!(n > 0);
        self.div_brut(&Decimal::new(BigInt::from(n), 0), self.exposant, p)
    }

    // Diviseur non nul garanti par l’appelant ; `exposant` = exposant(self) − exposant(autre).
    fn div_brut(&self, autre: &Decimal, exposant: i64, p: Precision) -> Decimal {
        if self.est_zero() {
            return Decimal::zero();
        }

        // quotient avec au moins p+2 chiffres, puis un chiffre « collant » si reste
        let da = nb_chiffres(&self.mantisse) as i64;
        let db = nb_chiffres(&autre.mantisse) as i64;
        let decalage = (p.chiffres() as i64 + 2 + db - da).max(0) as u32;

        let num = &self.mantisse * pow10(decalage);
        let q = &num / &autre.mantisse;
        let r = &num % &autre.mantisse;

        let mut exposant = exposant - decalage as i64;
        let q = if r.is_zero() {
            q
        } else {
            exposant -= 1;
            let signe = q.signum();
            q * 10u32 + signe
        };

        Self::arrondi_de(q, exposant, p)
    }
}

/* ------------------------ Lecture ------------------------ */

impl FromStr for Decimal {
    type Err = ErreurCalcul;

    /// Accepte : 12, -12, 0.5, .5, 5., 1.5E-3, 2e10.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalide = || ErreurCalcul::Syntaxe(format!("Malformed number: {s}"));

        let (negatif, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (base, exp_txt) = match corps.find(|c: char| c == 'E' || c == 'e') {
            Some(i) => (&corps[..i], Some(&corps[i + 1..])),
            None => (corps, None),
        };

        let (ent, frac) = base.split_once('.').unwrap_or((base, ""));
        if ent.is_empty() && frac.is_empty() {
            return Err(invalide());
        }
        if !ent.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalide());
        }

        let hors_borne = || ErreurCalcul::Domaine(format!("Exponent out of range: {s}"));
        let exposant_lu: i64 = match exp_txt {
            None => 0,
            Some(t) => t.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => hors_borne(),
                _ => invalide(),
            })?,
        };
        if exposant_lu.unsigned_abs() > EXPOSANT_LITTERAL_MAX as u64 {
            return Err(hors_borne());
        }

        let chiffres = format!("{ent}{frac}");
        let mut mantisse = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;
        if negatif {
            mantisse = -mantisse;
        }
        let exposant = exposant_lu
            .checked_sub(frac.len() as i64)
            .ok_or_else(invalide)?;

        Ok(Decimal::new(mantisse, exposant))
    }
}

/* ------------------------ Ordre ------------------------ */

impl Ord for Decimal {
    fn cmp(&self, autre: &Self) -> Ordering {
        let sa = self.mantisse.signum();
        let sb = autre.mantisse.signum();
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa.is_zero() {
            return Ordering::Equal;
        }

        let par_ordre = self.ordre().cmp(&autre.ordre());
        if par_ordre != Ordering::Equal {
            return if sa.is_positive() {
                par_ordre
            } else {
                par_ordre.reverse()
            };
        }

        // même ordre : alignement borné par le nombre de chiffres
        let e = self.exposant.min(autre.exposant);
        let a = &self.mantisse * pow10((self.exposant - e) as u32);
        let b = &autre.mantisse * pow10((autre.exposant - e) as u32);
        a.cmp(&b)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, autre: &Self) -> Option<Ordering> {
        Some(self.cmp(autre))
    }
}

/* ------------------------ Affichage canonique ------------------------ */

/// Ordres affichés sans exposant : [-7, 21).
const ORDRE_PLAIN_MIN: i64 = -7;
const ORDRE_PLAIN_MAX: i64 = 21;

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.est_zero() {
            return f.write_str("0");
        }

        let signe = if self.est_negatif() { "-" } else { "" };
        let chiffres = self.mantisse.magnitude().to_str_radix(10);
        let ordre = self.ordre();

        if (ORDRE_PLAIN_MIN..ORDRE_PLAIN_MAX).contains(&ordre) {
            if self.exposant >= 0 {
                let zeros = "0".repeat(self.exposant as usize);
                return write!(f, "{signe}{chiffres}{zeros}");
            }
            if ordre >= 0 {
                let (ent, frac) = chiffres.split_at((ordre + 1) as usize);
                return write!(f, "{signe}{ent}.{frac}");
            }
            let zeros = "0".repeat((-ordre - 1) as usize);
            return write!(f, "{signe}0.{zeros}{chiffres}");
        }

        let (tete, reste) = chiffres.split_at(1);
        let signe_exp = if ordre >= 0 { '+' } else { '-' };
        if reste.is_empty() {
            write!(f, "{signe}{tete}E{signe_exp}{}", ordre.unsigned_abs())
        } else {
            write!(f, "{signe}{tete}.{reste}E{signe_exp}{}", ordre.unsigned_abs())
        }
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Decimal::new(n, 0)
    }
}
