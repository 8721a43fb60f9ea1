//! Tests scientifiques (campagne) : chiffres de référence + invariants + limites contrôlées.
//!
//! But : vérifier la justesse chiffre à chiffre sans faire chauffer la machine.
//! - budget temps global sur les stress
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - Le résultat est arrondi (half-up) à la précision demandée ; les zéros finaux
//!   ne sont jamais affichés. Les références ci-dessous sont écrites sous cette forme.
//! - Chaque opération arrondit à la précision demandée : 1/3+1/3+1/3 à 5 chiffres
//!   vaut 0.99999. Les identités (sin² + cos² = 1, exp(ln x) = x, …) se calculent
//!   donc avec 10 chiffres de plus, puis se comparent à la précision visée.
//! - Un résultat théoriquement nul mais obtenu par annulation (sin(π), …) n’est PAS
//!   exactement 0 : π est lui-même arrondi.

use std::time::{Duration, Instant};

use super::decimal::Precision;
use super::erreur::GenreErreur;
use super::eval::evaluer;

fn eval_ok(expr: &str, precision: u32) -> String {
    evaluer(expr, precision)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .to_string()
}

fn assert_val(expr: &str, precision: u32, attendu: &str) {
    assert_eq!(eval_ok(expr, precision), attendu, "expr={expr:?} p={precision}");
}

/// Calcul à p + 10, affichage à p.
fn eval_garde(expr: &str, precision: u32) -> String {
    evaluer(expr, precision + 10)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .arrondi(Precision::new(precision).unwrap())
        .to_string()
}

fn assert_identite(expr: &str, precision: u32, attendu: &str) {
    assert_eq!(eval_garde(expr, precision), attendu, "expr={expr:?} p={precision}");
}

fn assert_meme_valeur(a: &str, b: &str, precision: u32) {
    assert_eq!(
        eval_garde(a, precision),
        eval_garde(b, precision),
        "{a:?} != {b:?} à p={precision}"
    );
}

fn assert_genre(expr: &str, genre: GenreErreur) {
    match evaluer(expr, 20) {
        Ok(v) => panic!("expr={expr:?} devait échouer, a donné {v}"),
        Err(e) => assert_eq!(e.genre(), genre, "expr={expr:?} err={e}"),
    }
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Constantes de référence ------------------------ */

#[test]
fn sci_pi_200_chiffres() {
    assert_val(
        "π",
        200,
        "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899862803482534211706798214808651328230664709384460955058223172535940812848111745028410270193852110555964462294895493038",
    );
}

#[test]
fn sci_pi_1000_chiffres_fin() {
    let pi = eval_ok("π", 1000);
    // "3." + 999 décimales
    assert_eq!(pi.len(), 1001);
    assert!(pi.starts_with("3.14159265358979323846"));
    assert!(pi.ends_with("613001927876611195909216420199"), "fin: {}", &pi[pi.len() - 30..]);
}

#[test]
fn sci_e_et_racine_de_deux_100_chiffres() {
    assert_val(
        "e",
        100,
        "2.718281828459045235360287471352662497757247093699959574966967627724076630353547594571382178525166427",
    );
    assert_val(
        "√(2)",
        100,
        "1.414213562373095048801688724209698078569671875376948073176679737990732478462107038850387534327641573",
    );
}

#[test]
fn sci_logarithmes() {
    assert_val("ln(2)", 25, "0.6931471805599453094172321");
    assert_val("ln(3)", 30, "1.09861228866810969139524523692");
    assert_val("ln(1E100)", 20, "230.2585092994045684");
    assert_val("log(1E100)", 20, "100");
    assert_val("log(0.001)", 20, "-3");
    assert_val("log(2)", 15, "0.301029995663981");
}

#[test]
fn sci_exponentielles() {
    assert_val("exp(1)", 20, "2.7182818284590452354");
    assert_val("exp(-1000)", 20, "5.0759588975494567653E-435");
    assert_val("sinh(10)", 20, "11013.232874703393377");
    assert_val("cosh(-3)", 20, "10.067661995777765842");
}

#[test]
fn sci_trigonometrie() {
    assert_val("sin(1)", 20, "0.84147098480789650665");
    assert_val("cos(1)", 20, "0.5403023058681397174");
    assert_val("tan(2)", 20, "-2.1850398632615189916");
    assert_val("arctan(10)", 20, "1.4711276743037345919");
    assert_val("arccos(-0.5)", 20, "2.0943951023931954923");
    assert_val("arctan(1)*4", 20, "3.1415926535897932385");
}

#[test]
fn sci_puissances() {
    assert_val("2^100", 40, "1267650600228229401496703205376");
    assert_val("1.5^2.5", 20, "2.7556759606310753605");
    assert_val("10^-0.5", 20, "0.3162277660168379332");
    assert_val("10^1000", 20, "1E+1000");
    assert_val("0^0", 20, "1");
    assert_val("(-2)^3", 20, "-8");
}

#[test]
fn sci_puissance_associative_a_gauche() {
    // 2^3^2 = (2^3)^2 = 64, pas 2^9 = 512
    assert_val("2^3^2", 20, "64");
    assert_val("2^0.5^2", 20, "2");
}

#[test]
fn sci_factorielles() {
    assert_val("20!", 30, "2432902008176640000");
    assert_val("25!", 30, "1.5511210043330985984E+25");
    assert_val("30!", 40, "2.6525285981219105863630848E+32");
    assert_val("1000!", 10, "4.023872601E+2567");
}

/* ------------------------ Identités (valeur arrondie stable) ------------------------ */

#[test]
fn sci_identites() {
    assert_identite("sin(1)^2+cos(1)^2", 20, "1");
    assert_identite("exp(ln(7))", 20, "7");
    assert_identite("ln(exp(3))", 20, "3");
    assert_identite("√(2)^2", 20, "2");
    assert_identite("tan(π/4)", 20, "1");
    assert_identite("sin(π/6)", 20, "0.5");
    assert_identite("cos(π/3)", 20, "0.5");
    assert_identite("cos(π)", 20, "-1");
    assert_identite("cosh(2)^2-sinh(2)^2", 20, "1");
}

#[test]
fn sci_symetrie_et_periodicite() {
    assert_val("sin(-1)", 20, "-0.84147098480789650665");
    assert_meme_valeur("cos(-1)", "cos(1)", 20);
    assert_meme_valeur("sin(1+2*π)", "sin(1)", 20);
    assert_meme_valeur("cos(1-10*π)", "cos(1)", 20);
    assert_meme_valeur("e^2", "exp(2)", 20);
    assert_meme_valeur("tanh(-0.5)", "-tanh(0.5)", 20);
}

/* ------------------------ Précision ------------------------ */

#[test]
fn sci_precision_exacte_en_chiffres() {
    for p in [1u32, 2, 7, 33, 100] {
        let v = eval_ok("1/3", p);
        assert_eq!(v.len(), 2 + p as usize, "p={p} v={v}");
    }
    assert_val("2/3", 1, "0.7");
    assert_val("1/3", 1, "0.3");
}

#[test]
fn sci_arrondi_par_operation() {
    assert_val("1/3+1/3+1/3", 5, "0.99999");
    assert_val("1/3*3", 5, "0.99999");
    assert_val("(1/3)*3", 12, "0.999999999999");
    // π arrondi à 3 chiffres avant le produit
    assert_val("π*1000", 3, "3140");
    // cos(π/3) sans garde : π/3 arrondi décale le résultat
    assert_val("cos(π/3)", 20, "0.49999999999999999996");
}

#[test]
fn sci_precision_maximale() {
    let t0 = Instant::now();
    let v = eval_ok("1/3", 10_000);
    budget(t0, Duration::from_secs(2));
    assert_eq!(v.len(), 10_002);
    assert!(v[2..].bytes().all(|b| b == b'3'));
}

#[test]
fn sci_affichage_canonique() {
    assert_val("1E20", 20, "100000000000000000000");
    assert_val("1E21", 20, "1E+21");
    assert_val("1.5E-7", 20, "0.00000015");
    assert_val("1.5E-8", 20, "1.5E-8");
    assert_val("100-100", 20, "0");
}

/* ------------------------ Domaines ------------------------ */

#[test]
fn sci_erreurs_de_domaine() {
    for expr in [
        "ln(0)",
        "log(-1)",
        "√(-4)",
        "arcsin(1.5)",
        "arccos(-2)",
        "(-8)^(1/3)",
        "exp(1E16)",
        "sin(1E1001)",
        "1000001!",
        "(1/2)!",
        "1/0",
        "0^-2",
    ] {
        assert_genre(expr, GenreErreur::Domaine);
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_racines() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // √((√(...)^2)) : alterne racine et carré, reste = 4
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("√({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    assert_val(&expr, 20, "4");
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = vec!["1/2"; 800].join(" + ");
    assert_val(&expr, 20, "400");
    budget(t0, max);
}

#[test]
fn sci_stress_grand_entier() {
    let t0 = Instant::now();
    let max = Duration::from_secs(1);

    let big = "9".repeat(100);
    let expr = format!("{big}/7 + 1/7");
    assert_val(&expr, 20, "1.4285714285714285714E+99");
    budget(t0, max);
}
