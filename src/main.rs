// src/main.rs
//
// calculating-paper : point d’entrée ligne de commande
// ----------------------------------------------------
// - une expression par argument ("-5+3" accepté tel quel, options avant)
// - sans argument : une expression par ligne de stdin (lignes vides ignorées)
// - valeur sur stdout, "error: …" sur stderr
// - code de sortie 1 si au moins une expression échoue

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use calculating_paper::reglages::{Reglages, FILTRE_LOG_DEFAUT, PRECISION_DEFAUT};
use calculating_paper::{eval_expression, ResultatEval};

/// Arbitrary-precision arithmetic expression evaluator.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Expressions to evaluate (one per line on stdin when omitted).
    #[arg(allow_hyphen_values = true, num_args = 0..)]
    expressions: Vec<String>,

    /// Number of significant digits of each result.
    #[arg(
        short,
        long,
        env = "CALCULATING_PAPER_PRECISION",
        default_value_t = PRECISION_DEFAUT
    )]
    precision: u32,

    /// Log filter (tracing EnvFilter syntax), written to stderr.
    #[arg(long, env = "CALCULATING_PAPER_LOG", default_value = FILTRE_LOG_DEFAUT)]
    log: String,
}

/* ------------------------ Journal ------------------------ */

fn installer_journal(filtre: &str) {
    let filtre = EnvFilter::try_new(filtre).unwrap_or_else(|_| EnvFilter::new(FILTRE_LOG_DEFAUT));
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(io::stderr)
        .init();
}

/* ------------------------ Évaluation ------------------------ */

/// Évalue une expression ; renvoie false si elle a échoué.
fn traiter(expression: &str, reglages: &Reglages, out: &mut impl Write) -> Result<bool> {
    match eval_expression(expression, reglages.precision) {
        ResultatEval::Valeur(v) => {
            writeln!(out, "{v}").context("writing result to stdout")?;
            Ok(true)
        }
        ResultatEval::Erreur(m) => {
            eprintln!("error: {m}");
            Ok(false)
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // journal d’abord : l’ajustement de la précision est signalé
    installer_journal(&args.log);
    let reglages = Reglages::new(args.precision, args.log);
    debug!(?reglages, "réglages");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut tout_ok = true;

    if args.expressions.is_empty() {
        for ligne in io::stdin().lock().lines() {
            let ligne = ligne.context("reading expression from stdin")?;
            if ligne.trim().is_empty() {
                continue;
            }
            tout_ok &= traiter(&ligne, &reglages, &mut out)?;
        }
    } else {
        for expression in &args.expressions {
            tout_ok &= traiter(expression, &reglages, &mut out)?;
        }
    }

    out.flush().context("flushing stdout")?;
    Ok(if tout_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
