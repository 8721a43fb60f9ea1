// src/noyau/rpn.rs
//
// Shunting-yard évalué au fil de l’eau (pas d’AST, pas de sortie RPN)
// Deux piles par niveau :
// - valeurs : Decimal
// - ops     : opérateurs binaires en attente, négation unaire, '('
//
// Règles:
// - Moins unaire : '-' en tête, après '(' ou après un opérateur.
//    - suivi d’un littéral : replié dans le littéral ("-2^2" => (-2)^2 = 4)
//    - sinon : marqueur Neg, qui lie plus fort que tout opérateur binaire
// - Fonction : "f(...)" => l’argument est évalué par un appel récursif (piles neuves),
//   puis f est appliquée au résultat.
// - Associativité à gauche partout, '^' compris : 2^3^2 = (2^3)^2 = 64.

use tracing::trace;

use super::calcul::{appliquer_fonction, constante, factorielle, operation_binaire};
use super::decimal::{Decimal, Precision};
use super::erreur::ErreurCalcul;
use super::jetons::{format_tokens, Fonction, Operateur, Tok};

/// Appels de fonction imbriqués au-delà : refus (pile d’appels bornée).
pub const PROFONDEUR_MAX: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpEnAttente {
    Binaire(Operateur),
    Neg,
    LPar,
}

impl OpEnAttente {
    fn precedence(self) -> u8 {
        match self {
            OpEnAttente::Binaire(Operateur::Plus | Operateur::Moins) => 1,
            OpEnAttente::Binaire(Operateur::Fois | Operateur::Slash | Operateur::Obelus) => 2,
            OpEnAttente::Binaire(Operateur::Caret) => 3,
            OpEnAttente::Neg => 4,
            OpEnAttente::LPar => 0,
        }
    }
}

fn operande_manquant(symbole: char) -> ErreurCalcul {
    ErreurCalcul::Structure(format!("Missing operand for '{symbole}'"))
}

fn lire_nombre(lit: &str, p: Precision) -> Result<Decimal, ErreurCalcul> {
    Ok(lit.parse::<Decimal>()?.arrondi(p))
}

/// Un niveau d’évaluation : ses piles vivent le temps d’un appel.
struct Niveau {
    valeurs: Vec<Decimal>,
    ops: Vec<OpEnAttente>,
    p: Precision,
}

impl Niveau {
    fn new(p: Precision) -> Self {
        Self {
            valeurs: Vec::new(),
            ops: Vec::new(),
            p,
        }
    }

    fn appliquer(&mut self, op: OpEnAttente) -> Result<(), ErreurCalcul> {
        match op {
            OpEnAttente::Neg => {
                let x = self.valeurs.pop().ok_or_else(|| operande_manquant('-'))?;
                self.valeurs.push(x.neg());
            }
            OpEnAttente::Binaire(o) => {
                let b = self
                    .valeurs
                    .pop()
                    .ok_or_else(|| operande_manquant(o.symbole()))?;
                let a = self
                    .valeurs
                    .pop()
                    .ok_or_else(|| operande_manquant(o.symbole()))?;
                self.valeurs.push(operation_binaire(o, &a, &b, self.p)?);
            }
            OpEnAttente::LPar => {
                return Err(ErreurCalcul::Structure("Unmatched '('".into()));
            }
        }
        Ok(())
    }

    /// Dépile (et applique) tant que le sommet lie au moins aussi fort que `seuil`.
    fn depiler_jusqua(&mut self, seuil: u8) -> Result<(), ErreurCalcul> {
        while let Some(&top) = self.ops.last() {
            if top == OpEnAttente::LPar || top.precedence() < seuil {
                break;
            }
            self.ops.pop();
            self.appliquer(top)?;
        }
        Ok(())
    }

    fn fermer_parenthese(&mut self) -> Result<(), ErreurCalcul> {
        loop {
            match self.ops.pop() {
                None => return Err(ErreurCalcul::Structure("Unmatched ')'".into())),
                Some(OpEnAttente::LPar) => return Ok(()),
                Some(op) => self.appliquer(op)?,
            }
        }
    }

    fn terminer(mut self) -> Result<Decimal, ErreurCalcul> {
        while let Some(op) = self.ops.pop() {
            self.appliquer(op)?;
        }
        match self.valeurs.len() {
            0 => Err(ErreurCalcul::Structure("Empty expression".into())),
            1 => self
                .valeurs
                .pop()
                .ok_or_else(|| ErreurCalcul::Structure("Empty expression".into())),
            _ => Err(ErreurCalcul::Structure("Malformed expression".into())),
        }
    }
}

/// Span de l’argument de `f` : `tokens[debut]` doit être '('.
/// Renvoie le contenu entre parenthèses et l’indice qui suit la ')' correspondante.
fn extraire_argument(
    tokens: &[Tok],
    debut: usize,
    f: Fonction,
) -> Result<(&[Tok], usize), ErreurCalcul> {
    if tokens.get(debut) != Some(&Tok::LPar) {
        return Err(ErreurCalcul::Syntaxe(format!(
            "Expected '(' after function {}",
            f.nom()
        )));
    }

    let mut niveau = 0usize;
    for (j, tok) in tokens.iter().enumerate().skip(debut) {
        match tok {
            Tok::LPar => niveau += 1,
            Tok::RPar => {
                niveau -= 1;
                if niveau == 0 {
                    return Ok((&tokens[debut + 1..j], j + 1));
                }
            }
            _ => {}
        }
    }

    Err(ErreurCalcul::Structure("Unmatched '('".into()))
}

/// Évalue une suite de jetons à la précision `p`.
///
/// Exemple:
///   tokens: [Nombre("2"), Op(Fois), Fonction(Sin), LPar, Nombre("0"), RPar]
///   => 2 * sin(0) = 0
pub fn evaluer_jetons(tokens: &[Tok], p: Precision) -> Result<Decimal, ErreurCalcul> {
    evaluer_niveau(tokens, p, 0)
}

fn evaluer_niveau(tokens: &[Tok], p: Precision, profondeur: usize) -> Result<Decimal, ErreurCalcul> {
    if profondeur > PROFONDEUR_MAX {
        return Err(ErreurCalcul::Structure("Nesting too deep".into()));
    }

    let mut niv = Niveau::new(p);

    // vrai quand le jeton suivant doit être un opérande (sert au moins unaire)
    let mut attend_operande = true;

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Tok::Nombre(lit) => {
                niv.valeurs.push(lire_nombre(lit, p)?);
                attend_operande = false;
            }

            Tok::Constante(c) => {
                niv.valeurs.push(constante(*c, p)?);
                attend_operande = false;
            }

            Tok::Ident(nom) => return Err(ErreurCalcul::JetonInconnu(nom.clone())),

            Tok::Op(Operateur::Moins) if attend_operande => {
                // littéral juste derrière : on replie le signe dedans
                if let Some(Tok::Nombre(lit)) = tokens.get(i + 1) {
                    niv.valeurs.push(lire_nombre(lit, p)?.neg());
                    attend_operande = false;
                    i += 2;
                    continue;
                }
                niv.ops.push(OpEnAttente::Neg);
            }

            Tok::Op(op) => {
                let op = OpEnAttente::Binaire(*op);
                niv.depiler_jusqua(op.precedence())?;
                niv.ops.push(op);
                attend_operande = true;
            }

            Tok::LPar => {
                niv.ops.push(OpEnAttente::LPar);
                attend_operande = true;
            }

            Tok::RPar => {
                niv.fermer_parenthese()?;
                attend_operande = false;
            }

            Tok::Factorielle => {
                let x = niv.valeurs.pop().ok_or_else(|| operande_manquant('!'))?;
                niv.valeurs.push(factorielle(&x, p)?);
                attend_operande = false;
            }

            Tok::Fonction(f) => {
                let (argument, suivant) = extraire_argument(tokens, i + 1, *f)?;
                trace!(
                    fonction = f.nom(),
                    profondeur,
                    argument = %format_tokens(argument),
                    "argument de fonction"
                );
                let x = evaluer_niveau(argument, p, profondeur + 1)?;
                niv.valeurs.push(appliquer_fonction(*f, &x, p)?);
                attend_operande = false;
                i = suivant;
                continue;
            }
        }
        i += 1;
    }

    niv.terminer()
}
