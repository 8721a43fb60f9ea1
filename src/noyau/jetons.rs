// src/noyau/jetons.rs

use super::erreur::ErreurCalcul;

/// Opérateurs binaires. `/` et `÷` sont deux graphies de la même division.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Slash,
    Obelus, // ÷
    Caret,  // ^
}

impl Operateur {
    pub fn symbole(self) -> char {
        match self {
            Operateur::Plus => '+',
            Operateur::Moins => '-',
            Operateur::Fois => '*',
            Operateur::Slash => '/',
            Operateur::Obelus => '÷',
            Operateur::Caret => '^',
        }
    }

    fn depuis_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operateur::Plus),
            '-' => Some(Operateur::Moins),
            '*' => Some(Operateur::Fois),
            '/' => Some(Operateur::Slash),
            '÷' => Some(Operateur::Obelus),
            '^' => Some(Operateur::Caret),
            _ => None,
        }
    }
}

/// Fonctions unaires reconnues (liste fermée).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,
    Sinh,
    Cosh,
    Tanh,
    Racine, // √
    Log,    // base 10
    Ln,
    Exp,
}

impl Fonction {
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        let f = match nom {
            "sin" => Fonction::Sin,
            "cos" => Fonction::Cos,
            "tan" => Fonction::Tan,
            "arcsin" => Fonction::Arcsin,
            "arccos" => Fonction::Arccos,
            "arctan" => Fonction::Arctan,
            "sinh" => Fonction::Sinh,
            "cosh" => Fonction::Cosh,
            "tanh" => Fonction::Tanh,
            "√" => Fonction::Racine,
            "log" => Fonction::Log,
            "ln" => Fonction::Ln,
            "exp" => Fonction::Exp,
            _ => return None,
        };
        Some(f)
    }

    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Arcsin => "arcsin",
            Fonction::Arccos => "arccos",
            Fonction::Arctan => "arctan",
            Fonction::Sinh => "sinh",
            Fonction::Cosh => "cosh",
            Fonction::Tanh => "tanh",
            Fonction::Racine => "√",
            Fonction::Log => "log",
            Fonction::Ln => "ln",
            Fonction::Exp => "exp",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constante {
    Pi,
    E,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    // Texte littéral ; la conversion en Decimal se fait à l’évaluation (précision connue).
    Nombre(String),

    // Suite de lettres qui n’est ni une fonction ni une constante.
    // L’évaluateur la rejette (jeton inconnu).
    Ident(String),

    Fonction(Fonction),
    Constante(Constante),
    Op(Operateur),

    LPar,
    RPar,
    Factorielle, // ! postfixé
}

/// Nature de l’accumulation en cours.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Genre {
    Nombre,
    Mot,
}

/// Accumulateur : une seule suite (nombre OU mot) à la fois.
struct Courant {
    texte: String,
    genre: Option<Genre>,
}

impl Courant {
    fn new() -> Self {
        Self {
            texte: String::new(),
            genre: None,
        }
    }

    fn est(&self, genre: Genre) -> bool {
        self.genre == Some(genre)
    }

    fn dernier(&self) -> Option<char> {
        self.texte.chars().last()
    }

    fn pousser(&mut self, genre: Genre, c: char, out: &mut Vec<Tok>) {
        if self.genre.is_some() && !self.est(genre) {
            self.vider(out);
        }
        self.genre = Some(genre);
        self.texte.push(c);
    }

    fn vider(&mut self, out: &mut Vec<Tok>) {
        let texte = std::mem::take(&mut self.texte);
        match self.genre.take() {
            None => {}
            Some(Genre::Nombre) => out.push(Tok::Nombre(texte)),
            Some(Genre::Mot) => out.push(resoudre_mot(texte)),
        }
    }
}

/// Mot → fonction, constante e, ou identifiant inconnu.
fn resoudre_mot(mot: String) -> Tok {
    if let Some(f) = Fonction::depuis_nom(&mot) {
        return Tok::Fonction(f);
    }
    if mot == "e" {
        return Tok::Constante(Constante::E);
    }
    Tok::Ident(mot)
}

/// Tokenize une chaîne en jetons (ordre de lecture, gauche à droite).
/// Supporte:
/// - nombres décimaux avec exposant collé : 12, 0.5, .5, 1.5E-3
/// - opérateurs + - * / ÷ ^, factorielle !, parenthèses
/// - √ et les noms de fonctions (sin, arccos, ln…)
/// - constantes π et e
///
/// Les espaces sont ignorés sans couper l’accumulation : "1 2" donne 12.
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurCalcul> {
    let mut out = Vec::new();
    let mut cur = Courant::new();

    for c in s.chars() {
        let dans_nombre = cur.est(Genre::Nombre);

        if c.is_ascii_digit() || c == '.' {
            cur.pousser(Genre::Nombre, c, &mut out);
        } else if c == 'E' && dans_nombre && cur.dernier().is_some_and(|d| d.is_ascii_digit()) {
            // exposant collé au chiffre : 1E5
            cur.pousser(Genre::Nombre, c, &mut out);
        } else if (c == '+' || c == '-') && dans_nombre && cur.dernier() == Some('E') {
            // signe de l’exposant : 1E-5
            cur.pousser(Genre::Nombre, c, &mut out);
        } else if c == 'π' {
            cur.vider(&mut out);
            out.push(Tok::Constante(Constante::Pi));
        } else if c.is_alphabetic() {
            cur.pousser(Genre::Mot, c, &mut out);
        } else if let Some(op) = Operateur::depuis_char(c) {
            cur.vider(&mut out);
            out.push(Tok::Op(op));
        } else if c == '(' || c == ')' || c == '√' || c == '!' {
            cur.vider(&mut out);
            out.push(match c {
                '(' => Tok::LPar,
                ')' => Tok::RPar,
                '√' => Tok::Fonction(Fonction::Racine),
                _ => Tok::Factorielle,
            });
        } else if c.is_whitespace() {
            continue;
        } else {
            return Err(ErreurCalcul::Syntaxe(format!("Invalid char: {c}")));
        }
    }

    cur.vider(&mut out);
    Ok(out)
}

/// Format utilitaire (journal) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Tok::Nombre(lit) => lit.clone(),
            Tok::Ident(nom) => nom.clone(),
            Tok::Fonction(f) => f.nom().to_string(),
            Tok::Constante(Constante::Pi) => "π".to_string(),
            Tok::Constante(Constante::E) => "e".to_string(),
            Tok::Op(op) => op.symbole().to_string(),
            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Factorielle => "!".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
