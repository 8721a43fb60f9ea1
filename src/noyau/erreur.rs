// src/noyau/erreur.rs
//
// Erreurs du noyau.
// Tout échec (jetons, structure, domaine) remonte jusqu’au point d’entrée
// sous forme d’ErreurCalcul, puis devient ResultatEval::Erreur(message).

use thiserror::Error;

/// Famille d’erreur, pour l’appelant qui veut trier sans lire le message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenreErreur {
    Entree,
    Syntaxe,
    Structure,
    Domaine,
    JetonInconnu,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErreurCalcul {
    /// Entrée vide, précision nulle.
    #[error("{0}")]
    Entree(String),

    /// Caractère inconnu, nombre mal formé, fonction sans '('.
    #[error("{0}")]
    Syntaxe(String),

    /// Parenthèses, piles vides ou trop pleines.
    #[error("{0}")]
    Structure(String),

    #[error("Division by zero")]
    DivisionParZero,

    /// Factorielle invalide, argument hors domaine, dépassement.
    #[error("{0}")]
    Domaine(String),

    #[error("Unknown token: {0}")]
    JetonInconnu(String),
}

impl ErreurCalcul {
    pub fn genre(&self) -> GenreErreur {
        match self {
            ErreurCalcul::Entree(_) => GenreErreur::Entree,
            ErreurCalcul::Syntaxe(_) => GenreErreur::Syntaxe,
            ErreurCalcul::Structure(_) => GenreErreur::Structure,
            ErreurCalcul::DivisionParZero | ErreurCalcul::Domaine(_) => GenreErreur::Domaine,
            ErreurCalcul::JetonInconnu(_) => GenreErreur::JetonInconnu,
        }
    }
}
