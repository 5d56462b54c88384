//! Deterministic substitutes for failed gateway calls.

use assess_domain::{Criterion, Evaluation};

/// Opening text used when the first question cannot be phrased remotely.
pub const WELCOME_FALLBACK: &str = "Bienvenue sur DigiAssistant ! 👋 Je suis votre assistant intelligent pour évaluer la maturité digitale de votre entreprise. À travers des questions interactives, je vais vous guider étape par étape pour vous aider à comprendre et améliorer votre transformation numérique. Prêt(e) à commencer votre parcours digital ? 🚀\n\nPensez-vous que le digital est essentiel pour l'avenir de votre entreprise ?";

/// Score given when the evaluator is rate-limited.
pub const NEUTRAL_SCORE: u8 = 1;

pub const NEUTRAL_JUSTIFICATION: &str =
    "Évaluation par défaut - service temporairement indisponible.";

pub const NEUTRAL_REACTION: &str = "Merci pour votre réponse. Continuons.";

pub const SKIP_NOTICE: &str =
    "d'après vos réponses précédentes, passons à la prochaine dimension.";

/// Question derived from the criterion prompt.
pub fn question_for(criterion: &Criterion) -> String {
    format!("Pouvez-vous me parler de: {}?", criterion.prompt_text)
}

pub fn neutral_evaluation() -> Evaluation {
    Evaluation::saturating(NEUTRAL_SCORE, NEUTRAL_JUSTIFICATION)
}

pub fn completion_text(reaction: &str) -> String {
    format!(
        "{} merci pour votre réponse. Nous avons terminé le diagnostic. Nous allons maintenant préparer votre rapport.",
        reaction
    )
}

/// Reaction, optional skip notice and next question joined for display.
pub fn turn_text(reaction: &str, skipped: bool, question: &str) -> String {
    if skipped {
        format!("{} {} {}", reaction, SKIP_NOTICE, question)
    } else {
        format!("{} {}", reaction, question)
    }
}
