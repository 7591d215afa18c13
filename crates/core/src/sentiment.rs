// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lexicon-based sentiment scoring for diary entries.
//!
//! Each known word carries an integer valence in `-5..=5` (AFINN style). The
//! entry score is the sum over all tokens; a negator directly before a scored
//! word flips that word's sign. The score is then bucketed into a [`Mood`].

use crate::entry::Mood;

/// Score and mood computed for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emotion {
    pub score: i32,
    pub mood: Mood,
}

/// Word valences, sorted by word for binary search.
const LEXICON: &[(&str, i32)] = &[
    ("abandoned", -2),
    ("afraid", -2),
    ("alone", -2),
    ("amazing", 4),
    ("angry", -3),
    ("annoyed", -2),
    ("anxious", -2),
    ("ashamed", -2),
    ("awesome", 4),
    ("awful", -3),
    ("bad", -3),
    ("beautiful", 3),
    ("best", 3),
    ("better", 2),
    ("blessed", 3),
    ("bored", -2),
    ("boring", -3),
    ("brilliant", 4),
    ("broken", -1),
    ("calm", 2),
    ("cheerful", 2),
    ("confident", 2),
    ("confused", -2),
    ("content", 2),
    ("cried", -2),
    ("cry", -1),
    ("crying", -2),
    ("delighted", 3),
    ("depressed", -2),
    ("desperate", -3),
    ("disappointed", -2),
    ("disaster", -2),
    ("down", -1),
    ("dread", -2),
    ("ecstatic", 4),
    ("energetic", 2),
    ("enjoy", 2),
    ("enjoyed", 2),
    ("excellent", 3),
    ("excited", 3),
    ("exhausted", -2),
    ("fail", -2),
    ("failed", -2),
    ("fantastic", 4),
    ("fear", -2),
    ("fine", 2),
    ("frustrated", -2),
    ("fun", 4),
    ("furious", -3),
    ("glad", 3),
    ("good", 3),
    ("grateful", 3),
    ("great", 3),
    ("grief", -2),
    ("happy", 3),
    ("hate", -3),
    ("hated", -3),
    ("helpless", -2),
    ("hope", 2),
    ("hopeful", 2),
    ("hopeless", -2),
    ("horrible", -3),
    ("hurt", -2),
    ("inspired", 2),
    ("joy", 3),
    ("joyful", 3),
    ("kind", 2),
    ("laugh", 1),
    ("laughed", 1),
    ("lonely", -2),
    ("lost", -3),
    ("love", 3),
    ("loved", 3),
    ("lovely", 3),
    ("lucky", 3),
    ("mad", -3),
    ("miserable", -3),
    ("miss", -2),
    ("nervous", -2),
    ("nice", 3),
    ("overwhelmed", -2),
    ("pain", -2),
    ("panic", -3),
    ("peaceful", 2),
    ("perfect", 3),
    ("pleased", 3),
    ("productive", 2),
    ("proud", 2),
    ("relaxed", 2),
    ("relieved", 2),
    ("rested", 2),
    ("sad", -2),
    ("scared", -2),
    ("sick", -2),
    ("smile", 2),
    ("smiled", 2),
    ("sorry", -1),
    ("stress", -1),
    ("stressed", -2),
    ("stressful", -2),
    ("strong", 2),
    ("stuck", -2),
    ("success", 2),
    ("successful", 3),
    ("suffering", -2),
    ("terrible", -3),
    ("thankful", 2),
    ("tired", -2),
    ("upset", -2),
    ("useless", -2),
    ("warm", 1),
    ("wonderful", 4),
    ("worried", -3),
    ("worry", -3),
    ("worse", -3),
    ("worst", -3),
    ("wow", 4),
];

/// Words that flip the sign of the next scored word.
const NEGATORS: &[&str] = &[
    "aint", "cannot", "cant", "didnt", "doesnt", "dont", "isnt", "never", "no", "not", "wasnt",
    "wont",
];

/// Looks up the valence of a single lower-case word.
pub fn word_score(word: &str) -> Option<i32> {
    LEXICON
        .binary_search_by(|(w, _)| (*w).cmp(word))
        .ok()
        .map(|idx| LEXICON[idx].1)
}

fn is_negator(token: &str) -> bool {
    let bare: String = token.chars().filter(|c| *c != '\'').collect();
    NEGATORS.contains(&bare.as_str())
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Scores a piece of text and buckets it into a mood.
pub fn analyze(text: &str) -> Emotion {
    let mut score = 0i32;
    let mut negate = false;

    for token in tokenize(text) {
        if is_negator(&token) {
            negate = true;
            continue;
        }
        if let Some(value) = word_score(&token) {
            score = score.saturating_add(if negate { -value } else { value });
        }
        negate = false;
    }

    Emotion { score, mood: Mood::from_score(score) }
}

#[cfg(test)]
#[path = "sentiment_tests.rs"]
mod tests;
