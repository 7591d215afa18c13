// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn lexicon_is_sorted_and_unique() {
    for pair in LEXICON.windows(2) {
        assert!(pair[0].0 < pair[1].0, "{} must sort before {}", pair[0].0, pair[1].0);
    }
}

#[test]
fn word_score_lookup() {
    assert_eq!(word_score("happy"), Some(3));
    assert_eq!(word_score("terrible"), Some(-3));
    assert_eq!(word_score("table"), None);
}

#[parameterized(
    empty = { "", 0, Mood::Neutral },
    unknown_words = { "went to the shop", 0, Mood::Neutral },
    happy = { "Such a wonderful, amazing day!", 8, Mood::Happy },
    good = { "It was fine", 2, Mood::Good },
    bad = { "a bit tired", -2, Mood::Bad },
    sad = { "I feel lonely and miserable", -5, Mood::Sad },
    mixed = { "tired but happy", 1, Mood::Good },
)]
fn analyze_scores_text(text: &str, score: i32, mood: Mood) {
    let emotion = analyze(text);
    assert_eq!(emotion.score, score);
    assert_eq!(emotion.mood, mood);
}

#[parameterized(
    not_happy = { "not happy", -3 },
    dont_worry = { "don't worry", 3 },
    never_bored = { "never bored", 2 },
)]
fn negator_flips_next_scored_word(text: &str, score: i32) {
    assert_eq!(analyze(text).score, score);
}

#[test]
fn negation_does_not_carry_past_next_word() {
    // "not" applies to "really", which has no score, so "happy" stays positive.
    assert_eq!(analyze("not really happy").score, 3);
}

#[test]
fn scoring_ignores_case_and_punctuation() {
    assert_eq!(analyze("HAPPY!!!").score, analyze("happy").score);
    assert_eq!(analyze("'great'").score, 3);
}
