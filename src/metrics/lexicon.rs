//! Word lists shared by the lexical scorers.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    "a about above after again against all also am an and any are aren't as at be because been \
     before being below between both but by can can't cannot could couldn't did didn't do does \
     doesn't doing don't down during each even few for from further get got had hadn't has hasn't \
     have haven't having he her here hers herself him himself his how i i'm i've i'll i'd if in \
     into is isn't it it's its itself just let let's like me more most much must my myself no nor \
     not now of off on once only or other our ours ourselves out over own please same shall she \
     should shouldn't so some such than that that's the their theirs them themselves then there \
     there's these they they're this those through to too under until up upon very was wasn't we \
     we're were weren't what what's when where which while who whom why will with won't would \
     wouldn't yes yet you you'd you'll you're you've your yours yourself yourselves thanks thank \
     hello hi hey okay ok sure well really one thing things way make know want need see use try \
     tell give going"
        .split_whitespace()
        .collect()
});

/// Word valences on a [-4, 4] scale, read by the first sentiment estimator.
pub static VALENCE: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("amazing", 2.8),
        ("appreciate", 2.0),
        ("appreciated", 2.3),
        ("awesome", 3.1),
        ("beautiful", 2.9),
        ("best", 3.2),
        ("better", 1.9),
        ("brilliant", 2.8),
        ("calm", 1.3),
        ("cool", 1.3),
        ("delighted", 3.0),
        ("easy", 1.9),
        ("enjoy", 2.2),
        ("excellent", 2.7),
        ("excited", 1.4),
        ("fantastic", 2.6),
        ("fine", 0.8),
        ("fixed", 1.1),
        ("glad", 2.0),
        ("good", 1.9),
        ("grateful", 2.0),
        ("great", 3.1),
        ("happy", 2.7),
        ("helpful", 1.8),
        ("hope", 1.9),
        ("impressive", 2.3),
        ("kind", 2.4),
        ("like", 1.5),
        ("love", 3.2),
        ("lovely", 2.8),
        ("nice", 1.8),
        ("perfect", 2.7),
        ("pleased", 1.9),
        ("pleasure", 2.7),
        ("resolved", 1.4),
        ("smooth", 1.1),
        ("solved", 1.1),
        ("success", 2.7),
        ("successful", 2.8),
        ("super", 2.9),
        ("support", 1.7),
        ("thank", 1.5),
        ("thanks", 1.9),
        ("thankful", 2.7),
        ("useful", 1.9),
        ("welcome", 2.0),
        ("well", 1.1),
        ("wonderful", 2.7),
        ("works", 1.0),
        ("yay", 2.4),
        ("yes", 1.7),
        ("angry", -2.3),
        ("annoyed", -1.6),
        ("annoying", -1.7),
        ("awful", -2.0),
        ("bad", -2.5),
        ("broken", -1.8),
        ("bug", -1.3),
        ("confused", -1.3),
        ("confusing", -0.9),
        ("crash", -1.7),
        ("damn", -1.7),
        ("disappointed", -1.9),
        ("disappointing", -2.2),
        ("error", -1.7),
        ("fail", -2.5),
        ("failed", -2.3),
        ("failure", -2.3),
        ("frustrated", -2.4),
        ("frustrating", -1.9),
        ("hate", -2.7),
        ("horrible", -2.5),
        ("issue", -0.6),
        ("lost", -1.3),
        ("mad", -2.2),
        ("mess", -1.5),
        ("miserable", -2.2),
        ("poor", -2.1),
        ("problem", -1.7),
        ("rude", -2.0),
        ("sad", -2.1),
        ("slow", -0.8),
        ("sorry", -0.3),
        ("stuck", -1.0),
        ("stupid", -2.4),
        ("terrible", -2.1),
        ("ugly", -2.3),
        ("unfortunately", -1.4),
        ("unhappy", -1.8),
        ("upset", -1.6),
        ("useless", -1.8),
        ("waste", -1.8),
        ("worried", -1.2),
        ("worse", -2.1),
        ("worst", -3.1),
        ("wrong", -2.1),
    ]
    .into_iter()
    .collect()
});

/// Intensity shift applied to the following valence word.
pub static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    const INCR: f64 = 0.293;
    const DECR: f64 = -0.293;
    [
        ("absolutely", INCR),
        ("completely", INCR),
        ("extremely", INCR),
        ("highly", INCR),
        ("incredibly", INCR),
        ("really", INCR),
        ("so", INCR),
        ("totally", INCR),
        ("very", INCR),
        ("super", INCR),
        ("barely", DECR),
        ("hardly", DECR),
        ("kinda", DECR),
        ("slightly", DECR),
        ("somewhat", DECR),
        ("little", DECR),
        ("marginally", DECR),
    ]
    .into_iter()
    .collect()
});

pub static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    "not no never none nothing nowhere neither nor cannot can't don't doesn't didn't isn't aren't \
     wasn't weren't won't wouldn't shouldn't couldn't hasn't haven't hadn't without"
        .split_whitespace()
        .collect()
});

/// Adjective polarities on a [-1, 1] scale, read by the second estimator.
pub static POLARITY: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("amazing", 0.6),
        ("awesome", 1.0),
        ("beautiful", 0.85),
        ("best", 1.0),
        ("better", 0.5),
        ("brilliant", 0.9),
        ("clear", 0.1),
        ("cool", 0.35),
        ("easy", 0.43),
        ("excellent", 1.0),
        ("fantastic", 0.4),
        ("fine", 0.42),
        ("glad", 0.5),
        ("good", 0.7),
        ("grateful", 0.5),
        ("great", 0.8),
        ("happy", 0.8),
        ("helpful", 0.5),
        ("kind", 0.6),
        ("lovely", 0.5),
        ("nice", 0.6),
        ("perfect", 1.0),
        ("pleased", 0.5),
        ("quick", 0.33),
        ("right", 0.29),
        ("simple", 0.1),
        ("smooth", 0.4),
        ("super", 0.33),
        ("useful", 0.3),
        ("welcome", 0.8),
        ("wonderful", 1.0),
        ("angry", -0.5),
        ("annoying", -0.8),
        ("awful", -1.0),
        ("bad", -0.7),
        ("broken", -0.4),
        ("confused", -0.4),
        ("confusing", -0.4),
        ("difficult", -0.5),
        ("disappointed", -0.75),
        ("disappointing", -0.6),
        ("frustrated", -0.7),
        ("frustrating", -0.6),
        ("hard", -0.29),
        ("horrible", -1.0),
        ("mad", -0.63),
        ("poor", -0.4),
        ("rude", -0.3),
        ("sad", -0.5),
        ("slow", -0.3),
        ("sorry", -0.5),
        ("stupid", -0.8),
        ("terrible", -1.0),
        ("ugly", -0.7),
        ("unclear", -0.2),
        ("unhappy", -0.6),
        ("useless", -0.5),
        ("worse", -0.4),
        ("worst", -1.0),
        ("wrong", -0.5),
    ]
    .into_iter()
    .collect()
});

/// Multipliers applied to the next polarity word by the second estimator.
pub static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("extremely", 1.5),
        ("so", 1.3),
        ("super", 1.3),
        ("incredibly", 1.5),
        ("totally", 1.3),
        ("quite", 1.1),
        ("pretty", 1.1),
        ("slightly", 0.6),
        ("somewhat", 0.7),
        ("fairly", 0.8),
    ]
    .into_iter()
    .collect()
});

/// Phrases that mark an assistant turn as a hedge or fallback.
pub const HEDGES: &[&str] = &[
    "sorry",
    "not sure",
    "unclear",
    "maybe",
    "i don't know",
    "i do not know",
    "i'm not certain",
    "not certain",
    "i cannot help",
    "i can't help",
    "unable to",
    "perhaps",
    "could you rephrase",
    "don't understand",
    "do not understand",
];
