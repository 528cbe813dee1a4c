//! Tidy-up suggestions for brain-dumped task text.
//!
//! Input is typed fast and often on a phone. [`suggest`] offers a cleaned
//! version (typos and shorthand fixed, capitalised, whitespace and repeated
//! punctuation collapsed) that the user may submit instead of the raw text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

#[rustfmt::skip]
const TYPOS: &[(&str, &str)] = &[
    ("teh", "the"), ("hte", "the"), ("thier", "their"), ("recieve", "receive"),
    ("acheive", "achieve"), ("occured", "occurred"), ("seperate", "separate"),
    ("definately", "definitely"), ("definitly", "definitely"), ("occurance", "occurrence"),
    ("accomodate", "accommodate"), ("apparantly", "apparently"), ("calender", "calendar"),
    ("catagory", "category"), ("cemetary", "cemetery"), ("collegue", "colleague"),
    ("comming", "coming"), ("commitee", "committee"), ("completly", "completely"),
    ("concious", "conscious"), ("curiousity", "curiosity"), ("decieve", "deceive"),
    ("dissapear", "disappear"), ("dissapoint", "disappoint"), ("embarass", "embarrass"),
    ("enviroment", "environment"), ("exagerate", "exaggerate"), ("excercise", "exercise"),
    ("existance", "existence"), ("experiance", "experience"), ("foriegn", "foreign"),
    ("freind", "friend"), ("gaurd", "guard"), ("goverment", "government"),
    ("grammer", "grammar"), ("harrass", "harass"), ("immediatly", "immediately"),
    ("independant", "independent"), ("intresting", "interesting"), ("knowlege", "knowledge"),
    ("libary", "library"), ("lisence", "license"), ("maintenence", "maintenance"),
    ("manuever", "maneuver"), ("millenium", "millennium"), ("minature", "miniature"),
    ("mispell", "misspell"), ("neccessary", "necessary"), ("noticable", "noticeable"),
    ("occasionaly", "occasionally"), ("occurence", "occurrence"), ("paralel", "parallel"),
    ("parliment", "parliament"), ("persistant", "persistent"), ("posession", "possession"),
    ("potatos", "potatoes"), ("preceed", "precede"), ("privelege", "privilege"),
    ("professer", "professor"), ("publically", "publicly"), ("realy", "really"),
    ("refered", "referred"), ("relevent", "relevant"), ("religous", "religious"),
    ("repitition", "repetition"), ("resistence", "resistance"), ("rythm", "rhythm"),
    ("shedule", "schedule"), ("sieze", "seize"), ("similiar", "similar"),
    ("succesful", "successful"), ("suprise", "surprise"), ("tommorow", "tomorrow"),
    ("tommorrow", "tomorrow"), ("tounge", "tongue"), ("truely", "truly"),
    ("untill", "until"), ("unusuall", "unusual"), ("vaccuum", "vacuum"),
    ("wierd", "weird"), ("wellcome", "welcome"), ("wheather", "weather"),
    ("wich", "which"), ("writting", "writing"), ("yuor", "your"),
    ("adn", "and"), ("ahve", "have"), ("cna", "can"), ("dnt", "don't"),
    ("intrested", "interested"), ("intrest", "interest"), ("alot", "a lot"),
    ("definetly", "definitely"), ("probly", "probably"), ("prolly", "probably"),
    ("gotta", "got to"), ("gonna", "going to"), ("wanna", "want to"),
    ("kinda", "kind of"), ("sorta", "sort of"), ("shoulda", "should have"),
    ("coulda", "could have"), ("woulda", "would have"),
    ("dont", "don't"), ("doesnt", "doesn't"), ("cant", "can't"), ("wont", "won't"),
    ("shouldnt", "shouldn't"), ("wouldnt", "wouldn't"), ("isnt", "isn't"),
    ("wasnt", "wasn't"), ("havent", "haven't"), ("hadnt", "hadn't"),
    ("didnt", "didn't"), ("im", "I'm"), ("ive", "I've"), ("id", "I'd"),
    ("ill", "I'll"), ("ur", "your"), ("u", "you"), ("r", "are"),
    ("pls", "please"), ("thx", "thanks"), ("msg", "message"),
    ("tmrw", "tomorrow"), ("tmr", "tomorrow"), ("w/", "with"),
    ("b/c", "because"), ("bc", "because"), ("govt", "government"),
    ("appt", "appointment"), ("apt", "apartment"), ("hw", "homework"),
    ("asap", "ASAP"), ("rn", "right now"), ("nvm", "never mind"),
];

static TYPO_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| TYPOS.iter().copied().collect());

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));
static LONE_I: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bi\b").expect("valid pronoun regex"));
static REPEATED_PUNCT: LazyLock<[(Regex, &'static str); 3]> = LazyLock::new(|| {
    [
        (Regex::new(r"\.{2,}").expect("valid punctuation regex"), "."),
        (Regex::new(r"!{2,}").expect("valid punctuation regex"), "!"),
        (Regex::new(r"\?{2,}").expect("valid punctuation regex"), "?"),
    ]
});

const TRAILING_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':'];

fn fix_word(word: &str) -> String {
    let bare = word.trim_end_matches(TRAILING_PUNCT);
    let suffix = &word[bare.len()..];
    match TYPO_MAP.get(bare.to_lowercase().as_str()) {
        Some(fixed) => format!("{fixed}{suffix}"),
        None => word.to_string(),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cleaned version of `text`; empty when the input is blank.
pub fn cleanup(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let collapsed = WHITESPACE_RUN.replace_all(trimmed, " ");
    let fixed: Vec<String> = collapsed.split(' ').map(fix_word).collect();
    let mut cleaned = capitalize_first(&fixed.join(" "));

    cleaned = LONE_I.replace_all(&cleaned, "I").into_owned();
    for (pattern, single) in REPEATED_PUNCT.iter() {
        cleaned = pattern.replace_all(&cleaned, *single).into_owned();
    }
    cleaned
}

/// The cleaned text, when it differs from what was typed and the input is
/// long enough to be worth correcting.
pub fn suggest(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let cleaned = cleanup(raw);
    if !cleaned.is_empty() && cleaned != raw && raw.chars().count() > 2 {
        Some(cleaned)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixes_typos_and_capitalises() {
        assert_eq!(cleanup("call teh dentist tmrw"), "Call the dentist tomorrow");
    }

    #[test]
    fn keeps_trailing_punctuation_on_fixed_words() {
        assert_eq!(cleanup("email freind, then pls rest!"), "Email friend, then please rest!");
    }

    #[test]
    fn collapses_whitespace_and_repeated_punctuation() {
        assert_eq!(cleanup("  do   it now!!!  "), "Do it now!");
        assert_eq!(cleanup("why??"), "Why?");
    }

    #[test]
    fn lone_i_is_capitalised() {
        assert_eq!(cleanup("tell him i said hi"), "Tell him I said hi");
    }

    #[test]
    fn shorthand_expands_to_contractions() {
        assert_eq!(cleanup("dont forget keys"), "Don't forget keys");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(cleanup("   "), "");
        assert!(suggest("   ").is_none());
    }

    #[test]
    fn suggest_only_when_different_and_long_enough() {
        assert_eq!(suggest("buy milk").as_deref(), Some("Buy milk"));
        assert!(suggest("Buy milk").is_none());
        assert!(suggest("hw").is_none());
    }
}
