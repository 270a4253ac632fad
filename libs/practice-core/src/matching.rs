//! Answer grading: classifies a typed or spoken answer against its targets.
//!
//! Each target is checked with an ordered cascade where the first rule that
//! fires wins:
//!
//! 1. `exact_match` - normalized forms are equal
//! 2. `accent_only` - equal once diacritics are stripped
//! 3. `token_swap` - one adjacent pair of words is transposed
//! 4. `edit_distance` - Levenshtein distance within 20% of the target length
//! 5. `asr_subsequence` - speech input only, target words appear in order
//!
//! Anything else is `no_match`. With several targets the best verdict wins.

use tracing::debug;

use crate::normalize::{normalize, normalize_no_diacritics};
use crate::types::{AttemptVerdict, ReasonCode, VerdictMetrics};

/// Token count bounds for the adjacent swap rule.
const SWAP_MIN_TOKENS: usize = 2;
const SWAP_MAX_TOKENS: usize = 6;

/// Recognizers may add at most this many filler words.
const ASR_MAX_EXTRA_TOKENS: usize = 3;
const ASR_MIN_COVERAGE: f64 = 0.5;

const EDIT_DISTANCE_RATIO: f64 = 0.2;

/// Options for [`classify`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// The answer came through speech recognition.
    pub is_asr: bool,
}

/// Classify an answer against every acceptable target and keep the best verdict.
///
/// Highest result wins; ties go to the smaller edit distance, then to the
/// earlier target. With no targets the answer is graded against `""`.
pub fn classify(input: &str, targets: &[String], options: ClassifyOptions) -> AttemptVerdict {
    if targets.is_empty() {
        return classify_single(input, "", options);
    }

    let mut best: Option<AttemptVerdict> = None;
    for target in targets {
        let verdict = classify_single(input, target, options);
        best = match best {
            Some(current) if !is_better(&verdict, &current) => Some(current),
            _ => Some(verdict),
        };
    }

    let verdict = best.unwrap_or_else(|| classify_single(input, "", options));
    debug!(
        result = %verdict.result,
        reason = %verdict.reason_code,
        distance = verdict.metrics.distance,
        targets = targets.len(),
        "classified attempt"
    );
    verdict
}

fn is_better(candidate: &AttemptVerdict, current: &AttemptVerdict) -> bool {
    let (a, b) = (candidate.result.ordinal(), current.result.ordinal());
    a > b || (a == b && candidate.metrics.distance < current.metrics.distance)
}

/// Run the rule cascade against one target.
pub fn classify_single(input: &str, target: &str, options: ClassifyOptions) -> AttemptVerdict {
    let mut metrics = base_metrics(input, target);

    let reason_code = if metrics.normalized_input == metrics.normalized_target {
        ReasonCode::ExactMatch
    } else if metrics.normalized_input_no_diacritics == metrics.normalized_target_no_diacritics {
        ReasonCode::AccentOnly
    } else if metrics.token_swap {
        ReasonCode::TokenSwap
    } else if metrics.distance <= metrics.threshold {
        ReasonCode::EditDistance
    } else if options.is_asr
        && is_asr_subsequence(
            &metrics.normalized_input_no_diacritics,
            &metrics.normalized_target_no_diacritics,
        )
    {
        metrics.asr_subsequence = true;
        ReasonCode::AsrSubsequence
    } else {
        ReasonCode::NoMatch
    };

    AttemptVerdict {
        result: reason_code.result(),
        reason_code,
        best_match: target.to_string(),
        metrics,
    }
}

fn base_metrics(input: &str, target: &str) -> VerdictMetrics {
    let normalized_input_no_diacritics = normalize_no_diacritics(input);
    let normalized_target_no_diacritics = normalize_no_diacritics(target);

    let threshold = edit_threshold(&normalized_target_no_diacritics);
    let distance =
        levenshtein_distance(&normalized_input_no_diacritics, &normalized_target_no_diacritics);
    let token_swap =
        is_adjacent_token_swap(&normalized_input_no_diacritics, &normalized_target_no_diacritics);

    VerdictMetrics {
        normalized_input: normalize(input),
        normalized_target: normalize(target),
        normalized_input_no_diacritics,
        normalized_target_no_diacritics,
        distance,
        threshold,
        token_swap,
        asr_subsequence: false,
    }
}

/// `max(1, floor(0.2 * len))` over the diacritic-free target.
pub fn edit_threshold(target: &str) -> usize {
    let len = target.chars().count();
    ((len as f64 * EDIT_DISTANCE_RATIO).floor() as usize).max(1)
}

/// Whether swapping exactly one adjacent pair of input words yields the target.
pub fn is_adjacent_token_swap(input: &str, target: &str) -> bool {
    let input_tokens: Vec<&str> = input.split_whitespace().collect();
    let target_tokens: Vec<&str> = target.split_whitespace().collect();

    let n = input_tokens.len();
    if n != target_tokens.len() || !(SWAP_MIN_TOKENS..=SWAP_MAX_TOKENS).contains(&n) {
        return false;
    }

    (0..n - 1).any(|i| {
        let mut swapped = input_tokens.clone();
        swapped.swap(i, i + 1);
        swapped == target_tokens
    })
}

/// Whether spoken input covers the target words in order, allowing a few
/// extra words around them.
pub fn is_asr_subsequence(input: &str, target: &str) -> bool {
    let input_tokens: Vec<&str> = input.split_whitespace().collect();
    let target_tokens: Vec<&str> = target.split_whitespace().collect();

    if input_tokens.is_empty() || target_tokens.is_empty() {
        return false;
    }
    if input_tokens.len() > target_tokens.len() + ASR_MAX_EXTRA_TOKENS {
        return false;
    }

    let mut cursor = 0;
    for token in &input_tokens {
        if cursor < target_tokens.len() && *token == target_tokens[cursor] {
            cursor += 1;
        }
    }

    let coverage = target_tokens.len() as f64 / input_tokens.len() as f64;
    cursor == target_tokens.len() && coverage >= ASR_MIN_COVERAGE
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Acceptable targets for an exercise: configured answers first, then linked
/// item phrases, without duplicates or blanks.
pub fn collect_targets<'a, A, P>(answers: A, item_phrases: P) -> Vec<String>
where
    A: IntoIterator<Item = &'a String>,
    P: IntoIterator<Item = &'a String>,
{
    let mut targets: Vec<String> = Vec::new();
    for candidate in answers.into_iter().chain(item_phrases) {
        if !candidate.is_empty() && !targets.contains(candidate) {
            targets.push(candidate.clone());
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::strip_diacritics;
    use crate::types::AttemptResult;
    use pretty_assertions::assert_eq;

    fn targets(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const ASR: ClassifyOptions = ClassifyOptions { is_asr: true };

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("très", "tres"), 1);
    }

    #[test]
    fn identical_phrases_are_exact() {
        for phrase in ["bonjour", "Très bien!", "je m'appelle Léa", "", "où est la gare"] {
            let verdict = classify(phrase, &targets(&[phrase]), ClassifyOptions::default());
            assert_eq!(verdict.result, AttemptResult::Exact, "{phrase}");
            assert_eq!(verdict.reason_code, ReasonCode::ExactMatch);
        }
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        let verdict = classify("Bonjour", &targets(&["bonjour"]), ClassifyOptions::default());
        assert_eq!(verdict.result, AttemptResult::Exact);

        let verdict =
            classify("bonjour,le chat", &targets(&["bonjour le chat"]), ClassifyOptions::default());
        assert_eq!(verdict.result, AttemptResult::Exact);
    }

    #[test]
    fn missing_accents_are_near_miss() {
        for phrase in ["très bien", "ça va", "où est la forêt", "café"] {
            let verdict =
                classify(&strip_diacritics(phrase), &targets(&[phrase]), ClassifyOptions::default());
            assert_eq!(verdict.result, AttemptResult::NearMiss, "{phrase}");
            assert_eq!(verdict.reason_code, ReasonCode::AccentOnly);
        }
    }

    #[test]
    fn adjacent_swap_is_near_miss() {
        let verdict = classify("chat le", &targets(&["le chat"]), ClassifyOptions::default());
        assert_eq!(verdict.result, AttemptResult::NearMiss);
        assert_eq!(verdict.reason_code, ReasonCode::TokenSwap);
        assert!(verdict.metrics.token_swap);
    }

    #[test]
    fn swap_rule_respects_token_bounds() {
        assert!(!is_adjacent_token_swap("chat", "chat"));
        assert!(is_adjacent_token_swap("b a c d e f", "a b c d e f"));
        assert!(!is_adjacent_token_swap("b a c d e f g", "a b c d e f g"));
        assert!(!is_adjacent_token_swap("c b a", "a b c"));
        assert!(!is_adjacent_token_swap("le chat noir", "le chat"));
    }

    #[test]
    fn small_typo_is_edit_distance() {
        let verdict =
            classify("je suis fatiguee", &targets(&["je suis fatigué"]), ClassifyOptions::default());
        assert_eq!(verdict.reason_code, ReasonCode::EditDistance);
        assert_eq!(verdict.metrics.distance, 1);
        assert_eq!(verdict.metrics.threshold, 3);
    }

    #[test]
    fn short_targets_allow_one_edit() {
        assert_eq!(edit_threshold("oui"), 1);
        let verdict = classify("ou", &targets(&["oui"]), ClassifyOptions::default());
        assert_eq!(verdict.reason_code, ReasonCode::EditDistance);
    }

    #[test]
    fn metrics_always_carry_distance_and_threshold() {
        let verdict = classify("bonjour", &targets(&["bonjour"]), ClassifyOptions::default());
        assert_eq!(verdict.metrics.distance, 0);
        assert_eq!(verdict.metrics.threshold, 1);
        assert_eq!(verdict.metrics.normalized_target_no_diacritics, "bonjour");
    }

    #[test]
    fn asr_filler_words_are_forgiven() {
        let verdict = classify("oui je suis tres bien", &targets(&["je suis très bien"]), ASR);
        assert_eq!(verdict.result, AttemptResult::NearMiss);
        assert_eq!(verdict.reason_code, ReasonCode::AsrSubsequence);
        assert!(verdict.metrics.asr_subsequence);
    }

    #[test]
    fn asr_rule_only_applies_to_speech() {
        let verdict = classify(
            "oui je suis tres bien",
            &targets(&["je suis très bien"]),
            ClassifyOptions::default(),
        );
        assert_eq!(verdict.result, AttemptResult::Incorrect);
        assert_eq!(verdict.reason_code, ReasonCode::NoMatch);
    }

    #[test]
    fn asr_rule_limits_extra_words() {
        assert!(is_asr_subsequence("bon je parle bien", "je parle"));
        assert!(!is_asr_subsequence("euh alors bon voila je parle", "je parle"));
        // Within the extra-word limit but covering only a third of the input.
        assert!(!is_asr_subsequence("euh oui bon", "oui"));
        assert!(is_asr_subsequence("oui bon", "oui"));
        assert!(!is_asr_subsequence("parle je", "je parle"));
        assert!(!is_asr_subsequence("", "je parle"));
    }

    #[test]
    fn unrelated_answer_is_incorrect() {
        let verdict = classify("au revoir", &targets(&["bonjour"]), ASR);
        assert_eq!(verdict.result, AttemptResult::Incorrect);
        assert_eq!(verdict.reason_code, ReasonCode::NoMatch);
        assert_eq!(verdict.best_match, "bonjour");
    }

    #[test]
    fn empty_targets_are_incorrect() {
        let verdict = classify("bonjour", &[], ClassifyOptions::default());
        assert_eq!(verdict.result, AttemptResult::Incorrect);
        assert_eq!(verdict.reason_code, ReasonCode::NoMatch);
        assert_eq!(verdict.best_match, "");
    }

    #[test]
    fn best_target_wins() {
        let verdict = classify(
            "salut",
            &targets(&["bonjour", "salut", "coucou"]),
            ClassifyOptions::default(),
        );
        assert_eq!(verdict.result, AttemptResult::Exact);
        assert_eq!(verdict.best_match, "salut");
    }

    #[test]
    fn ties_break_on_distance() {
        // Both targets normalize alike, so equal distances keep the earlier target.
        let verdict = classify(
            "merci beaucoupp",
            &targets(&["merci beaucoup!!", "merci beaucoup"]),
            ClassifyOptions::default(),
        );
        assert_eq!(verdict.reason_code, ReasonCode::EditDistance);
        assert_eq!(verdict.best_match, "merci beaucoup!!");

        let verdict = classify(
            "bonjour madame",
            &targets(&["bonsoir madame", "bonjour madam"]),
            ClassifyOptions::default(),
        );
        assert_eq!(verdict.best_match, "bonjour madam");
        assert_eq!(verdict.metrics.distance, 1);
    }

    #[test]
    fn collects_targets_without_duplicates() {
        let answers = targets(&["le chat", "", "un chat"]);
        let phrases = targets(&["le chat", "chat"]);
        assert_eq!(
            collect_targets(&answers, &phrases),
            targets(&["le chat", "un chat", "chat"])
        );
    }
}
