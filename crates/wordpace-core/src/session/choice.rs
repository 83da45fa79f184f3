//! Multiple-choice question assembly.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::wordbook::WordEntry;

/// One five-option multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceQuestion {
    /// English headword being asked.
    pub prompt: String,
    /// Korean meanings to pick from, at most five.
    pub options: Vec<String>,
    /// Index of the correct meaning within `options`.
    pub answer: usize,
}

/// Builds the option list for `word`: its meaning plus up to four
/// distractor meanings drawn from `pool`.
///
/// Distractors are sampled without replacement and deduplicated by meaning
/// text against everything already taken (the correct meaning included),
/// so a homogeneous pool can yield fewer than five options. The final list
/// is shuffled again before display.
pub fn build_choice_question(
    word: &WordEntry,
    pool: &[WordEntry],
    rng: &mut impl Rng,
) -> ChoiceQuestion {
    let mut candidates: Vec<&WordEntry> = pool.iter().collect();
    candidates.shuffle(rng);

    let mut options = vec![word.korean.clone()];
    for candidate in candidates {
        if options.len() == 5 {
            break;
        }
        if options.iter().any(|taken| *taken == candidate.korean) {
            continue;
        }
        options.push(candidate.korean.clone());
    }
    options.shuffle(rng);

    let answer = options
        .iter()
        .position(|option| *option == word.korean)
        .unwrap_or(0);
    ChoiceQuestion {
        prompt: word.english.clone(),
        options,
        answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn make_word(number: u32, english: &str, korean: &str) -> WordEntry {
        WordEntry {
            number,
            textbook: "Basic English".to_string(),
            major: "Ch1".to_string(),
            minor: "U1".to_string(),
            unit_name: "Unit 1".to_string(),
            english: english.to_string(),
            korean: korean.to_string(),
        }
    }

    fn make_pool(count: u32) -> Vec<WordEntry> {
        (1..=count)
            .map(|n| make_word(n, &format!("word{n}"), &format!("뜻{n}")))
            .collect()
    }

    #[test]
    fn builds_five_options_with_the_correct_meaning() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        let word = make_word(100, "apple", "사과");
        let question = build_choice_question(&word, &make_pool(10), &mut rng);

        assert_eq!(question.prompt, "apple");
        assert_eq!(question.options.len(), 5);
        assert_eq!(question.options[question.answer], "사과");
        assert_eq!(
            question.options.iter().filter(|o| *o == "사과").count(),
            1
        );
    }

    #[test]
    fn distractors_are_unique_by_meaning() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        // Every pool word shares one meaning, so only one distractor fits.
        let pool: Vec<WordEntry> = (1..=8).map(|n| make_word(n, &format!("w{n}"), "같은 뜻")).collect();
        let word = make_word(100, "apple", "사과");
        let question = build_choice_question(&word, &pool, &mut rng);

        assert_eq!(question.options.len(), 2);
        assert!(question.options.contains(&"사과".to_string()));
        assert!(question.options.contains(&"같은 뜻".to_string()));
    }

    #[test]
    fn the_words_own_meaning_is_never_a_distractor() {
        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        let mut pool = make_pool(6);
        // The word under test also sits in the pool, as in review rounds.
        pool.push(make_word(100, "apple", "사과"));
        let word = make_word(100, "apple", "사과");

        for _ in 0..20 {
            let question = build_choice_question(&word, &pool, &mut rng);
            assert_eq!(
                question.options.iter().filter(|o| *o == "사과").count(),
                1
            );
        }
    }

    #[test]
    fn empty_pool_yields_only_the_correct_option() {
        let mut rng = Mcg128Xsl64::seed_from_u64(5);
        let word = make_word(100, "apple", "사과");
        let question = build_choice_question(&word, &[], &mut rng);
        assert_eq!(question.options, vec!["사과".to_string()]);
        assert_eq!(question.answer, 0);
    }

    #[test]
    fn same_seed_builds_the_same_question() {
        let word = make_word(100, "apple", "사과");
        let pool = make_pool(12);
        let mut rng_a = Mcg128Xsl64::seed_from_u64(42);
        let mut rng_b = Mcg128Xsl64::seed_from_u64(42);
        assert_eq!(
            build_choice_question(&word, &pool, &mut rng_a),
            build_choice_question(&word, &pool, &mut rng_b)
        );
    }
}
