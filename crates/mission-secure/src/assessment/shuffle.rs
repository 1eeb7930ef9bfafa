use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::QuestionCatalog;
use super::domain::Question;

/// Copy the catalog into a fresh presentation order.
///
/// Question order and each question's option order are permuted independently
/// with Fisher-Yates, so answer position carries no signal. The catalog itself
/// is never touched.
pub fn shuffle_questions<R>(catalog: &QuestionCatalog, rng: &mut R) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    let mut questions = catalog.questions().to_vec();
    questions.shuffle(rng);
    for question in &mut questions {
        question.options.shuffle(rng);
    }
    questions
}

pub fn shuffle_questions_thread_rng(catalog: &QuestionCatalog) -> Vec<Question> {
    shuffle_questions(catalog, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::standard_catalog;
    use crate::assessment::domain::AnswerWeight;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    const TRIALS: usize = 5_000;

    /// Chi-square statistic of observed counts against a uniform expectation.
    fn chi_square(observed: &[usize], trials: usize) -> f64 {
        let expected = trials as f64 / observed.len() as f64;
        observed
            .iter()
            .map(|&count| {
                let delta = count as f64 - expected;
                delta * delta / expected
            })
            .sum()
    }

    #[test]
    fn shuffle_keeps_every_question_and_option() {
        let catalog = standard_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = shuffle_questions(catalog, &mut rng);

        let original: BTreeSet<_> = catalog.ids().cloned().collect();
        let reordered: BTreeSet<_> = shuffled.iter().map(|q| q.id.clone()).collect();
        assert_eq!(original, reordered);

        for question in &shuffled {
            let source = catalog.get(question.id.as_str()).expect("question in catalog");
            let mut expected = source.options.clone();
            let mut actual = question.options.clone();
            expected.sort_by(|a, b| a.label.cmp(&b.label));
            actual.sort_by(|a, b| a.label.cmp(&b.label));
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn shuffle_leaves_catalog_untouched() {
        let catalog = QuestionCatalog::standard();
        let before = catalog.clone();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let _ = shuffle_questions(&catalog, &mut rng);
        }
        assert_eq!(before, catalog);
    }

    #[test]
    fn question_positions_are_uniform() {
        let catalog = standard_catalog();
        let mut rng = StdRng::seed_from_u64(2024);
        let slots = catalog.len();
        let mut first_question_position = vec![0usize; slots];

        for _ in 0..TRIALS {
            let shuffled = shuffle_questions(catalog, &mut rng);
            let position = shuffled
                .iter()
                .position(|question| question.id.as_str() == "q1")
                .expect("q1 present");
            first_question_position[position] += 1;
        }

        // 9 degrees of freedom, p = 0.001 critical value is 27.88.
        let statistic = chi_square(&first_question_position, TRIALS);
        assert!(statistic < 27.88, "chi-square {statistic} too large");
    }

    #[test]
    fn option_positions_are_uniform() {
        let catalog = standard_catalog();
        let mut rng = StdRng::seed_from_u64(99);
        let mut best_position = [0usize; 3];

        for _ in 0..TRIALS {
            let shuffled = shuffle_questions(catalog, &mut rng);
            let question = shuffled
                .iter()
                .find(|question| question.id.as_str() == "q5")
                .expect("q5 present");
            let position = question
                .options
                .iter()
                .position(|option| option.weight == AnswerWeight::Best)
                .expect("best option present");
            best_position[position] += 1;
        }

        // 2 degrees of freedom, p = 0.001 critical value is 13.82.
        let statistic = chi_square(&best_position, TRIALS);
        assert!(statistic < 13.82, "chi-square {statistic} too large");
    }
}
