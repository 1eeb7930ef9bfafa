use std::collections::{BTreeMap, BTreeSet};

use super::domain::{OptionStats, QuestionStats, QuizStats, ResponseEvent};
use crate::assessment::domain::AnswerTag;

/// Group-by/count of logged responses, per question and option.
pub fn aggregate(quiz_id: &str, events: &[ResponseEvent]) -> QuizStats {
    let mut per_question: BTreeMap<&str, BTreeMap<&str, (AnswerTag, usize)>> = BTreeMap::new();
    let mut sessions = BTreeSet::new();

    for event in events.iter().filter(|event| event.quiz_id == quiz_id) {
        sessions.insert(event.session_id.as_str());
        let entry = per_question
            .entry(event.question_id.as_str())
            .or_default()
            .entry(event.option_label.as_str())
            .or_insert((event.option_tag, 0));
        entry.1 += 1;
    }

    let questions: Vec<QuestionStats> = per_question
        .into_iter()
        .map(|(question_id, options)| {
            let total: usize = options.values().map(|(_, count)| count).sum();
            let options = options
                .into_iter()
                .map(|(label, (tag, count))| OptionStats {
                    label: label.to_string(),
                    tag,
                    count,
                    percent: percent(count, total),
                })
                .collect();
            QuestionStats {
                question_id: question_id.to_string(),
                total,
                options,
            }
        })
        .collect();

    QuizStats {
        quiz_id: quiz_id.to_string(),
        total_responses: questions.iter().map(|question| question.total).sum(),
        sessions: sessions.len(),
        questions,
    }
}

/// Share of `count` in `total`, rounded to one decimal.
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}
