use rand::Rng;
use uuid::Uuid;

use super::catalog::{QuestionCatalog, QUIZ_ID};
use super::domain::{AnswerMap, Question};
use super::responses::{NewResponse, ResponseSink};
use super::shuffle::shuffle_questions;

/// Outcome of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Next { index: usize, total: usize },
    Complete,
}

/// One quiz run: a shuffled question order and the answers collected so far.
///
/// The session is the only writer of its [`AnswerMap`]. Answers are frozen by
/// consuming the session with [`QuizSession::finish`].
#[derive(Debug)]
pub struct QuizSession {
    session_id: String,
    quiz_id: String,
    questions: Vec<Question>,
    answers: AnswerMap,
    index: usize,
    sink: Option<ResponseSink>,
}

impl QuizSession {
    pub fn start<R>(catalog: &QuestionCatalog, rng: &mut R, sink: Option<ResponseSink>) -> Self
    where
        R: Rng + ?Sized,
    {
        let session = Self {
            session_id: Uuid::new_v4().to_string(),
            quiz_id: QUIZ_ID.to_string(),
            questions: shuffle_questions(catalog, rng),
            answers: AnswerMap::new(),
            index: 0,
            sink,
        };
        tracing::info!(
            session_id = %session.session_id,
            questions = session.questions.len(),
            "quiz session started"
        );
        session
    }

    /// Reuse an existing anonymous session id (e.g. one persisted by a client).
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// `(answered, total)`
    pub fn progress(&self) -> (usize, usize) {
        (self.index, self.questions.len())
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Record the option at `option_index` for the current question and advance.
    ///
    /// The response event is handed to the sink without waiting for delivery.
    pub fn choose(&mut self, option_index: usize) -> Result<SessionStep, SessionError> {
        let question = self
            .questions
            .get(self.index)
            .ok_or(SessionError::AlreadyComplete)?;
        let option = question
            .options
            .get(option_index)
            .cloned()
            .ok_or(SessionError::OptionOutOfRange {
                index: option_index,
                available: question.options.len(),
            })?;

        if let Some(sink) = &self.sink {
            sink.submit(NewResponse {
                session_id: self.session_id.clone(),
                quiz_id: self.quiz_id.clone(),
                question_id: question.id.to_string(),
                option_label: option.label.clone(),
                option_tag: option.tag,
                weight: option.weight.value(),
            });
        }

        self.answers.record(question.id.clone(), option);
        self.index += 1;

        if self.is_complete() {
            tracing::info!(session_id = %self.session_id, "quiz session complete");
            Ok(SessionStep::Complete)
        } else {
            Ok(SessionStep::Next {
                index: self.index,
                total: self.questions.len(),
            })
        }
    }

    /// Freeze the answers, returning them with the presented question order.
    pub fn finish(self) -> (Vec<Question>, AnswerMap) {
        (self.questions, self.answers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("every question has already been answered")]
    AlreadyComplete,
    #[error("option {index} does not exist (question has {available})")]
    OptionOutOfRange { index: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::standard_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn session_walks_every_question_once() {
        let catalog = standard_catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = QuizSession::start(catalog, &mut rng, None);

        let total = catalog.len();
        for step in 1..=total {
            let outcome = session.choose(0).expect("question available");
            if step < total {
                assert_eq!(outcome, SessionStep::Next { index: step, total });
            } else {
                assert_eq!(outcome, SessionStep::Complete);
            }
        }

        assert!(session.is_complete());
        assert_eq!(session.choose(0), Err(SessionError::AlreadyComplete));
        let (questions, answers) = session.finish();
        assert_eq!(questions.len(), total);
        assert_eq!(answers.len(), total);
    }

    #[test]
    fn out_of_range_option_does_not_advance() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = QuizSession::start(standard_catalog(), &mut rng, None);
        let err = session.choose(7).expect_err("only three options");
        assert_eq!(err, SessionError::OptionOutOfRange { index: 7, available: 3 });
        assert_eq!(session.progress(), (0, 10));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn answers_are_enqueued_for_logging() {
        let (sink, mut rx) = ResponseSink::channel();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session =
            QuizSession::start(standard_catalog(), &mut rng, Some(sink)).with_session_id("sid-1");
        let first = session.current().expect("first question").clone();

        session.choose(1).expect("answer accepted");

        let logged = rx.try_recv().expect("event enqueued");
        assert_eq!(logged.session_id, "sid-1");
        assert_eq!(logged.quiz_id, QUIZ_ID);
        assert_eq!(logged.question_id, first.id.as_str());
        assert_eq!(logged.option_label, first.options[1].label);
        assert_eq!(logged.weight, first.options[1].weight.value());
    }

    #[test]
    fn closed_log_channel_does_not_block_progress() {
        let (sink, rx) = ResponseSink::channel();
        drop(rx);
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = QuizSession::start(standard_catalog(), &mut rng, Some(sink));
        assert!(session.choose(2).is_ok());
        assert_eq!(session.answers().len(), 1);
    }
}
