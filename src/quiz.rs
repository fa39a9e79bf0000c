pub(crate) struct Question {
    pub(crate) prompt: &'static str,
    pub(crate) options: [&'static str; 4],
    pub(crate) correct: usize,
}

pub(crate) const QUESTIONS: [Question; 8] = [
    Question {
        prompt: "Which planet is known as the Red Planet?",
        options: ["Venus", "Mars", "Jupiter", "Saturn"],
        correct: 1,
    },
    Question {
        prompt: "Which planet has the most gravity?",
        options: ["Earth", "Sun", "Jupiter", "Neptune"],
        correct: 2,
    },
    Question {
        prompt: "One year on Mercury is equal to?",
        options: ["88 Earth days", "365 Earth days", "12 Years", "24 Hours"],
        correct: 0,
    },
    Question {
        prompt: "Which planet is famous for its beautiful rings?",
        options: ["Uranus", "Saturn", "Mars", "Pluto"],
        correct: 1,
    },
    Question {
        prompt: "Which planet is closest to the Sun?",
        options: ["Venus", "Earth", "Mercury", "Mars"],
        correct: 2,
    },
    Question {
        prompt: "Where would you weigh the least?",
        options: ["Jupiter", "Earth", "Mars", "Mercury"],
        correct: 2,
    },
    Question {
        prompt: "Which is the largest planet in our solar system?",
        options: ["Earth", "Saturn", "Jupiter", "Uranus"],
        correct: 2,
    },
    Question {
        prompt: "What is the Great Red Spot on Jupiter?",
        options: ["A volcano", "A storm", "A crater", "A lake"],
        correct: 1,
    },
];

/// Quiz progress. One answer per question; picking locks the question until
/// the player advances.
pub(crate) struct QuizState {
    pub(crate) current: usize,
    pub(crate) score: u32,
    /// The option picked for the current question, if any.
    pub(crate) answered: Option<usize>,
}

impl QuizState {
    pub(crate) fn new() -> Self {
        Self {
            current: 0,
            score: 0,
            answered: None,
        }
    }

    pub(crate) fn question(&self) -> Option<&'static Question> {
        QUESTIONS.get(self.current)
    }

    pub(crate) fn finished(&self) -> bool {
        self.current >= QUESTIONS.len()
    }

    /// Pick an option. Returns whether it was correct, or None when the
    /// question is already answered (or the quiz is over).
    pub(crate) fn answer(&mut self, option: usize) -> Option<bool> {
        if self.answered.is_some() {
            return None;
        }
        let q = self.question()?;
        if option >= q.options.len() {
            return None;
        }
        self.answered = Some(option);
        let correct = option == q.correct;
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Move to the next question; only allowed once the current one is
    /// answered.
    pub(crate) fn advance(&mut self) {
        if self.answered.is_some() && !self.finished() {
            self.current += 1;
            self.answered = None;
        }
    }

    pub(crate) fn restart(&mut self) {
        *self = QuizState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_counts_only_correct_answers() {
        let mut q = QuizState::new();
        assert_eq!(q.answer(QUESTIONS[0].correct), Some(true));
        assert_eq!(q.score, 1);
        q.advance();
        let wrong = (QUESTIONS[1].correct + 1) % 4;
        assert_eq!(q.answer(wrong), Some(false));
        assert_eq!(q.score, 1);
    }

    #[test]
    fn answers_lock_until_advance() {
        let mut q = QuizState::new();
        assert_eq!(q.answer(0), Some(0 == QUESTIONS[0].correct));
        // second pick on the same question is swallowed
        assert_eq!(q.answer(QUESTIONS[0].correct), None);
        assert!(q.score <= 1);

        // advancing without an answer is a no-op
        let mut fresh = QuizState::new();
        fresh.advance();
        assert_eq!(fresh.current, 0);
    }

    #[test]
    fn runs_to_completion_and_restarts() {
        let mut q = QuizState::new();
        for i in 0..QUESTIONS.len() {
            assert!(!q.finished());
            assert_eq!(q.answer(QUESTIONS[i].correct), Some(true));
            q.advance();
        }
        assert!(q.finished());
        assert!(q.question().is_none());
        assert_eq!(q.score, QUESTIONS.len() as u32);
        assert_eq!(q.answer(0), None);

        q.restart();
        assert_eq!(q.current, 0);
        assert_eq!(q.score, 0);
        assert_eq!(q.answered, None);
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut q = QuizState::new();
        assert_eq!(q.answer(4), None);
        assert_eq!(q.answered, None);
    }
}
