use crate::words::{Dictionary, MAX_WORD_LEN};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, trace};

pub const CYCLE: Duration = Duration::from_secs(10);
const REVEAL_BASE: Duration = Duration::from_millis(5000);
const REVEAL_STEP: Duration = Duration::from_millis(500);
const REVEAL_FLOOR: Duration = Duration::from_millis(2000);
pub const BASE_WORD_LEN: usize = 3;
const ROUNDS_PER_LEVEL: u32 = 10;
const CORRECT_POINTS: f64 = 1.0;
const MISS_PENALTY: f64 = 0.5;
const FEEDBACK_DECAY_PER_SEC: f32 = 200.0;

pub fn level(round: u32) -> u32
{
    round / ROUNDS_PER_LEVEL
}

pub fn reveal_window(round: u32) -> Duration
{
    REVEAL_BASE
        .saturating_sub(REVEAL_STEP * level(round))
        .max(REVEAL_FLOOR)
}

pub fn target_len(round: u32) -> usize
{
    (BASE_WORD_LEN + level(round) as usize).min(MAX_WORD_LEN)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase
{
    Reveal,
    Type,
    Feedback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict
{
    Correct,
    Empty,
    Wrong,
    TimeUp,
}

impl Verdict
{
    pub fn delta(self) -> f64
    {
        match self {
            Verdict::Correct => CORRECT_POINTS,
            Verdict::Empty | Verdict::Wrong | Verdict::TimeUp => -MISS_PENALTY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Feedback
{
    pub verdict: Verdict,
    pub answer: String,
    pub opacity: f32,
}

impl Feedback
{
    fn new(verdict: Verdict, answer: &str) -> Self
    {
        Self {
            verdict,
            answer: answer.to_string(),
            opacity: 255.0,
        }
    }

    pub fn message(&self) -> String
    {
        match self.verdict {
            Verdict::Correct => "Correct!".to_string(),
            Verdict::Empty => format!("You entered nothing! It was: {}", self.answer),
            Verdict::Wrong => format!("Wrong! It was: {}", self.answer),
            Verdict::TimeUp => format!("Time up! It was: {}", self.answer),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundEvent
{
    /// A cycle boundary was crossed and a new word is showing.
    Started
    {
        round: u32,
    },
    TypeOpened,
    TimedOut,
    /// The boundary after the final round. The state stops advancing.
    Finished,
}

/// One playthrough of the memorise-and-retype loop. Time is always passed in
/// as the elapsed duration since the playthrough started.
pub struct RoundState
{
    pub word: String,
    pub round: u32,
    pub phase: Phase,
    pub phase_started: Duration,
    pub score: f64,
    pub input: String,
    pub submitted: bool,
    pub feedback: Option<Feedback>,
    reveal: Duration,
    last_cycle: Option<u64>,
    last_elapsed: Duration,
    finished: bool,
}

impl RoundState
{
    pub fn new() -> Self
    {
        Self {
            word: String::new(),
            round: 0,
            phase: Phase::Reveal,
            phase_started: Duration::ZERO,
            score: 0.0,
            input: String::new(),
            submitted: false,
            feedback: None,
            reveal: reveal_window(0),
            last_cycle: None,
            last_elapsed: Duration::ZERO,
            finished: false,
        }
    }

    pub fn reveal(&self) -> Duration
    {
        self.reveal
    }

    pub fn is_finished(&self) -> bool
    {
        self.finished
    }

    pub fn accepts_input(&self) -> bool
    {
        self.phase == Phase::Type && !self.submitted && !self.finished
    }

    pub fn time_in_cycle(&self, elapsed: Duration) -> Duration
    {
        let cycle_ms = CYCLE.as_millis();
        Duration::from_millis((elapsed.as_millis() % cycle_ms) as u64)
    }

    /// Advances the machine to `elapsed` and reports what happened.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        dictionary: &Dictionary,
        rng: &mut impl Rng,
        max_rounds: Option<u32>,
    ) -> Vec<RoundEvent>
    {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        let dt = elapsed.saturating_sub(self.last_elapsed);
        self.last_elapsed = elapsed;
        self.decay_feedback(dt);

        let cycle = (elapsed.as_millis() / CYCLE.as_millis()) as u64;
        if self.last_cycle != Some(cycle) {
            let timed_out = self.phase == Phase::Type && !self.submitted;
            if timed_out {
                self.score += Verdict::TimeUp.delta();
                self.feedback = Some(Feedback::new(Verdict::TimeUp, &self.word));
                debug!(round = self.round, word = %self.word, "round timed out");
                events.push(RoundEvent::TimedOut);
            }

            self.round += 1;
            if max_rounds.is_some_and(|max| self.round > max) {
                self.finished = true;
                debug!(round = self.round, score = self.score, "rounds exhausted");
                events.push(RoundEvent::Finished);
                return events;
            }

            self.word = dictionary.pick(target_len(self.round), rng).to_string();
            self.input.clear();
            self.submitted = false;
            if !timed_out {
                self.feedback = None;
            }
            self.reveal = reveal_window(self.round);
            self.phase = Phase::Reveal;
            self.phase_started = CYCLE * cycle as u32;
            self.last_cycle = Some(cycle);
            trace!(
                round = self.round,
                word = %self.word,
                reveal_ms = self.reveal.as_millis() as u64,
                "round started"
            );
            events.push(RoundEvent::Started { round: self.round });
        }

        if self.phase == Phase::Reveal && self.time_in_cycle(elapsed) >= self.reveal {
            self.phase = Phase::Type;
            self.phase_started = elapsed;
            events.push(RoundEvent::TypeOpened);
        }

        events
    }

    /// Returns true when the character was taken.
    pub fn push_char(&mut self, ch: char) -> bool
    {
        if !self.accepts_input() || !ch.is_alphabetic() {
            return false;
        }
        self.input.push(ch);
        true
    }

    pub fn pop_char(&mut self) -> bool
    {
        if !self.accepts_input() {
            return false;
        }
        self.input.pop().is_some()
    }

    /// Scores the current input. Only the first submit of a round counts.
    pub fn submit(&mut self, elapsed: Duration) -> Option<Verdict>
    {
        if !self.accepts_input() {
            return None;
        }

        let verdict = judge(&self.input, &self.word);
        self.score += verdict.delta();
        self.submitted = true;
        self.feedback = Some(Feedback::new(verdict, &self.word));
        self.phase = Phase::Feedback;
        self.phase_started = elapsed;
        debug!(round = self.round, ?verdict, score = self.score, "answer submitted");
        Some(verdict)
    }

    fn decay_feedback(&mut self, dt: Duration)
    {
        if let Some(feedback) = self.feedback.as_mut() {
            feedback.opacity =
                (feedback.opacity - FEEDBACK_DECAY_PER_SEC * dt.as_secs_f32()).max(0.0);
        }
    }
}

impl Default for RoundState
{
    fn default() -> Self
    {
        Self::new()
    }
}

pub fn judge(input: &str, word: &str) -> Verdict
{
    let answer = input.trim();
    if answer.is_empty() {
        Verdict::Empty
    } else if answer.to_lowercase() == word.to_lowercase() {
        Verdict::Correct
    } else {
        Verdict::Wrong
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tracing_test::traced_test;

    fn ms(millis: u64) -> Duration
    {
        Duration::from_millis(millis)
    }

    fn only_cat() -> Dictionary
    {
        Dictionary::from_words(["cat"]).unwrap()
    }

    fn type_word(state: &mut RoundState, word: &str)
    {
        for ch in word.chars() {
            state.push_char(ch);
        }
    }

    #[test]
    fn reveal_window_shrinks_every_ten_rounds()
    {
        assert_eq!(reveal_window(0), ms(5000));
        assert_eq!(reveal_window(9), ms(5000));
        assert_eq!(reveal_window(10), ms(4500));
        assert_eq!(reveal_window(31), ms(3500));
        assert_eq!(reveal_window(60), ms(2000));
        assert_eq!(reveal_window(99), ms(2000));
        assert_eq!(reveal_window(u32::MAX), ms(2000));
    }

    #[test]
    fn reveal_window_matches_formula()
    {
        for round in 0..200u32 {
            let expected = 5000i64 - 500 * i64::from(round / 10);
            assert_eq!(reveal_window(round), ms(expected.max(2000) as u64));
        }
    }

    #[test]
    fn target_len_grows_and_caps()
    {
        assert_eq!(target_len(0), 3);
        assert_eq!(target_len(10), 4);
        assert_eq!(target_len(31), 6);
        assert_eq!(target_len(40), 7);
        assert_eq!(target_len(100), 7);
    }

    #[test]
    fn chosen_word_has_difficulty_length()
    {
        let dict = Dictionary::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = RoundState::new();
        for cycle in 0..60u64 {
            let elapsed = CYCLE * cycle as u32;
            state.tick(elapsed, &dict, &mut rng, None);
            assert_eq!(state.word.chars().count(), target_len(state.round));
        }
    }

    #[test]
    fn judge_is_case_insensitive_and_trims()
    {
        assert_eq!(judge("CAT", "cat"), Verdict::Correct);
        assert_eq!(judge("  Cat ", "cat"), Verdict::Correct);
        assert_eq!(judge("", "cat"), Verdict::Empty);
        assert_eq!(judge("   ", "cat"), Verdict::Empty);
        assert_eq!(judge("cart", "cat"), Verdict::Wrong);
    }

    #[test]
    #[traced_test]
    fn correct_answer_after_reveal()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();

        let events = state.tick(ms(0), &dict, &mut rng, Some(100));
        assert_eq!(events, vec![RoundEvent::Started { round: 1 }]);
        assert_eq!(state.phase, Phase::Reveal);
        assert!(!state.push_char('c'));

        state.tick(ms(4999), &dict, &mut rng, Some(100));
        assert_eq!(state.phase, Phase::Reveal);

        let events = state.tick(ms(5000), &dict, &mut rng, Some(100));
        assert_eq!(events, vec![RoundEvent::TypeOpened]);
        assert_eq!(state.phase, Phase::Type);

        type_word(&mut state, "CAT");
        assert_eq!(state.submit(ms(6000)), Some(Verdict::Correct));
        assert_eq!(state.score, 1.0);
        assert_eq!(state.phase, Phase::Feedback);
        assert_eq!(state.feedback.as_ref().map(Feedback::message).as_deref(), Some("Correct!"));
    }

    #[test]
    fn wrong_and_empty_answers_cost_half_a_point()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);

        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, None);
        state.tick(ms(5000), &dict, &mut rng, None);
        assert_eq!(state.submit(ms(5100)), Some(Verdict::Empty));
        assert_eq!(state.score, -0.5);
        assert_eq!(
            state.feedback.as_ref().map(Feedback::message).as_deref(),
            Some("You entered nothing! It was: cat")
        );

        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, None);
        state.tick(ms(5000), &dict, &mut rng, None);
        type_word(&mut state, "dog");
        assert_eq!(state.submit(ms(5100)), Some(Verdict::Wrong));
        assert_eq!(state.score, -0.5);
        assert_eq!(
            state.feedback.as_ref().map(Feedback::message).as_deref(),
            Some("Wrong! It was: cat")
        );
    }

    #[test]
    fn only_first_submit_counts()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, None);
        state.tick(ms(5000), &dict, &mut rng, None);
        type_word(&mut state, "cat");
        assert_eq!(state.submit(ms(5500)), Some(Verdict::Correct));
        assert!(!state.push_char('x'));
        assert!(!state.pop_char());
        assert_eq!(state.submit(ms(5600)), None);
        assert_eq!(state.score, 1.0);
        assert_eq!(state.input, "cat");
    }

    #[test]
    fn submitted_round_is_not_penalised_at_boundary()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, None);
        state.tick(ms(5000), &dict, &mut rng, None);
        type_word(&mut state, "cat");
        state.submit(ms(5200));

        let events = state.tick(ms(10_000), &dict, &mut rng, None);
        assert_eq!(events, vec![RoundEvent::Started { round: 2 }]);
        assert_eq!(state.score, 1.0);
        assert!(state.feedback.is_none());
        assert!(!state.submitted);
        assert!(state.input.is_empty());
    }

    #[test]
    fn unanswered_round_times_out()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, None);
        state.tick(ms(5000), &dict, &mut rng, None);
        type_word(&mut state, "ca");

        let events = state.tick(ms(10_000), &dict, &mut rng, None);
        assert_eq!(
            events,
            vec![RoundEvent::TimedOut, RoundEvent::Started { round: 2 }]
        );
        assert_eq!(state.score, -0.5);
        assert_eq!(
            state.feedback.as_ref().map(Feedback::message).as_deref(),
            Some("Time up! It was: cat")
        );
        assert!(state.input.is_empty());
    }

    #[test]
    fn final_boundary_finishes_ranked_play()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, Some(2));
        state.tick(ms(10_000), &dict, &mut rng, Some(2));
        assert_eq!(state.round, 2);
        assert!(!state.is_finished());

        let events = state.tick(ms(20_000), &dict, &mut rng, Some(2));
        assert_eq!(events, vec![RoundEvent::Finished]);
        assert_eq!(state.round, 3);
        assert!(state.is_finished());
        assert!(state.tick(ms(30_000), &dict, &mut rng, Some(2)).is_empty());
    }

    #[test]
    fn freestyle_never_finishes()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();
        for cycle in 0..250u32 {
            state.tick(CYCLE * cycle, &dict, &mut rng, None);
        }
        assert_eq!(state.round, 250);
        assert!(!state.is_finished());
    }

    #[test]
    fn round_31_uses_shorter_reveal()
    {
        let dict = Dictionary::builtin();
        let mut rng = StdRng::seed_from_u64(11);
        let mut state = RoundState::new();
        for cycle in 0..31u32 {
            state.tick(CYCLE * cycle, &dict, &mut rng, None);
        }
        assert_eq!(state.round, 31);
        assert_eq!(state.reveal(), ms(3500));
        assert_eq!(state.word.chars().count(), 6);

        let start = CYCLE * 30;
        state.tick(start + ms(3499), &dict, &mut rng, None);
        assert_eq!(state.phase, Phase::Reveal);
        state.tick(start + ms(3500), &dict, &mut rng, None);
        assert_eq!(state.phase, Phase::Type);
    }

    #[test]
    fn feedback_fades_over_time()
    {
        let dict = only_cat();
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = RoundState::new();
        state.tick(ms(0), &dict, &mut rng, None);
        state.tick(ms(5000), &dict, &mut rng, None);
        state.submit(ms(5000));
        state.tick(ms(5500), &dict, &mut rng, None);
        let opacity = state.feedback.as_ref().map(|f| f.opacity).unwrap();
        assert!((opacity - 155.0).abs() < 0.5);
        state.tick(ms(9000), &dict, &mut rng, None);
        assert_eq!(state.feedback.as_ref().map(|f| f.opacity), Some(0.0));
    }
}
