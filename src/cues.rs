//! Fire-and-forget feedback sounds, rendered as the terminal bell.

use std::io::{self, Write};
use tracing::debug;

const BELL: &[u8] = b"\x07";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue
{
    Keystroke,
    Correct,
    Wrong,
    Transition,
}

impl Cue
{
    const ALL: [Cue; 4] = [Cue::Keystroke, Cue::Correct, Cue::Wrong, Cue::Transition];

    fn index(self) -> usize
    {
        match self {
            Cue::Keystroke => 0,
            Cue::Correct => 1,
            Cue::Wrong => 2,
            Cue::Transition => 3,
        }
    }
}

pub struct Cues<W: Write>
{
    out: W,
    enabled: [bool; 4],
}

impl Cues<io::Stdout>
{
    pub fn terminal(muted: bool, key_clicks: bool) -> Self
    {
        Self::new(io::stdout(), muted, key_clicks)
    }
}

impl<W: Write> Cues<W>
{
    pub fn new(out: W, muted: bool, key_clicks: bool) -> Self
    {
        let mut enabled = [!muted; 4];
        enabled[Cue::Keystroke.index()] = !muted && key_clicks;
        Self { out, enabled }
    }

    pub fn is_enabled(&self, cue: Cue) -> bool
    {
        self.enabled[cue.index()]
    }

    /// Plays `cue` if it is still enabled. A cue that fails once stays off.
    pub fn play(&mut self, cue: Cue)
    {
        if !self.is_enabled(cue) {
            return;
        }
        let result = self.out.write_all(BELL).and_then(|()| self.out.flush());
        if let Err(err) = result {
            debug!(?cue, %err, "disabling cue");
            self.enabled[cue.index()] = false;
        }
    }

    pub fn enabled_cues(&self) -> Vec<Cue>
    {
        Cue::ALL
            .into_iter()
            .filter(|cue| self.is_enabled(*cue))
            .collect()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use pretty_assertions::assert_eq;

    struct Broken;

    impl Write for Broken
    {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize>
        {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()>
        {
            Ok(())
        }
    }

    #[test]
    fn keystroke_cue_needs_key_clicks()
    {
        let cues = Cues::new(Vec::new(), false, false);
        assert_eq!(cues.enabled_cues(), vec![Cue::Correct, Cue::Wrong, Cue::Transition]);
        let cues = Cues::new(Vec::new(), false, true);
        assert!(cues.is_enabled(Cue::Keystroke));
    }

    #[test]
    fn muted_plays_nothing()
    {
        let mut cues = Cues::new(Vec::new(), true, true);
        cues.play(Cue::Correct);
        cues.play(Cue::Keystroke);
        assert!(cues.out.is_empty());
        assert!(cues.enabled_cues().is_empty());
    }

    #[test]
    fn plays_bell()
    {
        let mut cues = Cues::new(Vec::new(), false, false);
        cues.play(Cue::Wrong);
        cues.play(Cue::Keystroke);
        assert_eq!(cues.out, BELL.to_vec());
    }

    #[test]
    fn failing_cue_is_disabled_quietly()
    {
        let mut cues = Cues::new(Broken, false, false);
        cues.play(Cue::Correct);
        assert!(!cues.is_enabled(Cue::Correct));
        assert!(cues.is_enabled(Cue::Wrong));
    }
}
