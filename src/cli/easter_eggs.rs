//! Easter Eggs and Typo Detection
//!
//! Classifies tokens that did not resolve to a command: a hidden literal
//! response, a near-miss of a real command (rendered as a glitch animation),
//! or plain unknown input. Also home to the konami code tracker and the
//! canned art and fortunes.

use crossterm::event::KeyCode;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shortest token that may be reported as a typo
pub const MIN_TYPO_LEN: usize = 3;
/// Largest edit distance still treated as a typo
pub const MAX_TYPO_DISTANCE: usize = 2;

const GLITCH_CHARS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '{', '}', '[', ']',
    '|', ';', ':', ',', '.', '<', '>', '?', '/', '\\', '~', '`',
];
const GLITCH_PROBABILITY: f64 = 0.2;
const GLITCH_ITERATIONS: usize = 6;

pub const KONAMI_REWARD: &str = "⭐ KONAMI CODE ACTIVATED! ⭐\nUnlocked retro mode!";

pub const ASCII_LOGO: &str = r"
 ████████╗███████╗██████╗ ███╗   ███╗██╗███╗   ██╗ █████╗ ██╗
 ╚══██╔══╝██╔════╝██╔══██╗████╗ ████║██║████╗  ██║██╔══██╗██║
    ██║   █████╗  ██████╔╝██╔████╔██║██║██╔██╗ ██║███████║██║
    ██║   ██╔══╝  ██╔══██╗██║╚██╔╝██║██║██║╚██╗██║██╔══██║██║
    ██║   ███████╗██║  ██║██║ ╚═╝ ██║██║██║ ╚████║██║  ██║███████╗
    ╚═╝   ╚══════╝╚═╝  ╚═╝╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝  ╚═╝╚══════╝

██████╗  ██████╗ ██████╗ ████████╗███████╗ ██████╗ ██╗     ██╗ ██████╗
██╔══██╗██╔═══██╗██╔══██╗╚══██╔══╝██╔════╝██╔═══██╗██║     ██║██╔═══██╗
██████╔╝██║   ██║██████╔╝   ██║   █████╗  ██║   ██║██║     ██║██║   ██║
██╔═══╝ ██║   ██║██╔══██╗   ██║   ██╔══╝  ██║   ██║██║     ██║██║   ██║
██║     ╚██████╔╝██║  ██║   ██║   ██║     ╚██████╔╝███████╗██║╚██████╔╝
╚═╝      ╚═════╝ ╚═╝  ╚═╝   ╚═╝   ╚═╝      ╚═════╝ ╚══════╝╚═╝ ╚═════╝";

const COFFEE_ART: &str = r"
   ( (
    ) )
  ........
  |      |]
  \      /
   '----'";

const ROCKET_ART: &str = r"
      /\
     /  \
    |    |
    |    |
    |    |
   /|    |\
  / |    | \
 /__|____|__\
     /\
    /  \
    ^^^^";

const RAIN_ART: &str = r"
 1  0  1  0  1  0  1  0  1  0
   0  1  0  1  0     0  1  0  1
 0     0     0  1  0  1     0
   1  0  1  0     0  1  0  1  0
 1     1     1  0  1     1
   0  1  0  1  0  1  0     0  1
 0     0  1     0     0  1  0";

const COW_ART: &str = r"
         \   ^__^
          \  (oo)\_______
             (__)\       )\/\
                 ||----w |
                 ||     ||";

pub const FORTUNES: &[&str] = &[
    "Your code will compile on the first try today.",
    "A bug fixed today prevents a critical issue tomorrow.",
    "Someone will star your GitHub repository soon.",
    "A great opportunity for contribution awaits you.",
    "Your next pull request will be merged without comments.",
    "The path to becoming a better developer is through documentation.",
    "Your commit today will save someone hours of debugging tomorrow.",
    "The best code is no code at all.",
    "A clever person solves a problem; a wise person avoids it.",
    "Before software can be reusable, it first has to be usable.",
    "The sooner you start coding, the longer the program will take.",
];

/// How an unresolved token should be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Hidden command with a fixed response
    Literal(String),
    /// Near miss of a valid command
    Typo,
    Unknown,
}

/// Hidden commands offered by Tab completion
pub const DISCOVERABLE: &[&str] = &["coffee", "rocket", "cow", "sudo", "42"];

/// Exact-match easter egg lookup
pub fn literal_response(token: &str) -> Option<String> {
    let text = match token {
        "hlep" => "I think you meant 'help'. Let me help you with that!".to_string(),
        "clea" => "Almost there! Try 'clear' to clean the terminal.".to_string(),
        "eixt" => "Want to exit? Just type 'exit'.".to_string(),
        "clera" => "Did you mean 'clear'? My keyboard gets sticky sometimes too.".to_string(),
        "coffee" | "break" => format!(
            "Taking a coffee break?\n{}\n\nHere's a virtual cup for you!",
            COFFEE_ART
        ),
        "launch" | "rocket" => format!(
            "Initiating launch sequence...\n{}\n\nHouston, we have liftoff!",
            ROCKET_ART
        ),
        "rain" => format!("{}\n\nFollow the white rabbit...", RAIN_ART),
        "moo" | "cow" => format!("{}\n\nMooooooo!", COW_ART),
        "42" => "The Answer to the Ultimate Question of Life, the Universe, and Everything."
            .to_string(),
        "sudo" => "Nice try! But sudo won't work here. You're already the master of this terminal."
            .to_string(),
        _ => return None,
    };
    Some(text)
}

/// Classify a lower-cased token against the valid command names.
///
/// Checks run in a fixed order: literal table, typo, unknown.
pub fn classify(token: &str, valid: &[&str]) -> Classification {
    if let Some(text) = literal_response(token) {
        return Classification::Literal(text);
    }
    if is_typo(token, valid) {
        return Classification::Typo;
    }
    Classification::Unknown
}

pub fn is_typo(token: &str, valid: &[&str]) -> bool {
    if token.chars().count() < MIN_TYPO_LEN {
        return false;
    }
    valid.iter().any(|candidate| {
        let distance = levenshtein(token, candidate);
        distance > 0 && distance <= MAX_TYPO_DISTANCE
    })
}

/// Edit distance (insert, delete, substitute) over chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Replace roughly a fifth of the characters with glitch symbols
pub fn glitch_text<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    text.chars()
        .map(|c| {
            if rng.gen_bool(GLITCH_PROBABILITY) {
                GLITCH_CHARS[rng.gen_range(0..GLITCH_CHARS.len())]
            } else {
                c
            }
        })
        .collect()
}

/// Frames of the "command not found" glitch animation; the last one settles
pub fn glitch_frames<R: Rng + ?Sized>(token: &str, rng: &mut R) -> Vec<String> {
    let clean = format!("Command not found: {}", token);
    let mut frames = Vec::with_capacity(GLITCH_ITERATIONS + 2);
    frames.push(clean.clone());
    for i in 0..GLITCH_ITERATIONS {
        if i % 2 == 0 {
            frames.push(format!("C0mm@nd n0t f0und: {}", glitch_text(token, rng)));
        } else {
            frames.push(clean.clone());
        }
    }
    frames.push(not_found_message(token));
    frames
}

pub fn not_found_message(token: &str) -> String {
    format!(
        "Command not found: {}. Type 'help' to see available commands.",
        token
    )
}

pub fn random_fortune<R: Rng + ?Sized>(rng: &mut R) -> String {
    let fortune = FORTUNES.choose(rng).copied().unwrap_or(FORTUNES[0]);
    format!("🔮 Your fortune: {}", fortune)
}

/// Name used in the konami sequence for a key, if it can take part
pub fn konami_key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("up".to_string()),
        KeyCode::Down => Some("down".to_string()),
        KeyCode::Left => Some("left".to_string()),
        KeyCode::Right => Some("right".to_string()),
        KeyCode::Char(c) => Some(c.to_lowercase().to_string()),
        KeyCode::Enter => Some("enter".to_string()),
        KeyCode::Tab => Some("tab".to_string()),
        KeyCode::Backspace => Some("backspace".to_string()),
        KeyCode::Esc => Some("esc".to_string()),
        _ => None,
    }
}

/// Progress through a configured key sequence
#[derive(Debug, Clone)]
pub struct KonamiTracker {
    sequence: Vec<String>,
    progress: usize,
}

impl KonamiTracker {
    pub fn new(sequence: Vec<String>) -> Self {
        let sequence = sequence.into_iter().map(|k| k.to_lowercase()).collect();
        Self {
            sequence,
            progress: 0,
        }
    }

    /// Feed one key; returns true when the whole sequence was just completed
    pub fn record(&mut self, key: &str) -> bool {
        if self.sequence.is_empty() {
            return false;
        }

        if self.sequence[self.progress] == key {
            self.progress += 1;
            if self.progress == self.sequence.len() {
                self.progress = 0;
                return true;
            }
        } else {
            self.progress = 0;
        }
        false
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn reset(&mut self) {
        self.progress = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const VALID: &[&str] = &["help", "clear", "projects", "skills", "exit"];

    fn konami() -> KonamiTracker {
        KonamiTracker::new(
            ["up", "up", "down", "down", "left", "right", "left", "right", "b", "a"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("help", "help"), 0);
        assert_eq!(levenshtein("projcts", "projects"), 1);
        assert_eq!(levenshtein("héllo", "hello"), 1);
    }

    #[test]
    fn test_classify_priority() {
        assert!(matches!(classify("hlep", VALID), Classification::Literal(_)));
        assert_eq!(classify("projcts", VALID), Classification::Typo);
        assert_eq!(classify("banana", VALID), Classification::Unknown);
    }

    #[test]
    fn test_short_tokens_are_never_typos() {
        assert_eq!(classify("hl", VALID), Classification::Unknown);
        assert!(!is_typo("ex", VALID));
        assert!(is_typo("exi", VALID));
    }

    #[test]
    fn test_literal_responses() {
        let coffee = literal_response("coffee").unwrap();
        assert!(coffee.starts_with("Taking a coffee break?"));
        assert!(coffee.ends_with("Here's a virtual cup for you!"));
        assert_eq!(literal_response("break"), Some(coffee));
        assert!(literal_response("moo").unwrap().ends_with("Mooooooo!"));
        assert!(literal_response("sudo").unwrap().contains("master of this terminal"));
        assert!(literal_response("moooo").is_none());
    }

    #[test]
    fn test_glitch_frames_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let frames = glitch_frames("projcts", &mut rng);

        assert_eq!(frames.len(), 8);
        assert_eq!(frames[0], "Command not found: projcts");
        assert!(frames[1].starts_with("C0mm@nd n0t f0und: "));
        assert_eq!(frames[2], frames[0]);
        assert_eq!(
            frames[7],
            "Command not found: projcts. Type 'help' to see available commands."
        );
    }

    #[test]
    fn test_glitch_text_keeps_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let glitched = glitch_text("abcdefghijklmnop", &mut rng);
        assert_eq!(glitched.chars().count(), 16);
    }

    #[test]
    fn test_random_fortune() {
        let mut rng = StdRng::seed_from_u64(1);
        let fortune = random_fortune(&mut rng);
        let text = fortune.trim_start_matches("🔮 Your fortune: ");
        assert!(FORTUNES.contains(&text));
    }

    #[test]
    fn test_konami_full_sequence() {
        let mut tracker = konami();
        let keys = ["up", "up", "down", "down", "left", "right", "left", "right", "b"];
        for key in keys {
            assert!(!tracker.record(key));
        }
        assert!(tracker.record("a"));
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_konami_resets_on_mistake() {
        let mut tracker = konami();
        tracker.record("up");
        tracker.record("up");
        tracker.record("x");
        assert_eq!(tracker.progress(), 0);

        tracker.record("up");
        tracker.record("up");
        // Any out-of-sequence key starts over, even the first key of the code.
        tracker.record("up");
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_konami_key_names() {
        assert_eq!(konami_key_name(KeyCode::Up).as_deref(), Some("up"));
        assert_eq!(konami_key_name(KeyCode::Char('B')).as_deref(), Some("b"));
        assert_eq!(konami_key_name(KeyCode::F(1)), None);
    }
}
