//! Move notation parsing.
//!
//! Notation is a compact token grammar: a face, slice or rotation letter
//! (optionally followed by `w` for a wide turn) and a suffix made of
//! repetition counts and reverse markers. Parenthesized or bracketed groups
//! take the same suffix and expand in place.
//!
//! Parsing is total. Characters that are not part of the grammar are dropped
//! so a half-typed sequence still plays.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use tracing::trace;

/// Sentinel token meaning "return to the base state without animation".
///
/// The parser skips it; resetting is the playback engine's job.
pub const RESET_TOKEN: char = '#';

/// Upper bound on the number of actions a single notation can expand to.
///
/// Nested group repetitions grow multiplicatively; anything past this is
/// truncated.
pub const MAX_ACTIONS: usize = 4096;

/// Largest quarter-turn count a single action carries. Larger counts are
/// reduced modulo four, so `R5` plays as `R` and `R8` as `R4`.
pub const MAX_TURN_TIMES: u32 = 4;

/// One atomic, independently invertible turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TwistAction {
    /// Layer or axis expression, e.g. `R`, `Rw`, `M`, `x`
    pub exp: String,
    /// Turn against the default sense of `exp`
    pub reverse: bool,
    /// Number of quarter turns, always at least 1
    pub times: u32,
}

impl TwistAction {
    /// Create a new action. A `times` of zero is raised to one.
    pub fn new(exp: impl Into<String>, reverse: bool, times: u32) -> Self {
        Self {
            exp: exp.into(),
            reverse,
            times: times.max(1),
        }
    }

    /// The action that undoes this one.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self {
            exp: self.exp.clone(),
            reverse: !self.reverse,
            times: self.times,
        }
    }

    /// Render this action back to a single notation token.
    pub fn to_notation(&self) -> String {
        let mut token = self.exp.clone();
        if self.times != 1 {
            token.push_str(&self.times.to_string());
        }
        if self.reverse {
            token.push('\'');
        }
        token
    }
}

impl fmt::Display for TwistAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_notation())
    }
}

/// Parse a notation string into an ordered list of actions.
///
/// ## Example
///
/// ```rust
/// use cube_alg_player::{parse, TwistAction};
///
/// let actions = parse("R U2 (R' F)'");
/// assert_eq!(
///     actions,
///     vec![
///         TwistAction::new("R", false, 1),
///         TwistAction::new("U", false, 2),
///         TwistAction::new("F", true, 1),
///         TwistAction::new("R", false, 1),
///     ]
/// );
///
/// // Unknown characters never make parsing fail
/// assert_eq!(parse("R ?? U").len(), 2);
/// ```
pub fn parse(notation: &str) -> Vec<TwistAction> {
    let mut chars = notation.chars().peekable();
    parse_sequence(&mut chars)
}

/// Reverse the order of `actions` and invert each one.
pub fn invert(actions: &[TwistAction]) -> Vec<TwistAction> {
    actions.iter().rev().map(TwistAction::inverse).collect()
}

/// Render actions as a space-separated notation string.
///
/// Parsing the result yields `actions` again.
pub fn to_notation(actions: &[TwistAction]) -> String {
    actions
        .iter()
        .map(TwistAction::to_notation)
        .collect::<Vec<_>>()
        .join(" ")
}

#[inline]
fn is_turn_letter(c: char) -> bool {
    matches!(
        c,
        'R' | 'L' | 'U' | 'D' | 'F' | 'B'
            | 'r' | 'l' | 'u' | 'd' | 'f' | 'b'
            | 'M' | 'E' | 'S' | 'm' | 'e' | 's'
            | 'x' | 'y' | 'z' | 'X' | 'Y' | 'Z'
    )
}

/// An open `(` or `[` group: its closing character and the actions so far.
struct Frame {
    closing: char,
    actions: Vec<TwistAction>,
}

fn parse_sequence(chars: &mut Peekable<Chars<'_>>) -> Vec<TwistAction> {
    let mut out = Vec::new();
    let mut open: Vec<Frame> = Vec::new();

    while let Some(c) = chars.next() {
        match c {
            '(' | '[' => open.push(Frame {
                closing: if c == '(' { ')' } else { ']' },
                actions: Vec::new(),
            }),
            c if open.last().is_some_and(|frame| frame.closing == c) => {
                let Some(frame) = open.pop() else { break };
                let (times, reverse) = parse_suffix(chars);
                let body = if reverse { invert(&frame.actions) } else { frame.actions };
                let parent = open.last_mut().map_or(&mut out, |f| &mut f.actions);
                push_repeated(parent, &body, times);
            }
            c if is_turn_letter(c) => {
                let mut exp = String::from(c);
                if chars.peek() == Some(&'w') {
                    chars.next();
                    exp.push('w');
                }
                let (times, reverse) = parse_suffix(chars);
                let target = open.last_mut().map_or(&mut out, |f| &mut f.actions);
                if times > 0 && target.len() < MAX_ACTIONS {
                    target.push(TwistAction::new(exp, reverse, reduce_turns(times)));
                }
            }
            c if c.is_whitespace() || c == ',' || c == RESET_TOKEN => {}
            other => trace!(token = %other, "dropping unsupported notation character"),
        }
    }

    // Unbalanced groups close at end of input
    while let Some(frame) = open.pop() {
        let parent = open.last_mut().map_or(&mut out, |f| &mut f.actions);
        push_repeated(parent, &frame.actions, 1);
    }
    out
}

/// Append `body` to `out` `times` times without exceeding [`MAX_ACTIONS`].
fn push_repeated(out: &mut Vec<TwistAction>, body: &[TwistAction], times: u32) {
    if body.is_empty() {
        return;
    }
    let room = MAX_ACTIONS.saturating_sub(out.len());
    let repeats = (times as usize).min(room.div_ceil(body.len()));
    for _ in 0..repeats {
        out.extend_from_slice(body);
    }
    out.truncate(MAX_ACTIONS);
}

/// Fold a quarter-turn count into `1..=MAX_TURN_TIMES`.
///
/// Four quarter turns of any layer or axis are the identity, so the
/// resulting state is unchanged.
#[inline]
fn reduce_turns(times: u32) -> u32 {
    (times - 1) % MAX_TURN_TIMES + 1
}

/// Read repetition counts and reverse markers. Returns `(times, reverse)`.
fn parse_suffix(chars: &mut Peekable<Chars<'_>>) -> (u32, bool) {
    let mut times: u32 = 1;
    let mut reverse = false;

    while let Some(&c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            let mut count = digit;
            chars.next();
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                count = count.saturating_mul(10).saturating_add(d);
                chars.next();
            }
            times = times.saturating_mul(count);
        } else if matches!(c, '\'' | '’' | 'i' | 'I') {
            reverse = !reverse;
            chars.next();
        } else {
            break;
        }
    }

    (times, reverse)
}
