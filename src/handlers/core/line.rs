//! Command line splitting.

use crate::broadcast::Sigil;

/// A chat line recognised as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    pub sigil: Sigil,
    /// Command name as typed, lowercased.
    pub name: String,
    /// Everything after the first space, trimmed.
    pub target: &'a str,
}

impl<'a> CommandLine<'a> {
    /// Split a raw line into sigil, name and target.
    ///
    /// Returns `None` for chat: no sigil, a doubled sigil (`//`, `!!`), or a
    /// bare sigil.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let first = raw.chars().next()?;
        let sigil = Sigil::from_char(first)?;
        let rest = &raw[first.len_utf8()..];
        if rest.starts_with(first) {
            return None;
        }

        let (name, target) = match rest.split_once(char::is_whitespace) {
            Some((name, target)) => (name, target.trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            sigil,
            name: name.to_lowercase(),
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_name_and_target() {
        let line = CommandLine::parse("/DexSearch  fire type, ou ").unwrap();
        assert_eq!(line.sigil, Sigil::Private);
        assert_eq!(line.name, "dexsearch");
        assert_eq!(line.target, "fire type, ou");
    }

    #[test]
    fn broadcast_sigil() {
        let line = CommandLine::parse("!rules").unwrap();
        assert_eq!(line.sigil, Sigil::Broadcast);
        assert_eq!(line.target, "");
    }

    #[test]
    fn chat_is_not_a_command() {
        for raw in ["hello", "//not a command", "!!wow", "/", "! hi", ""] {
            assert!(CommandLine::parse(raw).is_none(), "{raw:?}");
        }
    }
}
