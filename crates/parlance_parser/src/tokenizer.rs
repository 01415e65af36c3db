//! Input tokenization.
//!
//! Converts raw player input into a stream of tokens.

/// A token from player input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputToken {
    /// A lowercase word
    Word(String),
    /// A quoted string (preserved as-is)
    Quoted(String),
}

impl InputToken {
    /// Returns the word, if this token is one.
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Word(w) => Some(w),
            Self::Quoted(_) => None,
        }
    }

    /// Returns the token's text, quoted or not.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Word(w) | Self::Quoted(w) => w,
        }
    }
}

/// Tokenizes player input.
pub struct InputTokenizer;

impl InputTokenizer {
    /// Tokenizes a raw input string into tokens.
    ///
    /// - Converts words to lowercase
    /// - Strips punctuation (except within quotes)
    /// - Preserves quoted strings as atomic units; an unterminated quote runs
    ///   to the end of the input
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<InputToken> {
        let mut tokens = Vec::new();
        let mut chars = input.chars();
        let mut current_word = String::new();

        while let Some(ch) = chars.next() {
            match ch {
                '"' => {
                    flush(&mut current_word, &mut tokens);
                    let quoted: String = chars.by_ref().take_while(|&c| c != '"').collect();
                    tokens.push(InputToken::Quoted(quoted));
                }
                c if c.is_whitespace() => flush(&mut current_word, &mut tokens),
                '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '(' | ')' => {}
                _ => current_word.push(ch),
            }
        }

        flush(&mut current_word, &mut tokens);
        tokens
    }
}

fn flush(word: &mut String, tokens: &mut Vec<InputToken>) {
    if !word.is_empty() {
        tokens.push(InputToken::Word(word.to_lowercase()));
        word.clear();
    }
}
