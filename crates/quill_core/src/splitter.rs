//! Statement splitting and the completeness check used by the REPL and by
//! completion.
//!
//! The scanner understands single-quoted literals, double-quoted
//! identifiers (both with doubled-quote escapes), `--` line comments and
//! `/* ... */` block comments. It does not parse SQL.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingToken {
    /// An unterminated literal or quoted identifier.
    Quote(char),
    /// An unterminated `/* ... */` comment.
    BlockCommentEnd,
    /// Statement text that has not been terminated by `;` yet.
    Semicolon,
}

impl MissingToken {
    /// Completing inside a literal or a comment would only offer noise.
    pub fn suppresses_completion(self) -> bool {
        matches!(self, MissingToken::Quote(_) | MissingToken::BlockCommentEnd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Complete,
    Incomplete(MissingToken),
}

/// Decides whether a buffer holds complete statements.
pub trait StatementParser: Send + Sync {
    fn parse(&self, buffer: &str) -> ParseOutcome;
}

/// Quote and comment aware scanner, see the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlScanner;

impl StatementParser for SqlScanner {
    fn parse(&self, buffer: &str) -> ParseOutcome {
        let scan = scan(buffer);
        match scan.state {
            State::Quoted(q) => ParseOutcome::Incomplete(MissingToken::Quote(q)),
            State::BlockComment => ParseOutcome::Incomplete(MissingToken::BlockCommentEnd),
            State::Normal | State::LineComment if scan.pending => {
                ParseOutcome::Incomplete(MissingToken::Semicolon)
            }
            _ => ParseOutcome::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Quoted(char),
    LineComment,
    BlockComment,
}

struct Scan {
    statements: Vec<String>,
    /// Text after the last terminator.
    rest: String,
    /// `rest` holds something other than whitespace and comments.
    pending: bool,
    state: State,
}

fn scan(input: &str) -> Scan {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut pending = false;
    let mut state = State::Normal;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::LineComment => {
                current.push(ch);
                if ch == '\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                current.push(ch);
                if ch == '*' && chars.peek() == Some(&'/') {
                    current.push('/');
                    chars.next();
                    state = State::Normal;
                }
            }
            State::Quoted(q) => {
                current.push(ch);
                if ch == q {
                    // doubled quote stays inside the literal
                    if chars.peek() == Some(&q) {
                        current.push(q);
                        chars.next();
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Normal => match ch {
                '-' if chars.peek() == Some(&'-') => {
                    current.push(ch);
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    current.push(ch);
                    current.push('*');
                    chars.next();
                    state = State::BlockComment;
                }
                '\'' | '"' => {
                    current.push(ch);
                    pending = true;
                    state = State::Quoted(ch);
                }
                ';' => {
                    let stmt = current.trim();
                    if pending && !stmt.is_empty() {
                        statements.push(stmt.to_string());
                    }
                    current.clear();
                    pending = false;
                }
                _ => {
                    if !ch.is_whitespace() {
                        pending = true;
                    }
                    current.push(ch);
                }
            },
        }
    }

    Scan {
        statements,
        rest: current,
        pending,
        state,
    }
}

/// Split `input` into statements. Empty statements and statements holding
/// only comments are skipped; a trailing statement without `;` is kept.
pub fn split_statements(input: &str) -> Vec<String> {
    let scan = scan(input);
    let mut statements = scan.statements;
    let rest = scan.rest.trim();
    if scan.pending && !rest.is_empty() {
        statements.push(rest.to_string());
    }
    statements
}
