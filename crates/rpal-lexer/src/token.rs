use logos::Logos;

#[derive(Default, Debug, Clone)]
pub struct LexerExtras {
    pub line: usize,
}

fn newline_callback(lex: &mut logos::Lexer<Token>) {
    lex.extras.line += 1;
}

fn line_comment_callback(lex: &mut logos::Lexer<Token>) {
    lex.extras.line += lex.slice().chars().filter(|&c| c == '\n').count();
}

fn string_callback(lex: &mut logos::Lexer<Token>) {
    lex.extras.line += lex.slice().chars().filter(|&c| c == '\n').count();
}

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(extras = LexerExtras)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(error = String)]
pub enum Token {
    // ── Newlines & comments (tracked for line counting, not emitted) ──
    #[regex(r"\n", newline_callback)]
    Newline,

    #[regex(r"//[^\n]*", line_comment_callback)]
    LineComment,

    // ── Keywords ──────────────────────────────────────────────
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("fn")]
    Fn,
    #[token("where")]
    Where,
    #[token("aug")]
    Aug,
    #[token("or")]
    Or,
    #[token("and")]
    And,
    #[token("not")]
    Not,
    #[token("gr")]
    Gr,
    #[token("ge")]
    Ge,
    #[token("ls")]
    Ls,
    #[token("le")]
    Le,
    #[token("eq")]
    Eq,
    #[token("ne")]
    Ne,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[token("dummy")]
    Dummy,
    #[token("within")]
    Within,
    #[token("rec")]
    Rec,

    // ── Punctuation ───────────────────────────────────────────
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    /// Separates a lambda's parameter list from its body: `fn x . E`.
    #[token(".")]
    Dot,

    // ── Operators (multi-char before single-char) ─────────────
    #[token("**")]
    Power,
    #[token("->")]
    Arrow,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("@")]
    At,
    #[token("&")]
    Ampersand,
    #[token("=")]
    Equals,
    #[token("|")]
    Pipe,

    // ── Literals ──────────────────────────────────────────────
    #[regex(r"[0-9]+")]
    IntLit,

    // Single-quote delimited; `\'` is the only escape the lexer itself
    // resolves (for quote matching) — the raw text, escapes untouched, is
    // kept as the token's slice. Further escape expansion is a printer-time
    // concern (§4.7), not a lexer concern.
    #[regex(r"'([^'\\]|\\.)*'", string_callback)]
    StringLit,

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Identifier,
}

impl Token {
    /// Returns true for tokens that are only used for line tracking
    /// and should not be emitted to the parser.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Token::Newline | Token::LineComment)
    }
}
