//! Hand-written recursive-descent parser for the RPAL grammar.
//!
//! Each production returns a [`Listing`]: the dotted-indent lines (§6) for
//! the fragment it parsed, at *relative* depth 0. A caller that nests a
//! fragment as a child simply prepends one dot to every one of its lines —
//! see [`node`]. The top-level [`parse`] entry point is the only place that
//! walks the result at absolute depth.

use crate::error::ParseError;
use rpal_lexer::token::Token;
use rpal_lexer::{lex, SpannedToken};

/// A parsed fragment's listing lines, each one still missing the leading
/// dots contributed by everything above it in the tree.
pub type Listing = Vec<String>;

fn leaf(label: impl Into<String>) -> Listing {
    vec![label.into()]
}

/// Builds the listing for an internal node: its own label line, followed by
/// every child's lines each indented one level deeper.
fn node(label: &str, children: Vec<Listing>) -> Listing {
    let mut out = vec![label.to_string()];
    for child in children {
        for line in child {
            out.push(format!(".{line}"));
        }
    }
    out
}

pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = lex(source).map_err(ParseError::Lex)?;
        Ok(Parser { tokens, pos: 0 })
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|t| &t.token)
    }

    fn line(&self) -> usize {
        self.peek().map(|t| t.line).unwrap_or_else(|| {
            self.tokens.last().map(|t| t.line).unwrap_or(1)
        })
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek_token() == Some(expected)
    }

    fn eat(&mut self, expected: Token, what: &str) -> Result<SpannedToken, ParseError> {
        match self.advance() {
            Some(tok) if tok.token == expected => Ok(tok),
            Some(tok) => Err(ParseError::UnexpectedToken {
                line: tok.line,
                found: format!("{:?} ({:?})", tok.token, tok.text),
                expected: what.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: what.to_string(),
            }),
        }
    }

    fn eat_identifier(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Some(tok) if tok.token == Token::Identifier => Ok(tok.text),
            Some(tok) => Err(ParseError::UnexpectedToken {
                line: tok.line,
                found: format!("{:?}", tok.token),
                expected: "identifier".to_string(),
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: "identifier".to_string(),
            }),
        }
    }

    /// Parses a complete program: a single `E` followed by end of input.
    pub fn parse_program(&mut self) -> Result<Listing, ParseError> {
        let e = self.parse_e()?;
        if let Some(tok) = self.peek() {
            return Err(ParseError::UnexpectedToken {
                line: tok.line,
                found: format!("{:?}", tok.token),
                expected: "end of input".to_string(),
            });
        }
        Ok(e)
    }

    // E -> 'let' D 'in' E | 'fn' Vb+ '.' E | Ew
    fn parse_e(&mut self) -> Result<Listing, ParseError> {
        if self.check(&Token::Let) {
            self.advance();
            let d = self.parse_d()?;
            self.eat(Token::In, "'in'")?;
            let e = self.parse_e()?;
            return Ok(node("let", vec![d, e]));
        }
        if self.check(&Token::Fn) {
            self.advance();
            let mut params = vec![self.parse_vb()?];
            while self.starts_vb() {
                params.push(self.parse_vb()?);
            }
            self.eat(Token::Dot, "'.'")?;
            let body = self.parse_e()?;
            params.push(body);
            return Ok(node("lambda", params));
        }
        self.parse_ew()
    }

    fn starts_vb(&self) -> bool {
        matches!(self.peek_token(), Some(Token::Identifier) | Some(Token::LParen))
    }

    // Ew -> T 'where' Dr | T
    fn parse_ew(&mut self) -> Result<Listing, ParseError> {
        let t = self.parse_t()?;
        if self.check(&Token::Where) {
            self.advance();
            let dr = self.parse_dr()?;
            return Ok(node("where", vec![t, dr]));
        }
        Ok(t)
    }

    // T -> Ta (',' Ta)+ => 'tau' | Ta
    fn parse_t(&mut self) -> Result<Listing, ParseError> {
        let mut items = vec![self.parse_ta()?];
        while self.check(&Token::Comma) {
            self.advance();
            items.push(self.parse_ta()?);
        }
        if items.len() == 1 {
            Ok(items.pop().unwrap())
        } else {
            Ok(node("tau", items))
        }
    }

    // Ta -> Ta 'aug' Tc => 'aug' | Tc   (left associative)
    fn parse_ta(&mut self) -> Result<Listing, ParseError> {
        let mut left = self.parse_tc()?;
        while self.check(&Token::Aug) {
            self.advance();
            let right = self.parse_tc()?;
            left = node("aug", vec![left, right]);
        }
        Ok(left)
    }

    // Tc -> B '->' Tc '|' Tc => '->' | B
    fn parse_tc(&mut self) -> Result<Listing, ParseError> {
        let cond = self.parse_b()?;
        if self.check(&Token::Arrow) {
            self.advance();
            let then_branch = self.parse_tc()?;
            self.eat(Token::Pipe, "'|'")?;
            let else_branch = self.parse_tc()?;
            return Ok(node("->", vec![cond, then_branch, else_branch]));
        }
        Ok(cond)
    }

    // B -> B 'or' Bt => 'or' | Bt  (left associative)
    fn parse_b(&mut self) -> Result<Listing, ParseError> {
        let mut left = self.parse_bt()?;
        while self.check(&Token::Or) {
            self.advance();
            let right = self.parse_bt()?;
            left = node("or", vec![left, right]);
        }
        Ok(left)
    }

    // Bt -> Bt '&' Bs => '&' | Bs  (left associative)
    fn parse_bt(&mut self) -> Result<Listing, ParseError> {
        let mut left = self.parse_bs()?;
        while self.check(&Token::Ampersand) {
            self.advance();
            let right = self.parse_bs()?;
            left = node("&", vec![left, right]);
        }
        Ok(left)
    }

    // Bs -> 'not' Bp => 'not' | Bp
    fn parse_bs(&mut self) -> Result<Listing, ParseError> {
        if self.check(&Token::Not) {
            self.advance();
            let operand = self.parse_bp()?;
            return Ok(node("not", vec![operand]));
        }
        self.parse_bp()
    }

    // Bp -> A ('gr'|'ge'|'ls'|'le'|'eq'|'ne') A | A  (non-associative)
    fn parse_bp(&mut self) -> Result<Listing, ParseError> {
        let left = self.parse_a()?;
        let tag = match self.peek_token() {
            Some(Token::Gr) => Some("gr"),
            Some(Token::Ge) => Some("ge"),
            Some(Token::Ls) => Some("ls"),
            Some(Token::Le) => Some("le"),
            Some(Token::Eq) => Some("eq"),
            Some(Token::Ne) => Some("ne"),
            _ => None,
        };
        if let Some(tag) = tag {
            self.advance();
            let right = self.parse_a()?;
            return Ok(node(tag, vec![left, right]));
        }
        Ok(left)
    }

    // A -> A '+' At | A '-' At | '+' At | '-' At => 'neg' | At  (left associative)
    fn parse_a(&mut self) -> Result<Listing, ParseError> {
        let mut left = if self.check(&Token::Plus) {
            self.advance();
            self.parse_at()?
        } else if self.check(&Token::Minus) {
            self.advance();
            let operand = self.parse_at()?;
            node("neg", vec![operand])
        } else {
            self.parse_at()?
        };

        loop {
            if self.check(&Token::Plus) {
                self.advance();
                let right = self.parse_at()?;
                left = node("+", vec![left, right]);
            } else if self.check(&Token::Minus) {
                self.advance();
                let right = self.parse_at()?;
                left = node("-", vec![left, right]);
            } else {
                break;
            }
        }
        Ok(left)
    }

    // At -> At '*' Af | At '/' Af | Af  (left associative)
    fn parse_at(&mut self) -> Result<Listing, ParseError> {
        let mut left = self.parse_af()?;
        loop {
            if self.check(&Token::Star) {
                self.advance();
                let right = self.parse_af()?;
                left = node("*", vec![left, right]);
            } else if self.check(&Token::Slash) {
                self.advance();
                let right = self.parse_af()?;
                left = node("/", vec![left, right]);
            } else {
                break;
            }
        }
        Ok(left)
    }

    // Af -> Ap '**' Af => '**' | Ap  (right associative)
    fn parse_af(&mut self) -> Result<Listing, ParseError> {
        let base = self.parse_ap()?;
        if self.check(&Token::Power) {
            self.advance();
            let exp = self.parse_af()?;
            return Ok(node("**", vec![base, exp]));
        }
        Ok(base)
    }

    // Ap -> Ap '@' '<IDENTIFIER>' R => '@' | R  (left associative)
    fn parse_ap(&mut self) -> Result<Listing, ParseError> {
        let mut left = self.parse_r()?;
        while self.check(&Token::At) {
            self.advance();
            let name = self.eat_identifier()?;
            let arg = self.parse_r()?;
            left = node("@", vec![left, leaf(format!("<IDENTIFIER:{name}>")), arg]);
        }
        Ok(left)
    }

    // R -> R Rn => 'gamma' | Rn  (left associative, juxtaposition)
    fn parse_r(&mut self) -> Result<Listing, ParseError> {
        let mut left = self.parse_rn()?;
        while self.starts_rn() {
            let right = self.parse_rn()?;
            left = node("gamma", vec![left, right]);
        }
        Ok(left)
    }

    fn starts_rn(&self) -> bool {
        matches!(
            self.peek_token(),
            Some(Token::Identifier)
                | Some(Token::IntLit)
                | Some(Token::StringLit)
                | Some(Token::True)
                | Some(Token::False)
                | Some(Token::Nil)
                | Some(Token::Dummy)
                | Some(Token::LParen)
        )
    }

    // Rn -> '<IDENTIFIER>' | '<INTEGER>' | '<STRING>' | 'true' | 'false'
    //     | 'nil' | '(' E ')' | 'dummy'
    fn parse_rn(&mut self) -> Result<Listing, ParseError> {
        let tok = self.peek().cloned().ok_or(ParseError::UnexpectedEof {
            expected: "an expression".to_string(),
        })?;
        match tok.token {
            Token::Identifier => {
                self.advance();
                Ok(leaf(format!("<IDENTIFIER:{}>", tok.text)))
            }
            Token::IntLit => {
                self.advance();
                Ok(leaf(format!("<INTEGER:{}>", tok.text)))
            }
            Token::StringLit => {
                self.advance();
                let content = &tok.text[1..tok.text.len() - 1];
                Ok(leaf(format!("<STRING:'{content}'>")))
            }
            Token::True => {
                self.advance();
                Ok(leaf("<TRUE_VALUE:true>"))
            }
            Token::False => {
                self.advance();
                Ok(leaf("<TRUE_VALUE:false>"))
            }
            Token::Nil => {
                self.advance();
                Ok(leaf("<NIL>"))
            }
            Token::Dummy => {
                self.advance();
                Ok(leaf("<dummy>"))
            }
            Token::LParen => {
                self.advance();
                let e = self.parse_e()?;
                self.eat(Token::RParen, "')'")?;
                Ok(e)
            }
            other => Err(ParseError::UnexpectedToken {
                line: tok.line,
                found: format!("{other:?}"),
                expected: "an expression".to_string(),
            }),
        }
    }

    // D -> Da 'within' D => 'within' | Da
    fn parse_d(&mut self) -> Result<Listing, ParseError> {
        let da = self.parse_da()?;
        if self.check(&Token::Within) {
            self.advance();
            let d = self.parse_d()?;
            return Ok(node("within", vec![da, d]));
        }
        Ok(da)
    }

    // Da -> Dr ('and' Dr)+ => 'and' | Dr
    fn parse_da(&mut self) -> Result<Listing, ParseError> {
        let mut items = vec![self.parse_dr()?];
        while self.check(&Token::And) {
            self.advance();
            items.push(self.parse_dr()?);
        }
        if items.len() == 1 {
            Ok(items.pop().unwrap())
        } else {
            Ok(node("and", items))
        }
    }

    // Dr -> 'rec' Db => 'rec' | Db
    fn parse_dr(&mut self) -> Result<Listing, ParseError> {
        if self.check(&Token::Rec) {
            self.advance();
            let db = self.parse_db()?;
            return Ok(node("rec", vec![db]));
        }
        self.parse_db()
    }

    // Db -> Vl '=' E => '='
    //     | '<IDENTIFIER>' Vb+ '=' E => 'function_form'
    //     | '(' D ')'
    fn parse_db(&mut self) -> Result<Listing, ParseError> {
        if self.check(&Token::LParen) && self.paren_is_vl_binding() {
            let vl = self.parse_paren_vl()?;
            self.eat(Token::Equals, "'='")?;
            let e = self.parse_e()?;
            return Ok(node("=", vec![vl, e]));
        }
        if self.check(&Token::LParen) {
            self.advance();
            let d = self.parse_d()?;
            self.eat(Token::RParen, "')'")?;
            return Ok(d);
        }

        let name = self.eat_identifier()?;
        if self.check(&Token::Equals) {
            self.advance();
            let e = self.parse_e()?;
            return Ok(node("=", vec![leaf(format!("<IDENTIFIER:{name}>")), e]));
        }

        let mut params = vec![self.parse_vb()?];
        while self.starts_vb() {
            params.push(self.parse_vb()?);
        }
        self.eat(Token::Equals, "'='")?;
        let e = self.parse_e()?;
        let mut children = vec![leaf(format!("<IDENTIFIER:{name}>"))];
        children.extend(params);
        children.push(e);
        Ok(node("function_form", children))
    }

    /// Looks ahead (without consuming) to decide whether the parenthesized
    /// group starting at the current position is a tuple-pattern binding
    /// `(a, b, ...) = E` rather than a parenthesized definition `(D)`.
    fn paren_is_vl_binding(&self) -> bool {
        let mut i = self.pos + 1; // skip '('
        let mut saw_identifier = false;
        loop {
            match self.tokens.get(i).map(|t| &t.token) {
                Some(Token::Identifier) => {
                    saw_identifier = true;
                    i += 1;
                    match self.tokens.get(i).map(|t| &t.token) {
                        Some(Token::Comma) => {
                            i += 1;
                            continue;
                        }
                        Some(Token::RParen) => {
                            i += 1;
                            break;
                        }
                        _ => return false,
                    }
                }
                Some(Token::RParen) if !saw_identifier => {
                    i += 1;
                    break;
                }
                _ => return false,
            }
        }
        matches!(self.tokens.get(i).map(|t| &t.token), Some(Token::Equals))
    }

    /// Parses `(a, b, ...)` as a tuple-pattern left-hand side, already
    /// confirmed by [`Self::paren_is_vl_binding`]. A single name collapses to
    /// a bare identifier leaf; more than one becomes a `,` node.
    fn parse_paren_vl(&mut self) -> Result<Listing, ParseError> {
        self.eat(Token::LParen, "'('")?;
        let mut names = Vec::new();
        if !self.check(&Token::RParen) {
            names.push(self.eat_identifier()?);
            while self.check(&Token::Comma) {
                self.advance();
                names.push(self.eat_identifier()?);
            }
        }
        self.eat(Token::RParen, "')'")?;
        let leaves: Vec<Listing> = names
            .into_iter()
            .map(|n| leaf(format!("<IDENTIFIER:{n}>")))
            .collect();
        if leaves.len() == 1 {
            Ok(leaves.into_iter().next().unwrap())
        } else {
            Ok(node(",", leaves))
        }
    }

    // Vb -> '<IDENTIFIER>' | '(' Vl ')'
    fn parse_vb(&mut self) -> Result<Listing, ParseError> {
        if self.check(&Token::Identifier) {
            let name = self.eat_identifier()?;
            return Ok(leaf(format!("<IDENTIFIER:{name}>")));
        }
        self.parse_paren_vl()
    }
}
