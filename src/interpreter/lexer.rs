use std::str::FromStr;

use bigdecimal::BigDecimal;
use logos::Logos;

use crate::{
    interpreter::{
        token::{Op, Token},
        value::ValueType,
    },
    util::decimal::PI_LITERAL,
};

/// The marker that ends a program: everything from the first `P.S.` to the
/// end of the source is discarded before tokenization.
pub const END_OF_PROGRAM: &str = "P.S.";

/// Represents a raw lexical unit as matched by the generated scanner.
///
/// Lexemes are an internal notion: [`tokenize`] converts them into
/// [`Token`]s, folding the context-sensitive cases (unary minus) that a
/// regular scanner cannot decide on its own.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Lexeme {
    /// Numeric literal lexemes, such as `42` or `3.14`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(BigDecimal),
    /// A digit run growing into letters, such as `2x`. Always malformed;
    /// produced so the whole line can be rejected.
    #[regex(r"[0-9]+(\.[0-9]+)?[a-zA-Z_π][a-zA-Z0-9_π]*")]
    MalformedNumber,
    /// Boolean literal lexemes, `true` or `false`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// String literal lexemes, delimited by `"`.
    #[regex(r#""[^"\n]*""#, parse_string)]
    Text(String),
    /// The `π` constant.
    #[token("π")]
    Pi,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `from`
    #[token("from")]
    From,
    /// `to`
    #[token("to")]
    To,
    /// `step`
    #[token("step")]
    Step,
    /// `return`
    #[token("return")]
    Return,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// An operator or builtin symbol from the operator table. Each alias
    /// maps to the same descriptor; the generated scanner resolves
    /// ambiguous prefixes (`<` vs `<=`) by longest match.
    #[token("||", |_| Op::Or)]
    #[token("&&", |_| Op::And)]
    #[token("<=", |_| Op::LessOrEqual)]
    #[token("≤", |_| Op::LessOrEqual)]
    #[token(">=", |_| Op::GreaterOrEqual)]
    #[token("≥", |_| Op::GreaterOrEqual)]
    #[token("<", |_| Op::Less)]
    #[token(">", |_| Op::Greater)]
    #[token("==", |_| Op::Equals)]
    #[token("!=", |_| Op::NotEquals)]
    #[token("≠", |_| Op::NotEquals)]
    #[token("+", |_| Op::Plus)]
    #[token("-", |_| Op::Minus)]
    #[token("%", |_| Op::Mod)]
    #[token("mod", |_| Op::Mod)]
    #[token("*", |_| Op::Mult)]
    #[token("•", |_| Op::Mult)]
    #[token("×", |_| Op::Mult)]
    #[token("/", |_| Op::Div)]
    #[token("÷", |_| Op::Div)]
    #[token(":", |_| Op::Div)]
    #[token("**", |_| Op::Pow)]
    #[token("^", |_| Op::Pow)]
    #[token("√", |_| Op::Sqrt)]
    #[token("sqrt", |_| Op::Sqrt)]
    #[token("!", |_| Op::Factorial)]
    #[token("sin", |_| Op::Sin)]
    #[token("cos", |_| Op::Cos)]
    #[token("tg", |_| Op::Tan)]
    #[token("tan", |_| Op::Tan)]
    #[token("ln", |_| Op::Ln)]
    #[token("lg", |_| Op::Lg)]
    #[token("int", |_| Op::Int)]
    #[token("abs", |_| Op::Abs)]
    #[token("print", |_| Op::Print)]
    #[token("println", |_| Op::Println)]
    #[token("sleep", |_| Op::Sleep)]
    #[token("rand", |_| Op::Rand)]
    Op(Op),
    /// Identifier lexemes; variable names such as `x` or `total`.
    #[regex(r"[a-zA-Z_π][a-zA-Z0-9_π]*", |lex| lex.slice().to_string())]
    Word(String),
    /// `(`
    #[token("(")]
    LeftBracket,
    /// `)`
    #[token(")")]
    RightBracket,
    /// `=`
    #[token("=")]
    Assign,
    /// `{`
    #[token("{")]
    BlockStart,
    /// `}`
    #[token("}")]
    BlockEnd,
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Converts source text into the token sequence consumed by the parser.
///
/// The scan works line by line:
/// - everything from the first [`END_OF_PROGRAM`] marker on is dropped;
/// - each physical line is tokenized independently and contributes its
///   tokens followed by a [`Token::NewLine`];
/// - a line with malformed input (an unrecognized character, a digit run
///   growing into a word) contributes *no* tokens, so the enclosing formula
///   evaluates to `Undefined` instead of receiving a partial result;
/// - a `-` becomes a unary minus when it follows nothing, another operator,
///   `(`, `=`, or one of the `from`/`to`/`step` loop keywords, and binary
///   subtraction otherwise.
///
/// # Parameters
/// - `source`: The raw script text.
///
/// # Returns
/// `(Token, line)` pairs, with 1-based line numbers.
///
/// # Examples
/// ```
/// use bloq::interpreter::{lexer::tokenize, token::Token};
///
/// let tokens = tokenize("x = 1 + 2");
/// assert_eq!(tokens.len(), 6); // x, =, 1, +, 2, newline
/// assert_eq!(tokens[1].0, Token::Assign);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Vec<(Token, usize)> {
    let source = source.split(END_OF_PROGRAM).next().unwrap_or_default();

    let mut tokens = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        let mut line_tokens: Vec<Token> = Vec::new();
        let mut failed = false;

        for lexeme in Lexeme::lexer(line) {
            match lexeme {
                Ok(Lexeme::MalformedNumber) | Err(()) => {
                    failed = true;
                    break;
                },
                Ok(lexeme) => {
                    let token = into_token(lexeme, line_tokens.last());
                    line_tokens.push(token);
                },
            }
        }

        if !failed {
            tokens.extend(line_tokens.into_iter().map(|t| (t, line_number)));
        }

        tokens.push((Token::NewLine, line_number));
    }

    tokens
}

/// Maps a raw lexeme to a parser token, deciding unary versus binary minus
/// from the previously produced token on the same line.
fn into_token(lexeme: Lexeme, previous: Option<&Token>) -> Token {
    match lexeme {
        Lexeme::Number(d) => Token::Value(ValueType::Decimal(d)),
        Lexeme::Bool(b) => Token::Value(ValueType::Boolean(b)),
        Lexeme::Text(s) => Token::Value(ValueType::Text(s)),
        Lexeme::Pi => {
            let pi = ValueType::parse_decimal(PI_LITERAL).unwrap_or(ValueType::Undefined);
            Token::Value(pi)
        },
        Lexeme::Op(Op::Minus) if minus_is_unary(previous) => Token::Op(Op::UnaryMinus),
        Lexeme::Op(op) => Token::Op(op),
        Lexeme::Word(w) => Token::Word(w),
        Lexeme::LeftBracket => Token::LeftBracket,
        Lexeme::RightBracket => Token::RightBracket,
        Lexeme::Assign => Token::Assign,
        Lexeme::BlockStart => Token::BlockStart,
        Lexeme::BlockEnd => Token::BlockEnd,
        Lexeme::If => Token::If,
        Lexeme::Else => Token::Else,
        Lexeme::While => Token::While,
        Lexeme::For => Token::For,
        Lexeme::From => Token::From,
        Lexeme::To => Token::To,
        Lexeme::Step => Token::Step,
        Lexeme::Return => Token::Return,
        Lexeme::Break => Token::Break,
        Lexeme::Continue => Token::Continue,
        // Skipped by the scanner; listed for exhaustiveness.
        Lexeme::MalformedNumber | Lexeme::Comment | Lexeme::Ignored => Token::NewLine,
    }
}

fn minus_is_unary(previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(Token::Op(_)
             | Token::LeftBracket
             | Token::Assign
             | Token::From
             | Token::To
             | Token::Step) => true,
        Some(_) => false,
    }
}

fn parse_number(lex: &logos::Lexer<Lexeme>) -> Option<BigDecimal> {
    BigDecimal::from_str(lex.slice()).ok()
}

fn parse_bool(lex: &logos::Lexer<Lexeme>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_string(lex: &logos::Lexer<Lexeme>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}
