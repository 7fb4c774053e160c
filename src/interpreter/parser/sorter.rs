use crate::interpreter::token::Token;

/// Reorders an infix token sequence into evaluation (postfix) order.
///
/// This is the shunting-yard algorithm with the language's associativity
/// split baked in:
/// - values, words and control markers pass straight to the output;
/// - a left bracket is pushed onto the operator stack; a right bracket pops
///   operators to the output until its matching left bracket is discarded;
/// - an ordinary operator first pops stack operators to the output — while
///   the top has precedence `>=` the incoming operator's for the
///   left-associative tiers (precedence `<= 3`), or strictly `>` for the
///   unary and power tiers (`>= 4`) — and is then pushed;
/// - postfix (right-hand) operators go straight to the output and are never
///   pushed;
/// - at the end of input the remaining stack drains to the output.
///
/// Mismatched brackets in either direction abort the sort and yield an
/// empty sequence, which the enclosing formula treats as a syntax error and
/// evaluates to `Undefined`.
///
/// # Parameters
/// - `tokens`: The infix token run of a single formula (no newlines).
///
/// # Returns
/// The postfix-ordered tokens, or an empty vector on mismatched brackets.
///
/// # Examples
/// ```
/// use bloq::interpreter::{
///     parser::sorter::sort_tokens,
///     token::{Op, Token},
/// };
///
/// let two = || Token::Value(2.into());
/// let three = || Token::Value(3.into());
///
/// // 2 + 3  →  2 3 +
/// let sorted = sort_tokens(vec![two(), Token::Op(Op::Plus), three()]);
/// assert_eq!(sorted, vec![two(), three(), Token::Op(Op::Plus)]);
/// ```
#[must_use]
pub fn sort_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Value(_) | Token::Word(_) => output.push(token),
            Token::Return | Token::Break | Token::Continue => output.push(token),
            Token::LeftBracket => stack.push(token),
            Token::RightBracket => loop {
                match stack.pop() {
                    None => return Vec::new(),
                    Some(Token::LeftBracket) => break,
                    Some(op) => output.push(op),
                }
            },
            Token::Op(op) => {
                while let Some(Token::Op(top)) = stack.last() {
                    let pops = if op.precedence() <= 3 {
                        top.precedence() >= op.precedence()
                    } else {
                        top.precedence() > op.precedence()
                    };

                    if !pops {
                        break;
                    }
                    // The guard above only matches operators, never a
                    // left bracket, so the pop cannot fail.
                    if let Some(popped) = stack.pop() {
                        output.push(popped);
                    }
                }

                if op.is_right_hand() {
                    output.push(Token::Op(op));
                } else {
                    stack.push(Token::Op(op));
                }
            },
            // Structural tokens never reach the sorter; the grouper strips
            // them while carving out formulas.
            _ => {},
        }
    }

    while let Some(top) = stack.pop() {
        if matches!(top, Token::LeftBracket) {
            return Vec::new();
        }
        output.push(top);
    }

    output
}
