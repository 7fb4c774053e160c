use std::collections::HashMap;

use crate::{
    console::NullConsole,
    interpreter::{
        lexer::tokenize,
        parser::{formula::Formula, group::TokenGroup},
        token::Token,
        value::ValueType,
    },
};

/// Parses source text into the structured program tree.
///
/// Parsing never fails: malformed input degrades into empty groups or
/// formulas that evaluate to `Undefined`, so a broken line cannot take the
/// rest of the program down with it.
///
/// # Parameters
/// - `source`: The raw script text.
///
/// # Returns
/// The root [`TokenGroup::Block`] holding one group per statement.
///
/// # Examples
/// ```
/// use bloq::{
///     console::BufferConsole,
///     interpreter::{parser::code::parse, runner::run_group},
/// };
/// use std::collections::HashMap;
///
/// let program = parse("x = 2 + 3");
/// let mut console = BufferConsole::new();
/// let results = run_group(&program, &HashMap::new(), &mut console);
///
/// assert_eq!(results.variables["x"].to_text(), "5");
/// ```
#[must_use]
pub fn parse(source: &str) -> TokenGroup {
    let tokens = tokenize(source);
    let mut groups = Vec::new();
    let mut pos = 0;

    while pos < tokens.len() {
        let (group, next) = read_group(&tokens, pos);
        pos = if next > pos { next } else { pos + 1 };

        if !matches!(group, TokenGroup::Empty) {
            groups.push(group);
        }
    }

    TokenGroup::Block(groups)
}

/// Parses and evaluates a one-line formula against the given bindings.
///
/// This is the convenience path used by the dataflow blocks, where a
/// formula string arrives together with named inputs. Console output is
/// discarded and every failure mode collapses to `Undefined`.
#[must_use]
pub fn calculate_formula(formula: &str, params: &HashMap<String, ValueType>) -> ValueType {
    let run: Vec<Token> = tokenize(formula).into_iter()
                                           .map(|(token, _)| token)
                                           .filter(|token| *token != Token::NewLine)
                                           .collect();

    let mut console = NullConsole;
    Formula::new(run, 1).calculate(params, &mut console)
                        .unwrap_or(ValueType::Undefined)
}

/// Carves exactly one statement group out of the token list, starting at
/// `pos`, and returns it together with the next unconsumed index.
///
/// Dispatch happens on the first non-newline token: `if` enters the
/// condition reader, `while` and `for` their loop readers, `{` a nested
/// block; anything else is read as a formula.
pub(crate) fn read_group(tokens: &[(Token, usize)], pos: usize) -> (TokenGroup, usize) {
    let pos = skip_newlines(tokens, pos);
    let Some((token, _)) = tokens.get(pos) else {
        return (TokenGroup::Empty, pos);
    };

    match token {
        Token::If => read_condition(tokens, pos + 1),
        Token::While => read_while(tokens, pos + 1),
        Token::For => read_for(tokens, pos + 1),
        Token::BlockStart => read_braced_block(tokens, pos + 1),
        Token::BlockEnd => (TokenGroup::Empty, pos + 1),
        _ => read_formula(tokens, pos),
    }
}

/// Reads a single formula statement.
///
/// The run ends at a structural keyword or at a newline — unless the
/// formula ends in a mid-expression state (a trailing binary operator), in
/// which case it continues onto the next physical line.
fn read_formula(tokens: &[(Token, usize)], mut pos: usize) -> (TokenGroup, usize) {
    let line = tokens.get(pos).map_or(0, |(_, l)| *l);
    let mut run: Vec<Token> = Vec::new();

    while let Some((token, _)) = tokens.get(pos) {
        match token {
            Token::Value(_)
            | Token::Word(_)
            | Token::Op(_)
            | Token::LeftBracket
            | Token::RightBracket
            | Token::Assign
            | Token::Return
            | Token::Break
            | Token::Continue => {
                run.push(token.clone());
                pos += 1;
            },
            Token::NewLine => {
                pos += 1;
                if !run.last().is_some_and(Token::is_binary_op) {
                    break;
                }
            },
            _ => break,
        }
    }

    if run.is_empty() {
        return (TokenGroup::Empty, pos);
    }

    (TokenGroup::Formula(Formula::new(run, line)), pos)
}

/// Reads an `if` statement: `(condition)`, the true branch, and an
/// optional `else` with the false branch. Each branch is either a braced
/// block or a single statement.
fn read_condition(tokens: &[(Token, usize)], pos: usize) -> (TokenGroup, usize) {
    let line = tokens.get(pos).map_or(0, |(_, l)| *l);
    let Some((condition_run, pos)) = read_bracketed(tokens, pos) else {
        return (TokenGroup::Empty, pos);
    };

    let condition = Formula::new(condition_run, line);
    let (on_true, pos) = read_branch(tokens, pos);

    let after_true = skip_newlines(tokens, pos);
    if let Some((Token::Else, _)) = tokens.get(after_true) {
        let (on_false, pos) = read_branch(tokens, after_true + 1);
        return (TokenGroup::Condition { condition,
                                        on_true: Box::new(on_true),
                                        on_false: Box::new(on_false), },
                pos);
    }

    (TokenGroup::Condition { condition,
                             on_true: Box::new(on_true),
                             on_false: Box::new(TokenGroup::Block(Vec::new())), },
     pos)
}

/// Reads a `while` statement: `(condition)` followed by the loop body.
fn read_while(tokens: &[(Token, usize)], pos: usize) -> (TokenGroup, usize) {
    let line = tokens.get(pos).map_or(0, |(_, l)| *l);
    let Some((condition_run, pos)) = read_bracketed(tokens, pos) else {
        return (TokenGroup::Empty, pos);
    };

    let condition = Formula::new(condition_run, line);
    let (body, pos) = read_branch(tokens, pos);

    (TokenGroup::WhileLoop { condition,
                             body: Box::new(body), },
     pos)
}

/// Reads a `for` statement header — `variable from <expr> to <expr>
/// [step <expr>]`, optionally wrapped in brackets — and the loop body.
fn read_for(tokens: &[(Token, usize)], pos: usize) -> (TokenGroup, usize) {
    let line = tokens.get(pos).map_or(0, |(_, l)| *l);
    let mut pos = skip_newlines(tokens, pos);

    let bracketed = matches!(tokens.get(pos), Some((Token::LeftBracket, _)));
    if bracketed {
        pos = skip_newlines(tokens, pos + 1);
    }

    let Some((Token::Word(variable), _)) = tokens.get(pos) else {
        return (TokenGroup::Empty, pos);
    };
    let variable = variable.clone();
    pos += 1;

    let Some((Token::From, _)) = tokens.get(pos) else {
        return (TokenGroup::Empty, pos);
    };
    pos += 1;

    let Some((start_run, next)) = read_header_expr(tokens, pos, &[Token::To]) else {
        return (TokenGroup::Empty, pos);
    };
    pos = next;

    let mut end_terminators = vec![Token::NewLine, Token::BlockStart, Token::Step];
    if bracketed {
        end_terminators.push(Token::RightBracket);
    }
    let Some((end_run, next)) = read_header_expr(tokens, pos, &end_terminators) else {
        return (TokenGroup::Empty, pos);
    };

    let stepped = matches!(tokens.get(next), Some((Token::Step, _)));
    pos = next;

    let step = if stepped {
        pos += 1;
        let mut step_terminators = vec![Token::NewLine, Token::BlockStart];
        if bracketed {
            step_terminators.push(Token::RightBracket);
        }
        match read_header_expr(tokens, pos, &step_terminators) {
            Some((step_run, next)) => {
                pos = next;
                Some(Formula::new(step_run, line))
            },
            None => return (TokenGroup::Empty, pos),
        }
    } else {
        None
    };

    // Consume the header's closing bracket, when present.
    if bracketed {
        if let Some((Token::RightBracket, _)) = tokens.get(pos) {
            pos += 1;
        }
    }

    let (body, pos) = read_branch(tokens, pos);

    (TokenGroup::ForLoop { variable,
                           start: Formula::new(start_run, line),
                           end: Formula::new(end_run, line),
                           step,
                           body: Box::new(body), },
     pos)
}

/// Reads one loop-header expression, stopping (without consuming) at any
/// of the given terminator tokens at bracket depth zero. The terminator
/// itself is consumed only when it is a keyword (`to`); bracket and
/// newline terminators are left for the caller.
fn read_header_expr(tokens: &[(Token, usize)],
                    mut pos: usize,
                    terminators: &[Token])
                    -> Option<(Vec<Token>, usize)> {
    let mut run: Vec<Token> = Vec::new();
    let mut depth = 0usize;

    while let Some((token, _)) = tokens.get(pos) {
        if depth == 0 && terminators.contains(token) {
            if *token == Token::To {
                pos += 1;
            }
            if run.is_empty() {
                return None;
            }
            return Some((run, pos));
        }

        match token {
            Token::LeftBracket => {
                depth += 1;
                run.push(token.clone());
            },
            Token::RightBracket => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                run.push(token.clone());
            },
            Token::Value(_) | Token::Word(_) | Token::Op(_) => run.push(token.clone()),
            Token::NewLine => {},
            _ => return None,
        }
        pos += 1;
    }

    if run.is_empty() {
        None
    } else {
        Some((run, pos))
    }
}

/// Reads a parenthesized condition, tracking bracket nesting to find the
/// matching close. Returns the inner tokens and the index just past `)`.
fn read_bracketed(tokens: &[(Token, usize)], pos: usize) -> Option<(Vec<Token>, usize)> {
    let mut pos = skip_newlines(tokens, pos);

    match tokens.get(pos) {
        Some((Token::LeftBracket, _)) => pos += 1,
        _ => return None,
    }

    let mut run: Vec<Token> = Vec::new();
    let mut nesting = 1usize;

    while let Some((token, _)) = tokens.get(pos) {
        match token {
            Token::LeftBracket => {
                nesting += 1;
                run.push(token.clone());
            },
            Token::RightBracket => {
                nesting -= 1;
                if nesting == 0 {
                    return Some((run, pos + 1));
                }
                run.push(token.clone());
            },
            Token::NewLine => {},
            _ => run.push(token.clone()),
        }
        pos += 1;
    }

    None
}

/// Reads a statement body: a braced block when `{` follows, a single
/// statement otherwise.
fn read_branch(tokens: &[(Token, usize)], pos: usize) -> (TokenGroup, usize) {
    let pos = skip_newlines(tokens, pos);

    if let Some((Token::BlockStart, _)) = tokens.get(pos) {
        return read_braced_block(tokens, pos + 1);
    }

    let (group, pos) = read_group(tokens, pos);
    match group {
        TokenGroup::Empty => (TokenGroup::Block(Vec::new()), pos),
        statement => (TokenGroup::Block(vec![statement]), pos),
    }
}

/// Reads statements up to the matching `}`; called with `pos` just past
/// the opening brace.
fn read_braced_block(tokens: &[(Token, usize)], mut pos: usize) -> (TokenGroup, usize) {
    let mut groups: Vec<TokenGroup> = Vec::new();

    loop {
        pos = skip_newlines(tokens, pos);
        match tokens.get(pos) {
            None => break,
            Some((Token::BlockEnd, _)) => {
                pos += 1;
                break;
            },
            Some(_) => {
                let (group, next) = read_group(tokens, pos);
                pos = if next > pos { next } else { pos + 1 };

                if !matches!(group, TokenGroup::Empty) {
                    groups.push(group);
                }
            },
        }
    }

    (TokenGroup::Block(groups), pos)
}

fn skip_newlines(tokens: &[(Token, usize)], mut pos: usize) -> usize {
    while let Some((Token::NewLine, _)) = tokens.get(pos) {
        pos += 1;
    }
    pos
}
