//! Spoken arithmetic: word normalization plus a recursive-descent evaluator.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-2^2` is `-4`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArithmeticError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Longest expression, in characters, that is treated as arithmetic.
pub const MAX_EXPRESSION_CHARS: usize = 256;

/// Deepest nesting of parentheses, signs and exponents the parser follows.
pub const MAX_DEPTH: usize = 64;

/// Phrases stripped from the start of a question before parsing.
const PREFIXES: &[&str] = &[
    "how much is",
    "what is",
    "what's",
    "calculate",
    "compute",
    "combien fait",
    "calcule",
];

/// Word operators, longest first so "multiplied by" wins over "by".
const WORD_OPERATORS: &[(&str, &str)] = &[
    (" to the power of ", " ^ "),
    (" multiplied by ", " * "),
    (" divided by ", " / "),
    (" modulo ", " % "),
    (" plus ", " + "),
    (" minus ", " - "),
    (" times ", " * "),
    (" over ", " / "),
    (" mod ", " % "),
];

/// Rewrite a spoken question into a bare expression.
///
/// `"What is 2 plus 3 times 4?"` becomes `"2 + 3 * 4"`.
pub fn normalize(text: &str) -> String {
    let mut s = text
        .trim()
        .trim_end_matches(['?', '!', '.', '='])
        .trim()
        .to_lowercase();

    for prefix in PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start().to_string();
            break;
        }
    }

    let mut padded = format!(" {s} ");
    for (word, symbol) in WORD_OPERATORS {
        // Repeat so adjacent matches sharing a space are all replaced.
        while padded.contains(word) {
            padded = padded.replace(word, symbol);
        }
    }
    let spoken_times = padded.replace('×', "*").replace('÷', "/");
    replace_standalone_x(&spoken_times).trim().to_string()
}

/// Turn an `x` standing alone between operands (`6 x 7`, `6x7`) into `*`.
///
/// An `x` inside a word is left alone.
fn replace_standalone_x(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let operand_end = |c: char| c.is_ascii_digit() || c == ')' || c == '.';
    let operand_start = |c: char| c.is_ascii_digit() || c == '(' || c == '.';

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c != 'x' {
                return c;
            }
            let before = chars[..i].iter().rev().find(|c| !c.is_whitespace());
            let after = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            match (before, after) {
                (Some(&b), Some(&a)) if operand_end(b) && operand_start(a) => '*',
                _ => c,
            }
        })
        .collect()
}

/// Whether `expr` (already normalized) is plausibly arithmetic.
///
/// Requires at least one digit and one binary operator, nothing outside
/// digits, operators, parentheses and whitespace, and at most
/// [`MAX_EXPRESSION_CHARS`] characters.
pub fn looks_like_expression(expr: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || "+-*/%^().".contains(c) || c.is_whitespace();
    let has_digit = expr.chars().any(|c| c.is_ascii_digit());
    if expr.chars().count() > MAX_EXPRESSION_CHARS {
        return false;
    }
    let has_operator = expr
        .trim_start_matches(['-', '+'])
        .chars()
        .any(|c| "+-*/%^".contains(c));
    !expr.is_empty() && expr.chars().all(allowed) && has_digit && has_operator
}

/// Parse and evaluate a normalized expression.
pub fn evaluate(expr: &str) -> Result<f64, ArithmeticError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some((token, pos)) = parser.peek_with_pos() {
        return Err(ArithmeticError::UnexpectedToken {
            found: token.describe(),
            pos,
        });
    }
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ArithmeticError::NotFinite)
    }
}

/// Render a result without a trailing `.0`, rounded to six decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", format_number(*n)),
            Token::Op(c) => format!("operator '{c}'"),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<(Token, usize)>, ArithmeticError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ArithmeticError::UnexpectedChar { ch: c, pos: start })?;
                tokens.push((Token::Number(value), start));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push((Token::Op(c), i));
                i += 1;
            }
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            other => return Err(ArithmeticError::UnexpectedChar { ch: other, pos: i }),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Run `parse` one nesting level down, failing past [`MAX_DEPTH`].
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<f64, ArithmeticError>,
    ) -> Result<f64, ArithmeticError> {
        if self.depth >= MAX_DEPTH {
            return Err(ArithmeticError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_with_pos(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).cloned()
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_op(&mut self, ops: &[char]) -> Option<char> {
        match self.peek() {
            Some(Token::Op(c)) if ops.contains(c) => {
                let c = *c;
                self.pos += 1;
                Some(c)
            }
            _ => None,
        }
    }

    fn expr(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.term()?;
        while let Some(op) = self.eat_op(&['+', '-']) {
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ArithmeticError> {
        let mut value = self.unary()?;
        while let Some(op) = self.eat_op(&['*', '/', '%']) {
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == 0.0 => return Err(ArithmeticError::DivisionByZero),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, ArithmeticError> {
        match self.eat_op(&['-', '+']) {
            Some('-') => Ok(-self.nested(Self::unary)?),
            Some(_) => self.nested(Self::unary),
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, ArithmeticError> {
        let base = self.primary()?;
        if self.eat_op(&['^']).is_some() {
            let exponent = self.nested(Self::unary)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, ArithmeticError> {
        match self.next() {
            Some((Token::Number(n), _)) => Ok(n),
            Some((Token::LParen, _)) => {
                let value = self.nested(Self::expr)?;
                match self.next() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((token, pos)) => Err(ArithmeticError::UnexpectedToken {
                        found: token.describe(),
                        pos,
                    }),
                    None => Err(ArithmeticError::UnexpectedEnd),
                }
            }
            Some((token, pos)) => Err(ArithmeticError::UnexpectedToken {
                found: token.describe(),
                pos,
            }),
            None => Err(ArithmeticError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<f64, ArithmeticError> {
        evaluate(&normalize(text))
    }

    #[test]
    fn test_precedence_with_words() {
        assert_eq!(normalize("what is 2 plus 3 times 4"), "2 + 3 * 4");
        assert_eq!(eval("what is 2 plus 3 times 4").unwrap(), 14.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval("2^3^2").unwrap(), 512.0);
        assert_eq!(eval("2 to the power of 10").unwrap(), 1024.0);
        assert_eq!(eval("-2^2").unwrap(), -4.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1/0"), Err(ArithmeticError::DivisionByZero));
        assert_eq!(eval("5 mod 0"), Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn test_parentheses_and_unary() {
        assert_eq!(eval("(2 + 3) * -4").unwrap(), -20.0);
        assert_eq!(eval("--3").unwrap(), 3.0);
        assert_eq!(eval("10 % 4").unwrap(), 2.0);
    }

    #[test]
    fn test_symbol_aliases() {
        assert_eq!(eval("6 x 7").unwrap(), 42.0);
        assert_eq!(eval("6 × 7").unwrap(), 42.0);
        assert_eq!(eval("9 ÷ 3").unwrap(), 3.0);
        assert_eq!(eval("calcule 8 divided by 2?").unwrap(), 4.0);
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("(1 + 2"), Err(ArithmeticError::UnexpectedEnd));
        assert_eq!(eval("1 +"), Err(ArithmeticError::UnexpectedEnd));
        assert!(matches!(
            eval("1 2"),
            Err(ArithmeticError::UnexpectedToken { pos: 2, .. })
        ));
        assert!(matches!(
            evaluate("1 & 2"),
            Err(ArithmeticError::UnexpectedChar { ch: '&', pos: 2 })
        ));
        assert!(matches!(
            evaluate("1.2.3"),
            Err(ArithmeticError::UnexpectedChar { .. })
        ));
        assert_eq!(evaluate("10 ^ 400"), Err(ArithmeticError::NotFinite));
    }

    #[test]
    fn test_looks_like_expression() {
        assert!(looks_like_expression("2 + 2"));
        assert!(looks_like_expression("(1+2)*3"));
        assert!(!looks_like_expression("42"));
        assert!(!looks_like_expression("-42"));
        assert!(!looks_like_expression("john 3:16"));
        assert!(!looks_like_expression("who is jesus"));
        assert!(!looks_like_expression(""));
    }

    #[test]
    fn test_x_is_only_replaced_between_operands() {
        assert_eq!(normalize("6 x 7"), "6 * 7");
        assert_eq!(normalize("6x7"), "6*7");
        assert_eq!(normalize("(1+2) x 3"), "(1+2) * 3");
        assert_eq!(normalize("exodus 20"), "exodus 20");
        assert_eq!(normalize("2 x"), "2 x");
        assert!(!looks_like_expression(&normalize("max 2 + 3")));
    }

    #[test]
    fn test_deep_nesting_is_an_error_not_a_crash() {
        let signs = format!("{}1+1", "-".repeat(200_000));
        assert_eq!(
            evaluate(&signs),
            Err(ArithmeticError::TooDeep { limit: MAX_DEPTH })
        );

        let parens = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(
            evaluate(&parens),
            Err(ArithmeticError::TooDeep { limit: MAX_DEPTH })
        );

        let tower = vec!["2"; 50_000].join("^");
        assert_eq!(
            evaluate(&tower),
            Err(ArithmeticError::TooDeep { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn test_nesting_within_limit_still_evaluates() {
        let depth = MAX_DEPTH / 2;
        let nested = format!("{}1+1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(evaluate(&nested).unwrap(), 2.0);
        assert_eq!(evaluate(&format!("{}3", "-".repeat(10))).unwrap(), 3.0);
    }

    #[test]
    fn test_overlong_input_is_not_an_expression() {
        let long = vec!["1"; MAX_EXPRESSION_CHARS].join("+");
        assert!(!looks_like_expression(&long));
        assert!(looks_like_expression(&vec!["1"; 10].join("+")));
        assert!(!looks_like_expression(&"-".repeat(200_000)));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
    }
}
