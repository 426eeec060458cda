//! Expression parser
//!
//! A recursive descent parser for substituted arithmetic expressions with
//! proper operator precedence. Anything outside the grammar, including
//! unknown identifiers and characters, is a parse error; no other code
//! path ever sees the expression text.

use crate::ast::{constant, BinaryOperator, Expr, MathFunction, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Maximum nesting of parentheses, helper calls and unary operators
const MAX_NESTING: usize = 256;

/// Parse an expression into an AST
///
/// # Example
/// ```rust
/// use offer_sheets_formula::parse_expression;
///
/// let ast = parse_expression("1+2*3").unwrap();
/// let ast = parse_expression("max(2, sqrt(16)) >= 4").unwrap();
/// assert!(parse_expression("alert(1)").is_err());
/// ```
pub fn parse_expression(input: &str) -> FormulaResult<Expr> {
    let mut parser = ExpressionParser::new(input)?;
    let expr = parser.parse_comparison()?;

    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Comma,

    // Delimiters
    LeftParen,
    RightParen,

    Eof,
}

struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    depth: usize,
}

impl<'a> ExpressionParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            depth: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match c {
            '<' => {
                self.advance();
                if self.eat('=') {
                    return Ok(Token::LessEqual);
                }
                if self.eat('>') {
                    return Ok(Token::NotEqual);
                }
                return Ok(Token::LessThan);
            }
            '>' => {
                self.advance();
                if self.eat('=') {
                    return Ok(Token::GreaterEqual);
                }
                return Ok(Token::GreaterThan);
            }
            '=' => {
                self.advance();
                self.eat('=');
                return Ok(Token::Equal);
            }
            '!' => {
                self.advance();
                if self.eat('=') {
                    return Ok(Token::NotEqual);
                }
                return Err(FormulaError::Parse("Unexpected '!'".into()));
            }
            _ => {}
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = self.pos;
            while self
                .peek_char()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
            return Ok(Token::Identifier(self.input[start..self.pos].to_string()));
        }

        Err(FormulaError::Parse(format!("Unexpected character '{}'", c)))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", num_str)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // === Expression parsing with precedence ===
    // Precedence (lowest to highest):
    // 1. Comparison: =, ==, <>, !=, <, <=, >, >=
    // 2. Addition/Subtraction: +, -
    // 3. Multiplication/Division: *, /
    // 4. Exponentiation: ^ (right associative)
    // 5. Unary: -, +
    // 6. Primary: numbers, constants, helper calls, parentheses

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> FormulaResult<T>,
    ) -> FormulaResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::Parse("Expression is nested too deeply".into()));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_comparison(&mut self) -> FormulaResult<Expr> {
        self.nested(Self::parse_comparison_inner)
    }

    fn parse_comparison_inner(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.current_token() {
                Token::Equal => BinaryOperator::Equal,
                Token::NotEqual => BinaryOperator::NotEqual,
                Token::LessThan => BinaryOperator::LessThan,
                Token::LessEqual => BinaryOperator::LessEqual,
                Token::GreaterThan => BinaryOperator::GreaterThan,
                Token::GreaterEqual => BinaryOperator::GreaterEqual,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_exponent()?;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            let right = self.parse_exponent()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_exponent(&mut self) -> FormulaResult<Expr> {
        let left = self.parse_unary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume()?;
            let right = self.nested(Self::parse_exponent)?; // Right associative
            return Ok(Expr::Binary {
                op: BinaryOperator::Power,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_primary(),
        };

        self.consume()?;
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expr::Number(n))
            }

            Token::LeftParen => {
                self.consume()?;
                let expr = self.parse_comparison()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }

            Token::Identifier(name) => {
                self.consume()?;
                if matches!(self.current_token(), Token::LeftParen) {
                    return self.parse_call(name);
                }

                if name.eq_ignore_ascii_case("TRUE") {
                    Ok(Expr::Boolean(true))
                } else if name.eq_ignore_ascii_case("FALSE") {
                    Ok(Expr::Boolean(false))
                } else {
                    constant(&name)
                        .map(Expr::Number)
                        .ok_or(FormulaError::UnknownIdentifier(name))
                }
            }

            token => Err(FormulaError::Parse(format!("Unexpected token: {:?}", token))),
        }
    }

    fn parse_call(&mut self, name: String) -> FormulaResult<Expr> {
        let function =
            MathFunction::from_name(&name).ok_or(FormulaError::UnknownIdentifier(name))?;

        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();
        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_comparison()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume()?;
                args.push(self.parse_comparison()?);
            }
        }

        self.expect(&Token::RightParen)?;

        let (min, max) = function.arity();
        if args.len() < min || max.map_or(false, |max| args.len() > max) {
            let expected = match max {
                Some(max) if max == min => min.to_string(),
                Some(max) => format!("{} to {}", min, max),
                None => format!("at least {}", min),
            };
            return Err(FormulaError::ArgumentCount {
                function: function.name().to_string(),
                expected,
                actual: args.len(),
            });
        }

        Ok(Expr::Call { function, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_expression("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse_expression(" 3.14 ").unwrap(), Expr::Number(3.14));
        assert_eq!(parse_expression("1e3").unwrap(), Expr::Number(1000.0));
        assert_eq!(parse_expression(".5").unwrap(), Expr::Number(0.5));
        assert!(parse_expression("1e").is_err());
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(
            parse_expression("1+2*3").unwrap(),
            Expr::Binary {
                op: BinaryOperator::Add,
                left: num(1.0),
                right: Box::new(Expr::Binary {
                    op: BinaryOperator::Multiply,
                    left: num(2.0),
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(
            parse_expression("2^3^2").unwrap(),
            Expr::Binary {
                op: BinaryOperator::Power,
                left: num(2.0),
                right: Box::new(Expr::Binary {
                    op: BinaryOperator::Power,
                    left: num(3.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_comparison_operators() {
        for (text, op) in [
            ("1=2", BinaryOperator::Equal),
            ("1==2", BinaryOperator::Equal),
            ("1<>2", BinaryOperator::NotEqual),
            ("1!=2", BinaryOperator::NotEqual),
            ("1<2", BinaryOperator::LessThan),
            ("1<=2", BinaryOperator::LessEqual),
            ("1>2", BinaryOperator::GreaterThan),
            ("1>=2", BinaryOperator::GreaterEqual),
        ] {
            assert_eq!(
                parse_expression(text).unwrap(),
                Expr::Binary {
                    op,
                    left: num(1.0),
                    right: num(2.0)
                },
                "{text}"
            );
        }
    }

    #[test]
    fn test_helpers_and_constants() {
        assert_eq!(
            parse_expression("SQRT(4)").unwrap(),
            Expr::Call {
                function: MathFunction::Sqrt,
                args: vec![Expr::Number(4.0)],
            }
        );
        assert_eq!(
            parse_expression("pi").unwrap(),
            Expr::Number(std::f64::consts::PI)
        );
        assert_eq!(parse_expression("TRUE").unwrap(), Expr::Boolean(true));
    }

    #[test]
    fn test_rejects_unknown_identifiers() {
        assert_eq!(
            parse_expression("x + 1"),
            Err(FormulaError::UnknownIdentifier("x".into()))
        );
        assert_eq!(
            parse_expression("constructor(1)"),
            Err(FormulaError::UnknownIdentifier("constructor".into()))
        );
        assert!(parse_expression("\"a\"").is_err());
        assert!(parse_expression("1;2").is_err());
        assert!(parse_expression("[1]").is_err());
    }

    #[test]
    fn test_helper_arity() {
        assert!(matches!(
            parse_expression("pow(2)"),
            Err(FormulaError::ArgumentCount { actual: 1, .. })
        ));
        assert!(parse_expression("max()").is_ok());
        assert!(parse_expression("abs(1, 2)").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(parse_expression(&deep).is_err());
        assert!(parse_expression(&"-".repeat(10_000)).is_err());

        let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse_expression(&shallow).unwrap(), Expr::Number(1.0));
    }

    #[test]
    fn test_unbalanced() {
        assert!(parse_expression("(1+2").is_err());
        assert!(parse_expression("1+2)").is_err());
        assert!(parse_expression("").is_err());
        assert!(parse_expression("1 2").is_err());
    }
}
