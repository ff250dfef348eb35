//! Arithmetic evaluation over a whitelisted grammar.
//!
//! The evaluator accepts numeric literals, `+ - * / **`, unary minus and
//! parentheses, and nothing else. There is no identifier resolution, no
//! function calls and no attribute access: any character outside the
//! whitelist is a tokenizer error, so the tool is structurally incapable
//! of executing arbitrary input.

/// Evaluate an arithmetic expression, returning the result as text.
///
/// Failures (unsupported input, bad syntax, division by zero) come back as
/// an `Error:`-tagged string rather than a panic.
pub fn calculator(expression: &str) -> String {
    match evaluate(expression) {
        Ok(value) => format_number(value),
        Err(reason) => format!("Error: could not evaluate expression ({}).", reason),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

fn evaluate(expression: &str) -> Result<f64, String> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err("unexpected trailing input".to_string());
    }
    Ok(value)
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Power);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation: digits, then e/E, optional sign, digits.
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{}'", text))?;
                tokens.push(Token::Number(value));
            }
            c => return Err(format!("unsupported character '{}'", c)),
        }
    }

    Ok(tokens)
}

/// Recursive-descent parser that evaluates as it goes.
///
/// Precedence, lowest to highest: `+ -`, `* /`, unary minus, `**`.
/// `**` is right-associative and binds tighter than unary minus, so
/// `-2**2` is `-4`.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, String> {
        if self.peek() == Some(Token::Minus) {
            self.advance();
            return Ok(-self.unary()?);
        }
        self.power()
    }

    fn power(&mut self) -> Result<f64, String> {
        let base = self.atom()?;
        if self.peek() == Some(Token::Power) {
            self.advance();
            // Right-associative; the exponent may carry its own sign.
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, String> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                if self.advance() != Some(Token::RParen) {
                    return Err("missing closing parenthesis".to_string());
                }
                Ok(value)
            }
            Some(token) => Err(format!("unexpected token {:?}", token)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

/// Integral results print without a fractional part so "67" stays "67".
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_mix() {
        assert_eq!(calculator("2 * 5 + (3 - 1) / 2 ** 2"), "10.5");
    }

    #[test]
    fn test_integral_result_has_no_fraction() {
        assert_eq!(calculator("15*4+7"), "67");
        assert_eq!(calculator("(2 + 3) * (7 - 2) / 5"), "5");
    }

    #[test]
    fn test_division_by_zero_is_error_not_panic() {
        let result = calculator("10 / 0");
        assert!(result.starts_with("Error:"), "got: {}", result);
    }

    #[test]
    fn test_code_injection_is_rejected() {
        let result = calculator("__import__('os').system('x')");
        assert!(result.starts_with("Error:"), "got: {}", result);
    }

    #[test]
    fn test_identifiers_are_rejected() {
        assert!(calculator("sqrt(9)").starts_with("Error:"));
        assert!(calculator("x + 1").starts_with("Error:"));
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        assert_eq!(calculator("-2**2"), "-4");
        assert_eq!(calculator("2**-1"), "0.5");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(calculator("2**3**2"), "512");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(calculator("1e3"), "1000");
        assert_eq!(calculator("1.5e-1"), "0.15");
    }

    #[test]
    fn test_malformed_input() {
        assert!(calculator("").starts_with("Error:"));
        assert!(calculator("2 +").starts_with("Error:"));
        assert!(calculator("(1 + 2").starts_with("Error:"));
        assert!(calculator("1 2").starts_with("Error:"));
    }
}
