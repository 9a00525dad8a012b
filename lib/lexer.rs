use crate::token::Token;

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    char: Option<char>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let char = chars.first().copied();
        Self {
            chars,
            position: 0,
            char,
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        while self.char.is_some_and(|char| char.is_whitespace()) {
            self.read_char();
        }

        let token = match self.char {
            Some(char) => match char {
                '(' => Some(Token::Lparen),
                ')' => Some(Token::Rparen),
                '{' => Some(Token::Lbrace),
                '}' => Some(Token::Rbrace),
                '"' => Some(self.read_string()),
                ';' => {
                    let literal = self.read_until(|char| char == '\n' || char == '\r');
                    Some(Token::Comment(literal))
                }
                '-' if self.is_next_digit() => {
                    self.read_char();
                    let digits = self.read_until(|char| !char.is_ascii_digit());
                    Some(Token::Number(format!("-{digits}")))
                }
                _ if char.is_ascii_digit() => {
                    let literal = self.read_until(|char| !char.is_ascii_digit());
                    Some(Token::Number(literal))
                }
                _ if is_symbol_char(char) => {
                    let literal = self.read_until(|char| !is_symbol_char(char));
                    Some(Token::Symbol(literal))
                }
                _ => Some(Token::Illegal(char.to_string())),
            },
            None => None,
        };

        self.read_char();

        token
    }

    fn read_char(&mut self) {
        self.position += 1;
        self.char = self.chars.get(self.position).copied();
    }

    fn is_next_digit(&self) -> bool {
        self.chars
            .get(self.position + 1)
            .is_some_and(|char| char.is_ascii_digit())
    }

    fn read_until(&mut self, condition: impl Fn(char) -> bool) -> String {
        let mut literal = String::new();
        while let Some(char) = self.char {
            if condition(char) {
                self.position -= 1;
                break;
            }
            literal.push(char);
            self.read_char();
        }
        literal
    }

    /// Leaves the cursor on the closing quote, or past the end when the
    /// literal is unterminated.
    fn read_string(&mut self) -> Token {
        let mut literal = String::from('"');
        self.read_char();
        while let Some(char) = self.char {
            literal.push(char);
            match char {
                '"' => return Token::String(literal),
                '\\' => {
                    self.read_char();
                    match self.char {
                        Some(escaped) => literal.push(escaped),
                        None => break,
                    }
                }
                _ => {}
            }
            self.read_char();
        }
        Token::Illegal(literal)
    }
}

fn is_symbol_char(char: char) -> bool {
    char.is_ascii_alphanumeric() || "_+-*/\\=<>!&".contains(char)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lexer() {
        let input = r#"
                    (def {add} (\ {x & xs} {+ x 1}))
                    ; a comment
                    -5 - -x 10abc
                    "foo \"bar\"" >= != ==
                    "#;

        let mut lexer = Lexer::new(input);

        let mut expected = vec![
            Token::Lparen,
            Token::Symbol("def".to_string()),
            Token::Lbrace,
            Token::Symbol("add".to_string()),
            Token::Rbrace,
            Token::Lparen,
            Token::Symbol("\\".to_string()),
            Token::Lbrace,
            Token::Symbol("x".to_string()),
            Token::Symbol("&".to_string()),
            Token::Symbol("xs".to_string()),
            Token::Rbrace,
            Token::Lbrace,
            Token::Symbol("+".to_string()),
            Token::Symbol("x".to_string()),
            Token::Number("1".to_string()),
            Token::Rbrace,
            Token::Rparen,
            Token::Rparen,
            Token::Comment("; a comment".to_string()),
            Token::Number("-5".to_string()),
            Token::Symbol("-".to_string()),
            Token::Symbol("-x".to_string()),
            Token::Number("10".to_string()),
            Token::Symbol("abc".to_string()),
            Token::String(r#""foo \"bar\"""#.to_string()),
            Token::Symbol(">=".to_string()),
            Token::Symbol("!=".to_string()),
            Token::Symbol("==".to_string()),
        ]
        .into_iter();

        while let Some(token) = lexer.next_token() {
            let expected_type = expected.next().unwrap();
            assert_eq!(token, expected_type);
        }
        assert_eq!(expected.next(), None);
    }

    #[test]
    fn unterminated_string() {
        let mut lexer = Lexer::new(r#""abc"#);
        assert_eq!(lexer.next_token(), Some(Token::Illegal("\"abc".to_string())));
        assert_eq!(lexer.next_token(), None);
    }

    #[test]
    fn illegal_character() {
        let mut lexer = Lexer::new("(+ 1 #)");
        let tokens: Vec<Token> = std::iter::from_fn(|| lexer.next_token()).collect();
        assert_eq!(tokens[3], Token::Illegal("#".to_string()));
        assert_eq!(tokens[4], Token::Rparen);
    }
}
