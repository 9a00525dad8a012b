use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Number(String),
    Symbol(String),
    /// Raw string literal, delimiting quotes and escapes included.
    String(String),
    Comment(String),
    Illegal(String),

    Lparen,
    Rparen,
    Lbrace,
    Rbrace,
}

impl Token {
    pub fn variant_eq(&self, other: Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(&other)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Symbol(value) => write!(f, "{}", value),
            Token::String(value) => write!(f, "{}", value),
            Token::Comment(value) => write!(f, "{}", value),
            Token::Illegal(value) => write!(f, "{}", value),

            Token::Lparen => write!(f, "("),
            Token::Rparen => write!(f, ")"),
            Token::Lbrace => write!(f, "{{"),
            Token::Rbrace => write!(f, "}}"),
        }
    }
}
