use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use crate::{
    lexer::Lexer,
    syntax::{SyntaxNode, ROOT_TAG},
    token::Token,
};

const NUMBER_TAG: &str = "expr|number|regex";
const SYMBOL_TAG: &str = "expr|symbol|regex";
const STRING_TAG: &str = "expr|string|regex";
const COMMENT_TAG: &str = "expr|comment|regex";
const SEXPR_TAG: &str = "expr|sexpr";
const QEXPR_TAG: &str = "expr|qexpr";
const CHAR_TAG: &str = "char";
const REGEX_TAG: &str = "regex";

/// Parses a whole source unit into a tree rooted at [`ROOT_TAG`].
pub fn parse(input: &str) -> Result<SyntaxNode> {
    Parser::new(Lexer::new(input)).parse_program()
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<SyntaxNode> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    parse(&input).with_context(|| format!("{}", path.display()))
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Option<Token>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        Self {
            cur_token: lexer.next_token(),
            lexer,
        }
    }

    pub fn parse_program(&mut self) -> Result<SyntaxNode> {
        let mut children = vec![SyntaxNode::leaf(REGEX_TAG, "")];
        while self.cur_token().is_some() {
            children.push(self.parse_expression()?);
            self.next_token();
        }
        children.push(SyntaxNode::leaf(REGEX_TAG, ""));
        Ok(SyntaxNode::branch(ROOT_TAG, children))
    }

    fn cur_token(&mut self) -> Option<Token> {
        self.cur_token.clone()
    }

    fn next_token(&mut self) -> &mut Self {
        self.cur_token = self.lexer.next_token();
        self
    }

    fn parse_expression(&mut self) -> Result<SyntaxNode> {
        let node = match self.cur_token().ok_or(anyhow!("no token found"))? {
            Token::Number(value) => SyntaxNode::leaf(NUMBER_TAG, value),
            Token::Symbol(value) => SyntaxNode::leaf(SYMBOL_TAG, value),
            Token::String(value) => SyntaxNode::leaf(STRING_TAG, value),
            Token::Comment(value) => SyntaxNode::leaf(COMMENT_TAG, value),
            Token::Lparen => self.parse_list(Token::Lparen, Token::Rparen, SEXPR_TAG)?,
            Token::Lbrace => self.parse_list(Token::Lbrace, Token::Rbrace, QEXPR_TAG)?,
            Token::Illegal(value) if value.starts_with('"') => {
                bail!("unterminated string literal {value}")
            }
            Token::Illegal(value) => bail!("unexpected character '{value}'"),
            token => bail!("unexpected {token}"),
        };
        Ok(node)
    }

    fn parse_list(&mut self, open: Token, close: Token, tag: &str) -> Result<SyntaxNode> {
        let mut children = vec![SyntaxNode::leaf(CHAR_TAG, open.to_string())];

        self.next_token();

        loop {
            match self.cur_token() {
                Some(token) if token.variant_eq(close.clone()) => break,
                Some(_) => {
                    children.push(self.parse_expression()?);
                    self.next_token();
                }
                None => bail!("expected {close}, found end of input"),
            }
        }

        children.push(SyntaxNode::leaf(CHAR_TAG, close.to_string()));

        Ok(SyntaxNode::branch(tag, children))
    }
}
