//! The concrete syntax tree handed from the parser to the reader.
//!
//! Nodes carry mpc-style tags: a leaf reads `expr|number|regex`, a list
//! reads `expr|sexpr`, and the whole program is rooted at [`ROOT_TAG`].

use std::fmt;

pub const ROOT_TAG: &str = ">";

#[derive(Debug, PartialEq, Clone)]
pub struct SyntaxNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(tag: &str, contents: impl Into<String>) -> Self {
        Self {
            tag: tag.to_string(),
            contents: contents.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(tag: &str, children: Vec<SyntaxNode>) -> Self {
        Self {
            tag: tag.to_string(),
            contents: String::new(),
            children,
        }
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.children.is_empty() {
            return write!(f, "{} '{}'", self.tag, self.contents);
        }
        write!(f, "{}", self.tag)?;
        for child in &self.children {
            for line in child.to_string().lines() {
                write!(f, "\n  {}", line)?;
            }
        }
        Ok(())
    }
}
