//! Recursive-descent parser, token stream → [`ast::Node`].
//!
//! ```text
//! program := stmt*                          -> synthetic root
//! stmt    := '>' | '<' | '+' | '-' | '.' | ',' | loop
//! loop    := '[' stmt* ']'
//! ```

use crate::ast::Node;
use crate::error::Error;
use crate::lexer::{Lexer, Token, TokenKind};

/// Parses a Brainfuck source buffer into an AST.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        let mut lexer = Lexer::new(src);
        let cur = lexer.next();
        Parser { lexer, cur }
    }

    fn advance(&mut self) {
        self.cur = self.lexer.next();
    }

    /// Parse the whole program into a synthetic `Loop` root.
    pub fn parse_program(&mut self) -> Result<Node, Error> {
        let mut stmts = Vec::new();
        while self.cur.kind != TokenKind::End {
            if self.cur.kind == TokenKind::RBrack {
                return Err(Error::Syntax {
                    pos: self.cur.pos,
                    message: "unexpected ']' without matching '['".to_string(),
                });
            }
            stmts.push(self.parse_stmt()?);
        }
        Ok(Node::Loop(stmts))
    }

    fn parse_stmt(&mut self) -> Result<Node, Error> {
        let node = match self.cur.kind {
            TokenKind::Gt => {
                self.advance();
                Node::MovePtr(1)
            }
            TokenKind::Lt => {
                self.advance();
                Node::MovePtr(-1)
            }
            TokenKind::Plus => {
                self.advance();
                Node::AddVal(1)
            }
            TokenKind::Minus => {
                self.advance();
                Node::AddVal(-1)
            }
            TokenKind::Dot => {
                self.advance();
                Node::Output
            }
            TokenKind::Comma => {
                self.advance();
                Node::Input
            }
            TokenKind::LBrack => return self.parse_loop(),
            TokenKind::RBrack => {
                return Err(Error::Syntax {
                    pos: self.cur.pos,
                    message: "unexpected ']' without matching '['".to_string(),
                });
            }
            TokenKind::End => unreachable!("caller checks for End before calling parse_stmt"),
        };
        Ok(node)
    }

    fn parse_loop(&mut self) -> Result<Node, Error> {
        let open_pos = self.cur.pos;
        self.advance(); // consume '['

        let mut stmts = Vec::new();
        while self.cur.kind != TokenKind::RBrack && self.cur.kind != TokenKind::End {
            stmts.push(self.parse_stmt()?);
        }

        if self.cur.kind != TokenKind::RBrack {
            return Err(Error::Syntax {
                pos: open_pos,
                message: "unmatched '['".to_string(),
            });
        }
        self.advance(); // consume ']'

        Ok(Node::Loop(stmts))
    }
}

/// Parse a complete Brainfuck source buffer.
pub fn parse(src: &[u8]) -> Result<Node, Error> {
    Parser::new(src).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_sequence() {
        let ast = parse(b"+-><.,").unwrap();
        assert_eq!(
            ast,
            Node::Loop(vec![
                Node::AddVal(1),
                Node::AddVal(-1),
                Node::MovePtr(1),
                Node::MovePtr(-1),
                Node::Output,
                Node::Input,
            ])
        );
    }

    #[test]
    fn parses_nested_loop() {
        let ast = parse(b"+[->+<]").unwrap();
        assert_eq!(
            ast,
            Node::Loop(vec![
                Node::AddVal(1),
                Node::Loop(vec![
                    Node::AddVal(-1),
                    Node::MovePtr(1),
                    Node::AddVal(1),
                    Node::MovePtr(-1),
                ]),
            ])
        );
    }

    #[test]
    fn skips_comments_in_source() {
        let ast = parse(b"hello + world").unwrap();
        assert_eq!(ast, Node::Loop(vec![Node::AddVal(1)]));
    }

    #[test]
    fn rejects_unmatched_open_bracket() {
        let err = parse(b"[+").unwrap_err();
        match err {
            Error::Syntax { pos, .. } => assert_eq!(pos, 0),
            other => panic!("expected Syntax error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_stray_top_level_close_bracket() {
        let err = parse(b"+]").unwrap_err();
        match err {
            Error::Syntax { pos, .. } => assert_eq!(pos, 1),
            other => panic!("expected Syntax error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_stray_close_bracket_inside_loop() {
        // One too many ']': the inner loop closes, then a stray one remains.
        let err = parse(b"[+]]").unwrap_err();
        match err {
            Error::Syntax { pos, .. } => assert_eq!(pos, 3),
            other => panic!("expected Syntax error, got {other:?}"),
        }
    }

    #[test]
    fn balanced_brackets_parse_for_any_nesting() {
        let ast = parse(b"[[[]]]").unwrap();
        assert_eq!(
            ast,
            Node::Loop(vec![Node::Loop(vec![Node::Loop(vec![Node::Loop(
                vec![]
            )])])])
        );
    }
}
