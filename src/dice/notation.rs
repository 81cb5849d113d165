// Dice notation parser
// Grammar: expr := term (('+'|'-') term)*
//          term := unary (('*'|'/') unary)*
//          unary := '-' unary | atom
//          atom := NUMBER ['d' SIDES] | 'd' SIDES | '(' expr ')'

use super::DiceError;

pub const MAX_DICE_PER_TERM: u32 = 100;
pub const MAX_SIDES: u32 = 1000;
/// Longest notation accepted, in characters
pub const MAX_NOTATION_LENGTH: usize = 256;
/// Deepest run of parentheses and unary minus
pub const MAX_NESTING_DEPTH: usize = 32;

/// One dice term of a notation, e.g. `3d6` -> count 3, sides 6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceDescriptor {
    pub count: u32,
    pub sides: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Constant(i64),
    Dice(DiceDescriptor),
    Negate(Box<Node>),
    Group(Box<Node>),
    Binary {
        op: Operator,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

/// A parsed notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    root: Node,
    notation: String,
}

impl Expression {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Normalized notation: no whitespace, lowercase `d`
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// Dice terms in the order they appear, modifiers left out
    pub fn dice_groups(&self) -> Vec<DiceDescriptor> {
        let mut groups = Vec::new();
        collect_dice(&self.root, &mut groups);
        groups
    }
}

fn collect_dice(node: &Node, out: &mut Vec<DiceDescriptor>) {
    match node {
        Node::Constant(_) => {}
        Node::Dice(descriptor) => out.push(*descriptor),
        Node::Negate(inner) | Node::Group(inner) => collect_dice(inner, out),
        Node::Binary { lhs, rhs, .. } => {
            collect_dice(lhs, out);
            collect_dice(rhs, out);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Number(u64),
    Die,
    Percent,
    Op(Operator),
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    text: String,
    position: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, DiceError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().enumerate().peekable();

    while let Some((position, ch)) = chars.next() {
        let kind = match ch {
            c if c.is_whitespace() => continue,
            '0'..='9' => {
                let mut digits = String::from(ch);
                while let Some(&(_, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                let value = digits.parse().map_err(|_| DiceError::Overflow)?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    text: digits,
                    position,
                });
                continue;
            }
            'd' | 'D' => TokenKind::Die,
            '%' => TokenKind::Percent,
            '+' => TokenKind::Op(Operator::Add),
            '-' => TokenKind::Op(Operator::Subtract),
            '*' | 'x' | 'X' => TokenKind::Op(Operator::Multiply),
            '/' => TokenKind::Op(Operator::Divide),
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            _ => return Err(DiceError::UnexpectedCharacter { ch, position }),
        };
        let text = match kind {
            TokenKind::Die => "d".to_string(),
            TokenKind::Op(op) => op.symbol().to_string(),
            _ => ch.to_string(),
        };
        tokens.push(Token {
            kind,
            text,
            position,
        });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DiceError>,
    ) -> Result<T, DiceError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(DiceError::TooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek_operator(&self, allowed: &[Operator]) -> Option<Operator> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) if allowed.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn expression(&mut self) -> Result<Node, DiceError> {
        let mut node = self.term()?;
        while let Some(op) = self.peek_operator(&[Operator::Add, Operator::Subtract]) {
            self.advance();
            let rhs = self.term()?;
            node = Node::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<Node, DiceError> {
        let mut node = self.unary()?;
        while let Some(op) = self.peek_operator(&[Operator::Multiply, Operator::Divide]) {
            self.advance();
            let rhs = self.unary()?;
            node = Node::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn unary(&mut self) -> Result<Node, DiceError> {
        if self.peek_operator(&[Operator::Subtract]).is_some() {
            self.advance();
            let inner = self.nested(Self::unary)?;
            return Ok(Node::Negate(Box::new(inner)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Node, DiceError> {
        let token = self.advance().ok_or(DiceError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(value) => {
                if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Die)) {
                    self.advance();
                    self.dice(value)
                } else {
                    let value = i64::try_from(value).map_err(|_| DiceError::Overflow)?;
                    Ok(Node::Constant(value))
                }
            }
            TokenKind::Die => self.dice(1),
            TokenKind::Open => {
                let inner = self.nested(Self::expression)?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::Close,
                        ..
                    }) => Ok(Node::Group(Box::new(inner))),
                    Some(other) => Err(expected("')'", &other)),
                    None => Err(DiceError::UnexpectedEnd),
                }
            }
            _ => Err(expected("a number or dice", &token)),
        }
    }

    fn dice(&mut self, count: u64) -> Result<Node, DiceError> {
        let sides = match self.advance() {
            Some(Token {
                kind: TokenKind::Number(sides),
                ..
            }) => sides,
            Some(Token {
                kind: TokenKind::Percent,
                ..
            }) => 100,
            Some(other) => return Err(expected("number of sides", &other)),
            None => return Err(DiceError::UnexpectedEnd),
        };

        if count == 0 || count > u64::from(MAX_DICE_PER_TERM) {
            return Err(DiceError::TooManyDice {
                count,
                max: MAX_DICE_PER_TERM,
            });
        }
        if sides == 0 || sides > u64::from(MAX_SIDES) {
            return Err(DiceError::InvalidSides {
                sides,
                max: MAX_SIDES,
            });
        }

        Ok(Node::Dice(DiceDescriptor {
            count: count as u32,
            sides: sides as u32,
        }))
    }
}

fn expected(what: &'static str, found: &Token) -> DiceError {
    DiceError::Expected {
        expected: what,
        found: found.text.clone(),
        position: found.position,
    }
}

/// Parse a dice notation string such as `2d6+1d20` or `(1d4+1)*2`
pub fn parse(input: &str) -> Result<Expression, DiceError> {
    let length = input.chars().count();
    if length > MAX_NOTATION_LENGTH {
        return Err(DiceError::TooLong {
            length,
            max: MAX_NOTATION_LENGTH,
        });
    }

    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(DiceError::Empty);
    }

    let notation: String = tokens.iter().map(|t| t.text.as_str()).collect();
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let root = parser.expression()?;

    if let Some(extra) = parser.peek() {
        return Err(expected("an operator", extra));
    }

    Ok(Expression { root, notation })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(count: u32, sides: u32) -> DiceDescriptor {
        DiceDescriptor { count, sides }
    }

    #[test]
    fn test_dice_groups_skip_modifiers() {
        let expr = parse("2d6 + 5 + 1d20").unwrap();
        assert_eq!(expr.dice_groups(), vec![dice(2, 6), dice(1, 20)]);
        assert_eq!(expr.notation(), "2d6+5+1d20");
    }

    #[test]
    fn test_implicit_count_and_percentile() {
        let expr = parse("D20-d%").unwrap();
        assert_eq!(expr.dice_groups(), vec![dice(1, 20), dice(1, 100)]);
        assert_eq!(expr.notation(), "d20-d%");
    }

    #[test]
    fn test_precedence() {
        let expr = parse("1+2*3").unwrap();
        match expr.root() {
            Node::Binary { op, rhs, .. } => {
                assert_eq!(*op, Operator::Add);
                assert!(matches!(
                    **rhs,
                    Node::Binary {
                        op: Operator::Multiply,
                        ..
                    }
                ));
            }
            other => panic!("unexpected root {:?}", other),
        }
    }

    #[test]
    fn test_groups_inside_parentheses() {
        let expr = parse("(1d4+1)*2d8").unwrap();
        assert_eq!(expr.dice_groups(), vec![dice(1, 4), dice(2, 8)]);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse("   "), Err(DiceError::Empty));
        assert_eq!(parse("2d"), Err(DiceError::UnexpectedEnd));
        assert_eq!(
            parse("2d6?"),
            Err(DiceError::UnexpectedCharacter { ch: '?', position: 3 })
        );
        assert!(matches!(parse("2d6 3"), Err(DiceError::Expected { .. })));
        assert!(matches!(parse("(1d6"), Err(DiceError::UnexpectedEnd)));
        assert!(matches!(parse("+1"), Err(DiceError::Expected { .. })));
    }

    #[test]
    fn test_limits() {
        assert!(matches!(
            parse("101d6"),
            Err(DiceError::TooManyDice { count: 101, .. })
        ));
        assert!(matches!(
            parse("0d6"),
            Err(DiceError::TooManyDice { count: 0, .. })
        ));
        assert!(matches!(
            parse("1d0"),
            Err(DiceError::InvalidSides { sides: 0, .. })
        ));
        assert!(parse("100d1000").is_ok());
    }

    #[test]
    fn test_rejects_overlong_notation() {
        let input = format!("{}1", "-".repeat(5999));
        assert_eq!(
            parse(&input),
            Err(DiceError::TooLong {
                length: 6000,
                max: MAX_NOTATION_LENGTH,
            })
        );
    }

    #[test]
    fn test_nesting_depth() {
        let minus = |n: usize| format!("{}1", "-".repeat(n));
        assert!(parse(&minus(MAX_NESTING_DEPTH)).is_ok());
        assert_eq!(
            parse(&minus(MAX_NESTING_DEPTH + 1)),
            Err(DiceError::TooDeep {
                max: MAX_NESTING_DEPTH
            })
        );

        let parens = |n: usize| format!("{}1d6{}", "(".repeat(n), ")".repeat(n));
        assert!(parse(&parens(MAX_NESTING_DEPTH)).is_ok());
        assert_eq!(
            parse(&parens(MAX_NESTING_DEPTH + 1)),
            Err(DiceError::TooDeep {
                max: MAX_NESTING_DEPTH
            })
        );

        // unclosed parentheses hit the depth limit before running out of input
        assert_eq!(
            parse(&"(".repeat(MAX_NOTATION_LENGTH)),
            Err(DiceError::TooDeep {
                max: MAX_NESTING_DEPTH
            })
        );
    }

    #[test]
    fn test_long_flat_chain_within_limit() {
        // "1d6" followed by "+1" pairs, right at the length limit
        let input = format!("1d6{}", "+1".repeat((MAX_NOTATION_LENGTH - 3) / 2));
        assert!(input.chars().count() <= MAX_NOTATION_LENGTH);
        let expr = parse(&input).unwrap();
        assert_eq!(expr.dice_groups(), vec![dice(1, 6)]);
    }
}
