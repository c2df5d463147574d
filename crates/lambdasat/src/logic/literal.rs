//! Literals

use crate::term::{Builtin, TermBank, TermId, TermNode};
use std::fmt;

/// A literal of a clause.
///
/// Equations are unordered for the purpose of identity: use
/// [`Literal::canonical`] before comparing two equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Literal {
    True,
    False,
    Equation { lhs: TermId, rhs: TermId, sign: bool },
    Prop { atom: TermId, sign: bool },
}

impl Literal {
    pub fn prop(atom: TermId, sign: bool) -> Self {
        Literal::Prop { atom, sign }
    }

    pub fn equation(lhs: TermId, rhs: TermId, sign: bool) -> Self {
        Literal::Equation { lhs, rhs, sign }
    }

    pub fn eq(lhs: TermId, rhs: TermId) -> Self {
        Self::equation(lhs, rhs, true)
    }

    pub fn neq(lhs: TermId, rhs: TermId) -> Self {
        Self::equation(lhs, rhs, false)
    }

    pub fn sign(&self) -> bool {
        match *self {
            Literal::True => true,
            Literal::False => false,
            Literal::Equation { sign, .. } | Literal::Prop { sign, .. } => sign,
        }
    }

    pub fn negate(&self) -> Literal {
        match *self {
            Literal::True => Literal::False,
            Literal::False => Literal::True,
            Literal::Equation { lhs, rhs, sign } => Literal::Equation { lhs, rhs, sign: !sign },
            Literal::Prop { atom, sign } => Literal::Prop { atom, sign: !sign },
        }
    }

    pub fn is_predicate_lit(&self) -> bool {
        matches!(self, Literal::Prop { .. })
    }

    pub fn is_equation(&self) -> bool {
        matches!(self, Literal::Equation { .. })
    }

    /// Positive equation or positive atom
    pub fn is_positivoid(&self) -> bool {
        match self {
            Literal::True | Literal::False => false,
            _ => self.sign(),
        }
    }

    /// Always true: `⊤` or `t = t`
    pub fn is_trivial(&self) -> bool {
        match *self {
            Literal::True => true,
            Literal::Equation { lhs, rhs, sign } => sign && lhs == rhs,
            _ => false,
        }
    }

    /// Always false: `⊥` or `t ≠ t`
    pub fn is_absurd(&self) -> bool {
        match *self {
            Literal::False => true,
            Literal::Equation { lhs, rhs, sign } => !sign && lhs == rhs,
            _ => false,
        }
    }

    /// Representative with the equation sides in handle order
    pub fn canonical(&self) -> Literal {
        match *self {
            Literal::Equation { lhs, rhs, sign } if rhs < lhs => Literal::Equation {
                lhs: rhs,
                rhs: lhs,
                sign,
            },
            other => other,
        }
    }

    pub fn is_complementary(&self, other: &Literal) -> bool {
        self.negate().canonical() == other.canonical()
    }

    pub fn terms(&self) -> impl Iterator<Item = TermId> {
        let (first, second) = match *self {
            Literal::Equation { lhs, rhs, .. } => (Some(lhs), Some(rhs)),
            Literal::Prop { atom, .. } => (Some(atom), None),
            Literal::True | Literal::False => (None, None),
        };
        first.into_iter().chain(second)
    }

    pub fn map_terms(&self, mut f: impl FnMut(TermId) -> TermId) -> Literal {
        match *self {
            Literal::Equation { lhs, rhs, sign } => Literal::Equation {
                lhs: f(lhs),
                rhs: f(rhs),
                sign,
            },
            Literal::Prop { atom, sign } => Literal::Prop { atom: f(atom), sign },
            other => other,
        }
    }

    /// Push connectives at the root of a predicate atom into the literal:
    /// `⊤`/`⊥` become `True`/`False`, `¬p` flips the sign, and `=`/`≠` atoms
    /// become equations.
    pub fn fold_builtins(&self, bank: &TermBank) -> Literal {
        let mut lit = *self;
        while let Literal::Prop { atom, sign } = lit {
            lit = match bank.node(atom) {
                TermNode::AppBuiltin(Builtin::True, _) => {
                    if sign {
                        Literal::True
                    } else {
                        Literal::False
                    }
                }
                TermNode::AppBuiltin(Builtin::False, _) => {
                    if sign {
                        Literal::False
                    } else {
                        Literal::True
                    }
                }
                TermNode::AppBuiltin(Builtin::Not, args) if args.len() == 1 => Literal::Prop {
                    atom: args[0],
                    sign: !sign,
                },
                TermNode::AppBuiltin(Builtin::Eq, args) if args.len() == 2 => Literal::equation(args[0], args[1], sign),
                TermNode::AppBuiltin(Builtin::Neq, args) if args.len() == 2 => {
                    Literal::equation(args[0], args[1], !sign)
                }
                _ => break,
            };
        }
        lit
    }

    /// Symbol count, counting the predicate or equality symbol
    pub fn weight(&self, bank: &TermBank) -> usize {
        1 + self.terms().map(|t| bank.weight(t)).sum::<usize>()
    }

    pub fn display<'a>(&'a self, bank: &'a TermBank) -> LiteralDisplay<'a> {
        LiteralDisplay { lit: self, bank }
    }
}

pub struct LiteralDisplay<'a> {
    lit: &'a Literal,
    bank: &'a TermBank,
}

impl fmt::Display for LiteralDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.lit {
            Literal::True => write!(f, "⊤"),
            Literal::False => write!(f, "⊥"),
            Literal::Equation { lhs, rhs, sign } => {
                let op = if sign { "=" } else { "≠" };
                write!(f, "{} {op} {}", self.bank.display(lhs), self.bank.display(rhs))
            }
            Literal::Prop { atom, sign } => {
                if !sign {
                    write!(f, "¬")?;
                }
                write!(f, "{}", self.bank.display(atom))
            }
        }
    }
}
