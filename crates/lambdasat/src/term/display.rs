//! Human-readable rendering of terms and types

use super::{Binder, Builtin, TermBank, TermId, TermNode, TyId, TyNode};
use std::fmt;

/// Wrapper that displays a term with symbol names resolved.
pub struct TermDisplay<'a> {
    bank: &'a TermBank,
    term: TermId,
}

/// Wrapper that displays a type with names resolved.
pub struct TypeDisplay<'a> {
    bank: &'a TermBank,
    ty: TyId,
}

impl TermBank {
    pub fn display(&self, term: TermId) -> TermDisplay<'_> {
        TermDisplay { bank: self, term }
    }

    pub fn display_ty(&self, ty: TyId) -> TypeDisplay<'_> {
        TypeDisplay { bank: self, ty }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bank.ty_node(self.ty) {
            TyNode::Base(name) => write!(f, "{}", self.bank.interner.resolve_type_name(*name)),
            TyNode::Arrow(params, ret) => {
                write!(f, "(")?;
                for param in params.iter() {
                    write!(f, "{} → ", self.bank.display_ty(*param))?;
                }
                write!(f, "{})", self.bank.display_ty(*ret))
            }
        }
    }
}

impl TermDisplay<'_> {
    fn sub(&self, term: TermId) -> TermDisplay<'_> {
        self.bank.display(term)
    }

    fn write_args(&self, f: &mut fmt::Formatter<'_>, args: &[TermId], sep: &str) -> fmt::Result {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                write!(f, "{sep}")?;
            }
            write!(f, "{}", self.sub(*arg))?;
        }
        Ok(())
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bank = self.bank;
        match bank.node(self.term) {
            TermNode::Var(v) => write!(f, "X{}", v.0),
            TermNode::Const(sym) => write!(f, "{}", bank.interner.resolve_symbol(*sym)),
            TermNode::BVar(i) => write!(f, "#{i}"),
            TermNode::App(head, args) => {
                if matches!(bank.node(*head), TermNode::Bind(..)) {
                    write!(f, "({})", self.sub(*head))?;
                } else {
                    write!(f, "{}", self.sub(*head))?;
                }
                write!(f, "(")?;
                self.write_args(f, args, ", ")?;
                write!(f, ")")
            }
            TermNode::Bind(binder, var_ty, body) => {
                let symbol = match binder {
                    Binder::Lambda => "λ",
                    Binder::Forall => "∀",
                    Binder::Exists => "∃",
                };
                write!(f, "{symbol}{}. {}", bank.display_ty(*var_ty), self.sub(*body))
            }
            TermNode::AppBuiltin(builtin, args) => match builtin {
                Builtin::True => write!(f, "⊤"),
                Builtin::False => write!(f, "⊥"),
                Builtin::Not => write!(f, "¬{}", self.sub(args[0])),
                Builtin::Eq => write!(f, "{} = {}", self.sub(args[0]), self.sub(args[1])),
                Builtin::Neq => write!(f, "{} ≠ {}", self.sub(args[0]), self.sub(args[1])),
                Builtin::And | Builtin::Or | Builtin::Imply | Builtin::Equiv => {
                    let sep = match builtin {
                        Builtin::And => " ∧ ",
                        Builtin::Or => " ∨ ",
                        Builtin::Imply => " ⇒ ",
                        _ => " ⇔ ",
                    };
                    write!(f, "(")?;
                    self.write_args(f, args, sep)?;
                    write!(f, ")")
                }
            },
        }
    }
}
