//! Hash-consed higher-order terms
//!
//! Every term and type is interned in an explicit [`TermBank`]. There is no
//! global table: the bank is owned by the clause manager and threaded through
//! every operation that builds terms. A [`TermId`] is a copyable handle, and two
//! handles from the same bank are equal exactly when the terms are
//! structurally equal.
//!
//! Bound variables use De Bruijn indices (`BVar(0)` is the innermost binder).
//! Applications are flat: the head of an `App` is never itself an `App`, and
//! applying a term to no arguments yields the term itself.
//!
//! Each node caches a few facts computed once at construction time (closedness,
//! groundness, presence of beta redexes and lambdas, weight) so that the
//! normalizer can skip untouched subterms in O(1).

mod db;
mod display;
mod interner;
mod types;

pub use display::{TermDisplay, TypeDisplay};
pub use interner::{Interner, SymbolId, TypeNameId};
pub use types::{TyId, TyNode};

use crate::error::TermError;
use std::collections::HashMap;

/// Handle to an interned term
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u32);

impl TermId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Free (unification) variable
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Binder {
    Lambda,
    Forall,
    Exists,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Builtin {
    True,
    False,
    Not,
    And,
    Or,
    Imply,
    Equiv,
    Eq,
    Neq,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::True => "true",
            Builtin::False => "false",
            Builtin::Not => "not",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Imply => "imply",
            Builtin::Equiv => "equiv",
            Builtin::Eq => "eq",
            Builtin::Neq => "neq",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermNode {
    Var(VarId),
    Const(SymbolId),
    BVar(u32),
    App(TermId, Box<[TermId]>),
    /// Binder, type of the bound variable, body
    Bind(Binder, TyId, TermId),
    AppBuiltin(Builtin, Box<[TermId]>),
}

#[derive(Debug, Clone, Copy)]
struct TermMeta {
    ty: TyId,
    /// One plus the largest loose De Bruijn index, 0 when closed
    loose_bound: u32,
    ground: bool,
    has_beta_redex: bool,
    has_lambda: bool,
    weight: u32,
}

impl TermMeta {
    fn leaf(ty: TyId) -> Self {
        TermMeta {
            ty,
            loose_bound: 0,
            ground: true,
            has_beta_redex: false,
            has_lambda: false,
            weight: 1,
        }
    }

    fn absorb(&mut self, child: &TermMeta) {
        self.loose_bound = self.loose_bound.max(child.loose_bound);
        self.ground &= child.ground;
        self.has_beta_redex |= child.has_beta_redex;
        self.has_lambda |= child.has_lambda;
        self.weight += child.weight;
    }
}

/// Arena of interned terms and types.
#[derive(Debug, Clone)]
pub struct TermBank {
    interner: Interner,
    types: Vec<TyNode>,
    type_lookup: HashMap<TyNode, TyId>,
    nodes: Vec<TermNode>,
    meta: Vec<TermMeta>,
    lookup: HashMap<(TermNode, TyId), TermId>,
    prop: TyId,
}

impl Default for TermBank {
    fn default() -> Self {
        Self::new()
    }
}

impl TermBank {
    pub fn new() -> Self {
        let mut bank = TermBank {
            interner: Interner::new(),
            types: Vec::new(),
            type_lookup: HashMap::new(),
            nodes: Vec::new(),
            meta: Vec::new(),
            lookup: HashMap::new(),
            prop: TyId(0),
        };
        bank.prop = bank.base_ty("o");
        bank
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Number of distinct terms interned so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn intern(&mut self, node: TermNode, ty: TyId) -> TermId {
        let key = (node, ty);
        if let Some(&id) = self.lookup.get(&key) {
            return id;
        }
        let meta = self.compute_meta(&key.0, ty);
        let id = TermId(self.nodes.len() as u32);
        self.nodes.push(key.0.clone());
        self.meta.push(meta);
        self.lookup.insert(key, id);
        id
    }

    fn compute_meta(&self, node: &TermNode, ty: TyId) -> TermMeta {
        let mut meta = TermMeta::leaf(ty);
        match node {
            TermNode::Var(_) => meta.ground = false,
            TermNode::Const(_) => {}
            TermNode::BVar(i) => meta.loose_bound = i + 1,
            TermNode::App(head, args) => {
                meta.weight = 0;
                meta.absorb(&self.meta[head.0 as usize]);
                meta.has_beta_redex |= matches!(self.node(*head), TermNode::Bind(Binder::Lambda, ..));
                for arg in args.iter() {
                    meta.absorb(&self.meta[arg.0 as usize]);
                }
            }
            TermNode::Bind(binder, _, body) => {
                let body = self.meta[body.0 as usize];
                meta.absorb(&body);
                meta.loose_bound = body.loose_bound.saturating_sub(1);
                meta.has_lambda |= *binder == Binder::Lambda;
            }
            TermNode::AppBuiltin(_, args) => {
                for arg in args.iter() {
                    meta.absorb(&self.meta[arg.0 as usize]);
                }
            }
        }
        meta
    }

    // === Accessors ===

    pub fn node(&self, t: TermId) -> &TermNode {
        &self.nodes[t.0 as usize]
    }

    pub fn ty(&self, t: TermId) -> TyId {
        self.meta[t.0 as usize].ty
    }

    /// One plus the largest loose De Bruijn index of `t` (0 when closed)
    pub fn loose_bound(&self, t: TermId) -> u32 {
        self.meta[t.0 as usize].loose_bound
    }

    pub fn is_closed(&self, t: TermId) -> bool {
        self.loose_bound(t) == 0
    }

    /// No free variables
    pub fn is_ground(&self, t: TermId) -> bool {
        self.meta[t.0 as usize].ground
    }

    pub fn has_beta_redex(&self, t: TermId) -> bool {
        self.meta[t.0 as usize].has_beta_redex
    }

    pub fn has_lambda(&self, t: TermId) -> bool {
        self.meta[t.0 as usize].has_lambda
    }

    /// Symbol count
    pub fn weight(&self, t: TermId) -> usize {
        self.meta[t.0 as usize].weight as usize
    }

    /// Head of an application, or the term itself
    pub fn head(&self, t: TermId) -> TermId {
        match self.node(t) {
            TermNode::App(head, _) => *head,
            _ => t,
        }
    }

    /// Arguments of an application (empty for anything else)
    pub fn args(&self, t: TermId) -> &[TermId] {
        match self.node(t) {
            TermNode::App(_, args) => args,
            _ => &[],
        }
    }

    pub fn is_lambda(&self, t: TermId) -> bool {
        matches!(self.node(t), TermNode::Bind(Binder::Lambda, ..))
    }

    pub fn is_var(&self, t: TermId) -> bool {
        matches!(self.node(t), TermNode::Var(_))
    }

    /// Occurrence count of every free variable of `t`
    pub fn var_occurrences(&self, t: TermId) -> HashMap<VarId, usize> {
        let mut counts = HashMap::new();
        let mut stack = vec![t];
        while let Some(t) = stack.pop() {
            if self.is_ground(t) {
                continue;
            }
            match self.node(t) {
                TermNode::Var(v) => *counts.entry(*v).or_insert(0) += 1,
                TermNode::App(head, args) => {
                    stack.push(*head);
                    stack.extend(args.iter().copied());
                }
                TermNode::Bind(_, _, body) => stack.push(*body),
                TermNode::AppBuiltin(_, args) => stack.extend(args.iter().copied()),
                TermNode::Const(_) | TermNode::BVar(_) => {}
            }
        }
        counts
    }

    // === Constructors ===

    /// Declare a constant symbol of the given type and return it as a term.
    pub fn declare(&mut self, name: &str, ty: TyId) -> TermId {
        let sym = self.interner.intern_symbol(name);
        self.constant(sym, ty)
    }

    pub fn constant(&mut self, sym: SymbolId, ty: TyId) -> TermId {
        self.intern(TermNode::Const(sym), ty)
    }

    pub fn var(&mut self, var: VarId, ty: TyId) -> TermId {
        self.intern(TermNode::Var(var), ty)
    }

    pub fn bvar(&mut self, index: u32, ty: TyId) -> TermId {
        self.intern(TermNode::BVar(index), ty)
    }

    /// Apply `head` to `args`, checking argument types.
    pub fn try_app(&mut self, head: TermId, args: &[TermId]) -> Result<TermId, TermError> {
        if args.is_empty() {
            return Ok(head);
        }
        let arg_tys: Vec<TyId> = args.iter().map(|&a| self.ty(a)).collect();
        let ty = self.apply_ty(self.ty(head), &arg_tys)?;
        Ok(self.mk_app(head, args, ty))
    }

    /// Apply `head` to `args`.
    ///
    /// # Panics
    /// On an ill-typed application. Use [`TermBank::try_app`] for input that
    /// has not been type checked.
    pub fn app(&mut self, head: TermId, args: &[TermId]) -> TermId {
        match self.try_app(head, args) {
            Ok(t) => t,
            Err(e) => panic!("ill-typed application: {e}"),
        }
    }

    /// Flattening application constructor for callers that already know the
    /// result type.
    pub(crate) fn mk_app(&mut self, head: TermId, args: &[TermId], ty: TyId) -> TermId {
        if args.is_empty() {
            return head;
        }
        match self.node(head).clone() {
            TermNode::App(inner_head, inner_args) => {
                let mut all = inner_args.into_vec();
                all.extend_from_slice(args);
                self.intern(TermNode::App(inner_head, all.into()), ty)
            }
            _ => self.intern(TermNode::App(head, args.into()), ty),
        }
    }

    pub fn lambda(&mut self, var_ty: TyId, body: TermId) -> TermId {
        let ty = self.arrow(&[var_ty], self.ty(body));
        self.intern(TermNode::Bind(Binder::Lambda, var_ty, body), ty)
    }

    pub fn forall(&mut self, var_ty: TyId, body: TermId) -> TermId {
        self.quantifier(Binder::Forall, var_ty, body)
    }

    pub fn exists(&mut self, var_ty: TyId, body: TermId) -> TermId {
        self.quantifier(Binder::Exists, var_ty, body)
    }

    fn quantifier(&mut self, binder: Binder, var_ty: TyId, body: TermId) -> TermId {
        assert!(
            self.is_prop(self.ty(body)),
            "quantifier body must be a proposition"
        );
        self.intern(TermNode::Bind(binder, var_ty, body), self.prop)
    }

    pub fn bind(&mut self, binder: Binder, var_ty: TyId, body: TermId) -> TermId {
        match binder {
            Binder::Lambda => self.lambda(var_ty, body),
            Binder::Forall | Binder::Exists => self.quantifier(binder, var_ty, body),
        }
    }

    /// Build a builtin connective, checking arity and argument types.
    pub fn try_builtin(&mut self, builtin: Builtin, args: &[TermId]) -> Result<TermId, TermError> {
        let arity_error = |expected| TermError::BuiltinArity {
            builtin: builtin.name(),
            expected,
            found: args.len(),
        };
        match builtin {
            Builtin::True | Builtin::False if !args.is_empty() => return Err(arity_error(0)),
            Builtin::Not if args.len() != 1 => return Err(arity_error(1)),
            Builtin::And | Builtin::Or if args.len() < 2 => return Err(arity_error(2)),
            Builtin::Imply | Builtin::Equiv | Builtin::Eq | Builtin::Neq if args.len() != 2 => {
                return Err(arity_error(2))
            }
            _ => {}
        }
        let expected = match builtin {
            Builtin::Eq | Builtin::Neq => self.ty(args[0]),
            _ => self.prop,
        };
        if let Some(&bad) = args.iter().find(|&&a| self.ty(a) != expected) {
            return Err(TermError::BuiltinType {
                builtin: builtin.name(),
                expected: self.display_ty(expected).to_string(),
                found: self.display_ty(self.ty(bad)).to_string(),
            });
        }
        Ok(self.intern(TermNode::AppBuiltin(builtin, args.into()), self.prop))
    }

    /// # Panics
    /// On a malformed connective (wrong arity or argument types).
    pub fn builtin(&mut self, builtin: Builtin, args: &[TermId]) -> TermId {
        match self.try_builtin(builtin, args) {
            Ok(t) => t,
            Err(e) => panic!("malformed builtin: {e}"),
        }
    }

    pub fn mk_true(&mut self) -> TermId {
        self.builtin(Builtin::True, &[])
    }

    pub fn mk_false(&mut self) -> TermId {
        self.builtin(Builtin::False, &[])
    }

    pub fn mk_not(&mut self, t: TermId) -> TermId {
        self.builtin(Builtin::Not, &[t])
    }

    pub fn mk_eq(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.builtin(Builtin::Eq, &[lhs, rhs])
    }

    /// Rebuild `t` with `f` applied to each immediate subterm.
    ///
    /// `f` also receives the number of binders crossed to reach the subterm
    /// (1 for a binder body, 0 otherwise). Returns `t` itself when no child
    /// changed.
    pub(crate) fn map_children(
        &mut self,
        t: TermId,
        mut f: impl FnMut(&mut Self, TermId, u32) -> TermId,
    ) -> TermId {
        match self.node(t).clone() {
            TermNode::App(head, args) => {
                let new_head = f(self, head, 0);
                let mut changed = new_head != head;
                let mut new_args = Vec::with_capacity(args.len());
                for &arg in args.iter() {
                    let new_arg = f(self, arg, 0);
                    changed |= new_arg != arg;
                    new_args.push(new_arg);
                }
                if !changed {
                    return t;
                }
                let ty = self.ty(t);
                self.mk_app(new_head, &new_args, ty)
            }
            TermNode::AppBuiltin(builtin, args) => {
                let mut changed = false;
                let mut new_args = Vec::with_capacity(args.len());
                for &arg in args.iter() {
                    let new_arg = f(self, arg, 0);
                    changed |= new_arg != arg;
                    new_args.push(new_arg);
                }
                if !changed {
                    return t;
                }
                let ty = self.ty(t);
                self.intern(TermNode::AppBuiltin(builtin, new_args.into()), ty)
            }
            TermNode::Bind(binder, var_ty, body) => {
                let new_body = f(self, body, 1);
                if new_body == body {
                    t
                } else {
                    self.bind(binder, var_ty, new_body)
                }
            }
            TermNode::Var(_) | TermNode::Const(_) | TermNode::BVar(_) => t,
        }
    }
}
