//! Simple types
//!
//! Types are interned in the same `TermBank` as terms. Arrows are stored
//! uncurried: `a → (b → c)` is the single node `Arrow([a, b], c)`, so the
//! number of arguments a term accepts is the length of its parameter list.

use super::interner::TypeNameId;
use super::TermBank;
use crate::error::TermError;

/// Handle to an interned type
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyId(pub(crate) u32);

impl TyId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TyNode {
    Base(TypeNameId),
    /// Never nested in result position and never with empty parameters
    Arrow(Box<[TyId]>, TyId),
}

impl TermBank {
    pub(crate) fn intern_ty(&mut self, node: TyNode) -> TyId {
        if let Some(&id) = self.type_lookup.get(&node) {
            return id;
        }
        let id = TyId(self.types.len() as u32);
        self.types.push(node.clone());
        self.type_lookup.insert(node, id);
        id
    }

    /// Get or create the base type with this name
    pub fn base_ty(&mut self, name: &str) -> TyId {
        let name = self.interner.intern_type_name(name);
        self.intern_ty(TyNode::Base(name))
    }

    /// The type of propositions
    pub fn prop(&self) -> TyId {
        self.prop
    }

    pub fn is_prop(&self, ty: TyId) -> bool {
        ty == self.prop
    }

    /// Build `params → ret`, flattening a functional result.
    pub fn arrow(&mut self, params: &[TyId], ret: TyId) -> TyId {
        if params.is_empty() {
            return ret;
        }
        match self.ty_node(ret).clone() {
            TyNode::Arrow(inner, inner_ret) => {
                let mut all = params.to_vec();
                all.extend_from_slice(&inner);
                self.intern_ty(TyNode::Arrow(all.into(), inner_ret))
            }
            TyNode::Base(_) => self.intern_ty(TyNode::Arrow(params.into(), ret)),
        }
    }

    pub fn ty_node(&self, ty: TyId) -> &TyNode {
        &self.types[ty.0 as usize]
    }

    /// Number of arguments a term of this type accepts
    pub fn arity(&self, ty: TyId) -> usize {
        match self.ty_node(ty) {
            TyNode::Arrow(params, _) => params.len(),
            TyNode::Base(_) => 0,
        }
    }

    /// Split a type into its parameter list and final result.
    pub fn arrow_parts(&self, ty: TyId) -> (Vec<TyId>, TyId) {
        match self.ty_node(ty) {
            TyNode::Arrow(params, ret) => (params.to_vec(), *ret),
            TyNode::Base(_) => (Vec::new(), ty),
        }
    }

    /// Type of a term of type `ty` applied to arguments of types `args`.
    pub(crate) fn apply_ty(&mut self, ty: TyId, args: &[TyId]) -> Result<TyId, TermError> {
        if args.is_empty() {
            return Ok(ty);
        }
        let (params, ret) = match self.ty_node(ty) {
            TyNode::Arrow(params, ret) => (params.clone(), *ret),
            TyNode::Base(_) => {
                return Err(TermError::NotAFunction {
                    ty: self.display_ty(ty).to_string(),
                    args: args.len(),
                })
            }
        };
        if args.len() > params.len() {
            return Err(TermError::TooManyArguments {
                ty: self.display_ty(ty).to_string(),
                expected: params.len(),
                found: args.len(),
            });
        }
        for (position, (&expected, &found)) in params.iter().zip(args).enumerate() {
            if expected != found {
                return Err(TermError::ArgumentType {
                    position,
                    expected: self.display_ty(expected).to_string(),
                    found: self.display_ty(found).to_string(),
                });
            }
        }
        Ok(self.arrow(&params[args.len()..], ret))
    }
}
