//! Type directory: hierarchy and member facts about nominal types.
//!
//! The pool knows the *shape* of a type; the directory knows what a type
//! declares: its base class, implemented interfaces, conversion operators
//! and indexer/enumerator members. Coercion and unification only read it.

use keel_ir::{ConversionId, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Whether a conversion operator may be applied without a cast.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConversionKind {
    Implicit,
    Explicit,
}

/// A user-declared conversion operator `ret op(param)` on `declaring`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConversionMethod {
    pub id: ConversionId,
    pub declaring: TypeId,
    pub param: TypeId,
    pub ret: TypeId,
    pub kind: ConversionKind,
}

impl ConversionMethod {
    #[inline]
    pub fn is_implicit(&self) -> bool {
        self.kind == ConversionKind::Implicit
    }
}

/// Read-only view of declared type facts.
pub trait TypeDirectory {
    /// Direct base class; `None` for `object`, interfaces and structural types.
    fn base_type(&self, ty: TypeId) -> Option<TypeId>;

    /// Directly implemented (or, for interfaces, extended) interfaces.
    fn interfaces(&self, ty: TypeId) -> &[TypeId];

    /// Conversion operators declared on `ty`.
    fn conversions(&self, ty: TypeId) -> &[ConversionMethod];

    /// Element type returned by an indexer, if `ty` declares one.
    fn indexer(&self, _ty: TypeId) -> Option<TypeId> {
        None
    }

    /// Element type produced by the enumerator pattern, if `ty` has one.
    fn enumerator_element(&self, _ty: TypeId) -> Option<TypeId> {
        None
    }

    /// Sealed classes cannot be the static type of a derived instance.
    fn is_sealed(&self, _ty: TypeId) -> bool {
        false
    }

    /// Whether a `from` reference is a `to` through the declared hierarchy.
    fn is_assignable_to(&self, from: TypeId, to: TypeId) -> bool {
        if from == to || to == TypeId::OBJECT {
            return true;
        }
        let mut seen = FxHashSet::default();
        let mut work: SmallVec<[TypeId; 8]> = SmallVec::new();
        work.push(from);
        while let Some(ty) = work.pop() {
            if !seen.insert(ty) {
                continue;
            }
            if ty == to {
                return true;
            }
            work.extend(self.base_type(ty));
            work.extend(self.interfaces(ty).iter().copied());
        }
        false
    }

    /// Base chain of `ty`, nearest first, excluding `ty` and `object`.
    fn base_chain(&self, ty: TypeId) -> SmallVec<[TypeId; 8]> {
        let mut chain = SmallVec::new();
        let mut current = self.base_type(ty);
        while let Some(base) = current {
            if base == TypeId::OBJECT || chain.contains(&base) {
                break;
            }
            chain.push(base);
            current = self.base_type(base);
        }
        chain
    }
}

/// Declared facts about one type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeDef {
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub conversions: Vec<ConversionMethod>,
    pub indexer: Option<TypeId>,
    pub enumerator_element: Option<TypeId>,
    pub sealed: bool,
}

/// In-memory [`TypeDirectory`] populated by the front end (or by tests).
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    defs: FxHashMap<TypeId, TypeDef>,
    conversions: Vec<ConversionMethod>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn def_mut(&mut self, ty: TypeId) -> &mut TypeDef {
        self.defs.entry(ty).or_default()
    }

    pub fn def(&self, ty: TypeId) -> Option<&TypeDef> {
        self.defs.get(&ty)
    }

    pub fn set_base(&mut self, ty: TypeId, base: TypeId) -> &mut Self {
        self.def_mut(ty).base = Some(base);
        self
    }

    pub fn add_interface(&mut self, ty: TypeId, iface: TypeId) -> &mut Self {
        let def = self.def_mut(ty);
        if !def.interfaces.contains(&iface) {
            def.interfaces.push(iface);
        }
        self
    }

    pub fn set_indexer(&mut self, ty: TypeId, elem: TypeId) -> &mut Self {
        self.def_mut(ty).indexer = Some(elem);
        self
    }

    pub fn set_enumerator_element(&mut self, ty: TypeId, elem: TypeId) -> &mut Self {
        self.def_mut(ty).enumerator_element = Some(elem);
        self
    }

    pub fn set_sealed(&mut self, ty: TypeId) -> &mut Self {
        self.def_mut(ty).sealed = true;
        self
    }

    /// Declare `ret op(param)` on `declaring`, returning its id.
    pub fn add_conversion(
        &mut self,
        declaring: TypeId,
        param: TypeId,
        ret: TypeId,
        kind: ConversionKind,
    ) -> ConversionId {
        let raw = u32::try_from(self.conversions.len())
            .unwrap_or_else(|_| panic!("too many conversion operators (exceeds u32::MAX)"));
        let method = ConversionMethod {
            id: ConversionId::new(raw),
            declaring,
            param,
            ret,
            kind,
        };
        self.conversions.push(method);
        self.def_mut(declaring).conversions.push(method);
        method.id
    }

    /// Look up a conversion operator by id.
    pub fn conversion(&self, id: ConversionId) -> Option<&ConversionMethod> {
        self.conversions.get(id.raw() as usize)
    }
}

impl TypeDirectory for TypeRegistry {
    fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        self.defs.get(&ty).and_then(|d| d.base)
    }

    fn interfaces(&self, ty: TypeId) -> &[TypeId] {
        self.defs.get(&ty).map_or(&[], |d| d.interfaces.as_slice())
    }

    fn conversions(&self, ty: TypeId) -> &[ConversionMethod] {
        self.defs.get(&ty).map_or(&[], |d| d.conversions.as_slice())
    }

    fn indexer(&self, ty: TypeId) -> Option<TypeId> {
        self.defs.get(&ty).and_then(|d| d.indexer)
    }

    fn enumerator_element(&self, ty: TypeId) -> Option<TypeId> {
        self.defs.get(&ty).and_then(|d| d.enumerator_element)
    }

    fn is_sealed(&self, ty: TypeId) -> bool {
        self.defs.get(&ty).is_some_and(|d| d.sealed)
    }
}
