//! Sharded type pool.
//!
//! Provides O(1) interning, lookup and equality via `TypeId`, following the
//! same sharding scheme as `StringInterner` in `keel_ir`. Builtins are
//! pre-interned in shard 0 at the indices declared on `TypeId`.

use keel_ir::{Name, TypeId};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};

use crate::data::{Primitive, Template, TupleField, TypeData};
use crate::flags::TypeFlags;

mod format;

/// Error when interning a type fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeInternError {
    /// Shard exceeded the 28-bit local index space.
    #[error("type pool shard {shard_idx} exceeded capacity")]
    ShardOverflow { shard_idx: usize },
}

struct Item {
    data: TypeData,
    flags: TypeFlags,
}

struct TypeShard {
    map: FxHashMap<TypeData, u32>,
    items: Vec<Item>,
}

impl TypeShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            items: Vec::with_capacity(256),
        }
    }

    fn with_primitives() -> Self {
        let mut shard = Self::new();
        for (idx, prim) in Primitive::ALL.into_iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "primitive count is fixed and small"
            )]
            let local = idx as u32;
            let data = TypeData::Primitive(prim);
            let flags = TypeFlags::compute(&data, TypeFlags::empty());
            shard.map.insert(data.clone(), local);
            shard.items.push(Item { data, flags });
        }
        shard
    }
}

/// Sharded type pool for concurrent access.
///
/// # Thread Safety
/// Uses `RwLock` per shard; interning takes `&self`.
pub struct Pool {
    shards: [RwLock<TypeShard>; TypeId::NUM_SHARDS],
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool with pre-interned builtins.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(TypeShard::with_primitives())
            } else {
                RwLock::new(TypeShard::new())
            }
        });
        Self { shards }
    }

    #[inline]
    fn shard_for(data: &TypeData) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        data.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash_usize = hasher.finish() as usize;
        hash_usize % TypeId::NUM_SHARDS
    }

    /// Try to intern a type, returning its `TypeId` or an error on overflow.
    ///
    /// Builtins return their fixed `TypeId` constants.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn try_intern(&self, data: TypeData) -> Result<TypeId, TypeInternError> {
        if let TypeData::Primitive(prim) = data {
            return Ok(prim.type_id());
        }

        let shard_idx = Self::shard_for(&data);
        let shard = &self.shards[shard_idx];

        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&data) {
                return Ok(TypeId::from_shard_local(shard_idx as u32, local));
            }
        }

        // Children may live in this shard, so read their flags before
        // taking the write lock.
        let flags = TypeFlags::compute(&data, self.child_flags(&data));

        let mut guard = shard.write();
        if let Some(&local) = guard.map.get(&data) {
            return Ok(TypeId::from_shard_local(shard_idx as u32, local));
        }

        let local = u32::try_from(guard.items.len())
            .ok()
            .filter(|&l| l <= TypeId::MAX_LOCAL)
            .ok_or(TypeInternError::ShardOverflow { shard_idx })?;

        guard.map.insert(data.clone(), local);
        guard.items.push(Item { data, flags });

        Ok(TypeId::from_shard_local(shard_idx as u32, local))
    }

    /// Intern a type.
    ///
    /// # Panics
    /// Panics if a shard exceeds 2^28 types. Use `try_intern` to handle that.
    pub fn intern(&self, data: TypeData) -> TypeId {
        self.try_intern(data).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the structure of a type.
    ///
    /// # Panics
    /// Panics if the id was not created by this pool.
    pub fn data(&self, id: TypeId) -> TypeData {
        self.shards[id.shard()].read().items[id.local()].data.clone()
    }

    /// Pre-computed flags of a type.
    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.shards[id.shard()].read().items[id.local()].flags
    }

    fn child_flags(&self, data: &TypeData) -> TypeFlags {
        let mut flags = TypeFlags::empty();
        let mut add = |id: TypeId| flags |= self.flags(id);
        match data {
            TypeData::Primitive(_)
            | TypeData::Class { .. }
            | TypeData::Interface { .. }
            | TypeData::Struct { .. } => {}
            TypeData::Pointer(t)
            | TypeData::ByRef(t)
            | TypeData::Array { elem: t, .. }
            | TypeData::Enum { underlying: t, .. }
            | TypeData::Alias { target: t, .. } => add(*t),
            TypeData::Delegate { params, ret, .. } => {
                params.iter().copied().for_each(&mut add);
                add(*ret);
            }
            TypeData::Tuple(fields) => fields.iter().for_each(|f| add(f.ty)),
            TypeData::Union(members) | TypeData::Intersection(members) => {
                members.iter().copied().for_each(&mut add);
            }
            TypeData::Generic { args, .. } => args.iter().copied().for_each(&mut add),
            TypeData::TypeParam { constraints, .. } => {
                constraints.iter().copied().for_each(&mut add);
            }
        }
        flags
    }

    // === Constructors ===

    pub fn pointer(&self, elem: TypeId) -> TypeId {
        self.intern(TypeData::Pointer(elem))
    }

    pub fn by_ref(&self, elem: TypeId) -> TypeId {
        self.intern(TypeData::ByRef(elem))
    }

    pub fn array(&self, elem: TypeId, rank: u8) -> TypeId {
        self.intern(TypeData::Array { elem, rank })
    }

    pub fn class(&self, name: Name) -> TypeId {
        self.intern(TypeData::Class { name })
    }

    pub fn interface(&self, name: Name) -> TypeId {
        self.intern(TypeData::Interface { name })
    }

    pub fn struct_type(&self, name: Name) -> TypeId {
        self.intern(TypeData::Struct { name })
    }

    pub fn enum_type(&self, name: Name, underlying: TypeId) -> TypeId {
        self.intern(TypeData::Enum { name, underlying })
    }

    pub fn delegate(&self, name: Name, params: &[TypeId], ret: TypeId) -> TypeId {
        self.intern(TypeData::Delegate {
            name,
            params: params.into(),
            ret,
        })
    }

    /// Type of an anonymous function expression.
    pub fn function(&self, params: &[TypeId], ret: TypeId) -> TypeId {
        self.delegate(Name::EMPTY, params, ret)
    }

    pub fn tuple(&self, fields: &[TupleField]) -> TypeId {
        self.intern(TypeData::Tuple(fields.into()))
    }

    /// Union over `members`, canonicalized so that member order and
    /// duplicates do not matter.
    pub fn union(&self, members: &[TypeId]) -> TypeId {
        self.intern(TypeData::Union(canonical_members(members)))
    }

    /// Intersection over `members`, canonicalized like [`Pool::union`].
    pub fn intersection(&self, members: &[TypeId]) -> TypeId {
        self.intern(TypeData::Intersection(canonical_members(members)))
    }

    pub fn generic(&self, template: Template, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Generic {
            template,
            args: args.into(),
        })
    }

    pub fn nullable(&self, inner: TypeId) -> TypeId {
        self.generic(Template::Nullable, &[inner])
    }

    pub fn boxed(&self, inner: TypeId) -> TypeId {
        self.generic(Template::Boxed, &[inner])
    }

    pub fn non_null(&self, inner: TypeId) -> TypeId {
        self.generic(Template::NonNull, &[inner])
    }

    pub fn invariant(&self, inner: TypeId) -> TypeId {
        self.generic(Template::Invariant, &[inner])
    }

    pub fn sequence(&self, elem: TypeId) -> TypeId {
        self.generic(Template::Sequence, &[elem])
    }

    pub fn non_empty_sequence(&self, elem: TypeId) -> TypeId {
        self.generic(Template::NonEmptySequence, &[elem])
    }

    pub fn enumerator(&self, elem: TypeId) -> TypeId {
        self.generic(Template::Enumerator, &[elem])
    }

    pub fn type_param(&self, name: Name, constraints: &[TypeId], reference: bool) -> TypeId {
        self.intern(TypeData::TypeParam {
            name,
            constraints: constraints.into(),
            reference,
        })
    }

    pub fn alias(&self, name: Name, target: TypeId, explicit_only: bool) -> TypeId {
        self.intern(TypeData::Alias {
            name,
            target,
            explicit_only,
        })
    }

    // === Queries ===

    /// The builtin `id` denotes, if any.
    #[inline]
    pub fn primitive(&self, id: TypeId) -> Option<Primitive> {
        Primitive::from_type_id(id)
    }

    /// Follow alias chains to the aliased type.
    pub fn strip_alias(&self, mut id: TypeId) -> TypeId {
        while let TypeData::Alias { target, .. } = self.data(id) {
            id = target;
        }
        id
    }

    /// Strip aliases and by-ref wrappers; the shape identity is judged on.
    pub fn strip_alias_and_ref(&self, mut id: TypeId) -> TypeId {
        loop {
            match self.data(id) {
                TypeData::Alias { target, .. } | TypeData::ByRef(target) => id = target,
                _ => return id,
            }
        }
    }

    #[inline]
    pub fn is_value_type(&self, id: TypeId) -> bool {
        self.flags(id).is_value_type()
    }

    #[inline]
    pub fn is_reference_type(&self, id: TypeId) -> bool {
        self.flags(id).is_reference_type()
    }

    #[inline]
    pub fn is_interface(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::IS_INTERFACE)
    }

    /// Tuple or union.
    #[inline]
    pub fn is_structural(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::IS_STRUCTURAL)
    }

    #[inline]
    pub fn is_nullable(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::IS_NULLABLE)
    }

    /// Template and single argument of a one-argument generic instance.
    pub fn template_arg(&self, id: TypeId) -> Option<(Template, TypeId)> {
        match self.data(id) {
            TypeData::Generic { template, args } if args.len() == 1 => Some((template, args[0])),
            _ => None,
        }
    }

    /// `T` for `Nullable<T>`.
    pub fn nullable_inner(&self, id: TypeId) -> Option<TypeId> {
        match self.template_arg(id) {
            Some((Template::Nullable, inner)) => Some(inner),
            _ => None,
        }
    }

    /// Template and payload of `Boxed<T>`, `NonNull<T>` or `Invariant<T>`.
    pub fn wrapper_inner(&self, id: TypeId) -> Option<(Template, TypeId)> {
        self.template_arg(id).filter(|(t, _)| t.is_wrapper())
    }

    /// Template and element of `Sequence<T>` or `NonEmptySequence<T>`.
    pub fn stream_inner(&self, id: TypeId) -> Option<(Template, TypeId)> {
        self.template_arg(id).filter(|(t, _)| t.is_stream())
    }

    pub fn tuple_fields(&self, id: TypeId) -> Option<Box<[TupleField]>> {
        match self.data(id) {
            TypeData::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// Canonically ordered alternatives of a union.
    pub fn union_members(&self, id: TypeId) -> Option<Box<[TypeId]>> {
        match self.data(id) {
            TypeData::Union(members) => Some(members),
            _ => None,
        }
    }

    pub fn intersection_members(&self, id: TypeId) -> Option<Box<[TypeId]>> {
        match self.data(id) {
            TypeData::Intersection(members) => Some(members),
            _ => None,
        }
    }

    /// Whether the `null` literal is a valid value of this type.
    pub fn is_compatible_with_null(&self, id: TypeId) -> bool {
        let id = self.strip_alias(id);
        if self.is_nullable(id) {
            return true;
        }
        match self.data(id) {
            TypeData::Pointer(_) => true,
            TypeData::Generic {
                template: Template::NonNull,
                ..
            } => false,
            _ => self.is_reference_type(id),
        }
    }
}

/// Sort by id and drop duplicates.
fn canonical_members(members: &[TypeId]) -> Box<[TypeId]> {
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.into_boxed_slice()
}
