//! Search for user-declared conversion operators.
//!
//! Direct operators come first: one declared on the source (or a base of
//! the source) converting to the target, then one declared on the target
//! converting from it. With `try_standard`, operators reachable through a
//! standard conversion on either side are considered, ranked by how
//! closely their intermediate type matches.

use keel_ir::TypeId;
use keel_types::{ConversionMethod, TypeData};
use smallvec::SmallVec;

use super::CoercionRules;

impl CoercionRules<'_> {
    /// `ty` followed by its base chain.
    fn self_and_bases(&self, ty: TypeId) -> SmallVec<[TypeId; 8]> {
        let mut chain = SmallVec::new();
        chain.push(ty);
        if ty != TypeId::OBJECT {
            chain.extend(self.directory.base_chain(ty));
        }
        chain
    }

    /// An operator declared on `declaring` converting `param` to `ret`.
    fn declared(
        &self,
        declaring: TypeId,
        param: TypeId,
        ret: TypeId,
        implicit: bool,
    ) -> Option<ConversionMethod> {
        self.directory
            .conversions(declaring)
            .iter()
            .find(|m| m.is_implicit() == implicit && m.param == param && m.ret == ret)
            .copied()
    }

    /// Pick the candidate whose key is the best match from `from`.
    fn best_candidate(
        &self,
        candidates: impl IntoIterator<Item = (ConversionMethod, TypeId)>,
        from: TypeId,
    ) -> Option<ConversionMethod> {
        let mut best: Option<(ConversionMethod, TypeId)> = None;
        for (method, key) in candidates {
            best = match best {
                Some((_, best_key)) if !self.is_better_match(key, best_key, from) => best,
                _ => Some((method, key)),
            };
        }
        best.map(|(method, _)| method)
    }

    /// Implicit user-defined conversion from `source` to `target`.
    ///
    /// When both are nullable and `try_standard` is set, the search runs on
    /// the payload types so the result can be lifted.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn user_defined_coercion(
        &self,
        source: TypeId,
        target: TypeId,
        try_standard: bool,
    ) -> Option<ConversionMethod> {
        let mut source = match self.pool.data(source) {
            TypeData::ByRef(elem) => elem,
            _ => source,
        };
        let mut target = target;
        if try_standard {
            if let (Some(s), Some(t)) = (
                self.pool.nullable_inner(source),
                self.pool.nullable_inner(target),
            ) {
                source = s;
                target = t;
            }
        }

        for ty in self.self_and_bases(source) {
            let found = self
                .declared(ty, ty, target, true)
                .or_else(|| self.declared(target, ty, target, true));
            if let Some(method) = found {
                tracing::debug!(?source, ?target, conversion = ?method.id, "user-defined conversion");
                return Some(method);
            }
        }
        if !try_standard {
            return None;
        }

        // Operators on the source whose result converts to the target,
        // ranked by how close the result is to the target.
        let from_source = self
            .directory
            .conversions(source)
            .iter()
            .filter(|m| m.is_implicit() && m.ret != source && m.param == source)
            .filter(|m| self.standard_implicit_from_to(m.ret, target))
            .map(|m| (*m, m.ret));
        if let Some(method) = self.best_candidate(from_source, target) {
            tracing::debug!(?source, ?target, conversion = ?method.id, via = ?method.ret, "user-defined conversion");
            return Some(method);
        }

        // Operators on the target whose parameter the source converts to,
        // ranked by how close the parameter is to the source.
        let into_target = self
            .directory
            .conversions(target)
            .iter()
            .filter(|m| m.is_implicit() && m.ret == target)
            .filter(|m| self.standard_implicit_from_to(source, m.param))
            .map(|m| (*m, m.param));
        let method = self.best_candidate(into_target, source)?;
        tracing::debug!(?source, ?target, conversion = ?method.id, via = ?method.param, "user-defined conversion");
        Some(method)
    }

    /// User-defined conversion usable in a cast from `source` to `target`.
    ///
    /// Explicit operators are preferred over implicit ones at each step,
    /// and the hierarchy is walked in both directions: bases of the source
    /// and bases of the target.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn user_defined_explicit_coercion(
        &self,
        source: TypeId,
        target: TypeId,
        try_standard: bool,
    ) -> Option<ConversionMethod> {
        let source = match self.pool.data(source) {
            TypeData::ByRef(elem) => elem,
            _ => source,
        };
        if source == target {
            return None;
        }
        for ty in self.self_and_bases(source) {
            let found = self
                .declared(ty, ty, target, false)
                .or_else(|| self.declared(ty, ty, target, true))
                .or_else(|| self.declared(target, ty, target, false))
                .or_else(|| self.declared(target, ty, target, true));
            if found.is_some() {
                return found;
            }
        }
        if !try_standard {
            return None;
        }

        // Explicit operators first: `false < true`.
        let mut on_target: SmallVec<[ConversionMethod; 4]> = self
            .directory
            .conversions(target)
            .iter()
            .filter(|m| m.ret == target)
            .copied()
            .collect();
        on_target.sort_by_key(ConversionMethod::is_implicit);
        if let Some(method) = on_target
            .iter()
            .find(|m| m.param == source || self.standard_explicit_from_to(source, m.param))
        {
            return Some(*method);
        }

        let mut on_source: SmallVec<[ConversionMethod; 4]> = self
            .directory
            .conversions(source)
            .iter()
            .filter(|m| m.ret != source && m.param == source)
            .copied()
            .collect();
        on_source.sort_by_key(ConversionMethod::is_implicit);
        if let Some(method) = on_source
            .iter()
            .find(|m| self.standard_implicit_from_to(m.ret, target))
        {
            return Some(*method);
        }
        let lossy = on_source
            .iter()
            .filter(|m| self.standard_explicit_from_to(m.ret, target))
            .map(|m| (*m, m.ret));
        if let Some(method) = self.best_candidate(lossy, target) {
            tracing::debug!(?source, ?target, conversion = ?method.id, "lossy user-defined conversion");
            return Some(method);
        }

        if let Some(base) = self.directory.base_type(source) {
            if let Some(method) = self.user_defined_explicit_coercion(base, target, true) {
                return Some(method);
            }
        }
        let base = self.directory.base_type(target)?;
        self.user_defined_explicit_coercion(source, base, true)
    }
}
