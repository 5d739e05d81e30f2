//! Ranking of competing conversion targets.

use keel_ir::TypeId;
use keel_types::numeric::prefer_integer;
use keel_types::TypeData;

use super::CoercionRules;

impl CoercionRules<'_> {
    /// Given that `t3` converts to both `t1` and `t2`, whether `t1` is the
    /// closer target.
    ///
    /// Identity wins. When exactly one of `t1` and `t2` converts to the
    /// other, the more specific one wins if `t3` reaches it directly. Then
    /// the integer tie-break (signed over unsigned, narrower over wider),
    /// a reference type over a value type for an `object` source, and a
    /// typed pointer over a non-pointer for a `void*` source.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn is_better_match(&self, t1: TypeId, t2: TypeId, t3: TypeId) -> bool {
        if t1 == t2 {
            return false;
        }
        if t1 == t3 {
            return true;
        }
        if t2 == t3 {
            return false;
        }
        let t1_to_t2 = self.implicit_coercion_from_to(t1, t2);
        let t2_to_t1 = self.implicit_coercion_from_to(t2, t1);
        if t1_to_t2 && !t2_to_t1 {
            return self.implicit_coercion_from_to(t3, t1);
        }
        if t2_to_t1 && !t1_to_t2 {
            return !self.implicit_coercion_from_to(t3, t2);
        }
        if let (Some(p1), Some(p2)) = (self.pool.primitive(t1), self.pool.primitive(t2)) {
            if let Some(preferred) = prefer_integer(p1, p2) {
                tracing::debug!(?t1, ?t2, preferred, "integer tie-break");
                return preferred;
            }
        }
        if t3 == TypeId::OBJECT && !self.pool.is_value_type(t1) && self.pool.is_value_type(t2) {
            return true;
        }
        let is_pointer = |ty| matches!(self.pool.data(ty), TypeData::Pointer(_));
        is_pointer(t1)
            && !is_pointer(t2)
            && matches!(self.pool.data(t3), TypeData::Pointer(TypeId::VOID))
    }
}
