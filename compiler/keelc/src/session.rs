//! The compilation session.

use keel_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use keel_eval::{ConstCache, ConstEvaluator, EvalConfig};
use keel_ir::{ExprArena, ExprId, FieldId, Literal, Name, StringInterner, TypeId};
use keel_typeck::{CoercionConfig, CoercionEngine, CoercionRules};
use keel_types::{
    Cardinality, DiagnosticSink, Pool, StreamAnalyzer, TypeRegistry, TypeUnifier,
};
use rustc_hash::FxHashMap;

/// Everything a session can be configured with.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    pub coercion: CoercionConfig,
    pub eval: EvalConfig,
    pub diagnostics: DiagnosticConfig,
}

impl SessionConfig {
    /// Overflow checked in casts and in constant folding.
    pub fn checked() -> Self {
        SessionConfig {
            coercion: CoercionConfig::checked(),
            eval: EvalConfig {
                overflow_checked: true,
            },
            diagnostics: DiagnosticConfig::default(),
        }
    }

    #[must_use]
    pub fn with_unsafe_context(mut self, unsafe_context: bool) -> Self {
        self.coercion = self.coercion.with_unsafe_context(unsafe_context);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// One compilation unit: its types, expressions, constants and
/// diagnostics.
///
/// Types and names are interned through `&self`; expressions are built
/// through [`Session::arena_mut`] and nominal facts declared through
/// [`Session::registry_mut`].
pub struct Session {
    config: SessionConfig,
    pool: Pool,
    interner: StringInterner,
    registry: TypeRegistry,
    arena: ExprArena,
    constants: FxHashMap<FieldId, (ExprId, TypeId)>,
    cache: ConstCache,
    queue: DiagnosticQueue,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        tracing::debug!(?config, "session created");
        Session {
            queue: DiagnosticQueue::with_config(config.diagnostics.clone()),
            config,
            pool: Pool::new(),
            interner: StringInterner::new(),
            registry: TypeRegistry::new(),
            arena: ExprArena::new(),
            constants: FxHashMap::default(),
            cache: ConstCache::new(),
        }
    }

    // === Accessors ===

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    #[inline]
    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    /// Human-readable name of `ty`, as diagnostics print it.
    pub fn format_type(&self, ty: TypeId) -> String {
        self.pool.format_type(ty, &self.interner)
    }

    // === Coercion ===

    /// Convert `expr` to `target` without a cast. `None` after a
    /// diagnostic.
    pub fn implicit_coercion(&mut self, expr: ExprId, target: TypeId) -> Option<ExprId> {
        self.with_engine(|engine, sink| engine.implicit_coercion(expr, target, sink))
    }

    /// Convert `expr` to `target` as a cast. `None` after a diagnostic.
    pub fn explicit_coercion(&mut self, expr: ExprId, target: TypeId) -> Option<ExprId> {
        self.with_engine(|engine, sink| engine.explicit_coercion(expr, target, sink))
    }

    /// Normalize an array index expression.
    pub fn coerce_to_index(&mut self, expr: ExprId) -> Option<ExprId> {
        self.with_engine(|engine, sink| engine.coerce_to_index(expr, sink))
    }

    /// Whether `t1` is a better conversion target than `t2` for a value
    /// of type `t3`.
    pub fn is_better_match(&self, t1: TypeId, t2: TypeId, t3: TypeId) -> bool {
        self.rules().is_better_match(t1, t2, t3)
    }

    /// The type-level coercion rules of this session.
    pub fn rules(&self) -> CoercionRules<'_> {
        CoercionRules::new(&self.pool, &self.registry, self.config.coercion)
    }

    fn with_engine<R>(
        &mut self,
        f: impl FnOnce(&mut CoercionEngine<'_>, &mut DiagnosticSink<'_>) -> R,
    ) -> R {
        let mut sink = DiagnosticSink::new(&mut self.queue, &self.pool, &self.interner);
        let mut engine = CoercionEngine::new(
            &self.pool,
            &self.registry,
            &mut self.arena,
            self.config.coercion,
        );
        f(&mut engine, &mut sink)
    }

    // === Constants ===

    /// Declare the constant `field` of type `ty`, initialized by `init`.
    pub fn declare_constant(&mut self, field: FieldId, init: ExprId, ty: TypeId) {
        self.constants.insert(field, (init, ty));
    }

    /// Fold `expr` to a literal. `None` when it is not constant, or after
    /// a diagnostic.
    pub fn evaluate(&mut self, expr: ExprId) -> Option<Literal> {
        let mut sink = DiagnosticSink::new(&mut self.queue, &self.pool, &self.interner);
        ConstEvaluator::new(
            &self.arena,
            &self.pool,
            &self.constants,
            &mut self.cache,
            self.config.eval,
        )
        .evaluate_expr(expr, &mut sink)
    }

    /// Value of a declared constant field, evaluated at most once.
    pub fn evaluate_field(&mut self, field: FieldId) -> Option<Literal> {
        let mut sink = DiagnosticSink::new(&mut self.queue, &self.pool, &self.interner);
        ConstEvaluator::new(
            &self.arena,
            &self.pool,
            &self.constants,
            &mut self.cache,
            self.config.eval,
        )
        .evaluate_field(field, &mut sink)
    }

    #[inline]
    pub fn constant_cache(&self) -> &ConstCache {
        &self.cache
    }

    // === Types ===

    /// Least upper bound of `types`.
    pub fn unify(&self, types: &[TypeId]) -> TypeId {
        TypeUnifier::new(&self.pool, &self.registry).unify(types)
    }

    pub fn cardinality(&self, ty: TypeId) -> Cardinality {
        self.streams().cardinality(ty)
    }

    pub fn expr_cardinality(&self, expr: ExprId) -> Cardinality {
        self.streams().expr_cardinality(&self.arena, expr)
    }

    pub fn element_type(&self, ty: TypeId) -> Option<TypeId> {
        self.streams().element_type(ty)
    }

    fn streams(&self) -> StreamAnalyzer<'_> {
        StreamAnalyzer::new(&self.pool, &self.registry)
    }

    // === Diagnostics ===

    pub fn error_count(&self) -> usize {
        self.queue.error_count()
    }

    /// All diagnostics reported so far, sorted by position.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.queue.flush()
    }
}
