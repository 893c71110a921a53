//! Emission results of the previous run, keyed by context.

use std::any::Any;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::generators::{GeneratedFile, GeneratorKind};

/// Files emitted per context by one stage.
pub struct StageCache<C> {
    entries: FxHashMap<C, Arc<[GeneratedFile]>>,
}

impl<C> Default for StageCache<C> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<C: Eq + Hash> StageCache<C> {
    pub fn get(&self, context: &C) -> Option<&Arc<[GeneratedFile]>> {
        self.entries.get(context)
    }

    pub fn insert(&mut self, context: C, files: Arc<[GeneratedFile]>) {
        self.entries.insert(context, files);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One [`StageCache`] per stage. Each stage has its own context type, so the
/// caches are stored erased and recovered by kind.
#[derive(Default)]
pub struct EmissionCache {
    stages: FxHashMap<GeneratorKind, Box<dyn Any + Send + Sync>>,
}

impl EmissionCache {
    pub fn stage<C: Send + Sync + 'static>(&self, kind: GeneratorKind) -> Option<&StageCache<C>> {
        self.stages.get(&kind)?.downcast_ref()
    }

    pub fn insert_stage<C: Send + Sync + 'static>(&mut self, kind: GeneratorKind, cache: StageCache<C>) {
        self.stages.insert(kind, Box::new(cache));
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_recovered_by_kind() {
        let mut stage = StageCache::default();
        stage.insert("Avatar".to_string(), Arc::from(vec![GeneratedFile::new("A.g.cs", "a")]));

        let mut cache = EmissionCache::default();
        cache.insert_stage(GeneratorKind::Identity, stage);

        let stage = cache.stage::<String>(GeneratorKind::Identity).unwrap();
        assert_eq!(stage.get(&"Avatar".to_string()).unwrap()[0].hint, "A.g.cs");
        assert!(cache.stage::<String>(GeneratorKind::Resx).is_none());
        assert!(cache.stage::<u32>(GeneratorKind::Identity).is_none());
    }
}
