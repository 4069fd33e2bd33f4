use crate::{
    BindingKey, ConstantProvider, InjectResult, Injector, Provider, Scope,
    Svc,
};
use ::thread_local::ThreadLocal;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    thread::{self, ThreadId},
};

#[derive(Default)]
struct Cache {
    thread: Option<ThreadId>,
    values: HashMap<BindingKey, Svc<dyn Provider>>,
}

/// A scope which produces one value per key for each thread.
///
/// Storage is reclaimed as threads exit, so the number of caches is bounded
/// by the number of threads alive at the same time rather than by the number
/// of threads which ever resolved a value.
#[derive(Default)]
pub struct ThreadLocalScope {
    caches: ThreadLocal<Mutex<Cache>>,
}

impl ThreadLocalScope {
    /// The number of values cached across all threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.caches
            .iter()
            .map(|cache| cache.lock().values.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Scope for ThreadLocalScope {
    fn get(
        &self,
        key: &BindingKey,
        provider: Svc<dyn Provider>,
        owner: &Injector,
    ) -> InjectResult<Svc<dyn Provider>> {
        let slot = self.caches.get_or_default();
        let current = thread::current().id();
        {
            let mut cache = slot.lock();
            // Slots of exited threads are handed to new threads
            if cache.thread != Some(current) {
                cache.thread = Some(current);
                cache.values.clear();
            }
            if let Some(cached) = cache.values.get(key) {
                return Ok(cached.clone());
            }
        }

        trace!(%key, thread = ?current, "producing thread-local value");
        let value = provider.get(owner)?;
        let produced: Svc<dyn Provider> =
            Svc::new(ConstantProvider::from_dyn(value));
        Ok(slot.lock().values.entry(*key).or_insert(produced).clone())
    }
}
