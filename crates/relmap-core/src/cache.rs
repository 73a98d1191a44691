use once_cell::race::OnceBox;
use std::fmt;

/// A value derived on first use and published exactly once.
///
/// Racing initializers may each compute the value; the first one to publish
/// wins and the others are dropped. Readers either see nothing or a fully
/// built value.
pub(crate) struct Cached<T> {
    inner: OnceBox<T>,
}

impl<T> Cached<T> {
    pub(crate) const fn new() -> Self {
        Self {
            inner: OnceBox::new(),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.inner.get()
    }

    pub(crate) fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.inner.get_or_init(|| Box::new(f()))
    }

    pub(crate) fn get_or_try_init<E>(&self, f: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        self.inner.get_or_try_init(|| f().map(Box::new))
    }

    /// Drops the value so the next read derives it again.
    pub(crate) fn reset(&mut self) {
        self.inner = OnceBox::new();
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones start out empty; the value is derived again on first use.
impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Derived values never take part in equality.
impl<T> PartialEq for Cached<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> fmt::Debug for Cached<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(_) => fmt.write_str("Cached(<initialized>)"),
            None => fmt.write_str("Cached(<uninit>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn initializes_once() {
        let cached = Cached::new();
        assert!(cached.get().is_none());

        assert_eq!(*cached.get_or_init(|| 1), 1);
        assert_eq!(*cached.get_or_init(|| 2), 1);
    }

    #[test]
    fn failed_init_leaves_cache_empty() {
        let cached: Cached<u32> = Cached::new();
        let res: Result<&u32, &str> = cached.get_or_try_init(|| Err("nope"));
        assert!(res.is_err());
        assert!(cached.get().is_none());
    }

    #[test]
    fn racing_threads_observe_one_value() {
        let cached = Arc::new(Cached::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles = (0..8)
            .map(|i| {
                let cached = cached.clone();
                let calls = calls.clone();
                std::thread::spawn(move || {
                    *cached.get_or_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        i
                    })
                })
            })
            .collect::<Vec<_>>();

        let seen = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        assert!(calls.load(Ordering::SeqCst) >= 1);
        assert!(seen.iter().all(|value| *value == seen[0]));
    }

    #[test]
    fn reset_derives_again() {
        let mut cached = Cached::new();
        assert_eq!(*cached.get_or_init(|| 1), 1);

        cached.reset();
        assert!(cached.get().is_none());
        assert_eq!(*cached.get_or_init(|| 2), 2);
    }

    #[test]
    fn clone_is_empty() {
        let cached = Cached::new();
        cached.get_or_init(|| "value");
        assert!(cached.clone().get().is_none());
    }
}
