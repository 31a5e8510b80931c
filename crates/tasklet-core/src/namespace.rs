//! Namespaces: the global bindings a script body runs against
//!
//! Each configured script gets its own namespace so scripts cannot see each
//! other's globals. The engine itself treats a namespace as an opaque
//! binding container; the only structured operation it relies on is the
//! inject/restore pair used to slip per-request values into a namespace
//! around a single evaluation and take them back out afterwards.
//!
//! Handles are reference-counted and single-threaded (the engine runs one
//! logical thread per worker by design).

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::value::Value;

/// A shared handle to one script namespace.
#[derive(Clone)]
pub struct Namespace {
    inner: Rc<NamespaceInner>,
}

struct NamespaceInner {
    name: String,
    bindings: RefCell<BTreeMap<String, Value>>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(NamespaceInner {
                name: name.into(),
                bindings: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Look up a binding; values are returned by clone so no borrow is held
    /// across a suspension point.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.bindings.borrow().get(name).cloned()
    }

    /// Bind `name`, returning the previous value if there was one.
    pub fn set(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.inner.bindings.borrow_mut().insert(name.into(), value)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.bindings.borrow_mut().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.bindings.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bindings.borrow().is_empty()
    }

    /// Inject a per-request value: binds `name` only if it is absent.
    /// Returns the existing binding (left untouched) if there was one.
    ///
    /// Pair with [`Namespace::restore`] to put the namespace back exactly
    /// as it was.
    pub fn inject(&self, name: &str, value: Value) -> Option<Value> {
        let mut bindings = self.inner.bindings.borrow_mut();
        match bindings.get(name) {
            Some(old) => Some(old.clone()),
            None => {
                bindings.insert(name.to_string(), value);
                None
            }
        }
    }

    /// Undo an [`Namespace::inject`]: if there was no previous binding,
    /// remove the injected one; otherwise leave the namespace alone.
    pub fn restore(&self, name: &str, old: Option<Value>) {
        if old.is_none() {
            self.inner.bindings.borrow_mut().remove(name);
        }
    }

    /// Two handles to the same underlying namespace?
    pub fn same_as(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.inner.name)
            .field("bindings", &self.len())
            .finish()
    }
}

/// Hands out uniquely-named namespaces and tracks them until release.
///
/// Mirrors the per-configuration module bookkeeping of the host: every
/// configured script gets `"<prefix><counter>"`, and tearing the script
/// down removes its namespace from the registry.
pub struct NamespaceRegistry {
    prefix: String,
    counter: Cell<u64>,
    namespaces: RefCell<BTreeMap<String, Namespace>>,
}

impl NamespaceRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Cell::new(0),
            namespaces: RefCell::new(BTreeMap::new()),
        }
    }

    /// Create and register a fresh namespace with a unique generated name.
    pub fn create(&self) -> Namespace {
        let n = self.counter.get();
        self.counter.set(n + 1);

        let name = format!("{}{}", self.prefix, n);
        let ns = Namespace::new(name.clone());
        self.namespaces.borrow_mut().insert(name, ns.clone());
        ns
    }

    pub fn get(&self, name: &str) -> Option<Namespace> {
        self.namespaces.borrow().get(name).cloned()
    }

    /// Remove a namespace from the registry. Removing an already-released
    /// name is a no-op, matching teardown ordering in the host.
    pub fn release(&self, name: &str) {
        self.namespaces.borrow_mut().remove(name);
    }

    pub fn len(&self) -> usize {
        self.namespaces.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let ns = Namespace::new("t");
        assert_eq!(ns.set("a", Value::Int(1)), None);
        assert_eq!(ns.set("a", Value::Int(2)), Some(Value::Int(1)));
        assert_eq!(ns.get("a"), Some(Value::Int(2)));
        assert_eq!(ns.remove("a"), Some(Value::Int(2)));
        assert!(!ns.contains("a"));
    }

    #[test]
    fn test_inject_into_absent_binding() {
        let ns = Namespace::new("t");

        let old = ns.inject("request", Value::Str("r1".into()));
        assert_eq!(old, None);
        assert_eq!(ns.get("request"), Some(Value::Str("r1".into())));

        ns.restore("request", old);
        assert!(!ns.contains("request"));
    }

    #[test]
    fn test_inject_leaves_existing_binding() {
        let ns = Namespace::new("t");
        ns.set("request", Value::Int(7));

        let old = ns.inject("request", Value::Int(99));
        assert_eq!(old, Some(Value::Int(7)));
        // Existing binding was not overwritten.
        assert_eq!(ns.get("request"), Some(Value::Int(7)));

        ns.restore("request", old);
        assert_eq!(ns.get("request"), Some(Value::Int(7)));
    }

    #[test]
    fn test_round_trip_restores_prior_state() {
        let ns = Namespace::new("t");
        ns.set("keep", Value::Bool(true));

        let a = ns.inject("keep", Value::Bool(false));
        let b = ns.inject("fresh", Value::Int(1));
        ns.restore("fresh", b);
        ns.restore("keep", a);

        assert_eq!(ns.get("keep"), Some(Value::Bool(true)));
        assert!(!ns.contains("fresh"));
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_clone_shares_bindings() {
        let ns = Namespace::new("t");
        let ns2 = ns.clone();
        ns.set("x", Value::Int(5));
        assert_eq!(ns2.get("x"), Some(Value::Int(5)));
        assert!(ns.same_as(&ns2));
    }

    #[test]
    fn test_registry_unique_names() {
        let reg = NamespaceRegistry::new("ns");
        let a = reg.create();
        let b = reg.create();

        assert_ne!(a.name(), b.name());
        assert_eq!(a.name(), "ns0");
        assert_eq!(b.name(), "ns1");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_registry_release() {
        let reg = NamespaceRegistry::new("ns");
        let a = reg.create();

        assert!(reg.get(a.name()).is_some());
        reg.release(a.name());
        assert!(reg.get(a.name()).is_none());

        // Releasing twice is harmless.
        reg.release(a.name());
        assert!(reg.is_empty());
    }
}
