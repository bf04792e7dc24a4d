//! Switch selection predicates for [`Session::switches`](crate::Session::switches).

use crate::switch::Switch;
use crate::types::RfkillType;

/// A predicate over a [`Switch`].
pub struct Filter {
    pred: Box<dyn Fn(&Switch) -> bool + Send + Sync>,
}

impl Filter {
    pub fn new<F>(pred: F) -> Self
    where
        F: Fn(&Switch) -> bool + Send + Sync + 'static,
    {
        Filter {
            pred: Box::new(pred),
        }
    }

    /// Passes every switch.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    pub fn with_type(type_: RfkillType) -> Self {
        Self::new(move |s| s.rf_type() == type_)
    }

    /// Passes switches whose canonical type name equals `name` (case-sensitive).
    pub fn with_type_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |s| s.rf_type().name() == name)
    }

    pub fn with_index(idx: u32) -> Self {
        Self::new(move |s| s.index() == idx)
    }

    /// Passes switches whose sysfs name equals `name`.
    pub fn with_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |s| s.name() == name)
    }

    /// Passes switches accepted by both filters.
    pub fn and(self, other: Filter) -> Self {
        Self::new(move |s| self.matches(s) && other.matches(s))
    }

    pub fn matches(&self, switch: &Switch) -> bool {
        (self.pred)(switch)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::any()
    }
}
