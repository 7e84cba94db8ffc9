//! Ordered, homogeneous containers of endpoint models.

use std::any::Any;
use std::cmp::Ordering;

use crate::endpoint::Endpoint;
use crate::error::{CrmError, Result};

/// Models of one entity type, in insertion order.
///
/// No deduplication is done; every operation except [`sort_by`](Self::sort_by)
/// keeps the existing order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Endpoint> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity name of the elements.
    pub fn element_type(&self) -> &'static str {
        T::SCHEMA.entity
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Push a model whose type is only known at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::TypeMismatch`] if `U` is not `T`.
    pub fn try_push<U: Endpoint>(&mut self, item: U) -> Result<()> {
        let boxed: Box<dyn Any> = Box::new(item);
        match boxed.downcast::<T>() {
            Ok(item) => {
                self.items.push(*item);
                Ok(())
            }
            Err(_) => Err(CrmError::TypeMismatch {
                expected: T::SCHEMA.entity,
                found: U::SCHEMA.entity,
            }),
        }
    }

    /// Items matching `predicate`, same order.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        Self {
            items: self.items.iter().filter(|item| predicate(*item)).cloned().collect(),
        }
    }

    /// First item, or `None` when empty.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Last item, or `None` when empty.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Concatenate `other` after `self`.
    #[must_use]
    pub fn merge(mut self, other: Collection<T>) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Concatenate a collection whose element type is only known at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CrmError::TypeMismatch`] if `U` is not `T`.
    pub fn try_merge<U: Endpoint>(self, other: Collection<U>) -> Result<Self> {
        let boxed: Box<dyn Any> = Box::new(other);
        match boxed.downcast::<Collection<T>>() {
            Ok(other) => Ok(self.merge(*other)),
            Err(_) => Err(CrmError::TypeMismatch {
                expected: T::SCHEMA.entity,
                found: U::SCHEMA.entity,
            }),
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the items. Later changes to the collection do not show
    /// up in the returned vector.
    pub fn elements(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Stable in-place sort.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.items.sort_by(compare);
    }

    pub fn find_by_id(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Map the items to a different type.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Vec<U> {
        self.items.iter().map(f).collect()
    }
}

impl<T: Endpoint> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Endpoint> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Client, Surcharge};
    use serde_json::json;

    fn client(id: i64, first: &str, is_lead: bool) -> Client {
        Client::from_json(json!({
            "id": id,
            "clientType": 1,
            "firstName": first,
            "lastName": "Doe",
            "isLead": is_lead
        }))
        .unwrap()
    }

    fn sample() -> Collection<Client> {
        vec![client(1, "Ann", false), client(2, "Bob", true), client(3, "Cid", true)].into()
    }

    #[test]
    fn test_filter_keeps_order() {
        let leads = sample().filter(|c| c.is_lead().unwrap() == Some(true));
        assert_eq!(leads.map(|c| c.id()), vec![Some(2), Some(3)]);
        assert_eq!(leads.element_type(), "Client");
    }

    #[test]
    fn test_first_last_on_empty() {
        let empty: Collection<Client> = Collection::new();
        assert!(empty.first().is_none());
        assert!(empty.last().is_none());
        assert_eq!(empty.count(), 0);
    }

    #[test]
    fn test_first_last() {
        let all = sample();
        assert_eq!(all.first().and_then(|c| c.id()), Some(1));
        assert_eq!(all.last().and_then(|c| c.id()), Some(3));
    }

    #[test]
    fn test_merge_preserves_order_and_duplicates() {
        let merged = sample().merge(sample());
        assert_eq!(merged.count(), 6);
        assert_eq!(
            merged.map(|c| c.id().unwrap()),
            vec![1, 2, 3, 1, 2, 3]
        );
    }

    #[test]
    fn test_try_push_rejects_other_entity() {
        let mut clients = sample();
        let surcharge = Surcharge::from_json(json!({"id": 5, "name": "Fee", "price": 1.0})).unwrap();

        let err = clients.try_push(surcharge).unwrap_err();
        assert!(matches!(
            err,
            CrmError::TypeMismatch {
                expected: "Client",
                found: "Surcharge"
            }
        ));
        assert_eq!(clients.count(), 3);

        clients.try_push(client(4, "Dee", false)).unwrap();
        assert_eq!(clients.count(), 4);
    }

    #[test]
    fn test_try_merge_rejects_other_entity() {
        let surcharges: Collection<Surcharge> = Collection::new();
        assert!(matches!(
            sample().try_merge(surcharges),
            Err(CrmError::TypeMismatch { .. })
        ));

        let merged = sample().try_merge(sample()).unwrap();
        assert_eq!(merged.count(), 6);
    }

    #[test]
    fn test_elements_is_a_snapshot() {
        let mut all = sample();
        let snapshot = all.elements();
        all.push(client(9, "Eve", false));

        assert_eq!(snapshot.len(), 3);
        assert_eq!(all.count(), 4);
    }

    #[test]
    fn test_sort_and_find() {
        let mut all = sample();
        all.sort_by(|a, b| b.id().cmp(&a.id()));
        assert_eq!(all.first().and_then(|c| c.id()), Some(3));
        assert_eq!(
            all.find_by_id(2).and_then(|c| c.first_name().unwrap().map(str::to_string)),
            Some("Bob".to_string())
        );
        assert!(all.find_by_id(42).is_none());
    }
}
