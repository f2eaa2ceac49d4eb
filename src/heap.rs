//! Object arena
//!
//! All objects live in a single arena owned by the context and are addressed
//! by [`ObjectId`]. Prototype links and property values refer to other objects
//! through handles only, so cyclic object graphs need no owning pointers.
//! Collection is left to an external collector; slots are never reused.

use crate::runtime::object::JsObject;
use crate::value::ObjectId;

/// The JavaScript heap
#[derive(Default)]
pub struct Heap {
    objects: Vec<JsObject>,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            objects: Vec::with_capacity(256),
        }
    }

    /// Move an object into the arena and return its handle
    pub fn alloc(&mut self, object: JsObject) -> ObjectId {
        let id = ObjectId::from_index(self.objects.len());
        self.objects.push(object);
        id
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> &JsObject {
        &self.objects[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> &mut JsObject {
        &mut self.objects[id.index()]
    }

    /// Number of allocated objects
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            objects: self.objects.len(),
            properties: self.objects.iter().map(|o| o.properties.len()).sum(),
        }
    }
}

/// Heap usage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    /// Allocated objects
    pub objects: usize,
    /// Own properties stored across all objects
    pub properties: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::property::Property;
    use crate::value::Value;

    #[test]
    fn test_alloc_and_stats() {
        let mut heap = Heap::new();
        assert!(heap.is_empty());

        let a = heap.alloc(JsObject::ordinary(None));
        let b = heap.alloc(JsObject::ordinary(Some(a)));
        assert_ne!(a, b);
        assert_eq!(heap.get(b).proto, Some(a));

        heap.get_mut(a)
            .properties
            .insert("x".into(), Property::data(Value::from(1), true, true, true));

        let stats = heap.stats();
        assert_eq!(stats.objects, 2);
        assert_eq!(stats.properties, 1);
    }
}
