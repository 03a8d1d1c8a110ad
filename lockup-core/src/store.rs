//! Observable collection stores.
//!
//! A [`Store`] exclusively owns an insertion-ordered collection of one
//! entity type and broadcasts a [`StoreEvent`] for every mutation.
//!
//! ## Notification
//!
//! - Uses a tokio broadcast channel, so any number of observers can
//!   subscribe and each receives every event sent after it subscribed
//! - Events are sent synchronously from the mutating call; sending never
//!   blocks and is a no-op when nobody is subscribed
//! - A slow observer that falls more than `capacity` events behind sees
//!   `RecvError::Lagged` and should re-read the snapshot

use crate::{Entity, ItemEdit, ItemField, StorageItem};
use tokio::sync::broadcast;
use tracing::debug;

/// A change to a store's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent<Id> {
    /// An entity was appended at `index`.
    Appended { id: Id, index: usize },
    /// The entity that was at `index` has been removed.
    Removed { id: Id, index: usize },
    /// A single field of an entity changed in place.
    FieldChanged { id: Id, field: ItemField },
}

impl<Id: Copy> StoreEvent<Id> {
    pub fn id(&self) -> Id {
        match self {
            Self::Appended { id, .. } | Self::Removed { id, .. } | Self::FieldChanged { id, .. } => {
                *id
            }
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Appended { .. } => "appended",
            Self::Removed { .. } => "removed",
            Self::FieldChanged { .. } => "field_changed",
        }
    }
}

/// Owning, observable, insertion-ordered collection of one entity type.
pub struct Store<T: Entity> {
    entities: Vec<T>,
    tx: broadcast::Sender<StoreEvent<T::Id>>,
}

impl<T: Entity> Store<T> {
    /// Create an empty store whose observers may buffer up to `capacity`
    /// unread events.
    pub fn new(capacity: usize) -> Self {
        Self::with_entities(Vec::new(), capacity)
    }

    /// Create a store pre-populated with `entities`, in order.
    pub fn with_entities(entities: Vec<T>, capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { entities, tx }
    }

    /// Subscribe to future mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent<T::Id>> {
        self.tx.subscribe()
    }

    /// Add an entity at the end of the collection.
    pub fn append(&mut self, entity: T) -> T::Id {
        let id = entity.id();
        let index = self.entities.len();
        debug!(
            entity_type = T::ENTITY_TYPE.as_str(),
            id = %id,
            name = entity.name(),
            index,
            "Appending entity"
        );
        self.entities.push(entity);
        self.notify(StoreEvent::Appended { id, index });
        id
    }

    /// Remove the entity at `index`. Out-of-range indices are a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.entities.len() {
            debug!(
                entity_type = T::ENTITY_TYPE.as_str(),
                index,
                len = self.entities.len(),
                "Ignoring out-of-range removal"
            );
            return None;
        }
        let removed = self.entities.remove(index);
        self.notify(StoreEvent::Removed {
            id: removed.id(),
            index,
        });
        Some(removed)
    }

    /// Remove the entity with `id`, wherever it currently sits.
    pub fn remove_by_id(&mut self, id: T::Id) -> Option<T> {
        let index = self.position_of(id)?;
        self.remove_at(index)
    }

    /// Remove every entity matching `predicate`, preserving the order of
    /// the rest. Returns the removed entities in their former order.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.entities.len() {
            if predicate(&self.entities[index]) {
                let entity = self.entities.remove(index);
                self.notify(StoreEvent::Removed {
                    id: entity.id(),
                    index,
                });
                removed.push(entity);
            } else {
                index += 1;
            }
        }
        removed
    }

    /// The current ordered snapshot.
    pub fn all(&self) -> &[T] {
        &self.entities
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn position_of(&self, id: T::Id) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn notify(&self, event: StoreEvent<T::Id>) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(receivers) => {
                debug!(
                    entity_type = T::ENTITY_TYPE.as_str(),
                    event_type,
                    receivers,
                    "Broadcast store event"
                );
            }
            Err(_) => {
                debug!(
                    entity_type = T::ENTITY_TYPE.as_str(),
                    event_type,
                    "No observers for store event"
                );
            }
        }
    }
}

impl Store<StorageItem> {
    /// Replace one field of the item with `id` and broadcast which field
    /// changed. Returns `None` if no such item exists.
    pub fn edit(&mut self, id: <StorageItem as Entity>::Id, edit: ItemEdit) -> Option<ItemField> {
        let item = self.entities.iter_mut().find(|item| item.id() == id)?;
        let field = item.apply(edit);
        self.notify(StoreEvent::FieldChanged { id, field });
        Some(field)
    }
}

impl<T: Entity> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entity_type", &T::ENTITY_TYPE)
            .field("len", &self.entities.len())
            .field("observers", &self.tx.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Color, Dimensions, Position, StorageSpace};
    use tokio::sync::broadcast::error::TryRecvError;

    fn categories(names: &[&str]) -> Vec<Category> {
        names.iter().map(|n| Category::new(*n, Color::GRAY)).collect()
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut store: Store<Category> = Store::new(16);
        for category in categories(&["a", "b", "c"]) {
            store.append(category);
        }
        let names: Vec<_> = store.all().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_append_notifies_observers() {
        let mut store: Store<Category> = Store::new(16);
        let mut rx = store.subscribe();
        let category = Category::new("COSHH", Color::YELLOW);
        let id = store.append(category);

        assert_eq!(rx.try_recv(), Ok(StoreEvent::Appended { id, index: 0 }));
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_remove_at_out_of_range_is_noop() {
        let mut store = Store::with_entities(categories(&["a"]), 16);
        let mut rx = store.subscribe();

        assert!(store.remove_at(5).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_remove_at_notifies_with_former_index() {
        let seed = categories(&["a", "b", "c"]);
        let b = seed[1].id();
        let mut store = Store::with_entities(seed, 16);
        let mut rx = store.subscribe();

        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.id(), b);
        assert_eq!(rx.try_recv(), Ok(StoreEvent::Removed { id: b, index: 1 }));
        assert!(store.get(b).is_none());
    }

    #[test]
    fn test_remove_where_removes_all_matches_in_order() {
        let mut store = Store::with_entities(categories(&["x1", "keep", "x2", "x3"]), 16);
        let mut rx = store.subscribe();

        let removed = store.remove_where(|c| c.name.starts_with('x'));
        let names: Vec<_> = removed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x1", "x2", "x3"]);
        assert_eq!(store.len(), 1);

        let indices: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|event| match event {
                StoreEvent::Removed { index, .. } => index,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 1]);
    }

    #[test]
    fn test_remove_by_id_unknown_is_noop() {
        let mut store = Store::with_entities(categories(&["a"]), 16);
        let stranger = Category::new("b", Color::GRAY);
        assert!(store.remove_by_id(stranger.id()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_item_edit_broadcasts_field_change() {
        let space =
            StorageSpace::new("Attic", Dimensions::new(3, 2, 3).unwrap(), Color::ORANGE).unwrap();
        let item = StorageItem::new("Lamp", space, Position::ORIGIN).unwrap();
        let id = item.id();
        let mut store = Store::with_entities(vec![item], 16);
        let mut rx = store.subscribe();

        let field = store.edit(id, ItemEdit::Name("Desk Lamp".to_string()));
        assert_eq!(field, Some(ItemField::Name));
        assert_eq!(store.get(id).map(|i| i.name.as_str()), Some("Desk Lamp"));
        assert_eq!(
            rx.try_recv(),
            Ok(StoreEvent::FieldChanged {
                id,
                field: ItemField::Name
            })
        );
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let mut store: Store<Category> = Store::new(0);
        let mut rx = store.subscribe();
        store.append(Category::new("a", Color::GRAY));
        assert!(rx.try_recv().is_ok());
    }
}
