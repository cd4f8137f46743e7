pub mod ordered_list;
pub mod slot_arena;

pub use ordered_list::{ListId, NodeRef, OrderedList, OrderedListIter, OrderedListRefIter};
pub use slot_arena::{SlotArena, SlotId};
