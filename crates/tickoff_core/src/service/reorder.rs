//! Drag reorder arithmetic.

use crate::model::todo::TodoId;
use serde::{Deserialize, Serialize};

/// Drop position relative to the target todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Above,
    Below,
}

/// Moves `dragged` next to `target` inside `order`.
///
/// Returns `None` when `dragged == target` or either id is not in `order`.
pub fn compute_reorder(
    order: &[TodoId],
    dragged: &str,
    target: &str,
    position: InsertPosition,
) -> Option<Vec<TodoId>> {
    if dragged == target {
        return None;
    }
    let from = order.iter().position(|id| id == dragged)?;
    if !order.iter().any(|id| id == target) {
        return None;
    }

    let mut next = order.to_vec();
    let moved = next.remove(from);
    let target_index = next.iter().position(|id| id == target)?;
    let insert_at = match position {
        InsertPosition::Above => target_index,
        InsertPosition::Below => target_index + 1,
    };
    next.insert(insert_at, moved);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::{compute_reorder, InsertPosition};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn moves_up_and_down() {
        let order = ids(&["a", "b", "c"]);
        assert_eq!(
            compute_reorder(&order, "b", "a", InsertPosition::Above),
            Some(ids(&["b", "a", "c"]))
        );
        assert_eq!(
            compute_reorder(&order, "a", "c", InsertPosition::Below),
            Some(ids(&["b", "c", "a"]))
        );
        assert_eq!(
            compute_reorder(&order, "c", "a", InsertPosition::Below),
            Some(ids(&["a", "c", "b"]))
        );
        assert_eq!(
            compute_reorder(&order, "a", "c", InsertPosition::Above),
            Some(ids(&["b", "a", "c"]))
        );
    }

    #[test]
    fn rejects_self_drop_and_unknown_ids() {
        let order = ids(&["a", "b"]);
        assert_eq!(compute_reorder(&order, "a", "a", InsertPosition::Above), None);
        assert_eq!(compute_reorder(&order, "x", "a", InsertPosition::Above), None);
        assert_eq!(compute_reorder(&order, "a", "x", InsertPosition::Below), None);
    }
}
