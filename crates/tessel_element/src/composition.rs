//! Capability wrapping plan
//!
//! Which drag/drop boundaries surround an element is decided once per
//! render by a small table instead of nested conditionals:
//!
//! | editing | drag set | drop set, no custom area, selectable | plan |
//! |---------|----------|--------------------------------------|------|
//! | no      | -        | -                                    | `Bare` |
//! | yes     | no       | no                                   | `Bare` |
//! | yes     | yes      | no                                   | `Draggable` |
//! | yes     | no       | yes                                  | `Droppable` |
//! | yes     | yes      | yes                                  | `DraggableDroppable` |

use crate::props::InteractionFlags;
use crate::settings::Settings;

/// How an element's tag and children are wrapped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composition {
    /// Tag rendered directly, children unwrapped
    Bare,
    /// Tag inside a draggable boundary
    Draggable,
    /// Children inside a droppable boundary
    Droppable,
    /// Both boundaries
    DraggableDroppable,
}

impl Composition {
    pub fn plan(flags: &InteractionFlags, settings: &Settings) -> Self {
        let drag = settings.drag.is_some();
        let drop = settings
            .drop
            .as_ref()
            .is_some_and(|drop| !drop.custom_drop_area)
            && !flags.disable_selection;

        match (flags.editing, drag, drop) {
            (false, _, _) => Composition::Bare,
            (true, false, false) => Composition::Bare,
            (true, true, false) => Composition::Draggable,
            (true, false, true) => Composition::Droppable,
            (true, true, true) => Composition::DraggableDroppable,
        }
    }

    pub fn wraps_drag(self) -> bool {
        matches!(self, Composition::Draggable | Composition::DraggableDroppable)
    }

    pub fn wraps_drop(self) -> bool {
        matches!(self, Composition::Droppable | Composition::DraggableDroppable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{DragSettings, DropSettings};

    fn flags(editing: bool, disable_selection: bool) -> InteractionFlags {
        InteractionFlags {
            editing,
            disable_selection,
            ..Default::default()
        }
    }

    fn settings(drag: bool, drop: Option<bool>) -> Settings {
        Settings {
            drag: drag.then(DragSettings::default),
            drop: drop.map(|custom_drop_area| DropSettings {
                custom_drop_area,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_decision_table() {
        let cases = [
            // (editing, disable_selection, drag, drop(custom), expected)
            (false, false, true, Some(false), Composition::Bare),
            (true, false, false, None, Composition::Bare),
            (true, false, true, None, Composition::Draggable),
            (true, false, false, Some(false), Composition::Droppable),
            (true, false, true, Some(false), Composition::DraggableDroppable),
            (true, false, true, Some(true), Composition::Draggable),
            (true, false, false, Some(true), Composition::Bare),
            (true, true, true, Some(false), Composition::Draggable),
            (true, true, false, Some(false), Composition::Bare),
        ];

        for (editing, disable, drag, drop, expected) in cases {
            assert_eq!(
                Composition::plan(&flags(editing, disable), &settings(drag, drop)),
                expected,
                "editing={editing} disable={disable} drag={drag} drop={drop:?}"
            );
        }
    }

    #[test]
    fn test_wrap_queries() {
        assert!(!Composition::Bare.wraps_drag());
        assert!(!Composition::Bare.wraps_drop());
        assert!(Composition::Draggable.wraps_drag());
        assert!(Composition::Droppable.wraps_drop());
        assert!(Composition::DraggableDroppable.wraps_drag());
        assert!(Composition::DraggableDroppable.wraps_drop());
    }
}
