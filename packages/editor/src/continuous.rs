//! Continuous edits: drags and resizes that update the document on every
//! pointer frame but land in history as a single step.
//!
//! ```rust,ignore
//! let token = session.begin_drag("w-1", "p-1", pointer, bounds)?;
//! session.update_pointer(token, moved);
//! session.end_continuous(token);   // or cancel_continuous(token)
//! ```

use tracing::debug;

use crate::geometry::{Point, Rect};
use crate::mutations::Mutation;
use crate::selection::InteractionMode;
use crate::session::EditSession;

/// Handle for one in-flight gesture. Tokens from finished gestures are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContinuousToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Moving a positioned block around its wrapper
    Drag {
        row_id: String,
        block_id: String,
        /// Wrapper box at gesture start
        bounds: Rect,
        /// Pointer minus block center, in percent, so the block does not jump
        grab: (f64, f64),
    },
    /// Dragging a wrapper's bottom edge
    Resize {
        row_id: String,
        start_height: f64,
        start_y: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContinuousValue {
    /// Block center in percent of the wrapper
    Position { x: f64, y: f64 },
    /// Wrapper height in pixels
    Height(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousEdit {
    pub token: ContinuousToken,
    pub gesture: Gesture,
    /// Frames applied so far
    pub frames: u32,
}

impl ContinuousEdit {
    /// Value the gesture takes with the pointer at `pointer`
    pub fn value_at(&self, pointer: Point) -> ContinuousValue {
        match &self.gesture {
            Gesture::Drag { bounds, grab, .. } => {
                let (x, y) = bounds.to_percent(pointer);
                ContinuousValue::Position {
                    x: x - grab.0,
                    y: y - grab.1,
                }
            }
            Gesture::Resize {
                start_height, start_y, ..
            } => ContinuousValue::Height(start_height + (pointer.y - start_y)),
        }
    }

    fn mutation(&self, value: ContinuousValue) -> Option<Mutation> {
        match (&self.gesture, value) {
            (Gesture::Drag { row_id, block_id, .. }, ContinuousValue::Position { x, y }) => {
                Some(Mutation::MovePositioned {
                    row_id: row_id.clone(),
                    block_id: block_id.clone(),
                    x,
                    y,
                })
            }
            (Gesture::Resize { row_id, .. }, ContinuousValue::Height(height)) => Some(Mutation::ResizeWrapper {
                row_id: row_id.clone(),
                height,
            }),
            _ => None,
        }
    }
}

impl EditSession {
    /// Start dragging a positioned block. `None` if it no longer exists.
    pub fn begin_drag(
        &mut self,
        row_id: &str,
        block_id: &str,
        pointer: Point,
        bounds: Rect,
    ) -> Option<ContinuousToken> {
        let block = self.document().find_positioned(row_id, block_id)?;
        let (px, py) = bounds.to_percent(pointer);
        let grab = (px - block.x, py - block.y);
        self.begin_continuous(Gesture::Drag {
            row_id: row_id.to_string(),
            block_id: block_id.to_string(),
            bounds,
            grab,
        })
    }

    /// Start resizing a wrapper from its bottom handle
    pub fn begin_resize(&mut self, row_id: &str, pointer: Point) -> Option<ContinuousToken> {
        let start_height = self.document().find_wrapper(row_id)?.height;
        self.begin_continuous(Gesture::Resize {
            row_id: row_id.to_string(),
            start_height,
            start_y: pointer.y,
        })
    }

    /// Start a gesture. A gesture already in flight is committed first.
    pub fn begin_continuous(&mut self, gesture: Gesture) -> Option<ContinuousToken> {
        if let InteractionMode::Continuous(edit) = &self.mode {
            let token = edit.token;
            self.end_continuous(token);
        }
        if !self.mode.is_idle() {
            return None;
        }

        self.next_token += 1;
        let token = ContinuousToken(self.next_token);
        debug!(?gesture, "Gesture started");
        self.mode = InteractionMode::Continuous(ContinuousEdit {
            token,
            gesture,
            frames: 0,
        });
        Some(token)
    }

    pub fn active_gesture(&self) -> Option<&ContinuousEdit> {
        match &self.mode {
            InteractionMode::Continuous(edit) => Some(edit),
            _ => None,
        }
    }

    /// Apply one frame. Returns false for a stale token or a value that does
    /// not fit the gesture.
    pub fn update_continuous(&mut self, token: ContinuousToken, value: ContinuousValue) -> bool {
        let Some(edit) = self.gesture_mut(token) else {
            return false;
        };
        let Some(mutation) = edit.mutation(value) else {
            return false;
        };

        let mut next = self.document().clone();
        if let Err(e) = mutation.apply(&mut next) {
            debug!(error = %e, "Gesture frame dropped");
            return false;
        }
        self.history.apply_continuous(next);
        if let Some(edit) = self.gesture_mut(token) {
            edit.frames += 1;
        }
        true
    }

    /// Apply the frame for a pointer position
    pub fn update_pointer(&mut self, token: ContinuousToken, pointer: Point) -> bool {
        let Some(value) = self.gesture_mut(token).map(|edit| edit.value_at(pointer)) else {
            return false;
        };
        self.update_continuous(token, value)
    }

    /// Finish the gesture and record it as exactly one history step,
    /// whatever the number of frames.
    pub fn end_continuous(&mut self, token: ContinuousToken) -> bool {
        let Some(edit) = self.gesture_mut(token) else {
            return false;
        };
        let frames = edit.frames;
        self.mode = InteractionMode::Idle;

        let last = self.document().clone();
        self.history.commit_continuous(last);
        debug!(frames, "Gesture committed");
        true
    }

    /// Abandon the gesture and restore the document it started from
    pub fn cancel_continuous(&mut self, token: ContinuousToken) -> bool {
        if self.gesture_mut(token).is_none() {
            return false;
        }
        self.mode = InteractionMode::Idle;
        self.history.discard_continuous();
        debug!("Gesture cancelled");
        true
    }

    /// Drop any in-flight gesture without recording it
    pub(crate) fn abort_gesture(&mut self) {
        if let InteractionMode::Continuous(edit) = &self.mode {
            let token = edit.token;
            self.cancel_continuous(token);
        }
    }

    fn gesture_mut(&mut self, token: ContinuousToken) -> Option<&mut ContinuousEdit> {
        match &mut self.mode {
            InteractionMode::Continuous(edit) if edit.token == token => Some(edit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_schema::{PositionedContent, MIN_WRAPPER_HEIGHT};

    fn session_with_block() -> (EditSession, String, String) {
        let mut session = EditSession::new("gesture");
        let row_id = session.add_wrapper_row().unwrap();
        let block_id = session
            .add_positioned(&row_id, 50.0, 50.0, PositionedContent::emoji("🚀"))
            .unwrap()
            .unwrap();
        (session, row_id, block_id)
    }

    #[test]
    fn test_drag_is_one_history_step() {
        let (mut session, row_id, block_id) = session_with_block();
        let before = session.history().len();
        let bounds = Rect::new(0.0, 0.0, 600.0, 300.0);

        // grab the block at its center
        let token = session.begin_drag(&row_id, &block_id, Point::new(300.0, 150.0), bounds).unwrap();
        for step in 1..=20 {
            assert!(session.update_pointer(token, Point::new(300.0 - step as f64 * 6.0, 150.0)));
        }
        assert_eq!(session.history().len(), before);
        assert!(session.end_continuous(token));

        assert_eq!(session.history().len(), before + 1);
        let block = session.document().find_positioned(&row_id, &block_id).unwrap();
        assert_eq!((block.x, block.y), (30.0, 50.0));

        session.undo();
        let block = session.document().find_positioned(&row_id, &block_id).unwrap();
        assert_eq!((block.x, block.y), (50.0, 50.0));
    }

    #[test]
    fn test_resize_floors_at_minimum() {
        let (mut session, row_id, _) = session_with_block();
        let token = session.begin_resize(&row_id, Point::new(0.0, 300.0)).unwrap();
        assert!(session.update_continuous(token, ContinuousValue::Height(-100.0)));
        session.end_continuous(token);
        assert_eq!(session.document().find_wrapper(&row_id).unwrap().height, MIN_WRAPPER_HEIGHT);
    }

    #[test]
    fn test_cancel_restores_document() {
        let (mut session, row_id, _) = session_with_block();
        let before = session.document().clone();
        let token = session.begin_resize(&row_id, Point::new(0.0, 300.0)).unwrap();
        session.update_pointer(token, Point::new(0.0, 500.0));
        assert_eq!(session.document().find_wrapper(&row_id).unwrap().height, 500.0);

        assert!(session.cancel_continuous(token));
        assert_eq!(session.document(), &before);
        assert!(!session.update_pointer(token, Point::new(0.0, 600.0)));
    }

    #[test]
    fn test_release_without_motion_is_one_step() {
        let (mut session, row_id, block_id) = session_with_block();
        let before = session.history().len();
        let document = session.document().clone();
        let token = session
            .begin_drag(&row_id, &block_id, Point::new(10.0, 10.0), Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        assert!(session.end_continuous(token));

        assert_eq!(session.history().len(), before + 1);
        assert_eq!(session.document(), &document);
        assert!(session.undo());
        assert_eq!(session.document(), &document);
    }

    #[test]
    fn test_every_frame_count_is_one_step() {
        for frames in [0usize, 1, 25] {
            let (mut session, row_id, _) = session_with_block();
            let before = session.history().len();
            let token = session.begin_resize(&row_id, Point::new(0.0, 300.0)).unwrap();
            for step in 0..frames {
                session.update_pointer(token, Point::new(0.0, 300.0 + step as f64));
            }
            session.end_continuous(token);
            assert_eq!(session.history().len(), before + 1, "frames = {}", frames);
        }
    }

    #[test]
    fn test_mismatched_value_is_ignored() {
        let (mut session, row_id, _) = session_with_block();
        let token = session.begin_resize(&row_id, Point::default()).unwrap();
        assert!(!session.update_continuous(token, ContinuousValue::Position { x: 1.0, y: 1.0 }));
    }
}
