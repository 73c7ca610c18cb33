use mailcraft_editor::History;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![any::<u32>().prop_map(Op::Push), Just(Op::Undo), Just(Op::Redo)]
}

proptest! {
    #[test]
    fn prop_cursor_stays_in_bounds(ops in prop::collection::vec(op(), 0..200), limit in 0usize..20) {
        let mut history = History::with_max_levels(0u32, limit);
        for op in ops {
            match op {
                Op::Push(value) => {
                    history.push(value);
                    prop_assert!(!history.can_redo());
                    prop_assert_eq!(*history.present(), value);
                }
                Op::Undo => {
                    history.undo();
                }
                Op::Redo => {
                    history.redo();
                }
            }
            prop_assert!(history.cursor() < history.len());
            if limit > 0 {
                prop_assert!(history.len() <= limit.max(1));
            }
        }
    }

    #[test]
    fn prop_push_after_undo_drops_redo(pushes in 1usize..10, undos in 1usize..10) {
        let mut history = History::new(0usize);
        for i in 1..=pushes {
            history.push(i);
        }
        for _ in 0..undos {
            history.undo();
        }
        let cursor = history.cursor();
        history.push(999);
        prop_assert_eq!(history.len(), cursor + 2);
        prop_assert!(!history.can_redo());
    }
}

#[test]
fn test_continuous_collapse_for_any_frame_count() {
    for frames in [0usize, 1, 100] {
        let mut history = History::new(0usize);
        for frame in 0..frames {
            history.apply_continuous(frame);
        }
        history.commit_continuous(frames);
        assert_eq!(history.len(), 2, "frames = {}", frames);
        assert_eq!(*history.present(), frames);
    }
}
