#![forbid(unsafe_code)]

//! Property-based invariant tests for the merge list.
//!
//! For any sequence of facade operations and backing-list mutations:
//!
//! 1. `len()` equals the sum of segment lengths, and the contents equal the
//!    naive concatenation of a reference model.
//! 2. Replaying every emitted event onto a shadow vector reproduces the
//!    merge list exactly (every event carries the right offset).
//! 3. `index_in_composite` and `index_in_backing` are mutual inverses.
//! 4. Detached backing lists never produce merge events.
//! 5. The structural version never moves on value-only changes.

use std::cell::RefCell;
use std::rc::Rc;

use obslist_core::{ListChange, ObservableVec, Subscription};
use obslist_merge::{MergeList, MergeSource};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    InsertItem(i32),
    InsertList(Vec<i32>),
    Push(usize, i32),
    InsertAt(usize, usize, i32),
    RemoveAt(usize, usize),
    Set(usize, usize, i32),
    Move(usize, usize, usize),
    Clear(usize),
    Replace(usize, Vec<i32>),
    RemoveItem(i32),
    RemoveList(usize),
    RemoveAll,
}

/// Mutations applied directly to a backing list.
fn backing_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<usize>(), 0i32..100).prop_map(|(l, v)| Op::Push(l, v)),
        2 => (any::<usize>(), any::<usize>(), 0i32..100).prop_map(|(l, p, v)| Op::InsertAt(l, p, v)),
        3 => (any::<usize>(), any::<usize>()).prop_map(|(l, p)| Op::RemoveAt(l, p)),
        2 => (any::<usize>(), any::<usize>(), 0i32..100).prop_map(|(l, p, v)| Op::Set(l, p, v)),
        2 => (any::<usize>(), any::<usize>(), any::<usize>()).prop_map(|(l, f, t)| Op::Move(l, f, t)),
        1 => any::<usize>().prop_map(Op::Clear),
        1 => (any::<usize>(), proptest::collection::vec(0i32..100, 0..4)).prop_map(|(l, v)| Op::Replace(l, v)),
    ]
}

/// Layout changes made through the merge source.
fn facade_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i32..8).prop_map(Op::InsertItem),
        3 => proptest::collection::vec(0i32..100, 0..5).prop_map(Op::InsertList),
        2 => (0i32..8).prop_map(Op::RemoveItem),
        2 => any::<usize>().prop_map(Op::RemoveList),
        1 => Just(Op::RemoveAll),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![3 => backing_op(), 2 => facade_op()]
}

// ── Reference model ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum ModelSegment {
    Item(i32),
    List(usize),
}

struct Harness {
    source: MergeSource<i32>,
    list: MergeList<i32>,
    backings: Vec<ObservableVec<i32>>,
    model: Vec<ModelSegment>,
    shadow: Rc<RefCell<Vec<i32>>>,
    events: Rc<RefCell<usize>>,
    _sub: Subscription,
}

impl Harness {
    fn new() -> Self {
        let source = MergeSource::new();
        let list = source.list();
        let shadow = Rc::new(RefCell::new(Vec::new()));
        let events = Rc::new(RefCell::new(0));
        let sub = {
            let shadow = Rc::clone(&shadow);
            let events = Rc::clone(&events);
            let view = list.clone();
            list.on_change(move |change| {
                *events.borrow_mut() += 1;
                replay(&mut shadow.borrow_mut(), &view, *change);
            })
        };
        Self {
            source,
            list,
            backings: Vec::new(),
            model: Vec::new(),
            shadow,
            events,
            _sub: sub,
        }
    }

    fn naive(&self) -> Vec<i32> {
        self.model
            .iter()
            .flat_map(|segment| match *segment {
                ModelSegment::Item(v) => vec![v],
                ModelSegment::List(i) => self.backings[i].to_vec(),
            })
            .collect()
    }

    fn merged_backing(&self, pick: usize) -> Option<ObservableVec<i32>> {
        let merged: Vec<usize> = self
            .model
            .iter()
            .filter_map(|segment| match *segment {
                ModelSegment::List(i) => Some(i),
                ModelSegment::Item(_) => None,
            })
            .collect();
        if merged.is_empty() {
            None
        } else {
            Some(self.backings[merged[pick % merged.len()]].clone())
        }
    }

    fn apply(&mut self, op: &Op) {
        match op.clone() {
            Op::InsertItem(v) => {
                self.source.insert_item(v);
                self.model.push(ModelSegment::Item(v));
            }
            Op::InsertList(values) => {
                let backing = ObservableVec::from(values);
                self.source.insert_list(&backing).unwrap();
                self.model.push(ModelSegment::List(self.backings.len()));
                self.backings.push(backing);
            }
            Op::Push(l, v) => {
                if let Some(b) = self.merged_backing(l) {
                    b.push(v);
                }
            }
            Op::InsertAt(l, p, v) => {
                if let Some(b) = self.merged_backing(l) {
                    let at = p % (b.len() + 1);
                    b.insert(at, v).unwrap();
                }
            }
            Op::RemoveAt(l, p) => {
                if let Some(b) = self.merged_backing(l) {
                    if !b.is_empty() {
                        b.remove(p % b.len()).unwrap();
                    }
                }
            }
            Op::Set(l, p, v) => {
                if let Some(b) = self.merged_backing(l) {
                    if !b.is_empty() {
                        let version = self.list.version();
                        b.set(p % b.len(), v).unwrap();
                        assert_eq!(self.list.version(), version);
                    }
                }
            }
            Op::Move(l, f, t) => {
                if let Some(b) = self.merged_backing(l) {
                    if !b.is_empty() {
                        b.move_range(f % b.len(), t % b.len(), 1).unwrap();
                    }
                }
            }
            Op::Clear(l) => {
                if let Some(b) = self.merged_backing(l) {
                    b.clear();
                }
            }
            Op::Replace(l, values) => {
                if let Some(b) = self.merged_backing(l) {
                    b.replace_all(values);
                }
            }
            Op::RemoveItem(v) => {
                let expected = self
                    .model
                    .iter()
                    .position(|s| matches!(s, ModelSegment::Item(x) if *x == v));
                assert_eq!(self.source.remove_item(&v), expected.is_some());
                if let Some(pos) = expected {
                    self.model.remove(pos);
                }
            }
            Op::RemoveList(l) => {
                if let Some(b) = self.merged_backing(l) {
                    assert!(self.source.remove_list(&b));
                    let idx = self.backings.iter().position(|x| x.id() == b.id());
                    self.model
                        .retain(|s| !matches!(s, ModelSegment::List(i) if Some(*i) == idx));
                }
            }
            Op::RemoveAll => {
                self.source.remove_all();
                self.model.clear();
            }
        }
    }

    fn detached(&self) -> Vec<ObservableVec<i32>> {
        self.backings
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                !self
                    .model
                    .iter()
                    .any(|s| matches!(s, ModelSegment::List(j) if j == i))
            })
            .map(|(_, b)| b.clone())
            .collect()
    }
}

/// Apply a merge-coordinate event to the shadow copy.
fn replay(shadow: &mut Vec<i32>, view: &MergeList<i32>, change: ListChange) {
    match change {
        ListChange::Inserted { start, count } => {
            let inserted: Vec<i32> = (start..start + count)
                .map(|i| view.get(i).unwrap())
                .collect();
            shadow.splice(start..start, inserted);
        }
        ListChange::Removed { start, count } => {
            shadow.drain(start..start + count);
        }
        ListChange::Changed { start, count } => {
            for i in start..start + count {
                shadow[i] = view.get(i).unwrap();
            }
        }
        ListChange::Moved { from, to, count } => {
            let block: Vec<i32> = shadow.drain(from..from + count).collect();
            shadow.splice(to..to, block);
        }
        ListChange::Reset => {
            *shadow = view.to_vec();
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Contents, event replay, and coordinate inverses
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn merge_matches_model_and_replay(ops in proptest::collection::vec(op(), 0..60)) {
        let mut h = Harness::new();
        for op in &ops {
            h.apply(op);

            let naive = h.naive();
            let merged = h.list.to_vec();
            prop_assert_eq!(&merged, &naive, "contents diverged after {:?}", op);
            prop_assert_eq!(h.list.len(), naive.len());
            prop_assert_eq!(&*h.shadow.borrow(), &merged, "event replay diverged after {:?}", op);

            for (i, expected) in naive.iter().enumerate() {
                prop_assert_eq!(h.list.get(i), Ok(*expected));
            }
            prop_assert!(h.list.get(naive.len()).is_err());
        }
    }
}

proptest! {
    #[test]
    fn coordinate_conversions_are_inverse(ops in proptest::collection::vec(op(), 0..40)) {
        let mut h = Harness::new();
        for op in &ops {
            h.apply(op);
        }
        for segment in &h.model {
            if let ModelSegment::List(i) = *segment {
                let backing = &h.backings[i];
                for local in 0..backing.len() {
                    let merged = h.list.index_in_composite(backing, local).unwrap();
                    prop_assert_eq!(h.list.index_in_backing(backing, merged), Ok(local));
                    prop_assert_eq!(h.list.get(merged), backing.get(local));
                    let located = h.list.locate(merged).unwrap();
                    prop_assert_eq!(located.local, local);
                    prop_assert_eq!(located.list, Some(backing.id()));
                }
                prop_assert!(h.list.index_in_composite(backing, backing.len()).is_err());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Detached backing lists are silent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn detached_lists_are_silent(
        ops in proptest::collection::vec(op(), 0..40),
        extra in proptest::collection::vec(0i32..100, 1..5),
    ) {
        let mut h = Harness::new();
        for op in &ops {
            h.apply(op);
        }
        let before = *h.events.borrow();
        let version = h.list.version();
        for backing in h.detached() {
            prop_assert_eq!(backing.listener_count(), 0);
            backing.extend(extra.iter().copied());
            backing.clear();
        }
        prop_assert_eq!(*h.events.borrow(), before);
        prop_assert_eq!(h.list.version(), version);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Inserted events start at the pre-insert length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn insert_list_event_starts_at_old_len(
        ops in proptest::collection::vec(op(), 0..30),
        values in proptest::collection::vec(0i32..100, 0..6),
    ) {
        let mut h = Harness::new();
        for op in &ops {
            h.apply(op);
        }
        let old_len = h.list.len();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = h.list.on_change(move |c| sink.borrow_mut().push(*c));

        let count = values.len();
        h.source.insert_list(&ObservableVec::from(values)).unwrap();

        if count == 0 {
            prop_assert!(log.borrow().is_empty());
        } else {
            prop_assert_eq!(&*log.borrow(), &vec![ListChange::inserted(old_len, count)]);
        }
    }
}
