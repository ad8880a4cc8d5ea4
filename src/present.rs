//! Presentation layer seam: where published snapshots go.
//!
//! The pipeline calls [`Presenter::publish`] once per accepted sample, from
//! the consumer context. Implementations must return promptly.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::derive::DerivedPoint;

/// Receives the full rolling window after each accepted sample.
pub trait Presenter {
    fn publish(&mut self, snapshot: &[DerivedPoint]);
}

impl<F> Presenter for F
where
    F: FnMut(&[DerivedPoint]),
{
    fn publish(&mut self, snapshot: &[DerivedPoint]) {
        self(snapshot)
    }
}

/// Latest snapshot, shared with a renderer living in the same thread.
#[derive(Clone, Default)]
pub struct SharedSnapshot {
    inner: Rc<RefCell<SnapshotState>>,
}

#[derive(Default)]
struct SnapshotState {
    points: Vec<DerivedPoint>,
    publishes: u64,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the most recently published window.
    pub fn points(&self) -> Vec<DerivedPoint> {
        self.inner.borrow().points.clone()
    }

    /// Run `f` on the current window without copying it.
    pub fn with_points<R>(&self, f: impl FnOnce(&[DerivedPoint]) -> R) -> R {
        f(&self.inner.borrow().points)
    }

    /// How many snapshots were published so far.
    pub fn publishes(&self) -> u64 {
        self.inner.borrow().publishes
    }
}

impl Presenter for SharedSnapshot {
    fn publish(&mut self, snapshot: &[DerivedPoint]) {
        let mut st = self.inner.borrow_mut();
        st.points.clear();
        st.points.extend_from_slice(snapshot);
        st.publishes += 1;
    }
}

/// Writes each snapshot as one JSON array per line.
///
/// Suited for piping into another process (e.g. a browser-side chart).
/// Write failures are logged and the snapshot is skipped.
pub struct JsonLinesPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn publish(&mut self, snapshot: &[DerivedPoint]) {
        let res = serde_json::to_writer(&mut self.out, snapshot)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = res {
            log::error!("failed to write snapshot: {e}");
        }
    }
}
