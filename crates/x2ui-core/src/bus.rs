use crossbeam_channel::{Receiver, Sender};

/// Outbox from the interpreter to its host: items are posted while handling input and
/// collected by the host between frames.
pub struct Bus<T: Send + 'static> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T: Send + 'static> Bus<T> {
    #[inline]
    pub fn unbounded() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Posts `item`; `false` when the channel refused it.
    #[inline]
    pub fn post(&self, item: T) -> bool {
        self.tx.try_send(item).is_ok()
    }

    /// Handle for producers living outside the owner.
    #[inline]
    pub fn poster(&self) -> Sender<T> {
        self.tx.clone()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Moves everything posted so far into `out`, oldest first.
    pub fn collect_into(&self, out: &mut Vec<T>) -> usize {
        let before = out.len();
        out.extend(self.rx.try_iter());
        out.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_come_out_in_posting_order() {
        let bus = Bus::unbounded();
        assert!(bus.post("navigate"));
        assert!(bus.poster().send("download").is_ok());
        assert_eq!(bus.pending(), 2);

        let mut out = vec!["earlier"];
        assert_eq!(bus.collect_into(&mut out), 2);
        assert_eq!(out, ["earlier", "navigate", "download"]);
        assert!(bus.is_empty());
    }
}
