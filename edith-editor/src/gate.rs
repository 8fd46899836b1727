/// Readiness flag with a buffered-until-ready queue.
///
/// The flag only ever goes from closed to open. Items admitted while closed
/// are kept in arrival order and handed back exactly once by
/// [`ReadyGate::open`]; after that the queue stays empty and every admission
/// passes straight through.
#[derive(Debug)]
pub struct ReadyGate<T> {
    open: bool,
    pending: Vec<T>,
}

impl<T> Default for ReadyGate<T> {
    fn default() -> Self {
        ReadyGate {
            open: false,
            pending: Vec::new(),
        }
    }
}

impl<T> ReadyGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the item if it may run now, or queues it and returns `None`.
    pub fn admit(&mut self, item: T) -> Option<T> {
        if self.open {
            Some(item)
        } else {
            self.pending.push(item);
            None
        }
    }

    /// Open the gate and take everything queued so far, oldest first.
    /// Opening an already open gate yields nothing.
    pub fn open(&mut self) -> Vec<T> {
        if self.open {
            return Vec::new();
        }
        self.open = true;
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_until_open_then_passes_through() {
        let mut gate = ReadyGate::new();
        assert_eq!(gate.admit(1), None);
        assert_eq!(gate.admit(2), None);
        assert_eq!(gate.pending_len(), 2);

        assert_eq!(gate.open(), vec![1, 2]);
        assert!(gate.is_open());
        assert_eq!(gate.pending_len(), 0);
        assert_eq!(gate.admit(3), Some(3));
        assert_eq!(gate.pending_len(), 0);
    }

    #[test]
    fn drains_exactly_once() {
        let mut gate = ReadyGate::new();
        gate.admit("a");
        assert_eq!(gate.open(), vec!["a"]);
        assert!(gate.open().is_empty());
    }
}
